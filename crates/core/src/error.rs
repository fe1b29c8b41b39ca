//! Error types for presentation conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening or converting a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The source path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The source path does not carry the expected presentation extension.
    #[error("File must be a .pptx file: {}", .0.display())]
    InvalidExtension(PathBuf),

    /// The source could not be parsed as a presentation document.
    #[error("Invalid PowerPoint file: {0}")]
    InvalidPresentation(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output artifact could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse error categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source path does not exist.
    NotFound,
    /// Wrong extension or unparseable document.
    InvalidFormat,
    /// Output directory or artifact could not be written, or input could not be read.
    ResourceUnavailable,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidExtension(_)
            | Error::InvalidPresentation(_)
            | Error::ZipError(_)
            | Error::XmlError(_) => ErrorKind::InvalidFormat,
            Error::OutputDirectory { .. } | Error::WriteArtifact { .. } | Error::IoError(_) => {
                ErrorKind::ResourceUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::NotFound(PathBuf::from("deck.pptx")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::InvalidExtension(PathBuf::from("deck.txt")).kind(),
            ErrorKind::InvalidFormat
        );
        assert_eq!(
            Error::XmlError("bad".into()).kind(),
            ErrorKind::InvalidFormat
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            Error::WriteArtifact {
                path: PathBuf::from("out/index.html"),
                source: io,
            }
            .kind(),
            ErrorKind::ResourceUnavailable
        );
    }

    #[test]
    fn test_messages() {
        let err = Error::InvalidExtension(PathBuf::from("notes.txt"));
        assert_eq!(err.to_string(), "File must be a .pptx file: notes.txt");

        let err = Error::InvalidPresentation("missing ppt/presentation.xml".into());
        assert!(err.to_string().starts_with("Invalid PowerPoint file"));
    }
}
