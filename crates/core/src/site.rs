//! Site assembly and output.

use crate::error::{Error, Result};
use crate::extract::extract_presentation;
use crate::options::ConvertOptions;
use crate::render::SiteRenderer;
use crate::source::SourcePresentation;
use std::fs;
use std::path::{Path, PathBuf};

/// Entry point document name.
pub const INDEX_FILE: &str = "index.html";

/// Stylesheet name, referenced relatively from the index.
pub const STYLESHEET_FILE: &str = "styles.css";

/// Script name, referenced relatively from the index.
pub const SCRIPT_FILE: &str = "script.js";

/// The three rendered artifacts of a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub markup: String,
    pub stylesheet: String,
    pub script: String,
}

impl Site {
    /// Write all artifacts into `output_dir`, creating it if needed.
    ///
    /// Returns the path of the index document. Any failure is reported; a
    /// successful return means all three files were written.
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|source| Error::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let index_path = output_dir.join(INDEX_FILE);
        write_artifact(&index_path, &self.markup)?;
        write_artifact(&output_dir.join(STYLESHEET_FILE), &self.stylesheet)?;
        write_artifact(&output_dir.join(SCRIPT_FILE), &self.script)?;

        log::debug!("Wrote site to {}", output_dir.display());
        Ok(index_path)
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| Error::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract and render a presentation into a site.
pub fn build_site(
    presentation: &SourcePresentation,
    page_title: &str,
    options: &ConvertOptions,
) -> Site {
    let slides = extract_presentation(presentation, options);
    log::debug!("Rendering {} slides", slides.len());
    SiteRenderer::new(page_title)
        .with_include_notes(options.include_notes)
        .render(&slides)
}
