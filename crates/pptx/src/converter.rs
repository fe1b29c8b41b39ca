//! File-level conversion: validate the input, parse it, write the site.

use crate::parser::PptxParser;
use slideweb_core::{
    build_site, extract_presentation, ConvertOptions, Error, Result, SlideRecord,
    SourcePresentation,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A parsed `.pptx` file ready to be converted.
#[derive(Debug)]
pub struct PptxConverter {
    path: PathBuf,
    presentation: SourcePresentation,
}

impl PptxConverter {
    /// Open and parse a presentation.
    ///
    /// Checks, in order, that the file exists, that it has a `.pptx`
    /// extension, and that it parses as a presentation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        if !has_pptx_extension(path) {
            return Err(Error::InvalidExtension(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let presentation = PptxParser::new()
            .parse(BufReader::new(file))
            .map_err(|e| match e {
                Error::IoError(_) => e,
                other => Error::InvalidPresentation(other.to_string()),
            })?;

        log::info!(
            "Loaded {} ({} slides)",
            path.display(),
            presentation.slides.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            presentation,
        })
    }

    pub fn presentation(&self) -> &SourcePresentation {
        &self.presentation
    }

    /// Page title for the site: the input file name without its extension.
    pub fn page_title(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extracted slide records, e.g. for a JSON dump.
    pub fn slide_records(&self, options: &ConvertOptions) -> Vec<SlideRecord> {
        extract_presentation(&self.presentation, options)
    }

    /// Render the site into `output_dir` and return the index path.
    pub fn convert(&self, output_dir: impl AsRef<Path>, options: &ConvertOptions) -> Result<PathBuf> {
        let site = build_site(&self.presentation, &self.page_title(), options);
        site.write_to(output_dir.as_ref())
    }
}

fn has_pptx_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pptx"))
        .unwrap_or(false)
}

/// Convert `input` into a site in `output_dir`.
pub fn convert_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<PathBuf> {
    PptxConverter::open(input)?.convert(output_dir, options)
}
