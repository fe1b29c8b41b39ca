//! PPTX (Office Open XML) backend for the slide deck to HTML5 converter.
//!
//! Parses .pptx files, which are ZIP archives of XML parts, into the core
//! source model and drives conversion of a file into a static site.

pub mod converter;
pub mod package;
pub mod parser;
pub mod shapes;

pub use converter::{convert_file, PptxConverter};
pub use parser::PptxParser;
