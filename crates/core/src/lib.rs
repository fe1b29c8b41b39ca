//! Core of the slide deck to HTML5 site converter: the source document
//! model, shape extraction, and static site rendering.

pub mod autoshape;
pub mod error;
pub mod extract;
pub mod image;
pub mod navigation;
pub mod normalize;
pub mod options;
pub mod render;
pub mod site;
pub mod source;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use extract::{extract_presentation, extract_slide_content};
pub use options::ConvertOptions;
pub use render::SiteRenderer;
pub use site::{build_site, Site};
pub use source::{
    Alignment, Font, Geometry, ImageData, ShapeKind, SourceParagraph, SourcePresentation,
    SourceShape, SourceSlide, TextFrame, TextRun,
};
pub use types::{ParagraphRecord, ShapeContent, ShapeRecord, SlideRecord, TextContent};
