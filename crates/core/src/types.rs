//! Records produced by the extractor and consumed by the renderer.

use crate::source::{Alignment, Font, Geometry};
use serde::Serialize;

/// Extracted content of a single slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideRecord {
    /// 1-based slide number.
    pub number: usize,

    /// Text of the inferred title shape, empty if none qualified.
    pub title: String,

    /// Shapes in source order.
    pub shapes: Vec<ShapeRecord>,

    /// Speaker notes, empty when absent or suppressed.
    pub notes: String,

    /// Slide width in EMUs, if known.
    pub slide_width: Option<i64>,

    /// Slide height in EMUs, if known.
    pub slide_height: Option<i64>,
}

impl SlideRecord {
    /// Drop the speaker notes from this record.
    pub fn without_notes(self) -> Self {
        Self {
            notes: String::new(),
            ..self
        }
    }

    /// The shape flagged as the slide title, if any.
    pub fn title_shape(&self) -> Option<&ShapeRecord> {
        self.shapes.iter().find(|s| s.is_title())
    }

    /// Whether the slide size is fully known.
    pub fn has_dimensions(&self) -> bool {
        matches!((self.slide_width, self.slide_height), (Some(w), Some(h)) if w > 0 && h > 0)
    }
}

/// One shape of a slide.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeRecord {
    #[serde(flatten)]
    pub geometry: Geometry,

    #[serde(flatten)]
    pub content: ShapeContent,
}

impl ShapeRecord {
    /// Create a record from geometry and content.
    pub fn new(geometry: Geometry, content: ShapeContent) -> Self {
        Self { geometry, content }
    }

    /// Kind tag of this shape.
    pub fn kind(&self) -> &'static str {
        match self.content {
            ShapeContent::Text(_) => "text",
            ShapeContent::Picture { .. } => "picture",
            ShapeContent::AutoShape { .. } => "autoshape",
            ShapeContent::Unknown => "unknown",
        }
    }

    /// Whether this is the title shape of its slide.
    pub fn is_title(&self) -> bool {
        matches!(&self.content, ShapeContent::Text(text) if text.is_title)
    }

    /// Text content, for text shapes.
    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            ShapeContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Kind-specific payload of a shape.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeContent {
    Text(TextContent),
    Picture {
        /// `data:image/<fmt>;base64,...`, absent if the bytes were unreadable.
        image_data: Option<String>,
    },
    #[serde(rename = "autoshape")]
    AutoShape {
        autoshape_type: String,
        autoshape_type_value: u32,
    },
    Unknown,
}

/// Text shape payload.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    /// Normalized, trimmed text of the whole shape.
    pub text: String,

    /// Non-empty paragraphs in order.
    pub paragraphs: Vec<ParagraphRecord>,

    /// Font of the first paragraph's first run.
    pub font: Option<Font>,

    /// Alignment of the first paragraph.
    pub alignment: Alignment,

    pub is_title: bool,
}

/// A paragraph of a text shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphRecord {
    /// Normalized, trimmed paragraph text. Never empty.
    pub text: String,

    /// Outline level.
    pub level: u32,

    pub alignment: Alignment,

    /// Font of the paragraph's first run.
    pub font: Option<Font>,
}

impl ParagraphRecord {
    /// Create a level-0, left-aligned paragraph without font metadata.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
            alignment: Alignment::Left,
            font: None,
        }
    }
}
