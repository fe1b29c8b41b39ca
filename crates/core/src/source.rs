//! Read-only presentation tree produced by a format backend.
//!
//! Backends (such as the PPTX reader) materialize a [`SourcePresentation`];
//! the extractor only ever reads from it.

use serde::Serialize;

/// EMUs per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// A parsed presentation.
#[derive(Debug, Clone, Default)]
pub struct SourcePresentation {
    /// Nominal slide width in EMUs, if declared.
    pub slide_width: Option<i64>,

    /// Nominal slide height in EMUs, if declared.
    pub slide_height: Option<i64>,

    /// Slides in display order.
    pub slides: Vec<SourceSlide>,
}

impl SourcePresentation {
    /// Create an empty presentation with the given slide size.
    pub fn new(slide_width: Option<i64>, slide_height: Option<i64>) -> Self {
        Self {
            slide_width,
            slide_height,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: SourceSlide) {
        self.slides.push(slide);
    }
}

/// A single slide.
#[derive(Debug, Clone, Default)]
pub struct SourceSlide {
    /// Shapes in z-order, as stored in the document.
    pub shapes: Vec<SourceShape>,

    /// Speaker notes text. `None` when the slide has no notes page.
    pub notes: Option<String>,
}

impl SourceSlide {
    /// Create an empty slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: SourceShape) {
        self.shapes.push(shape);
    }

    /// Whether this slide declares a notes page.
    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }
}

/// Position and size of a shape in EMUs. Each field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Geometry {
    /// Geometry with all four fields known.
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Returns `(left, top, width, height)` when every field is known.
    pub fn complete(&self) -> Option<(i64, i64, i64, i64)> {
        Some((self.left?, self.top?, self.width?, self.height?))
    }

    /// True when no field is known.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Kind discriminant reported by the backend for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// Preset-geometry drawn shape (rectangle, arrow, ...).
    AutoShape,
    /// Text box.
    TextBox,
    /// Layout-inherited placeholder.
    Placeholder,
    /// Custom-geometry drawn shape.
    Freeform,
    /// Embedded picture.
    Picture,
    /// Group of shapes.
    Group,
    /// Connector line.
    Connector,
    /// Table, chart, diagram or other graphic frame.
    GraphicFrame,
    /// Anything the backend does not recognize.
    #[default]
    Other,
}

/// Paragraph alignment as declared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    /// Distributed and other alignments without a direct equivalent.
    Unknown,
}

impl Alignment {
    /// Upper-case label used in records and markup attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "LEFT",
            Alignment::Center => "CENTER",
            Alignment::Right => "RIGHT",
            Alignment::Justify => "JUSTIFY",
            Alignment::Unknown => "UNKNOWN",
        }
    }

    /// CSS `text-align` value, if one applies.
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
            Alignment::Justify => Some("justify"),
            Alignment::Unknown => None,
        }
    }
}

/// Run-level font properties. Unset fields inherit from the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Font {
    /// Size in points.
    pub size: Option<f64>,
    /// Typeface name.
    pub name: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, Default)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
}

impl TextRun {
    /// Create a run with default font properties.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::default(),
        }
    }

    /// Set the font of this run.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }
}

/// A paragraph inside a text frame.
#[derive(Debug, Clone, Default)]
pub struct SourceParagraph {
    pub runs: Vec<TextRun>,
    /// Outline level, 0 when not declared.
    pub level: u32,
    /// Declared alignment, `None` when inherited.
    pub alignment: Option<Alignment>,
}

impl SourceParagraph {
    /// Create a paragraph from runs.
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            level: 0,
            alignment: None,
        }
    }

    /// Set the outline level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// The first run, whose font represents the paragraph.
    pub fn first_run(&self) -> Option<&TextRun> {
        self.runs.first()
    }
}

/// The text body of a shape.
#[derive(Debug, Clone, Default)]
pub struct TextFrame {
    pub paragraphs: Vec<SourceParagraph>,
}

impl TextFrame {
    /// Create a text frame from paragraphs.
    pub fn new(paragraphs: Vec<SourceParagraph>) -> Self {
        Self { paragraphs }
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(SourceParagraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Image payload of a picture shape.
#[derive(Debug, Clone)]
pub enum ImageData {
    /// Raw image bytes.
    Bytes(Vec<u8>),
    /// The image part could not be read.
    Unavailable(String),
}

/// A positioned visual element on a slide.
#[derive(Debug, Clone, Default)]
pub struct SourceShape {
    /// Display name from the document, for diagnostics.
    pub name: String,
    pub geometry: Geometry,
    pub kind: ShapeKind,
    /// Structured text body, if the shape carries one.
    pub text_frame: Option<TextFrame>,
    /// Flat text for shapes that expose text without paragraph structure.
    pub plain_text: Option<String>,
    /// Image payload, for pictures and picture placeholders.
    pub image: Option<ImageData>,
    /// Preset geometry name (`rect`, `rightArrow`, ...) for drawn shapes.
    pub preset: Option<String>,
}

impl SourceShape {
    /// Create a shape of the given kind.
    pub fn new(kind: ShapeKind, geometry: Geometry) -> Self {
        Self {
            kind,
            geometry,
            ..Self::default()
        }
    }

    /// Attach a text frame.
    pub fn with_text_frame(mut self, frame: TextFrame) -> Self {
        self.text_frame = Some(frame);
        self
    }

    /// Attach flat text.
    pub fn with_plain_text(mut self, text: impl Into<String>) -> Self {
        self.plain_text = Some(text.into());
        self
    }

    /// Attach an image payload.
    pub fn with_image(mut self, image: ImageData) -> Self {
        self.image = Some(image);
        self
    }

    /// Attach a preset geometry name.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    /// Raw text of the shape: the text frame when present, else the flat text.
    pub fn text(&self) -> Option<String> {
        match (&self.text_frame, &self.plain_text) {
            (Some(frame), _) => Some(frame.text()),
            (None, Some(text)) => Some(text.clone()),
            (None, None) => None,
        }
    }
}
