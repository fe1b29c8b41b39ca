//! Shape tree parsing for slide, layout, master and notes parts.
//!
//! Only the direct children of `p:spTree` are shapes; the contents of group
//! shapes are not traversed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slideweb_core::{Alignment, Font, Geometry, ShapeKind, SourceParagraph, TextFrame, TextRun};

/// Placeholder reference of a shape (`p:nvPr/p:ph`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholder {
    /// `type` attribute; `None` means the default (`obj`).
    pub ph_type: Option<String>,
    /// `idx` attribute; `None` means 0.
    pub idx: Option<u32>,
}

impl Placeholder {
    /// Placeholder type with the schema default applied.
    pub fn kind(&self) -> &str {
        self.ph_type.as_deref().unwrap_or("obj")
    }

    /// Placeholder index with the schema default applied.
    pub fn index(&self) -> u32 {
        self.idx.unwrap_or(0)
    }
}

/// A shape as read from XML, before relationships are resolved.
#[derive(Debug, Clone, Default)]
pub struct RawShape {
    pub name: String,
    pub kind: ShapeKind,
    /// Geometry from the shape's own transform; `None` when it has none.
    pub geometry: Option<Geometry>,
    pub placeholder: Option<Placeholder>,
    pub text_frame: Option<TextFrame>,
    /// Relationship id of the embedded image (`a:blip r:embed`).
    pub image_rel_id: Option<String>,
    pub preset: Option<String>,
}

/// XML element that introduces a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeElement {
    Sp,
    Pic,
    GraphicFrame,
    GrpSp,
    CxnSp,
    ContentPart,
}

impl ShapeElement {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Sp),
            b"pic" => Some(Self::Pic),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GrpSp),
            b"cxnSp" => Some(Self::CxnSp),
            b"contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

/// Parse the top-level shapes of a part containing a `p:spTree`.
///
/// Malformed XML stops the scan; shapes completed before the error are kept.
pub fn parse_shape_tree(xml: &str) -> Vec<RawShape> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut tree = TreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => tree.open(e),
            Ok(Event::Empty(ref e)) => {
                tree.open(e);
                tree.close();
            }
            Ok(Event::Text(ref e)) => {
                if tree.collecting_text() {
                    match e.unescape() {
                        Ok(text) => tree.push_text(&text),
                        Err(err) => log::warn!("Undecodable text in shape (skipped): {}", err),
                    }
                }
            }
            Ok(Event::End(_)) => tree.close(),
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "XML parsing error at position {} (keeping {} shapes): {}",
                    reader.buffer_position(),
                    tree.shapes.len(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    tree.shapes
}

/// Tracks the element stack and the shape under construction.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Vec<u8>>,
    shapes: Vec<RawShape>,
    current: Option<ShapeState>,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart) {
        let qname = e.name();
        let name = local_name(qname.as_ref());
        let parent = self.stack.last().cloned().unwrap_or_default();
        let parent_is_tree = parent.as_slice() == b"spTree";
        self.stack.push(name.to_vec());
        let level = self.stack.len();

        if let Some(state) = &mut self.current {
            state.open(name, &parent, level, e);
        } else if parent_is_tree {
            if let Some(element) = ShapeElement::from_name(name) {
                self.current = Some(ShapeState::new(element, level));
            }
        }
    }

    fn close(&mut self) {
        let level = self.stack.len();
        if let Some(mut state) = self.current.take() {
            if level == state.level {
                self.shapes.push(state.finish());
            } else {
                state.close(level);
                self.current = Some(state);
            }
        }
        self.stack.pop();
    }

    fn collecting_text(&self) -> bool {
        self.current
            .as_ref()
            .map_or(false, |state| state.text_level.is_some())
    }

    fn push_text(&mut self, text: &str) {
        if let Some(state) = &mut self.current {
            if let Some((_, run)) = &mut state.run {
                run.text.push_str(text);
            }
        }
    }
}

/// In-progress shape. Levels are element-stack depths, used to match each
/// open element with its end tag.
struct ShapeState {
    element: ShapeElement,
    level: usize,
    shape: RawShape,
    text_box: bool,
    custom_geometry: bool,
    xfrm_level: Option<usize>,
    frame: Option<(usize, TextFrame)>,
    paragraph: Option<(usize, SourceParagraph)>,
    run: Option<(usize, TextRun)>,
    rpr_level: Option<usize>,
    text_level: Option<usize>,
    /// Line breaks seen before the paragraph's first run.
    pending_breaks: String,
}

impl ShapeState {
    fn new(element: ShapeElement, level: usize) -> Self {
        Self {
            element,
            level,
            shape: RawShape::default(),
            text_box: false,
            custom_geometry: false,
            xfrm_level: None,
            frame: None,
            paragraph: None,
            run: None,
            rpr_level: None,
            text_level: None,
            pending_breaks: String::new(),
        }
    }

    fn open(&mut self, name: &[u8], parent: &[u8], level: usize, e: &BytesStart) {
        // Depth relative to the shape element: 1 for direct children.
        let depth = level - self.level;

        match name {
            b"cNvPr" if depth == 2 => {
                self.shape.name = attr(e, b"name").unwrap_or_default();
            }
            b"cNvSpPr" if depth == 2 => {
                self.text_box = attr(e, b"txBox").map_or(false, |v| is_true(&v));
            }
            b"ph" if depth == 3 => {
                self.shape.placeholder = Some(Placeholder {
                    ph_type: attr(e, b"type"),
                    idx: attr(e, b"idx").and_then(|v| v.parse().ok()),
                });
            }
            b"xfrm" if self.is_own_xfrm(parent, depth) => {
                self.xfrm_level = Some(level);
                self.shape.geometry.get_or_insert_with(Geometry::default);
            }
            b"off" if self.xfrm_level == Some(level - 1) => {
                if let Some(geometry) = &mut self.shape.geometry {
                    geometry.left = attr(e, b"x").and_then(|v| v.parse().ok());
                    geometry.top = attr(e, b"y").and_then(|v| v.parse().ok());
                }
            }
            b"ext" if self.xfrm_level == Some(level - 1) => {
                if let Some(geometry) = &mut self.shape.geometry {
                    geometry.width = attr(e, b"cx").and_then(|v| v.parse().ok());
                    geometry.height = attr(e, b"cy").and_then(|v| v.parse().ok());
                }
            }
            b"prstGeom" if depth == 2 && parent == b"spPr" => {
                self.shape.preset = attr(e, b"prst");
            }
            b"custGeom" if depth == 2 && parent == b"spPr" => {
                self.custom_geometry = true;
            }
            b"txBody" if depth == 1 => {
                self.frame = Some((level, TextFrame::default()));
            }
            b"p" if self.frame_at(level - 1) => {
                self.paragraph = Some((level, SourceParagraph::default()));
                self.pending_breaks.clear();
            }
            b"pPr" if self.paragraph_at(level - 1) => {
                if let Some((_, para)) = &mut self.paragraph {
                    para.level = attr(e, b"lvl").and_then(|v| v.parse().ok()).unwrap_or(0);
                    para.alignment = attr(e, b"algn").map(|v| parse_alignment(&v));
                }
            }
            b"r" | b"fld" if self.paragraph_at(level - 1) => {
                let text = std::mem::take(&mut self.pending_breaks);
                self.run = Some((level, TextRun::new(text)));
            }
            b"br" if self.paragraph_at(level - 1) => {
                // A break is not a run; it joins the neighbouring run's text.
                if let Some((_, para)) = &mut self.paragraph {
                    match para.runs.last_mut() {
                        Some(last) => last.text.push('\n'),
                        None => self.pending_breaks.push('\n'),
                    }
                }
            }
            b"rPr" if self.run_at(level - 1) => {
                self.rpr_level = Some(level);
                if let Some((_, run)) = &mut self.run {
                    run.font = parse_run_font(e);
                }
            }
            b"latin" if self.rpr_level == Some(level - 1) => {
                if let Some((_, run)) = &mut self.run {
                    run.font.name = attr(e, b"typeface")
                        .filter(|face| !face.is_empty() && !face.starts_with('+'));
                }
            }
            b"t" if self.run_at(level - 1) => {
                self.text_level = Some(level);
            }
            b"blip" if self.element == ShapeElement::Pic => {
                if let Some(rel_id) = attr(e, b"embed") {
                    self.shape.image_rel_id = Some(rel_id);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, level: usize) {
        if self.text_level == Some(level) {
            self.text_level = None;
        }
        if self.rpr_level == Some(level) {
            self.rpr_level = None;
        }
        if self.xfrm_level == Some(level) {
            self.xfrm_level = None;
        }
        if self.run_at(level) {
            if let (Some((_, run)), Some((_, para))) = (self.run.take(), &mut self.paragraph) {
                para.runs.push(run);
            }
        }
        if self.paragraph_at(level) {
            if let (Some((_, para)), Some((_, frame))) = (self.paragraph.take(), &mut self.frame) {
                frame.paragraphs.push(para);
            }
        }
        if self.frame_at(level) {
            if let Some((_, frame)) = self.frame.take() {
                self.shape.text_frame = Some(frame);
            }
        }
    }

    fn is_own_xfrm(&self, parent: &[u8], depth: usize) -> bool {
        match self.element {
            ShapeElement::GraphicFrame => depth == 1,
            _ => depth == 2 && (parent == b"spPr" || parent == b"grpSpPr"),
        }
    }

    fn frame_at(&self, level: usize) -> bool {
        matches!(self.frame, Some((l, _)) if l == level)
    }

    fn paragraph_at(&self, level: usize) -> bool {
        matches!(self.paragraph, Some((l, _)) if l == level)
    }

    fn run_at(&self, level: usize) -> bool {
        matches!(self.run, Some((l, _)) if l == level)
    }

    fn finish(mut self) -> RawShape {
        self.shape.kind = if self.shape.placeholder.is_some() {
            ShapeKind::Placeholder
        } else {
            match self.element {
                ShapeElement::Sp if self.custom_geometry => ShapeKind::Freeform,
                ShapeElement::Sp if self.shape.preset.is_some() && !self.text_box => {
                    ShapeKind::AutoShape
                }
                ShapeElement::Sp if self.text_box => ShapeKind::TextBox,
                ShapeElement::Sp => ShapeKind::Other,
                ShapeElement::Pic => ShapeKind::Picture,
                ShapeElement::GraphicFrame => ShapeKind::GraphicFrame,
                ShapeElement::GrpSp => ShapeKind::Group,
                ShapeElement::CxnSp => ShapeKind::Connector,
                ShapeElement::ContentPart => ShapeKind::Other,
            }
        };
        self.shape
    }
}

/// Read an attribute by local name, ignoring its namespace prefix.
fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}

fn parse_alignment(value: &str) -> Alignment {
    match value {
        "l" => Alignment::Left,
        "ctr" => Alignment::Center,
        "r" => Alignment::Right,
        "just" => Alignment::Justify,
        _ => Alignment::Unknown,
    }
}

/// Font properties declared on `a:rPr`. `sz` is in hundredths of a point.
fn parse_run_font(e: &BytesStart) -> Font {
    Font {
        size: attr(e, b"sz")
            .and_then(|v| v.parse::<f64>().ok())
            .map(|sz| sz / 100.0),
        name: None,
        bold: attr(e, b"b").map(|v| is_true(&v)),
        italic: attr(e, b"i").map(|v| is_true(&v)),
    }
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
