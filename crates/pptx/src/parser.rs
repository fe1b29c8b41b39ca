//! PPTX file parser implementation.

use crate::package::{resolve_target, PptxPackage, Relationship};
use crate::shapes::{parse_shape_tree, Placeholder, RawShape};
use quick_xml::events::Event;
use quick_xml::Reader;
use slideweb_core::{
    Error, Geometry, ImageData, Result, SourcePresentation, SourceShape, SourceSlide,
};
use std::collections::HashMap;
use std::io::{Read, Seek};

const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<SourcePresentation> {
        let mut package = PptxPackage::open(reader)?;

        let presentation_xml = package.read_string(PRESENTATION_PART)?;
        let info = parse_presentation_part(&presentation_xml)?;
        let rels = package.relationships(PRESENTATION_PART)?;
        let slide_order = slide_order(&info.slide_ids, &rels);

        log::debug!(
            "Presentation has {} slides ({:?} x {:?} EMU)",
            slide_order.len(),
            info.width,
            info.height
        );

        let mut presentation = SourcePresentation::new(info.width, info.height);
        let mut cache = PlaceholderCache::default();

        for slide_path in &slide_order {
            let slide = self.parse_slide(&mut package, slide_path, &mut cache)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        slide_path: &str,
        cache: &mut PlaceholderCache,
    ) -> Result<SourceSlide> {
        let content = package.read_string(slide_path)?;
        let rels = package.relationships(slide_path)?;

        let layout = match find_related(&rels, "slideLayout") {
            Some(rel) => {
                let layout_path = resolve_target(slide_path, &rel.target);
                self.layout_placeholders(package, &layout_path, cache)
            }
            None => Vec::new(),
        };

        let mut slide = SourceSlide::new();
        for raw in parse_shape_tree(&content) {
            let geometry = match &raw.placeholder {
                Some(ph) => inherit_geometry(raw.geometry, find_slide_base(&layout, ph)),
                None => raw.geometry.unwrap_or_default(),
            };
            let image = raw
                .image_rel_id
                .as_deref()
                .map(|rel_id| load_image(package, slide_path, &rels, rel_id));
            slide.add_shape(into_source_shape(raw, geometry, image));
        }

        if let Some(rel) = find_related(&rels, "notesSlide") {
            let notes_path = resolve_target(slide_path, &rel.target);
            slide.notes = read_notes(package, &notes_path);
        }

        log::debug!(
            "Parsed {} with {} shapes (notes: {})",
            slide_path,
            slide.shapes.len(),
            slide.has_notes()
        );

        Ok(slide)
    }

    /// Placeholder geometry declared by a layout, completed from its master.
    fn layout_placeholders<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        layout_path: &str,
        cache: &mut PlaceholderCache,
    ) -> Vec<PlaceholderGeometry> {
        if let Some(found) = cache.layouts.get(layout_path) {
            return found.clone();
        }

        let master = match package.relationships(layout_path) {
            Ok(rels) => match find_related(&rels, "slideMaster") {
                Some(rel) => {
                    let master_path = resolve_target(layout_path, &rel.target);
                    self.master_placeholders(package, &master_path, cache)
                }
                None => Vec::new(),
            },
            Err(e) => {
                log::warn!("Failed to read relationships of {}: {}", layout_path, e);
                Vec::new()
            }
        };

        let placeholders: Vec<PlaceholderGeometry> = read_placeholders(package, layout_path)
            .into_iter()
            .map(|(placeholder, own)| {
                let base_type = master_type_for(placeholder.kind());
                let base = master
                    .iter()
                    .find(|m| m.placeholder.kind() == base_type)
                    .map(|m| m.geometry);
                PlaceholderGeometry {
                    geometry: inherit_geometry(own, base),
                    placeholder,
                }
            })
            .collect();

        cache
            .layouts
            .insert(layout_path.to_string(), placeholders.clone());
        placeholders
    }

    fn master_placeholders<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        master_path: &str,
        cache: &mut PlaceholderCache,
    ) -> Vec<PlaceholderGeometry> {
        if let Some(found) = cache.masters.get(master_path) {
            return found.clone();
        }

        let placeholders: Vec<PlaceholderGeometry> = read_placeholders(package, master_path)
            .into_iter()
            .map(|(placeholder, own)| PlaceholderGeometry {
                geometry: own.unwrap_or_default(),
                placeholder,
            })
            .collect();

        cache
            .masters
            .insert(master_path.to_string(), placeholders.clone());
        placeholders
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Facts read from `ppt/presentation.xml`.
#[derive(Debug, Default, PartialEq)]
struct PresentationInfo {
    width: Option<i64>,
    height: Option<i64>,
    /// Relationship ids from `p:sldIdLst`, in presentation order.
    slide_ids: Vec<String>,
}

/// Resolved geometry of a layout or master placeholder.
#[derive(Debug, Clone)]
struct PlaceholderGeometry {
    placeholder: Placeholder,
    geometry: Geometry,
}

/// Layout and master placeholders, keyed by part path. Decks usually share a
/// handful of layouts across many slides.
#[derive(Default)]
struct PlaceholderCache {
    layouts: HashMap<String, Vec<PlaceholderGeometry>>,
    masters: HashMap<String, Vec<PlaceholderGeometry>>,
}

fn parse_presentation_part(xml: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut info = PresentationInfo::default();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let name = e.name();
                match crate::shapes::local_name(name.as_ref()) {
                    b"sldSz" => {
                        for attr in e.attributes().flatten() {
                            let value = String::from_utf8_lossy(&attr.value).to_string();
                            match attr.key.as_ref() {
                                b"cx" => info.width = value.parse().ok(),
                                b"cy" => info.height = value.parse().ok(),
                                _ => {}
                            }
                        }
                    }
                    b"sldId" => {
                        // `r:id` names the relationship; the bare `id` is a numeric slide id.
                        let rel_id = e.attributes().flatten().find(|attr| {
                            attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id"
                        });
                        if let Some(attr) = rel_id {
                            info.slide_ids
                                .push(String::from_utf8_lossy(&attr.value).to_string());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Ordered slide part paths.
///
/// Follows `p:sldIdLst`; when the list is absent, falls back to the slide
/// relationships sorted by the number in their id or target.
fn slide_order(slide_ids: &[String], rels: &[Relationship]) -> Vec<String> {
    if !slide_ids.is_empty() {
        return slide_ids
            .iter()
            .filter_map(|id| match rels.iter().find(|r| &r.id == id && r.is_type("slide")) {
                Some(rel) => Some(resolve_target(PRESENTATION_PART, &rel.target)),
                None => {
                    log::warn!("Slide relationship {} not found (skipped)", id);
                    None
                }
            })
            .collect();
    }

    let mut slides: Vec<(String, Option<usize>)> = rels
        .iter()
        .filter(|r| r.is_type("slide") && !r.external)
        .map(|r| {
            let order_num = extract_slide_number(&r.id).or_else(|| extract_slide_number(&r.target));
            (resolve_target(PRESENTATION_PART, &r.target), order_num)
        })
        .collect();

    // Sort slides by their number
    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    slides.into_iter().map(|(path, _)| path).collect()
}

fn find_related<'a>(rels: &'a [Relationship], kind: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.is_type(kind) && !r.external)
}

/// Placeholders of a layout or master part with their own geometry.
/// An unreadable part contributes nothing.
fn read_placeholders<R: Read + Seek>(
    package: &mut PptxPackage<R>,
    part: &str,
) -> Vec<(Placeholder, Option<Geometry>)> {
    match package.read_string(part) {
        Ok(xml) => parse_shape_tree(&xml)
            .into_iter()
            .filter_map(|shape| shape.placeholder.map(|ph| (ph, shape.geometry)))
            .collect(),
        Err(e) => {
            log::warn!("Failed to read {}: {}", part, e);
            Vec::new()
        }
    }
}

/// Layout placeholder a slide placeholder inherits from: matched by index,
/// then by type.
fn find_slide_base(layout: &[PlaceholderGeometry], ph: &Placeholder) -> Option<Geometry> {
    layout
        .iter()
        .find(|base| base.placeholder.index() == ph.index())
        .or_else(|| layout.iter().find(|base| base.placeholder.kind() == ph.kind()))
        .map(|base| base.geometry)
}

/// Master placeholder type a layout placeholder inherits from.
fn master_type_for(kind: &str) -> &'static str {
    match kind {
        "title" | "ctrTitle" => "title",
        "dt" => "dt",
        "ftr" => "ftr",
        "sldNum" => "sldNum",
        _ => "body",
    }
}

/// Fill unset geometry fields from an inherited placeholder.
fn inherit_geometry(own: Option<Geometry>, base: Option<Geometry>) -> Geometry {
    let own = own.unwrap_or_default();
    let base = base.unwrap_or_default();
    Geometry {
        left: own.left.or(base.left),
        top: own.top.or(base.top),
        width: own.width.or(base.width),
        height: own.height.or(base.height),
    }
}

fn load_image<R: Read + Seek>(
    package: &mut PptxPackage<R>,
    slide_path: &str,
    rels: &[Relationship],
    rel_id: &str,
) -> ImageData {
    let rel = match rels.iter().find(|r| r.id == rel_id) {
        Some(rel) => rel,
        None => return ImageData::Unavailable(format!("relationship {} not found", rel_id)),
    };
    if rel.external {
        return ImageData::Unavailable(format!("linked image {} is not embedded", rel.target));
    }

    let media_path = resolve_target(slide_path, &rel.target);
    match package.read_bytes(&media_path) {
        Ok(bytes) => ImageData::Bytes(bytes),
        Err(e) => ImageData::Unavailable(e.to_string()),
    }
}

/// Text of the notes slide's body placeholder. A notes slide without one
/// yields empty notes.
fn read_notes<R: Read + Seek>(package: &mut PptxPackage<R>, notes_path: &str) -> Option<String> {
    let xml = match package.read_string(notes_path) {
        Ok(xml) => xml,
        Err(e) => {
            log::warn!("Failed to read notes {}: {}", notes_path, e);
            return None;
        }
    };

    let body = parse_shape_tree(&xml).into_iter().find(|shape| {
        shape
            .placeholder
            .as_ref()
            .map_or(false, |ph| ph.kind() == "body")
    });

    Some(
        body.and_then(|shape| shape.text_frame)
            .map(|frame| frame.text())
            .unwrap_or_default(),
    )
}

fn into_source_shape(raw: RawShape, geometry: Geometry, image: Option<ImageData>) -> SourceShape {
    let mut shape = SourceShape::new(raw.kind, geometry);
    shape.name = raw.name;
    shape.text_frame = raw.text_frame;
    shape.preset = raw.preset;
    shape.image = image;
    shape
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    // Remove common extensions first
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    // Try to find digits at the end
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
