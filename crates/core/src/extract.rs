//! Shape extraction: turns source slides into [`SlideRecord`]s.

use crate::autoshape;
use crate::image;
use crate::normalize::normalize_text;
use crate::options::ConvertOptions;
use crate::source::{Alignment, ImageData, ShapeKind, SourcePresentation, SourceShape, SourceSlide};
use crate::types::{ParagraphRecord, ShapeContent, ShapeRecord, SlideRecord, TextContent};

/// Extract every slide of a presentation, in order.
///
/// Speaker notes are always read; they are dropped from the records when
/// `options` does not include them.
pub fn extract_presentation(
    presentation: &SourcePresentation,
    options: &ConvertOptions,
) -> Vec<SlideRecord> {
    presentation
        .slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| {
            let record = extract_slide_content(
                slide,
                idx + 1,
                presentation.slide_width,
                presentation.slide_height,
            );
            if options.include_notes {
                record
            } else {
                record.without_notes()
            }
        })
        .collect()
}

/// Extract the content of one slide.
///
/// Every source shape yields exactly one [`ShapeRecord`], in source order.
/// The first text shape whose top edge lies in the upper quarter of the
/// slide becomes the title.
pub fn extract_slide_content(
    slide: &SourceSlide,
    number: usize,
    slide_width: Option<i64>,
    slide_height: Option<i64>,
) -> SlideRecord {
    let mut title = String::new();
    let mut already_titled = false;
    let mut shapes = Vec::with_capacity(slide.shapes.len());

    for shape in &slide.shapes {
        let content = classify_shape(shape, already_titled, slide_height);
        if let ShapeContent::Text(text) = &content {
            if text.is_title {
                title = text.text.clone();
                already_titled = true;
            }
        }
        shapes.push(ShapeRecord::new(shape.geometry, content));
    }

    let notes = slide
        .notes
        .as_deref()
        .map(|n| n.trim().to_string())
        .unwrap_or_default();

    log::debug!(
        "Slide {}: {} shapes, title {:?}",
        number,
        shapes.len(),
        title
    );

    SlideRecord {
        number,
        title,
        shapes,
        notes,
        slide_width,
        slide_height,
    }
}

/// Decide the record variant of a shape. Rules are tried in order:
/// text, autoshape, picture, unknown.
fn classify_shape(
    shape: &SourceShape,
    already_titled: bool,
    slide_height: Option<i64>,
) -> ShapeContent {
    if let Some(text) = extract_text(shape) {
        let is_title = !already_titled && is_title_position(shape.geometry.top, slide_height);
        return ShapeContent::Text(TextContent { is_title, ..text });
    }

    if shape.kind == ShapeKind::AutoShape {
        let resolved = autoshape::resolve_or_unknown(shape.preset.as_deref());
        return ShapeContent::AutoShape {
            autoshape_type: resolved.name.to_string(),
            autoshape_type_value: resolved.code,
        };
    }

    if shape.kind == ShapeKind::Picture || shape.image.is_some() {
        return ShapeContent::Picture {
            image_data: extract_image(shape),
        };
    }

    ShapeContent::Unknown
}

/// True when `top` lies strictly above a quarter of the slide height.
fn is_title_position(top: Option<i64>, slide_height: Option<i64>) -> bool {
    match (top, slide_height) {
        (Some(top), Some(height)) => (top as f64) < (height as f64) / 4.0,
        _ => false,
    }
}

/// Build the text payload, or `None` if the shape carries no visible text.
fn extract_text(shape: &SourceShape) -> Option<TextContent> {
    let raw = shape.text()?;
    let text = normalize_text(&raw);
    if text.is_empty() {
        return None;
    }

    let Some(frame) = &shape.text_frame else {
        return Some(TextContent {
            paragraphs: vec![ParagraphRecord::plain(text.clone())],
            text,
            font: None,
            alignment: Alignment::Left,
            is_title: false,
        });
    };

    let paragraphs = frame
        .paragraphs
        .iter()
        .filter_map(|para| {
            let para_text = normalize_text(&para.text());
            if para_text.is_empty() {
                return None;
            }
            Some(ParagraphRecord {
                text: para_text,
                level: para.level,
                alignment: para.alignment.unwrap_or_default(),
                font: para.first_run().map(|run| run.font.clone()),
            })
        })
        .collect();

    let first = frame.paragraphs.first();
    let font = first
        .and_then(|para| para.first_run())
        .map(|run| run.font.clone());
    let alignment = first
        .and_then(|para| para.alignment)
        .unwrap_or_default();

    Some(TextContent {
        text,
        paragraphs,
        font,
        alignment,
        is_title: false,
    })
}

fn extract_image(shape: &SourceShape) -> Option<String> {
    match &shape.image {
        Some(ImageData::Bytes(bytes)) => Some(image::data_uri(bytes)),
        Some(ImageData::Unavailable(reason)) => {
            log::warn!("Picture {:?} has no readable image: {}", shape.name, reason);
            None
        }
        None => {
            log::warn!("Picture {:?} has no image reference", shape.name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Font, Geometry, SourceParagraph, TextFrame, TextRun};

    const WIDTH: i64 = 9_144_000;
    const HEIGHT: i64 = 6_858_000;

    fn text_box(text: &str, top: i64) -> SourceShape {
        SourceShape::new(ShapeKind::TextBox, Geometry::new(457_200, top, 8_229_600, 1_143_000))
            .with_text_frame(TextFrame::new(vec![SourceParagraph::new(vec![
                TextRun::new(text),
            ])]))
    }

    fn slide_of(shapes: Vec<SourceShape>) -> SourceSlide {
        SourceSlide {
            shapes,
            notes: None,
        }
    }

    #[test]
    fn test_shape_count_and_order_preserved() {
        let slide = slide_of(vec![
            text_box("Heading", 100_000),
            SourceShape::new(ShapeKind::AutoShape, Geometry::new(0, 0, 10, 10)).with_preset("rect"),
            SourceShape::new(ShapeKind::Picture, Geometry::new(0, 0, 10, 10))
                .with_image(ImageData::Bytes(vec![0xFF, 0xD8, 0xFF])),
            SourceShape::new(ShapeKind::GraphicFrame, Geometry::new(5, 5, 5, 5)),
            text_box("Body", 3_000_000),
        ]);

        let record = extract_slide_content(&slide, 1, Some(WIDTH), Some(HEIGHT));
        let kinds: Vec<_> = record.shapes.iter().map(ShapeRecord::kind).collect();
        assert_eq!(kinds, vec!["text", "autoshape", "picture", "unknown", "text"]);
        assert_eq!(record.shapes[3].geometry, Geometry::new(5, 5, 5, 5));
    }

    #[test]
    fn test_first_qualifying_title_wins() {
        let slide = slide_of(vec![
            text_box("Lower text", HEIGHT / 2),
            text_box("Real title", 100_000),
            text_box("Also high", 200_000),
        ]);

        let record = extract_slide_content(&slide, 1, Some(WIDTH), Some(HEIGHT));
        assert_eq!(record.title, "Real title");
        let flags: Vec<_> = record.shapes.iter().map(ShapeRecord::is_title).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_title_threshold_is_strict() {
        let slide = slide_of(vec![text_box("Edge", HEIGHT / 4)]);
        let record = extract_slide_content(&slide, 1, Some(WIDTH), Some(HEIGHT));
        assert_eq!(record.title, "");
        assert!(!record.shapes[0].is_title());
    }

    #[test]
    fn test_no_title_without_height() {
        let slide = slide_of(vec![text_box("Top", 0)]);
        let record = extract_slide_content(&slide, 1, None, None);
        assert_eq!(record.title, "");
        assert!(record.shapes.iter().all(|s| !s.is_title()));
    }

    #[test]
    fn test_no_title_without_top() {
        let shape = SourceShape::new(ShapeKind::TextBox, Geometry::default()).with_plain_text("Floating");
        let record = extract_slide_content(&slide_of(vec![shape]), 1, Some(WIDTH), Some(HEIGHT));
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_paragraphs_normalized_and_empty_dropped() {
        let bold = Font {
            size: Some(28.0),
            name: Some("Calibri".into()),
            bold: Some(true),
            italic: None,
        };
        let frame = TextFrame::new(vec![
            SourceParagraph::new(vec![TextRun::new("\u{F0B7} First").with_font(bold.clone())])
                .with_alignment(Alignment::Center),
            SourceParagraph::new(vec![TextRun::new("   ")]),
            SourceParagraph::new(vec![TextRun::new("Nested \u{F0E0}")]).with_level(2),
        ]);
        let shape = SourceShape::new(ShapeKind::Placeholder, Geometry::new(0, HEIGHT, 10, 10))
            .with_text_frame(frame);

        let record = extract_slide_content(&slide_of(vec![shape]), 3, Some(WIDTH), Some(HEIGHT));
        let text = record.shapes[0].as_text().expect("text shape");

        assert_eq!(text.text, "• First\n   \nNested →");
        assert_eq!(text.paragraphs.len(), 2);
        assert_eq!(text.paragraphs[0].text, "• First");
        assert_eq!(text.paragraphs[0].alignment, Alignment::Center);
        assert_eq!(text.paragraphs[0].font.as_ref(), Some(&bold));
        assert_eq!(text.paragraphs[1].text, "Nested →");
        assert_eq!(text.paragraphs[1].level, 2);
        assert_eq!(text.paragraphs[1].alignment, Alignment::Left);
        assert_eq!(text.font.as_ref(), Some(&bold));
        assert_eq!(text.alignment, Alignment::Center);
        assert!(text.paragraphs.iter().all(|p| !p.text.is_empty()));
    }

    #[test]
    fn test_flat_text_synthesizes_one_paragraph() {
        let shape = SourceShape::new(ShapeKind::Other, Geometry::default()).with_plain_text("  Caption ");
        let record = extract_slide_content(&slide_of(vec![shape]), 1, None, None);
        let text = record.shapes[0].as_text().expect("text shape");
        assert_eq!(text.paragraphs, vec![ParagraphRecord::plain("Caption")]);
        assert_eq!(text.font, None);
    }

    #[test]
    fn test_text_takes_priority_over_autoshape() {
        let shape = SourceShape::new(ShapeKind::AutoShape, Geometry::new(0, HEIGHT, 1, 1))
            .with_preset("rightArrow")
            .with_text_frame(TextFrame::new(vec![SourceParagraph::new(vec![TextRun::new(
                "Next",
            )])]));
        let record = extract_slide_content(&slide_of(vec![shape]), 1, Some(WIDTH), Some(HEIGHT));
        assert_eq!(record.shapes[0].kind(), "text");
    }

    #[test]
    fn test_whitespace_only_text_falls_through() {
        let shape = SourceShape::new(ShapeKind::AutoShape, Geometry::new(0, 0, 1, 1))
            .with_preset("ellipse")
            .with_text_frame(TextFrame::new(vec![SourceParagraph::new(vec![TextRun::new(
                "  ",
            )])]));
        let record = extract_slide_content(&slide_of(vec![shape]), 1, Some(WIDTH), Some(HEIGHT));
        match &record.shapes[0].content {
            ShapeContent::AutoShape {
                autoshape_type,
                autoshape_type_value,
            } => {
                assert_eq!(autoshape_type, "OVAL");
                assert_eq!(*autoshape_type_value, 9);
            }
            other => panic!("expected autoshape, got {:?}", other),
        }
    }

    #[test]
    fn test_autoshape_sentinel() {
        let shape = SourceShape::new(ShapeKind::AutoShape, Geometry::default()).with_preset("mystery");
        let record = extract_slide_content(&slide_of(vec![shape]), 1, None, None);
        match &record.shapes[0].content {
            ShapeContent::AutoShape {
                autoshape_type,
                autoshape_type_value,
            } => {
                assert_eq!(autoshape_type, "UNKNOWN");
                assert_eq!(*autoshape_type_value, 0);
            }
            other => panic!("expected autoshape, got {:?}", other),
        }
    }

    #[test]
    fn test_picture_formats() {
        let png = SourceShape::new(ShapeKind::Picture, Geometry::default())
            .with_image(ImageData::Bytes(vec![0x89, 0x50, 0x4E, 0x47, 0x00]));
        let jpeg = SourceShape::new(ShapeKind::Picture, Geometry::default())
            .with_image(ImageData::Bytes(vec![0xFF, 0xD8, 0x00]));
        let other = SourceShape::new(ShapeKind::Picture, Geometry::default())
            .with_image(ImageData::Bytes(b"BM".to_vec()));
        let record = extract_slide_content(&slide_of(vec![png, jpeg, other]), 1, None, None);

        let uris: Vec<_> = record
            .shapes
            .iter()
            .map(|s| match &s.content {
                ShapeContent::Picture { image_data } => image_data.clone().unwrap_or_default(),
                _ => String::new(),
            })
            .collect();
        assert!(uris[0].starts_with("data:image/png;base64,"));
        assert!(uris[1].starts_with("data:image/jpeg;base64,"));
        assert!(uris[2].starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_unreadable_picture_is_degraded_not_dropped() {
        let broken = SourceShape::new(ShapeKind::Picture, Geometry::new(1, 2, 3, 4))
            .with_image(ImageData::Unavailable("missing part".into()));
        let placeholder_picture = SourceShape::new(ShapeKind::Placeholder, Geometry::default())
            .with_image(ImageData::Bytes(vec![0xFF, 0xD8]));
        let record =
            extract_slide_content(&slide_of(vec![broken, placeholder_picture]), 1, None, None);

        assert_eq!(record.shapes.len(), 2);
        assert!(matches!(
            record.shapes[0].content,
            ShapeContent::Picture { image_data: None }
        ));
        assert_eq!(record.shapes[0].geometry, Geometry::new(1, 2, 3, 4));
        assert_eq!(record.shapes[1].kind(), "picture");
    }

    #[test]
    fn test_notes_trimmed_and_filtered() {
        let mut slide = slide_of(vec![text_box("Title", 0)]);
        slide.notes = Some("  Speak slowly \n".into());

        let mut presentation = SourcePresentation::new(Some(WIDTH), Some(HEIGHT));
        presentation.add_slide(slide.clone());
        presentation.add_slide(slide_of(Vec::new()));

        let with_notes =
            extract_presentation(&presentation, &ConvertOptions::new().with_include_notes(true));
        assert_eq!(with_notes[0].notes, "Speak slowly");
        assert_eq!(with_notes[1].notes, "");
        assert_eq!(with_notes[1].number, 2);

        let without = extract_presentation(&presentation, &ConvertOptions::new());
        assert!(without.iter().all(|s| s.notes.is_empty()));
        assert_eq!(extract_slide_content(&slide, 1, None, None).notes, "Speak slowly");
    }
}
