//! Static site rendering.
//!
//! Slide records become one HTML document built with `maud`; the stylesheet
//! and navigation script are fixed assets compiled into the crate.

use crate::navigation::NavState;
use crate::site::Site;
use crate::source::{Font, Geometry, EMU_PER_POINT};
use crate::types::{ParagraphRecord, ShapeContent, ShapeRecord, SlideRecord, TextContent};
use maud::{html, Markup, DOCTYPE};

/// Stylesheet written as `styles.css`.
pub const STYLESHEET: &str = include_str!("../assets/styles.css");

/// Navigation script written as `script.js`.
pub const SCRIPT: &str = include_str!("../assets/script.js");

/// Indentation per outline level, in `em`.
const LEVEL_INDENT_EM: f64 = 1.5;

/// Renders slide records into a [`Site`].
#[derive(Debug, Clone)]
pub struct SiteRenderer {
    /// Document title, shown in the browser tab.
    title: String,
    include_notes: bool,
}

impl SiteRenderer {
    /// Create a renderer for a deck with the given page title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            include_notes: false,
        }
    }

    /// Set whether speaker notes are rendered.
    pub fn with_include_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }

    /// Render the three site artifacts.
    pub fn render(&self, slides: &[SlideRecord]) -> Site {
        Site {
            markup: self.page(slides).into_string(),
            stylesheet: STYLESHEET.to_string(),
            script: SCRIPT.to_string(),
        }
    }

    fn page(&self, slides: &[SlideRecord]) -> Markup {
        let nav = NavState::initial(slides.len());
        let progress = format!("width: {}%;", format_number(nav.progress_percent()));

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (self.title) }
                    link rel="stylesheet" href="styles.css";
                }
                body {
                    main.presentation {
                        div.slides {
                            @for (idx, slide) in slides.iter().enumerate() {
                                (self.slide(slide, idx + 1 == nav.current()))
                            }
                        }
                        nav.controls {
                            button id="prev-btn" class="nav-button" type="button" aria-label="Previous slide" disabled[nav.previous_disabled()] {
                                "‹ Previous"
                            }
                            span.slide-counter {
                                span id="current-slide" { (nav.current()) }
                                " / "
                                span id="total-slides" { (nav.total()) }
                            }
                            button id="next-btn" class="nav-button" type="button" aria-label="Next slide" disabled[nav.next_disabled()] {
                                "Next ›"
                            }
                        }
                    }
                    div.progress {
                        div id="progress-bar" class="progress-bar" style=(progress) {}
                    }
                    script src="script.js" {}
                }
            }
        }
    }

    fn slide(&self, slide: &SlideRecord, active: bool) -> Markup {
        let positioned = slide.has_dimensions();
        let canvas_class = if positioned {
            "slide-canvas"
        } else {
            "slide-canvas flow"
        };
        let canvas_style = match (slide.slide_width, slide.slide_height) {
            (Some(w), Some(h)) if positioned => Some(format!("aspect-ratio: {} / {};", w, h)),
            _ => None,
        };

        html! {
            section
                id={ "slide-" (slide.number) }
                class=(if active { "slide active" } else { "slide" })
                data-slide=(slide.number)
                hidden[!active]
            {
                div class=(canvas_class) style=[canvas_style] {
                    @for shape in &slide.shapes {
                        (self.shape(shape, slide))
                    }
                }
                @if self.include_notes && !slide.notes.is_empty() {
                    aside.notes {
                        h2 { "Speaker Notes" }
                        p { (slide.notes) }
                    }
                }
            }
        }
    }

    fn shape(&self, shape: &ShapeRecord, slide: &SlideRecord) -> Markup {
        let placement = placement_style(&shape.geometry, slide);
        let position_class = if placement.is_some() {
            "positioned"
        } else {
            "unplaced"
        };

        match &shape.content {
            ShapeContent::Text(text) if text.is_title => {
                let style = join_styles([placement, text_style(text, slide.slide_width)]);
                html! {
                    h1 class={ "shape slide-title " (position_class) } style=[style] {
                        @for (i, para) in text.paragraphs.iter().enumerate() {
                            @if i > 0 { br; }
                            (para.text)
                        }
                    }
                }
            }
            ShapeContent::Text(text) => {
                html! {
                    div class={ "shape text-shape " (position_class) } style=[placement] {
                        @for para in &text.paragraphs {
                            p style=[paragraph_style(para, slide.slide_width)] { (para.text) }
                        }
                    }
                }
            }
            ShapeContent::Picture { image_data } => {
                let alt = format!("Slide {} image", slide.number);
                html! {
                    @if let Some(uri) = image_data {
                        div class={ "shape picture " (position_class) } style=[placement] {
                            img src=(uri) alt=(alt);
                        }
                    } @else {
                        div class={ "shape picture missing " (position_class) } style=[placement] {}
                    }
                }
            }
            ShapeContent::AutoShape {
                autoshape_type,
                autoshape_type_value,
            } => {
                // Without a position an empty box carries no information.
                html! {
                    @if let Some(style) = placement {
                        div class="shape autoshape positioned"
                            data-autoshape=(autoshape_type)
                            data-autoshape-value=(autoshape_type_value)
                            style=(style) {}
                    }
                }
            }
            ShapeContent::Unknown => html! {},
        }
    }
}

/// Absolute placement as percentages of the slide, when both the slide size
/// and the shape geometry are fully known.
fn placement_style(geometry: &Geometry, slide: &SlideRecord) -> Option<String> {
    let (slide_w, slide_h) = match (slide.slide_width, slide.slide_height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as f64, h as f64),
        _ => return None,
    };
    let (left, top, width, height) = geometry.complete()?;

    Some(format!(
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        format_number(left as f64 / slide_w * 100.0),
        format_number(top as f64 / slide_h * 100.0),
        format_number(width as f64 / slide_w * 100.0),
        format_number(height as f64 / slide_h * 100.0),
    ))
}

fn text_style(text: &TextContent, slide_width: Option<i64>) -> Option<String> {
    let mut parts = font_declarations(text.font.as_ref(), slide_width);
    if let Some(align) = text.alignment.css() {
        parts.push(format!("text-align: {};", align));
    }
    none_if_empty(parts.join(" "))
}

fn paragraph_style(para: &ParagraphRecord, slide_width: Option<i64>) -> Option<String> {
    let mut parts = font_declarations(para.font.as_ref(), slide_width);
    if let Some(align) = para.alignment.css() {
        parts.push(format!("text-align: {};", align));
    }
    if para.level > 0 {
        parts.push(format!(
            "padding-left: {}em;",
            format_number(para.level as f64 * LEVEL_INDENT_EM)
        ));
    }
    none_if_empty(parts.join(" "))
}

/// CSS declarations for a run font. Sizes scale with the slide canvas when
/// the slide width is known.
fn font_declarations(font: Option<&Font>, slide_width: Option<i64>) -> Vec<String> {
    let mut parts = Vec::new();
    let Some(font) = font else {
        return parts;
    };

    if let Some(size) = font.size.filter(|s| *s > 0.0) {
        match slide_width.filter(|w| *w > 0) {
            Some(width) => parts.push(format!(
                "font-size: {}cqw;",
                format_number(size * EMU_PER_POINT / width as f64 * 100.0)
            )),
            None => parts.push(format!("font-size: {}pt;", format_number(size))),
        }
    }
    if let Some(name) = font.name.as_deref().map(sanitize_font_name) {
        if !name.is_empty() {
            parts.push(format!("font-family: '{}', sans-serif;", name));
        }
    }
    match font.bold {
        Some(true) => parts.push("font-weight: bold;".to_string()),
        Some(false) => parts.push("font-weight: normal;".to_string()),
        None => {}
    }
    if font.italic == Some(true) {
        parts.push("font-style: italic;".to_string());
    }
    parts
}

/// Strip characters that could break out of a quoted CSS string.
fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '{' | '}' | '\\' | '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn join_styles<const N: usize>(styles: [Option<String>; N]) -> Option<String> {
    none_if_empty(styles.into_iter().flatten().collect::<Vec<_>>().join(" "))
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Format with at most three decimals and no trailing zeros.
fn format_number(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Alignment;

    const WIDTH: i64 = 9_144_000;
    const HEIGHT: i64 = 6_858_000;

    fn text_shape(text: &str, is_title: bool, geometry: Geometry) -> ShapeRecord {
        ShapeRecord::new(
            geometry,
            ShapeContent::Text(TextContent {
                text: text.to_string(),
                paragraphs: text.lines().map(ParagraphRecord::plain).collect(),
                font: None,
                alignment: Alignment::Left,
                is_title,
            }),
        )
    }

    fn titled_slide(number: usize, notes: &str) -> SlideRecord {
        let title = format!("Slide {}", number);
        SlideRecord {
            number,
            title: title.clone(),
            shapes: vec![text_shape(
                &title,
                true,
                Geometry::new(457_200, 274_638, 8_229_600, 1_143_000),
            )],
            notes: notes.to_string(),
            slide_width: Some(WIDTH),
            slide_height: Some(HEIGHT),
        }
    }

    #[test]
    fn test_five_slide_deck() {
        let slides: Vec<_> = (1..=5).map(|i| titled_slide(i, "")).collect();
        let site = SiteRenderer::new("deck").render(&slides);
        let html = &site.markup;

        assert!(html.starts_with("<!DOCTYPE html>"));
        for i in 1..=5 {
            assert!(html.contains(&format!("Slide {}", i)));
        }
        assert_eq!(html.matches("<section").count(), 5);
        assert_eq!(html.matches("class=\"slide active\"").count(), 1);
        assert_eq!(html.matches("class=\"slide\"").count(), 4);

        let first = html.find("id=\"slide-1\"").expect("slide 1");
        let active = html.find("class=\"slide active\"").expect("active slide");
        let second = html.find("id=\"slide-2\"").expect("slide 2");
        assert!(first < active && active < second);
    }

    #[test]
    fn test_references_assets() {
        let site = SiteRenderer::new("deck").render(&[titled_slide(1, "")]);
        assert!(site.markup.contains("href=\"styles.css\""));
        assert!(site.markup.contains("src=\"script.js\""));
        assert_eq!(site.stylesheet, STYLESHEET);
        assert_eq!(site.script, SCRIPT);
    }

    #[test]
    fn test_notes_hidden_unless_included() {
        let slides = vec![titled_slide(1, "Secret speaker hint")];

        let without = SiteRenderer::new("deck").render(&slides);
        assert!(!without.markup.contains("Secret speaker hint"));
        assert!(!without.markup.contains("Speaker Notes"));

        let with = SiteRenderer::new("deck")
            .with_include_notes(true)
            .render(&slides);
        assert!(with.markup.contains("Secret speaker hint"));
    }

    #[test]
    fn test_initial_controls_state() {
        let slides: Vec<_> = (1..=4).map(|i| titled_slide(i, "")).collect();
        let html = SiteRenderer::new("deck").render(&slides).markup;
        assert!(html.contains("style=\"width: 25%;\""));
        assert!(html.contains("<span id=\"total-slides\">4</span>"));
        let prev = html.find("id=\"prev-btn\"").expect("prev button");
        let prev_tag_end = prev + html[prev..].find('>').expect("tag end");
        assert!(html[prev..prev_tag_end].contains("disabled"));
        let next = html.find("id=\"next-btn\"").expect("next button");
        let next_tag_end = next + html[next..].find('>').expect("tag end");
        assert!(!html[next..next_tag_end].contains("disabled"));
    }

    #[test]
    fn test_page_title_and_escaping() {
        let mut slide = titled_slide(1, "");
        slide.shapes.push(text_shape(
            "<script>alert(1)</script> & more",
            false,
            Geometry::default(),
        ));
        let html = SiteRenderer::new("Q3 <Review>").render(&[slide]).markup;
        assert!(html.contains("<title>Q3 &lt;Review&gt;</title>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_positioned_shapes() {
        let slide = SlideRecord {
            number: 1,
            title: String::new(),
            shapes: vec![text_shape(
                "Body",
                false,
                Geometry::new(WIDTH / 4, HEIGHT / 2, WIDTH / 2, HEIGHT / 4),
            )],
            notes: String::new(),
            slide_width: Some(WIDTH),
            slide_height: Some(HEIGHT),
        };
        let html = SiteRenderer::new("deck").render(&[slide]).markup;
        assert!(html.contains("aspect-ratio: 9144000 / 6858000;"));
        assert!(html.contains("left: 25%; top: 50%; width: 50%; height: 25%;"));
        assert!(html.contains("shape text-shape positioned"));
    }

    #[test]
    fn test_flow_layout_without_dimensions() {
        let slide = SlideRecord {
            number: 1,
            title: String::new(),
            shapes: vec![
                text_shape("Body", false, Geometry::new(0, 0, 10, 10)),
                ShapeRecord::new(
                    Geometry::new(0, 0, 10, 10),
                    ShapeContent::AutoShape {
                        autoshape_type: "RECTANGLE".into(),
                        autoshape_type_value: 1,
                    },
                ),
            ],
            notes: String::new(),
            slide_width: None,
            slide_height: None,
        };
        let html = SiteRenderer::new("deck").render(&[slide]).markup;
        assert!(html.contains("slide-canvas flow"));
        assert!(html.contains("shape text-shape unplaced"));
        assert!(!html.contains("data-autoshape"));
    }

    #[test]
    fn test_pictures_and_autoshapes() {
        let slide = SlideRecord {
            number: 2,
            title: String::new(),
            shapes: vec![
                ShapeRecord::new(
                    Geometry::new(0, 0, WIDTH, HEIGHT),
                    ShapeContent::Picture {
                        image_data: Some("data:image/png;base64,AAAA".into()),
                    },
                ),
                ShapeRecord::new(
                    Geometry::new(0, 0, 100, 100),
                    ShapeContent::Picture { image_data: None },
                ),
                ShapeRecord::new(
                    Geometry::new(0, 0, 100, 100),
                    ShapeContent::AutoShape {
                        autoshape_type: "RIGHT_ARROW".into(),
                        autoshape_type_value: 33,
                    },
                ),
                ShapeRecord::new(Geometry::new(0, 0, 100, 100), ShapeContent::Unknown),
            ],
            notes: String::new(),
            slide_width: Some(WIDTH),
            slide_height: Some(HEIGHT),
        };
        let html = SiteRenderer::new("deck").render(&[slide]).markup;
        assert!(html.contains("<img src=\"data:image/png;base64,AAAA\" alt=\"Slide 2 image\">"));
        assert!(html.contains("shape picture missing positioned"));
        assert!(html.contains("data-autoshape=\"RIGHT_ARROW\""));
        assert!(html.contains("data-autoshape-value=\"33\""));
    }

    #[test]
    fn test_paragraph_formatting() {
        let para = ParagraphRecord {
            text: "Indented".into(),
            level: 2,
            alignment: Alignment::Center,
            font: Some(Font {
                size: Some(24.0),
                name: Some("Segoe \"UI\"; x".into()),
                bold: Some(true),
                italic: Some(true),
            }),
        };
        let style = paragraph_style(&para, None).expect("style");
        assert_eq!(
            style,
            "font-size: 24pt; font-family: 'Segoe UI x', sans-serif; font-weight: bold; \
             font-style: italic; text-align: center; padding-left: 3em;"
        );

        // 24pt on a 10in slide: 24 * 12700 / 9144000 * 100
        let scaled = paragraph_style(&para, Some(WIDTH)).expect("style");
        assert!(scaled.starts_with("font-size: 3.333cqw;"));

        assert_eq!(paragraph_style(&ParagraphRecord::plain("x"), None).as_deref(), Some("text-align: left;"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(33.333333), "33.333");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn test_render_is_deterministic() {
        let slides: Vec<_> = (1..=3).map(|i| titled_slide(i, "n")).collect();
        let renderer = SiteRenderer::new("deck").with_include_notes(true);
        assert_eq!(renderer.render(&slides).markup, renderer.render(&slides).markup);
    }

    #[test]
    fn test_title_line_breaks_preserved() {
        let block_start = STYLESHEET.find(".slide-title {").expect("title rule");
        let block_end = block_start + STYLESHEET[block_start..].find('}').expect("rule end");
        assert!(STYLESHEET[block_start..block_end].contains("white-space: pre-wrap;"));

        let mut slide = titled_slide(1, "");
        slide.shapes[0] = ShapeRecord::new(
            Geometry::new(0, 0, 10, 10),
            ShapeContent::Text(TextContent {
                text: "Two\nlines".to_string(),
                paragraphs: vec![ParagraphRecord::plain("Two\nlines")],
                font: None,
                alignment: Alignment::Left,
                is_title: true,
            }),
        );
        let html = SiteRenderer::new("deck").render(&[slide]).markup;
        assert!(html.contains("Two\nlines</h1>"));
    }
}
