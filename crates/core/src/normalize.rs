//! Special-character normalization for presentation text.
//!
//! Symbol-font glyphs (Wingdings and friends) are stored as private-use-area
//! code points. They render as boxes outside the authoring application, so
//! they are mapped to their standard Unicode equivalents.

/// Private-use code points and their standard replacements.
pub const SPECIAL_CHARS: [(char, char); 8] = [
    ('\u{F0E0}', '\u{2192}'), // right arrow
    ('\u{F0D8}', '\u{2190}'), // left arrow
    ('\u{F0D9}', '\u{2191}'), // up arrow
    ('\u{F0DA}', '\u{2193}'), // down arrow
    ('\u{F0A7}', '\u{2022}'), // bullet (alternative)
    ('\u{F0B7}', '\u{2022}'), // bullet
    ('\u{F0FC}', '\u{2713}'), // check mark
    ('\u{F0FB}', '\u{2717}'), // cross mark
];

fn replacement_for(c: char) -> char {
    SPECIAL_CHARS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Replace private-use symbol glyphs with standard characters.
///
/// No replacement target is itself a source code point, so applying this
/// twice yields the same text.
pub fn replace_special_chars(text: &str) -> String {
    text.chars().map(replacement_for).collect()
}

/// Replace special characters, then trim surrounding whitespace.
pub fn normalize_text(text: &str) -> String {
    replace_special_chars(text).trim().to_string()
}
