//! Autoshape type resolution.
//!
//! Maps DrawingML preset geometry names to the symbolic names and numeric
//! codes of the Office `MsoAutoShapeType` enumeration.

/// Sentinel used when a preset cannot be resolved.
pub const UNKNOWN_AUTOSHAPE: AutoShapeType = AutoShapeType {
    name: "UNKNOWN",
    code: 0,
};

/// A resolved autoshape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoShapeType {
    pub name: &'static str,
    pub code: u32,
}

const PRESETS: &[(&str, &str, u32)] = &[
    ("rect", "RECTANGLE", 1),
    ("parallelogram", "PARALLELOGRAM", 2),
    ("trapezoid", "TRAPEZOID", 3),
    ("diamond", "DIAMOND", 4),
    ("roundRect", "ROUNDED_RECTANGLE", 5),
    ("octagon", "OCTAGON", 6),
    ("triangle", "ISOSCELES_TRIANGLE", 7),
    ("rtTriangle", "RIGHT_TRIANGLE", 8),
    ("ellipse", "OVAL", 9),
    ("hexagon", "HEXAGON", 10),
    ("plus", "CROSS", 11),
    ("pentagon", "REGULAR_PENTAGON", 12),
    ("can", "CAN", 13),
    ("cube", "CUBE", 14),
    ("bevel", "BEVEL", 15),
    ("foldedCorner", "FOLDED_CORNER", 16),
    ("smileyFace", "SMILEY_FACE", 17),
    ("donut", "DONUT", 18),
    ("noSmoking", "NO_SYMBOL", 19),
    ("blockArc", "BLOCK_ARC", 20),
    ("heart", "HEART", 21),
    ("lightningBolt", "LIGHTNING_BOLT", 22),
    ("sun", "SUN", 23),
    ("moon", "MOON", 24),
    ("arc", "ARC", 25),
    ("bracketPair", "DOUBLE_BRACKET", 26),
    ("bracePair", "DOUBLE_BRACE", 27),
    ("plaque", "PLAQUE", 28),
    ("leftBracket", "LEFT_BRACKET", 29),
    ("rightBracket", "RIGHT_BRACKET", 30),
    ("leftBrace", "LEFT_BRACE", 31),
    ("rightBrace", "RIGHT_BRACE", 32),
    ("rightArrow", "RIGHT_ARROW", 33),
    ("leftArrow", "LEFT_ARROW", 34),
    ("upArrow", "UP_ARROW", 35),
    ("downArrow", "DOWN_ARROW", 36),
    ("leftRightArrow", "LEFT_RIGHT_ARROW", 37),
    ("upDownArrow", "UP_DOWN_ARROW", 38),
    ("quadArrow", "QUAD_ARROW", 39),
    ("leftRightUpArrow", "LEFT_RIGHT_UP_ARROW", 40),
    ("bentArrow", "BENT_ARROW", 41),
    ("uturnArrow", "U_TURN_ARROW", 42),
    ("leftUpArrow", "LEFT_UP_ARROW", 43),
    ("bentUpArrow", "BENT_UP_ARROW", 44),
    ("curvedRightArrow", "CURVED_RIGHT_ARROW", 45),
    ("curvedLeftArrow", "CURVED_LEFT_ARROW", 46),
    ("curvedUpArrow", "CURVED_UP_ARROW", 47),
    ("curvedDownArrow", "CURVED_DOWN_ARROW", 48),
    ("stripedRightArrow", "STRIPED_RIGHT_ARROW", 49),
    ("notchedRightArrow", "NOTCHED_RIGHT_ARROW", 50),
    ("homePlate", "PENTAGON", 51),
    ("chevron", "CHEVRON", 52),
];

/// Resolve a preset geometry name. Returns `None` for unmapped presets.
pub fn resolve(preset: &str) -> Option<AutoShapeType> {
    PRESETS
        .iter()
        .find(|(prst, _, _)| *prst == preset)
        .map(|&(_, name, code)| AutoShapeType { name, code })
}

/// Resolve a preset, substituting [`UNKNOWN_AUTOSHAPE`] on failure.
pub fn resolve_or_unknown(preset: Option<&str>) -> AutoShapeType {
    match preset.and_then(resolve) {
        Some(resolved) => resolved,
        None => {
            log::debug!("Unresolved autoshape preset {:?}, using sentinel", preset);
            UNKNOWN_AUTOSHAPE
        }
    }
}
