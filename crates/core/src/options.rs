//! Conversion settings.

/// Options controlling a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Whether speaker notes are carried into the rendered site.
    pub include_notes: bool,
}

impl ConvertOptions {
    /// Create options with notes excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether speaker notes are included.
    pub fn with_include_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }
}
