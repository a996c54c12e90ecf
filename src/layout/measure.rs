//! Text measurement collaborator

use super::types::FontStyle;

/// Metrics of a run of text in a given font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    /// Line height used as the text box height
    pub advance_height: f64,
    /// Distance from the baseline to the bottom of the box
    pub descent: f64,
}

/// Measures text for layout. Implementations must be deterministic.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontStyle) -> TextMetrics;
}

/// Character-count estimate, good enough without access to font files.
///
/// Width is `chars * size * char_width`, the box is `size * line_height`
/// tall and the descent is a fixed fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasure {
    pub char_width: f64,
    pub line_height: f64,
    pub descent: f64,
}

impl Default for EstimatedTextMeasure {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            line_height: 1.2,
            descent: 0.25,
        }
    }
}

impl TextMeasure for EstimatedTextMeasure {
    fn measure(&self, text: &str, font: &FontStyle) -> TextMetrics {
        let chars = text.chars().count() as f64;
        TextMetrics {
            width: chars * font.size * self.char_width,
            advance_height: font.size * self.line_height,
            descent: font.size * self.descent,
        }
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, font: &FontStyle) -> TextMetrics {
        (**self).measure(text, font)
    }
}
