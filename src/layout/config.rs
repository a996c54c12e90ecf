//! Configuration for the layout engine

use super::types::{FontStyle, SizeInterval};

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Interval offered to the root node
    pub canvas: SizeInterval,

    /// Fallback spacing for rows and columns that name neither spacing nor a
    /// total. When unset such sequences are malformed.
    pub default_spacing: Option<f64>,

    /// Font for text nodes that do not set one
    pub default_font: FontStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: SizeInterval::bounded(500.0, 500.0),
            default_spacing: None,
            default_font: FontStyle::default(),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `[0, width] x [0, height]` to the root
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas = SizeInterval::bounded(width, height);
        self
    }

    pub fn with_canvas(mut self, canvas: SizeInterval) -> Self {
        self.canvas = canvas;
        self
    }

    /// Set the fallback spacing for sequences
    pub fn with_default_spacing(mut self, spacing: f64) -> Self {
        self.default_spacing = Some(spacing);
        self
    }

    pub fn with_default_font(mut self, font: FontStyle) -> Self {
        self.default_font = font;
        self
    }
}
