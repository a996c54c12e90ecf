//! SVG output options

/// Options for the document produced by [`render_svg`](super::render_svg)
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Space left around the root box in the viewBox
    pub margin: f64,
    /// Emit the `<?xml ...?>` declaration
    pub standalone: bool,
    /// One element per line, nested elements indented by `indent` spaces.
    /// When false the document is a single line.
    pub pretty_print: bool,
    pub indent: usize,
    /// Prepended to every generated class name; empty for none
    pub class_prefix: String,
    /// Stroke for connectors that do not set their own
    pub connector_stroke: String,
    pub connector_width: f64,
    /// Arrowhead size in multiples of the connector stroke width
    pub arrow_size: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            standalone: true,
            pretty_print: true,
            indent: 2,
            class_prefix: "trellis-".to_string(),
            connector_stroke: "#333".to_string(),
            connector_width: 2.0,
            arrow_size: 4.0,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn without_class_prefix(self) -> Self {
        self.with_class_prefix("")
    }

    /// Default connector stroke colour and width
    pub fn with_connector_stroke(mut self, stroke: impl Into<String>, width: f64) -> Self {
        self.connector_stroke = stroke.into();
        self.connector_width = width;
        self
    }

    pub fn with_arrow_size(mut self, size: f64) -> Self {
        self.arrow_size = size;
        self
    }

    /// Leading whitespace for an element nested `depth` levels deep
    pub(crate) fn indentation(&self, depth: usize) -> String {
        if self.pretty_print {
            " ".repeat(self.indent * depth)
        } else {
            String::new()
        }
    }

    pub(crate) fn line_break(&self) -> &'static str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_pretty_standalone_documents() {
        let config = SvgConfig::default();
        assert!(config.standalone);
        assert_eq!(config.indentation(2), "    ");
        assert_eq!(config.line_break(), "\n");
        assert_eq!(config.class_prefix, "trellis-");
    }

    #[test]
    fn test_compact_has_no_whitespace() {
        let config = SvgConfig::new().with_pretty_print(false).with_indent(8);
        assert_eq!(config.indentation(3), "");
        assert_eq!(config.line_break(), "");
    }

    #[test]
    fn test_builders() {
        let config = SvgConfig::new()
            .with_margin(10.0)
            .with_connector_stroke("red", 1.5)
            .with_arrow_size(6.0)
            .without_class_prefix();

        assert_eq!(config.margin, 10.0);
        assert_eq!(config.connector_stroke, "red");
        assert_eq!(config.connector_width, 1.5);
        assert_eq!(config.arrow_size, 6.0);
        assert_eq!(config.class_prefix, "");
    }
}
