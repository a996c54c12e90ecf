//! SVG generation from resolved diagrams

use crate::layout::{
    BoundingBox, ConnectorGeometry, Diagram, FontStyle, NodeKind, NodeView, Painter, Point,
    Resolved, Style,
};

use super::SvgConfig;

/// Paints nodes as SVG elements, one line per element.
///
/// Composite nodes become `<g>` elements translated by their own position,
/// so every fragment is expressed in its parent's frame.
pub struct SvgPainter {
    prefix: String,
    indent: String,
    connector_stroke: String,
    connector_width: f64,
}

impl SvgPainter {
    pub fn new(config: &SvgConfig) -> Self {
        Self {
            prefix: escape_xml(&config.class_prefix),
            indent: " ".repeat(config.indent),
            connector_stroke: escape_xml(&config.connector_stroke),
            connector_width: config.connector_width,
        }
    }

    /// Stroke attributes for a connector, falling back to the configured defaults
    fn connector_styles(&self, style: &Style) -> String {
        let stroke = match &style.stroke {
            Some(stroke) => escape_xml(stroke),
            None => self.connector_stroke.clone(),
        };
        format!(
            r#" stroke="{}" stroke-width="{}""#,
            stroke,
            style.stroke_width.unwrap_or(self.connector_width)
        )
    }

    fn class_list(&self, kind: &str, style: &Style) -> String {
        std::iter::once(format!("{}{}", self.prefix, kind))
            .chain(style.css_classes.iter().map(|class| escape_xml(class)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn shape_classes(&self, kind: &str, style: &Style) -> String {
        format!("{}shape {}", self.prefix, self.class_list(kind, style))
    }
}

impl Painter for SvgPainter {
    type Fragment = Vec<String>;

    fn paint_node(
        &self,
        node: &NodeView<'_>,
        bounds: BoundingBox,
        children: Vec<Vec<String>>,
    ) -> Vec<String> {
        let id_attr = node
            .name
            .map(|name| format!(r#" id="{}""#, escape_xml(name)))
            .unwrap_or_default();
        let styles = format_styles(node.style);
        let kind = node.kind.name();

        match node.kind {
            NodeKind::Rect { .. } => vec![format!(
                r#"<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                id_attr,
                self.shape_classes(kind, node.style),
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                styles
            )],
            NodeKind::Circle { .. } => {
                let center = bounds.center();
                vec![format!(
                    r#"<circle{} class="{}" cx="{}" cy="{}" r="{}"{}/>"#,
                    id_attr,
                    self.shape_classes(kind, node.style),
                    center.x,
                    center.y,
                    bounds.width.min(bounds.height) / 2.0,
                    styles
                )]
            }
            NodeKind::Text { contents, .. } => {
                let (font_attrs, descent) = match node.text {
                    Some(measured) => (format_font(&measured.font), measured.metrics.descent),
                    None => (String::new(), 0.0),
                };
                vec![format!(
                    r#"<text{} class="{}" x="{}" y="{}"{}{}>{}</text>"#,
                    id_attr,
                    self.shape_classes(kind, node.style),
                    bounds.x,
                    bounds.bottom() - descent,
                    font_attrs,
                    styles,
                    escape_xml(contents)
                )]
            }
            NodeKind::Path { points } => {
                let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
                let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
                let points_str = points
                    .iter()
                    .map(|p| format!("{},{}", bounds.x + p.x - min_x, bounds.y + p.y - min_y))
                    .collect::<Vec<_>>()
                    .join(" ");
                vec![format!(
                    r#"<polygon{} class="{}" points="{}"{}/>"#,
                    id_attr,
                    self.shape_classes(kind, node.style),
                    points_str,
                    styles
                )]
            }
            _ => {
                let mut lines = vec![format!(
                    r#"<g{} class="{}" transform="translate({}, {})"{}>"#,
                    id_attr,
                    self.class_list(kind, node.style),
                    bounds.x,
                    bounds.y,
                    styles
                )];
                lines.extend(
                    children
                        .into_iter()
                        .flatten()
                        .map(|line| format!("{}{}", self.indent, line)),
                );
                lines.push("</g>".to_string());
                lines
            }
        }
    }

    fn paint_connector(&self, geometry: &ConnectorGeometry, style: &Style) -> Vec<String> {
        let marker = if geometry.directed {
            format!(r#" marker-end="url(#{}arrow)""#, self.prefix)
        } else {
            String::new()
        };
        vec![format!(
            r#"<path class="{}" d="{}" fill="none"{}{}/>"#,
            self.class_list("connection", style),
            path_to_d(&[geometry.from, geometry.to]),
            self.connector_styles(style),
            marker
        )]
    }
}

/// Render a resolved diagram to an SVG string
pub fn render_svg(diagram: &Diagram<Resolved>, config: &SvgConfig) -> String {
    let painter = SvgPainter::new(config);
    let body = diagram.paint(&painter);

    let root = diagram.tree().data(diagram.tree().root).local_bounds();
    let margin = config.margin;
    let nl = config.line_break();
    let emit = |svg: &mut String, depth: usize, line: &str| {
        svg.push_str(&config.indentation(depth));
        svg.push_str(if config.pretty_print { line } else { line.trim_start() });
        svg.push_str(nl);
    };

    let mut svg = String::new();
    if config.standalone {
        emit(&mut svg, 0, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    }
    emit(
        &mut svg,
        0,
        &format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            root.x - margin,
            root.y - margin,
            root.width + 2.0 * margin,
            root.height + 2.0 * margin
        ),
    );

    if diagram.connectors().iter().any(|c| c.directed) {
        let prefix = painter.prefix.as_str();
        let size = config.arrow_size;
        emit(&mut svg, 1, "<defs>");
        emit(
            &mut svg,
            2,
            &format!(
                r#"<marker id="{prefix}arrow" viewBox="0 0 10 10" refX="8" refY="5" markerWidth="{size}" markerHeight="{size}" markerUnits="strokeWidth" orient="auto">"#
            ),
        );
        emit(&mut svg, 3, r#"<path d="M0,0 L10,5 L0,10 Z" fill="context-stroke"/>"#);
        emit(&mut svg, 2, "</marker>");
        emit(&mut svg, 1, "</defs>");
    }

    for line in &body {
        emit(&mut svg, 1, line);
    }
    svg.push_str("</svg>");
    svg
}

fn format_font(font: &FontStyle) -> String {
    let mut parts = vec![
        format!(r#" font-family="{}""#, escape_xml(&font.family)),
        format!(r#" font-size="{}""#, font.size),
    ];
    if let Some(weight) = &font.weight {
        parts.push(format!(r#" font-weight="{}""#, escape_xml(weight)));
    }
    if font.italic {
        parts.push(r#" font-style="italic""#.to_string());
    }
    parts.join("")
}

/// Format a Style as SVG attribute string
fn format_styles(style: &Style) -> String {
    let mut parts = vec![];
    if let Some(fill) = &style.fill {
        parts.push(format!(r#" fill="{}""#, escape_xml(fill)));
    }
    if let Some(stroke) = &style.stroke {
        parts.push(format!(r#" stroke="{}""#, escape_xml(stroke)));
    }
    if let Some(sw) = style.stroke_width {
        parts.push(format!(r#" stroke-width="{}""#, sw));
    }
    if let Some(op) = style.opacity {
        if op < 1.0 {
            parts.push(format!(r#" opacity="{}""#, op));
        }
    }
    parts.join("")
}

/// Convert a path of points to an SVG path d attribute
fn path_to_d(path: &[Point]) -> String {
    let Some((first, rest)) = path.split_first() else {
        return String::new();
    };

    let mut d = format!("M{} {}", first.x, first.y);
    for point in rest {
        d.push_str(&format!(" L{} {}", point.x, point.y));
    }
    d
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
