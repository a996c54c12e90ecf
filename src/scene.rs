//! TOML scene documents
//!
//! A scene describes one diagram: an optional canvas size and a root node.
//! Nodes are tables tagged by `type`; containers list their `children` and
//! groups list their `relations`, also tagged by `type`.
//!
//! ```toml
//! width = 300
//! height = 120
//!
//! [root]
//! type = "group"
//!
//! [[root.children]]
//! type = "rect"
//! name = "a"
//! width = 40
//! height = 20
//!
//! [[root.children]]
//! type = "text"
//! name = "b"
//! text = "hello"
//!
//! [[root.relations]]
//! type = "align"
//! alignment = "center-vertically"
//! refs = ["a", "b"]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{
    Alignment, Anchor, Connect, Direction, Distribute, FontStyle, HorizontalAlignment, Insets,
    Interval, LayoutError, Node, NodeKind, Point, Reference, Relation, Scope, Sequence,
    SizeInterval, Style, Symbol, VerticalAlignment,
};

/// Errors that can occur when loading or converting scenes
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid scene: {0}")]
    Invalid(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl SceneError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// A parsed scene document
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    /// Canvas width offered to the root; the render config decides when unset
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub root: SceneNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneNode {
    #[serde(flatten)]
    pub shape: SceneShape,
    /// Literal name registered in the diagram scope
    pub name: Option<String>,
    /// Name unique among siblings only; minted as a list symbol
    pub slot: Option<String>,
    /// Name visible to nested references through the nearest named ancestor
    pub local: Option<String>,
    pub at: Option<[f64; 2]>,
    pub guide: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    #[serde(default)]
    pub class: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneShape {
    Canvas {
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Rect {
        width: Option<f64>,
        height: Option<f64>,
    },
    Circle {
        radius: Option<f64>,
    },
    Text {
        text: String,
        font: Option<SceneFont>,
    },
    Path {
        points: Vec<[f64; 2]>,
    },
    Padding {
        padding: SceneInsets,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Row {
        spacing: Option<f64>,
        total: Option<f64>,
        align: Option<String>,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Column {
        spacing: Option<f64>,
        total: Option<f64>,
        align: Option<String>,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Group {
        #[serde(default)]
        children: Vec<SceneNode>,
        #[serde(default)]
        relations: Vec<SceneRelation>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFont {
    pub family: Option<String>,
    pub size: Option<f64>,
    pub weight: Option<String>,
    #[serde(default)]
    pub italic: bool,
}

/// `padding = 8` or `padding = { top = 4, left = 2 }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SceneInsets {
    Uniform(f64),
    Sides {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        right: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        left: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneRelation {
    Align {
        alignment: String,
        refs: Vec<String>,
    },
    Distribute {
        direction: Option<String>,
        spacing: Option<f64>,
        total: Option<f64>,
        min_spacing: Option<f64>,
        refs: Vec<String>,
    },
    Connect {
        from: String,
        to: String,
        label: Option<String>,
        #[serde(default = "directed_by_default")]
        directed: bool,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    Constrain {
        expr: String,
    },
}

fn directed_by_default() -> bool {
    true
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load a scene from a TOML string
    pub fn parse(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Canvas interval for the root, taking unset dimensions from `fallback`
    pub fn canvas(&self, fallback: SizeInterval) -> SizeInterval {
        SizeInterval::new(
            self.width.map_or(fallback.width, Interval::at_most),
            self.height.map_or(fallback.height, Interval::at_most),
        )
    }

    /// Build the node tree, minting every name into a fresh scope
    pub fn build(&self) -> Result<(Node, Scope), SceneError> {
        let mut scope = Scope::new();
        let root = convert(&self.root, &mut scope, None)?;
        Ok((root, scope))
    }
}

fn convert(
    scene: &SceneNode,
    scope: &mut Scope,
    slot: Option<Symbol>,
) -> Result<Node, SceneError> {
    let leaf: &[SceneNode] = &[];
    let unrelated: &[SceneRelation] = &[];
    let (kind, children, relations) = match &scene.shape {
        SceneShape::Canvas { children } => (NodeKind::Canvas, children.as_slice(), unrelated),
        SceneShape::Rect { width, height } => (
            NodeKind::Rect {
                width: *width,
                height: *height,
            },
            leaf,
            unrelated,
        ),
        SceneShape::Circle { radius } => (NodeKind::Circle { radius: *radius }, leaf, unrelated),
        SceneShape::Text { text, font } => (
            NodeKind::Text {
                contents: text.clone(),
                font: font.as_ref().map(convert_font),
            },
            leaf,
            unrelated,
        ),
        SceneShape::Path { points } => (
            NodeKind::Path {
                points: points.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
            },
            leaf,
            unrelated,
        ),
        SceneShape::Padding { padding, children } => {
            let insets = match padding {
                SceneInsets::Uniform(amount) => Insets::uniform(*amount),
                SceneInsets::Sides {
                    top,
                    right,
                    bottom,
                    left,
                } => Insets::new(*top, *right, *bottom, *left),
            };
            (NodeKind::Padding(insets), children.as_slice(), unrelated)
        }
        SceneShape::Row {
            spacing,
            total,
            align,
            children,
        } => {
            let alignment = match align.as_deref() {
                None => VerticalAlignment::default(),
                Some("top") => VerticalAlignment::Top,
                Some("middle") => VerticalAlignment::Middle,
                Some("bottom") => VerticalAlignment::Bottom,
                Some(other) => {
                    return Err(SceneError::invalid(format!(
                        "row alignment '{}' (expected top, middle, bottom)",
                        other
                    )))
                }
            };
            let sequence = Sequence {
                spacing: *spacing,
                total: *total,
            };
            (
                NodeKind::Row {
                    sequence,
                    alignment,
                },
                children.as_slice(),
                unrelated,
            )
        }
        SceneShape::Column {
            spacing,
            total,
            align,
            children,
        } => {
            let alignment = match align.as_deref() {
                None => HorizontalAlignment::default(),
                Some("left") => HorizontalAlignment::Left,
                Some("center") => HorizontalAlignment::Center,
                Some("right") => HorizontalAlignment::Right,
                Some(other) => {
                    return Err(SceneError::invalid(format!(
                        "column alignment '{}' (expected left, center, right)",
                        other
                    )))
                }
            };
            let sequence = Sequence {
                spacing: *spacing,
                total: *total,
            };
            (
                NodeKind::Column {
                    sequence,
                    alignment,
                },
                children.as_slice(),
                unrelated,
            )
        }
        SceneShape::Group {
            children,
            relations,
        } => (
            NodeKind::Group { relations: vec![] },
            children.as_slice(),
            relations.as_slice(),
        ),
    };

    let mut node = Node::new(kind).styled(Style {
        fill: scene.fill.clone(),
        stroke: scene.stroke.clone(),
        stroke_width: scene.stroke_width,
        opacity: scene.opacity,
        css_classes: scene.class.clone(),
    });
    node.symbol = match (&scene.name, slot) {
        (Some(_), Some(_)) => {
            return Err(SceneError::invalid("a node takes either a name or a slot"))
        }
        (Some(name), None) => Some(scope.name(name.as_str())?),
        (None, slot) => slot,
    };
    node.local_name = scene.local.clone();
    node.offset = scene.at.map(|[x, y]| Point::new(x, y));
    node.guide = scene.guide.as_deref().map(str::parse::<Anchor>).transpose()?;

    // slots are scoped to their siblings
    let labels: Vec<String> = children.iter().filter_map(|c| c.slot.clone()).collect();
    let mut slots = scope.name_list(labels).into_iter();
    for child in children {
        let symbol = if child.slot.is_some() { slots.next() } else { None };
        node.children.push(convert(child, scope, symbol)?);
    }

    for relation in relations {
        node = node.relate(convert_relation(relation)?);
    }
    Ok(node)
}

fn convert_font(font: &SceneFont) -> FontStyle {
    let defaults = FontStyle::default();
    FontStyle {
        family: font.family.clone().unwrap_or(defaults.family),
        size: font.size.unwrap_or(defaults.size),
        weight: font.weight.clone(),
        italic: font.italic,
    }
}

fn references(refs: &[String]) -> Result<Vec<Reference>, SceneError> {
    refs.iter()
        .map(|r| Reference::parse(r).map_err(SceneError::from))
        .collect()
}

fn convert_relation(relation: &SceneRelation) -> Result<Relation, SceneError> {
    Ok(match relation {
        SceneRelation::Align { alignment, refs } => Relation::Align {
            alignment: Alignment::parse(alignment)
                .ok_or_else(|| SceneError::invalid(format!("unknown alignment '{}'", alignment)))?,
            refs: references(refs)?,
        },
        SceneRelation::Distribute {
            direction,
            spacing,
            total,
            min_spacing,
            refs,
        } => {
            let direction = match direction.as_deref() {
                None | Some("horizontal") => Direction::Horizontal,
                Some("vertical") => Direction::Vertical,
                Some(other) => {
                    return Err(SceneError::invalid(format!(
                        "distribute direction '{}' (expected horizontal, vertical)",
                        other
                    )))
                }
            };
            Relation::Distribute(Distribute {
                direction,
                sequence: Sequence {
                    spacing: *spacing,
                    total: *total,
                },
                min_spacing: *min_spacing,
                refs: references(refs)?,
            })
        }
        SceneRelation::Connect {
            from,
            to,
            label,
            directed,
            stroke,
            stroke_width,
        } => Relation::Connect(Connect {
            from: Reference::parse(from)?,
            to: Reference::parse(to)?,
            label: label.as_deref().map(Reference::parse).transpose()?,
            directed: *directed,
            style: Style {
                stroke: stroke.clone(),
                stroke_width: *stroke_width,
                ..Style::default()
            },
        }),
        SceneRelation::Constrain { expr } => Relation::constrain(expr)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_scene() {
        let scene = Scene::parse(
            r##"
width = 200
height = 100

[root]
type = "canvas"

[[root.children]]
type = "padding"
padding = { top = 4, left = 2 }
at = [10, 20]

[[root.children.children]]
type = "rect"
name = "box"
width = 30
height = 15
fill = "#eee"
"##,
        )
        .unwrap();

        assert_eq!(
            scene.canvas(SizeInterval::unbounded()),
            SizeInterval::bounded(200.0, 100.0)
        );
        let (root, scope) = scene.build().unwrap();
        let padding = &root.children[0];
        assert_eq!(padding.kind, NodeKind::Padding(Insets::new(4.0, 0.0, 0.0, 2.0)));
        assert_eq!(padding.offset, Some(Point::new(10.0, 20.0)));
        let rect = &padding.children[0];
        assert_eq!(rect.symbol, scope.lookup("box"));
        assert_eq!(rect.style.fill.as_deref(), Some("#eee"));
    }

    #[test]
    fn test_group_relations_convert() {
        let scene = Scene::parse(
            r#"
[root]
type = "group"
children = [
  { type = "circle", name = "a", radius = 5 },
  { type = "circle", name = "b", radius = 5 },
]
relations = [
  { type = "align", alignment = "top", refs = ["a", "b"] },
  { type = "distribute", total = 100, refs = ["a", "b"] },
  { type = "connect", from = "a@right", to = "b", directed = false },
  { type = "constrain", expr = "b.y >= a.y + 3" },
]
"#,
        )
        .unwrap();
        let (root, _) = scene.build().unwrap();
        let NodeKind::Group { relations } = &root.kind else {
            panic!("expected group");
        };
        let kinds: Vec<_> = relations.iter().map(Relation::kind).collect();
        assert_eq!(kinds, vec!["align", "distribute", "connect", "constrain"]);
        let Relation::Connect(connect) = &relations[2] else {
            panic!("expected connect");
        };
        assert_eq!(connect.from.anchor, Some(Anchor::CenterRight));
        assert!(!connect.directed);
    }

    #[test]
    fn test_slots_do_not_collide_across_parents() {
        let scene = Scene::parse(
            r#"
[root]
type = "canvas"
children = [
  { type = "row", name = "top", spacing = 2, children = [{ type = "circle", radius = 1, slot = "dot-0" }] },
  { type = "row", name = "bottom", spacing = 2, children = [{ type = "circle", radius = 1, slot = "dot-0" }] },
]
"#,
        )
        .unwrap();
        let (root, scope) = scene.build().unwrap();
        let first = root.children[0].children[0].symbol.unwrap();
        let second = root.children[1].children[0].symbol.unwrap();
        assert_ne!(first, second);
        assert_eq!(scope.label(first), "dot-0");
    }

    #[test]
    fn test_duplicate_name_is_collision() {
        let scene = Scene::parse(
            r#"
[root]
type = "canvas"
children = [
  { type = "rect", name = "a", width = 1, height = 1 },
  { type = "rect", name = "a", width = 1, height = 1 },
]
"#,
        )
        .unwrap();
        assert!(matches!(
            scene.build(),
            Err(SceneError::Layout(LayoutError::NameCollision { .. }))
        ));
    }

    #[test]
    fn test_unknown_alignment_is_invalid() {
        let scene = Scene::parse(
            r#"
[root]
type = "group"
relations = [{ type = "align", alignment = "sideways", refs = [] }]
"#,
        )
        .unwrap();
        assert!(matches!(scene.build(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(matches!(
            Scene::parse("[root\ntype = "),
            Err(SceneError::Toml(_))
        ));
    }
}
