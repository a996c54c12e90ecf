//! Declarative node tree
//!
//! A [`Node`] is the declaration-time description of a visual element. It is
//! consumed by [`Diagram::declare`](super::Diagram::declare), which moves the
//! tree into an arena where sizes and positions are assigned.

use super::anchor::Anchor;
use super::relations::Relation;
use super::symbol::Symbol;
use super::types::{FontStyle, Insets, Point, Position, Style};

/// Vertical placement of row children relative to the tallest child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Horizontal placement of column children relative to the widest child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Main-axis policy of a row or column.
///
/// When both are given, `spacing` wins. When neither is given, layout fails.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sequence {
    pub spacing: Option<f64>,
    pub total: Option<f64>,
}

impl Sequence {
    pub fn spacing(spacing: f64) -> Self {
        Self {
            spacing: Some(spacing),
            total: None,
        }
    }

    pub fn total(total: f64) -> Self {
        Self {
            spacing: None,
            total: Some(total),
        }
    }

    /// The effective policy, or `None` when neither field is set
    pub fn mode(&self) -> Option<Spacing> {
        match (self.spacing, self.total) {
            (Some(spacing), _) => Some(Spacing::Fixed(spacing)),
            (None, Some(total)) => Some(Spacing::Total(total)),
            (None, None) => None,
        }
    }
}

/// Resolved main-axis policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    /// Constant gap between neighbours
    Fixed(f64),
    /// Extent from the first leading edge to the last trailing edge
    Total(f64),
}

/// What a node is and how it negotiates its size
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Fixed-size container; reports the offered upper bounds
    Canvas,
    Rect {
        width: Option<f64>,
        height: Option<f64>,
    },
    Circle {
        radius: Option<f64>,
    },
    /// Uses the configured default font when `font` is unset
    Text {
        contents: String,
        font: Option<FontStyle>,
    },
    /// Closed polygon in node-local coordinates
    Path {
        points: Vec<Point>,
    },
    Padding(Insets),
    Row {
        sequence: Sequence,
        alignment: VerticalAlignment,
    },
    Column {
        sequence: Sequence,
        alignment: HorizontalAlignment,
    },
    /// Members placed by solving the relations
    Group {
        relations: Vec<Relation>,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
            Self::Path { .. } => "path",
            Self::Padding(_) => "padding",
            Self::Row { .. } => "row",
            Self::Column { .. } => "column",
            Self::Group { .. } => "group",
        }
    }
}

/// A node declaration with its children
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub symbol: Option<Symbol>,
    /// Name visible to nested lookups through the nearest named ancestor
    pub local_name: Option<String>,
    /// Declared offset, honoured by canvases and groups
    pub offset: Option<Position>,
    /// Anchor used when a reference to this node names none
    pub guide: Option<Anchor>,
    pub style: Style,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: vec![],
            symbol: None,
            local_name: None,
            offset: None,
            guide: None,
            style: Style::default(),
        }
    }

    pub fn canvas(children: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Canvas).with_children(children)
    }

    pub fn rect(width: f64, height: f64) -> Self {
        Self::new(NodeKind::Rect {
            width: Some(width),
            height: Some(height),
        })
    }

    pub fn circle(radius: f64) -> Self {
        Self::new(NodeKind::Circle {
            radius: Some(radius),
        })
    }

    pub fn text(contents: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            contents: contents.into(),
            font: None,
        })
    }

    pub fn text_with_font(contents: impl Into<String>, font: FontStyle) -> Self {
        Self::new(NodeKind::Text {
            contents: contents.into(),
            font: Some(font),
        })
    }

    pub fn path(points: impl IntoIterator<Item = Point>) -> Self {
        Self::new(NodeKind::Path {
            points: points.into_iter().collect(),
        })
    }

    pub fn padding(amount: f64, child: Node) -> Self {
        Self::padding_insets(Insets::uniform(amount), child)
    }

    pub fn padding_insets(insets: Insets, child: Node) -> Self {
        Self::new(NodeKind::Padding(insets)).with_child(child)
    }

    pub fn row(sequence: Sequence, children: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Row {
            sequence,
            alignment: VerticalAlignment::default(),
        })
        .with_children(children)
    }

    pub fn column(sequence: Sequence, children: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Column {
            sequence,
            alignment: HorizontalAlignment::default(),
        })
        .with_children(children)
    }

    pub fn group(
        children: impl IntoIterator<Item = Node>,
        relations: impl IntoIterator<Item = Relation>,
    ) -> Self {
        Self::new(NodeKind::Group {
            relations: relations.into_iter().collect(),
        })
        .with_children(children)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attach a symbol; each symbol may name one node
    pub fn named(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn local(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.offset = Some(Point::new(x, y));
        self
    }

    pub fn guide(mut self, anchor: Anchor) -> Self {
        self.guide = Some(anchor);
        self
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.style.fill = Some(fill.into());
        self
    }

    /// Set row alignment; ignored on other kinds
    pub fn valign(mut self, alignment: VerticalAlignment) -> Self {
        if let NodeKind::Row { alignment: a, .. } = &mut self.kind {
            *a = alignment;
        }
        self
    }

    /// Set column alignment; ignored on other kinds
    pub fn halign(mut self, alignment: HorizontalAlignment) -> Self {
        if let NodeKind::Column { alignment: a, .. } = &mut self.kind {
            *a = alignment;
        }
        self
    }

    /// Add a relation; ignored unless this node is a group
    pub fn relate(mut self, relation: Relation) -> Self {
        if let NodeKind::Group { relations } = &mut self.kind {
            relations.push(relation);
        }
        self
    }
}
