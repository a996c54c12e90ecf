//! Phase-tagged diagram lifecycle
//!
//! A diagram moves through `Declared -> LaidOut -> Resolved`. Each transition
//! consumes the previous value, so geometry can only be queried once it
//! exists and a tree is laid out at most once.

use std::collections::HashMap;
use std::fmt::Write as _;

use indextree::NodeId;
use tracing::debug;

use super::config::LayoutConfig;
use super::engine::{Negotiator, PlacedConnector};
use super::error::LayoutError;
use super::measure::TextMeasure;
use super::node::{Node, NodeKind};
use super::routing::ConnectorGeometry;
use super::symbol::{Reference, Scope};
use super::tree::{MeasuredText, Tree};
use super::types::{BoundingBox, Point, Size, Style};

/// Names resolved, nothing measured yet
#[derive(Debug)]
pub struct Declared;

/// Every node has a size and a position in its parent's frame
#[derive(Debug)]
pub struct LaidOut {
    connectors: Vec<PlacedConnector>,
}

/// Absolute boxes are available for queries
#[derive(Debug)]
pub struct Resolved {
    connectors: Vec<PlacedConnector>,
    absolute: HashMap<NodeId, BoundingBox>,
}

/// Phases in which sizes and local positions are known
pub trait Placed {}
impl Placed for LaidOut {}
impl Placed for Resolved {}

/// A node tree with its symbol scope, tagged with its lifecycle phase
#[derive(Debug)]
pub struct Diagram<P> {
    tree: Tree,
    scope: Scope,
    phase: P,
}

impl<P> Diagram<P> {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

impl Diagram<Declared> {
    /// Bind symbols to nodes and check that every relation reference
    /// resolves inside the group that declares it.
    pub fn declare(root: Node, scope: Scope) -> Result<Self, LayoutError> {
        let tree = Tree::build(root, &scope)?;
        for group in tree.nodes() {
            let NodeKind::Group { relations } = &tree.data(group).kind else {
                continue;
            };
            for relation in relations {
                for reference in relation.references() {
                    let target = tree.resolve(reference, &scope)?;
                    let inside = target
                        .ancestors(&tree.arena)
                        .skip(1)
                        .any(|ancestor| ancestor == group);
                    if !inside {
                        return Err(LayoutError::outside_group(
                            reference.describe(&scope),
                            tree.data(group).describe(&scope),
                        ));
                    }
                }
            }
        }
        Ok(Self {
            tree,
            scope,
            phase: Declared,
        })
    }

    /// Negotiate sizes and positions for the whole tree
    pub fn layout<M: TextMeasure + ?Sized>(
        mut self,
        config: &LayoutConfig,
        measure: &M,
    ) -> Result<Diagram<LaidOut>, LayoutError> {
        let connectors = Negotiator::new(&mut self.tree, &self.scope, config, measure).run()?;
        debug!(
            nodes = self.tree.arena.count(),
            connectors = connectors.len(),
            "layout complete"
        );
        Ok(Diagram {
            tree: self.tree,
            scope: self.scope,
            phase: LaidOut { connectors },
        })
    }
}

impl<P: Placed> Diagram<P> {
    /// Laid-out size of the referenced node
    pub fn size(&self, reference: &Reference) -> Result<Size, LayoutError> {
        let id = self.tree.resolve(reference, &self.scope)?;
        Ok(self.tree.data(id).size.unwrap_or_default())
    }

    /// Position of the referenced node in its parent's frame
    pub fn local_position(&self, reference: &Reference) -> Result<Point, LayoutError> {
        let id = self.tree.resolve(reference, &self.scope)?;
        Ok(self.tree.data(id).position.unwrap_or_default())
    }

    pub fn root_size(&self) -> Size {
        self.tree.data(self.tree.root).size.unwrap_or_default()
    }
}

impl Diagram<LaidOut> {
    /// Compute absolute boxes for every node
    pub fn resolve(self) -> Diagram<Resolved> {
        let mut absolute = HashMap::new();
        for id in self.tree.nodes() {
            let local = self.tree.data(id).local_bounds();
            let origin = self.tree.arena[id]
                .parent()
                .and_then(|parent| absolute.get(&parent))
                .map(|b: &BoundingBox| b.position())
                .unwrap_or_default();
            absolute.insert(id, local.translate(origin.x, origin.y));
        }
        Diagram {
            tree: self.tree,
            scope: self.scope,
            phase: Resolved {
                connectors: self.phase.connectors,
                absolute,
            },
        }
    }
}

impl Diagram<Resolved> {
    fn absolute(&self, id: NodeId) -> BoundingBox {
        self.phase
            .absolute
            .get(&id)
            .copied()
            .unwrap_or_else(BoundingBox::zero)
    }

    /// Absolute box of the referenced node
    pub fn bounds(&self, reference: &Reference) -> Result<BoundingBox, LayoutError> {
        let id = self.tree.resolve(reference, &self.scope)?;
        Ok(self.absolute(id))
    }

    /// Parse and resolve a textual reference such as `dots.dot-1`
    pub fn lookup(&self, reference: &str) -> Result<BoundingBox, LayoutError> {
        self.bounds(&Reference::parse(reference)?)
    }

    /// Absolute point for a reference: its explicit anchor, else the node's
    /// guide anchor, else the centre.
    pub fn anchor(&self, reference: &Reference) -> Result<Point, LayoutError> {
        let id = self.tree.resolve(reference, &self.scope)?;
        let bounds = self.absolute(id);
        Ok(match reference.anchor.or(self.tree.data(id).guide) {
            Some(anchor) => anchor.point(&bounds),
            None => bounds.center(),
        })
    }

    /// Connector geometry in absolute coordinates, in declaration order
    pub fn connectors(&self) -> Vec<ConnectorGeometry> {
        self.phase
            .connectors
            .iter()
            .map(|connector| {
                let origin = self.absolute(connector.group).position();
                let local = connector.geometry;
                ConnectorGeometry {
                    from: local.from.translate(origin.x, origin.y),
                    to: local.to.translate(origin.x, origin.y),
                    directed: local.directed,
                }
            })
            .collect()
    }

    /// Indented listing of every node with its absolute box
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.debug_node(self.tree.root, 0, &mut out);
        out
    }

    fn debug_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let b = self.absolute(id);
        let _ = writeln!(
            out,
            "{}[{}] x={:.1} y={:.1} w={:.1} h={:.1}",
            "  ".repeat(depth),
            self.tree.data(id).describe(&self.scope),
            b.x,
            b.y,
            b.width,
            b.height
        );
        for child in self.tree.children(id) {
            self.debug_node(child, depth + 1, out);
        }
    }

    /// Paint bottom-up. Each node receives its box in its parent's frame
    /// and the fragments of its children; a group's connectors follow its
    /// children.
    pub fn paint<T: Painter>(&self, painter: &T) -> T::Fragment {
        self.paint_node(painter, self.tree.root)
    }

    fn paint_node<T: Painter>(&self, painter: &T, id: NodeId) -> T::Fragment {
        let data = self.tree.data(id);
        let mut children: Vec<T::Fragment> = self
            .tree
            .children(id)
            .into_iter()
            .map(|child| self.paint_node(painter, child))
            .collect();
        children.extend(
            self.phase
                .connectors
                .iter()
                .filter(|connector| connector.group == id)
                .map(|connector| painter.paint_connector(&connector.geometry, &connector.style)),
        );

        let name = match (data.symbol, &data.local_name) {
            (Some(symbol), _) => Some(self.scope.label(symbol)),
            (None, Some(local)) => Some(local.as_str()),
            (None, None) => None,
        };
        let view = NodeView {
            kind: &data.kind,
            style: &data.style,
            name,
            text: data.text.as_ref(),
        };
        painter.paint_node(&view, data.local_bounds(), children)
    }
}

/// What a painter sees of a node
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub kind: &'a NodeKind,
    pub style: &'a Style,
    pub name: Option<&'a str>,
    /// Font and metrics chosen during layout, for text leaves
    pub text: Option<&'a MeasuredText>,
}

/// Produces output fragments from resolved geometry.
///
/// Implementations must be pure; the diagram never inspects fragments.
pub trait Painter {
    type Fragment;

    /// `bounds` is in the parent's frame. Composite nodes should shift
    /// `children` by `bounds.position()`.
    fn paint_node(
        &self,
        node: &NodeView<'_>,
        bounds: BoundingBox,
        children: Vec<Self::Fragment>,
    ) -> Self::Fragment;

    /// `geometry` is in the frame of the group that declared the connector
    fn paint_connector(&self, geometry: &ConnectorGeometry, style: &Style) -> Self::Fragment;
}
