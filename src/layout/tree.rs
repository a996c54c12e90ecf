//! Arena storage for declared nodes and reference resolution over it

use indexmap::IndexMap;
use indextree::{Arena, NodeId};

use super::anchor::Anchor;
use super::error::LayoutError;
use super::find_similar;
use super::measure::TextMetrics;
use super::node::{Node, NodeKind};
use super::symbol::{RefRoot, Reference, Scope, Segment, Symbol};
use super::types::{BoundingBox, FontStyle, Position, Size, Style};

/// Font and metrics recorded when a text leaf is measured
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredText {
    pub font: FontStyle,
    pub metrics: TextMetrics,
}

/// Per-node state held in the arena
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub symbol: Option<Symbol>,
    pub local_name: Option<String>,
    pub offset: Option<Position>,
    pub guide: Option<Anchor>,
    pub style: Style,
    /// Preorder index, stable across runs of the same declaration
    pub ordinal: usize,
    pub size: Option<Size>,
    pub position: Option<Position>,
    pub text: Option<MeasuredText>,
}

impl NodeData {
    /// Name used in error messages
    pub fn describe(&self, scope: &Scope) -> String {
        match (&self.symbol, &self.local_name) {
            (Some(symbol), _) => scope.label(*symbol).to_string(),
            (None, Some(local)) => format!("{} '{}'", self.kind.name(), local),
            (None, None) => format!("{} #{}", self.kind.name(), self.ordinal),
        }
    }

    /// Variable prefix when this node is a group member.
    ///
    /// Literal names never contain `#` or `@`, list keys always contain
    /// `#`, and unnamed members use `@` with no `#`.
    pub fn variable_key(&self, scope: &Scope) -> String {
        match self.symbol {
            Some(symbol) => scope.key(symbol).to_string(),
            None => format!("@{}", self.ordinal),
        }
    }

    pub fn assign_size(&mut self, size: Size, scope: &Scope) -> Result<(), LayoutError> {
        if self.size.is_some() {
            return Err(LayoutError::invalid_layout(
                self.describe(scope),
                "size assigned twice in one layout pass",
            ));
        }
        self.size = Some(size);
        Ok(())
    }

    pub fn assign_position(&mut self, position: Position, scope: &Scope) -> Result<(), LayoutError> {
        if self.position.is_some() {
            return Err(LayoutError::invalid_layout(
                self.describe(scope),
                "position assigned twice in one layout pass",
            ));
        }
        self.position = Some(position);
        Ok(())
    }

    /// Box in the parent's frame; unset values read as zero
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_parts(
            self.position.unwrap_or_default(),
            self.size.unwrap_or_default(),
        )
    }
}

/// Node arena plus the symbol bindings made at declaration
#[derive(Debug)]
pub struct Tree {
    pub arena: Arena<NodeData>,
    pub root: NodeId,
    pub bindings: IndexMap<Symbol, NodeId>,
}

impl Tree {
    /// Move a declaration into the arena, binding each symbol to its node
    pub fn build(root: Node, scope: &Scope) -> Result<Self, LayoutError> {
        let mut arena = Arena::new();
        let mut bindings = IndexMap::new();
        let mut ordinal = 0;
        let root = insert(&mut arena, root, scope, &mut bindings, &mut ordinal)?;
        Ok(Self {
            arena,
            root,
            bindings,
        })
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Preorder traversal from the root
    pub fn nodes(&self) -> Vec<NodeId> {
        self.root.descendants(&self.arena).collect()
    }

    /// Resolve a reference to a node
    pub fn resolve(&self, reference: &Reference, scope: &Scope) -> Result<NodeId, LayoutError> {
        let symbol = match &reference.root {
            RefRoot::Symbol(symbol) => *symbol,
            RefRoot::Name(name) => scope.resolve(name)?,
        };
        let mut node = self.bindings.get(&symbol).copied().ok_or_else(|| {
            LayoutError::unresolvable(
                scope.label(symbol),
                find_similar(scope.names(), scope.label(symbol), 2),
            )
        })?;

        for segment in &reference.path {
            node = match segment {
                Segment::Index(index) => node
                    .children(&self.arena)
                    .nth(*index)
                    .ok_or_else(|| LayoutError::unresolvable(reference.describe(scope), vec![]))?,
                Segment::Local(name) => self.find_local(node, name, scope).ok_or_else(|| {
                    let visible = self.visible_locals(node, scope);
                    LayoutError::unresolvable(
                        reference.describe(scope),
                        find_similar(visible.iter().map(String::as_str), name, 2),
                    )
                })?,
            };
        }
        Ok(node)
    }

    /// First descendant in document order whose local name, or symbol
    /// label, is `name`. Does not look inside other named nodes.
    fn find_local(&self, node: NodeId, name: &str, scope: &Scope) -> Option<NodeId> {
        for child in node.children(&self.arena) {
            let data = self.data(child);
            let label = data.symbol.map(|s| scope.label(s));
            if data.local_name.as_deref() == Some(name) || label == Some(name) {
                return Some(child);
            }
            if data.symbol.is_none() {
                if let Some(found) = self.find_local(child, name, scope) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn visible_locals(&self, node: NodeId, scope: &Scope) -> Vec<String> {
        let mut names = Vec::new();
        for child in node.children(&self.arena) {
            let data = self.data(child);
            if let Some(local) = &data.local_name {
                names.push(local.clone());
            }
            match data.symbol {
                Some(symbol) => names.push(scope.label(symbol).to_string()),
                None => names.extend(self.visible_locals(child, scope)),
            }
        }
        names
    }

    /// Box of `node` in the frame of its ancestor `frame`, or `None` when
    /// `frame` is not a proper ancestor
    pub fn bounds_in(&self, node: NodeId, frame: NodeId) -> Option<BoundingBox> {
        let size = self.data(node).size.unwrap_or_default();
        let mut x = 0.0;
        let mut y = 0.0;
        let mut current = node;
        while current != frame {
            let position = self.data(current).position.unwrap_or_default();
            x += position.x;
            y += position.y;
            current = self.arena[current].parent()?;
        }
        if node == frame {
            return None;
        }
        Some(BoundingBox::new(x, y, size.width, size.height))
    }
}

fn insert(
    arena: &mut Arena<NodeData>,
    node: Node,
    scope: &Scope,
    bindings: &mut IndexMap<Symbol, NodeId>,
    ordinal: &mut usize,
) -> Result<NodeId, LayoutError> {
    let Node {
        kind,
        children,
        symbol,
        local_name,
        offset,
        guide,
        style,
    } = node;

    if let Some(symbol) = symbol {
        if !scope.contains(symbol) {
            return Err(LayoutError::unresolvable(
                format!("symbol {:?} from another scope", symbol),
                vec![],
            ));
        }
        if bindings.contains_key(&symbol) {
            return Err(LayoutError::collision(scope.label(symbol)));
        }
    }

    let id = arena.new_node(NodeData {
        kind,
        symbol,
        local_name,
        offset,
        guide,
        style,
        ordinal: *ordinal,
        size: None,
        position: None,
        text: None,
    });
    *ordinal += 1;
    if let Some(symbol) = symbol {
        bindings.insert(symbol, id);
    }

    for child in children {
        let child = insert(arena, child, scope, bindings, ordinal)?;
        id.append(child, arena);
    }
    Ok(id)
}
