//! Size negotiation
//!
//! Every node receives a [`SizeInterval`] from its parent, reports a [`Size`]
//! and assigns each child a position in its own local frame. Groups solve
//! their relations here, once their members are sized.

use indexmap::IndexMap;
use indextree::NodeId;
use tracing::{debug, trace};

use super::anchor::Anchor;
use super::config::LayoutConfig;
use super::error::LayoutError;
use super::measure::TextMeasure;
use super::node::{HorizontalAlignment, NodeKind, Sequence, Spacing, VerticalAlignment};
use super::relations::{Placement, PlacementResolver, Relation};
use super::routing::ConnectorGeometry;
use super::solver::{ConstraintSolver, ConstraintSource, LayoutConstraint, LayoutVariable};
use super::symbol::{Reference, Scope};
use super::tree::{MeasuredText, Tree};
use super::types::{BoundingBox, Insets, Point, Size, SizeInterval, Style};

/// A connector in the local frame of the group that declared it
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedConnector {
    pub group: NodeId,
    pub geometry: ConnectorGeometry,
    pub style: Style,
}

/// One layout pass over a tree
pub struct Negotiator<'a, M: TextMeasure + ?Sized> {
    tree: &'a mut Tree,
    scope: &'a Scope,
    config: &'a LayoutConfig,
    measure: &'a M,
    connectors: Vec<PlacedConnector>,
}

impl<'a, M: TextMeasure + ?Sized> Negotiator<'a, M> {
    pub fn new(
        tree: &'a mut Tree,
        scope: &'a Scope,
        config: &'a LayoutConfig,
        measure: &'a M,
    ) -> Self {
        Self {
            tree,
            scope,
            config,
            measure,
            connectors: vec![],
        }
    }

    /// Lay out the whole tree and place the root at its declared offset
    pub fn run(mut self) -> Result<Vec<PlacedConnector>, LayoutError> {
        let root = self.tree.root;
        self.layout(root, self.config.canvas)?;
        let origin = self.tree.data(root).offset.unwrap_or_default();
        self.tree.data_mut(root).assign_position(origin, self.scope)?;
        Ok(self.connectors)
    }

    fn describe(&self, id: NodeId) -> String {
        self.tree.data(id).describe(self.scope)
    }

    fn place(&mut self, id: NodeId, position: Point) -> Result<(), LayoutError> {
        self.tree.data_mut(id).assign_position(position, self.scope)
    }

    /// Negotiate the size of `id` within `interval`
    pub fn layout(&mut self, id: NodeId, interval: SizeInterval) -> Result<Size, LayoutError> {
        let kind = self.tree.data(id).kind.clone();
        let size = match &kind {
            NodeKind::Canvas => self.layout_canvas(id, interval)?,
            NodeKind::Padding(insets) => self.layout_padding(id, insets, interval)?,
            NodeKind::Row {
                sequence,
                alignment,
            } => self.layout_row(id, sequence, *alignment, interval)?,
            NodeKind::Column {
                sequence,
                alignment,
            } => self.layout_column(id, sequence, *alignment, interval)?,
            NodeKind::Group { relations } => self.layout_group(id, relations, interval)?,
            leaf => self.layout_leaf(id, leaf, interval)?,
        };
        trace!(node = %self.describe(id), width = size.width, height = size.height, "sized");
        self.tree.data_mut(id).assign_size(size, self.scope)?;
        Ok(size)
    }

    fn layout_leaf(
        &mut self,
        id: NodeId,
        kind: &NodeKind,
        interval: SizeInterval,
    ) -> Result<Size, LayoutError> {
        let node = self.describe(id);
        let size = match kind {
            NodeKind::Rect {
                width: Some(width),
                height: Some(height),
            } => Size::new(*width, *height),
            NodeKind::Rect { .. } => {
                return Err(LayoutError::underconstrained(
                    node,
                    "rect needs both a width and a height",
                ))
            }
            NodeKind::Circle {
                radius: Some(radius),
            } => Size::new(2.0 * radius, 2.0 * radius),
            NodeKind::Circle { radius: None } => {
                return Err(LayoutError::underconstrained(node, "circle needs a radius"))
            }
            NodeKind::Text { contents, font } => {
                if contents.is_empty() {
                    return Err(LayoutError::underconstrained(node, "text has no contents"));
                }
                let font = font
                    .clone()
                    .unwrap_or_else(|| self.config.default_font.clone());
                let metrics = self.measure.measure(contents, &font);
                if !metrics.width.is_finite() || !metrics.advance_height.is_finite() {
                    return Err(LayoutError::underconstrained(
                        node,
                        "text measurement is not finite",
                    ));
                }
                let size = Size::new(metrics.width, metrics.advance_height);
                self.tree.data_mut(id).text = Some(MeasuredText { font, metrics });
                size
            }
            NodeKind::Path { points } => {
                if points.is_empty() {
                    return Err(LayoutError::underconstrained(node, "path has no points"));
                }
                let (min_x, max_x) = extent(points.iter().map(|p| p.x));
                let (min_y, max_y) = extent(points.iter().map(|p| p.y));
                Size::new(max_x - min_x, max_y - min_y)
            }
            other => {
                return Err(LayoutError::invalid_layout(
                    node,
                    format!("{} is not a leaf", other.name()),
                ))
            }
        };

        let usable = |v: f64| v.is_finite() && v >= 0.0;
        if !usable(size.width) || !usable(size.height) {
            return Err(LayoutError::invalid_layout(
                node,
                format!("intrinsic size {}x{} is not usable", size.width, size.height),
            ));
        }
        if !interval.contains(size) {
            // overflow is reported unchanged
            debug!(
                node = %node,
                width = size.width,
                height = size.height,
                max_width = interval.width.upper,
                max_height = interval.height.upper,
                "intrinsic size outside offered interval"
            );
        }
        Ok(size)
    }

    fn layout_canvas(&mut self, id: NodeId, interval: SizeInterval) -> Result<Size, LayoutError> {
        if !interval.width.is_bounded() || !interval.height.is_bounded() {
            return Err(LayoutError::underconstrained(
                self.describe(id),
                "canvas needs a bounded interval",
            ));
        }
        for child in self.tree.children(id) {
            self.layout(child, interval)?;
            let position = self.tree.data(child).offset.unwrap_or_default();
            self.place(child, position)?;
        }
        Ok(Size::new(interval.width.upper, interval.height.upper))
    }

    fn layout_padding(
        &mut self,
        id: NodeId,
        insets: &Insets,
        interval: SizeInterval,
    ) -> Result<Size, LayoutError> {
        let children = self.tree.children(id);
        let [child] = children[..] else {
            return Err(LayoutError::invalid_layout(
                self.describe(id),
                format!("padding takes exactly one child, found {}", children.len()),
            ));
        };
        let inner = self.layout(child, interval.shrink(insets))?;
        self.place(child, Point::new(insets.left, insets.top))?;
        Ok(Size::new(
            inner.width + insets.horizontal(),
            inner.height + insets.vertical(),
        ))
    }

    fn sequence_mode(&self, id: NodeId, sequence: &Sequence) -> Result<Spacing, LayoutError> {
        sequence
            .mode()
            .or(self.config.default_spacing.map(Spacing::Fixed))
            .ok_or_else(|| LayoutError::malformed_sequence(self.describe(id)))
    }

    fn layout_row(
        &mut self,
        id: NodeId,
        sequence: &Sequence,
        alignment: VerticalAlignment,
        interval: SizeInterval,
    ) -> Result<Size, LayoutError> {
        let mode = self.sequence_mode(id, sequence)?;
        let children = self.tree.children(id);
        let sizes = children
            .iter()
            .map(|child| self.layout(*child, interval))
            .collect::<Result<Vec<_>, _>>()?;

        let (spacing, width) = main_axis(mode, sizes.iter().map(|s| s.width));
        let height = sizes.iter().map(|s| s.height).fold(0.0, f64::max);

        let mut x = 0.0;
        for (child, size) in children.into_iter().zip(&sizes) {
            let y = match alignment {
                VerticalAlignment::Top => 0.0,
                VerticalAlignment::Middle => (height - size.height) / 2.0,
                VerticalAlignment::Bottom => height - size.height,
            };
            self.place(child, Point::new(x, y))?;
            x += size.width + spacing;
        }
        Ok(Size::new(width, height))
    }

    fn layout_column(
        &mut self,
        id: NodeId,
        sequence: &Sequence,
        alignment: HorizontalAlignment,
        interval: SizeInterval,
    ) -> Result<Size, LayoutError> {
        let mode = self.sequence_mode(id, sequence)?;
        let children = self.tree.children(id);
        let sizes = children
            .iter()
            .map(|child| self.layout(*child, interval))
            .collect::<Result<Vec<_>, _>>()?;

        let (spacing, height) = main_axis(mode, sizes.iter().map(|s| s.height));
        let width = sizes.iter().map(|s| s.width).fold(0.0, f64::max);

        let mut y = 0.0;
        for (child, size) in children.into_iter().zip(&sizes) {
            let x = match alignment {
                HorizontalAlignment::Left => 0.0,
                HorizontalAlignment::Center => (width - size.width) / 2.0,
                HorizontalAlignment::Right => width - size.width,
            };
            self.place(child, Point::new(x, y))?;
            y += size.height + spacing;
        }
        Ok(Size::new(width, height))
    }

    fn layout_group(
        &mut self,
        id: NodeId,
        relations: &[Relation],
        interval: SizeInterval,
    ) -> Result<Size, LayoutError> {
        let group = self.describe(id);
        let members = self.tree.children(id);
        for member in &members {
            self.layout(*member, interval)?;
        }
        if members.is_empty() {
            return Ok(Size::zero());
        }

        let keys: IndexMap<NodeId, String> = members
            .iter()
            .map(|m| (*m, self.tree.data(*m).variable_key(self.scope)))
            .collect();

        let mut solver = ConstraintSolver::new();
        for key in keys.values() {
            solver.register(LayoutVariable::x(key));
            solver.register(LayoutVariable::y(key));
        }
        for (member, key) in &keys {
            if let Some(offset) = self.tree.data(*member).offset {
                solver.add_constraint(LayoutConstraint::fixed(
                    LayoutVariable::x(key),
                    offset.x,
                    ConstraintSource::intrinsic(format!("{} declared x", key)),
                ));
                solver.add_constraint(LayoutConstraint::fixed(
                    LayoutVariable::y(key),
                    offset.y,
                    ConstraintSource::intrinsic(format!("{} declared y", key)),
                ));
            }
        }

        let solution = {
            let resolver = GroupResolver {
                tree: &*self.tree,
                scope: self.scope,
                group: id,
                group_name: &group,
                keys: &keys,
            };
            for (index, relation) in relations.iter().enumerate() {
                trace!(group = %group, index, relation = %relation, "lowering relation");
                solver.add_constraints(relation.constraints(&group, index, &resolver)?);
            }
            debug!(
                group = %group,
                members = keys.len(),
                constraints = solver.constraints().len(),
                "solving group"
            );
            solver.solve()?
        };

        let solved: Vec<(NodeId, Point, Size)> = keys
            .iter()
            .map(|(member, key)| {
                let x = solution.get(&LayoutVariable::x(key)).unwrap_or(0.0);
                let y = solution.get(&LayoutVariable::y(key)).unwrap_or(0.0);
                let size = self.tree.data(*member).size.unwrap_or_default();
                (*member, Point::new(x, y), size)
            })
            .collect();

        let min_x = solved.iter().map(|(_, p, _)| p.x).fold(f64::INFINITY, f64::min);
        let min_y = solved.iter().map(|(_, p, _)| p.y).fold(f64::INFINITY, f64::min);
        let max_x = solved
            .iter()
            .map(|(_, p, s)| p.x + s.width)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_y = solved
            .iter()
            .map(|(_, p, s)| p.y + s.height)
            .fold(f64::NEG_INFINITY, f64::max);

        for (member, position, _) in &solved {
            self.place(*member, position.translate(-min_x, -min_y))?;
        }

        for relation in relations {
            if let Relation::Connect(connect) = relation {
                let geometry = {
                    let (from, from_anchor) = self.local_target(id, &connect.from)?;
                    let (to, to_anchor) = self.local_target(id, &connect.to)?;
                    ConnectorGeometry::between(&from, from_anchor, &to, to_anchor, connect.directed)
                };
                self.connectors.push(PlacedConnector {
                    group: id,
                    geometry,
                    style: connect.style.clone(),
                });
            }
        }

        Ok(Size::new(max_x - min_x, max_y - min_y))
    }

    /// Box of a reference target in the group's frame, with its anchor
    fn local_target(
        &self,
        group: NodeId,
        reference: &Reference,
    ) -> Result<(BoundingBox, Option<Anchor>), LayoutError> {
        let target = self.tree.resolve(reference, self.scope)?;
        let bounds = self.tree.bounds_in(target, group).ok_or_else(|| {
            LayoutError::outside_group(reference.describe(self.scope), self.describe(group))
        })?;
        let anchor = reference.anchor.or(self.tree.data(target).guide);
        Ok((bounds, anchor))
    }
}

/// Spacing and advertised extent along a sequence's main axis
fn main_axis(mode: Spacing, extents: impl Iterator<Item = f64>) -> (f64, f64) {
    let extents: Vec<f64> = extents.collect();
    let count = extents.len();
    let sum: f64 = extents.iter().sum();
    match mode {
        Spacing::Fixed(spacing) => {
            let gaps = count.saturating_sub(1) as f64;
            (spacing, sum + spacing * gaps)
        }
        Spacing::Total(total) if count > 1 => {
            let spacing = (total - sum) / (count - 1) as f64;
            (spacing, total)
        }
        Spacing::Total(total) => (0.0, total),
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Resolves references inside one group once its members are sized
struct GroupResolver<'r> {
    tree: &'r Tree,
    scope: &'r Scope,
    group: NodeId,
    group_name: &'r str,
    keys: &'r IndexMap<NodeId, String>,
}

impl PlacementResolver for GroupResolver<'_> {
    fn placement(&self, reference: &Reference) -> Result<Placement, LayoutError> {
        let target = self.tree.resolve(reference, self.scope)?;
        let outside = || LayoutError::outside_group(reference.describe(self.scope), self.group_name);

        // climb to the member, summing positions assigned inside it
        let mut offset = Point::default();
        let mut current = target;
        loop {
            let parent = self.tree.arena[current].parent().ok_or_else(outside)?;
            if parent == self.group {
                break;
            }
            let position = self.tree.data(current).position.unwrap_or_default();
            offset = offset.translate(position.x, position.y);
            current = parent;
        }

        let member = self.keys.get(&current).cloned().ok_or_else(outside)?;
        let data = self.tree.data(target);
        Ok(Placement {
            member,
            offset,
            size: data.size.unwrap_or_default(),
            explicit: reference.anchor,
            guide: data.guide,
        })
    }
}
