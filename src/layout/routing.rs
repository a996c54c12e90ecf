//! Connector geometry between resolved boxes

use super::anchor::Anchor;
use super::types::{BoundingBox, Point};

/// Edge of a bounding box for connection attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub fn anchor(&self) -> Anchor {
        match self {
            Edge::Top => Anchor::TopCenter,
            Edge::Bottom => Anchor::BottomCenter,
            Edge::Left => Anchor::CenterLeft,
            Edge::Right => Anchor::CenterRight,
        }
    }
}

/// Get the attachment point on a bounding box edge
pub fn attachment_point(bounds: &BoundingBox, edge: Edge) -> Point {
    edge.anchor().point(bounds)
}

/// Determine the best edges to connect two bounding boxes
pub fn best_edges(from: &BoundingBox, to: &BoundingBox) -> (Edge, Edge) {
    let dx = to.center().x - from.center().x;
    let dy = to.center().y - from.center().y;

    // one box is below the other
    let h_overlap = from.x < to.right() && from.right() > to.x;
    // one box is beside the other
    let v_overlap = from.y < to.bottom() && from.bottom() > to.y;

    let primarily_vertical = dy.abs() > dx.abs() * 1.5;

    let vertical = if (h_overlap && !v_overlap) || primarily_vertical {
        true
    } else if v_overlap && !h_overlap {
        false
    } else {
        dx.abs() <= dy.abs()
    };

    match (vertical, dx > 0.0, dy > 0.0) {
        (true, _, true) => (Edge::Bottom, Edge::Top),
        (true, _, false) => (Edge::Top, Edge::Bottom),
        (false, true, _) => (Edge::Right, Edge::Left),
        (false, false, _) => (Edge::Left, Edge::Right),
    }
}

/// A straight connector between two points in one coordinate frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorGeometry {
    pub from: Point,
    pub to: Point,
    pub directed: bool,
}

impl ConnectorGeometry {
    /// Endpoints from explicit anchors, or from the facing edges when an
    /// end has none.
    pub fn between(
        from: &BoundingBox,
        from_anchor: Option<Anchor>,
        to: &BoundingBox,
        to_anchor: Option<Anchor>,
        directed: bool,
    ) -> Self {
        let (from_edge, to_edge) = best_edges(from, to);
        let start = from_anchor
            .map(|a| a.point(from))
            .unwrap_or_else(|| attachment_point(from, from_edge));
        let end = to_anchor
            .map(|a| a.point(to))
            .unwrap_or_else(|| attachment_point(to, to_edge));
        Self {
            from: start,
            to: end,
            directed,
        }
    }

    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }

    /// Unit vector from start to end; zero for a degenerate connector
    pub fn direction(&self) -> Point {
        let length = self.length();
        if length == 0.0 {
            Point::default()
        } else {
            Point::new(
                (self.to.x - self.from.x) / length,
                (self.to.y - self.from.y) / length,
            )
        }
    }
}
