//! Core geometric types for size negotiation and placement

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Offset of a node in its parent's local frame.
///
/// Absolute placement is never stored; it is the sum of ancestor positions.
pub type Position = Point;

/// Resolved width and height of a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Inclusive admissible range for one dimension.
///
/// The upper bound may be `f64::INFINITY` for an unbounded dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, upper]`
    pub fn at_most(upper: f64) -> Self {
        Self::new(0.0, upper)
    }

    /// `[0, ∞)`
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn is_bounded(&self) -> bool {
        self.upper.is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Shrink both bounds by `amount`, clamping at zero
    pub fn shrink(&self, amount: f64) -> Self {
        Self::new(
            (self.lower - amount).max(0.0),
            (self.upper - amount).max(0.0),
        )
    }
}

/// Admissible size range offered to a node by its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeInterval {
    pub width: Interval,
    pub height: Interval,
}

impl SizeInterval {
    pub fn new(width: Interval, height: Interval) -> Self {
        Self { width, height }
    }

    /// `[0, width] x [0, height]`
    pub fn bounded(width: f64, height: f64) -> Self {
        Self::new(Interval::at_most(width), Interval::at_most(height))
    }

    pub fn unbounded() -> Self {
        Self::new(Interval::unbounded(), Interval::unbounded())
    }

    pub fn contains(&self, size: Size) -> bool {
        self.width.contains(size.width) && self.height.contains(size.height)
    }

    /// Interval left for content after removing insets on every side
    pub fn shrink(&self, insets: &Insets) -> Self {
        Self::new(
            self.width.shrink(insets.left + insets.right),
            self.height.shrink(insets.top + insets.bottom),
        )
    }
}

/// Space reserved on each side of a padded child
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(amount: f64) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A bounding box representing the spatial extent of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn position(&self) -> Position {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Font attributes handed to text measurement and painting
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub weight: Option<String>,
    pub italic: bool,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
            weight: None,
            italic: false,
        }
    }
}

impl FontStyle {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Paint attributes. Layout never reads these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub css_classes: Vec<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.css_classes.push(class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_shrink_clamps_at_zero() {
        let interval = Interval::new(4.0, 10.0).shrink(6.0);
        assert_eq!(interval, Interval::new(0.0, 4.0));
    }

    #[test]
    fn test_unbounded_interval_stays_unbounded() {
        let interval = Interval::unbounded().shrink(20.0);
        assert!(!interval.is_bounded());
        assert_eq!(interval.lower, 0.0);
    }

    #[test]
    fn test_size_interval_shrink_uses_matching_insets() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        let shrunk = SizeInterval::bounded(100.0, 50.0).shrink(&insets);
        assert_eq!(shrunk.width.upper, 94.0);
        assert_eq!(shrunk.height.upper, 46.0);
    }

    #[test]
    fn test_midpoint() {
        let m = Point::new(0.0, 10.0).midpoint(Point::new(100.0, 30.0));
        assert_eq!(m, Point::new(50.0, 20.0));
    }
}
