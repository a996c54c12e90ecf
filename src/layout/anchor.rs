//! Named points on a node's bounding box

use std::fmt;
use std::str::FromStr;

use super::error::LayoutError;
use super::types::{BoundingBox, Point};

/// One of the nine reference points of a bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Position of the anchor as fractions of the box width and height
    pub fn fractions(&self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::CenterLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// Resolve against a box. Never cached: boxes change between phases.
    pub fn point(&self, bounds: &BoundingBox) -> Point {
        let (fx, fy) = self.fractions();
        Point::new(bounds.x + fx * bounds.width, bounds.y + fy * bounds.height)
    }

    /// Accepts kebab-case, snake_case and camelCase spellings, plus the
    /// edge shorthands `top`, `bottom`, `left`, `right`.
    pub fn parse(s: &str) -> Option<Anchor> {
        let mut normalized = String::with_capacity(s.len() + 2);
        for (i, ch) in s.trim().chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if i > 0 {
                    normalized.push('-');
                }
                normalized.push(ch.to_ascii_lowercase());
            } else if ch == '_' {
                normalized.push('-');
            } else {
                normalized.push(ch);
            }
        }

        match normalized.as_str() {
            "top" => Some(Self::TopCenter),
            "bottom" => Some(Self::BottomCenter),
            "left" => Some(Self::CenterLeft),
            "right" => Some(Self::CenterRight),
            "middle" => Some(Self::Center),
            other => Self::ALL.iter().copied().find(|a| a.name() == other),
        }
    }

    fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Anchor {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LayoutError::invalid_anchor(s, Self::valid_names()))
    }
}
