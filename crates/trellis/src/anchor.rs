//! Named reference points on a box.

use geom::{Aabb, Vec2};

/// A named point on an axis-aligned box, used to attach one widget to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Center of the box.
    #[default]
    Center,
    /// Midpoint of the top edge.
    Top,
    /// Midpoint of the bottom edge.
    Bottom,
    /// Midpoint of the left edge.
    Left,
    /// Midpoint of the right edge.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// The location of this anchor on `bounds`.
    pub fn point(self, bounds: &Aabb) -> Vec2 {
        let c = bounds.position();
        match self {
            Self::Center => c,
            Self::Top => Vec2::new(c.x, bounds.top()),
            Self::Bottom => Vec2::new(c.x, bounds.bottom()),
            Self::Left => Vec2::new(bounds.left(), c.y),
            Self::Right => Vec2::new(bounds.right(), c.y),
            Self::TopLeft => Vec2::new(bounds.left(), bounds.top()),
            Self::TopRight => Vec2::new(bounds.right(), bounds.top()),
            Self::BottomLeft => Vec2::new(bounds.left(), bounds.bottom()),
            Self::BottomRight => Vec2::new(bounds.right(), bounds.bottom()),
        }
    }
}
