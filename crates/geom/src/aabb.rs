use super::Vec2;

/// An axis-aligned box described by its center position and half-size.
///
/// Edges are derived: `left = position.x - half_size.x`, and so on. Sizes are
/// not clamped, so a box may carry a zero or negative extent if a caller
/// asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Center of the box.
    position: Vec2,
    /// Half of the box's width and height.
    half_size: Vec2,
}

impl Aabb {
    /// Construct a box from a center position and half-size.
    pub const fn new(position: Vec2, half_size: Vec2) -> Self {
        Self {
            position,
            half_size,
        }
    }

    /// Construct a box centered on the origin.
    pub const fn from_half_size(half_size: Vec2) -> Self {
        Self::new(Vec2::ZERO, half_size)
    }

    /// Construct a box from its top-left and bottom-right corners.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        let half_size = (max - min) * 0.5;
        Self::new(min + half_size, half_size)
    }

    /// Center of the box.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Half of the box's size.
    pub fn half_size(&self) -> Vec2 {
        self.half_size
    }

    /// Full width and height.
    pub fn size(&self) -> Vec2 {
        self.half_size * 2.0
    }

    /// Full width.
    pub fn width(&self) -> f32 {
        self.half_size.x * 2.0
    }

    /// Full height.
    pub fn height(&self) -> f32 {
        self.half_size.y * 2.0
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.position.x - self.half_size.x
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.position.x + self.half_size.x
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.position.y - self.half_size.y
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.position.y + self.half_size.y
    }

    /// Top-left corner.
    pub fn min(&self) -> Vec2 {
        self.position - self.half_size
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        self.position + self.half_size
    }

    /// Move the center of the box.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Replace the half-size, keeping the center fixed.
    pub fn set_half_size(&mut self, half_size: Vec2) {
        self.half_size = half_size;
    }

    /// Replace the full size, keeping the center fixed.
    pub fn set_size(&mut self, size: Vec2) {
        self.half_size = size * 0.5;
    }

    /// Replace the width, keeping the center fixed.
    pub fn set_width(&mut self, width: f32) {
        self.half_size.x = width * 0.5;
    }

    /// Replace the height, keeping the center fixed.
    pub fn set_height(&mut self, height: f32) {
        self.half_size.y = height * 0.5;
    }

    /// Shift the box by an offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// True if the point lies inside the box or on its edges.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True if the box has no area.
    pub fn is_empty(&self) -> bool {
        self.half_size.x <= 0.0 || self.half_size.y <= 0.0
    }

    /// The overlapping region of two boxes, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some(Self::from_corners(min, max))
    }
}
