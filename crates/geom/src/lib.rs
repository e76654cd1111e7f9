//! Floating-point geometry primitives used by the trellis widget tree.

/// Axis-aligned boxes.
mod aabb;
/// Two-component vectors.
mod vec2;

pub use aabb::Aabb;
pub use vec2::Vec2;
