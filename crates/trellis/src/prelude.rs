//! Convenience re-exports for common Trellis types.

pub use crate::{
    Aabb, Anchor, Axis, Color, Context, Core, Drawable, Error, FocusManager, Frame, Key, Label,
    MouseButton, NodeContext, NodeId, Panel, Result, Scaling, Signal, Style, TypedId, Vec2,
    Widget,
    backend::{InputSource, RenderSink},
};
