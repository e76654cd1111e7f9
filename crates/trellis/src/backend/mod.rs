//! Collaborator traits for input sources and render sinks.

use geom::Vec2;

use crate::{
    input::{Event, Key},
    render::Drawable,
};

/// Headless backends for tests and offline rendering.
pub mod test;

/// Supplies the input state for a frame.
pub trait InputSource {
    /// Events polled for the current frame.
    fn events(&self) -> &[Event];

    /// Current mouse position.
    fn mouse_pos(&self) -> Vec2;

    /// Is the key currently held down?
    fn is_key_pressed(&self, key: Key) -> bool;
}

/// Accepts drawables produced by the draw pass.
pub trait RenderSink {
    /// Accept one primitive.
    fn render(&mut self, drawable: Drawable);
}
