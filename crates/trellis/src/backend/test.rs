use std::collections::HashSet;

use geom::Vec2;

use super::{InputSource, RenderSink};
use crate::{
    input::{Event, Key, MouseButton},
    render::Drawable,
};

/// Scripted input for tests. Events accumulate until cleared.
#[derive(Debug, Default)]
pub struct TestInput {
    /// Events for the current frame.
    events: Vec<Event>,
    /// Mouse position.
    mouse: Vec2,
    /// Keys currently held.
    keys: HashSet<Key>,
}

impl TestInput {
    /// Create an input source with the mouse at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a mouse press.
    pub fn press(&mut self, button: MouseButton) {
        self.events.push(Event::MousePressed(button));
    }

    /// Queue a mouse release.
    pub fn release(&mut self, button: MouseButton) {
        self.events.push(Event::MouseReleased(button));
    }

    /// Move the mouse, queueing a move event.
    pub fn move_mouse(&mut self, pos: impl Into<Vec2>) {
        self.mouse = pos.into();
        self.events.push(Event::MouseMoved(self.mouse));
    }

    /// Hold a key down, queueing a press event.
    pub fn key_down(&mut self, key: Key) {
        self.keys.insert(key);
        self.events.push(Event::KeyPressed(key));
    }

    /// Release a key, queueing a release event.
    pub fn key_up(&mut self, key: Key) {
        self.keys.remove(&key);
        self.events.push(Event::KeyReleased(key));
    }

    /// Queue a text input event.
    pub fn text(&mut self, c: char) {
        self.events.push(Event::Text(c));
    }

    /// Drop every queued event. Held keys and mouse position persist.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl InputSource for TestInput {
    fn events(&self) -> &[Event] {
        &self.events
    }

    fn mouse_pos(&self) -> Vec2 {
        self.mouse
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}

/// A render sink that records every drawable it receives.
#[derive(Debug, Default)]
pub struct TestRender {
    /// Captured drawables, in submission order.
    pub drawables: Vec<Drawable>,
}

impl TestRender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything captured so far.
    pub fn reset(&mut self) {
        self.drawables.clear();
    }

    /// Return true if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Number of quads captured.
    pub fn quad_count(&self) -> usize {
        self.drawables
            .iter()
            .filter(|d| matches!(d, Drawable::Quad { .. }))
            .count()
    }

    /// Return true if any captured text contains the substring.
    pub fn contains_text(&self, s: &str) -> bool {
        self.drawables.iter().any(|d| match d {
            Drawable::Text { text, .. } => text.contains(s),
            Drawable::Quad { .. } => false,
        })
    }
}

impl RenderSink for TestRender {
    fn render(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }
}
