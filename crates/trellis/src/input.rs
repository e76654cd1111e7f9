//! Input event types consumed from the host's event source.

use geom::Vec2;

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character key.
    Char(char),
    /// Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Either shift key.
    Shift,
    /// Either control key.
    Control,
    /// Either alt key.
    Alt,
}

/// An input event polled during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A mouse button went down.
    MousePressed(MouseButton),
    /// A mouse button went up.
    MouseReleased(MouseButton),
    /// The mouse moved to a new position.
    MouseMoved(Vec2),
    /// A key went down.
    KeyPressed(Key),
    /// A key went up.
    KeyReleased(Key),
    /// Text input.
    Text(char),
}
