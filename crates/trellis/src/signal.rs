//! Per-widget notification channels.

use std::fmt;

use crate::{context::NodeContext, error::Result, input::MouseButton};

/// The notification channels every widget exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// After the widget and its children finished their update step.
    PostUpdate,
    /// After the widget drew itself.
    PostDraw,
    /// Left button released over the widget after being pressed on it.
    LeftClick,
    /// Left button pressed over the widget.
    LeftClickDown,
    /// Left button released after being pressed on the widget.
    LeftRelease,
    /// Right button released over the widget after being pressed on it.
    RightClick,
    /// Right button pressed over the widget.
    RightClickDown,
    /// Right button released after being pressed on the widget.
    RightRelease,
    /// Mouse entered the widget.
    HoverEnter,
    /// Mouse left the widget.
    HoverLeave,
}

impl Signal {
    /// The click channel for a button, if the button has one.
    pub fn click(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::LeftClick),
            MouseButton::Right => Some(Self::RightClick),
            MouseButton::Middle => None,
        }
    }

    /// The press channel for a button, if the button has one.
    pub fn click_down(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::LeftClickDown),
            MouseButton::Right => Some(Self::RightClickDown),
            MouseButton::Middle => None,
        }
    }

    /// The release channel for a button, if the button has one.
    pub fn release(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::LeftRelease),
            MouseButton::Right => Some(Self::RightRelease),
            MouseButton::Middle => None,
        }
    }
}

/// A subscribed notification handler.
pub type Handler = Box<dyn FnMut(&mut dyn NodeContext) -> Result<()>>;

/// An ordered list of handlers for one channel.
#[derive(Default)]
pub struct Delegate {
    /// Handlers in subscription order.
    handlers: Vec<Handler>,
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Delegate {
    /// Subscribe a handler.
    pub fn connect(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of subscribed handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler in order, stopping at the first error.
    pub(crate) fn fire(&mut self, ctx: &mut dyn NodeContext) -> Result<()> {
        for handler in &mut self.handlers {
            handler(ctx)?;
        }
        Ok(())
    }

    /// Append handlers that were subscribed while this delegate was firing.
    pub(crate) fn absorb(&mut self, mut later: Self) {
        self.handlers.append(&mut later.handlers);
    }
}

/// All channels of one widget.
#[derive(Debug, Default)]
pub(crate) struct Signals {
    /// [`Signal::PostUpdate`].
    post_update: Delegate,
    /// [`Signal::PostDraw`].
    post_draw: Delegate,
    /// [`Signal::LeftClick`].
    left_click: Delegate,
    /// [`Signal::LeftClickDown`].
    left_click_down: Delegate,
    /// [`Signal::LeftRelease`].
    left_release: Delegate,
    /// [`Signal::RightClick`].
    right_click: Delegate,
    /// [`Signal::RightClickDown`].
    right_click_down: Delegate,
    /// [`Signal::RightRelease`].
    right_release: Delegate,
    /// [`Signal::HoverEnter`].
    hover_enter: Delegate,
    /// [`Signal::HoverLeave`].
    hover_leave: Delegate,
}

impl Signals {
    /// The delegate backing a channel.
    pub(crate) fn get(&self, signal: Signal) -> &Delegate {
        match signal {
            Signal::PostUpdate => &self.post_update,
            Signal::PostDraw => &self.post_draw,
            Signal::LeftClick => &self.left_click,
            Signal::LeftClickDown => &self.left_click_down,
            Signal::LeftRelease => &self.left_release,
            Signal::RightClick => &self.right_click,
            Signal::RightClickDown => &self.right_click_down,
            Signal::RightRelease => &self.right_release,
            Signal::HoverEnter => &self.hover_enter,
            Signal::HoverLeave => &self.hover_leave,
        }
    }

    /// Mutable access to the delegate backing a channel.
    pub(crate) fn get_mut(&mut self, signal: Signal) -> &mut Delegate {
        match signal {
            Signal::PostUpdate => &mut self.post_update,
            Signal::PostDraw => &mut self.post_draw,
            Signal::LeftClick => &mut self.left_click,
            Signal::LeftClickDown => &mut self.left_click_down,
            Signal::LeftRelease => &mut self.left_release,
            Signal::RightClick => &mut self.right_click,
            Signal::RightClickDown => &mut self.right_click_down,
            Signal::RightRelease => &mut self.right_release,
            Signal::HoverEnter => &mut self.hover_enter,
            Signal::HoverLeave => &mut self.hover_leave,
        }
    }
}
