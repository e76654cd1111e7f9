//! Widget trait and the built-in generic widgets.

use std::any::{Any, type_name};

use crate::{context::NodeContext, error::Result, render::Frame};

/// Widgets are the behaviour attached to nodes in the [`Core`](crate::Core) arena.
///
/// The arena owns geometry, flags and tree structure; a widget only supplies
/// hooks that run during the frame.
pub trait Widget: Any {
    /// Per-frame update hook, run before this widget's layout is resolved.
    fn update(&mut self, _ctx: &mut dyn NodeContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    /// Draw this widget. Does not draw children.
    ///
    /// The default fills the widget's box with the style colors for its
    /// current status.
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        frame.fill_box();
        Ok(())
    }

    /// Name used in logs and diagnostics.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}

/// A plain box with no behaviour of its own. Useful as a container.
#[derive(Debug, Default, Clone, Copy)]
pub struct Panel;

impl Widget for Panel {}

/// A box with a line of text drawn at its center.
#[derive(Debug, Default, Clone)]
pub struct Label {
    /// Text to draw.
    pub text: String,
}

impl Label {
    /// Construct a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Widget for Label {
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        frame.fill_box();
        frame.text(&self.text);
        Ok(())
    }
}
