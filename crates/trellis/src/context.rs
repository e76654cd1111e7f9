use geom::{Aabb, Vec2};
use tracing::trace;

use crate::{
    backend::{InputSource, RenderSink},
    dispatch::{self, TickPass},
    error::{Error, Result},
    focus::FocusManager,
    id::NodeId,
    input::{Event, Key},
    node::Node,
    signal::Signal,
    style::Style,
    world::Core,
};

/// The view of the world handed to widget hooks and signal handlers.
pub trait NodeContext {
    /// The widget this context is bound to.
    fn node_id(&self) -> NodeId;

    /// The arena.
    fn core(&self) -> &Core;

    /// Mutable access to the arena. Destruction requested here is deferred to
    /// the end of the frame.
    fn core_mut(&mut self) -> &mut Core;

    /// Events polled for the current frame.
    fn events(&self) -> &[Event];

    /// Current mouse position.
    fn mouse_pos(&self) -> Vec2;

    /// Is the key held down?
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Active style.
    fn style(&self) -> &Style;

    /// The bound widget's node.
    fn node(&self) -> Option<&Node> {
        self.core().node(self.node_id())
    }

    /// The bound widget's bounds.
    fn bounds(&self) -> Result<Aabb> {
        self.core().bounds(self.node_id())
    }

    /// Move the bound widget's center.
    fn set_position(&mut self, position: Vec2) -> Result<()> {
        let id = self.node_id();
        self.core_mut().set_position(id, position)
    }

    /// Children of the bound widget.
    fn children(&self) -> Vec<NodeId> {
        self.node().map(|n| n.children().to_vec()).unwrap_or_default()
    }

    /// Does the bound widget hold focus?
    fn is_focused(&self) -> bool {
        self.core().is_focused(self.node_id())
    }

    /// Give focus to the bound widget.
    fn gain_exclusive_focus(&mut self) -> Result<()> {
        let id = self.node_id();
        self.core_mut().gain_exclusive_focus(id)
    }

    /// Hide the bound widget and its subtree.
    fn hide(&mut self) -> Result<()> {
        let id = self.node_id();
        self.core_mut().hide(id)
    }

    /// Unhide the bound widget and its subtree.
    fn show(&mut self) -> Result<()> {
        let id = self.node_id();
        self.core_mut().show(id)
    }

    /// Destroy the bound widget and its subtree.
    fn destroy(&mut self) -> Result<()> {
        let id = self.node_id();
        self.core_mut().destroy_recursive(id)
    }
}

/// [`NodeContext`] over a borrowed arena and input source.
pub(crate) struct CoreContext<'a> {
    /// Arena.
    core: &'a mut Core,
    /// Bound widget.
    node_id: NodeId,
    /// Input for the frame.
    input: &'a dyn InputSource,
    /// Active style.
    style: &'a Style,
}

impl<'a> CoreContext<'a> {
    /// Bind a context to a widget.
    pub(crate) fn new(
        core: &'a mut Core,
        node_id: NodeId,
        input: &'a dyn InputSource,
        style: &'a Style,
    ) -> Self {
        Self {
            core,
            node_id,
            input,
            style,
        }
    }
}

impl NodeContext for CoreContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn core(&self) -> &Core {
        &*self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut *self.core
    }

    fn events(&self) -> &[Event] {
        self.input.events()
    }

    fn mouse_pos(&self) -> Vec2 {
        self.input.mouse_pos()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.input.is_key_pressed(key)
    }

    fn style(&self) -> &Style {
        self.style
    }
}

/// Owns the widget arena together with its input source, render sink and
/// style, and drives frames.
pub struct Context<I, R> {
    /// Widget arena and focus slot.
    core: Core,
    /// Input collaborator.
    input: I,
    /// Render collaborator.
    sink: R,
    /// Style handed to widgets.
    style: Style,
}

impl<I, R> Context<I, R>
where
    I: InputSource,
    R: RenderSink,
{
    /// Create a context with an empty arena and the default style.
    pub fn new(input: I, sink: R) -> Self {
        Self {
            core: Core::new(),
            input,
            sink,
            style: Style::default(),
        }
    }

    /// Replace the style, builder-style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The arena.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Mutable access to the arena.
    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// The input source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Mutable access to the input source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// The render sink.
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Mutable access to the render sink.
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Active style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the style.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Run one frame: update, layout and input for every root.
    ///
    /// Widgets destroyed during the frame are freed before this returns, even
    /// when a hook fails.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        trace!(dt, "tick");
        self.core.begin_frame();
        let result = TickPass::new(&mut self.core, &self.input, &self.style).run(dt);
        self.core.end_frame();
        result
    }

    /// Draw every visible widget, containers before their contents.
    pub fn draw(&mut self) -> Result<()> {
        self.core.in_frame = true;
        let result = dispatch::draw(&mut self.core, &self.input, &self.style, &mut self.sink);
        self.core.end_frame();
        result
    }

    /// Fire one of a widget's channels by hand.
    pub fn emit(&mut self, node_id: impl Into<NodeId>, signal: Signal) -> Result<()> {
        let node_id = node_id.into();
        self.core.node(node_id).ok_or(Error::NodeNotFound(node_id))?;
        let was_in_frame = self.core.in_frame;
        self.core.in_frame = true;
        let result = dispatch::emit(&mut self.core, &self.input, &self.style, node_id, signal);
        if !was_in_frame {
            self.core.end_frame();
        }
        result
    }
}
