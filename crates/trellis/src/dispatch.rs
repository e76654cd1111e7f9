//! Per-frame update, input and draw passes.
//!
//! A tick walks every root recursively. For each widget it recomputes depth,
//! runs the widget's update hook, resolves both layout axes, processes the
//! children, recomputes the view, fires `PostUpdate` and finally runs the
//! widget's own input step. Input is therefore handled bottom-up: children see
//! a mouse press before their parents do, and the first widget to see it takes
//! focus.

use geom::{Aabb, Vec2};
use tracing::trace;

use crate::{
    backend::{InputSource, RenderSink},
    context::CoreContext,
    error::{Error, Result},
    focus::FocusManager,
    id::NodeId,
    input::{Event, MouseButton},
    render::Frame,
    signal::Signal,
    style::Style,
    world::Core,
};

/// Fire a widget's channel with a context bound to that widget.
///
/// Handlers are taken out of the node while they run, so they are free to
/// mutate the arena, including subscribing further handlers to the same
/// channel.
pub(crate) fn emit(
    core: &mut Core,
    input: &dyn InputSource,
    style: &Style,
    node_id: NodeId,
    signal: Signal,
) -> Result<()> {
    let Some(mut delegate) = core.take_delegate(node_id, signal) else {
        return Ok(());
    };
    trace!(?node_id, ?signal, "emit");
    let result = {
        let mut ctx = CoreContext::new(core, node_id, input, style);
        delegate.fire(&mut ctx)
    };
    core.restore_delegate(node_id, signal, delegate);
    result
}

/// One update pass over the whole tree.
pub(crate) struct TickPass<'a> {
    /// Arena being updated.
    core: &'a mut Core,
    /// Input for the frame.
    input: &'a dyn InputSource,
    /// Active style.
    style: &'a Style,
    /// A press has already moved focus this frame.
    focus_claimed: bool,
}

impl<'a> TickPass<'a> {
    /// Start a pass.
    pub(crate) fn new(core: &'a mut Core, input: &'a dyn InputSource, style: &'a Style) -> Self {
        Self {
            core,
            input,
            style,
            focus_claimed: false,
        }
    }

    /// Update every root in order.
    pub(crate) fn run(&mut self, dt: f32) -> Result<()> {
        let roots = self.core.roots.clone();
        for root in roots {
            self.update_node(root, dt)?;
        }
        Ok(())
    }

    /// Update one widget and its subtree.
    fn update_node(&mut self, node_id: NodeId, dt: f32) -> Result<()> {
        if !self.core.contains(node_id) {
            return Ok(());
        }
        self.recalculate_depth(node_id);

        let (input, style) = (self.input, self.style);
        self.core.with_widget_mut(node_id, |widget, core| {
            let mut ctx = CoreContext::new(core, node_id, input, style);
            widget.update(&mut ctx, dt)
        })??;
        if !self.core.contains(node_id) {
            return Ok(());
        }

        self.core.resolve_both(node_id)?;

        let children = match self.core.node(node_id) {
            Some(node) => node.children.clone(),
            None => return Ok(()),
        };
        for child in children {
            self.update_node(child, dt)?;
        }
        if !self.core.contains(node_id) {
            return Ok(());
        }

        self.recalculate_view(node_id);
        emit(self.core, self.input, self.style, node_id, Signal::PostUpdate)?;
        self.update_input(node_id)
    }

    /// Recompute depth from the parent, which has already been updated.
    fn recalculate_depth(&mut self, node_id: NodeId) {
        let depth = self
            .core
            .node(node_id)
            .and_then(|n| n.parent)
            .and_then(|p| self.core.node(p))
            .map_or(0, |p| p.depth + usize::from(p.container));
        if let Some(node) = self.core.node_mut(node_id) {
            node.depth = depth;
        }
    }

    /// Clip the widget's bounds by every ancestor's bounds.
    ///
    /// Disjoint regions collapse to a zero-size box at the widget's center.
    fn recalculate_view(&mut self, node_id: NodeId) {
        let Some(node) = self.core.node(node_id) else {
            return;
        };
        let bounds = node.bounds;
        let mut view = Some(bounds);
        let mut ancestor = node.parent;
        while let (Some(clip), Some(parent_id)) = (view, ancestor) {
            let Some(parent) = self.core.node(parent_id) else {
                break;
            };
            view = clip.intersection(&parent.bounds);
            ancestor = parent.parent;
        }
        let view = view.unwrap_or_else(|| Aabb::new(bounds.position(), Vec2::ZERO));
        if let Some(node) = self.core.node_mut(node_id) {
            node.view = view;
        }
    }

    /// Hover, press and release handling for one widget.
    fn update_input(&mut self, node_id: NodeId) -> Result<()> {
        let Some(node) = self.core.node_mut(node_id) else {
            return Ok(());
        };
        if !node.is_active() {
            node.status.hovered = false;
            node.status.pressed_left = false;
            node.status.pressed_right = false;
            return Ok(());
        }

        let input = self.input;
        let mouse = input.mouse_pos();
        let hovered = node.bounds.contains(mouse) && !node.view.is_empty() && node.view.contains(mouse);
        let was_hovered = node.status.hovered;
        node.status.hovered = hovered;
        if hovered != was_hovered {
            let signal = if hovered {
                Signal::HoverEnter
            } else {
                Signal::HoverLeave
            };
            self.fire(node_id, signal)?;
        }

        for event in input.events() {
            match *event {
                Event::MousePressed(button) if hovered => self.press(node_id, button)?,
                Event::MouseReleased(button) => self.release(node_id, button, hovered)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// A button went down over the widget.
    fn press(&mut self, node_id: NodeId, button: MouseButton) -> Result<()> {
        let Some(signal) = Signal::click_down(button) else {
            return Ok(());
        };
        let Some(node) = self.core.node_mut(node_id) else {
            return Ok(());
        };
        if node.status.is_pressed(button) {
            return Ok(());
        }
        node.status.set_pressed(button, true);
        if !self.focus_claimed {
            self.focus_claimed = true;
            self.core.gain_exclusive_focus(node_id)?;
        }
        self.fire(node_id, signal)
    }

    /// A button came up; only matters if it went down on this widget.
    fn release(&mut self, node_id: NodeId, button: MouseButton, hovered: bool) -> Result<()> {
        let (Some(release), Some(click)) = (Signal::release(button), Signal::click(button)) else {
            return Ok(());
        };
        let Some(node) = self.core.node_mut(node_id) else {
            return Ok(());
        };
        if !node.status.is_pressed(button) {
            return Ok(());
        }
        node.status.set_pressed(button, false);
        self.fire(node_id, release)?;
        if hovered {
            self.fire(node_id, click)?;
        }
        Ok(())
    }

    /// Fire a channel if the widget is still alive.
    fn fire(&mut self, node_id: NodeId, signal: Signal) -> Result<()> {
        if !self.core.contains(node_id) {
            return Ok(());
        }
        emit(self.core, self.input, self.style, node_id, signal)
    }
}

/// Draw every visible widget, root by root, containers before contents.
pub(crate) fn draw(
    core: &mut Core,
    input: &dyn InputSource,
    style: &Style,
    sink: &mut dyn RenderSink,
) -> Result<()> {
    let roots = core.roots.clone();
    for root in roots {
        if !core.contains(root) {
            continue;
        }
        for node_id in core.bf_order(root, true, false) {
            if !core.node(node_id).is_some_and(|n| n.is_visible()) {
                continue;
            }
            draw_node(core, style, sink, node_id)?;
            emit(core, input, style, node_id, Signal::PostDraw)?;
        }
    }
    Ok(())
}

/// Run one widget's draw hook.
fn draw_node(core: &mut Core, style: &Style, sink: &mut dyn RenderSink, node_id: NodeId) -> Result<()> {
    let mut widget = core
        .node_mut(node_id)
        .and_then(|n| n.widget.take())
        .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
    let result = match core.node(node_id) {
        Some(node) => {
            let mut frame = Frame::new(node_id, node, style, sink);
            widget.draw(&mut frame)
        }
        None => Ok(()),
    };
    if let Some(node) = core.nodes.get_mut(node_id) {
        node.widget = Some(widget);
    }
    result
}
