use tracing::debug;

use crate::{
    error::{Error, Result},
    id::NodeId,
    world::Core,
};

/// Single-slot focus management.
///
/// At most one widget holds focus at any time. Focus starts as none and is
/// released automatically when the focused widget is destroyed.
pub trait FocusManager {
    /// The focused widget, if any.
    fn focused(&self) -> Option<NodeId>;

    /// Does the node hold focus?
    fn is_focused(&self, node: NodeId) -> bool;

    /// Move focus to `node`, clearing it on the previous holder first.
    fn gain_exclusive_focus(&mut self, node: NodeId) -> Result<()>;

    /// Release focus without giving it to anyone.
    fn clear_focus(&mut self);

    /// Drop focus if it points at a widget that no longer exists.
    fn ensure_focus_valid(&mut self);
}

impl FocusManager for Core {
    fn focused(&self) -> Option<NodeId> {
        self.focus.filter(|id| self.node(*id).is_some())
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.focused() == Some(node)
    }

    fn gain_exclusive_focus(&mut self, node: NodeId) -> Result<()> {
        if self.node(node).is_none() {
            return Err(Error::NodeNotFound(node));
        }
        if self.focus == Some(node) {
            return Ok(());
        }
        self.clear_focus();
        if let Some(n) = self.node_mut(node) {
            n.status.focused = true;
        }
        self.focus = Some(node);
        debug!(?node, "focus gained");
        Ok(())
    }

    fn clear_focus(&mut self) {
        if let Some(old) = self.focus.take()
            && let Some(n) = self.nodes.get_mut(old)
        {
            n.status.focused = false;
        }
    }

    fn ensure_focus_valid(&mut self) {
        if let Some(id) = self.focus
            && self.node(id).is_none()
        {
            debug!(node = ?id, "focused widget destroyed, releasing focus");
            self.clear_focus();
        }
    }
}
