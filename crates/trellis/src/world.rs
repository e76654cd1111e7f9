use std::{any::Any, mem};

use geom::{Aabb, Vec2};
use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    anchor::Anchor,
    context::NodeContext,
    error::{Error, Result},
    focus::FocusManager,
    id::{NodeId, TypedId},
    layout::{Attachment, Axis, LayoutPass, PerAxis, Scaling},
    node::{Flag, Flags, Node},
    signal::{Delegate, Signal},
    widget::Widget,
};

/// Core state for the widget arena, layout resolution and focus.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root widgets, in creation order.
    pub(crate) roots: Vec<NodeId>,
    /// Currently focused node.
    pub(crate) focus: Option<NodeId>,
    /// Between `begin_frame` and `end_frame`.
    pub(crate) in_frame: bool,
    /// Nodes destroyed during the current frame, freed by the sweep.
    pub(crate) graveyard: Vec<NodeId>,
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    /// Create an empty arena with no focus.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            focus: None,
            in_frame: false,
            graveyard: Vec::new(),
        }
    }

    /// Look up a live node. Destroyed nodes awaiting the sweep are not returned.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into()).filter(|n| !n.doomed)
    }

    /// Mutable lookup of a live node.
    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node_id).filter(|n| !n.doomed)
    }

    /// Look up a live node or report it missing.
    fn live(&self, node_id: NodeId) -> Result<&Node> {
        self.node(node_id).ok_or(Error::NodeNotFound(node_id))
    }

    /// Mutable lookup of a live node or report it missing.
    fn live_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.node_mut(node_id).ok_or(Error::NodeNotFound(node_id))
    }

    /// Does the handle refer to a live widget?
    pub fn contains(&self, node_id: impl Into<NodeId>) -> bool {
        self.node(node_id).is_some()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.nodes.values().filter(|n| !n.doomed).count()
    }

    /// True if the arena holds no live widgets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root widgets in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a widget in order.
    pub fn children(&self, node_id: impl Into<NodeId>) -> Result<&[NodeId]> {
        Ok(self.live(node_id.into())?.children())
    }

    /// Parent of a widget, `None` for roots.
    pub fn parent(&self, node_id: impl Into<NodeId>) -> Result<Option<NodeId>> {
        Ok(self.live(node_id.into())?.parent)
    }

    /// Hierarchy depth of a widget.
    pub fn depth(&self, node_id: impl Into<NodeId>) -> Result<usize> {
        Ok(self.live(node_id.into())?.depth)
    }

    /// Bounds of a widget.
    pub fn bounds(&self, node_id: impl Into<NodeId>) -> Result<Aabb> {
        Ok(self.live(node_id.into())?.bounds)
    }

    /// Clip region of a widget, as of the last tick.
    pub fn view(&self, node_id: impl Into<NodeId>) -> Result<Aabb> {
        Ok(self.live(node_id.into())?.view)
    }

    /// Create a root widget.
    pub fn create_root<W>(&mut self, widget: W) -> TypedId<W>
    where
        W: Widget,
    {
        let node_id = self.nodes.insert(Node::new(Box::new(widget)));
        self.roots.push(node_id);
        debug!(?node_id, name = %self.nodes[node_id].name, "created root");
        TypedId::new(node_id)
    }

    /// Create a widget as the last child of `parent`.
    ///
    /// The child starts with a copy of the parent's flags. Later changes to
    /// either are independent.
    pub fn create<W>(&mut self, parent: impl Into<NodeId>, widget: W) -> Result<TypedId<W>>
    where
        W: Widget,
    {
        let parent = parent.into();
        let parent_node = self.live(parent)?;
        let flags = parent_node.flags;
        let depth = parent_node.depth + usize::from(parent_node.container);

        let mut node = Node::new(Box::new(widget));
        node.parent = Some(parent);
        node.flags = flags;
        node.depth = depth;
        let node_id = self.nodes.insert(node);
        self.live_mut(parent)?.children.push(node_id);
        debug!(?node_id, ?parent, name = %self.nodes[node_id].name, "created child");
        Ok(TypedId::new(node_id))
    }

    /// Is `ancestor` equal to `node_id` or one of its ancestors?
    fn is_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Remove a node from its parent's children, or from the root list.
    fn unlink(&mut self, node_id: NodeId) {
        let parent = self.nodes.get(node_id).and_then(|n| n.parent);
        let siblings = match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        if let Some(pos) = siblings.iter().position(|id| *id == node_id) {
            siblings.remove(pos);
        }
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent = None;
        }
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// The parent's flags are copied over the whole moved subtree, and depths
    /// are recomputed.
    pub fn set_parent(&mut self, child: impl Into<NodeId>, parent: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        let parent = parent.into();
        self.live(child)?;
        let flags = self.live(parent)?.flags;
        if self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        self.unlink(child);
        self.live_mut(parent)?.children.push(child);
        self.live_mut(child)?.parent = Some(parent);

        for node_id in self.subtree_pre_order(child) {
            if let Some(node) = self.node_mut(node_id) {
                node.flags = flags;
            }
        }
        self.sync_depth(child);
        debug!(?child, ?parent, "reparented");
        Ok(())
    }

    /// Recompute stored depth for a subtree from its parent's depth.
    pub(crate) fn sync_depth(&mut self, node_id: NodeId) {
        for id in self.subtree_pre_order(node_id) {
            let depth = self
                .node(id)
                .and_then(|n| n.parent)
                .and_then(|p| self.node(p))
                .map_or(0, |p| p.depth + usize::from(p.container));
            if let Some(node) = self.node_mut(id) {
                node.depth = depth;
            }
        }
    }

    /// Destroy a widget and everything beneath it.
    ///
    /// Outside a frame the nodes are freed at once. Inside a frame the subtree
    /// is detached immediately and freed by the sweep in [`Core::end_frame`];
    /// until then its handles no longer resolve.
    pub fn destroy_recursive(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let node_id = node_id.into();
        self.live(node_id)?;
        self.unlink(node_id);

        let doomed = self.subtree_post_order(node_id);
        debug!(?node_id, count = doomed.len(), deferred = self.in_frame, "destroying subtree");
        if self.in_frame {
            for id in &doomed {
                if let Some(node) = self.nodes.get_mut(*id) {
                    node.doomed = true;
                }
            }
            self.graveyard.extend(doomed);
        } else {
            for id in doomed {
                self.nodes.remove(id);
            }
            self.release_dangling();
        }
        Ok(())
    }

    /// Free nodes destroyed during the frame.
    fn sweep(&mut self) {
        if self.graveyard.is_empty() {
            return;
        }
        let dead = mem::take(&mut self.graveyard);
        debug!(count = dead.len(), "sweeping destroyed widgets");
        for id in dead {
            self.nodes.remove(id);
        }
        self.release_dangling();
    }

    /// Clear attachments and focus that point at freed nodes.
    fn release_dangling(&mut self) {
        let stale: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| {
                n.attachment
                    .is_some_and(|a| !self.nodes.contains_key(a.neighbor))
            })
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            if let Some(node) = self.nodes.get_mut(id) {
                debug!(node_id = ?id, "clearing attachment to destroyed neighbor");
                node.attachment = None;
            }
        }
        self.ensure_focus_valid();
    }

    /// Collect a subtree in pre-order, including the root.
    pub fn subtree_pre_order(&self, root: impl Into<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root.into()];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Subtree nodes stably sorted by depth, ascending or descending.
    ///
    /// Nodes of equal depth keep their pre-order discovery order.
    pub fn bf_order(&self, root: impl Into<NodeId>, include_caller: bool, reverse: bool) -> Vec<NodeId> {
        let root = root.into();
        let mut order: Vec<(usize, NodeId)> = self
            .subtree_pre_order(root)
            .into_iter()
            .filter(|id| include_caller || *id != root)
            .filter_map(|id| self.node(id).map(|n| (n.depth, id)))
            .collect();
        if reverse {
            order.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            order.sort_by(|a, b| a.0.cmp(&b.0));
        }
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Visit a subtree depth-first in pre-order.
    ///
    /// Children lists are snapshotted before they are walked, so `f` may
    /// create or destroy widgets. Widgets destroyed before they are reached
    /// are skipped.
    pub fn recurse_children(
        &mut self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        mut f: impl FnMut(&mut Self, NodeId) -> Result<()>,
    ) -> Result<()> {
        let node_id = node_id.into();
        self.live(node_id)?;
        self.walk_if(node_id, include_caller, &mut |_: &Node| true, &mut f)
    }

    /// Visit a subtree depth-first, skipping every subtree whose root fails
    /// `pred`. The caller is only tested when it is included.
    pub fn recurse_children_if(
        &mut self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        mut pred: impl FnMut(&Node) -> bool,
        mut f: impl FnMut(&mut Self, NodeId) -> Result<()>,
    ) -> Result<()> {
        let node_id = node_id.into();
        self.live(node_id)?;
        self.walk_if(node_id, include_caller, &mut pred, &mut f)
    }

    /// Pre-order walk shared by the recursive visitors.
    fn walk_if(
        &mut self,
        node_id: NodeId,
        include: bool,
        pred: &mut dyn FnMut(&Node) -> bool,
        f: &mut dyn FnMut(&mut Self, NodeId) -> Result<()>,
    ) -> Result<()> {
        if include {
            if !self.node(node_id).is_some_and(|n| pred(n)) {
                return Ok(());
            }
            f(self, node_id)?;
        }
        let children = match self.node(node_id) {
            Some(node) => node.children.clone(),
            None => return Ok(()),
        };
        for child in children {
            self.walk_if(child, true, pred, f)?;
        }
        Ok(())
    }

    /// Visit a subtree in breadth-first depth order.
    ///
    /// The subtree is flattened and stably sorted by depth before any visit,
    /// so containers come before their contents (or after, when `reverse`).
    pub fn recurse_children_bf(
        &mut self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        reverse: bool,
        mut f: impl FnMut(&mut Self, NodeId) -> Result<()>,
    ) -> Result<()> {
        let node_id = node_id.into();
        self.live(node_id)?;
        for id in self.bf_order(node_id, include_caller, reverse) {
            if self.contains(id) {
                f(self, id)?;
            }
        }
        Ok(())
    }

    /// Visit a widget's ancestors, nearest first.
    pub fn recurse_parents(
        &mut self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        mut f: impl FnMut(&mut Self, NodeId) -> Result<()>,
    ) -> Result<()> {
        let node_id = node_id.into();
        let mut current = if include_caller {
            self.live(node_id)?;
            Some(node_id)
        } else {
            self.live(node_id)?.parent
        };
        while let Some(id) = current {
            f(self, id)?;
            current = self.node(id).and_then(|n| n.parent);
        }
        Ok(())
    }

    /// Does any node in the subtree satisfy `pred`? Stops at the first match.
    pub fn is_any_child_recursive(
        &self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Result<bool> {
        let node_id = node_id.into();
        let node = self.live(node_id)?;
        if include_caller && pred(node) {
            return Ok(true);
        }
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if pred(node) {
                return Ok(true);
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(false)
    }

    /// Does any ancestor satisfy `pred`? Stops at the first match.
    pub fn is_any_parent_recursive(
        &self,
        node_id: impl Into<NodeId>,
        include_caller: bool,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Result<bool> {
        let node_id = node_id.into();
        let node = self.live(node_id)?;
        if include_caller && pred(node) {
            return Ok(true);
        }
        let mut current = node.parent.and_then(|p| self.node(p));
        while let Some(node) = current {
            if pred(node) {
                return Ok(true);
            }
            current = node.parent.and_then(|p| self.node(p));
        }
        Ok(false)
    }

    /// Start a frame: clear every resolved marker and defer destruction.
    pub fn begin_frame(&mut self) {
        trace!(nodes = self.nodes.len(), "begin frame");
        self.in_frame = true;
        self.reset_layout();
    }

    /// End a frame: free widgets destroyed during it.
    pub fn end_frame(&mut self) {
        self.in_frame = false;
        self.sweep();
        self.debug_assert_tree_invariants();
        trace!(nodes = self.nodes.len(), "end frame");
    }

    /// Is a frame in progress?
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Mark every widget unresolved on both axes.
    pub fn reset_layout(&mut self) {
        for node in self.nodes.values_mut() {
            node.resolved = PerAxis::default();
        }
    }

    /// Resolve one axis of a widget's layout, pulling in its dependencies.
    ///
    /// Each axis resolves at most once until the next
    /// [`begin_frame`](Core::begin_frame) or [`reset_layout`](Core::reset_layout).
    pub fn resolve(&mut self, node_id: impl Into<NodeId>, axis: Axis) -> Result<()> {
        let node_id = node_id.into();
        self.live(node_id)?;
        LayoutPass::new(self).resolve(node_id, axis);
        Ok(())
    }

    /// Resolve both axes, X first.
    pub fn resolve_both(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let node_id = node_id.into();
        for axis in Axis::BOTH {
            self.resolve(node_id, axis)?;
        }
        Ok(())
    }

    /// Borrow a widget by its typed handle.
    pub fn widget<W>(&self, node_id: TypedId<W>) -> Result<&W>
    where
        W: Widget,
    {
        let id = node_id.node();
        let widget = self
            .live(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        let any: &dyn Any = widget;
        any.downcast_ref::<W>()
            .ok_or_else(|| Error::InvalidOperation(format!("widget type mismatch for {id:?}")))
    }

    /// Mutably borrow a widget by its typed handle.
    pub fn widget_mut<W>(&mut self, node_id: TypedId<W>) -> Result<&mut W>
    where
        W: Widget,
    {
        let id = node_id.node();
        let widget = self
            .live_mut(id)?
            .widget
            .as_deref_mut()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        let any: &mut dyn Any = widget;
        any.downcast_mut::<W>()
            .ok_or_else(|| Error::InvalidOperation(format!("widget type mismatch for {id:?}")))
    }

    /// Take a widget out of its slot for a single call, then put it back.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let mut widget = self
            .live_mut(node_id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        let out = f(widget.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(node_id)
            && node.widget.is_none()
        {
            node.widget = Some(widget);
        }
        Ok(out)
    }

    /// Subscribe a handler to one of a widget's channels.
    pub fn connect(
        &mut self,
        node_id: impl Into<NodeId>,
        signal: Signal,
        handler: impl FnMut(&mut dyn NodeContext) -> Result<()> + 'static,
    ) -> Result<()> {
        self.live_mut(node_id.into())?
            .signals
            .get_mut(signal)
            .connect(Box::new(handler));
        Ok(())
    }

    /// Drop every handler on one of a widget's channels.
    pub fn disconnect_all(&mut self, node_id: impl Into<NodeId>, signal: Signal) -> Result<()> {
        self.live_mut(node_id.into())?
            .signals
            .get_mut(signal)
            .clear();
        Ok(())
    }

    /// Number of handlers subscribed to a channel.
    pub fn handler_count(&self, node_id: impl Into<NodeId>, signal: Signal) -> Result<usize> {
        Ok(self.live(node_id.into())?.signals.get(signal).len())
    }

    /// Take a channel's handlers out so they can run against `&mut Core`.
    pub(crate) fn take_delegate(&mut self, node_id: NodeId, signal: Signal) -> Option<Delegate> {
        let delegate = self.node_mut(node_id)?.signals.get_mut(signal);
        if delegate.is_empty() {
            return None;
        }
        Some(mem::take(delegate))
    }

    /// Put handlers back after firing, keeping any subscribed meanwhile.
    pub(crate) fn restore_delegate(&mut self, node_id: NodeId, signal: Signal, delegate: Delegate) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            let slot = node.signals.get_mut(signal);
            let later = mem::replace(slot, delegate);
            slot.absorb(later);
        }
    }

    /// Replace a widget's bounds.
    pub fn set_bounds(&mut self, node_id: impl Into<NodeId>, bounds: Aabb) -> Result<()> {
        self.live_mut(node_id.into())?.bounds = bounds;
        Ok(())
    }

    /// Move a widget's center.
    pub fn set_position(&mut self, node_id: impl Into<NodeId>, position: impl Into<Vec2>) -> Result<()> {
        self.live_mut(node_id.into())?
            .bounds
            .set_position(position.into());
        Ok(())
    }

    /// Resize a widget around its center.
    pub fn set_half_size(&mut self, node_id: impl Into<NodeId>, half_size: impl Into<Vec2>) -> Result<()> {
        self.live_mut(node_id.into())?
            .bounds
            .set_half_size(half_size.into());
        Ok(())
    }

    /// Resize a widget around its center, from a full size.
    pub fn set_size(&mut self, node_id: impl Into<NodeId>, size: impl Into<Vec2>) -> Result<()> {
        self.live_mut(node_id.into())?.bounds.set_size(size.into());
        Ok(())
    }

    /// Position `node_id` so its `from` anchor follows `neighbor`'s `to`
    /// anchor plus `offset`.
    ///
    /// Mutual attachments are accepted; within a frame the widget resolved
    /// first keeps the geometry its neighbor had at that moment.
    pub fn attach(
        &mut self,
        node_id: impl Into<NodeId>,
        from: Anchor,
        neighbor: impl Into<NodeId>,
        to: Anchor,
        offset: impl Into<Vec2>,
    ) -> Result<()> {
        let node_id = node_id.into();
        let neighbor = neighbor.into();
        if node_id == neighbor {
            return Err(Error::InvalidOperation(format!(
                "cannot attach {node_id:?} to itself"
            )));
        }
        self.live(neighbor)?;
        self.live_mut(node_id)?.attachment = Some(Attachment {
            from,
            neighbor,
            to,
            offset: offset.into(),
        });
        Ok(())
    }

    /// Remove a widget's attachment, returning it.
    pub fn detach_neighbor(&mut self, node_id: impl Into<NodeId>) -> Result<Option<Attachment>> {
        Ok(self.live_mut(node_id.into())?.attachment.take())
    }

    /// Set the scaling policy on both axes.
    pub fn set_scaling(&mut self, node_id: impl Into<NodeId>, scaling: Scaling) -> Result<()> {
        self.live_mut(node_id.into())?.scaling = PerAxis::splat(scaling);
        Ok(())
    }

    /// Set the scaling policy on one axis.
    pub fn set_scaling_axis(
        &mut self,
        node_id: impl Into<NodeId>,
        axis: Axis,
        scaling: Scaling,
    ) -> Result<()> {
        *self.live_mut(node_id.into())?.scaling.get_mut(axis) = scaling;
        Ok(())
    }

    /// Set the horizontal scaling policy.
    pub fn set_scaling_x(&mut self, node_id: impl Into<NodeId>, scaling: Scaling) -> Result<()> {
        self.set_scaling_axis(node_id, Axis::X, scaling)
    }

    /// Set the vertical scaling policy.
    pub fn set_scaling_y(&mut self, node_id: impl Into<NodeId>, scaling: Scaling) -> Result<()> {
        self.set_scaling_axis(node_id, Axis::Y, scaling)
    }

    /// Set the padding used by the scaling policies.
    pub fn set_padding(&mut self, node_id: impl Into<NodeId>, padding: f32) -> Result<()> {
        self.live_mut(node_id.into())?.padding = padding;
        Ok(())
    }

    /// Set the percentage used by the neighbor and parent scaling policies.
    pub fn set_scale_percent(&mut self, node_id: impl Into<NodeId>, percent: f32) -> Result<()> {
        self.live_mut(node_id.into())?.scale_percent = percent;
        Ok(())
    }

    /// Mark a widget as a container, pushing its children one depth level down.
    pub fn set_container(&mut self, node_id: impl Into<NodeId>, container: bool) -> Result<()> {
        let node_id = node_id.into();
        self.live_mut(node_id)?.container = container;
        self.sync_depth(node_id);
        Ok(())
    }

    /// Exclude a widget from its parent's fit-to-children span.
    pub fn set_external(&mut self, node_id: impl Into<NodeId>, external: bool) -> Result<()> {
        self.live_mut(node_id.into())?.external = external;
        Ok(())
    }

    /// Raw flags of a widget.
    pub fn flags(&self, node_id: impl Into<NodeId>) -> Result<Flags> {
        Ok(self.live(node_id.into())?.flags)
    }

    /// Set one flag on a single widget.
    pub fn set_flag(&mut self, node_id: impl Into<NodeId>, flag: Flag, value: bool) -> Result<()> {
        self.live_mut(node_id.into())?.flags.set(flag, value);
        Ok(())
    }

    /// Overwrite one flag on a widget and every descendant.
    ///
    /// This is an overwrite, not a merge: each descendant ends up with
    /// `value` regardless of what it held before.
    pub fn set_flag_recursive(&mut self, node_id: impl Into<NodeId>, flag: Flag, value: bool) -> Result<()> {
        self.set_flag_where(node_id.into(), flag, value, |_| true)
    }

    /// Overwrite one flag on every node of a subtree that passes `filter`.
    fn set_flag_where(
        &mut self,
        node_id: NodeId,
        flag: Flag,
        value: bool,
        filter: impl Fn(&Node) -> bool,
    ) -> Result<()> {
        self.live(node_id)?;
        for id in self.subtree_pre_order(node_id) {
            if let Some(node) = self.node_mut(id)
                && filter(node)
            {
                node.flags.set(flag, value);
            }
        }
        Ok(())
    }

    /// Set `hidden` on a single widget.
    pub fn set_hidden(&mut self, node_id: impl Into<NodeId>, hidden: bool) -> Result<()> {
        self.set_flag(node_id, Flag::Hidden, hidden)
    }

    /// Set `hidden` on a widget and every descendant.
    pub fn set_hidden_recursive(&mut self, node_id: impl Into<NodeId>, hidden: bool) -> Result<()> {
        self.set_flag_recursive(node_id, Flag::Hidden, hidden)
    }

    /// Hide a widget and its subtree.
    pub fn hide(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        self.set_hidden_recursive(node_id, true)
    }

    /// Unhide a widget and its subtree.
    pub fn show(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        self.set_hidden_recursive(node_id, false)
    }

    /// Set `excluded` on a single widget.
    pub fn set_excluded(&mut self, node_id: impl Into<NodeId>, excluded: bool) -> Result<()> {
        self.set_flag(node_id, Flag::Excluded, excluded)
    }

    /// Set `excluded` on a widget and every descendant.
    pub fn set_excluded_recursive(&mut self, node_id: impl Into<NodeId>, excluded: bool) -> Result<()> {
        self.set_flag_recursive(node_id, Flag::Excluded, excluded)
    }

    /// Set `excluded` on the nodes of a subtree that share the widget's depth.
    ///
    /// Nested containers, which sit deeper, are left untouched.
    pub fn set_excluded_same_depth(&mut self, node_id: impl Into<NodeId>, excluded: bool) -> Result<()> {
        let node_id = node_id.into();
        let depth = self.live(node_id)?.depth;
        self.set_flag_where(node_id, Flag::Excluded, excluded, |n| n.depth == depth)
    }

    /// Set `collapsed` on a single widget.
    pub fn set_collapsed(&mut self, node_id: impl Into<NodeId>, collapsed: bool) -> Result<()> {
        self.set_flag(node_id, Flag::Collapsed, collapsed)
    }

    /// Set `collapsed` on a widget and every descendant.
    pub fn set_collapsed_recursive(&mut self, node_id: impl Into<NodeId>, collapsed: bool) -> Result<()> {
        self.set_flag_recursive(node_id, Flag::Collapsed, collapsed)
    }

    /// Set `active` on a single widget.
    pub fn set_active(&mut self, node_id: impl Into<NodeId>, active: bool) -> Result<()> {
        self.set_flag(node_id, Flag::Active, active)
    }

    /// Set `active` on a widget and every descendant.
    pub fn set_active_recursive(&mut self, node_id: impl Into<NodeId>, active: bool) -> Result<()> {
        self.set_flag_recursive(node_id, Flag::Active, active)
    }

    /// Set `visible` on a single widget.
    pub fn set_visible(&mut self, node_id: impl Into<NodeId>, visible: bool) -> Result<()> {
        self.set_flag(node_id, Flag::Visible, visible)
    }

    /// Set `visible` on a widget and every descendant.
    pub fn set_visible_recursive(&mut self, node_id: impl Into<NodeId>, visible: bool) -> Result<()> {
        self.set_flag_recursive(node_id, Flag::Visible, visible)
    }

    #[cfg(debug_assertions)]
    /// Assert parent/child links, depths and focus are consistent.
    pub(crate) fn debug_assert_tree_invariants(&self) {
        for (id, node) in &self.nodes {
            match node.parent {
                Some(parent) => {
                    let parent_node = &self.nodes[parent];
                    debug_assert_eq!(
                        parent_node.children.iter().filter(|c| **c == id).count(),
                        1,
                        "child {id:?} not listed exactly once by its parent"
                    );
                    debug_assert_eq!(
                        node.depth,
                        parent_node.depth + usize::from(parent_node.container),
                        "stale depth on {id:?}"
                    );
                }
                None => debug_assert!(self.roots.contains(&id), "orphan {id:?} is not a root"),
            }
            for child in &node.children {
                debug_assert_eq!(self.nodes[*child].parent, Some(id));
            }
        }
        if let Some(focus) = self.focus {
            debug_assert!(self.nodes.contains_key(focus), "focus points at a freed node");
        }
    }

    #[cfg(not(debug_assertions))]
    /// No-op in release builds.
    pub(crate) fn debug_assert_tree_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Panel;

    fn tree() -> (Core, NodeId, NodeId, NodeId) {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let a = core.create(root, Panel).unwrap().node();
        let b = core.create(a, Panel).unwrap().node();
        (core, root, a, b)
    }

    #[test]
    fn create_copies_parent_flags() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel);
        core.set_hidden(root, true)?;
        core.set_active(root, false)?;
        let child = core.create(root, Panel)?;
        let flags = core.flags(child)?;
        assert!(flags.hidden);
        assert!(!flags.active);

        core.set_hidden(root, false)?;
        assert!(core.flags(child)?.hidden);
        Ok(())
    }

    #[test]
    fn reparent_rejects_cycles() -> Result<()> {
        let (mut core, root, a, b) = tree();
        assert_eq!(
            core.set_parent(a, b),
            Err(Error::WouldCreateCycle { parent: b, child: a })
        );
        assert_eq!(
            core.set_parent(root, root),
            Err(Error::WouldCreateCycle {
                parent: root,
                child: root
            })
        );
        assert_eq!(core.children(root)?, &[a]);
        Ok(())
    }

    #[test]
    fn reparent_moves_root_into_tree() -> Result<()> {
        let (mut core, root, _a, b) = tree();
        let other = core.create_root(Panel).node();
        core.set_container(b, true)?;
        core.set_parent(other, b)?;
        assert_eq!(core.roots(), &[root]);
        assert_eq!(core.parent(other)?, Some(b));
        assert_eq!(core.depth(other)?, 1);
        Ok(())
    }

    #[test]
    fn depth_follows_containers() -> Result<()> {
        let (mut core, root, a, b) = tree();
        assert_eq!(core.depth(b)?, 0);
        core.set_container(root, true)?;
        assert_eq!(core.depth(a)?, 1);
        assert_eq!(core.depth(b)?, 1);
        core.set_container(a, true)?;
        assert_eq!(core.depth(b)?, 2);
        Ok(())
    }

    #[test]
    fn destroy_outside_frame_is_immediate() -> Result<()> {
        let (mut core, root, a, b) = tree();
        core.destroy_recursive(a)?;
        assert!(!core.contains(a));
        assert!(!core.contains(b));
        assert_eq!(core.len(), 1);
        assert!(core.children(root)?.is_empty());
        assert_eq!(core.destroy_recursive(a), Err(Error::NodeNotFound(a)));
        Ok(())
    }

    #[test]
    fn destroy_inside_frame_is_deferred() -> Result<()> {
        let (mut core, root, a, b) = tree();
        core.begin_frame();
        core.destroy_recursive(a)?;
        assert!(core.node(b).is_none());
        assert!(core.children(root)?.is_empty());
        assert_eq!(core.nodes.len(), 3);
        core.end_frame();
        assert_eq!(core.nodes.len(), 1);
        Ok(())
    }

    #[test]
    fn sweep_clears_stale_attachment() -> Result<()> {
        let (mut core, root, a, _b) = tree();
        let other = core.create(root, Panel)?;
        core.attach(other, Anchor::Left, a, Anchor::Right, Vec2::ZERO)?;
        core.destroy_recursive(a)?;
        assert_eq!(core.node(other).and_then(|n| n.attachment()), None);
        Ok(())
    }

    #[test]
    fn attach_to_self_is_rejected() {
        let (mut core, _root, a, _b) = tree();
        assert!(matches!(
            core.attach(a, Anchor::Left, a, Anchor::Right, Vec2::ZERO),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn typed_widget_access() -> Result<()> {
        let mut core = Core::new();
        let label = core.create_root(crate::widget::Label::new("hi"));
        core.widget_mut(label)?.text.push('!');
        assert_eq!(core.widget(label)?.text, "hi!");

        let wrong: TypedId<Panel> = TypedId::new(label.node());
        assert!(matches!(core.widget(wrong), Err(Error::InvalidOperation(_))));
        Ok(())
    }

    #[test]
    fn recurse_parents_walks_to_root() -> Result<()> {
        let (mut core, root, a, b) = tree();
        let mut seen = Vec::new();
        core.recurse_parents(b, true, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![b, a, root]);

        seen.clear();
        core.recurse_parents(b, false, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![a, root]);
        Ok(())
    }

    #[test]
    fn recurse_children_if_prunes() -> Result<()> {
        let (mut core, root, a, b) = tree();
        let c = core.create(root, Panel)?.node();
        core.set_hidden(a, true)?;
        let mut seen = Vec::new();
        core.recurse_children_if(
            root,
            true,
            |n| !n.is_hidden(),
            |_, id| {
                seen.push(id);
                Ok(())
            },
        )?;
        assert_eq!(seen, vec![root, c]);
        assert!(!seen.contains(&b));
        Ok(())
    }

    #[test]
    fn existential_queries() -> Result<()> {
        let (mut core, root, a, b) = tree();
        core.set_collapsed(b, true)?;
        assert!(core.is_any_child_recursive(root, true, |n| n.is_collapsed())?);
        assert!(!core.is_any_child_recursive(b, false, |n| n.is_collapsed())?);
        core.set_container(a, true)?;
        assert!(core.is_any_parent_recursive(b, false, |n| n.is_container())?);
        assert!(!core.is_any_parent_recursive(a, false, |n| n.is_container())?);
        Ok(())
    }

    #[test]
    fn traversal_callback_may_destroy() -> Result<()> {
        let (mut core, root, a, _b) = tree();
        let c = core.create(root, Panel)?.node();
        core.begin_frame();
        let mut seen = Vec::new();
        core.recurse_children(root, true, |core, id| {
            seen.push(id);
            if id == a {
                core.destroy_recursive(c)?;
            }
            Ok(())
        })?;
        core.end_frame();
        assert!(!seen.contains(&c));
        assert_eq!(core.children(root)?, &[a]);
        Ok(())
    }
}
