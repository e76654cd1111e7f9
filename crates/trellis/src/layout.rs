//! Per-axis size and position resolution.
//!
//! Each widget resolves its X and Y axes independently, at most once per
//! frame. Resolving an axis may first pull in the widget's neighbor, parent or
//! children on the same axis. The per-axis `resolved` flag is set before any
//! dependency is followed, so a dependency cycle terminates: the first widget
//! reached in the cycle keeps whatever geometry its dependencies had at that
//! moment.

use geom::{Aabb, Vec2};

use tracing::warn;

use crate::{anchor::Anchor, id::NodeId, world::Core};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis: left/right edges, width.
    X,
    /// Vertical axis: top/bottom edges, height.
    Y,
}

impl Axis {
    /// Both axes, in resolution order.
    pub const BOTH: [Self; 2] = [Self::X, Self::Y];

    /// The component of `v` along this axis.
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Overwrite the component of `v` along this axis.
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
        }
    }

    /// The low edge of `b` (left or top).
    pub fn min_edge(self, b: &Aabb) -> f32 {
        match self {
            Self::X => b.left(),
            Self::Y => b.top(),
        }
    }

    /// The high edge of `b` (right or bottom).
    pub fn max_edge(self, b: &Aabb) -> f32 {
        match self {
            Self::X => b.right(),
            Self::Y => b.bottom(),
        }
    }

    /// The size of `b` along this axis.
    pub fn extent(self, b: &Aabb) -> f32 {
        self.max_edge(b) - self.min_edge(b)
    }

    /// Resize `b` along this axis around its center.
    pub fn set_extent(self, b: &mut Aabb, extent: f32) {
        match self {
            Self::X => b.set_width(extent),
            Self::Y => b.set_height(extent),
        }
    }
}

/// A pair of values, one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerAxis<T> {
    /// Value for the X axis.
    pub x: T,
    /// Value for the Y axis.
    pub y: T,
}

impl<T> PerAxis<T> {
    /// The value for `axis`.
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Mutable access to the value for `axis`.
    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

impl<T: Copy> PerAxis<T> {
    /// The same value on both axes.
    pub fn splat(v: T) -> Self {
        Self { x: v, y: v }
    }
}

/// How a widget's size along one axis is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scaling {
    /// Size is whatever the caller set.
    #[default]
    Manual,
    /// Span of visible, non-external children plus padding on both sides.
    FitToChildren,
    /// Percentage of the neighbor's extent, minus padding on both sides.
    FitToNeighbor,
    /// Percentage of the parent's extent, minus padding on both sides.
    FitToParent,
}

/// Positions a widget relative to a neighbor.
///
/// After resolution, the widget's `from` anchor sits at the neighbor's `to`
/// anchor plus `offset`. The widget is moved, never resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Anchor on the attached widget.
    pub from: Anchor,
    /// Widget this one is positioned against.
    pub neighbor: NodeId,
    /// Anchor on the neighbor.
    pub to: Anchor,
    /// Fixed displacement from the neighbor's anchor.
    pub offset: Vec2,
}

/// Resolves layout against the arena for a single frame.
pub(crate) struct LayoutPass<'a> {
    /// Arena being resolved.
    core: &'a mut Core,
}

impl<'a> LayoutPass<'a> {
    /// Start a pass over `core`.
    pub(crate) fn new(core: &'a mut Core) -> Self {
        Self { core }
    }

    /// Resolve `id` on `axis`, pulling in its dependencies first.
    pub(crate) fn resolve(&mut self, id: NodeId, axis: Axis) {
        let Some(node) = self.core.node_mut(id) else {
            return;
        };
        let resolved = node.resolved.get_mut(axis);
        if *resolved {
            return;
        }
        *resolved = true;

        let attachment = node.attachment;
        let scaling = *node.scaling.get(axis);
        let padding = node.padding;
        let percent = node.scale_percent;
        let parent = node.parent;

        if let Some(attachment) = attachment {
            self.follow_neighbor(id, attachment, axis);
        }

        match scaling {
            Scaling::Manual => {}
            Scaling::FitToChildren => self.fit_to_children(id, axis, padding),
            Scaling::FitToNeighbor => {
                if let Some(attachment) = attachment {
                    self.fit_to(id, attachment.neighbor, axis, padding, percent);
                }
            }
            Scaling::FitToParent => {
                if let Some(parent) = parent {
                    self.fit_to(id, parent, axis, padding, percent);
                }
            }
        }
    }

    /// Move `id` along `axis` so its anchor lines up with the neighbor's.
    fn follow_neighbor(&mut self, id: NodeId, attachment: Attachment, axis: Axis) {
        self.resolve(attachment.neighbor, axis);
        let Some(target) = self
            .core
            .node(attachment.neighbor)
            .map(|n| attachment.to.point(&n.bounds))
        else {
            warn!(?id, neighbor = ?attachment.neighbor, "attachment neighbor is gone");
            return;
        };
        let Some(node) = self.core.node_mut(id) else {
            return;
        };
        let mut position = node.bounds.position();
        let own = attachment.from.point(&node.bounds);
        let value = axis.of(target) + axis.of(attachment.offset) + (axis.of(position) - axis.of(own));
        axis.set(&mut position, value);
        node.bounds.set_position(position);
    }

    /// Size `id` along `axis` to enclose its visible, non-external children.
    fn fit_to_children(&mut self, id: NodeId, axis: Axis, padding: f32) {
        let children = match self.core.node(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        let mut span: Option<(f32, f32)> = None;
        for child in children {
            self.resolve(child, axis);
            let Some(node) = self.core.node(child) else {
                continue;
            };
            if !node.is_visible() || node.external {
                continue;
            }
            let lo = axis.min_edge(&node.bounds);
            let hi = axis.max_edge(&node.bounds);
            span = Some(match span {
                None => (lo, hi),
                Some((min, max)) => (min.min(lo), max.max(hi)),
            });
        }
        let extent = span.map_or(0.0, |(min, max)| max - min);
        if let Some(node) = self.core.node_mut(id) {
            axis.set_extent(&mut node.bounds, extent + padding * 2.0);
        }
    }

    /// Size `id` along `axis` as a percentage of `source`'s extent.
    fn fit_to(&mut self, id: NodeId, source: NodeId, axis: Axis, padding: f32, percent: f32) {
        self.resolve(source, axis);
        let Some(extent) = self.core.node(source).map(|n| axis.extent(&n.bounds)) else {
            warn!(?id, ?source, "scaling source is gone");
            return;
        };
        if let Some(node) = self.core.node_mut(id) {
            axis.set_extent(&mut node.bounds, extent * (percent / 100.0) - padding * 2.0);
        }
    }
}
