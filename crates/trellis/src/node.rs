use geom::Aabb;

use crate::{
    id::NodeId,
    input::MouseButton,
    layout::{Attachment, PerAxis, Scaling},
    signal::Signals,
    widget::Widget,
};

/// One of the independently settable state flags on a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Hidden by the user; implies invisible and inactive.
    Hidden,
    /// Excluded from the interface entirely; implies invisible and inactive.
    Excluded,
    /// Collapsed by an enclosing window; implies invisible and inactive.
    Collapsed,
    /// Allowed to receive input.
    Active,
    /// Allowed to draw.
    Visible,
}

/// The raw state flags of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// See [`Flag::Hidden`].
    pub hidden: bool,
    /// See [`Flag::Excluded`].
    pub excluded: bool,
    /// See [`Flag::Collapsed`].
    pub collapsed: bool,
    /// See [`Flag::Active`].
    pub active: bool,
    /// See [`Flag::Visible`].
    pub visible: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            hidden: false,
            excluded: false,
            collapsed: false,
            active: true,
            visible: true,
        }
    }
}

impl Flags {
    /// Read a single flag.
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Hidden => self.hidden,
            Flag::Excluded => self.excluded,
            Flag::Collapsed => self.collapsed,
            Flag::Active => self.active,
            Flag::Visible => self.visible,
        }
    }

    /// Overwrite a single flag.
    pub fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Hidden => self.hidden = value,
            Flag::Excluded => self.excluded = value,
            Flag::Collapsed => self.collapsed = value,
            Flag::Active => self.active = value,
            Flag::Visible => self.visible = value,
        }
    }

    /// True if any of the flags that suppress both drawing and input is set.
    fn suppressed(&self) -> bool {
        self.hidden || self.excluded || self.collapsed
    }

    /// `visible` and not hidden, excluded or collapsed.
    pub fn is_visible(&self) -> bool {
        self.visible && !self.suppressed()
    }

    /// `active` and not hidden, excluded or collapsed.
    pub fn is_active(&self) -> bool {
        self.active && !self.suppressed()
    }
}

/// Runtime interaction state, recomputed from input each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    /// Holds the context's exclusive focus.
    pub focused: bool,
    /// Mouse is over the widget. Only meaningful while the widget is active.
    pub hovered: bool,
    /// Left button went down over the widget and has not been released.
    pub pressed_left: bool,
    /// Right button went down over the widget and has not been released.
    pub pressed_right: bool,
}

impl Status {
    /// Is `button` held on the widget? Buttons without channels never are.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.pressed_left,
            MouseButton::Right => self.pressed_right,
            MouseButton::Middle => false,
        }
    }

    /// Record a press or release of `button`.
    pub(crate) fn set_pressed(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.pressed_left = pressed,
            MouseButton::Right => self.pressed_right = pressed,
            MouseButton::Middle => {}
        }
    }
}

/// A widget node stored in the arena.
pub struct Node {
    /// Widget behaviour. Temporarily `None` while a hook runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Widget name, captured at creation.
    pub(crate) name: String,

    /// Parent in the tree, `None` for roots.
    pub(crate) parent: Option<NodeId>,
    /// Owned children, in creation order.
    pub(crate) children: Vec<NodeId>,

    /// Position and half-size.
    pub(crate) bounds: Aabb,
    /// Clip region: bounds intersected with the parent's view.
    pub(crate) view: Aabb,
    /// Hierarchy depth, derived from the parent chain.
    pub(crate) depth: usize,
    /// Children sit one depth level deeper.
    pub(crate) container: bool,
    /// Ignored by the parent's fit-to-children computation.
    pub(crate) external: bool,

    /// Raw state flags.
    pub(crate) flags: Flags,
    /// Interaction status.
    pub(crate) status: Status,

    /// Positional dependency on a neighbor.
    pub(crate) attachment: Option<Attachment>,
    /// Scaling policy per axis.
    pub(crate) scaling: PerAxis<Scaling>,
    /// Absolute padding used by the scaling policies.
    pub(crate) padding: f32,
    /// Percentage used by the neighbor and parent scaling policies.
    pub(crate) scale_percent: f32,
    /// Per-axis "resolved this frame" markers.
    pub(crate) resolved: PerAxis<bool>,

    /// Notification channels.
    pub(crate) signals: Signals,
    /// Destroyed during the current frame, awaiting the sweep.
    pub(crate) doomed: bool,
}

impl Node {
    /// Construct a detached node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            name,
            parent: None,
            children: Vec::new(),
            bounds: Aabb::default(),
            view: Aabb::default(),
            depth: 0,
            container: false,
            external: false,
            flags: Flags::default(),
            status: Status::default(),
            attachment: None,
            scaling: PerAxis::default(),
            padding: 0.0,
            scale_percent: 100.0,
            resolved: PerAxis::default(),
            signals: Signals::default(),
            doomed: false,
        }
    }

    /// Widget name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position and half-size.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Clip region computed during the last tick.
    pub fn view(&self) -> Aabb {
        self.view
    }

    /// Hierarchy depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Is this node a container?
    pub fn is_container(&self) -> bool {
        self.container
    }

    /// Is this node excluded from its parent's fit-to-children span?
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Raw state flags.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Interaction status. `hovered` here is the raw value; see [`Node::is_hovered`].
    pub fn status(&self) -> Status {
        self.status
    }

    /// Attachment, if one is configured.
    pub fn attachment(&self) -> Option<Attachment> {
        self.attachment
    }

    /// Scaling policy per axis.
    pub fn scaling(&self) -> PerAxis<Scaling> {
        self.scaling
    }

    /// Padding used by the scaling policies.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Percentage used by the neighbor and parent scaling policies.
    pub fn scale_percent(&self) -> f32 {
        self.scale_percent
    }

    /// Is the node hidden?
    pub fn is_hidden(&self) -> bool {
        self.flags.hidden
    }

    /// Is the node excluded?
    pub fn is_excluded(&self) -> bool {
        self.flags.excluded
    }

    /// Is the node collapsed?
    pub fn is_collapsed(&self) -> bool {
        self.flags.collapsed
    }

    /// Will the node be drawn?
    pub fn is_visible(&self) -> bool {
        self.flags.is_visible()
    }

    /// Will the node react to input?
    pub fn is_active(&self) -> bool {
        self.flags.is_active()
    }

    /// Does the node hold focus?
    pub fn is_focused(&self) -> bool {
        self.status.focused
    }

    /// Is the mouse over an active node?
    pub fn is_hovered(&self) -> bool {
        self.is_active() && self.status.hovered
    }

    /// Is either mouse button held on this node?
    pub fn is_pressed_any(&self) -> bool {
        self.status.pressed_left || self.status.pressed_right
    }
}
