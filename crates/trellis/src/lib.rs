//! Trellis: a retained-mode widget tree with per-axis constraint layout.
//!
//! Widgets live in an arena ([`Core`]) and are addressed by generational
//! handles, so a reference to a destroyed widget fails with
//! [`Error::NodeNotFound`] instead of dangling.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Context`] - Owns the arena, input, render sink and style; drives frames
//! - [`Core`] - The arena, layout resolution, cascades and traversal
//! - [`Widget`] - The trait implemented by all widgets
//!
//! # Layout
//!
//! Each widget resolves its X and Y axes independently, once per frame. A
//! widget may be attached to a neighbor (see [`Anchor`]) and may size itself
//! from its children, its neighbor or its parent (see [`Scaling`]).

#![warn(missing_docs)]

mod anchor;
mod context;
mod dispatch;
mod focus;
mod id;
mod input;
mod node;
mod render;
mod signal;
mod style;
mod widget;
mod world;

pub mod backend;
pub mod error;
pub mod layout;
pub mod prelude;

pub use anchor::Anchor;
pub use context::{Context, NodeContext};
pub use error::{Error, Result};
pub use focus::FocusManager;
pub use geom::{self, Aabb, Vec2};
pub use id::{NodeId, TypedId};
pub use input::{Event, Key, MouseButton};
pub use layout::{Attachment, Axis, PerAxis, Scaling};
pub use node::{Flag, Flags, Node, Status};
pub use render::{Drawable, Frame};
pub use signal::{Delegate, Handler, Signal};
pub use style::{Color, Style};
pub use widget::{Label, Panel, Widget};
pub use world::Core;
