use std::{fmt, marker::PhantomData};

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle to a widget stored in the [`Core`](crate::Core) arena.
    ///
    /// A handle outlives the widget it names; once the widget is destroyed the
    /// handle no longer resolves and operations report
    /// [`Error::NodeNotFound`](crate::error::Error::NodeNotFound).
    pub struct NodeId;
}

/// A [`NodeId`] that remembers the concrete widget type it was created with.
pub struct TypedId<W> {
    /// Untyped handle.
    id: NodeId,
    /// Marker for the widget type.
    _marker: PhantomData<fn() -> W>,
}

impl<W> TypedId<W> {
    /// Wrap an untyped handle. The caller vouches for the widget type.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The untyped handle.
    pub fn node(self) -> NodeId {
        self.id
    }
}

impl<W> fmt::Debug for TypedId<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedId").field(&self.id).finish()
    }
}

impl<W> PartialEq for TypedId<W> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<W> Eq for TypedId<W> {}

impl<W> Clone for TypedId<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for TypedId<W> {}

impl<W> From<TypedId<W>> for NodeId {
    fn from(value: TypedId<W>) -> Self {
        value.id
    }
}
