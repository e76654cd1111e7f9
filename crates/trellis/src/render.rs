//! Drawable primitives and the per-widget drawing frame.

use geom::{Aabb, Vec2};

use crate::{backend::RenderSink, id::NodeId, node::Node, style::Color, style::Style};

/// A primitive accepted by a [`RenderSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// A filled, outlined box.
    Quad {
        /// Box to fill.
        bounds: Aabb,
        /// Region outside of which nothing may be drawn.
        clip: Aabb,
        /// Fill color.
        fill: Color,
        /// Outline color.
        outline: Color,
        /// Outline width in pixels.
        outline_thickness: f32,
    },
    /// A line of text centered on a point.
    Text {
        /// Center of the text.
        position: Vec2,
        /// Region outside of which nothing may be drawn.
        clip: Aabb,
        /// The text.
        text: String,
        /// Text color.
        color: Color,
        /// Text size in pixels.
        size: f32,
    },
}

impl Drawable {
    /// Clip rectangle of the primitive.
    pub fn clip(&self) -> Aabb {
        match self {
            Self::Quad { clip, .. } | Self::Text { clip, .. } => *clip,
        }
    }
}

/// Drawing surface handed to [`Widget::draw`](crate::Widget::draw).
///
/// Everything rendered through a frame is clipped to the widget's view.
pub struct Frame<'a> {
    /// Widget being drawn.
    id: NodeId,
    /// Arena node for the widget.
    node: &'a Node,
    /// Active style.
    style: &'a Style,
    /// Destination for drawables.
    sink: &'a mut dyn RenderSink,
}

impl<'a> Frame<'a> {
    /// Construct a frame for one widget.
    pub(crate) fn new(
        id: NodeId,
        node: &'a Node,
        style: &'a Style,
        sink: &'a mut dyn RenderSink,
    ) -> Self {
        Self {
            id,
            node,
            style,
            sink,
        }
    }

    /// Widget being drawn.
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Arena node for the widget, for reading flags and status.
    pub fn node(&self) -> &Node {
        self.node
    }

    /// Widget bounds.
    pub fn bounds(&self) -> Aabb {
        self.node.bounds
    }

    /// Clip region.
    pub fn clip(&self) -> Aabb {
        self.node.view
    }

    /// Active style.
    pub fn style(&self) -> &Style {
        self.style
    }

    /// Push a primitive to the sink.
    pub fn render(&mut self, drawable: Drawable) {
        self.sink.render(drawable);
    }

    /// Fill the widget's box using the style colors for its status.
    pub fn fill_box(&mut self) {
        let quad = Drawable::Quad {
            bounds: self.node.bounds,
            clip: self.node.view,
            fill: self.style.fill_for(self.node),
            outline: self.style.outline_for(self.node),
            outline_thickness: self.style.outline_thickness,
        };
        self.render(quad);
    }

    /// Draw a line of text at the center of the widget.
    pub fn text(&mut self, text: &str) {
        let drawable = Drawable::Text {
            position: self.node.bounds.position(),
            clip: self.node.view,
            text: text.to_string(),
            color: self.style.text,
            size: self.style.text_size,
        };
        self.render(drawable);
    }
}
