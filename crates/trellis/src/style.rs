//! Colors and the style data handed to widgets when drawing.

use serde::{Deserialize, Serialize};

use crate::{error::Result, node::Node};

/// Default alpha for colors that omit it.
fn opaque() -> u8 {
    255
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, opaque when omitted.
    #[serde(default = "opaque")]
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Visual parameters shared by every widget in a context.
///
/// Loaded from JSON with [`Style::from_json`]; omitted fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Background of an idle widget.
    pub fill: Color,
    /// Background while hovered.
    pub fill_hovered: Color,
    /// Background while a button is held on the widget.
    pub fill_pressed: Color,
    /// Border of an unfocused widget.
    pub outline: Color,
    /// Border of the focused widget.
    pub outline_focused: Color,
    /// Border width in pixels.
    pub outline_thickness: f32,
    /// Text color.
    pub text: Color,
    /// Text size in pixels.
    pub text_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::rgba(30, 30, 36, 220),
            fill_hovered: Color::rgba(50, 50, 60, 230),
            fill_pressed: Color::rgba(70, 70, 90, 240),
            outline: Color::rgb(90, 90, 100),
            outline_focused: Color::rgb(220, 180, 60),
            outline_thickness: 1.0,
            text: Color::WHITE,
            text_size: 12.0,
        }
    }
}

impl Style {
    /// Parse a style from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the style to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Background color for a node in its current state.
    pub fn fill_for(&self, node: &Node) -> Color {
        if node.is_active() && node.is_pressed_any() {
            self.fill_pressed
        } else if node.is_hovered() {
            self.fill_hovered
        } else {
            self.fill
        }
    }

    /// Border color for a node in its current state.
    pub fn outline_for(&self, node: &Node) -> Color {
        if node.is_focused() {
            self.outline_focused
        } else {
            self.outline
        }
    }
}
