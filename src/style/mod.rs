//! # Style Primitives
//!
//! The small, concrete style vocabulary the check request layout draws with:
//! colors, box edges, corner radii, and resolved text styles. There is no
//! cascade here. Every element the layout engine emits carries fully
//! resolved values, so both the PDF writer and the HTML print view can read
//! them directly.

use serde::{Deserialize, Serialize};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Parse `#rgb` or `#rrggbb`. Anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            _ if !hex.is_ascii() => (0, 0, 0),
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// `#rrggbb` form, for the HTML print view.
    pub fn to_css(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The warm-grey palette shared by the PDF and HTML renderings.
pub mod palette {
    /// Headings, the header rule and the total box.
    pub const INK: &str = "#1c1917";
    pub const MUTED: &str = "#78716c";
    /// Field labels, column headers and the footer.
    pub const FAINT: &str = "#a8a29e";
    pub const RULE: &str = "#e8e5e0";
    pub const WASH: &str = "#fafaf9";
    /// Table cells and notes.
    pub const BODY: &str = "#44403c";
    /// The total label: white at 70% over [`INK`].
    pub const ON_INK_MUTED: &str = "#bbbab9";
}

/// Edge values (top, right, bottom, left) used for margins, padding and
/// border widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Only a bottom edge, the common case for table rule lines.
    pub fn bottom(v: f64) -> Self {
        Self {
            bottom: v,
            ..Self::default()
        }
    }

    /// Only a top edge.
    pub fn top(v: f64) -> Self {
        Self {
            top: v,
            ..Self::default()
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top <= 0.0 && self.right <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0
    }

    pub fn is_uniform(&self) -> bool {
        (self.top - self.right).abs() < 0.001
            && (self.right - self.bottom).abs() < 0.001
            && (self.bottom - self.left).abs() < 0.001
    }
}

/// Values for each corner (top-left, top-right, bottom-right, bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerValues {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerValues {
    pub fn uniform(v: f64) -> Self {
        Self {
            top_left: v,
            top_right: v,
            bottom_right: v,
            bottom_left: v,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top_left <= 0.0
            && self.top_right <= 0.0
            && self.bottom_right <= 0.0
            && self.bottom_left <= 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// A fully resolved text style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
    pub color: Color,
    pub letter_spacing: f64,
    /// Line height as a multiplier of font size.
    pub line_height: f64,
    pub uppercase: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_size: 10.0,
            font_weight: 400,
            color: Color::BLACK,
            letter_spacing: 0.0,
            line_height: 1.4,
            uppercase: false,
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f64, font_weight: u32, color: Color) -> Self {
        Self {
            font_size,
            font_weight,
            color,
            ..Self::default()
        }
    }

    pub fn with_letter_spacing(mut self, letter_spacing: f64) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Height of one line box in points.
    pub fn line_box(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Apply the text transform this style asks for.
    pub fn transform(&self, text: &str) -> String {
        if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trips_through_css() {
        assert_eq!(Color::hex("#1c1917").to_css(), "#1c1917");
        assert_eq!(Color::hex("fff").to_css(), "#ffffff");
    }

    #[test]
    fn test_invalid_hex_is_black() {
        assert_eq!(Color::hex("#12"), Color::BLACK);
    }

    #[test]
    fn test_edge_helpers() {
        let e = Edges::bottom(2.0);
        assert_eq!(e.vertical(), 2.0);
        assert!(!e.is_uniform());
        assert!(Edges::uniform(1.0).is_uniform());
        assert!(Edges::default().is_zero());
    }

    #[test]
    fn test_line_box() {
        let s = TextStyle::new(10.0, 400, Color::BLACK).with_line_height(1.5);
        assert!((s.line_box() - 15.0).abs() < 1e-9);
        assert_eq!(s.clone().uppercase().transform("Total"), "TOTAL");
    }
}
