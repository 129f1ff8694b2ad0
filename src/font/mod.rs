//! # Font Management
//!
//! The check request is typeset entirely in the standard PDF Helvetica
//! faces, which viewers ship with, so nothing is embedded. The registry maps
//! (family, weight) to a standard face and provides text
//! measurement for the layout engine.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

/// Maps a font family and weight to a standard face.
pub struct FontRegistry {
    fonts: HashMap<FontKey, StandardFont>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
}

impl FontKey {
    /// Key for a family/weight pair with the weight snapped to 400 or 700.
    pub fn snapped(family: &str, weight: u32) -> Self {
        Self {
            family: family.to_string(),
            weight: snap_weight(weight),
        }
    }
}

/// Standard fonts only distinguish regular and bold.
pub fn snap_weight(weight: u32) -> u32 {
    if weight >= 600 {
        700
    } else {
        400
    }
}

/// The standard PDF fonts the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica => StandardFontMetrics::HELVETICA,
            Self::HelveticaBold => StandardFontMetrics::HELVETICA_BOLD,
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", 400), StandardFont::Helvetica),
            (("Helvetica", 700), StandardFont::HelveticaBold),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, weight), font)| {
                (
                    FontKey {
                        family: family.to_string(),
                        weight,
                    },
                    font,
                )
            })
            .collect();

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica of the same weight when the
    /// family is unknown.
    pub fn resolve(&self, family: &str, weight: u32) -> StandardFont {
        let key = FontKey::snapped(family, weight);
        if let Some(font) = self.fonts.get(&key) {
            return *font;
        }

        match snap_weight(weight) {
            700 => StandardFont::HelveticaBold,
            _ => StandardFont::Helvetica,
        }
    }
}

/// Shared font context used by layout and PDF serialization.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, family: &str, weight: u32, font_size: f64) -> f64 {
        self.registry
            .resolve(family, weight)
            .metrics()
            .char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        font_size: f64,
        letter_spacing: f64,
    ) -> f64 {
        self.registry
            .resolve(family, weight)
            .metrics()
            .measure_string(text, font_size, letter_spacing)
    }

    /// Resolve a font key to its standard face.
    pub fn resolve(&self, family: &str, weight: u32) -> StandardFont {
        self.registry.resolve(family, weight)
    }
}
