//! Render configuration.
//!
//! Every field has a default, so `{}` is a valid config file and callers
//! only override what they need. Loaded from JSON like the record input.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReefError;
use crate::style::Edges;

/// Smallest content box, in points, either way. Two inches leaves room
/// for the index and amount columns beside a readable description.
pub const MIN_CONTENT: f64 = 144.0;

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    Legal,
    A4,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Presentation settings for generated check requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub page_size: PageSize,
    /// Page margins in points (1/72 inch).
    pub margin: Edges,
    pub currency_symbol: String,
    /// Shown for a blank description, an uncoded dimension, or a missing
    /// requester.
    pub empty_marker: String,
    pub title: String,
    pub subtitle: String,
    pub attribution: String,
    pub reference_prefix: String,
    pub due_date_fallback: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin: Edges::uniform(54.0), // 0.75 inch
            currency_symbol: "$".to_string(),
            empty_marker: "\u{2014}".to_string(),
            title: "CHECK REQUEST".to_string(),
            subtitle: "Payment Authorization Form".to_string(),
            attribution: "Generated via Reef \u{00B7} Ottimate Check Request".to_string(),
            reference_prefix: "CR".to_string(),
            due_date_fallback: "Upon Receipt".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse and [`validate`](Self::validate) a config.
    pub fn from_json(json: &str) -> Result<Self, ReefError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReefError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.page_size.dimensions().0 - self.margin.horizontal()
    }

    /// Height available between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        self.page_size.dimensions().1 - self.margin.vertical()
    }

    /// Reject page geometry that leaves no usable content box.
    pub fn validate(&self) -> Result<(), ReefError> {
        let (width, height) = self.page_size.dimensions();
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ReefError::Contract(format!(
                "page size {}x{} is not a positive size",
                width, height
            )));
        }

        let m = &self.margin;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ReefError::Contract(
                "margins must be finite and non-negative".to_string(),
            ));
        }

        let (content_width, content_height) = (self.content_width(), self.content_height());
        if content_width < MIN_CONTENT || content_height < MIN_CONTENT {
            return Err(ReefError::Contract(format!(
                "margins leave a {:.1}x{:.1}pt content box on a {}x{}pt page (minimum {}pt each way)",
                content_width, content_height, width, height, MIN_CONTENT
            )));
        }
        Ok(())
    }
}
