//! # Reef
//!
//! The core of a check request console: a searchable select state machine
//! for picking vendors and coding dimensions, and a page-native document
//! generator that turns a completed request into a printable PDF or HTML
//! print view.
//!
//! The generator never slices an infinite canvas. Pages have fixed content
//! bounds and every block is placed with the page boundary as a hard
//! constraint: the line-item table breaks between rows and repeats its
//! header, the notes break between lines, everything else moves whole.
//!
//! ## Architecture
//!
//! ```text
//! DocumentRecord + DimensionType[]        ComboboxProps + ComboEvent
//!       ↓                                        ↓
//!   [document]  resolve text, fallbacks      [combobox]  pure FSM
//!       ↓
//!   [layout]    column plan, page cursor
//!       ↓                     ↘
//!   [pdf]  PDF bytes          [html]  print view
//! ```
//!
//! The crate performs no I/O beyond config loading. Uploading the artifact
//! and patching the invoice are the host's job; [`submission`] builds the
//! payloads.

pub mod catalog;
pub mod combobox;
pub mod config;
pub mod document;
pub mod error;
pub mod font;
pub mod form;
pub mod html;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod reference;
pub mod style;
pub mod submission;
pub mod text;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use config::RenderConfig;
use document::CheckRequestDocument;
use error::ReefError;
use font::FontContext;
use html::HtmlWriter;
use layout::LayoutEngine;
use model::{DimensionType, DocumentRecord};
use pdf::{PdfMetadata, PdfWriter};
use reference::ReferenceGenerator;

/// The artifact kinds the generator can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Html,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Html => "text/html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

/// A rendered check request.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// `CR-<yyyy>-<6 digits>`.
    pub generated_id: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub generated_at: DateTime<Utc>,
    pub total_amount: f64,
}

impl GeneratedDocument {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `<generatedId>.<extension>`.
    pub fn file_name(&self) -> String {
        submission::attachment_name(&self.generated_id, self.format)
    }
}

/// Record plus the dimension types to print, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInput {
    pub record: DocumentRecord,
    #[serde(default)]
    pub dimension_types: Vec<DimensionType>,
}

/// Generates check request documents with one reference sequence.
pub struct CheckRequestRenderer {
    config: RenderConfig,
    font_context: FontContext,
    references: ReferenceGenerator,
}

impl Default for CheckRequestRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl CheckRequestRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let references = ReferenceGenerator::new(config.reference_prefix.clone());
        Self {
            config,
            font_context: FontContext::new(),
            references,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `record` stamped with the current time.
    pub fn generate(
        &self,
        record: &DocumentRecord,
        dimension_types: &[DimensionType],
        format: OutputFormat,
    ) -> Result<GeneratedDocument, ReefError> {
        self.generate_at(Utc::now(), record, dimension_types, format)
    }

    /// Render `record` as generated at `now`.
    ///
    /// The identifier, the header date and the footer timestamp all derive
    /// from the same instant. Identical inputs at the same instant on a
    /// fresh renderer produce identical bytes.
    pub fn generate_at(
        &self,
        now: DateTime<Utc>,
        record: &DocumentRecord,
        dimension_types: &[DimensionType],
        format: OutputFormat,
    ) -> Result<GeneratedDocument, ReefError> {
        self.config.validate()?;
        record.check_contract(dimension_types)?;
        let reference = self.references.next(now);
        let doc = CheckRequestDocument::build(
            record,
            dimension_types,
            &self.config,
            &reference.id,
            reference.issued_at,
        )?;

        let bytes = match format {
            OutputFormat::Pdf => {
                let pages = LayoutEngine::new().layout(&doc, &self.config, &self.font_context);
                let metadata = PdfMetadata {
                    title: format!("Check Request {}", reference.id),
                    creation_date: reference.issued_at,
                };
                PdfWriter::new().write(&pages, &metadata)
            }
            OutputFormat::Html => HtmlWriter::new().write(&doc, &self.config).into_bytes(),
        };

        tracing::info!(
            generated_id = %reference.id,
            format = format.extension(),
            line_items = record.line_items.len(),
            bytes = bytes.len(),
            "generated check request"
        );

        Ok(GeneratedDocument {
            generated_id: reference.id,
            format,
            bytes,
            generated_at: reference.issued_at,
            total_amount: doc.total_amount,
        })
    }

    /// Parse a [`RenderInput`] and render it.
    pub fn render_json(&self, json: &str, format: OutputFormat) -> Result<GeneratedDocument, ReefError> {
        let input: RenderInput = serde_json::from_str(json)?;
        self.generate(&input.record, &input.dimension_types, format)
    }
}

/// Render a check request with the default config.
pub fn render(
    record: &DocumentRecord,
    dimension_types: &[DimensionType],
    format: OutputFormat,
) -> Result<GeneratedDocument, ReefError> {
    CheckRequestRenderer::default().generate(record, dimension_types, format)
}

/// Render a check request described as JSON with the default config.
pub fn render_json(json: &str, format: OutputFormat) -> Result<GeneratedDocument, ReefError> {
    CheckRequestRenderer::default().render_json(json, format)
}
