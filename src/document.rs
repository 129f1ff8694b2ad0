//! # Check Request Document
//!
//! Everything the printed check request says, resolved to strings, in the
//! order it is rendered. Both output formats are drawn from this one
//! structure, so fallbacks, number formatting and the column plan are
//! decided exactly once.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::RenderConfig;
use crate::error::ReefError;
use crate::layout::columns::{Column, ColumnKind};
use crate::model::{format_money, non_blank, DimensionType, DocumentRecord};

pub const PAY_TO: &str = "Pay To";
pub const LOCATION: &str = "Location";
pub const INVOICE_DATE: &str = "Invoice Date";
pub const DUE_DATE: &str = "Due Date";
pub const REQUESTED_BY: &str = "Requested By";
pub const TOTAL: &str = "TOTAL";
pub const NOTES: &str = "Notes / Justification";

/// A labelled value in one of the metadata blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    /// Secondary line under the value, such as the vendor id.
    pub detail: Option<String>,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            detail: None,
        }
    }
}

/// The resolved content of one check request.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequestDocument {
    pub title: String,
    pub subtitle: String,
    pub reference: String,
    /// `Date: October 18, 2026`.
    pub date_line: String,
    /// Pay-to and location.
    pub parties: [Field; 2],
    /// Invoice date, due date, requester.
    pub dates: [Field; 3],
    pub columns: Vec<Column>,
    /// One entry per line item, one cell per column.
    pub rows: Vec<Vec<String>>,
    pub total_amount: f64,
    pub total: String,
    pub notes: Option<String>,
    pub attribution: String,
    /// ISO-8601 generation time with milliseconds.
    pub timestamp: String,
}

/// `October 18, 2026`.
pub fn long_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

impl CheckRequestDocument {
    /// Resolve `record` for rendering.
    ///
    /// Fails only on contract violations; optional fields fall back to the
    /// configured markers.
    pub fn build(
        record: &DocumentRecord,
        dimension_types: &[DimensionType],
        config: &RenderConfig,
        reference: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ReefError> {
        record.check_contract(dimension_types)?;

        let today = long_date(generated_at);
        let empty = config.empty_marker.as_str();

        let mut columns = vec![
            Column::new(ColumnKind::Index, "#"),
            Column::new(ColumnKind::Description, "Description"),
        ];
        columns.extend(dimension_types.iter().map(|dt| {
            Column::new(
                ColumnKind::Dimension {
                    key: dt.key.clone(),
                },
                dt.label.clone(),
            )
        }));
        columns.push(Column::new(ColumnKind::Amount, "Amount"));

        let rows: Vec<Vec<String>> = record
            .line_items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                columns
                    .iter()
                    .map(|column| match &column.kind {
                        ColumnKind::Index => (i + 1).to_string(),
                        ColumnKind::Description => non_blank(Some(item.description.as_str()))
                            .unwrap_or(empty)
                            .to_string(),
                        ColumnKind::Dimension { key } => {
                            item.dimension_label(key).unwrap_or(empty).to_string()
                        }
                        ColumnKind::Amount => {
                            format_money(&config.currency_symbol, item.amount_value())
                        }
                    })
                    .collect()
            })
            .collect();

        let total_amount = record.total_amount();

        let mut pay_to = Field::new(PAY_TO, record.vendor_name.trim());
        pay_to.detail = non_blank(record.vendor_id.as_deref()).map(|id| format!("Vendor ID: {}", id));

        Ok(Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            reference: reference.to_string(),
            date_line: format!("Date: {}", today),
            parties: [pay_to, Field::new(LOCATION, record.location_name.trim())],
            dates: [
                Field::new(
                    INVOICE_DATE,
                    non_blank(Some(record.invoice_date.as_str())).unwrap_or(today.as_str()),
                ),
                Field::new(
                    DUE_DATE,
                    non_blank(record.due_date.as_deref()).unwrap_or(config.due_date_fallback.as_str()),
                ),
                Field::new(
                    REQUESTED_BY,
                    non_blank(record.requested_by.as_deref()).unwrap_or(empty),
                ),
            ],
            columns,
            rows,
            total_amount,
            total: format_money(&config.currency_symbol, total_amount),
            notes: record.notes_text().map(str::to_string),
            attribution: config.attribution.clone(),
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Cell text by column index for one row.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, SelectOption};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_792_324_800_123).single().unwrap()
    }

    fn record() -> DocumentRecord {
        DocumentRecord {
            vendor_name: "Acme Supply".to_string(),
            vendor_id: Some("12".to_string()),
            location_name: "Downtown".to_string(),
            invoice_date: String::new(),
            due_date: None,
            requested_by: Some("  ".to_string()),
            notes: None,
            line_items: vec![
                LineItem::new("Paper towels", "42.50")
                    .with_dimension("Account", SelectOption::new(1, "6000 - Supplies")),
                LineItem::new("", "not-a-number"),
            ],
        }
    }

    fn dims() -> Vec<DimensionType> {
        vec![DimensionType {
            key: "Account".to_string(),
            label: "GL Account".to_string(),
            options: vec![SelectOption::new(1, "6000 - Supplies")],
        }]
    }

    #[test]
    fn test_rows_and_fallbacks() {
        let doc = CheckRequestDocument::build(
            &record(),
            &dims(),
            &RenderConfig::default(),
            "CR-2026-800123",
            at(),
        )
        .unwrap();

        let titles: Vec<&str> = doc.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["#", "Description", "GL Account", "Amount"]);
        assert_eq!(doc.rows[0], vec!["1", "Paper towels", "6000 - Supplies", "$42.50"]);
        assert_eq!(doc.rows[1], vec!["2", "\u{2014}", "\u{2014}", "$0.00"]);
        assert_eq!(doc.total, "$42.50");
        assert_eq!(doc.total_amount, 42.5);

        assert_eq!(doc.date_line, "Date: October 18, 2026");
        assert_eq!(doc.parties[0].detail.as_deref(), Some("Vendor ID: 12"));
        assert_eq!(doc.dates[0].value, "October 18, 2026");
        assert_eq!(doc.dates[1].value, "Upon Receipt");
        assert_eq!(doc.dates[2].value, "\u{2014}");
        assert_eq!(doc.notes, None);
        assert_eq!(doc.timestamp, "2026-10-18T12:00:00.123Z");
    }

    #[test]
    fn test_entered_dates_pass_through() {
        let mut r = record();
        r.invoice_date = "2026-10-01".to_string();
        r.due_date = Some("2026-11-01".to_string());
        r.vendor_id = None;
        r.notes = Some("Rush order\nsecond line".to_string());
        let doc =
            CheckRequestDocument::build(&r, &dims(), &RenderConfig::default(), "CR-1", at()).unwrap();
        assert_eq!(doc.dates[0].value, "2026-10-01");
        assert_eq!(doc.dates[1].value, "2026-11-01");
        assert_eq!(doc.parties[0].detail, None);
        assert_eq!(doc.notes.as_deref(), Some("Rush order\nsecond line"));
    }

    #[test]
    fn test_no_dimension_columns() {
        let doc =
            CheckRequestDocument::build(&record(), &[], &RenderConfig::default(), "CR-1", at())
                .unwrap();
        let kinds: Vec<&ColumnKind> = doc.columns.iter().map(|c| &c.kind).collect();
        assert_eq!(
            kinds,
            vec![&ColumnKind::Index, &ColumnKind::Description, &ColumnKind::Amount]
        );
        assert_eq!(doc.cell(1, 2), Some("$0.00"));
    }

    #[test]
    fn test_contract_violation_propagates() {
        let mut r = record();
        r.line_items.clear();
        assert!(matches!(
            CheckRequestDocument::build(&r, &dims(), &RenderConfig::default(), "CR-1", at()),
            Err(ReefError::Contract(_))
        ));
    }
}
