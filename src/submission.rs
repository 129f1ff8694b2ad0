//! What the host sends after a document is generated.
//!
//! The crate performs no HTTP. It names the artifact and builds the invoice
//! patch body; the host uploads and patches.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ReefError;
use crate::form::CheckRequestForm;
use crate::model::OptionValue;
use crate::OutputFormat;

/// File name under which the generated document is uploaded.
pub fn attachment_name(reference: &str, format: OutputFormat) -> String {
    format!("{}.{}", reference, format.extension())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchLineItem {
    pub description: String,
    pub total: f64,
    pub dimensions: BTreeMap<String, OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFields {
    pub check_request_number: String,
    pub requested_by: String,
    pub notes: String,
}

/// Body of the invoice patch sent after the upload succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erp_vendor_id: Option<String>,
    pub invoice_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub line_items: Vec<PatchLineItem>,
    pub custom_fields: CustomFields,
}

/// A dimension value worth sending: not blank and not the id `0`.
fn is_coded(value: &OptionValue) -> bool {
    match value {
        OptionValue::Integer(v) => *v != 0,
        OptionValue::Text(s) => !s.is_empty(),
    }
}

impl InvoicePatch {
    /// `vendor_id` is the catalog id, or the id the host got back when it
    /// created a new vendor.
    pub fn from_form(form: &CheckRequestForm, vendor_id: Option<&str>, reference: &str) -> Self {
        let line_items = form
            .line_items
            .iter()
            .map(|item| PatchLineItem {
                description: item.description.clone(),
                total: item.amount_value(),
                dimensions: item
                    .dimensions
                    .iter()
                    .filter_map(|(key, choice)| {
                        choice
                            .as_ref()
                            .filter(|o| is_coded(&o.value))
                            .map(|o| (key.clone(), o.value.clone()))
                    })
                    .collect(),
            })
            .collect();

        Self {
            erp_vendor_id: vendor_id.filter(|id| !id.is_empty()).map(str::to_string),
            invoice_date: form.invoice_date.clone(),
            due_date: Some(form.due_date.clone()).filter(|d| !d.is_empty()),
            line_items,
            custom_fields: CustomFields {
                check_request_number: reference.to_string(),
                requested_by: form.requested_by.clone(),
                notes: form.notes.clone(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, ReefError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, SelectOption};
    use chrono::NaiveDate;
    use serde_json::json;

    fn form() -> CheckRequestForm {
        let mut form = CheckRequestForm::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        form.requested_by = "Jordan".to_string();
        form.line_items
            .replace(
                0,
                LineItem::new("Paper towels", "42.50")
                    .with_dimension("Account", SelectOption::new(1, "6000 - Supplies"))
                    .with_dimension("Department", SelectOption::new("", "blank")),
            )
            .unwrap();
        let i = form.line_items.add();
        form.line_items
            .replace(i, LineItem::new("", "not-a-number"))
            .unwrap();
        form
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(attachment_name("CR-2026-800123", OutputFormat::Pdf), "CR-2026-800123.pdf");
        assert_eq!(attachment_name("CR-2026-800123", OutputFormat::Html), "CR-2026-800123.html");
    }

    #[test]
    fn test_patch_body() {
        let patch = InvoicePatch::from_form(&form(), Some("12"), "CR-2026-800123");
        let value: serde_json::Value = serde_json::from_str(&patch.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "erp_vendor_id": "12",
                "invoice_date": "2026-10-18",
                "line_items": [
                    { "description": "Paper towels", "total": 42.5, "dimensions": { "Account": 1 } },
                    { "description": "", "total": 0.0, "dimensions": {} }
                ],
                "custom_fields": {
                    "check_request_number": "CR-2026-800123",
                    "requested_by": "Jordan",
                    "notes": ""
                }
            })
        );
    }

    #[test]
    fn test_due_date_and_vendor_included_when_set() {
        let mut f = form();
        f.due_date = "2026-11-01".to_string();
        let patch = InvoicePatch::from_form(&f, None, "CR-2026-000001");
        assert_eq!(patch.due_date.as_deref(), Some("2026-11-01"));
        assert_eq!(patch.erp_vendor_id, None);
    }
}
