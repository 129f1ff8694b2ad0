//! Check request form state.
//!
//! Holds what the operator has entered so far and turns it into a
//! [`DocumentRecord`] on submission. Line items are edited by index with
//! whole-item replacement, and the list never becomes empty.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{self, DocumentRecord, LineItem, OptionValue, SelectOption};

/// Reasons a form cannot be submitted or edited.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select a location")]
    LocationRequired,
    #[error("Please select or enter a vendor")]
    VendorRequired,
    #[error("Total amount must be greater than 0")]
    NonPositiveTotal,
    #[error("line item {index} does not exist (there are {len})")]
    LineItemOutOfRange { index: usize, len: usize },
    #[error("a check request needs at least one line item")]
    LastLineItem,
}

/// The ordered line items of a form. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItems(Vec<LineItem>);

impl Default for LineItems {
    fn default() -> Self {
        Self(vec![LineItem::default()])
    }
}

impl LineItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing items; an empty list gets one blank row.
    pub fn from_vec(items: Vec<LineItem>) -> Self {
        if items.is_empty() {
            Self::default()
        } else {
            Self(items)
        }
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for the usual collection API.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    /// Append a blank row and return its index.
    pub fn add(&mut self) -> usize {
        self.0.push(LineItem::default());
        self.0.len() - 1
    }

    fn slot(&mut self, index: usize) -> Result<&mut LineItem, FormError> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .ok_or(FormError::LineItemOutOfRange { index, len })
    }

    pub fn replace(&mut self, index: usize, item: LineItem) -> Result<(), FormError> {
        *self.slot(index)? = item;
        Ok(())
    }

    /// Remove a row. The last remaining row cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, FormError> {
        self.slot(index)?;
        if self.0.len() == 1 {
            return Err(FormError::LastLineItem);
        }
        Ok(self.0.remove(index))
    }

    /// Store (or clear, with `None`) the snapshot chosen for a dimension.
    pub fn set_dimension(
        &mut self,
        index: usize,
        key: impl Into<String>,
        snapshot: Option<SelectOption>,
    ) -> Result<(), FormError> {
        let mut item = self.slot(index)?.clone();
        item.dimensions.insert(key.into(), snapshot);
        self.replace(index, item)
    }

    /// Drop every dimension selection. Called when the catalog reloads.
    pub fn clear_dimensions(&mut self) {
        for item in &mut self.0 {
            item.dimensions.clear();
        }
    }

    pub fn total(&self) -> f64 {
        model::total_amount(&self.0)
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Who is being paid.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum VendorChoice {
    #[default]
    Unset,
    /// A vendor from the catalog, by option value.
    Existing(OptionValue),
    /// A vendor the host will create on submission.
    New(String),
}

impl VendorChoice {
    fn is_set(&self) -> bool {
        match self {
            VendorChoice::Unset => false,
            VendorChoice::Existing(v) => !v.is_blank(),
            VendorChoice::New(name) => !name.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequestForm {
    pub vendor: VendorChoice,
    /// `YYYY-MM-DD`.
    pub invoice_date: String,
    pub due_date: String,
    pub requested_by: String,
    pub notes: String,
    pub line_items: LineItems,
}

impl CheckRequestForm {
    /// A blank form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            vendor: VendorChoice::Unset,
            invoice_date: today.format("%Y-%m-%d").to_string(),
            due_date: String::new(),
            requested_by: String::new(),
            notes: String::new(),
            line_items: LineItems::new(),
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn total(&self) -> f64 {
        self.line_items.total()
    }

    /// Checks in the order the operator sees them reported.
    pub fn validate(&self, location: Option<&str>) -> Result<(), FormError> {
        if model::non_blank(location).is_none() {
            return Err(FormError::LocationRequired);
        }
        if !self.vendor.is_set() {
            return Err(FormError::VendorRequired);
        }
        if self.total() <= 0.0 {
            return Err(FormError::NonPositiveTotal);
        }
        Ok(())
    }

    /// Snapshot the form for the document generator. An existing vendor
    /// missing from `vendors` gets an empty name, which the generator
    /// rejects.
    pub fn to_record(&self, vendors: &[SelectOption], location_name: &str) -> DocumentRecord {
        let (vendor_name, vendor_id) = match &self.vendor {
            VendorChoice::Unset => (String::new(), None),
            VendorChoice::Existing(value) => {
                let name = model::find_option(vendors, value)
                    .map(|o| o.label.clone())
                    .unwrap_or_default();
                (name, Some(value.to_string()))
            }
            VendorChoice::New(name) => (name.trim().to_string(), None),
        };
        let optional = |s: &str| model::non_blank(Some(s)).map(str::to_string);

        DocumentRecord {
            vendor_name,
            vendor_id,
            location_name: location_name.to_string(),
            invoice_date: self.invoice_date.clone(),
            due_date: optional(&self.due_date),
            requested_by: optional(&self.requested_by),
            notes: optional(&self.notes),
            line_items: self.line_items.as_slice().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn vendors() -> Vec<SelectOption> {
        vec![SelectOption::new("12", "Acme Supply").with_subtitle("ACME01")]
    }

    #[test]
    fn test_new_form() {
        let form = CheckRequestForm::new(today());
        assert_eq!(form.invoice_date, "2026-10-18");
        assert_eq!(form.line_items.len(), 1);
        assert_eq!(form.total(), 0.0);
    }

    #[test]
    fn test_last_row_cannot_be_removed() {
        let mut items = LineItems::new();
        assert_eq!(items.remove(0), Err(FormError::LastLineItem));
        items.add();
        assert!(items.remove(1).is_ok());
        assert_eq!(items.len(), 1);
        assert_eq!(
            items.remove(4),
            Err(FormError::LineItemOutOfRange { index: 4, len: 1 })
        );
    }

    #[test]
    fn test_from_empty_vec_has_one_row() {
        assert_eq!(LineItems::from_vec(vec![]).len(), 1);
    }

    #[test]
    fn test_replace_and_total() {
        let mut items = LineItems::new();
        items.replace(0, LineItem::new("Paper towels", "42.50")).unwrap();
        let i = items.add();
        items.replace(i, LineItem::new("Soap", "7.25")).unwrap();
        assert_eq!(items.total(), 49.75);
        items.remove(0).unwrap();
        assert_eq!(items.total(), 7.25);
    }

    #[test]
    fn test_dimensions_set_and_cleared() {
        let mut items = LineItems::new();
        let snapshot = SelectOption::new(1, "6000 - Supplies");
        items.set_dimension(0, "Account", Some(snapshot)).unwrap();
        assert_eq!(items.get(0).unwrap().dimension_label("Account"), Some("6000 - Supplies"));
        items.set_dimension(0, "Account", None).unwrap();
        assert_eq!(items.get(0).unwrap().dimension_label("Account"), None);
        items
            .set_dimension(0, "Account", Some(SelectOption::new(1, "x")))
            .unwrap();
        items.clear_dimensions();
        assert!(items.get(0).unwrap().dimensions.is_empty());
    }

    #[test]
    fn test_validation_order() {
        let mut form = CheckRequestForm::new(today());
        assert_eq!(form.validate(None), Err(FormError::LocationRequired));
        assert_eq!(form.validate(Some("  ")), Err(FormError::LocationRequired));
        assert_eq!(form.validate(Some("HQ")), Err(FormError::VendorRequired));
        form.vendor = VendorChoice::New("   ".to_string());
        assert_eq!(form.validate(Some("HQ")), Err(FormError::VendorRequired));
        form.vendor = VendorChoice::Existing(OptionValue::from("12"));
        assert_eq!(form.validate(Some("HQ")), Err(FormError::NonPositiveTotal));
        form.line_items
            .replace(0, LineItem::new("Paper towels", "42.50"))
            .unwrap();
        assert_eq!(form.validate(Some("HQ")), Ok(()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FormError::NonPositiveTotal.to_string(),
            "Total amount must be greater than 0"
        );
    }

    #[test]
    fn test_to_record_existing_vendor() {
        let mut form = CheckRequestForm::new(today());
        form.vendor = VendorChoice::Existing(OptionValue::from("12"));
        form.requested_by = "Jordan".to_string();
        form.notes = "  ".to_string();
        let record = form.to_record(&vendors(), "Downtown");
        assert_eq!(record.vendor_name, "Acme Supply");
        assert_eq!(record.vendor_id.as_deref(), Some("12"));
        assert_eq!(record.location_name, "Downtown");
        assert_eq!(record.requested_by.as_deref(), Some("Jordan"));
        assert_eq!(record.due_date, None);
        assert_eq!(record.notes, None);
        assert_eq!(record.line_items.len(), 1);
    }

    #[test]
    fn test_to_record_new_vendor() {
        let mut form = CheckRequestForm::new(today());
        form.vendor = VendorChoice::New(" Harbor Ice ".to_string());
        let record = form.to_record(&vendors(), "Downtown");
        assert_eq!(record.vendor_name, "Harbor Ice");
        assert_eq!(record.vendor_id, None);
    }

    #[test]
    fn test_reset() {
        let mut form = CheckRequestForm::new(today());
        form.notes = "x".to_string();
        form.line_items.add();
        form.reset(today());
        assert_eq!(form, CheckRequestForm::new(today()));
    }
}
