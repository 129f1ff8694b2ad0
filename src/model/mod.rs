//! # Check Request Model
//!
//! The value objects shared by the combobox and the document generator.
//!
//! Everything here is an owned snapshot. A line item stores a copy of the
//! `{value, label}` that was picked, never an index into the dimension
//! catalog, so a catalog reload between selection and submission cannot
//! invalidate it. The label printed on the document is the label captured at
//! selection time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReefError;

/// The identifier of a selectable option: a string or an integer.
///
/// Two values are equal when their string forms are equal, so `7` and
/// `"7"` refer to the same option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Integer(i64),
    Text(String),
}

impl OptionValue {
    /// Compare by string form.
    pub fn loosely_equals(&self, other: &OptionValue) -> bool {
        match (self, other) {
            (OptionValue::Integer(a), OptionValue::Integer(b)) => a == b,
            (OptionValue::Text(a), OptionValue::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    /// Whether this is the empty string (an unset form value).
    pub fn is_blank(&self) -> bool {
        matches!(self, OptionValue::Text(s) if s.is_empty())
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        self.loosely_equals(other)
    }
}

impl Eq for OptionValue {}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Integer(v) => write!(f, "{}", v),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Integer(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Integer(v.into())
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

/// One selectable entry: a value, its display label, and an optional
/// secondary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: OptionValue,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<OptionValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// The `{value, label}` copy stored on a line item.
    pub fn snapshot(&self) -> SelectOption {
        SelectOption {
            value: self.value.clone(),
            label: self.label.clone(),
            subtitle: None,
        }
    }
}

/// Find the option whose value loosely equals `value`.
pub fn find_option<'a>(options: &'a [SelectOption], value: &OptionValue) -> Option<&'a SelectOption> {
    options.iter().find(|o| o.value.loosely_equals(value))
}

/// One coding dimension (GL Account, Department, ...) and its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionType {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl DimensionType {
    /// The snapshot to store on a line item when `value` is chosen, or
    /// `None` if the value is not (or no longer) in this dimension.
    pub fn snapshot(&self, value: &OptionValue) -> Option<SelectOption> {
        find_option(&self.options, value).map(SelectOption::snapshot)
    }
}

/// One row of a payment request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    /// Free text as typed; parsed with [`parse_amount`].
    #[serde(default)]
    pub amount: String,
    /// Selection per dimension key. `None` (JSON `null`) and a missing key
    /// both mean "not coded".
    #[serde(default)]
    pub dimensions: BTreeMap<String, Option<SelectOption>>,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            dimensions: BTreeMap::new(),
        }
    }

    pub fn with_dimension(mut self, key: impl Into<String>, option: SelectOption) -> Self {
        self.dimensions.insert(key.into(), Some(option));
        self
    }

    /// The parsed amount, 0 when unparseable.
    pub fn amount_value(&self) -> f64 {
        parse_amount(&self.amount)
    }

    /// The label chosen for a dimension, if any.
    pub fn dimension_label(&self, key: &str) -> Option<&str> {
        self.dimensions
            .get(key)
            .and_then(|o| o.as_ref())
            .map(|o| o.label.as_str())
            .filter(|l| !l.is_empty())
    }
}

/// The snapshot of a completed form handed to the document generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub vendor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub location_name: String,
    /// `YYYY-MM-DD` as entered. Empty means "generation date".
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub line_items: Vec<LineItem>,
}

impl DocumentRecord {
    /// Sum of the parsed line amounts, rounded to cents.
    pub fn total_amount(&self) -> f64 {
        total_amount(&self.line_items)
    }

    /// Notes, if present and not blank.
    pub fn notes_text(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }

    /// Check the shape the layout engine relies on.
    pub fn check_contract(&self, dimension_types: &[DimensionType]) -> Result<(), ReefError> {
        if self.line_items.is_empty() {
            return Err(ReefError::Contract(
                "a check request needs at least one line item".to_string(),
            ));
        }
        if self.vendor_name.trim().is_empty() {
            return Err(ReefError::Contract("vendorName is blank".to_string()));
        }
        if self.location_name.trim().is_empty() {
            return Err(ReefError::Contract("locationName is blank".to_string()));
        }
        for (i, dt) in dimension_types.iter().enumerate() {
            if dimension_types[..i].iter().any(|other| other.key == dt.key) {
                return Err(ReefError::Contract(format!(
                    "dimension type key '{}' appears more than once",
                    dt.key
                )));
            }
        }
        Ok(())
    }
}

/// `Some(s)` when `s` has non-whitespace content.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Sum of the parsed amounts of `items`, rounded to cents.
pub fn total_amount(items: &[LineItem]) -> f64 {
    round_cents(items.iter().map(LineItem::amount_value).sum())
}

pub fn round_cents(v: f64) -> f64 {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Parse an amount the way a browser's `parseFloat` does: skip leading
/// whitespace, read the longest numeric prefix, and return 0 when there is
/// none.
pub fn parse_amount(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when it has at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// `$42.50`: the prefix plus exactly two decimals.
pub fn format_money(currency: &str, amount: f64) -> String {
    let amount = if amount == 0.0 || !amount.is_finite() {
        0.0
    } else {
        amount
    };
    let formatted = format!("{:.2}", amount);
    // Values that round to zero print without a sign.
    if formatted == "-0.00" {
        format!("{}0.00", currency)
    } else {
        format!("{}{}", currency, formatted)
    }
}
