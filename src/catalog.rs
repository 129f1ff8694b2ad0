//! Vendor and dimension catalogs.
//!
//! The accounts-payable platform returns flat lists of vendors and coding
//! dimensions. This module turns them into combobox options and grouped
//! [`DimensionType`]s; fetching them is the host's job.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ReefError;
use crate::model::{DimensionType, OptionValue, SelectOption};

/// Group key used when a dimension carries no type.
pub const OTHER_GROUP: &str = "Other";

/// Group key that always sorts first.
pub const ACCOUNT_GROUP: &str = "Account";

/// A coding dimension as the platform returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDimension {
    pub id: OptionValue,
    pub name: String,
    #[serde(default)]
    pub erp_dimension_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub dimension_type: Option<String>,
}

impl RawDimension {
    /// `type`, else `dimension_type`, else [`OTHER_GROUP`].
    pub fn group_key(&self) -> &str {
        [self.kind.as_deref(), self.dimension_type.as_deref()]
            .into_iter()
            .flatten()
            .find(|k| !k.is_empty())
            .unwrap_or(OTHER_GROUP)
    }

    pub fn option_label(&self) -> String {
        match self.erp_dimension_id.as_deref().filter(|id| !id.is_empty()) {
            Some(erp_id) => format!("{} \u{2013} {}", erp_id, self.name),
            None => self.name.clone(),
        }
    }
}

/// A vendor as the platform returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVendor {
    pub id: OptionValue,
    pub erp_vendor_name: String,
    #[serde(default)]
    pub erp_vendor_id: Option<String>,
}

impl RawVendor {
    /// Vendor ids are compared as strings by the form, so the value is
    /// always stored as text.
    pub fn to_option(&self) -> SelectOption {
        let option = SelectOption::new(self.id.to_string(), self.erp_vendor_name.clone());
        match self.erp_vendor_id.as_deref().filter(|id| !id.is_empty()) {
            Some(erp_id) => option.with_subtitle(erp_id),
            None => option,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VendorsResponse {
    #[serde(default)]
    vendors: Vec<RawVendor>,
}

#[derive(Debug, Deserialize)]
struct DimensionsResponse {
    #[serde(default)]
    dimensions: Vec<RawDimension>,
}

/// Display label for a dimension group key.
pub fn dimension_label(key: &str) -> String {
    let known = match key {
        "Account" => Some("GL Account"),
        "CostCenter" => Some("Cost Center"),
        "Department" | "Class" | "Location" | "Project" | "Fund" | "Program" | "Grant" | "Item" => {
            Some(key)
        }
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }

    let mut label = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(ch);
    }
    label.trim().to_string()
}

/// Case-insensitive first, then exact, so the order is total.
fn label_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn group_order(a: &str, b: &str) -> Ordering {
    match (a == ACCOUNT_GROUP, b == ACCOUNT_GROUP) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => label_order(a, b),
    }
}

/// Group raw dimensions into sorted dimension types.
pub fn group_dimensions(dimensions: &[RawDimension]) -> Vec<DimensionType> {
    let mut grouped: BTreeMap<&str, Vec<&RawDimension>> = BTreeMap::new();
    for d in dimensions {
        grouped.entry(d.group_key()).or_default().push(d);
    }

    let mut keys: Vec<&str> = grouped.keys().copied().collect();
    keys.sort_by(|a, b| group_order(a, b));

    keys.into_iter()
        .map(|key| {
            let mut options: Vec<SelectOption> = grouped[key]
                .iter()
                .map(|d| SelectOption::new(d.id.clone(), d.option_label()))
                .collect();
            options.sort_by(|a, b| label_order(&a.label, &b.label));
            DimensionType {
                key: key.to_string(),
                label: dimension_label(key),
                options,
            }
        })
        .collect()
}

/// Everything the form needs to offer choices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub vendors: Vec<SelectOption>,
    pub dimension_types: Vec<DimensionType>,
}

impl Catalog {
    pub fn from_raw(vendors: &[RawVendor], dimensions: &[RawDimension]) -> Self {
        let catalog = Self {
            vendors: vendors.iter().map(RawVendor::to_option).collect(),
            dimension_types: group_dimensions(dimensions),
        };
        tracing::debug!(
            vendors = catalog.vendors.len(),
            dimension_types = catalog.dimension_types.len(),
            "catalog loaded"
        );
        catalog
    }

    /// Build from the platform's `{"vendors": [...]}` and
    /// `{"dimensions": [...]}` response bodies.
    pub fn from_responses(vendors_json: &str, dimensions_json: &str) -> Result<Self, ReefError> {
        let vendors: VendorsResponse = serde_json::from_str(vendors_json)?;
        let dimensions: DimensionsResponse = serde_json::from_str(dimensions_json)?;
        Ok(Self::from_raw(&vendors.vendors, &dimensions.dimensions))
    }

    pub fn vendor(&self, value: &OptionValue) -> Option<&SelectOption> {
        crate::model::find_option(&self.vendors, value)
    }

    pub fn dimension_type(&self, key: &str) -> Option<&DimensionType> {
        self.dimension_types.iter().find(|dt| dt.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(id: i64, name: &str, erp: Option<&str>, kind: Option<&str>) -> RawDimension {
        RawDimension {
            id: OptionValue::from(id),
            name: name.to_string(),
            erp_dimension_id: erp.map(str::to_string),
            kind: kind.map(str::to_string),
            dimension_type: None,
        }
    }

    #[test]
    fn test_dimension_labels() {
        assert_eq!(dimension_label("Account"), "GL Account");
        assert_eq!(dimension_label("CostCenter"), "Cost Center");
        assert_eq!(dimension_label("Department"), "Department");
        assert_eq!(dimension_label("ServiceLine"), "Service Line");
        assert_eq!(dimension_label("other"), "other");
    }

    #[test]
    fn test_grouping_order() {
        let dims = vec![
            dim(1, "Kitchen", None, Some("Department")),
            dim(2, "Supplies", Some("6000"), Some("Account")),
            dim(3, "Catering", None, Some("Class")),
            dim(4, "Misc", None, None),
            dim(5, "Bar", None, Some("Department")),
        ];
        let types = group_dimensions(&dims);
        let keys: Vec<&str> = types.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["Account", "Class", "Department", "Other"]);
        assert_eq!(types[0].label, "GL Account");
        assert_eq!(types[0].options[0].label, "6000 \u{2013} Supplies");
        let departments: Vec<&str> = types[2].options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(departments, vec!["Bar", "Kitchen"]);
    }

    #[test]
    fn test_dimension_type_fallback_field() {
        let mut d = dim(1, "North", None, None);
        d.dimension_type = Some("Location".to_string());
        assert_eq!(d.group_key(), "Location");
        d.kind = Some(String::new());
        assert_eq!(d.group_key(), "Location");
    }

    #[test]
    fn test_vendor_options() {
        let catalog = Catalog::from_responses(
            r#"{"vendors":[{"id":12,"erp_vendor_name":"Acme Supply","erp_vendor_id":"ACME01"},{"id":13,"erp_vendor_name":"Blue Reef"}]}"#,
            r#"{"dimensions":[{"id":1,"name":"Supplies","erp_dimension_id":"6000","type":"Account"}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.vendors[0].value, OptionValue::Text("12".to_string()));
        assert_eq!(catalog.vendors[0].subtitle.as_deref(), Some("ACME01"));
        assert_eq!(catalog.vendors[1].subtitle, None);
        assert_eq!(catalog.vendor(&OptionValue::from(13)).unwrap().label, "Blue Reef");
        assert!(catalog.dimension_type("Account").is_some());
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let catalog = Catalog::from_responses("{}", "{}").unwrap();
        assert_eq!(catalog, Catalog::default());
    }
}
