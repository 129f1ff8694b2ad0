//! # Column Plan
//!
//! Widths for the line-item table. The row index and amount columns are
//! fixed. Description and dimension columns start from a preferred width
//! keyed on how many dimension types there are, then the row is fitted to
//! the content width exactly: leftover space widens the description, and
//! overflow narrows description and dimensions in proportion to their size.

use crate::style::TextAlign;

pub const INDEX_WIDTH: f64 = 24.0;
pub const AMOUNT_WIDTH: f64 = 72.0;
pub const DESCRIPTION_BASIS: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Index,
    Description,
    Dimension { key: String },
    Amount,
}

/// A table column: what it shows and its header title.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub kind: ColumnKind,
    pub title: String,
}

impl Column {
    pub fn new(kind: ColumnKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }

    pub fn align(&self) -> TextAlign {
        match self.kind {
            ColumnKind::Amount => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }

    /// Width before the row is fitted to the page.
    fn preferred_width(&self, dimension_width: f64) -> f64 {
        match self.kind {
            ColumnKind::Index => INDEX_WIDTH,
            ColumnKind::Description => DESCRIPTION_BASIS,
            ColumnKind::Dimension { .. } => dimension_width,
            ColumnKind::Amount => AMOUNT_WIDTH,
        }
    }

    /// Index and amount never change width.
    fn is_flexible(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Description | ColumnKind::Dimension { .. }
        )
    }
}

/// Preferred width of each dimension column for a given count.
pub fn dimension_width(count: usize) -> f64 {
    match count {
        0..=2 => 110.0,
        3..=4 => 96.0,
        _ => 80.0,
    }
}

/// Resolve the width of every column so they sum to `content_width`.
pub fn plan_widths(columns: &[Column], content_width: f64) -> Vec<f64> {
    let dimensions = columns
        .iter()
        .filter(|c| matches!(c.kind, ColumnKind::Dimension { .. }))
        .count();
    let per_dimension = dimension_width(dimensions);

    let mut widths: Vec<f64> = columns
        .iter()
        .map(|c| c.preferred_width(per_dimension))
        .collect();
    let slack = content_width - widths.iter().sum::<f64>();

    if slack >= 0.0 {
        for (width, column) in widths.iter_mut().zip(columns) {
            if column.kind == ColumnKind::Description {
                *width += slack;
            }
        }
    } else {
        let flexible: f64 = widths
            .iter()
            .zip(columns)
            .filter(|(_, c)| c.is_flexible())
            .map(|(w, _)| w)
            .sum();
        if flexible > 0.0 {
            let scale = ((flexible + slack) / flexible).max(0.0);
            for (width, column) in widths.iter_mut().zip(columns) {
                if column.is_flexible() {
                    *width *= scale;
                }
            }
        }
    }

    tracing::debug!(dimensions, content_width, ?widths, "column plan");
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(dimensions: usize) -> Vec<Column> {
        let mut cols = vec![
            Column::new(ColumnKind::Index, "#"),
            Column::new(ColumnKind::Description, "Description"),
        ];
        for i in 0..dimensions {
            cols.push(Column::new(
                ColumnKind::Dimension {
                    key: format!("D{}", i),
                },
                format!("Dim {}", i),
            ));
        }
        cols.push(Column::new(ColumnKind::Amount, "Amount"));
        cols
    }

    #[test]
    fn test_single_dimension_leaves_description_the_rest() {
        let widths = plan_widths(&columns(1), 504.0);
        assert_eq!(widths, vec![24.0, 298.0, 110.0, 72.0]);
    }

    #[test]
    fn test_five_dimensions_shrink_with_description() {
        // 24 + 120 + 5 * 80 + 72 = 616 preferred on a 504pt row.
        let widths = plan_widths(&columns(5), 504.0);
        let description = widths[1];
        assert!(description < DESCRIPTION_BASIS);
        for dimension in &widths[2..7] {
            assert!((description / dimension - DESCRIPTION_BASIS / 80.0).abs() < 1e-9);
        }
        assert!((widths[1..7].iter().sum::<f64>() - 408.0).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_page_keeps_fixed_columns() {
        let widths = plan_widths(&columns(3), 144.0);
        assert_eq!(widths[0], INDEX_WIDTH);
        assert_eq!(widths[5], AMOUNT_WIDTH);
        assert!(widths.iter().all(|w| *w > 0.0));
        assert!((widths.iter().sum::<f64>() - 144.0).abs() < 1e-6);
    }

    #[test]
    fn test_preferred_dimension_width_steps_down() {
        assert_eq!(dimension_width(1), 110.0);
        assert_eq!(dimension_width(2), 110.0);
        assert_eq!(dimension_width(3), 96.0);
        assert_eq!(dimension_width(4), 96.0);
        assert_eq!(dimension_width(5), 80.0);
    }

    #[test]
    fn test_description_absorbs_slack() {
        let widths = plan_widths(&columns(0), 504.0);
        assert_eq!(widths, vec![24.0, 408.0, 72.0]);

        let widths = plan_widths(&columns(2), 504.0);
        assert_eq!(widths, vec![24.0, 188.0, 110.0, 110.0, 72.0]);
    }

    #[test]
    fn test_overflow_shrinks_flexible_columns_only() {
        let widths = plan_widths(&columns(8), 504.0);
        assert_eq!(widths[0], INDEX_WIDTH);
        assert_eq!(*widths.last().unwrap(), AMOUNT_WIDTH);
        assert!(widths[2] < 80.0);
        assert!((widths.iter().sum::<f64>() - 504.0).abs() < 1e-6);
    }

    #[test]
    fn test_rows_always_fill_content_width() {
        for n in 0..12 {
            let widths = plan_widths(&columns(n), 504.0);
            assert_eq!(widths.len(), n + 3);
            assert!(
                (widths.iter().sum::<f64>() - 504.0).abs() < 1e-6,
                "{} dimensions",
                n
            );
            assert!(widths.iter().all(|w| *w > 0.0));
        }
    }

    #[test]
    fn test_amount_is_right_aligned() {
        assert_eq!(Column::new(ColumnKind::Amount, "Amount").align(), TextAlign::Right);
        assert_eq!(Column::new(ColumnKind::Index, "#").align(), TextAlign::Left);
    }
}
