//! # Page Runs
//!
//! How many table rows or note lines go on each page. Heights are measured
//! up front, then split into consecutive runs, one per page. The keep rules
//! stop a single row or line from being stranded at the foot of a page or
//! carried alone to the top of the next, unless the page is fresh and
//! nothing else would make progress.

use std::ops::Range;

/// The fewest items worth leaving at the bottom of a page (`orphans`) and
/// carrying to the top of the next (`widows`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keep {
    pub orphans: usize,
    pub widows: usize,
}

/// Line-item rows keep two together on either side of a break.
pub const ROWS: Keep = Keep {
    orphans: 2,
    widows: 2,
};

/// Note lines, counting the "Notes" label as the first line.
pub const NOTE_LINES: Keep = Keep {
    orphans: 2,
    widows: 2,
};

/// Number of leading `heights` to put on a page with `room` points left.
///
/// A `fresh` page always takes at least one item, even one taller than the
/// room, so callers that split oversized items must do so first.
pub fn fill_page(heights: &[f64], room: f64, fresh: bool, keep: Keep) -> usize {
    let mut used = 0.0;
    let fit = heights
        .iter()
        .take_while(|&&h| {
            used += h;
            used <= room + 1e-9
        })
        .count();
    if fit == heights.len() {
        return fit;
    }

    let carried = heights.len() - fit;
    let mut n = if carried < keep.widows {
        heights.len().saturating_sub(keep.widows)
    } else {
        fit
    };
    if n < keep.orphans {
        n = 0;
    }
    if n == 0 && fresh {
        n = fit.max(1);
    }
    n
}

/// Split `heights` into per-page runs.
///
/// The first page has `first_room` points left and counts as fresh when
/// that is a whole page. Every later page has `page_room`. The first run is
/// empty when nothing belongs on the current page; every other run holds at
/// least one item. The runs are contiguous and cover every item.
pub fn paginate(heights: &[f64], first_room: f64, page_room: f64, keep: Keep) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut room = first_room;
    let mut fresh = first_room + 1e-9 >= page_room;
    while start < heights.len() {
        let n = fill_page(&heights[start..], room, fresh, keep);
        runs.push(start..start + n);
        start += n;
        room = page_room;
        fresh = true;
    }
    if runs.is_empty() {
        runs.push(0..0);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A body row with one line of text at the default cell padding.
    const ROW: f64 = 28.65;
    /// A tall row whose description wrapped to four lines.
    const TALL: f64 = 69.6;
    /// One line of notes.
    const LINE: f64 = 15.6;
    const LABEL: f64 = 15.0;

    #[test]
    fn test_short_table_stays_on_page() {
        assert_eq!(fill_page(&[ROW; 5], 600.0, false, ROWS), 5);
        assert_eq!(paginate(&[ROW; 5], 600.0, 650.0, ROWS), vec![0..5]);
    }

    #[test]
    fn test_rows_fill_to_the_bottom() {
        // 200pt left holds six one-line rows of twenty.
        assert_eq!(fill_page(&[ROW; 20], 200.0, false, ROWS), 6);
    }

    #[test]
    fn test_single_row_not_stranded_under_header() {
        // Only one row fits below the repeated header: move the table on.
        let heights = [ROW, TALL, TALL];
        assert_eq!(fill_page(&heights, 40.0, false, ROWS), 0);
    }

    #[test]
    fn test_last_row_not_carried_alone() {
        // Four of five rows fit, so one more moves down to keep the last
        // row company.
        let heights = [ROW; 5];
        assert_eq!(fill_page(&heights, ROW * 4.0 + 1.0, false, ROWS), 3);
    }

    #[test]
    fn test_fresh_page_takes_an_oversized_row() {
        let heights = [2_000.0, ROW];
        assert_eq!(fill_page(&heights, 640.0, false, ROWS), 0);
        assert_eq!(fill_page(&heights, 640.0, true, ROWS), 1);
    }

    #[test]
    fn test_fresh_page_ignores_keep_rules_it_cannot_meet() {
        // Room for one tall row only: it goes anyway rather than stalling.
        assert_eq!(fill_page(&[TALL, TALL, TALL], 80.0, true, ROWS), 1);
    }

    #[test]
    fn test_notes_label_travels_with_lines() {
        // Only the label would fit; it is not left alone at the foot of
        // the page.
        let mut heights = vec![LABEL];
        heights.extend([LINE; 30]);
        let runs = paginate(&heights, LABEL + 1.0, 300.0, NOTE_LINES);
        assert_eq!(runs[0], 0..0);
        assert_eq!(runs[1].start, 0);
    }

    #[test]
    fn test_notes_split_across_pages() {
        let mut heights = vec![LABEL];
        heights.extend([LINE; 100]);
        let runs = paginate(&heights, 200.0, 600.0, NOTE_LINES);
        // 11 lines under the label, then 38 a page.
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0], 0..12);
        assert_eq!(runs.last().map(|r| r.end), Some(101));
        assert!(runs.iter().skip(1).all(|r| r.len() >= NOTE_LINES.widows));
    }

    #[test]
    fn test_fresh_first_page_never_empty() {
        let runs = paginate(&[2_000.0], 640.0, 640.0, ROWS);
        assert_eq!(runs, vec![0..1]);
    }

    proptest! {
        #[test]
        fn prop_runs_cover_every_row_in_order(
            heights in prop::collection::vec(5.0f64..900.0, 0..60),
            first_room in 0.0f64..640.0,
        ) {
            let runs = paginate(&heights, first_room, 640.0, ROWS);
            let mut next = 0;
            for (i, run) in runs.iter().enumerate() {
                prop_assert_eq!(run.start, next);
                prop_assert!(i == 0 || !run.is_empty());
                next = run.end;
            }
            prop_assert_eq!(next, heights.len());
        }

        #[test]
        fn prop_later_pages_never_overflow_with_page_sized_rows(
            heights in prop::collection::vec(10.0f64..200.0, 1..80),
        ) {
            let runs = paginate(&heights, 640.0, 640.0, ROWS);
            for run in runs {
                let used: f64 = heights[run].iter().sum();
                prop_assert!(used <= 640.0 + 1e-6);
            }
        }
    }
}
