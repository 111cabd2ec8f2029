//! Side-by-side column layout for one day of the timetable.
//!
//! Overlapping items are packed greedily into columns: items are visited in
//! start order and each goes into the first column whose last item has
//! already ended, or into a new column. Every item of the day then shares
//! the same column count so all lanes render with equal width.

use serde::Serialize;

use crate::schedule::{ScheduleItem, Weekday};

/// An item with its computed interval and column placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedItem {
    #[serde(flatten)]
    pub item: ScheduleItem,
    /// Start minute since midnight
    pub start: u32,
    /// End minute since midnight. Not clamped for display.
    pub end: u32,
    /// Zero-based column
    pub col: usize,
    /// Number of columns opened for the whole day
    #[serde(rename = "totalCols")]
    pub total_cols: usize,
}

impl PositionedItem {
    /// Share of the day column's width, in percent.
    pub fn width_percent(&self) -> f64 {
        100.0 / self.total_cols as f64
    }

    /// Left offset within the day column, in percent.
    pub fn left_percent(&self) -> f64 {
        self.col as f64 * self.width_percent()
    }
}

/// Lay out the items of a single day.
///
/// Output is ordered by start minute; items with equal starts keep their
/// input order. Same-day items with equal starts should not exist after
/// the insert-time check, but imported or hand-edited data may still carry
/// them and they are laid out like any other overlap.
pub fn layout_day(items: &[ScheduleItem]) -> Vec<PositionedItem> {
    let mut events: Vec<&ScheduleItem> = items.iter().collect();
    events.sort_by_key(|item| item.start());

    // End minute of the last item placed in each column.
    let mut column_ends: Vec<u32> = Vec::new();
    let mut placed = Vec::with_capacity(events.len());

    for item in events {
        let start = item.start();
        let end = item.end();
        let col = match column_ends.iter().position(|&last_end| last_end <= start) {
            Some(col) => {
                column_ends[col] = end;
                col
            }
            None => {
                column_ends.push(end);
                column_ends.len() - 1
            }
        };
        placed.push((item, start, end, col));
    }

    let total_cols = column_ends.len();
    placed
        .into_iter()
        .map(|(item, start, end, col)| PositionedItem {
            item: item.clone(),
            start,
            end,
            col,
            total_cols,
        })
        .collect()
}

/// One day of the weekly timetable.
#[derive(Debug, Clone, Serialize)]
pub struct DayLayout {
    pub day: Weekday,
    pub items: Vec<PositionedItem>,
}

impl DayLayout {
    /// Column count shared by the day's items, 0 for an empty day.
    pub fn total_cols(&self) -> usize {
        self.items.first().map_or(0, |p| p.total_cols)
    }
}

/// Group items by weekday and lay out each day, Sunday first.
///
/// Every weekday is present, empty or not.
pub fn layout_week(items: &[ScheduleItem]) -> Vec<DayLayout> {
    Weekday::ALL
        .into_iter()
        .map(|day| {
            let for_day: Vec<ScheduleItem> =
                items.iter().filter(|item| item.day == day).cloned().collect();
            DayLayout {
                day,
                items: layout_day(&for_day),
            }
        })
        .collect()
}
