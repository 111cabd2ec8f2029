//! Plain-text rendering of schedules and day layouts.

use std::fmt::Write;

use crate::layout::{DayLayout, PositionedItem};
use crate::schedule::{sorted_by_day_and_time, ScheduleItem};

/// Smallest block height, in minutes of timeline, a renderer should draw.
pub const MIN_DISPLAY_MINUTES: u32 = 30;

/// Visual height of a positioned item. Short items are drawn taller than
/// they are; the layout itself keeps the true end.
pub fn display_height(item: &PositionedItem) -> u32 {
    item.end.saturating_sub(item.start).max(MIN_DISPLAY_MINUTES)
}

/// `HH:MM` for a minute offset, allowing values past midnight (`25:30`).
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// One line per item: day, time, duration, subject, kind, room, instructor, id.
pub fn render_list(items: &[ScheduleItem]) -> String {
    let mut out = String::new();
    for item in sorted_by_day_and_time(items) {
        let _ = writeln!(
            out,
            "{:<9} {} {:>4} min  {} ({}) • {} • {}  [{}]",
            item.day.name(),
            item.time,
            item.duration,
            item.subject,
            item.kind,
            item.room,
            item.instructor,
            item.id
        );
    }
    out
}

/// A day's lanes: each item with its time range and horizontal placement.
///
/// ```text
/// Monday (2 columns)
///   09:00-10:00  col 1/2  left   0%  width  50%  Calculus (Lecture) • B12
///   09:30-10:30  col 2/2  left  50%  width  50%  Physics (Section) • Lab 3
/// ```
pub fn render_day(day: &DayLayout) -> String {
    let mut out = String::new();
    let cols = day.total_cols();
    let _ = writeln!(
        out,
        "{} ({} column{})",
        day.day,
        cols,
        if cols == 1 { "" } else { "s" }
    );
    if day.items.is_empty() {
        out.push_str("  (nothing scheduled)\n");
        return out;
    }
    for placed in &day.items {
        let _ = writeln!(
            out,
            "  {}-{}  col {}/{}  left {:>3.0}%  width {:>3.0}%  {} ({}) • {}",
            format_minutes(placed.start),
            format_minutes(placed.end),
            placed.col + 1,
            placed.total_cols,
            placed.left_percent(),
            placed.width_percent(),
            placed.item.subject,
            placed.item.kind,
            placed.item.room
        );
    }
    out
}

/// The whole week. Empty days are skipped unless `include_empty` is set.
pub fn render_week(days: &[DayLayout], include_empty: bool) -> String {
    days.iter()
        .filter(|day| include_empty || !day.items.is_empty())
        .map(render_day)
        .collect::<Vec<_>>()
        .join("\n")
}
