//! Insert-time collision checks.
//!
//! Two items collide when they share a day and the exact same start minute.
//! Overlap without an equal start is allowed and left to the layout engine.
//!
//! There are two policies on purpose:
//!
//! - interactive add ([`add_item`], [`replace_item`]) rejects a collision;
//! - bulk import ([`merge_import`]) never rejects and instead shifts the
//!   incoming item forward one minute at a time until its start is free.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{CoreError, ImportError, Result};
use crate::id::IdGenerator;
use crate::schedule::{ItemDraft, MinuteOfDay, ScheduleItem, Weekday, MINUTES_PER_DAY};

/// Whether an item starting at `time` on `day` may be added.
pub fn can_insert(existing: &[ScheduleItem], day: Weekday, time: MinuteOfDay) -> bool {
    find_collision(existing, day, time).is_none()
}

/// The existing item that starts at the same minute on the same day, if any.
pub fn find_collision(
    existing: &[ScheduleItem],
    day: Weekday,
    time: MinuteOfDay,
) -> Option<&ScheduleItem> {
    existing.iter().find(|e| e.day == day && e.time == time)
}

/// Validate `draft` and append it with a fresh id.
///
/// Returns the new list; `existing` is left untouched on every path.
///
/// # Errors
/// [`CoreError::Validation`] for a missing subject or too short duration,
/// [`CoreError::Collision`] when another item starts at the same minute.
pub fn add_item(
    existing: &[ScheduleItem],
    draft: ItemDraft,
    ids: &mut impl IdGenerator,
) -> Result<Vec<ScheduleItem>> {
    draft.validate()?;
    reject_collision(existing.iter(), draft.day, draft.time)?;

    let item = draft.into_item(ids.next_id());
    tracing::debug!(id = %item.id, day = %item.day, time = %item.time, "schedule item added");

    let mut items = Vec::with_capacity(existing.len() + 1);
    items.extend_from_slice(existing);
    items.push(item);
    Ok(items)
}

/// Replace the item with `id` by `draft`, keeping its id and position.
///
/// The collision check skips the item being replaced, so moving an item
/// to a new duration at the same start is fine.
pub fn replace_item(existing: &[ScheduleItem], id: &str, draft: ItemDraft) -> Result<Vec<ScheduleItem>> {
    draft.validate()?;
    let position = position_of(existing, id)?;
    reject_collision(
        existing.iter().filter(|e| e.id != id),
        draft.day,
        draft.time,
    )?;

    let mut items = existing.to_vec();
    items[position] = draft.into_item(id.to_string());
    tracing::debug!(%id, "schedule item replaced");
    Ok(items)
}

/// Drop the item with `id`.
pub fn remove_item(existing: &[ScheduleItem], id: &str) -> Result<Vec<ScheduleItem>> {
    position_of(existing, id)?;
    tracing::debug!(%id, "schedule item removed");
    Ok(existing.iter().filter(|e| e.id != id).cloned().collect())
}

fn position_of(existing: &[ScheduleItem], id: &str) -> Result<usize> {
    existing
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
}

fn reject_collision<'a>(
    mut others: impl Iterator<Item = &'a ScheduleItem>,
    day: Weekday,
    time: MinuteOfDay,
) -> Result<()> {
    match others.find(|e| e.day == day && e.time == time) {
        Some(clash) => {
            tracing::debug!(%day, %time, existing = %clash.id, "rejected same-minute collision");
            Err(CoreError::Collision {
                day,
                time,
                existing_id: clash.id.clone(),
            })
        }
        None => Ok(()),
    }
}

/// An imported item that had to move to a free start minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftedItem {
    pub id: String,
    pub day: Weekday,
    pub from: MinuteOfDay,
    pub to: MinuteOfDay,
}

/// Result of merging an import into the current list.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    /// Existing items followed by the imported ones, in import order.
    pub items: Vec<ScheduleItem>,
    pub imported: usize,
    pub shifted: Vec<ShiftedItem>,
}

/// Merge `incoming` after `existing`, shifting same-minute collisions.
///
/// Each incoming item is checked against everything merged so far,
/// including earlier items of the same import. A colliding start moves
/// forward one minute at a time, wrapping past midnight, until it is free.
///
/// # Errors
/// [`ImportError::DayFull`] if all 1440 minutes of a day are taken. Nothing
/// is merged in that case.
pub fn merge_import(existing: &[ScheduleItem], incoming: Vec<ScheduleItem>) -> Result<ImportOutcome> {
    let mut occupied: HashSet<(Weekday, MinuteOfDay)> =
        existing.iter().map(|e| (e.day, e.time)).collect();
    let mut items = existing.to_vec();
    let mut shifted = Vec::new();
    let imported = incoming.len();

    for mut item in incoming {
        let original = item.time;
        let mut attempts = 0;
        while occupied.contains(&(item.day, item.time)) {
            attempts += 1;
            if attempts >= MINUTES_PER_DAY {
                return Err(ImportError::DayFull { day: item.day }.into());
            }
            item.time = item.time.wrapping_add(1);
        }

        if item.time != original {
            tracing::debug!(id = %item.id, day = %item.day, from = %original, to = %item.time, "shifted imported item");
            shifted.push(ShiftedItem {
                id: item.id.clone(),
                day: item.day,
                from: original,
                to: item.time,
            });
        }
        occupied.insert((item.day, item.time));
        items.push(item);
    }

    tracing::info!(imported, shifted = shifted.len(), total = items.len(), "import merged");
    Ok(ImportOutcome {
        items,
        imported,
        shifted,
    })
}
