//! Schedule item types: weekdays, item kinds, stored items and entry drafts.

mod clock;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use clock::{MinuteOfDay, MINUTES_PER_DAY};

/// Duration used when an item has none (or a degenerate one).
pub const DEFAULT_DURATION: u32 = 60;

/// Shortest duration accepted at entry time.
pub const MIN_ENTRY_DURATION: u32 = 5;

/// Longest duration accepted at entry or import: one week.
pub const MAX_DURATION: u32 = 7 * MINUTES_PER_DAY as u32;

/// Reminder lead time used when none is given.
pub const DEFAULT_REMINDER: u32 = 15;

/// Day of the week, in display order (Sunday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All days in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Position in display order, 0 for Sunday.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_ascii_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "day".into(),
                message: format!("'{s}' is not a weekday"),
            })
    }
}

/// Kind of schedule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    Lecture,
    Section,
    Exam,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Lecture => "Lecture",
            ItemKind::Section => "Section",
            ItemKind::Exam => "Exam",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lecture" => Ok(ItemKind::Lecture),
            "section" => Ok(ItemKind::Section),
            "exam" => Ok(ItemKind::Exam),
            _ => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("'{s}' is not one of Lecture, Section, Exam"),
            }),
        }
    }
}

/// A stored weekly class or exam.
///
/// Items are values: they are only ever replaced wholesale or removed,
/// never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub room: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    pub day: Weekday,
    pub time: MinuteOfDay,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_reminder")]
    pub reminder: u32,
}

impl ScheduleItem {
    /// Start minute since midnight.
    pub fn start(&self) -> u32 {
        u32::from(self.time.minutes())
    }

    /// Duration with the degenerate zero case mapped to the default.
    pub fn effective_duration(&self) -> u32 {
        if self.duration == 0 {
            DEFAULT_DURATION
        } else {
            self.duration
        }
    }

    /// End minute since midnight. May exceed 1440 for items running past midnight.
    ///
    /// Saturates for durations no entry path accepts (hand-edited stores).
    pub fn end(&self) -> u32 {
        self.start().saturating_add(self.effective_duration())
    }
}

fn default_duration() -> u32 {
    DEFAULT_DURATION
}

fn default_reminder() -> u32 {
    DEFAULT_REMINDER
}

/// User-entered item fields, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub subject: String,
    pub instructor: String,
    pub room: String,
    pub kind: ItemKind,
    pub day: Weekday,
    pub time: MinuteOfDay,
    pub duration: u32,
    pub reminder: u32,
}

impl ItemDraft {
    /// Draft with the entry-form defaults: Sunday 08:00, one hour lecture.
    pub fn new(subject: impl Into<String>, day: Weekday, time: MinuteOfDay) -> Self {
        Self {
            subject: subject.into(),
            instructor: String::new(),
            room: String::new(),
            kind: ItemKind::Lecture,
            day,
            time,
            duration: DEFAULT_DURATION,
            reminder: DEFAULT_REMINDER,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    /// Entry-time checks. The data model itself does not enforce these.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "subject".into(),
            });
        }
        if self.duration < MIN_ENTRY_DURATION {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!(
                    "must be at least {MIN_ENTRY_DURATION} minutes (got {})",
                    self.duration
                ),
            });
        }
        if self.duration > MAX_DURATION {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!(
                    "must be at most {MAX_DURATION} minutes (got {})",
                    self.duration
                ),
            });
        }
        Ok(())
    }

    pub fn into_item(self, id: String) -> ScheduleItem {
        ScheduleItem {
            id,
            subject: self.subject,
            instructor: self.instructor,
            room: self.room,
            kind: self.kind,
            day: self.day,
            time: self.time,
            duration: self.duration,
            reminder: self.reminder,
        }
    }
}

/// Items sorted by day then start time, for listings.
pub fn sorted_by_day_and_time(items: &[ScheduleItem]) -> Vec<&ScheduleItem> {
    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort_by_key(|item| (item.day, item.time));
    sorted
}
