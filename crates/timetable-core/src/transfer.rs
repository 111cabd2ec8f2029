//! JSON export and import of the schedule list.
//!
//! Export always writes `{"schedules": [...]}`. Import accepts either that
//! shape or a bare array, parses every record up front, and only then merges
//! through [`merge_import`]. A document that fails to parse changes nothing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conflict::{merge_import, ImportOutcome};
use crate::error::{ImportError, Result};
use crate::id::IdGenerator;
use crate::schedule::{
    ItemKind, MinuteOfDay, ScheduleItem, Weekday, DEFAULT_DURATION, DEFAULT_REMINDER,
    MAX_DURATION,
};

/// Default file name for exports.
pub const EXPORT_FILE_NAME: &str = "schedules_backup.json";

#[derive(Serialize)]
struct ExportDocument<'a> {
    schedules: &'a [ScheduleItem],
}

/// Pretty-printed `{"schedules": [...]}`.
pub fn export_json(items: &[ScheduleItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportDocument { schedules: items })?)
}

pub fn export_to_path(items: &[ScheduleItem], path: &Path) -> Result<()> {
    std::fs::write(path, export_json(items)?)?;
    Ok(())
}

/// A loosely-typed item as found in an import document.
///
/// Only `day` and `time` are required. Numbers may arrive as strings and
/// ids as numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub reminder: Option<Value>,
}

impl ImportRecord {
    /// Convert to a stored item. `id` is only called when the record has none.
    fn into_item(
        self,
        index: usize,
        ids: &mut impl IdGenerator,
    ) -> Result<ScheduleItem, ImportError> {
        let invalid = |message: String| ImportError::InvalidRecord { index, message };

        let day: Weekday = self
            .day
            .as_deref()
            .ok_or_else(|| invalid("missing 'day'".into()))?
            .parse()
            .map_err(|e: crate::error::ValidationError| invalid(e.to_string()))?;
        let time: MinuteOfDay = self
            .time
            .as_deref()
            .ok_or_else(|| invalid("missing 'time'".into()))?
            .parse()
            .map_err(|e: crate::error::ValidationError| invalid(e.to_string()))?;
        let kind = match self.kind.as_deref() {
            None | Some("") => ItemKind::default(),
            Some(raw) => raw.parse().map_err(|e: crate::error::ValidationError| invalid(e.to_string()))?,
        };

        let duration = positive_minutes(self.duration.as_ref()).unwrap_or(DEFAULT_DURATION);
        if duration > MAX_DURATION {
            return Err(invalid(format!(
                "duration {duration} exceeds {MAX_DURATION} minutes"
            )));
        }

        let id = match self.id {
            Some(Value::String(id)) if !id.trim().is_empty() => id,
            Some(Value::Number(n)) => n.to_string(),
            _ => ids.next_id(),
        };

        Ok(ScheduleItem {
            id,
            subject: self.subject.unwrap_or_default(),
            instructor: self.instructor.unwrap_or_default(),
            room: self.room.unwrap_or_default(),
            kind,
            day,
            time,
            duration,
            reminder: positive_minutes(self.reminder.as_ref()).unwrap_or(DEFAULT_REMINDER),
        })
    }
}

/// A positive whole number of minutes from a JSON number or numeric string.
fn positive_minutes(value: Option<&Value>) -> Option<u32> {
    let minutes = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // Float-to-int `as` saturates, so huge values stay huge.
    if minutes.is_finite() && minutes >= 1.0 {
        Some(minutes as u32)
    } else {
        None
    }
}

/// Parse an import document into records without touching any list.
///
/// An object without a `schedules` field imports nothing.
pub fn parse_import(text: &str) -> Result<Vec<ImportRecord>, ImportError> {
    let document: Value = serde_json::from_str(text).map_err(ImportError::Malformed)?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut fields) => match fields.remove("schedules") {
            Some(Value::Array(records)) => records,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => return Err(ImportError::UnexpectedShape(json_kind(&other).into())),
        },
        other => return Err(ImportError::UnexpectedShape(json_kind(&other).into())),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|e| ImportError::InvalidRecord {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Parse `text` and merge it after `existing`, shifting same-minute
/// collisions. Records without an id, or with one already in use, get a
/// fresh id. `existing` is never modified; on error nothing is merged.
pub fn import_json(
    existing: &[ScheduleItem],
    text: &str,
    ids: &mut impl IdGenerator,
) -> Result<ImportOutcome> {
    let records = parse_import(text)?;
    let mut taken: HashSet<String> = existing.iter().map(|e| e.id.clone()).collect();
    let mut incoming = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let mut item = record.into_item(index, ids)?;
        // Re-importing an export would otherwise duplicate ids.
        while !taken.insert(item.id.clone()) {
            item.id = ids.next_id();
        }
        incoming.push(item);
    }
    merge_import(existing, incoming)
}

pub fn import_from_path(
    existing: &[ScheduleItem],
    path: &Path,
    ids: &mut impl IdGenerator,
) -> Result<ImportOutcome> {
    let text = std::fs::read_to_string(path)?;
    import_json(existing, &text, ids)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::id::SequentialIds;
    use crate::schedule::ItemDraft;

    fn existing() -> Vec<ScheduleItem> {
        vec![ItemDraft::new("Math", Weekday::Monday, MinuteOfDay::from_hm(9, 0).unwrap())
            .into_item("m".into())]
    }

    #[test]
    fn export_wraps_items_in_schedules() {
        let json: Value = serde_json::from_str(&export_json(&existing()).unwrap()).unwrap();
        assert_eq!(json["schedules"][0]["id"], "m");
        assert_eq!(json["schedules"][0]["time"], "09:00");
    }

    #[test]
    fn exported_document_imports_back() {
        let text = export_json(&existing()).unwrap();
        let outcome = import_json(&[], &text, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.items, existing());
    }

    #[test]
    fn duplicate_ids_get_fresh_ones() {
        let text = export_json(&existing()).unwrap();
        let outcome = import_json(&existing(), &text, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.items[0].id, "m");
        assert_eq!(outcome.items[1].id, "x-1");
    }

    #[test]
    fn bare_array_is_accepted() {
        let text = r#"[{"subject":"Art","day":"Tuesday","time":"10:00"}]"#;
        let outcome = import_json(&existing(), text, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[1].id, "x-1");
        assert_eq!(outcome.items[1].duration, DEFAULT_DURATION);
    }

    #[test]
    fn object_without_schedules_imports_nothing() {
        let outcome = import_json(&existing(), r#"{"other": 1}"#, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.items, existing());
    }

    #[test]
    fn colliding_import_is_shifted() {
        let text = r#"{"schedules":[
            {"id":"a","subject":"A","day":"Monday","time":"09:00","duration":60},
            {"id":"b","subject":"B","day":"Monday","time":"09:00","duration":30}
        ]}"#;
        let outcome = import_json(&[], text, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.items[0].time.to_string(), "09:00");
        assert_eq!(outcome.items[1].time.to_string(), "09:01");
        assert_eq!(outcome.shifted.len(), 1);
    }

    #[test]
    fn lenient_numbers_and_defaults() {
        let text = r#"[
            {"day":"Friday","time":"8:05","duration":"45","reminder":"10","type":"Exam"},
            {"day":"Friday","time":"09:00","duration":-5},
            {"day":"Friday","time":"10:00","duration":0, "type": ""}
        ]"#;
        let outcome = import_json(&[], text, &mut SequentialIds::new("x")).unwrap();
        let items = outcome.items;
        assert_eq!(items[0].duration, 45);
        assert_eq!(items[0].reminder, 10);
        assert_eq!(items[0].kind, ItemKind::Exam);
        assert_eq!(items[0].time.to_string(), "08:05");
        assert_eq!(items[1].duration, DEFAULT_DURATION);
        assert_eq!(items[2].duration, DEFAULT_DURATION);
        assert_eq!(items[2].kind, ItemKind::Lecture);
    }

    #[test]
    fn numeric_ids_are_kept_as_strings() {
        let text = r#"[{"id":1700000000000,"subject":"A","day":"Monday","time":"10:00"}]"#;
        let outcome = import_json(&[], text, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.items[0].id, "1700000000000");
    }

    #[test]
    fn oversized_duration_rejects_the_import() {
        let just_over = (MAX_DURATION + 1).to_string();
        for duration in ["4294967295", "1e12", just_over.as_str()] {
            let text = format!(r#"[{{"day":"Monday","time":"09:00","duration":{duration}}}]"#);
            let err = import_json(&existing(), &text, &mut SequentialIds::new("x")).unwrap_err();
            assert!(
                matches!(err, CoreError::Import(ImportError::InvalidRecord { index: 0, .. })),
                "{duration}: {err:?}"
            );
        }
        let text = format!(r#"[{{"day":"Monday","time":"09:00","duration":{MAX_DURATION}}}]"#);
        assert!(import_json(&[], &text, &mut SequentialIds::new("x")).is_ok());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = import_json(&existing(), "{oops", &mut SequentialIds::new("x")).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::Malformed(_))));
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        for text in ["42", "\"text\"", r#"{"schedules": 5}"#] {
            let err = parse_import(text).unwrap_err();
            assert!(matches!(err, ImportError::UnexpectedShape(_)), "{text}");
        }
    }

    #[test]
    fn one_bad_record_aborts_the_whole_import() {
        let text = r#"[
            {"day":"Monday","time":"10:00"},
            {"day":"Monday","time":"99:00"}
        ]"#;
        let err = import_json(&existing(), text, &mut SequentialIds::new("x")).unwrap_err();
        match err {
            CoreError::Import(ImportError::InvalidRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_day_is_an_invalid_record() {
        let err = parse_import(r#"[{"time":"10:00"}]"#)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
            .into_item(0, &mut SequentialIds::new("x"))
            .unwrap_err();
        assert!(err.to_string().contains("missing 'day'"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        export_to_path(&existing(), &path).unwrap();
        let outcome = import_from_path(&[], &path, &mut SequentialIds::new("x")).unwrap();
        assert_eq!(outcome.items.len(), 1);
    }
}
