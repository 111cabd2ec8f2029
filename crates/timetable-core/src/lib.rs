//! # Timetable Core Library
//!
//! Business logic for a weekly class and exam timetable. The CLI and the
//! backup server are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Conflict Checker**: gates inserts. Interactive adds are rejected when
//!   another item starts at the same minute on the same day; bulk imports
//!   shift such items forward a minute at a time instead
//! - **Day Layout Engine**: packs one day's overlapping items into
//!   side-by-side columns for rendering
//! - **Storage**: flat JSON schedule store and TOML configuration
//! - **Transfer / Backup**: JSON export/import and the backup client/archive
//!
//! Every list operation takes the current items by slice and returns a new
//! list; nothing here keeps hidden state or reads the clock on its own.
//!
//! ## Key Components
//!
//! - [`conflict::add_item`] / [`conflict::merge_import`]: the two insert policies
//! - [`layout::layout_day`]: column packing for one day
//! - [`ScheduleStore`]: load/save of the whole list
//! - [`BackupTransport`]: where backups are uploaded

pub mod backup;
pub mod conflict;
pub mod error;
pub mod id;
pub mod layout;
pub mod render;
pub mod schedule;
pub mod storage;
pub mod transfer;

pub use backup::{BackupAck, BackupArchive, BackupPayload, BackupTransport, HttpBackupClient};
pub use conflict::{add_item, can_insert, merge_import, remove_item, replace_item, ImportOutcome};
pub use error::{ConfigError, CoreError, ImportError, StorageError, TransportError, ValidationError};
pub use id::{IdGenerator, SequentialIds, UuidIds};
pub use layout::{layout_day, layout_week, DayLayout, PositionedItem};
pub use schedule::{ItemDraft, ItemKind, MinuteOfDay, ScheduleItem, Weekday};
pub use storage::{Config, JsonFileStore, MemoryStore, ScheduleStore};
