pub mod backup;
pub mod config;
pub mod schedule;
pub mod timetable;
pub mod transfer;
