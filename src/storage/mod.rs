//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - active_quest(id, name, companion_type, xp, start_date)
//! - tasks(id, quest_id, history_id, text, is_done)
//! - history(id, name, companion_type, final_xp, status, end_date)
//! - schema_version(version, applied_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::{QuestStore, StoreStats};
