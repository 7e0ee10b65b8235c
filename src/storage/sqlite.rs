//! SQLite storage implementation

use std::path::Path;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use crate::{Error, Result};
use crate::quest::{
    ArchiveStatus, CompanionType, HistoryDetails, HistoryId, HistoryRecord, Quest, QuestDetails,
    QuestId, QuestSummary, Task, TaskId, TaskToggle, xp_after_toggle,
};
use super::schema;

/// Formats accepted when reading timestamps written by older releases.
const LEGACY_TIMESTAMP_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// SQLite-backed store for quests, tasks and history
pub struct QuestStore {
    conn: Connection,
}

impl QuestStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize()?;
        tracing::debug!("Opened quest store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the schema exists and is current. Never drops data.
    pub fn initialize(&mut self) -> Result<()> {
        schema::migrate(&mut self.conn)
    }

    pub fn schema_version(&self) -> Result<u32> {
        schema::current_version(&self.conn)
    }

    // ========== Quest Operations ==========

    /// All active quests, oldest first
    pub fn list_active_quests(&self) -> Result<Vec<QuestSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, companion_type, xp FROM active_quest ORDER BY id",
        )?;

        let quests = stmt
            .query_map([], |row| {
                Ok(QuestSummary {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    companion_type: Self::companion_column(row, 2)?,
                    xp: Self::xp_column(row, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(quests)
    }

    /// Get an active quest without its tasks
    pub fn get_quest(&self, quest_id: QuestId) -> Result<Option<Quest>> {
        self.conn
            .query_row(
                "SELECT id, name, companion_type, xp, start_date FROM active_quest WHERE id = ?1",
                [quest_id],
                Self::row_to_quest,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get an active quest and every task attached to it
    pub fn load_quest(&self, quest_id: QuestId) -> Result<Option<QuestDetails>> {
        let Some(quest) = self.get_quest(quest_id)? else {
            return Ok(None);
        };
        let tasks = self.tasks_where("quest_id", quest_id)?;
        Ok(Some(QuestDetails { quest, tasks }))
    }

    /// Start a new quest with zero XP. Other active quests are left alone.
    pub fn create_quest(&self, name: &str, companion: CompanionType) -> Result<QuestId> {
        self.conn.execute(
            r#"
            INSERT INTO active_quest (name, companion_type, xp, start_date)
            VALUES (?1, ?2, 0, ?3)
            "#,
            params![name, companion.as_str(), Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(quest_id = id, "Created quest '{}' ({})", name, companion);
        Ok(id)
    }

    /// Overwrite a quest's XP. Returns false if the quest does not exist.
    pub fn adjust_quest_xp(&self, quest_id: QuestId, new_xp: u32) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE active_quest SET xp = ?1 WHERE id = ?2",
            params![new_xp, quest_id],
        )?;
        Ok(updated > 0)
    }

    /// Move a quest into history.
    ///
    /// The history insert, task re-parenting and quest deletion commit
    /// together. Returns `None` (and writes nothing) if the quest is not active.
    pub fn archive_quest(
        &mut self,
        quest_id: QuestId,
        status: ArchiveStatus,
    ) -> Result<Option<HistoryId>> {
        let tx = self.conn.transaction()?;

        let quest = tx
            .query_row(
                "SELECT id, name, companion_type, xp, start_date FROM active_quest WHERE id = ?1",
                [quest_id],
                Self::row_to_quest,
            )
            .optional()?;
        let Some(quest) = quest else {
            tracing::debug!(quest_id, "Archive skipped: quest not found");
            return Ok(None);
        };

        tx.execute(
            r#"
            INSERT INTO history (name, companion_type, final_xp, status, end_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                quest.name,
                quest.companion_type.as_str(),
                quest.xp,
                status.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        let history_id = tx.last_insert_rowid();

        let moved = tx.execute(
            "UPDATE tasks SET history_id = ?1, quest_id = NULL WHERE quest_id = ?2",
            params![history_id, quest_id],
        )?;
        tx.execute("DELETE FROM active_quest WHERE id = ?1", [quest_id])?;
        tx.commit()?;

        tracing::info!(
            quest_id,
            history_id,
            tasks = moved,
            "Archived quest '{}' as {}",
            quest.name,
            status
        );
        Ok(Some(history_id))
    }

    // ========== Task Operations ==========

    /// Append an open task to an active quest.
    ///
    /// Returns `None` if the quest does not exist.
    pub fn add_task(&mut self, quest_id: QuestId, text: &str) -> Result<Option<Task>> {
        let tx = self.conn.transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM active_quest WHERE id = ?1", [quest_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Ok(None);
        }

        tx.execute(
            "INSERT INTO tasks (quest_id, history_id, text, is_done) VALUES (?1, NULL, ?2, 0)",
            params![quest_id, text],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(quest_id, task_id = id, "Added task");
        Ok(Some(Task {
            id,
            quest_id: Some(quest_id),
            history_id: None,
            text: text.to_string(),
            is_done: false,
        }))
    }

    pub fn get_task(&self, task_id: TaskId) -> Result<Option<Task>> {
        self.conn
            .query_row(
                "SELECT id, quest_id, history_id, text, is_done FROM tasks WHERE id = ?1",
                [task_id],
                Self::row_to_task,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write a task's done flag. XP is not touched; see [`Self::toggle_task`].
    pub fn set_task_done(&self, task_id: TaskId, done: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE tasks SET is_done = ?1 WHERE id = ?2",
            params![done, task_id],
        )?;
        Ok(updated > 0)
    }

    /// Set a task's done flag and adjust its quest's XP in one transaction.
    ///
    /// XP moves by 25 only when the flag actually changes. Archived tasks
    /// and unknown ids return `None`.
    pub fn toggle_task(&mut self, task_id: TaskId, done: bool) -> Result<Option<TaskToggle>> {
        let tx = self.conn.transaction()?;

        let owner = tx
            .query_row(
                "SELECT quest_id, is_done FROM tasks WHERE id = ?1",
                [task_id],
                |row| {
                    Ok((
                        row.get::<_, Option<QuestId>>(0)?,
                        row.get::<_, Option<bool>>(1)?.unwrap_or(false),
                    ))
                },
            )
            .optional()?;
        let Some((Some(quest_id), was_done)) = owner else {
            return Ok(None);
        };

        let xp = tx
            .query_row("SELECT xp FROM active_quest WHERE id = ?1", [quest_id], |row| {
                Self::xp_column(row, 0)
            })
            .optional()?;
        let Some(xp) = xp else {
            tracing::warn!(task_id, quest_id, "Task points at a missing quest");
            return Ok(None);
        };

        let new_xp = if was_done == done { xp } else { xp_after_toggle(xp, done) };

        tx.execute(
            "UPDATE tasks SET is_done = ?1 WHERE id = ?2",
            params![done, task_id],
        )?;
        tx.execute(
            "UPDATE active_quest SET xp = ?1 WHERE id = ?2",
            params![new_xp, quest_id],
        )?;
        tx.commit()?;

        tracing::debug!(task_id, quest_id, done, xp = new_xp, "Toggled task");
        Ok(Some(TaskToggle {
            task_id,
            quest_id,
            is_done: done,
            xp: new_xp,
        }))
    }

    fn tasks_where(&self, owner_column: &str, owner_id: i64) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT id, quest_id, history_id, text, is_done FROM tasks WHERE {} = ?1 ORDER BY id",
            owner_column
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let tasks = stmt
            .query_map([owner_id], Self::row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    // ========== History Operations ==========

    /// All archived quests, most recent first
    pub fn list_history(&self) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, companion_type, final_xp, status, end_date FROM history ORDER BY id DESC",
        )?;

        let records = stmt
            .query_map([], Self::row_to_history)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    pub fn get_history(&self, history_id: HistoryId) -> Result<Option<HistoryRecord>> {
        self.conn
            .query_row(
                "SELECT id, name, companion_type, final_xp, status, end_date FROM history WHERE id = ?1",
                [history_id],
                Self::row_to_history,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a history record with the tasks that were moved into it
    pub fn get_history_details(&self, history_id: HistoryId) -> Result<Option<HistoryDetails>> {
        let Some(record) = self.get_history(history_id)? else {
            return Ok(None);
        };
        let tasks = self.tasks_where("history_id", history_id)?;
        Ok(Some(HistoryDetails { record, tasks }))
    }

    // ========== Statistics ==========

    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            active_quests: self.count("SELECT COUNT(*) FROM active_quest")?,
            open_tasks: self.count(
                "SELECT COUNT(*) FROM tasks WHERE quest_id IS NOT NULL AND COALESCE(is_done, 0) = 0",
            )?,
            done_tasks: self.count(
                "SELECT COUNT(*) FROM tasks WHERE quest_id IS NOT NULL AND COALESCE(is_done, 0) != 0",
            )?,
            completed: self.count("SELECT COUNT(*) FROM history WHERE status = 'completed'")?,
            abandoned: self.count("SELECT COUNT(*) FROM history WHERE status = 'abandoned'")?,
        })
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Row Helpers ==========

    fn row_to_quest(row: &rusqlite::Row) -> rusqlite::Result<Quest> {
        Ok(Quest {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            companion_type: Self::companion_column(row, 2)?,
            xp: Self::xp_column(row, 3)?,
            start_date: Self::timestamp_column(row, 4)?,
        })
    }

    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            quest_id: row.get(1)?,
            history_id: row.get(2)?,
            text: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            is_done: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        })
    }

    fn row_to_history(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        let status_str: String = row.get(4)?;
        let status: ArchiveStatus = status_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(HistoryRecord {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            companion_type: Self::companion_column(row, 2)?,
            final_xp: Self::xp_column(row, 3)?,
            status,
            end_date: Self::timestamp_column(row, 5)?,
        })
    }

    fn companion_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<CompanionType> {
        let raw: Option<String> = row.get(idx)?;
        let companion = CompanionType::from_stored(raw.as_deref());
        if raw.as_deref() != Some(companion.as_str()) {
            tracing::debug!("Reading companion {:?} as {}", raw, companion);
        }
        Ok(companion)
    }

    fn xp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<u32> {
        let raw: Option<i64> = row.get(idx)?;
        Ok(raw.map_or(0, |xp| u32::try_from(xp.max(0)).unwrap_or(u32::MAX)))
    }

    fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let Some(raw) = row.get::<_, Option<String>>(idx)? else {
            return Ok(DateTime::<Utc>::default());
        };
        parse_timestamp(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }
}

/// Parse an RFC 3339 timestamp, or a naive local timestamp from older releases
fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    let rfc_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => return Ok(ts.with_timezone(&Utc)),
        Err(e) => e,
    };

    for format in LEGACY_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            let local = naive
                .and_local_timezone(Local)
                .earliest()
                .map(|ts| ts.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc());
            return Ok(local);
        }
    }

    Err(rfc_err)
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub active_quests: usize,
    pub open_tasks: usize,
    pub done_tasks: usize,
    pub completed: usize,
    pub abandoned: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Quest Log Statistics:")?;
        writeln!(f, "  Active quests: {}", self.active_quests)?;
        writeln!(f, "  Open tasks: {}", self.open_tasks)?;
        writeln!(f, "  Done tasks: {}", self.done_tasks)?;
        writeln!(f, "  Completed: {}", self.completed)?;
        writeln!(f, "  Abandoned: {}", self.abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_quest(name: &str) -> (QuestStore, QuestId) {
        let store = QuestStore::open_in_memory().unwrap();
        let id = store.create_quest(name, CompanionType::Dragon).unwrap();
        (store, id)
    }

    #[test]
    fn test_create_and_load_quest() {
        let (store, id) = store_with_quest("Learn Rust");

        let details = store.load_quest(id).unwrap().unwrap();
        assert_eq!(details.quest.name, "Learn Rust");
        assert_eq!(details.quest.companion_type, CompanionType::Dragon);
        assert_eq!(details.quest.xp, 0);
        assert!(details.tasks.is_empty());

        let quests = store.list_active_quests().unwrap();
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].id, id);
    }

    #[test]
    fn test_quests_listed_in_insertion_order() {
        let store = QuestStore::open_in_memory().unwrap();
        let a = store.create_quest("first", CompanionType::Tree).unwrap();
        let b = store.create_quest("second", CompanionType::Dragon).unwrap();

        let ids: Vec<_> = store.list_active_quests().unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_load_missing_quest() {
        let store = QuestStore::open_in_memory().unwrap();
        assert!(store.load_quest(42).unwrap().is_none());
    }

    #[test]
    fn test_add_task_isolated_per_quest() {
        let mut store = QuestStore::open_in_memory().unwrap();
        let a = store.create_quest("a", CompanionType::Dragon).unwrap();
        let b = store.create_quest("b", CompanionType::Tree).unwrap();

        let task = store.add_task(a, "write tests").unwrap().unwrap();
        assert_eq!(task.quest_id, Some(a));
        assert!(!task.is_done);

        assert_eq!(store.load_quest(a).unwrap().unwrap().tasks, vec![task]);
        assert!(store.load_quest(b).unwrap().unwrap().tasks.is_empty());
    }

    #[test]
    fn test_add_task_to_missing_quest() {
        let mut store = QuestStore::open_in_memory().unwrap();
        assert!(store.add_task(7, "orphan").unwrap().is_none());
        assert_eq!(store.stats().unwrap().open_tasks, 0);
    }

    #[test]
    fn test_set_task_done_leaves_xp() {
        let (mut store, id) = store_with_quest("q");
        let task = store.add_task(id, "t").unwrap().unwrap();

        assert!(store.set_task_done(task.id, true).unwrap());
        assert!(store.set_task_done(task.id, true).unwrap());
        assert!(store.get_task(task.id).unwrap().unwrap().is_done);
        assert_eq!(store.get_quest(id).unwrap().unwrap().xp, 0);
        assert!(!store.set_task_done(999, true).unwrap());
    }

    #[test]
    fn test_adjust_xp() {
        let (store, id) = store_with_quest("q");
        assert!(store.adjust_quest_xp(id, 70).unwrap());
        assert_eq!(store.get_quest(id).unwrap().unwrap().xp, 70);
        assert!(!store.adjust_quest_xp(id + 1, 5).unwrap());
    }

    #[test]
    fn test_toggle_roundtrip_restores_xp() {
        let (mut store, id) = store_with_quest("q");
        store.adjust_quest_xp(id, 10).unwrap();
        let task = store.add_task(id, "t").unwrap().unwrap();

        for _ in 0..2 {
            let on = store.toggle_task(task.id, true).unwrap().unwrap();
            assert_eq!(on.xp, 35);
            let off = store.toggle_task(task.id, false).unwrap().unwrap();
            assert_eq!(off.xp, 10);
        }
        assert_eq!(store.get_quest(id).unwrap().unwrap().xp, 10);
    }

    #[test]
    fn test_toggle_same_state_keeps_xp() {
        let (mut store, id) = store_with_quest("q");
        let task = store.add_task(id, "t").unwrap().unwrap();

        store.toggle_task(task.id, true).unwrap();
        let again = store.toggle_task(task.id, true).unwrap().unwrap();
        assert_eq!(again.xp, 25);

        let undone = store.toggle_task(task.id, false).unwrap().unwrap();
        assert_eq!(undone.xp, 0);
        let undone = store.toggle_task(task.id, false).unwrap().unwrap();
        assert_eq!(undone.xp, 0);
    }

    #[test]
    fn test_toggle_floors_at_zero() {
        let (mut store, id) = store_with_quest("q");
        let task = store.add_task(id, "t").unwrap().unwrap();
        store.set_task_done(task.id, true).unwrap();

        let toggled = store.toggle_task(task.id, false).unwrap().unwrap();
        assert_eq!(toggled.xp, 0);
    }

    #[test]
    fn test_archive_moves_tasks_into_history() {
        let (mut store, id) = store_with_quest("Learn Rust");
        let t1 = store.add_task(id, "read the book").unwrap().unwrap();
        let t2 = store.add_task(id, "write a crate").unwrap().unwrap();
        store.toggle_task(t1.id, true).unwrap();

        let history_id = store.archive_quest(id, ArchiveStatus::Completed).unwrap().unwrap();

        assert!(store.load_quest(id).unwrap().is_none());
        assert!(store.list_active_quests().unwrap().is_empty());

        let history = store.list_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].final_xp, 25);
        assert_eq!(history[0].status, ArchiveStatus::Completed);

        let details = store.get_history_details(history_id).unwrap().unwrap();
        let ids: Vec<_> = details.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![t1.id, t2.id]);
        for task in &details.tasks {
            assert_eq!(task.quest_id, None);
            assert_eq!(task.history_id, Some(history_id));
        }
        assert!(details.tasks[0].is_done);
    }

    #[test]
    fn test_archive_twice_is_noop() {
        let (mut store, id) = store_with_quest("q");
        assert!(store.archive_quest(id, ArchiveStatus::Abandoned).unwrap().is_some());
        assert!(store.archive_quest(id, ArchiveStatus::Abandoned).unwrap().is_none());
        assert_eq!(store.list_history().unwrap().len(), 1);
    }

    #[test]
    fn test_archive_leaves_other_quests() {
        let mut store = QuestStore::open_in_memory().unwrap();
        let a = store.create_quest("a", CompanionType::Dragon).unwrap();
        let b = store.create_quest("b", CompanionType::Tree).unwrap();
        let kept = store.add_task(b, "keep me").unwrap().unwrap();

        store.archive_quest(a, ArchiveStatus::Completed).unwrap();

        let remaining = store.load_quest(b).unwrap().unwrap();
        assert_eq!(remaining.tasks, vec![kept]);
    }

    #[test]
    fn test_toggle_archived_task_is_none() {
        let (mut store, id) = store_with_quest("q");
        let task = store.add_task(id, "t").unwrap().unwrap();
        store.archive_quest(id, ArchiveStatus::Completed).unwrap();

        assert!(store.toggle_task(task.id, true).unwrap().is_none());
        assert!(!store.get_task(task.id).unwrap().unwrap().is_done);
    }

    #[test]
    fn test_history_newest_first() {
        let mut store = QuestStore::open_in_memory().unwrap();
        let a = store.create_quest("old", CompanionType::Dragon).unwrap();
        let b = store.create_quest("new", CompanionType::Tree).unwrap();
        store.archive_quest(a, ArchiveStatus::Completed).unwrap();
        store.archive_quest(b, ArchiveStatus::Abandoned).unwrap();

        let names: Vec<_> = store.list_history().unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["new", "old"]);
        assert!(store.get_history_details(999).unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let (mut store, id) = store_with_quest("q");
        let task = store.add_task(id, "a").unwrap().unwrap();
        store.add_task(id, "b").unwrap();
        store.toggle_task(task.id, true).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.active_quests, 1);
        assert_eq!(stats.open_tasks, 1);
        assert_eq!(stats.done_tasks, 1);
        assert_eq!(stats.completed, 0);
        assert!(stats.to_string().contains("Active quests: 1"));
    }

    #[test]
    fn test_parse_legacy_timestamps() {
        assert!(parse_timestamp("2024-05-01T10:20:30.123456").is_ok());
        assert!(parse_timestamp("2024-05-01 10:20").is_ok());
        assert!(parse_timestamp("2024-05-01T10:20:30+00:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (mut store, id) = store_with_quest("survivor");
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.schema_version().unwrap(), schema::latest_version());
        assert!(store.load_quest(id).unwrap().is_some());
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quest_db.sqlite");

        let id = {
            let store = QuestStore::open(&path).unwrap();
            store.create_quest("persisted", CompanionType::Tree).unwrap()
        };

        let store = QuestStore::open(&path).unwrap();
        assert_eq!(store.load_quest(id).unwrap().unwrap().quest.name, "persisted");
    }

    #[test]
    fn test_unknown_companion_rows_still_list() {
        let (store, dragon) = store_with_quest("good");
        store
            .conn
            .execute_batch(
                r#"
                INSERT INTO active_quest (name, companion_type, xp, start_date)
                    VALUES ('odd', 'unicorn', 30, '2024-01-02 03:04');
                INSERT INTO active_quest (name, companion_type, xp, start_date)
                    VALUES ('blank', NULL, 0, NULL);
                "#,
            )
            .unwrap();

        let quests = store.list_active_quests().unwrap();
        assert_eq!(quests.len(), 3);
        assert_eq!(quests[0].id, dragon);
        assert_eq!(quests[0].companion_type, CompanionType::Dragon);
        assert_eq!(quests[1].companion_type, CompanionType::Tree);
        assert_eq!(quests[2].companion_type, CompanionType::Tree);

        let odd = store.get_quest(quests[1].id).unwrap().unwrap();
        assert_eq!(odd.xp, 30);
    }

    #[test]
    fn test_upgrades_database_without_history_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.sqlite");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE active_quest (id INTEGER PRIMARY KEY, name TEXT, companion_type TEXT, xp INTEGER, start_date TEXT);
                CREATE TABLE tasks (id INTEGER PRIMARY KEY, quest_id INTEGER, text TEXT, is_done INTEGER);
                INSERT INTO active_quest (name, companion_type, xp, start_date)
                    VALUES ('legacy', 'tree', 50, '2024-01-02T03:04:05.000006');
                INSERT INTO tasks (quest_id, text, is_done) VALUES (1, 'old task', 1);
                "#,
            )
            .unwrap();
        }

        let mut store = QuestStore::open(&path).unwrap();
        assert!(schema::column_exists(&store.conn, "tasks", "history_id").unwrap());

        let details = store.load_quest(1).unwrap().unwrap();
        assert_eq!(details.quest.xp, 50);
        assert_eq!(details.tasks.len(), 1);

        let history_id = store.archive_quest(1, ArchiveStatus::Completed).unwrap().unwrap();
        let archived = store.get_history_details(history_id).unwrap().unwrap();
        assert_eq!(archived.record.final_xp, 50);
        assert_eq!(archived.tasks[0].text, "old task");
    }
}
