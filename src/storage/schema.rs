//! Database schema definitions and forward-only migrations

use rusqlite::{Connection, OptionalExtension, params};
use crate::Result;

/// SQL to create the schema version ledger
pub const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)
"#;

/// SQL to create the active quest table
pub const CREATE_ACTIVE_QUEST_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS active_quest (
    id INTEGER PRIMARY KEY,
    name TEXT,
    companion_type TEXT,
    xp INTEGER,
    start_date TEXT
)
"#;

/// SQL to create the tasks table
/// A task points at either an active quest or a history record
pub const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    quest_id INTEGER,
    history_id INTEGER,
    text TEXT,
    is_done INTEGER
)
"#;

/// SQL to create the history table
pub const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY,
    name TEXT,
    companion_type TEXT,
    final_xp INTEGER,
    status TEXT,
    end_date TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_tasks_quest ON tasks(quest_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_history ON tasks(history_id)",
];

/// A single schema step. Steps are applied in order, once each.
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub apply: fn(&Connection) -> Result<()>,
}

/// Every migration, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create quest, task and history tables",
        apply: create_tables,
    },
    Migration {
        version: 2,
        description: "link tasks to history records",
        apply: add_task_history_link,
    },
    Migration {
        version: 3,
        description: "index task owners",
        apply: create_indexes,
    },
];

/// Latest schema version known to this build
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Bring the schema up to date. Safe to call on every startup.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_SCHEMA_VERSION_TABLE, [])?;

    for migration in MIGRATIONS {
        let tx = conn.transaction()?;
        if is_applied(&tx, migration.version)? {
            continue;
        }

        tracing::info!(
            version = migration.version,
            "Applying migration: {}",
            migration.description
        );
        (migration.apply)(&tx)?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![migration.version, chrono::Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Highest applied schema version (0 for an empty database)
pub fn current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

fn is_applied(conn: &Connection, version: u32) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM schema_version WHERE version = ?1",
            [version],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn create_tables(conn: &Connection) -> Result<()> {
    for stmt in [CREATE_ACTIVE_QUEST_TABLE, CREATE_TASKS_TABLE, CREATE_HISTORY_TABLE] {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

// Databases from the first releases have a tasks table without history_id.
fn add_task_history_link(conn: &Connection) -> Result<()> {
    if !column_exists(conn, "tasks", "history_id")? {
        conn.execute("ALTER TABLE tasks ADD COLUMN history_id INTEGER", [])?;
    }
    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    for stmt in CREATE_INDEXES {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|name| name == column))
}
