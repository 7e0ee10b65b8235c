//! # Focus Quest
//!
//! A gamified quest log with a growing companion, plus two small focus
//! tools that share the crate.
//!
//! Focus Quest provides:
//! - SQLite-backed quests, tasks and an immutable history of finished quests
//! - Companion stages derived from quest XP
//! - An application-state board that validates input and tracks the open quest
//! - A safe arithmetic evaluator with a keypad-style display buffer
//! - A pomodoro-style countdown timer

pub mod board;
pub mod calc;
pub mod companion;
pub mod config;
pub mod quest;
pub mod storage;
pub mod timer;
pub mod ui;

// Re-exports for convenient access
pub use board::QuestBoard;
pub use calc::{CalcError, Key, Keypad};
pub use companion::{NextThreshold, Stage, resolve_stage};
pub use quest::{ArchiveStatus, CompanionType, HistoryRecord, Quest, QuestSummary, Task};
pub use storage::QuestStore;
pub use timer::{FocusTimer, TimerMode};

/// Result type alias for Focus Quest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Focus Quest operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No quest is selected")]
    NoQuestSelected,

    #[error("Unknown companion type: {0}")]
    UnknownCompanion(String),

    #[error("Unknown quest status: {0}")]
    UnknownStatus(String),

    #[error("Unknown keypad key: {0}")]
    UnknownKey(String),

    #[error("Unknown timer mode: {0}")]
    UnknownMode(String),

    #[error("Calculation error: {0}")]
    Calc(#[from] CalcError),
}
