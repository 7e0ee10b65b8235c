//! Quest types - active quests, their tasks, and archived history
//!
//! A task always belongs to exactly one owner:
//! - an active `Quest` (via `quest_id`), or
//! - a `HistoryRecord` once the quest has been archived (via `history_id`)

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type QuestId = i64;
pub type TaskId = i64;
pub type HistoryId = i64;

/// XP granted for finishing a task (and taken back when it is reopened).
pub const XP_PER_TASK: u32 = 25;

/// The creature or plant that grows alongside a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionType {
    Dragon,
    Tree,
}

impl CompanionType {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionType::Dragon => "dragon",
            CompanionType::Tree => "tree",
        }
    }

    /// Icon shown next to the quest in lists
    pub fn icon(&self) -> &'static str {
        match self {
            CompanionType::Dragon => "🐲",
            CompanionType::Tree => "🌳",
        }
    }

    pub fn all() -> &'static [CompanionType] {
        &[CompanionType::Dragon, CompanionType::Tree]
    }

    /// Read a stored value leniently: anything but `dragon` is a tree
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::parse) {
            Some(Ok(companion)) => companion,
            _ => CompanionType::Tree,
        }
    }
}

impl FromStr for CompanionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dragon" => Ok(CompanionType::Dragon),
            "tree" => Ok(CompanionType::Tree),
            _ => Err(Error::UnknownCompanion(s.to_string())),
        }
    }
}

impl std::fmt::Display for CompanionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a quest left the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    Completed,
    Abandoned,
}

impl ArchiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveStatus::Completed => "completed",
            ArchiveStatus::Abandoned => "abandoned",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ArchiveStatus::Completed => "🏆",
            ArchiveStatus::Abandoned => "💀",
        }
    }
}

impl FromStr for ArchiveStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "complete" | "done" => Ok(ArchiveStatus::Completed),
            "abandoned" | "abandon" | "given-up" => Ok(ArchiveStatus::Abandoned),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ArchiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An active quest row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub name: String,
    pub companion_type: CompanionType,
    pub xp: u32,
    pub start_date: DateTime<Utc>,
}

/// The columns shown in the quest list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestSummary {
    pub id: QuestId,
    pub name: String,
    pub companion_type: CompanionType,
    pub xp: u32,
}

/// A quest together with every task attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDetails {
    #[serde(flatten)]
    pub quest: Quest,
    pub tasks: Vec<Task>,
}

impl QuestDetails {
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_done).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub quest_id: Option<QuestId>,
    pub history_id: Option<HistoryId>,
    pub text: String,
    pub is_done: bool,
}

impl Task {
    pub fn checkbox(&self) -> &'static str {
        if self.is_done { "☑" } else { "☐" }
    }
}

/// Immutable snapshot of a quest taken when it was archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub name: String,
    pub companion_type: CompanionType,
    pub final_xp: u32,
    pub status: ArchiveStatus,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDetails {
    #[serde(flatten)]
    pub record: HistoryRecord,
    pub tasks: Vec<Task>,
}

/// Outcome of flipping a task's done flag together with its quest's XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskToggle {
    pub task_id: TaskId,
    pub quest_id: QuestId,
    pub is_done: bool,
    pub xp: u32,
}

/// XP after a task is marked done (`+25`) or reopened (`-25`, floored at 0).
pub fn xp_after_toggle(xp: u32, done: bool) -> u32 {
    if done {
        xp.saturating_add(XP_PER_TASK)
    } else {
        xp.saturating_sub(XP_PER_TASK)
    }
}
