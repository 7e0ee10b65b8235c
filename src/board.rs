//! Quest board - application state for the quest log
//!
//! Owns the store and the quest currently open on the dashboard. Every
//! handler validates its input, calls the store, and keeps the open quest
//! in step with what was written.

use crate::companion::{Stage, resolve_stage};
use crate::quest::{
    ArchiveStatus, CompanionType, HistoryDetails, HistoryId, HistoryRecord, QuestDetails, QuestId,
    QuestSummary, Task, TaskId, TaskToggle,
};
use crate::storage::QuestStore;
use crate::{Error, Result};

pub struct QuestBoard {
    store: QuestStore,
    selected: Option<QuestDetails>,
}

impl QuestBoard {
    pub fn new(store: QuestStore) -> Self {
        Self { store, selected: None }
    }

    pub fn store(&self) -> &QuestStore {
        &self.store
    }

    /// The quest open on the dashboard, if any
    pub fn selected(&self) -> Option<&QuestDetails> {
        self.selected.as_ref()
    }

    pub fn quests(&self) -> Result<Vec<QuestSummary>> {
        self.store.list_active_quests()
    }

    pub fn history(&self) -> Result<Vec<HistoryRecord>> {
        self.store.list_history()
    }

    pub fn history_details(&self, history_id: HistoryId) -> Result<Option<HistoryDetails>> {
        self.store.get_history_details(history_id)
    }

    /// Create a quest from user input and open it
    pub fn start_adventure(&mut self, name: &str, companion: CompanionType) -> Result<QuestId> {
        let name = required(name, "quest name")?;
        let id = self.store.create_quest(name, companion)?;
        self.selected = self.store.load_quest(id)?;
        Ok(id)
    }

    /// Open an active quest. Returns false (and keeps the current one) if it is gone.
    pub fn open_quest(&mut self, quest_id: QuestId) -> Result<bool> {
        match self.store.load_quest(quest_id)? {
            Some(details) => {
                self.selected = Some(details);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn close_quest(&mut self) {
        self.selected = None;
    }

    /// Add a task to the open quest
    pub fn add_task(&mut self, text: &str) -> Result<Task> {
        let text = required(text, "task text")?;
        let quest_id = self.selected_id()?;

        let Some(task) = self.store.add_task(quest_id, text)? else {
            // Archived elsewhere since it was opened
            self.selected = None;
            return Err(Error::NoQuestSelected);
        };

        if let Some(details) = self.selected.as_mut() {
            details.tasks.push(task.clone());
        }
        Ok(task)
    }

    /// Mark a task of the open quest done or not done
    pub fn toggle_task(&mut self, task_id: TaskId, done: bool) -> Result<Option<TaskToggle>> {
        self.selected_id()?;
        let owned = self
            .selected
            .as_ref()
            .is_some_and(|details| details.task(task_id).is_some());
        if !owned {
            return Ok(None);
        }

        let Some(toggle) = self.store.toggle_task(task_id, done)? else {
            return Ok(None);
        };

        if let Some(details) = self.selected.as_mut() {
            details.quest.xp = toggle.xp;
            if let Some(task) = details.tasks.iter_mut().find(|t| t.id == task_id) {
                task.is_done = toggle.is_done;
            }
        }
        Ok(Some(toggle))
    }

    pub fn complete_quest(&mut self) -> Result<Option<HistoryId>> {
        self.archive_selected(ArchiveStatus::Completed)
    }

    pub fn give_up_quest(&mut self) -> Result<Option<HistoryId>> {
        self.archive_selected(ArchiveStatus::Abandoned)
    }

    /// Companion stage of the open quest
    pub fn companion(&self) -> Option<Stage> {
        self.selected
            .as_ref()
            .map(|details| resolve_stage(details.quest.companion_type, details.quest.xp))
    }

    fn archive_selected(&mut self, status: ArchiveStatus) -> Result<Option<HistoryId>> {
        let quest_id = self.selected_id()?;
        let history_id = self.store.archive_quest(quest_id, status)?;
        self.selected = None;
        Ok(history_id)
    }

    fn selected_id(&self) -> Result<QuestId> {
        self.selected
            .as_ref()
            .map(|details| details.quest.id)
            .ok_or(Error::NoQuestSelected)
    }
}

/// Trim user input and reject it when nothing is left
fn required<'a>(input: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", what)));
    }
    Ok(trimmed)
}
