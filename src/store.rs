//! The task store
//!
//! Owns the ordered task list, applies every mutation, stages deletions
//! for undo, and mirrors the list to persistent storage after each
//! change. All state that survives a page reload lives here.

use chrono::{DateTime, Utc};

use crate::storage::{StorageBackend, TASKS_KEY};
use crate::task::{Priority, Task, default_tasks};
use crate::undo::{UndoBatch, UndoEntry};
use crate::validate::{NameLengthError, validate_name};

/// Partial field update for [`TaskStore::update`].
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the deadline; `None` leaves it untouched.
    pub deadline: Option<Option<DateTime<Utc>>>,
}

pub struct TaskStore<S: StorageBackend> {
    tasks: Vec<Task>,
    undo: Option<UndoBatch>,
    next_generation: u64,
    /// Set by `load`. Persistence is skipped until then, so startup
    /// cannot clobber saved state with empty defaults.
    initialized: bool,
    storage: S,
}

impl<S: StorageBackend> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            tasks: Vec::new(),
            undo: None,
            next_generation: 0,
            initialized: false,
            storage,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn uncompleted_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_done).count()
    }

    pub fn undo_batch(&self) -> Option<&UndoBatch> {
        self.undo.as_ref()
    }

    /// Display ordering, recomputed on every call and never persisted:
    /// incomplete before complete, then by priority, then by deadline
    /// with undated tasks after all dated ones.
    pub fn sorted(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|t| (t.is_done, t.priority, t.deadline.is_none(), t.deadline));
        tasks
    }

    /// Read the persisted list. Absent, malformed or non-array values
    /// all yield the default seed set; nothing here surfaces to the
    /// user. Marks initialization complete in every path.
    pub fn load(&mut self) {
        match self.storage.get(TASKS_KEY) {
            None => {
                log::info!("No saved tasks, seeding defaults");
                self.tasks = default_tasks();
            }
            Some(json) => match serde_json::from_str::<Vec<Task>>(&json) {
                Ok(tasks) => {
                    log::info!("Loaded {} tasks", tasks.len());
                    self.tasks = tasks;
                }
                Err(err) => {
                    log::error!("Stored task list is corrupted, seeding defaults: {err}");
                    self.tasks = default_tasks();
                }
            },
        }
        self.initialized = true;
        self.persist();
    }

    /// Mirror the current list to storage. Write failures are logged,
    /// never fatal; the in-memory state stays authoritative.
    fn persist(&mut self) {
        if !self.initialized {
            return;
        }
        match serde_json::to_string(&self.tasks) {
            Ok(json) => {
                if let Err(err) = self.storage.set(TASKS_KEY, &json) {
                    log::error!("Failed to persist {} tasks: {err}", self.tasks.len());
                }
            }
            Err(err) => log::error!("Failed to serialize tasks: {err}"),
        }
    }

    /// Append a new task. Rejects invalid names without touching the
    /// list; the error's `Display` is the user-visible message.
    pub fn add(
        &mut self,
        name: &str,
        priority: Priority,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<(), NameLengthError> {
        validate_name(name)?;
        self.tasks.push(Task::new(name, priority, deadline));
        self.persist();
        Ok(())
    }

    /// Set the completion flag. Unknown ids are a silent no-op.
    pub fn set_completion(&mut self, id: &str, value: bool) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.is_done = value;
            self.persist();
        }
    }

    /// Apply a partial update. A patched name is validated before any
    /// field changes; unknown ids are a silent no-op.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<(), NameLengthError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = deadline;
        }
        self.persist();
        Ok(())
    }

    /// Remove one task and stage it as a single-entry undo batch.
    /// Unknown ids are a silent no-op.
    pub fn remove_one(&mut self, id: &str) {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };
        let task = self.tasks.remove(index);
        self.stage_undo(vec![UndoEntry { task, index }]);
        self.persist();
    }

    /// Remove every completed task as one batch, recording each one's
    /// pre-removal index. An empty batch stages nothing.
    pub fn remove_completed(&mut self) {
        let removed: Vec<UndoEntry> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_done)
            .map(|(index, t)| UndoEntry { task: t.clone(), index })
            .collect();
        if removed.is_empty() {
            return;
        }
        self.tasks.retain(|t| !t.is_done);
        self.stage_undo(removed);
        self.persist();
    }

    /// Stage a batch, superseding any pending one without restoring it.
    fn stage_undo(&mut self, entries: Vec<UndoEntry>) {
        self.next_generation += 1;
        self.undo = Some(UndoBatch {
            entries,
            generation: self.next_generation,
        });
    }

    /// Restore the live batch at its recorded positions and clear it.
    /// No-op without a live batch.
    pub fn undo(&mut self) {
        let Some(batch) = self.undo.take() else {
            return;
        };
        log::info!("Restoring {} deleted tasks", batch.len());
        batch.restore_into(&mut self.tasks);
        self.persist();
    }

    /// Drop the live batch without restoring.
    pub fn dismiss_undo(&mut self) {
        self.undo = None;
    }

    /// Generation of the live batch, if any. The expiry timer records
    /// this when armed and hands it back to [`TaskStore::expire_undo`].
    pub fn undo_generation(&self) -> Option<u64> {
        self.undo.as_ref().map(|b| b.generation)
    }

    /// Clear the live batch only if it is still the one the caller was
    /// armed for. A stale timer firing after a newer deletion must not
    /// clear that newer batch.
    pub fn expire_undo(&mut self, generation: u64) {
        if self.undo.as_ref().is_some_and(|b| b.generation == generation) {
            log::debug!("Undo window expired (generation {generation})");
            self.undo = None;
        }
    }
}
