//! Staged-deletion undo buffer
//!
//! Removed tasks are not discarded immediately: the most recent
//! deletion batch (single or bulk) is staged here with each task's
//! original position, and can be restored until the window expires or
//! a newer deletion replaces it.

use crate::task::Task;

/// How long a staged deletion can be undone, in milliseconds.
pub const UNDO_WINDOW_MS: u32 = 5_000;

/// One removed task and the position it held before removal.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub task: Task,
    pub index: usize,
}

/// The most recent deletion batch. At most one is live at a time.
#[derive(Debug, Clone)]
pub struct UndoBatch {
    pub entries: Vec<UndoEntry>,
    /// Monotonic batch number. The expiry timer records the generation
    /// it was armed for, so a stale callback cannot clear a newer batch.
    pub generation: u64,
}

impl UndoBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reinsert every staged entry at its recorded position. Entries go
    /// back in ascending index order so earlier insertions don't shift
    /// later targets; indices past the end clamp to the end.
    pub fn restore_into(mut self, tasks: &mut Vec<Task>) {
        self.entries.sort_by_key(|e| e.index);
        for entry in self.entries {
            let index = entry.index.min(tasks.len());
            tasks.insert(index, entry.task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn task(name: &str) -> Task {
        Task::new(name, Priority::Medium, None)
    }

    #[test]
    fn test_restore_single_entry_at_original_index() {
        let mut tasks = vec![task("aa"), task("cc")];
        let batch = UndoBatch {
            entries: vec![UndoEntry { task: task("bb"), index: 1 }],
            generation: 1,
        };
        batch.restore_into(&mut tasks);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].name, "bb");
    }

    #[test]
    fn test_restore_multiple_entries_ascending() {
        // Entries staged out of order must still land at their
        // pre-removal positions.
        let mut tasks = vec![task("bb"), task("dd")];
        let batch = UndoBatch {
            entries: vec![
                UndoEntry { task: task("cc"), index: 2 },
                UndoEntry { task: task("aa"), index: 0 },
            ],
            generation: 1,
        };
        batch.restore_into(&mut tasks);
        let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["aa", "bb", "cc", "dd"]);
    }

    #[test]
    fn test_restore_clamps_out_of_range_index() {
        let mut tasks = vec![task("aa")];
        let batch = UndoBatch {
            entries: vec![UndoEntry { task: task("zz"), index: 9 }],
            generation: 1,
        };
        batch.restore_into(&mut tasks);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].name, "zz");
    }
}
