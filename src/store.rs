//! In-memory task list with a selection snapshot.
//!
//! Refreshes arrive as full-list responses tagged with a sequence
//! number. The store merges them by task id instead of replacing the
//! list wholesale, so a late or reordered response can never resurrect
//! an earlier lifecycle state.

use tracing::debug;

use crate::api::model::Task;

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected: Option<Task>,
    last_seq: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Merge a full-list response into the store. Returns `false` when
    /// the batch was discarded as stale.
    ///
    /// Incoming entries update or insert by id and entries absent from
    /// the response are dropped, with one guard: a task already in a
    /// terminal status keeps its local snapshot when the response still
    /// carries a non-terminal one for the same id. The merged list is
    /// ordered newest first, with the id as secondary key so equal
    /// timestamps stay deterministic.
    pub fn apply_refresh(&mut self, seq: u64, batch: Vec<Task>) -> bool {
        if seq <= self.last_seq {
            debug!(seq, newest = self.last_seq, "discarding stale task batch");
            return false;
        }

        let mut merged = Vec::with_capacity(batch.len());
        for incoming in batch {
            let kept = self
                .tasks
                .iter()
                .find(|existing| existing.id == incoming.id)
                .filter(|existing| existing.is_terminal() && !incoming.is_terminal())
                .cloned();
            merged.push(kept.unwrap_or(incoming));
        }
        merged.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        self.tasks = merged;
        self.last_seq = seq;
        true
    }

    /// Track `task` as the one currently being inspected. Selecting
    /// never fetches anything by itself.
    pub fn select(&mut self, task: Task) {
        self.selected = Some(task);
    }

    /// Select by id from the current list. Returns `false` when the id
    /// is unknown, leaving any previous selection in place.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.get(id).cloned() {
            Some(task) => {
                self.selected = Some(task);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    /// Refresh the selection snapshot from the merged list. A task that
    /// no longer appears there clears the selection.
    pub fn reselect(&mut self) {
        if let Some(current) = self.selected.take() {
            self.selected = self.get(&current.id).cloned();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
