// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use tasksync_common::{
    build_view, CriteriaUpdate, FilterCriteria, Task, TaskDraft, TaskId, TaskStats,
};
use tracing::{debug, error, info, warn};

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::view::{Notice, TaskView};

pub const MSG_CREATED: &str = "Task created successfully!";
pub const MSG_UPDATED: &str = "Task updated successfully!";
pub const MSG_DELETED: &str = "Task deleted successfully!";
pub const MSG_FILTERS_CLEARED: &str = "Filters cleared";
pub const MSG_TITLE_REQUIRED: &str = "Please enter a task title";
pub const MSG_NOT_FOUND: &str = "Task not found";
pub const MSG_LOAD_FAILED: &str = "Failed to load tasks. Please ensure your backend is running.";
pub const MSG_CREATE_FAILED: &str = "Failed to create task. Please try again.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update task. Please try again.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete task. Please try again.";

#[derive(Debug, Default)]
struct ControllerState {
    tasks: Vec<Task>,
    criteria: FilterCriteria,
    filtered: Vec<Task>,
    next_toggle_token: u64,
    // Token of the newest toggle still waiting on the backend, per task.
    pending_toggles: HashMap<TaskId, u64>,
}

impl ControllerState {
    fn recompute(&mut self) -> (Vec<Task>, TaskStats) {
        self.filtered = build_view(&self.tasks, &self.criteria);
        (self.filtered.clone(), TaskStats::from_tasks(&self.tasks))
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

/// Forgets a toggle's pending token when the toggle ends, including when its
/// future is dropped before the backend answers.
struct PendingToggle<'a> {
    state: &'a Mutex<ControllerState>,
    id: TaskId,
    token: u64,
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.pending_toggles.get(&self.id) == Some(&self.token) {
            state.pending_toggles.remove(&self.id);
        }
    }
}

/// Keeps one task per id. A later record replaces the earlier one in place.
fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut slots: HashMap<TaskId, usize> = HashMap::with_capacity(tasks.len());
    let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
    for task in tasks {
        match slots.get(&task.id) {
            Some(&slot) => unique[slot] = task,
            None => {
                slots.insert(task.id, unique.len());
                unique.push(task);
            }
        }
    }
    unique
}

/// Owns the local task collection and the criteria it is shown with, and
/// keeps the view in step with both.
///
/// The backend stays the source of truth: every successful write is followed
/// by a full [`load`](Self::load). The only local write ahead of the backend
/// is the optimistic flip in [`toggle_completion`](Self::toggle_completion).
///
/// Operations take `&self` so one controller can be shared behind an `Arc`.
/// The state lock is never held across an `.await` or a call into the view.
pub struct TaskListController<S, V> {
    store: S,
    view: V,
    state: Mutex<ControllerState>,
}

impl<S: TaskStore, V: TaskView> TaskListController<S, V> {
    pub fn new(store: S, view: V) -> Self {
        Self {
            store,
            view,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Every task in the local collection, in backend order.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// The filtered, sorted list last handed to the view.
    pub fn filtered_view(&self) -> Vec<Task> {
        self.state.lock().filtered.clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.lock().criteria.clone()
    }

    /// Counters over the whole collection, whatever the criteria.
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.state.lock().tasks)
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state.lock().tasks.iter().find(|task| task.id == id).cloned()
    }

    /// The question to ask before deleting `id`, or `None` if it is unknown.
    pub fn confirmation_message(&self, id: TaskId) -> Option<String> {
        self.task(id).map(|task| {
            format!(
                "Are you sure you want to delete \"{}\"?\n\nThis action cannot be undone.",
                task.title
            )
        })
    }

    /// Replaces the local collection with the backend's.
    ///
    /// Records without an id are dropped and a repeated id keeps its last
    /// record; every other missing field takes its default. On failure the
    /// collection is left as it was.
    pub async fn load(&self) -> Result<(), TaskError> {
        let records = match self.store.list().await {
            Ok(records) => records,
            Err(e) => {
                error!("Error fetching tasks: {:?}", e);
                self.view.notify(Notice::error(MSG_LOAD_FAILED));
                return Err(TaskError::FetchFailed(e));
            }
        };

        let now = Utc::now();
        let received = records.len();
        let tasks: Vec<Task> = records
            .into_iter()
            .filter_map(|record| record.normalize(now))
            .collect();
        if tasks.len() < received {
            warn!("Dropped {} task records without an id.", received - tasks.len());
        }
        let with_id = tasks.len();
        let tasks = dedupe_by_id(tasks);
        if tasks.len() < with_id {
            warn!("Dropped {} task records with a repeated id.", with_id - tasks.len());
        }
        info!("Loaded {} tasks.", tasks.len());

        self.apply(|state| state.tasks = tasks);
        Ok(())
    }

    /// Sends a new task to the backend. New tasks always start pending.
    pub async fn create(&self, draft: TaskDraft) -> Result<(), TaskError> {
        if !draft.has_title() {
            return Err(self.reject_untitled());
        }
        let draft = TaskDraft {
            completed: false,
            ..tidy(draft)
        };

        match self.store.create(&draft).await {
            Ok(record) => {
                info!("Task created with ID: {:?}", record.id);
                self.view.notify(Notice::success(MSG_CREATED));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                error!("Error creating task: {:?}", e);
                self.view.notify(Notice::error(MSG_CREATE_FAILED));
                Err(TaskError::Persistence(e))
            }
        }
    }

    /// Replaces the editable fields of `id` with those of `draft`.
    /// Completion is not editable here and keeps its current value.
    pub async fn update(&self, id: TaskId, draft: TaskDraft) -> Result<(), TaskError> {
        let existing = self.require(id)?;
        if !draft.has_title() {
            return Err(self.reject_untitled());
        }
        let draft = TaskDraft {
            completed: existing.completed,
            ..tidy(draft)
        };

        self.persist_update(id, &draft).await
    }

    /// Marks `id` completed or not, showing the change before the backend
    /// confirms it.
    ///
    /// If the backend rejects the change the flag is set back to
    /// `!completed`, but only while this is the newest toggle of that task:
    /// a rollback overtaken by a later toggle is discarded.
    pub async fn toggle_completion(&self, id: TaskId, completed: bool) -> Result<(), TaskError> {
        let flipped = {
            let mut state = self.state.lock();
            let draft = state.find_mut(id).map(|task| {
                task.completed = completed;
                TaskDraft::from(&*task)
            });
            draft.map(|draft| {
                state.next_toggle_token += 1;
                let token = state.next_toggle_token;
                state.pending_toggles.insert(id, token);
                (token, draft, state.recompute())
            })
        };
        let Some((token, draft, (view, stats))) = flipped else {
            return Err(self.reject_unknown(id));
        };
        let _pending = PendingToggle {
            state: &self.state,
            id,
            token,
        };
        debug!("Toggle {} of task {} to completed={}", token, id, completed);
        self.view.render(&view, stats);

        let result = self.persist_update(id, &draft).await;
        self.settle_toggle(id, token, completed, result.is_ok());
        result
    }

    pub async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        let task = self.require(id)?;

        match self.store.delete(id).await {
            Ok(()) => {
                info!("Task {} ({:?}) deleted.", id, task.title);
                self.view.notify(Notice::success(MSG_DELETED));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                error!("Error deleting task {}: {:?}", id, e);
                self.view.notify(Notice::error(MSG_DELETE_FAILED));
                Err(TaskError::Persistence(e))
            }
        }
    }

    /// Merges `update` into the current criteria and redraws.
    pub fn set_filter_criteria(&self, update: CriteriaUpdate) {
        self.apply(|state| state.criteria.apply(update));
    }

    pub fn clear_filters(&self) {
        self.apply(|state| state.criteria = FilterCriteria::default());
        self.view.notify(Notice::info(MSG_FILTERS_CLEARED));
    }

    /// Runs `change` on the state, recomputes the filtered list and renders it.
    fn apply(&self, change: impl FnOnce(&mut ControllerState)) {
        let (view, stats) = {
            let mut state = self.state.lock();
            change(&mut state);
            state.recompute()
        };
        self.view.render(&view, stats);
    }

    async fn persist_update(&self, id: TaskId, draft: &TaskDraft) -> Result<(), TaskError> {
        match self.store.update(id, draft).await {
            Ok(_) => {
                info!("Task {} updated.", id);
                self.view.notify(Notice::success(MSG_UPDATED));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                error!("Error updating task {}: {:?}", id, e);
                self.view.notify(Notice::error(MSG_UPDATE_FAILED));
                Err(TaskError::Persistence(e))
            }
        }
    }

    fn settle_toggle(&self, id: TaskId, token: u64, completed: bool, persisted: bool) {
        let reverted = {
            let mut state = self.state.lock();
            if state.pending_toggles.get(&id) != Some(&token) {
                if !persisted {
                    debug!("Discarding stale rollback {} of task {}", token, id);
                }
                return;
            }
            state.pending_toggles.remove(&id);
            if persisted {
                return;
            }
            match state.find_mut(id) {
                Some(task) => task.completed = !completed,
                // Gone since the toggle started; nothing to restore.
                None => return,
            }
            state.recompute()
        };
        warn!("Rolled back completion of task {} to {}", id, !completed);
        self.view.render(&reverted.0, reverted.1);
    }

    /// A failed reload has already been reported by `load`.
    async fn reload(&self) {
        if let Err(e) = self.load().await {
            debug!("Reload after write failed: {}", e);
        }
    }

    fn require(&self, id: TaskId) -> Result<Task, TaskError> {
        self.task(id).ok_or_else(|| self.reject_unknown(id))
    }

    fn reject_unknown(&self, id: TaskId) -> TaskError {
        warn!("Task {} is not in the local collection.", id);
        self.view.notify(Notice::error(MSG_NOT_FOUND));
        TaskError::NotFound(id)
    }

    fn reject_untitled(&self) -> TaskError {
        self.view.notify(Notice::error(MSG_TITLE_REQUIRED));
        TaskError::Validation
    }
}

/// Trims the free-text fields the way the input forms do.
fn tidy(draft: TaskDraft) -> TaskDraft {
    TaskDraft {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category: draft.category.trim().to_string(),
        ..draft
    }
}
