// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tasksync_common::CriteriaUpdate;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use crate::controller::TaskListController;
use crate::store::TaskStore;
use crate::view::TaskView;

/// Holds search-box input back until typing pauses.
///
/// Each [`input`](Self::input) cancels the update still waiting and schedules
/// a new one, so only the last text typed within `delay` reaches the
/// controller. Must be used from within a tokio runtime.
pub struct SearchDebouncer<S, V> {
    controller: Arc<TaskListController<S, V>>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S, V> SearchDebouncer<S, V>
where
    S: TaskStore + 'static,
    V: TaskView + 'static,
{
    pub fn new(controller: Arc<TaskListController<S, V>>, delay: Duration) -> Self {
        Self {
            controller,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let controller = Arc::clone(&self.controller);
        let delay = self.delay;

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            debug!("Applying search text {:?}", text);
            controller.set_filter_criteria(CriteriaUpdate::search(text));
        }));
    }

    /// Drops the update still waiting, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

impl<S, V> Drop for SearchDebouncer<S, V> {
    fn drop(&mut self) {
        if let Some(previous) = self.pending.get_mut().take() {
            previous.abort();
        }
    }
}
