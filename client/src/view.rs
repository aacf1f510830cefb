// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use tasksync_common::{Task, TaskStats};
use tracing::{error, info};

/// Category of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        })
    }
}

/// A short message for the user, shown as a toast by graphical front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// The presentation side of the controller.
///
/// `render` is called after every change to the collection or the criteria,
/// with the filtered, sorted list and counters over the whole collection.
pub trait TaskView: Send + Sync {
    fn render(&self, tasks: &[Task], stats: TaskStats);

    fn notify(&self, notice: Notice);
}

/// A [`TaskView`] that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogView;

impl TaskView for LogView {
    fn render(&self, tasks: &[Task], stats: TaskStats) {
        info!(
            "Showing {} tasks (total={}, completed={}, pending={})",
            tasks.len(),
            stats.total,
            stats.completed,
            stats.pending
        );
        for task in tasks {
            info!(
                "[{}] #{} {} ({}{})",
                if task.completed { "x" } else { " " },
                task.id,
                task.title,
                task.priority,
                task.due_date
                    .map(|due| format!(", due {due}"))
                    .unwrap_or_default()
            );
        }
    }

    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => error!("{}", notice.message),
            kind => info!("{}: {}", kind, notice.message),
        }
    }
}
