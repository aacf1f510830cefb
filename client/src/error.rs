// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use tasksync_common::TaskId;
use thiserror::Error;

/// Why a controller operation did not go through.
///
/// None of these are fatal: the view is told, local state is left usable and
/// the user may simply try again.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The draft has no title once whitespace is trimmed. Nothing was sent.
    #[error("task title must not be empty")]
    Validation,

    /// The id is not in the local collection, which may be stale.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Loading the collection failed.
    #[error("failed to load tasks: {0:#}")]
    FetchFailed(anyhow::Error),

    /// Creating, updating or deleting failed on the backend.
    #[error("failed to save changes: {0:#}")]
    Persistence(anyhow::Error),
}
