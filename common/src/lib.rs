// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Data model shared by the TaskSync server and client.
//!
//! - [`task`]: the `Task` entity and the `TaskDraft` sent to create or replace one.
//! - [`record`]: the loosely typed shape tasks arrive in, and its normalization.
//! - [`filter`]: filter criteria, display ordering and list statistics.
pub mod filter;
pub mod record;
pub mod task;

pub use filter::{
    build_view, compare_for_display, CriteriaUpdate, FilterCriteria, PriorityFilter,
    StatusFilter, TaskStats,
};
pub use record::{TaskRecord, UNTITLED_TASK};
pub use task::{Priority, Task, TaskDraft, TaskId};
