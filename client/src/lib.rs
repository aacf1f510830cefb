// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Client-side state for TaskSync.
//!
//! [`TaskListController`] keeps a local copy of the task collection, derives
//! the filtered and sorted list shown to the user, and pushes changes to the
//! backend through a [`TaskStore`]. Whatever draws the list implements
//! [`TaskView`].
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod store;
pub mod view;

pub use config::ClientConfig;
pub use controller::TaskListController;
pub use debounce::SearchDebouncer;
pub use error::TaskError;
pub use store::{HttpTaskStore, TaskStore};
pub use view::{LogView, Notice, NoticeKind, TaskView};
