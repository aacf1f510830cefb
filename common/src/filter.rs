// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// Which completion states are shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => completed,
            StatusFilter::Pending => !completed,
        }
    }
}

/// Which priority is shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => priority == Priority::Low,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::High => priority == Priority::High,
        }
    }
}

impl From<Priority> for PriorityFilter {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => PriorityFilter::Low,
            Priority::Medium => PriorityFilter::Medium,
            Priority::High => PriorityFilter::High,
        }
    }
}

/// Error returned when a filter value is not one of the known names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter value: {:?}", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse::<Priority>()
            .map(PriorityFilter::from)
            .map_err(|_| UnknownFilter(s.to_string()))
    }
}

/// The search/status/priority criteria the list is currently shown with.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_text: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl FilterCriteria {
    /// Merges the fields present in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: CriteriaUpdate) {
        if let Some(search_text) = update.search_text {
            self.search_text = search_text;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
    }

    /// A task passes when the search term (trimmed, case-insensitive) is empty
    /// or found in its title, description or category, and both the status
    /// and priority filters accept it.
    pub fn matches(&self, task: &Task) -> bool {
        let term = self.search_text.trim().to_lowercase();
        let matches_search = term.is_empty()
            || task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term)
            || task.category.to_lowercase().contains(&term);

        matches_search && self.status.matches(task.completed) && self.priority.matches(task.priority)
    }
}

/// A partial change to [`FilterCriteria`]; `None` keeps the current value.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CriteriaUpdate {
    pub search_text: Option<String>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
}

impl CriteriaUpdate {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn status(status: StatusFilter) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn priority(priority: PriorityFilter) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }
}

/// Display order: incomplete before completed, then higher priority first,
/// then earlier due date first with undated tasks after dated ones.
pub fn compare_for_display(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Filters `tasks` by `criteria` and sorts the survivors for display.
pub fn build_view(tasks: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| criteria.matches(task))
        .cloned()
        .collect();
    view.sort_by(compare_for_display);
    view
}

/// Counters shown above the list. Always taken over the whole collection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use chrono::{DateTime, NaiveDate, Utc};

    fn task(id: TaskId, completed: bool, priority: Priority, due: Option<(i32, u32, u32)>) -> Task {
        let created: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
        Task {
            id,
            title: format!("Task {id}"),
            description: String::new(),
            completed,
            priority,
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            category: String::new(),
            created_at: created,
            updated_at: created,
        }
    }

    fn ids(view: &[Task]) -> Vec<TaskId> {
        view.iter().map(|task| task.id).collect()
    }

    fn scenario() -> Vec<Task> {
        vec![
            task(1, false, Priority::Low, None),
            task(2, false, Priority::High, None),
            task(3, true, Priority::High, None),
        ]
    }

    #[test]
    fn test_default_criteria_orders_by_status_then_priority() {
        let view = build_view(&scenario(), &FilterCriteria::default());
        assert_eq!(ids(&view), vec![2, 1, 3]);
    }

    #[test]
    fn test_completed_filter_keeps_stats_on_full_collection() {
        let tasks = scenario();
        let criteria = FilterCriteria {
            status: StatusFilter::Completed,
            ..FilterCriteria::default()
        };

        let view = build_view(&tasks, &criteria);
        let stats = TaskStats::from_tasks(&tasks);

        assert_eq!(ids(&view), vec![3]);
        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                completed: 1,
                pending: 2
            }
        );
    }

    #[test]
    fn test_due_date_tier_puts_dated_first_and_earliest_first() {
        let tasks = vec![
            task(1, false, Priority::Medium, None),
            task(2, false, Priority::Medium, Some((2025, 3, 10))),
            task(3, false, Priority::Medium, Some((2025, 3, 1))),
            task(4, false, Priority::High, None),
        ];

        let view = build_view(&tasks, &FilterCriteria::default());

        assert_eq!(ids(&view), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_description_category() {
        let mut by_title = task(1, false, Priority::Low, None);
        by_title.title = "Buy MILK".to_string();
        let mut by_description = task(2, false, Priority::Low, None);
        by_description.description = "remember the milk".to_string();
        let mut by_category = task(3, false, Priority::Low, None);
        by_category.category = "Milkman".to_string();
        let unrelated = task(4, false, Priority::Low, None);
        let tasks = vec![by_title, by_description, by_category, unrelated];

        let criteria = FilterCriteria {
            search_text: "  Milk ".to_string(),
            ..FilterCriteria::default()
        };
        let view = build_view(&tasks, &criteria);

        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn test_filters_combine() {
        let tasks = vec![
            task(1, false, Priority::High, None),
            task(2, true, Priority::High, None),
            task(3, false, Priority::Low, None),
        ];
        let criteria = FilterCriteria {
            search_text: String::new(),
            status: StatusFilter::Pending,
            priority: PriorityFilter::High,
        };

        assert_eq!(ids(&build_view(&tasks, &criteria)), vec![1]);
    }

    #[test]
    fn test_view_is_deterministic_and_respects_order() {
        let tasks = vec![
            task(1, true, Priority::Low, Some((2025, 2, 1))),
            task(2, false, Priority::Medium, Some((2025, 2, 3))),
            task(3, false, Priority::Medium, Some((2025, 2, 2))),
            task(4, true, Priority::High, None),
            task(5, false, Priority::Low, None),
            task(6, false, Priority::High, Some((2025, 1, 30))),
        ];
        let criteria = FilterCriteria::default();

        let first = build_view(&tasks, &criteria);
        let second = build_view(&tasks, &criteria);
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert_ne!(compare_for_display(&pair[0], &pair[1]), Ordering::Greater);
        }
        assert_eq!(ids(&first), vec![6, 3, 2, 5, 4, 1]);
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut criteria = FilterCriteria {
            search_text: "report".to_string(),
            status: StatusFilter::Pending,
            priority: PriorityFilter::All,
        };

        criteria.apply(CriteriaUpdate::priority(PriorityFilter::Low));

        assert_eq!(criteria.search_text, "report");
        assert_eq!(criteria.status, StatusFilter::Pending);
        assert_eq!(criteria.priority, PriorityFilter::Low);
    }

    #[test]
    fn test_filter_names_parse() {
        assert_eq!("pending".parse::<StatusFilter>(), Ok(StatusFilter::Pending));
        assert_eq!("ALL".parse::<PriorityFilter>(), Ok(PriorityFilter::All));
        assert_eq!("high".parse::<PriorityFilter>(), Ok(PriorityFilter::High));
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
