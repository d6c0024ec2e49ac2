//! Filter and sort pipeline for task listings.
//!
//! # Design
//! `TaskQuery` deserializes straight from a query string. Every filter is
//! optional and the filters combine conjunctively; blank `status` or
//! `searchTerm` values behave as if they were absent. Sorting is stable, so
//! tasks with equal keys keep store order in either direction. Text keys
//! order case-insensitively, with byte order breaking ties.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::Task;

/// Key a task listing is ordered by.
///
/// Parsing is lenient: matching is case-insensitive and anything
/// unrecognised falls back to `DueDate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SortKey {
    Title,
    Status,
    #[default]
    DueDate,
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "title" => SortKey::Title,
            "status" => SortKey::Status,
            _ => SortKey::DueDate,
        }
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        SortKey::from(value.as_str())
    }
}

/// Optional filters plus ordering for a task listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskQuery {
    /// Exact status match, ignoring case.
    pub status: Option<String>,
    /// Case-sensitive substring of the title or the description.
    pub search_term: Option<String>,
    /// Inclusive lower bound on the due date.
    pub due_date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the due date.
    pub due_date_to: Option<DateTime<Utc>>,
    pub sort_by: SortKey,
    pub sort_descending: bool,
}

impl TaskQuery {
    /// Whether `task` passes every filter in this query.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = non_blank(&self.status) {
            if task.status.to_lowercase() != status.to_lowercase() {
                return false;
            }
        }
        if let Some(from) = self.due_date_from {
            if task.due_date < from {
                return false;
            }
        }
        if let Some(to) = self.due_date_to {
            if task.due_date > to {
                return false;
            }
        }
        if let Some(term) = non_blank(&self.search_term) {
            if !task.title.contains(term) && !task.description.contains(term) {
                return false;
            }
        }
        true
    }

    /// Drop tasks that fail the filters, then order the rest.
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks.into_iter().filter(|task| self.matches(task)).collect();
        self.sort(&mut selected);
        selected
    }

    fn sort(&self, tasks: &mut [Task]) {
        let key = self.sort_by;
        if self.sort_descending {
            tasks.sort_by(|a, b| compare(key, b, a));
        } else {
            tasks.sort_by(|a, b| compare(key, a, b));
        }
    }
}

fn compare(key: SortKey, a: &Task, b: &Task) -> Ordering {
    match key {
        SortKey::Title => compare_text(&a.title, &b.title),
        SortKey::Status => compare_text(&a.status, &b.status),
        SortKey::DueDate => a.due_date.cmp(&b.due_date),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
