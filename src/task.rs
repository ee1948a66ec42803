//! Task records and the operations over an in-memory task list.
//!
//! Nothing in this module touches the filesystem. Callers load the full list
//! through [`crate::store::TaskStore`], apply one operation, and write the full
//! list back. Lookups by id are linear scans; the list is expected to be small.

use std::collections::BTreeSet;

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PRIORITY: &str = "medium";
pub const DEFAULT_CATEGORY: &str = "General";
/// Category shown for tasks persisted without one.
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

/// `null` and a missing field both read as the default priority.
fn priority_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_priority))
}

fn flag_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single to-do item.
///
/// Field order matches the persisted document: `id`, `content`, `completed`,
/// `created_at`, `priority`, `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Any integer; hand-edited documents may hold zero or negative ids.
    pub id: i64,
    pub content: String,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub completed: bool,
    pub created_at: String,
    /// Usually `low`, `medium` or `high`, but any text is kept as-is.
    #[serde(default = "default_priority", deserialize_with = "priority_or_default")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Task {
    /// Category label used for display and grouping.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Input for [`create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub content: String,
    pub priority: String,
    pub category: String,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            priority: DEFAULT_PRIORITY.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Current local time in the persisted `created_at` format.
pub fn timestamp_now() -> String {
    Local::now().format(CREATED_AT_FORMAT).to_string()
}

/// The three tasks written to a fresh store.
pub fn seed_tasks(created_at: &str) -> Vec<Task> {
    let seed = [
        (
            1,
            "Welcome to Task Manager! Add your tasks here.",
            "medium",
            "General",
        ),
        (2, "Try marking a task as complete", "high", "Tutorial"),
        (3, "Delete a task you no longer need", "low", "Tutorial"),
    ];

    seed.into_iter()
        .map(|(id, content, priority, category)| Task {
            id,
            content: content.to_string(),
            completed: false,
            created_at: created_at.to_string(),
            priority: priority.to_string(),
            category: Some(category.to_string()),
        })
        .collect()
}

/// Next id to assign: one past the largest id present, or 1 for an empty list.
///
/// `None` when the largest id is `i64::MAX`.
pub fn next_id(tasks: &[Task]) -> Option<i64> {
    tasks.iter().map(|task| task.id).max().unwrap_or(0).checked_add(1)
}

/// Append a new pending task stamped with the current time.
///
/// Returns the assigned id. The list is untouched and `None` is returned when
/// `content` is empty or no id is left to assign.
pub fn create(tasks: &mut Vec<Task>, new_task: NewTask) -> Option<i64> {
    create_at(tasks, new_task, timestamp_now())
}

/// Like [`create`], with an explicit `created_at` value.
pub fn create_at(tasks: &mut Vec<Task>, new_task: NewTask, created_at: String) -> Option<i64> {
    if new_task.content.is_empty() {
        return None;
    }

    let id = next_id(tasks)?;
    tasks.push(Task {
        id,
        content: new_task.content,
        completed: false,
        created_at,
        priority: new_task.priority,
        category: Some(new_task.category),
    });
    Some(id)
}

fn find_mut(tasks: &mut [Task], id: i64) -> Option<&mut Task> {
    tasks.iter_mut().find(|task| task.id == id)
}

/// Flip `completed` on the first task with `id`.
///
/// Returns the new value, or `None` when no task matched.
pub fn toggle(tasks: &mut [Task], id: i64) -> Option<bool> {
    let task = find_mut(tasks, id)?;
    task.completed = !task.completed;
    Some(task.completed)
}

/// Remove every task with `id`. Returns how many were removed.
pub fn delete(tasks: &mut Vec<Task>, id: i64) -> usize {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    before - tasks.len()
}

/// Set `priority` on the first task with `id`. Returns whether one matched.
pub fn set_priority(tasks: &mut [Task], id: i64, priority: &str) -> bool {
    match find_mut(tasks, id) {
        Some(task) => {
            task.priority = priority.to_string();
            true
        }
        None => false,
    }
}

/// Set `category` on the first task with `id`. Returns whether one matched.
pub fn set_category(tasks: &mut [Task], id: i64, category: &str) -> bool {
    match find_mut(tasks, id) {
        Some(task) => {
            task.category = Some(category.to_string());
            true
        }
        None => false,
    }
}

/// Completion-status filter for listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Unknown values select everything.
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => StatusFilter::Active,
            "completed" => StatusFilter::Completed,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// Category filter for listing. `all` disables it; anything else is an
/// exact, case-sensitive match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(value.to_string())
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(category) => task.category.as_deref() == Some(category.as_str()),
        }
    }
}

/// Both filters; a task must satisfy each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl TaskFilter {
    pub fn new(status: StatusFilter, category: CategoryFilter) -> Self {
        Self { status, category }
    }

    /// Build from optional raw `filter` / `category` parameters.
    pub fn from_params(status: Option<&str>, category: Option<&str>) -> Self {
        Self {
            status: status.map(StatusFilter::parse).unwrap_or_default(),
            category: category.map(CategoryFilter::parse).unwrap_or_default(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && self.category.matches(task)
    }
}

/// Tasks passing `filter`, in stored order.
pub fn filter<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Sorted, de-duplicated category labels.
pub fn distinct_categories(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.category_label().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Totals shown alongside the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const STAMP: &str = "2024-01-02 03:04:05";

    fn task(id: i64, completed: bool, category: Option<&str>) -> Task {
        Task {
            id,
            content: format!("task {id}"),
            completed,
            created_at: STAMP.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            category: category.map(str::to_string),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, false, Some("General")),
            task(2, true, Some("Work")),
            task(3, false, Some("Work")),
            task(4, true, Some("work")),
            task(5, false, None),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn seed_tasks_are_fixed() {
        let seed = seed_tasks(STAMP);
        assert_eq!(seed.len(), 3);
        assert_eq!(seed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(seed.iter().all(|t| !t.completed));
        assert_eq!(
            seed.iter().map(|t| t.category_label()).collect::<Vec<_>>(),
            vec!["General", "Tutorial", "Tutorial"]
        );
        assert_eq!(
            seed.iter().map(|t| t.priority.as_str()).collect::<Vec<_>>(),
            vec!["medium", "high", "low"]
        );
    }

    #[test]
    fn create_assigns_max_plus_one() {
        let mut tasks = seed_tasks(STAMP);
        let id = create_at(&mut tasks, NewTask::new("write docs"), STAMP.to_string());
        assert_eq!(id, Some(4));

        let created = tasks.last().expect("created task");
        assert_eq!(created.content, "write docs");
        assert!(!created.completed);
        assert_eq!(created.priority, "medium");
        assert_eq!(created.category.as_deref(), Some("General"));
    }

    #[test]
    fn create_on_empty_list_starts_at_one() {
        let mut tasks = Vec::new();
        assert_eq!(create(&mut tasks, NewTask::new("first")), Some(1));
        assert_eq!(tasks[0].created_at.len(), STAMP.len());
    }

    #[test]
    fn create_uses_max_not_len() {
        let mut tasks = vec![task(7, false, None), task(2, false, None)];
        assert_eq!(create(&mut tasks, NewTask::new("gap")), Some(8));
    }

    #[test]
    fn create_after_negative_ids() {
        let mut tasks = vec![task(-1, false, None), task(2, false, None)];
        assert_eq!(create(&mut tasks, NewTask::new("next")), Some(3));

        let mut tasks = vec![task(-5, false, None)];
        assert_eq!(create(&mut tasks, NewTask::new("next")), Some(-4));
    }

    #[test]
    fn create_at_max_id_is_noop() {
        let mut tasks = vec![task(i64::MAX, false, None)];
        let before = tasks.clone();
        assert_eq!(next_id(&tasks), None);
        assert_eq!(create(&mut tasks, NewTask::new("overflow")), None);
        assert_eq!(tasks, before);
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let raw = r#"[{"id": -3, "content": "legacy", "completed": null,
            "created_at": "2023-01-01 00:00:00", "priority": null, "category": null}]"#;
        let tasks: Vec<Task> = serde_json::from_str(raw).expect("parse");
        assert_eq!(tasks[0].id, -3);
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].priority, DEFAULT_PRIORITY);
        assert_eq!(tasks[0].category_label(), UNCATEGORIZED);
    }

    #[test]
    fn create_with_empty_content_is_noop() {
        let mut tasks = seed_tasks(STAMP);
        let before = tasks.clone();
        assert_eq!(create(&mut tasks, NewTask::new("")), None);
        assert_eq!(tasks, before);
    }

    #[test]
    fn create_keeps_free_text_priority_and_category() {
        let mut tasks = Vec::new();
        let new_task = NewTask::new("ship it")
            .with_priority("urgent")
            .with_category("Release");
        create(&mut tasks, new_task);
        assert_eq!(tasks[0].priority, "urgent");
        assert_eq!(tasks[0].category.as_deref(), Some("Release"));
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut tasks = sample();
        assert_eq!(toggle(&mut tasks, 2), Some(false));
        assert_eq!(toggle(&mut tasks, 2), Some(true));
        assert!(tasks[1].completed);
    }

    #[test]
    fn toggle_missing_id_is_noop() {
        let mut tasks = sample();
        let before = tasks.clone();
        assert_eq!(toggle(&mut tasks, 99), None);
        assert_eq!(tasks, before);
    }

    #[test]
    fn toggle_only_first_match() {
        let mut tasks = vec![task(1, false, None), task(1, false, None)];
        toggle(&mut tasks, 1);
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
    }

    #[test]
    fn delete_present_and_absent() {
        let mut tasks = sample();
        assert_eq!(delete(&mut tasks, 3), 1);
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(|t| t.id != 3));

        assert_eq!(delete(&mut tasks, 3), 0);
        assert_eq!(tasks.len(), 4);
    }

    #[test]
    fn delete_removes_every_duplicate() {
        let mut tasks = vec![task(1, false, None), task(2, false, None), task(1, true, None)];
        assert_eq!(delete(&mut tasks, 1), 2);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn set_priority_and_category() {
        let mut tasks = sample();
        assert!(set_priority(&mut tasks, 1, "high"));
        assert!(set_category(&mut tasks, 5, "Home"));
        assert_eq!(tasks[0].priority, "high");
        assert_eq!(tasks[4].category.as_deref(), Some("Home"));

        let before = tasks.clone();
        assert!(!set_priority(&mut tasks, 42, "low"));
        assert!(!set_category(&mut tasks, 42, "Nowhere"));
        assert_eq!(tasks, before);
    }

    #[test]
    fn active_and_completed_partition_all() {
        let tasks = sample();
        let all = filter(&tasks, &TaskFilter::default());
        let active = filter(&tasks, &TaskFilter::new(StatusFilter::Active, CategoryFilter::All));
        let completed = filter(
            &tasks,
            &TaskFilter::new(StatusFilter::Completed, CategoryFilter::All),
        );

        let active_ids: HashSet<i64> = ids(&active).into_iter().collect();
        let completed_ids: HashSet<i64> = ids(&completed).into_iter().collect();
        assert!(active_ids.is_disjoint(&completed_ids));

        let union: HashSet<i64> = active_ids.union(&completed_ids).copied().collect();
        let all_ids: HashSet<i64> = ids(&all).into_iter().collect();
        assert_eq!(union, all_ids);
    }

    #[test]
    fn category_filter_is_exact() {
        let tasks = sample();
        let work = filter(&tasks, &TaskFilter::from_params(None, Some("Work")));
        assert_eq!(ids(&work), vec![2, 3]);

        let partial = filter(&tasks, &TaskFilter::from_params(None, Some("Wor")));
        assert!(partial.is_empty());

        let uncategorized = filter(&tasks, &TaskFilter::from_params(None, Some(UNCATEGORIZED)));
        assert!(uncategorized.is_empty());
    }

    #[test]
    fn filters_compose() {
        let tasks = sample();
        let selected = filter(&tasks, &TaskFilter::from_params(Some("completed"), Some("Work")));
        assert_eq!(ids(&selected), vec![2]);
    }

    #[test]
    fn unknown_status_selects_all() {
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("Active"), StatusFilter::All);
        let tasks = sample();
        let selected = filter(&tasks, &TaskFilter::from_params(Some("bogus"), Some("all")));
        assert_eq!(selected.len(), tasks.len());
    }

    #[test]
    fn distinct_categories_sorted_with_fallback() {
        let tasks = sample();
        assert_eq!(
            distinct_categories(&tasks),
            vec!["General", "Uncategorized", "Work", "work"]
        );
        assert!(distinct_categories(&[]).is_empty());
    }

    #[test]
    fn counts_split_by_completion() {
        let counts = TaskCounts::of(&sample());
        assert_eq!(
            counts,
            TaskCounts {
                total: 5,
                active: 3,
                completed: 2
            }
        );
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let raw = r#"{"id": 9, "content": "legacy", "created_at": "2024-01-01 00:00:00"}"#;
        let task: Task = serde_json::from_str(raw).expect("parse");
        assert!(!task.completed);
        assert_eq!(task.priority, DEFAULT_PRIORITY);
        assert_eq!(task.category, None);
        assert_eq!(task.category_label(), UNCATEGORIZED);
    }

    #[test]
    fn serializes_fields_in_document_order() {
        let json = serde_json::to_string(&task(1, false, Some("General"))).expect("serialize");
        assert_eq!(
            json,
            r#"{"id":1,"content":"task 1","completed":false,"created_at":"2024-01-02 03:04:05","priority":"medium","category":"General"}"#
        );
    }
}
