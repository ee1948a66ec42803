//! Task subcommands: list, add, toggle, delete, priority, category, categories.
//!
//! Each command performs one full load/modify/save cycle on the task document.
//! Ids that match nothing are reported as warnings, never as errors.

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{self, NewTask, Task, TaskCounts, TaskFilter};

use super::open_store;

/// Options for `taskboard list`
pub struct ListOptions {
    pub filter: String,
    pub category: String,
}

/// Options for `taskboard add`
pub struct AddOptions {
    pub content: String,
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
struct ListReport<'a> {
    filter: &'a str,
    category: &'a str,
    counts: TaskCounts,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct AddReport {
    id: Option<i64>,
}

#[derive(Serialize)]
struct ToggleReport {
    id: i64,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

#[derive(Serialize)]
struct DeleteReport {
    id: i64,
    removed: usize,
}

#[derive(Serialize)]
struct UpdateReport<'a> {
    id: i64,
    found: bool,
    field: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct CategoriesReport {
    categories: Vec<String>,
}

pub fn run_list(config: &Config, options: ListOptions, output: OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let tasks = store.snapshot()?;
    let filter = TaskFilter::from_params(Some(&options.filter), Some(&options.category));
    let selected = task::filter(&tasks, &filter);

    let mut human = HumanOutput::new(format!("taskboard list: {} task(s)", selected.len()));
    human.push_summary("filter", options.filter.clone());
    human.push_summary("category", options.category.clone());
    for task in &selected {
        human.push_detail(format_task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("taskboard add \"<task>\"");
    }

    let report = ListReport {
        filter: &options.filter,
        category: &options.category,
        counts: TaskCounts::of(&tasks),
        tasks: selected,
    };

    emit_success(output, "list", &report, Some(&human))
}

pub fn run_add(config: &Config, options: AddOptions, output: OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let new_task = NewTask::new(options.content)
        .with_priority(
            options
                .priority
                .unwrap_or_else(|| config.tasks.default_priority.clone()),
        )
        .with_category(
            options
                .category
                .unwrap_or_else(|| config.tasks.default_category.clone()),
        );

    // Empty content creates nothing; skip the write entirely.
    let empty = new_task.content.is_empty();
    let id = if empty {
        None
    } else {
        store.update(|tasks| task::create(tasks, new_task))?
    };

    let mut human = match id {
        Some(id) => HumanOutput::new(format!("taskboard add: created #{id}")),
        None => {
            let mut human = HumanOutput::new("taskboard add: nothing created");
            human.push_warning(if empty {
                "task content is empty"
            } else {
                "no task id left to assign"
            });
            human
        }
    };
    human.push_summary("store", store.path().display().to_string());

    emit_success(output, "add", &AddReport { id }, Some(&human))
}

pub fn run_toggle(config: &Config, id: i64, output: OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let completed = store.update(|tasks| task::toggle(tasks, id))?;

    let mut human = match completed {
        Some(true) => HumanOutput::new(format!("taskboard toggle: #{id} done")),
        Some(false) => HumanOutput::new(format!("taskboard toggle: #{id} pending")),
        None => HumanOutput::new(format!("taskboard toggle: #{id} unchanged")),
    };
    if completed.is_none() {
        human.push_warning(format!("no task with id {id}"));
    }

    let report = ToggleReport {
        id,
        found: completed.is_some(),
        completed,
    };
    emit_success(output, "toggle", &report, Some(&human))
}

pub fn run_delete(config: &Config, id: i64, output: OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let removed = store.update(|tasks| task::delete(tasks, id))?;

    let mut human = HumanOutput::new(format!("taskboard delete: removed {removed} task(s)"));
    if removed == 0 {
        human.push_warning(format!("no task with id {id}"));
    }

    emit_success(output, "delete", &DeleteReport { id, removed }, Some(&human))
}

pub fn run_set_priority(
    config: &Config,
    id: i64,
    priority: String,
    output: OutputOptions,
) -> Result<()> {
    let store = open_store(config)?;
    let found = store.update(|tasks| task::set_priority(tasks, id, &priority))?;
    emit_update(output, "priority", id, found, &priority)
}

pub fn run_set_category(
    config: &Config,
    id: i64,
    category: String,
    output: OutputOptions,
) -> Result<()> {
    let store = open_store(config)?;
    let found = store.update(|tasks| task::set_category(tasks, id, &category))?;
    emit_update(output, "category", id, found, &category)
}

pub fn run_categories(config: &Config, output: OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let categories = task::distinct_categories(&store.snapshot()?);

    let mut human = HumanOutput::new(format!(
        "taskboard categories: {} categor{}",
        categories.len(),
        if categories.len() == 1 { "y" } else { "ies" }
    ));
    for category in &categories {
        human.push_detail(category.clone());
    }

    emit_success(output, "categories", &CategoriesReport { categories }, Some(&human))
}

fn emit_update(
    output: OutputOptions,
    field: &str,
    id: i64,
    found: bool,
    value: &str,
) -> Result<()> {
    let mut human = HumanOutput::new(format!("taskboard {field}: #{id}"));
    if found {
        human.push_summary(field, value);
    } else {
        human.push_warning(format!("no task with id {id}"));
    }

    let report = UpdateReport {
        id,
        found,
        field,
        value,
    };
    emit_success(output, field, &report, Some(&human))
}

fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!(
        "[{mark}] #{} {} ({}, {}, {})",
        task.id,
        task.content,
        task.priority,
        task.category_label(),
        task.created_at
    )
}
