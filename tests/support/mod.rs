#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use taskboard::config::ErrorPolicy;
use taskboard::store::{StoreOptions, TaskStore};
use taskboard::task::Task;
use tempfile::TempDir;

pub const STAMP: &str = "2024-05-06 07:08:09";

/// A temporary directory holding one task document.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::new(self.store_path(), StoreOptions::default())
    }

    pub fn strict_store(&self) -> TaskStore {
        TaskStore::new(
            self.store_path(),
            StoreOptions {
                on_error: ErrorPolicy::Fail,
                ..StoreOptions::default()
            },
        )
    }

    pub fn write_raw(&self, contents: &str) -> PathBuf {
        let path = self.store_path();
        fs::write(&path, contents).expect("write task document");
        path
    }

    pub fn read_raw(&self) -> String {
        fs::read_to_string(self.store_path()).expect("read task document")
    }

    pub fn read_tasks(&self) -> Vec<Task> {
        serde_json::from_str(&self.read_raw()).expect("parse task document")
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("taskboard.toml");
        fs::write(&path, contents).expect("write config");
        path
    }
}

pub fn task(id: i64, content: &str, completed: bool, category: &str) -> Task {
    Task {
        id,
        content: content.to_string(),
        completed,
        created_at: STAMP.to_string(),
        priority: "medium".to_string(),
        category: Some(category.to_string()),
    }
}
