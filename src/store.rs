//! Task Store: the whole task list persisted as one JSON document.
//!
//! Every operation reads or writes the complete document. The strict calls
//! (`read`, `write`, `initialize_if_absent`) return `Result`; `load` and `save`
//! are the lenient variants that log failures and carry on. Which of the two
//! the read/modify/write cycle in [`TaskStore::update`] uses is chosen by the
//! configured [`ErrorPolicy`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::config::{ErrorPolicy, StoreConfig};
use crate::error::Result;
use crate::lock::{self, FileLock};
use crate::task::{self, Task};

/// Behaviour switches for [`TaskStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub atomic_writes: bool,
    pub file_lock: bool,
    pub lock_timeout_ms: u64,
    pub on_error: ErrorPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from(&StoreConfig::default())
    }
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            atomic_writes: config.atomic_writes,
            file_lock: config.file_lock,
            lock_timeout_ms: config.lock_timeout_ms,
            on_error: config.on_error,
        }
    }
}

/// Flat-file task store
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    options: StoreOptions,
    /// Serializes read/modify/write cycles within this process.
    writer: Mutex<()>,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
            writer: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path.clone(), StoreOptions::from(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the document. A missing document is an empty list.
    pub fn read(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(tasks)
    }

    /// Read the document, logging any failure and returning an empty list.
    pub fn load(&self) -> Vec<Task> {
        match self.read() {
            Ok(tasks) => {
                tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "error loading tasks");
                Vec::new()
            }
        }
    }

    /// Serialize the full list and replace the document.
    pub fn write(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        if self.options.atomic_writes {
            lock::write_atomic(&self.path, json.as_bytes())?;
        } else {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&self.path, json)?;
        }
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Write the document, logging and discarding any failure.
    pub fn save(&self, tasks: &[Task]) {
        if let Err(err) = self.write(tasks) {
            tracing::error!(path = %self.path.display(), error = %err, "error saving tasks");
        }
    }

    /// Write the seed tasks if the document does not exist.
    ///
    /// Returns whether the document was created.
    pub fn initialize_if_absent(&self) -> Result<bool> {
        let _guard = self.writer_guard();
        let _lock = self.acquire_file_lock()?;

        if self.path.exists() {
            return Ok(false);
        }

        let seed = task::seed_tasks(&task::timestamp_now());
        self.write(&seed)?;
        tracing::info!(path = %self.path.display(), count = seed.len(), "initialized task store");
        Ok(true)
    }

    /// Current tasks, honouring the error policy.
    pub fn snapshot(&self) -> Result<Vec<Task>> {
        match self.options.on_error {
            ErrorPolicy::Log => Ok(self.load()),
            ErrorPolicy::Fail => self.read(),
        }
    }

    /// Load the full list, apply `f`, and write the full list back.
    ///
    /// The cycle holds the in-process writer mutex and, when enabled, the
    /// advisory file lock. Under [`ErrorPolicy::Log`] read and write failures
    /// are logged and the cycle still completes; under [`ErrorPolicy::Fail`]
    /// they are returned and nothing is written.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> T,
    {
        let _guard = self.writer_guard();
        let _lock = self.acquire_file_lock()?;

        match self.options.on_error {
            ErrorPolicy::Log => {
                let mut tasks = self.load();
                let out = f(&mut tasks);
                self.save(&tasks);
                Ok(out)
            }
            ErrorPolicy::Fail => {
                let mut tasks = self.read()?;
                let out = f(&mut tasks);
                self.write(&tasks)?;
                Ok(out)
            }
        }
    }

    fn writer_guard(&self) -> MutexGuard<'_, ()> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn acquire_file_lock(&self) -> Result<Option<FileLock>> {
        if !self.options.file_lock {
            return Ok(None);
        }

        let lock_path = lock::lock_path_for(&self.path);
        match FileLock::acquire(&lock_path, self.options.lock_timeout_ms) {
            Ok(lock) => {
                tracing::trace!(path = %lock.path().display(), "acquired store lock");
                Ok(Some(lock))
            }
            Err(err) if self.options.on_error == ErrorPolicy::Log => {
                tracing::warn!(path = %lock_path.display(), error = %err, "proceeding without store lock");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
