//! Command-line interface for taskboard
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::store::TaskStore;

mod init;
mod serve;
mod task;

/// taskboard - a single-user task list
///
/// Serves the task list over HTTP and exposes the same operations as
/// subcommands working directly on the task document.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./taskboard.toml)
    #[arg(long, global = true, env = "TASKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the task document (overrides store.path)
    #[arg(long, global = true, env = "TASKBOARD_STORE")]
    pub store: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "TASKBOARD_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default taskboard.toml and seed the task document
    Init,

    /// Serve the task list over HTTP
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List tasks
    List {
        /// Status filter: all, active, completed
        #[arg(long, default_value = "all")]
        filter: String,

        /// Category filter: all or an exact category name
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Add a task
    Add {
        /// Task text
        content: String,

        /// Priority (low, medium, high, or any text)
        #[arg(long)]
        priority: Option<String>,

        /// Category
        #[arg(long)]
        category: Option<String>,
    },

    /// Flip a task between pending and done
    Toggle {
        /// Task id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Set a task's priority
    Priority {
        /// Task id
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// New priority
        priority: String,
    },

    /// Set a task's category
    Category {
        /// Task id
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// New category
        category: String,
    },

    /// List distinct categories
    Categories,
}

impl Cli {
    /// Resolve configuration from `--config`, the working directory, and
    /// global overrides.
    ///
    /// An explicit `--config` must parse (unless `init` is about to create
    /// it); an implicit `taskboard.toml` that does not is ignored.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) if matches!(self.command, Commands::Init) && !path.exists() => {
                Config::default_at(path)
            }
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(&std::env::current_dir()?),
        };

        if let Some(store) = &self.store {
            config.store.path = store.clone();
        }
        if self.debug {
            config.server.debug = true;
        }

        Ok(config)
    }

    pub fn run(self, config: Config) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Init => init::run(&config, self.config, output),
            Commands::Serve { host, port } => serve::run(config, host, port),
            Commands::List { filter, category } => {
                task::run_list(&config, task::ListOptions { filter, category }, output)
            }
            Commands::Add {
                content,
                priority,
                category,
            } => task::run_add(
                &config,
                task::AddOptions {
                    content,
                    priority,
                    category,
                },
                output,
            ),
            Commands::Toggle { id } => task::run_toggle(&config, id, output),
            Commands::Delete { id } => task::run_delete(&config, id, output),
            Commands::Priority { id, priority } => {
                task::run_set_priority(&config, id, priority, output)
            }
            Commands::Category { id, category } => {
                task::run_set_category(&config, id, category, output)
            }
            Commands::Categories => task::run_categories(&config, output),
        }
    }
}

/// Open the configured store, seeding it first when enabled.
///
/// Under the `log` error policy a failed seed is logged and ignored.
pub(crate) fn open_store(config: &Config) -> Result<TaskStore> {
    let store = TaskStore::from_config(&config.store);
    if config.store.seed {
        match store.initialize_if_absent() {
            Ok(_) => {}
            Err(err) if config.store.on_error == crate::config::ErrorPolicy::Log => {
                tracing::error!(path = %store.path().display(), error = %err, "error seeding tasks");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(store)
}
