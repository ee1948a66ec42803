//! taskboard init command implementation
//!
//! Writes a default `taskboard.toml` and seeds the task document.

use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    store: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    store: bool,
}

pub fn run(config: &Config, config_path: Option<PathBuf>, output: OutputOptions) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path,
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };

    let created_config = if config_path.exists() {
        false
    } else {
        Config::default().save(&config_path)?;
        true
    };

    // Seeding is explicit here, so it ignores `store.seed` and the error policy.
    let store = TaskStore::from_config(&config.store);
    let created_store = store.initialize_if_absent()?;

    let report = InitReport {
        config: config_path.clone(),
        store: store.path().to_path_buf(),
        created: InitCreated {
            config: created_config,
            store: created_store,
        },
    };

    let header = if created_config || created_store {
        "taskboard init: initialized"
    } else {
        "taskboard init: already initialized"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("config", config_path.display().to_string());
    human.push_summary("store", store.path().display().to_string());
    if created_config {
        human.push_detail(format!("created {}", config_path.display()));
    }
    if created_store {
        human.push_detail("seeded 3 tasks");
    }
    human.push_next_step("taskboard serve");

    emit_success(output, "init", &report, Some(&human))
}
