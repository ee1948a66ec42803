//! taskboard - single-user task list library
//!
//! The task list is one JSON document holding every task. Each operation
//! loads the whole document, changes or filters it in memory, and writes the
//! whole document back.
//!
//! # Module Organization
//!
//! - `task`: Task record, seed data, and the in-memory task operations
//! - `store`: Load/save of the task document and the locked update cycle
//! - `lock`: File locking and atomic writes
//! - `config`: Configuration loading from `taskboard.toml`
//! - `error`: Error types and result aliases
//! - `http`: axum router and request handlers
//! - `cli`: Command-line interface using clap
//! - `output`: Human and JSON output for CLI commands

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod lock;
pub mod output;
pub mod store;
pub mod task;

pub use error::{Error, Result};
