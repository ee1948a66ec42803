//! HTTP surface for the task list.
//!
//! Routes mirror the form-post endpoints a browser front end calls:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET  | `/` | list view: every task plus sorted categories |
//! | POST | `/add_task` | create from form fields, redirect to `/` |
//! | POST | `/toggle_task/:id` | flip completion |
//! | POST | `/delete_task/:id` | remove |
//! | GET  | `/api/tasks` | filtered list (`filter`, `category` query) |
//! | POST | `/update_task_priority/:id` | set priority from form |
//! | POST | `/update_task_category/:id` | set category from form |
//! | GET  | `/api/categories` | sorted categories |
//! | GET  | `/health` | liveness |

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::TasksConfig;
use crate::error::Result;
use crate::store::TaskStore;

pub mod handlers;

/// Shared application dependencies.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub defaults: Arc<TasksConfig>,
}

impl AppState {
    pub fn new(store: TaskStore, defaults: TasksConfig) -> Self {
        Self {
            store: Arc::new(store),
            defaults: Arc::new(defaults),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add_task", post(handlers::add_task))
        .route("/toggle_task/:id", post(handlers::toggle_task))
        .route("/delete_task/:id", post(handlers::delete_task))
        .route("/api/tasks", get(handlers::list_tasks))
        .route(
            "/update_task_priority/:id",
            post(handlers::update_task_priority),
        )
        .route(
            "/update_task_category/:id",
            post(handlers::update_task_category),
        )
        .route("/api/categories", get(handlers::list_categories))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        store = %state.store.path().display(),
        "taskboard listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
