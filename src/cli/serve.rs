//! taskboard serve command implementation

use crate::config::Config;
use crate::error::Result;
use crate::http::{self, AppState};

use super::open_store;

pub fn run(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let store = open_store(&config)?;
    let state = AppState::new(store, config.tasks);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(http::serve(state, &host, port))
}
