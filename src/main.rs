//! taskboard - single-user task list served over HTTP

use clap::Parser;
use taskboard::cli::Cli;
use taskboard::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

const DEBUG_FILTER: &str = "taskboard=debug,tower_http=debug";
const DEFAULT_FILTER: &str = "warn";

/// `RUST_LOG` when set and usable. Invalid or huge filters are ignored.
fn env_filter_from_env() -> Option<EnvFilter> {
    std::env::var("RUST_LOG").ok().and_then(|raw| {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 4096 {
            return None;
        }
        EnvFilter::try_new(raw).ok()
    })
}

fn main() {
    let cli = Cli::parse();

    let from_env = env_filter_from_env();
    let env_overrides = from_env.is_some();
    let initial = from_env.unwrap_or_else(|| {
        EnvFilter::new(if cli.debug { DEBUG_FILTER } else { DEFAULT_FILTER })
    });
    let (filter, filter_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = infer_command_name_from_args();
    let json = cli.json;

    let result = cli.load_config().and_then(|config| {
        // server.debug from the config file only matters when nothing else chose a filter.
        if config.server.debug && !env_overrides && !cli.debug {
            let _ = filter_handle.modify(|filter| *filter = EnvFilter::new(DEBUG_FILTER));
        }
        cli.run(config)
    });

    if let Err(err) = result {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
