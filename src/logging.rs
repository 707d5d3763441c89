use std::io;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,web_request=info,llm_request=info,tower_http=info";

/// Installs the global subscriber. `RUST_LOG` replaces the default filter when set.
pub fn configure_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_log = fmt::layer().with_writer(io::stdout).with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_log)
        .init();
}
