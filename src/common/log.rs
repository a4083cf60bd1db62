//! Logging setup on top of `tracing`.
//!
//! JSON lines are emitted when `log_json` is set, human readable lines otherwise.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::common::config::AppCfg;

/// Install the global subscriber. Later calls are no-ops.
pub fn init(cfg: &AppCfg) {
    let filter = EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if cfg.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
