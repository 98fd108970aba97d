//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,gating=debug,selection=debug").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Notes:
//! - This is a library: the host may already own a global subscriber, so we
//!   only try to install ours and return whether it took.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,courseware=debug,gating=info,selection=debug";

/// Install a fmt subscriber. Returns `false` when one was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Choose JSON vs pretty; don't try to store different layer types.
    let installed = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init().is_ok(),
        _ => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(target: "courseware", "tracing subscriber installed");
    }
    installed
}
