//! Structured logging with tracing.
//!
//! Every stage traces one human-readable line per major action. The filter
//! defaults to `info`; set `RUST_LOG=trace` to see per-step scheduler and
//! signal activity.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Call once, before the scheduler
    /// starts.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init()
    }
}
