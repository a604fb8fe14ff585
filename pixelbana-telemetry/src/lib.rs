//! # pixelbana-telemetry
//!
//! Observability plumbing for the simulator: structured logging and a
//! prometheus metrics recorder. Trace output is a debuggability aid, not
//! part of the functional contract. Every stage emits one line per major
//! action (send, accept, route, store, read, error).

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
