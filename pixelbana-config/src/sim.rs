//! Simulation run parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the capture driver takes its frame byte from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Constant byte, configured via `pixel`.
    #[default]
    Fixed,
    /// Seeded deterministic random source.
    Random,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimConfig {
    /// Seed for deterministic simulation.
    pub seed: u64,
    /// Virtual-time horizon: events past this instant are not dispatched.
    #[validate(range(min = 1))]
    pub horizon_ns: u64,
    /// Pixel source selection.
    #[serde(default)]
    pub source: SourceMode,
    /// Frame byte used by the fixed source.
    pub pixel: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            horizon_ns: 200,
            source: SourceMode::Fixed,
            pixel: 123,
        }
    }
}
