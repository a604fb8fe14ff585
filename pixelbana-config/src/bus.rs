//! Interconnect parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Routing policy selection. Address-decoded routing is the canonical mode;
/// broadcast fans every transaction out to all bound targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingPolicyConfig {
    #[default]
    Decode,
    Broadcast,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct BusConfig {
    /// Size of the address region mapped to each downstream target.
    #[validate(range(min = 1))]
    pub region_size: u64,
    #[serde(default)]
    pub policy: RoutingPolicyConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            region_size: 256,
            policy: RoutingPolicyConfig::Decode,
        }
    }
}
