//! Memory store parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct MemoryConfig {
    /// Number of addressable byte cells per bank.
    #[validate(range(min = 1))]
    pub capacity: usize,
    /// Number of store banks attached downstream of the interconnect.
    #[validate(range(min = 1))]
    pub banks: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            banks: 1,
        }
    }
}
