//! Output consumer parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ConsumerConfig {
    /// Virtual time between read-back iterations.
    #[validate(range(min = 1))]
    pub poll_interval_ns: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ns: 25,
        }
    }
}
