//! # pixelbana-config
//!
//! Hierarchical configuration for the pixelbana simulator.
//!
//! ## Features
//! - **Unified Configuration**: single source of truth across all components
//! - **Validation**: runtime validation of critical parameters
//! - **Environment Awareness**: `PIXELBANA_*` variables override files
//!
//! All wiring-relevant parameters are read once before the scheduler starts;
//! nothing is re-read at runtime.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod bus;
mod consumer;
mod error;
mod memory;
mod sim;

pub use bus::{BusConfig, RoutingPolicyConfig};
pub use consumer::ConsumerConfig;
pub use error::ConfigError;
pub use memory::MemoryConfig;
pub use sim::{SimConfig, SourceMode};

/// Top-level configuration container for all pixelbana components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct PixelbanaConfig {
    /// Simulation run parameters (seed, horizon, pixel source).
    #[validate(nested)]
    pub sim: SimConfig,

    /// Memory store parameters.
    #[validate(nested)]
    pub memory: MemoryConfig,

    /// Interconnect parameters (region size, routing policy).
    #[validate(nested)]
    pub bus: BusConfig,

    /// Output consumer parameters.
    #[validate(nested)]
    pub consumer: ConsumerConfig,
}

impl PixelbanaConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/pixelbana.yaml` base settings. If missing, defaults are used.
    /// 3. `PIXELBANA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(PixelbanaConfig::default()));

        if Path::new("config/pixelbana.yaml").exists() {
            figment = figment.merge(Yaml::file("config/pixelbana.yaml"));
        }

        figment
            .merge(Env::prefixed("PIXELBANA_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path, e.g. for tests.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Figment::from(Serialized::defaults(PixelbanaConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("PIXELBANA_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
