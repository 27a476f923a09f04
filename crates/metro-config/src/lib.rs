//! Configuration for the metro-sim soundscape simulator.
//!
//! One TOML file drives a run: journey scheduling, line conditions, and the
//! output path. Every key is optional and command-line flags override what the
//! file says.
//!
//! # Example
//!
//! ```rust
//! use metro_config::SimulatorConfig;
//!
//! let config = SimulatorConfig::from_toml(
//!     r#"
//!     [journey]
//!     seed = 42
//!     cruise_speed_kmh = [50.0, 70.0]
//!
//!     [output]
//!     channels = "mono"
//!     "#,
//! )
//! .unwrap();
//!
//! let params = config.journey_params();
//! assert_eq!(params.cruise_speed_kmh, (50.0, 70.0));
//! assert_eq!(config.mixer_config().format.channel_count(), 1);
//! ```

mod error;
mod simulator;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_config_path, ensure_user_config_dir, user_config_dir};
pub use simulator::{
    ChannelLayout, ConditionsConfig, JourneyConfig, OddsConfig, OutputConfig, SimulatorConfig,
};
