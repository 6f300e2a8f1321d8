//! Board configuration using Figment
//!
//! Loads [`BoardConfig`] from layered sources:
//!
//! - Built-in defaults
//! - `./.clientdesk/board.{toml,yaml,yml,json}`
//! - An explicit file passed by the host
//! - `CLIENTDESK_*` environment variables, `__` separating nested keys
//!   (`CLIENTDESK_DRAG__ACTIVATION_DISTANCE=12`)
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! activity_capacity = 50
//!
//! [drag]
//! activation_distance = 6.0
//!
//! [gateway]
//! base_url = "https://portal.example.com/api"
//! timeout_ms = 5000
//!
//! [lanes.in_review]
//! label = "Client Review"
//! ```
//!
//! ```no_run
//! use clientdesk_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! let lanes = config.lane_table();
//! # Ok::<(), clientdesk_config::ConfigError>(())
//! ```

pub mod discovery;
mod error;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use discovery::{ConfigFile, ConfigFormat, FileDiscovery};
pub use error::ConfigError;
pub use provider::{ConfigLoader, ENV_PREFIX};
pub use types::{BoardConfig, DragSettings, GatewaySettings, LaneOverride, DEFAULT_TIMEOUT_MS};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load configuration from the current directory and environment
pub fn load_configuration() -> ConfigResult<BoardConfig> {
    ConfigLoader::new().load()
}
