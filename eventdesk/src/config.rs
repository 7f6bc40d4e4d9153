//! Environment-based configuration for the demo binary.
//!
//! | variable                           | default                                  |
//! |------------------------------------|------------------------------------------|
//! | `EVENTDESK_LOG`                    | `eventdesk=debug,loadable_runtime=debug` |
//! | `EVENTDESK_BROADCAST_CAPACITY`     | `16`                                     |
//! | `EVENTDESK_SHUTDOWN_TIMEOUT_SECS`  | `5`                                      |
//! | `EVENTDESK_SEED`                   | bundled demo data                        |
//!
//! # Example
//!
//! ```
//! use eventdesk::config::Config;
//!
//! let config = Config::from_lookup(|key| match key {
//!     "EVENTDESK_BROADCAST_CAPACITY" => Some("64".to_string()),
//!     _ => None,
//! })?;
//! assert_eq!(config.store.broadcast_capacity, 64);
//! # Ok::<(), eventdesk::config::ConfigError>(())
//! ```

use loadable_runtime::StoreConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Log filter used when `EVENTDESK_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "eventdesk=debug,loadable_runtime=debug";

/// Configuration error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has a value that cannot be parsed
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Demo configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Settings for every page store
    pub store: StoreConfig,
    /// JSON seed for the in-memory API; bundled data when `None`
    pub seed: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            store: StoreConfig::default().with_shutdown_timeout(Duration::from_secs(5)),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup("EVENTDESK_LOG").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        if let Some(capacity) = parse::<usize>(&lookup, "EVENTDESK_BROADCAST_CAPACITY")? {
            if capacity == 0 {
                return Err(ConfigError::Invalid {
                    var: "EVENTDESK_BROADCAST_CAPACITY",
                    value: capacity.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.store = config.store.with_broadcast_capacity(capacity);
        }

        if let Some(secs) = parse::<u64>(&lookup, "EVENTDESK_SHUTDOWN_TIMEOUT_SECS")? {
            config.store = config.store.with_shutdown_timeout(Duration::from_secs(secs));
        }

        config.seed = lookup("EVENTDESK_SEED")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
