//! Per-type singleton configuration.
//!
//! Every singleton type resolves exactly one [`SingletonConfig`], lazily, the
//! first time the registry touches it. The configuration comes from whatever was
//! registered for the type (an explicit struct or a TOML metadata table) and
//! falls back to the defaults below. Resolution never fails the caller: bad
//! metadata is logged and replaced by defaults.
//!
//! | key                    | default |
//! |------------------------|---------|
//! | `thread_safe`          | `true`  |
//! | `init_timing`          | `"lazy"`|
//! | `init_timeout_seconds` | `5.0`   |
//! | `auto_start_on_boot`   | `false` |

use std::any::TypeId;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// When the bounded initialization routine is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitTiming {
    /// Started by the host's first-use hook (`Registry::initialize`).
    #[default]
    Lazy,
    /// Started in the background right after the instance is created.
    Immediate,
}

/// Resolved behavior of one singleton type. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingletonConfig {
    /// Serialize creation behind a per-type lock.
    pub thread_safe: bool,

    /// When initialization runs.
    pub init_timing: InitTiming,

    /// Upper bound on the initialization procedure.
    pub init_timeout_seconds: f64,

    /// Create the instance from `Registry::boot`.
    pub auto_start_on_boot: bool,
}

impl Default for SingletonConfig {
    fn default() -> Self {
        Self {
            thread_safe: true,
            init_timing: InitTiming::Lazy,
            init_timeout_seconds: 5.0,
            auto_start_on_boot: false,
        }
    }
}

impl SingletonConfig {
    /// Strict parse of a TOML metadata table.
    ///
    /// ```rust
    /// use singleton_lifecycle::{InitTiming, SingletonConfig};
    ///
    /// let config = SingletonConfig::from_toml_str(r#"init_timing = "immediate""#).unwrap();
    /// assert_eq!(config.init_timing, InitTiming::Immediate);
    /// assert!(config.thread_safe);
    /// ```
    pub fn from_toml_str(metadata: &str) -> Result<Self, ConfigError> {
        let config: SingletonConfig = toml::from_str(metadata)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.init_timeout_seconds.is_finite() || self.init_timeout_seconds <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "init_timeout_seconds must be a positive number of seconds, got {}",
                self.init_timeout_seconds
            )));
        }
        if Duration::try_from_secs_f64(self.init_timeout_seconds).is_err() {
            return Err(ConfigError::Validation(format!(
                "init_timeout_seconds {} does not fit a duration",
                self.init_timeout_seconds
            )));
        }
        Ok(())
    }

    /// `init_timeout_seconds` as a [`Duration`].
    pub fn init_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.init_timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(SingletonConfig::default().init_timeout_seconds))
    }
}

/// Error returned by the strict configuration parser.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed singleton metadata: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid singleton metadata: {0}")]
    Validation(String),
}

/// What was registered for a type before it was first resolved.
#[derive(Debug, Clone)]
pub(crate) enum ConfigSource {
    Explicit(SingletonConfig),
    Metadata(String),
}

/// Memoizing resolver, one entry per `TypeId`.
#[derive(Debug, Default)]
pub(crate) struct ConfigResolver {
    sources: DashMap<TypeId, ConfigSource>,
    resolved: DashMap<TypeId, SingletonConfig>,
}

impl ConfigResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a source for `type_id`. Returns `false` (and leaves everything
    /// untouched) when the type has already been resolved.
    pub(crate) fn set_source(
        &self,
        type_id: TypeId,
        type_name: &'static str,
        source: ConfigSource,
    ) -> bool {
        if self.resolved.contains_key(&type_id) {
            tracing::warn!(
                singleton = type_name,
                "configuration registered after first use; keeping the resolved configuration"
            );
            return false;
        }
        self.sources.insert(type_id, source);
        true
    }

    pub(crate) fn resolve(&self, type_id: TypeId, type_name: &'static str) -> SingletonConfig {
        if let Some(config) = self.resolved.get(&type_id) {
            return config.clone();
        }

        // Concurrent first resolutions compute the same value; the entry API keeps
        // whichever lands first.
        let computed = match self.sources.get(&type_id).map(|s| s.value().clone()) {
            None => SingletonConfig::default(),
            Some(ConfigSource::Explicit(config)) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!(singleton = type_name, error = %e, "using default configuration");
                    SingletonConfig::default()
                }
            },
            Some(ConfigSource::Metadata(text)) => match SingletonConfig::from_toml_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(singleton = type_name, error = %e, "using default configuration");
                    SingletonConfig::default()
                }
            },
        };

        self.resolved.entry(type_id).or_insert(computed).clone()
    }
}
