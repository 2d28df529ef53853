// src/config.rs
use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::drivers::buffer::DEFAULT_MAX_SAMPLES;
use crate::drivers::window::DEFAULT_WINDOW_SECONDS;
use crate::drivers::ScopeError;

/// Runtime options for the reader and the consumer tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    #[serde(alias = "maxSamples")]
    pub max_samples: usize,
    #[serde(alias = "windowSeconds")]
    pub window_seconds: f64,
    #[serde(alias = "tickIntervalMs")]
    pub tick_interval_ms: u64,
    #[serde(alias = "readTimeout", alias = "readTimeoutMs")]
    pub read_timeout_ms: u64,
    pub join_timeout_ms: u64,
    pub echo_structured: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            tick_interval_ms: 50,
            // matches the 0.1 s serial timeout of the desktop tool
            read_timeout_ms: 100,
            join_timeout_ms: 1000,
            echo_structured: false,
        }
    }
}

impl ScopeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ScopeError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.max_samples == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        if !(self.window_seconds.is_finite() && self.window_seconds > 0.0) {
            return Err(ScopeError::InvalidWindow(self.window_seconds));
        }
        if self.tick_interval_ms == 0 {
            return Err(ScopeError::ZeroInterval {
                name: "tick_interval_ms",
            });
        }
        if self.read_timeout_ms == 0 {
            return Err(ScopeError::ZeroInterval {
                name: "read_timeout_ms",
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}
