//! Park and controller configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::serde::Hour;

/// Longest accepted inbound channel path, in bytes.
pub const MAX_CHANNEL_NAME: usize = 255;

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    /// First simulated hour of the operating window.
    pub start_hour: Hour,
    /// Last simulated hour; the clock stops when it gets here.
    pub end_hour: Hour,
    /// Real seconds per simulated hour.
    pub tick_interval_secs: u64,
    /// Persons allowed in the park during any one hour.
    pub global_max_capacity: u32,
    /// Path of the inbound named pipe.
    pub inbound_channel: String,
    /// How long a response waits for the requester to open its channel.
    pub delivery_timeout_ms: u64,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 19,
            tick_interval_secs: 10,
            global_max_capacity: 100,
            inbound_channel: "PIPE_RECEPTOR".into(),
            delivery_timeout_ms: 500,
        }
    }
}

impl ParkConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=24).contains(&self.start_hour) {
            return Err(format!(
                "start_hour must be between 1 and 24, got {}",
                self.start_hour
            ));
        }
        if self.end_hour <= self.start_hour || self.end_hour > 24 {
            return Err(format!(
                "end_hour must be greater than start_hour ({}) and at most 24, got {}",
                self.start_hour, self.end_hour
            ));
        }
        if self.tick_interval_secs == 0 {
            return Err("tick_interval_secs must be greater than 0".into());
        }
        if self.global_max_capacity == 0 {
            return Err("global_max_capacity must be greater than 0".into());
        }
        if self.inbound_channel.is_empty() {
            return Err("inbound_channel must not be empty".into());
        }
        if self.inbound_channel.len() > MAX_CHANNEL_NAME {
            return Err(format!(
                "inbound_channel must be at most {MAX_CHANNEL_NAME} bytes"
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Real-time length of one simulated hour.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Delivery wait for response channels.
    pub const fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}
