// ABOUTME: Deployment watch settings with human-readable durations.
// ABOUTME: Converts into the watcher's WatchConfig after validation.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::promote::WatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_max_wait", with = "humantime_serde")]
    pub max_wait: Duration,
}

fn default_poll_interval() -> Duration {
    WatchConfig::default().poll_interval
}

fn default_max_wait() -> Duration {
    WatchConfig::default().max_wait
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            max_wait: default_max_wait(),
        }
    }
}

impl WatchSettings {
    pub fn to_watch_config(&self) -> Result<WatchConfig> {
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "watch.poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.max_wait.is_zero() {
            return Err(Error::InvalidConfig(
                "watch.max_wait must be greater than zero".to_string(),
            ));
        }

        Ok(WatchConfig {
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
        })
    }
}
