use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// Configuration for the reminder engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// Seconds between overdue checks.
    ///
    /// Never zero.
    poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The time between overdue checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Sets the time between overdue checks, rounded down to whole seconds.
    ///
    /// Returns `false`, leaving the interval unchanged, if it would round to
    /// zero.
    pub const fn set_poll_interval(&mut self, interval: Duration) -> bool {
        let secs = interval.as_secs();
        if secs == 0 {
            return false;
        }
        self.poll_interval_secs = secs;
        true
    }
}

/// One check a minute.
const fn default_poll_interval_secs() -> u64 {
    60
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_poll_interval_secs")]
        poll_interval_secs: u64,
    },
}

impl TryFrom<Versions> for Config {
    type Error = String;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 { poll_interval_secs } => {
                if poll_interval_secs == 0 {
                    return Err("poll_interval_secs must be greater than zero".to_string());
                }
                Ok(Self { poll_interval_secs })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            poll_interval_secs: config.poll_interval_secs,
        }
    }
}
