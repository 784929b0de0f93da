//! Simulation settings: tick length, catch-up ceilings and log size.

use serde::{Deserialize, Serialize};

const ENV_UPDATE_INTERVAL_MS: &str = "MAINFRAME_UPDATE_INTERVAL_MS";
const ENV_FAST_SPEED_MULTIPLIER: &str = "MAINFRAME_FAST_SPEED_MULTIPLIER";
const ENV_MAX_UPDATES_PER_TICK: &str = "MAINFRAME_MAX_UPDATES_PER_TICK";
const ENV_MESSAGE_LOG_SIZE: &str = "MAINFRAME_MESSAGE_LOG_SIZE";

/// Settings the simulation core reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical length of one tick in milliseconds.
    pub update_interval_ms: u64,
    /// Tick budget multiplier at fast speed.
    pub fast_speed_multiplier: u32,
    /// Most ticks processed by one update or fast-forward call.
    pub max_updates_per_tick: u32,
    /// Entries kept in the player message log.
    pub message_log_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_ms: 200,
            fast_speed_multiplier: 5,
            max_updates_per_tick: 100,
            message_log_size: 200,
        }
    }
}

impl Settings {
    /// Validate settings values.
    pub fn validate(&self) -> Result<(), String> {
        if self.update_interval_ms == 0 {
            return Err("update_interval_ms must be greater than 0".into());
        }
        if self.fast_speed_multiplier == 0 {
            return Err("fast_speed_multiplier must be greater than 0".into());
        }
        if self.max_updates_per_tick == 0 {
            return Err("max_updates_per_tick must be greater than 0".into());
        }
        if self.message_log_size == 0 {
            return Err("message_log_size must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse settings from a JSON string and validate. Missing fields use defaults.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let settings: Self =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overridden by `MAINFRAME_*` environment variables.
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut settings = Self::default();

        if let Some(value) = read_env(ENV_UPDATE_INTERVAL_MS)? {
            settings.update_interval_ms = value;
        }
        if let Some(value) = read_env(ENV_FAST_SPEED_MULTIPLIER)? {
            settings.fast_speed_multiplier = value;
        }
        if let Some(value) = read_env(ENV_MAX_UPDATES_PER_TICK)? {
            settings.max_updates_per_tick = value;
        }
        if let Some(value) = read_env(ENV_MESSAGE_LOG_SIZE)? {
            settings.message_log_size = value;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{key}: {e}")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{key}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{ "update_interval_ms": 1000 }"#).unwrap();
        assert_eq!(settings.update_interval_ms, 1000);
        assert_eq!(settings.max_updates_per_tick, 100);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Settings::from_json_str(r#"{ "update_interval_ms": 0 }"#).is_err());
    }
}
