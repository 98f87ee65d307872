//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Display name used in greetings and notifications.
    pub assistant_name: String,
    /// Lower bound of the simulated typing delay.
    pub typing_delay_min: Duration,
    /// Upper bound of the simulated typing delay.
    pub typing_delay_max: Duration,
    /// How long a voice capture runs before it resolves.
    pub voice_timeout: Duration,
    /// Capacity of the outbound event channel.
    pub event_capacity: usize,
    /// Where settings are persisted. `None` keeps them in memory only.
    pub settings_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_name: "Hiro".to_string(),
            typing_delay_min: Duration::from_millis(1000),
            typing_delay_max: Duration::from_millis(2000),
            voice_timeout: Duration::from_secs(3),
            event_capacity: 256,
            settings_path: None,
        }
    }
}

impl AssistantConfig {
    /// Build a config from defaults overlaid with `HIRO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("HIRO_NAME") {
            let name = name.trim();
            if !name.is_empty() {
                config.assistant_name = name.to_string();
            }
        }
        if let Some(ms) = parse_u64(&lookup, "HIRO_TYPING_DELAY_MIN_MS")? {
            config.typing_delay_min = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "HIRO_TYPING_DELAY_MAX_MS")? {
            config.typing_delay_max = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "HIRO_VOICE_TIMEOUT_MS")? {
            config.voice_timeout = Duration::from_millis(ms);
        }
        if let Some(capacity) = parse_u64(&lookup, "HIRO_EVENT_CAPACITY")? {
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "HIRO_EVENT_CAPACITY".into(),
                    message: "must be greater than zero".into(),
                });
            }
            config.event_capacity = capacity as usize;
        }
        if let Some(path) = lookup("HIRO_SETTINGS_PATH") {
            if !path.trim().is_empty() {
                config.settings_path = Some(PathBuf::from(path));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing_delay_min > self.typing_delay_max {
            return Err(ConfigError::InvalidValue {
                key: "HIRO_TYPING_DELAY_MIN_MS".into(),
                message: format!(
                    "minimum delay {:?} exceeds maximum {:?}",
                    self.typing_delay_min, self.typing_delay_max
                ),
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HIRO_EVENT_CAPACITY".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_widget_timings() {
        let config = AssistantConfig::default();
        assert_eq!(config.assistant_name, "Hiro");
        assert_eq!(config.typing_delay_min, Duration::from_secs(1));
        assert_eq!(config.typing_delay_max, Duration::from_secs(2));
        assert_eq!(config.voice_timeout, Duration::from_secs(3));
        assert!(config.settings_path.is_none());
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = AssistantConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.voice_timeout, Duration::from_secs(3));
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn overrides_apply() {
        let config = AssistantConfig::from_lookup(lookup_from(&[
            ("HIRO_NAME", "Ada"),
            ("HIRO_TYPING_DELAY_MIN_MS", "10"),
            ("HIRO_TYPING_DELAY_MAX_MS", "20"),
            ("HIRO_VOICE_TIMEOUT_MS", "500"),
            ("HIRO_SETTINGS_PATH", "/tmp/hiro.json"),
        ]))
        .unwrap();
        assert_eq!(config.assistant_name, "Ada");
        assert_eq!(config.typing_delay_min, Duration::from_millis(10));
        assert_eq!(config.typing_delay_max, Duration::from_millis(20));
        assert_eq!(config.voice_timeout, Duration::from_millis(500));
        assert_eq!(config.settings_path, Some(PathBuf::from("/tmp/hiro.json")));
    }

    #[test]
    fn unparsable_value_is_rejected() {
        let err = AssistantConfig::from_lookup(lookup_from(&[("HIRO_VOICE_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "HIRO_VOICE_TIMEOUT_MS"),
        }
    }

    #[test]
    fn inverted_delay_window_is_rejected() {
        let result = AssistantConfig::from_lookup(lookup_from(&[
            ("HIRO_TYPING_DELAY_MIN_MS", "3000"),
            ("HIRO_TYPING_DELAY_MAX_MS", "1000"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = AssistantConfig::from_lookup(lookup_from(&[("HIRO_EVENT_CAPACITY", "0")]));
        assert!(result.is_err());
    }
}
