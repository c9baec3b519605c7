//! Service configuration

use fleet_shared::limits;
use std::time::Duration;
use thiserror::Error;

pub const ENV_LISTEN_ADDR: &str = "FLEET_LISTEN_ADDR";
pub const ENV_API_KEY: &str = "FLEET_API_KEY";
pub const ENV_AUDIT_INTERVAL_MS: &str = "FLEET_AUDIT_INTERVAL_MS";
pub const ENV_SEED_DEMO: &str = "FLEET_SEED_DEMO";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Configuration for the dispatch service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the TCP listener binds to
    pub listen_addr: String,
    /// Shared secret every request header must carry
    pub api_key: String,
    /// Pause between battery audit passes
    pub audit_interval: Duration,
    /// Preload one drone per model at startup
    pub seed_demo_fleet: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            api_key: "fleet-dispatch-dev-key".into(),
            audit_interval: Duration::from_millis(limits::AUDIT_INTERVAL_MS),
            seed_demo_fleet: true,
        }
    }
}

impl ServiceConfig {
    /// Load `.env` if present, then apply overrides from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.listen_addr = addr;
        }

        if let Some(key) = lookup(ENV_API_KEY) {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: ENV_API_KEY,
                    value: key,
                    reason: "must not be empty",
                });
            }
            config.api_key = key;
        }

        if let Some(raw) = lookup(ENV_AUDIT_INTERVAL_MS) {
            let ms = match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_AUDIT_INTERVAL_MS,
                        value: raw,
                        reason: "expected a positive number of milliseconds",
                    })
                }
            };
            config.audit_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_SEED_DEMO) {
            config.seed_demo_fleet = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_SEED_DEMO,
                        value: raw,
                        reason: "expected a boolean",
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.audit_interval, Duration::from_secs(30));
        assert!(config.seed_demo_fleet);
    }

    #[test]
    fn test_overrides_applied() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_LISTEN_ADDR, "127.0.0.1:9900"),
            (ENV_API_KEY, "s3cret"),
            (ENV_AUDIT_INTERVAL_MS, "500"),
            (ENV_SEED_DEMO, "off"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9900");
        assert_eq!(config.api_key, "s3cret");
        assert_eq!(config.audit_interval, Duration::from_millis(500));
        assert!(!config.seed_demo_fleet);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_AUDIT_INTERVAL_MS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_AUDIT_INTERVAL_MS, .. }));

        let err = ServiceConfig::from_lookup(lookup(&[(ENV_SEED_DEMO, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_SEED_DEMO, .. }));
    }
}
