use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub log_path: PathBuf,
    pub static_dir: PathBuf,
    pub presence_timeout: Duration,
    pub session_cookie_max_age_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "SKETCHPAD_BIND_ADDR", "127.0.0.1:5001");
        let log_path = PathBuf::from(value_or_default(
            &lookup,
            "SKETCHPAD_LOG_PATH",
            "drawings.json",
        ));
        let static_dir = PathBuf::from(value_or_default(&lookup, "SKETCHPAD_STATIC_DIR", "static"));

        let presence_timeout_secs =
            value_or_default(&lookup, "SKETCHPAD_PRESENCE_TIMEOUT_SECS", "10")
                .parse::<u64>()
                .map_err(|_| {
                    ConfigError::Invalid(
                        "SKETCHPAD_PRESENCE_TIMEOUT_SECS must be an integer in [1, 300]"
                            .to_string(),
                    )
                })?;
        if !(1..=300).contains(&presence_timeout_secs) {
            return Err(ConfigError::Invalid(
                "SKETCHPAD_PRESENCE_TIMEOUT_SECS must be in [1, 300]".to_string(),
            ));
        }

        let session_cookie_max_age_secs =
            value_or_default(&lookup, "SKETCHPAD_SESSION_COOKIE_MAX_AGE_SECS", "86400")
                .parse::<u64>()
                .map_err(|_| {
                    ConfigError::Invalid(
                        "SKETCHPAD_SESSION_COOKIE_MAX_AGE_SECS must be an integer in [60, 31536000]"
                            .to_string(),
                    )
                })?;
        if !(60..=31_536_000).contains(&session_cookie_max_age_secs) {
            return Err(ConfigError::Invalid(
                "SKETCHPAD_SESSION_COOKIE_MAX_AGE_SECS must be in [60, 31536000]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            log_path,
            static_dir,
            presence_timeout: Duration::from_secs(presence_timeout_secs),
            session_cookie_max_age_secs,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
pub(crate) fn test_config(log_path: PathBuf, static_dir: PathBuf) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        log_path,
        static_dir,
        presence_timeout: Duration::from_secs(10),
        session_cookie_max_age_secs: 86_400,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(map: &HashMap<&str, &str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_defaults_match_reference_server() {
        let config = config_from(&HashMap::new()).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:5001");
        assert_eq!(config.log_path, PathBuf::from("drawings.json"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(!config.log_path.starts_with(&config.static_dir));
        assert_eq!(config.presence_timeout, Duration::from_secs(10));
    }

    #[test]
    fn config_reads_overrides_and_trims() {
        let mut map = HashMap::new();
        map.insert("SKETCHPAD_BIND_ADDR", " 0.0.0.0:8080 ");
        map.insert("SKETCHPAD_LOG_PATH", "/var/lib/sketchpad/strokes.json");
        map.insert("SKETCHPAD_PRESENCE_TIMEOUT_SECS", "30");
        let config = config_from(&map).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(
            config.log_path,
            PathBuf::from("/var/lib/sketchpad/strokes.json")
        );
        assert_eq!(config.presence_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_rejects_out_of_range_timeout() {
        for value in ["0", "301", "ten"] {
            let mut map = HashMap::new();
            map.insert("SKETCHPAD_PRESENCE_TIMEOUT_SECS", value);
            let err = config_from(&map).unwrap_err();
            assert!(err.to_string().contains("SKETCHPAD_PRESENCE_TIMEOUT_SECS"));
        }
    }

    #[test]
    fn config_rejects_short_cookie_lifetime() {
        let mut map = HashMap::new();
        map.insert("SKETCHPAD_SESSION_COOKIE_MAX_AGE_SECS", "5");
        assert!(config_from(&map).is_err());
    }
}
