//! Runtime configuration read from the environment.

use crate::core::constants::MAX_ROUNDS;
use crate::error::{GladiatorError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ORACLE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ORACLE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 8000;

pub const ENV_API_KEY: &str = "GOOGLE_GEMINI_API_KEY";
pub const ENV_ORACLE_MODEL: &str = "GLADIATORS_ORACLE_MODEL";
pub const ENV_ORACLE_URL: &str = "GLADIATORS_ORACLE_URL";
pub const ENV_ORACLE_TIMEOUT_MS: &str = "GLADIATORS_ORACLE_TIMEOUT_MS";
pub const ENV_DATA_DIR: &str = "GLADIATORS_DATA_DIR";
pub const ENV_MAX_ROUNDS: &str = "GLADIATORS_MAX_ROUNDS";

#[derive(Debug, Clone, PartialEq)]
pub struct GladiatorConfig {
    /// No key means rule-based play only.
    pub oracle_api_key: Option<String>,
    pub oracle_model: String,
    pub oracle_url: String,
    pub oracle_timeout: Duration,
    pub data_dir: PathBuf,
    pub max_rounds: u32,
}

impl Default for GladiatorConfig {
    fn default() -> Self {
        Self {
            oracle_api_key: None,
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            oracle_timeout: Duration::from_millis(DEFAULT_ORACLE_TIMEOUT_MS),
            data_dir: default_data_dir(),
            max_rounds: MAX_ROUNDS,
        }
    }
}

/// `~/.gladiators/fighters`, or a relative `.gladiators/fighters` without a home.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".gladiators")
        .join("fighters")
}

impl GladiatorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_ms = parse_var(ENV_ORACLE_TIMEOUT_MS, get(ENV_ORACLE_TIMEOUT_MS))?;
        let max_rounds = parse_var(ENV_MAX_ROUNDS, get(ENV_MAX_ROUNDS))?;
        if max_rounds == Some(0) {
            return Err(GladiatorError::Config(format!(
                "{} must be at least 1",
                ENV_MAX_ROUNDS
            )));
        }

        Ok(Self {
            oracle_api_key: get(ENV_API_KEY),
            oracle_model: get(ENV_ORACLE_MODEL).unwrap_or(defaults.oracle_model),
            oracle_url: get(ENV_ORACLE_URL).unwrap_or(defaults.oracle_url),
            oracle_timeout: timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.oracle_timeout),
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            max_rounds: max_rounds.unwrap_or(defaults.max_rounds),
        })
    }

    pub fn battle_config(&self) -> BattleConfig {
        BattleConfig {
            max_rounds: self.max_rounds,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                GladiatorError::Config(format!("{} is not a valid number: '{}'", key, raw))
            }),
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleConfig {
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
        }
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
    fn test_defaults() {
        let config = GladiatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.oracle_api_key, None);
        assert_eq!(config.oracle_model, "gemini-2.5-flash");
        assert_eq!(config.oracle_timeout, Duration::from_millis(8000));
        assert_eq!(config.max_rounds, 30);
        assert!(config.data_dir.ends_with(".gladiators/fighters"));
        assert_eq!(config.battle_config(), BattleConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = GladiatorConfig::from_lookup(lookup(&[
            ("GOOGLE_GEMINI_API_KEY", "secret"),
            ("GLADIATORS_ORACLE_MODEL", "gemini-pro"),
            ("GLADIATORS_ORACLE_TIMEOUT_MS", "250"),
            ("GLADIATORS_DATA_DIR", "/tmp/arena"),
            ("GLADIATORS_MAX_ROUNDS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.oracle_api_key.as_deref(), Some("secret"));
        assert_eq!(config.oracle_model, "gemini-pro");
        assert_eq!(config.oracle_timeout, Duration::from_millis(250));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/arena"));
        assert_eq!(config.battle_config().max_rounds, 12);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config =
            GladiatorConfig::from_lookup(lookup(&[("GOOGLE_GEMINI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.oracle_api_key, None);
    }

    #[test]
    fn test_bad_numbers_rejected() {
        for (key, raw) in [
            ("GLADIATORS_MAX_ROUNDS", "lots"),
            ("GLADIATORS_MAX_ROUNDS", "0"),
            ("GLADIATORS_ORACLE_TIMEOUT_MS", "-5"),
        ] {
            let err = GladiatorConfig::from_lookup(lookup(&[(key, raw)])).unwrap_err();
            assert!(matches!(err, GladiatorError::Config(_)), "{}={}", key, raw);
        }
    }
}
