// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::probability::PercentPolicy;

/// Default window during which a chat kill count and a loot event are
/// treated as the same completion.
pub const DEFAULT_DEDUP_WINDOW_MS: u64 = 2000;

/// Default quiet period before a pending snapshot is written.
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 500;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the progress snapshot is persisted
    pub state_path: PathBuf,
    /// Bundled drop catalogue (drops.json)
    pub catalogue_path: PathBuf,
    /// Optional collection-log plugin export to import once per session
    pub import_path: Option<PathBuf>,
    /// Chat/loot dedup window
    pub dedup_window: Duration,
    /// Save debounce interval
    pub save_debounce: Duration,
    /// Highlight drops whose chance is at least this percentage (0 disables)
    pub highlight_threshold: u8,
    /// Leave obtained items out of dry reports
    pub show_only_unobtained: bool,
    /// Parse kill counts out of game chat
    pub track_kc_from_chat: bool,
    /// Parse "new item added" collection log notifications
    pub auto_detect_collection_log: bool,
    /// How chances are rendered as percentages
    pub percent_policy: PercentPolicy,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("data/progress.json"),
            catalogue_path: PathBuf::from("data/drops.json"),
            import_path: None,
            dedup_window: Duration::from_millis(DEFAULT_DEDUP_WINDOW_MS),
            save_debounce: Duration::from_millis(DEFAULT_SAVE_DEBOUNCE_MS),
            highlight_threshold: 50,
            show_only_unobtained: false,
            track_kc_from_chat: true,
            auto_detect_collection_log: true,
            percent_policy: PercentPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let highlight_threshold: u8 = parse_var("CLOG_HIGHLIGHT_THRESHOLD", 50)?;
        if highlight_threshold > 100 {
            return Err(ConfigError::Invalid {
                name: "CLOG_HIGHLIGHT_THRESHOLD",
                value: highlight_threshold.to_string(),
            });
        }

        Ok(Self {
            state_path: env::var("CLOG_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/progress.json")),
            catalogue_path: env::var("CLOG_CATALOGUE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/drops.json")),
            import_path: env::var("CLOG_IMPORT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            dedup_window: Duration::from_millis(parse_var(
                "CLOG_DEDUP_WINDOW_MS",
                DEFAULT_DEDUP_WINDOW_MS,
            )?),
            save_debounce: Duration::from_millis(parse_var(
                "CLOG_SAVE_DEBOUNCE_MS",
                DEFAULT_SAVE_DEBOUNCE_MS,
            )?),
            highlight_threshold,
            show_only_unobtained: parse_bool("CLOG_SHOW_ONLY_UNOBTAINED", false)?,
            track_kc_from_chat: parse_bool("CLOG_TRACK_KC_FROM_CHAT", true)?,
            auto_detect_collection_log: parse_bool("CLOG_AUTO_DETECT_COLLECTION_LOG", true)?,
            percent_policy: parse_var("CLOG_PERCENT_POLICY", PercentPolicy::default())?,
        })
    }

    /// Highlight threshold as a probability, `None` when disabled.
    pub fn highlight_probability(&self) -> Option<f64> {
        (self.highlight_threshold > 0).then(|| f64::from(self.highlight_threshold) / 100.0)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Only this test touches the process environment.
        env::set_var("CLOG_STATE_PATH", "/tmp/clog/progress.json");
        env::set_var("CLOG_DEDUP_WINDOW_MS", "1500");
        env::set_var("CLOG_TRACK_KC_FROM_CHAT", "off");
        env::set_var("CLOG_HIGHLIGHT_THRESHOLD", "75");
        env::set_var("CLOG_PERCENT_POLICY", "precise");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.state_path, PathBuf::from("/tmp/clog/progress.json"));
        assert_eq!(config.dedup_window, Duration::from_millis(1500));
        assert!(!config.track_kc_from_chat);
        assert!(config.auto_detect_collection_log);
        assert_eq!(config.highlight_probability(), Some(0.75));
        assert_eq!(config.percent_policy, PercentPolicy::precise());

        env::set_var("CLOG_DEDUP_WINDOW_MS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "CLOG_DEDUP_WINDOW_MS",
                ..
            }
        ));

        env::set_var("CLOG_DEDUP_WINDOW_MS", "2000");
        env::set_var("CLOG_PERCENT_POLICY", "exact");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::Invalid {
                name: "CLOG_PERCENT_POLICY",
                ..
            }
        ));

        env::set_var("CLOG_PERCENT_POLICY", " Default ");
        assert_eq!(
            Config::from_env().unwrap().percent_policy,
            PercentPolicy::default()
        );

        env::set_var("CLOG_HIGHLIGHT_THRESHOLD", "150");
        assert!(Config::from_env().is_err());

        for name in [
            "CLOG_STATE_PATH",
            "CLOG_DEDUP_WINDOW_MS",
            "CLOG_TRACK_KC_FROM_CHAT",
            "CLOG_HIGHLIGHT_THRESHOLD",
            "CLOG_PERCENT_POLICY",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_highlight_disabled_at_zero() {
        let config = Config {
            highlight_threshold: 0,
            ..Config::default()
        };
        assert_eq!(config.highlight_probability(), None);
    }
}
