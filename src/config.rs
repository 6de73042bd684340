use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::growth::{DEFAULT_FLOWERING_WEEKS, MAX_FLOWERING_WEEKS};
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_flowering_weeks")]
    pub default_flowering_weeks: i64,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_water")]
    pub water: String,
    #[serde(default = "default_start_flowering")]
    pub start_flowering: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
    #[serde(default = "default_help")]
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_vegetative")]
    pub vegetative: String,
    #[serde(default = "default_flowering")]
    pub flowering: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_flowering_weeks: default_flowering_weeks(),
            server: ServerConfig::default(),
            sidebar_width_percent: default_sidebar_width(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            water: default_water(),
            start_flowering: default_start_flowering(),
            delete: default_delete(),
            refresh: default_refresh(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            toggle_sidebar: default_toggle_sidebar(),
            help: default_help(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            vegetative: default_vegetative(),
            flowering: default_flowering(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            vegetative: "green".to_string(),
            flowering: "magenta".to_string(),
        });

        themes.insert("monochrome".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "white".to_string(),
            vegetative: "white".to_string(),
            flowering: "gray".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("grow.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/grow-tracker/grow.db".to_string()
    }
}

fn default_flowering_weeks() -> i64 {
    DEFAULT_FLOWERING_WEEKS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sidebar_width() -> u16 {
    30
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_water() -> String {
    "w".to_string()
}

fn default_start_flowering() -> String {
    "f".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_refresh() -> String {
    "r".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_vegetative() -> String {
    "green".to_string()
}

fn default_flowering() -> String {
    "lightmagenta".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and database paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            let mut config = Self::load_from_path(&config_path)?;
            // Keep the database inside the profile's data dir unless the user pointed elsewhere
            if config.database_path == default_database_path() {
                config.database_path = Self::default_database_path_for_profile(profile);
            }
            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            if let Err(e) = config.save_to_path(&config_path) {
                tracing::error!(path = ?config_path, error = %e, "failed to save default config");
                return Err(e);
            }
            tracing::info!(path = ?config_path, "created default config");
            Ok(config)
        }
    }

    /// Load configuration from an explicit file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    /// Replace values that would break the calculator with their defaults
    fn normalize(&mut self) {
        if !(1..=MAX_FLOWERING_WEEKS).contains(&self.default_flowering_weeks) {
            tracing::warn!(
                value = self.default_flowering_weeks,
                "default_flowering_weeks must be between 1 and {}, using {}",
                MAX_FLOWERING_WEEKS,
                DEFAULT_FLOWERING_WEEKS
            );
            self.default_flowering_weeks = DEFAULT_FLOWERING_WEEKS;
        }
    }

    /// Save configuration to an explicit file path
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("grow.db").to_string_lossy().to_string()
        } else {
            format!("~/.local/share/{}/grow.db", profile.app_name())
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Get the currently active theme, falling back to the default preset
    pub fn get_active_theme(&self) -> Theme {
        self.themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default()
    }

    /// Set the active theme by name
    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }

        self.current_theme = name.to_string();
        Ok(())
    }

    /// Get all available theme names (presets + user-defined), sorted
    pub fn get_available_themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = Theme::get_preset_themes().keys().cloned().collect();
        for theme_name in self.themes.keys() {
            if !themes.contains(theme_name) {
                themes.push(theme_name.clone());
            }
        }
        themes.sort();
        themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("database_path = \"/tmp/grow.db\"\n").unwrap();
        assert_eq!(config.database_path, "/tmp/grow.db");
        assert_eq!(config.default_flowering_weeks, 8);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.key_bindings.water, "w");
        assert_eq!(config.current_theme, "default");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let mut config = Config::default();
        config.default_flowering_weeks = 9;
        config.server.port = 8088;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.default_flowering_weeks, 9);
        assert_eq!(loaded.server.port, 8088);
        assert_eq!(loaded.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn non_positive_default_weeks_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_flowering_weeks = 0\n").unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.default_flowering_weeks, DEFAULT_FLOWERING_WEEKS);
    }

    #[test]
    fn oversized_default_weeks_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_flowering_weeks = 9223372036854775807\n").unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.default_flowering_weeks, DEFAULT_FLOWERING_WEEKS);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(config.set_theme("neon"), Err(ConfigError::ThemeNotFound(_))));
        config.set_theme("light").unwrap();
        assert_eq!(config.get_active_theme().bg, "white");
    }

    #[test]
    fn user_theme_wins_over_preset() {
        let mut config = Config::default();
        let custom = Theme {
            vegetative: "yellow".to_string(),
            ..Theme::default()
        };
        config.themes.insert("light".to_string(), custom.clone());
        config.set_theme("light").unwrap();
        assert_eq!(config.get_active_theme(), custom);
        assert_eq!(config.get_available_themes(), vec!["default", "light", "monochrome"]);
    }
}
