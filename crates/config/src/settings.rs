// Trigger settings
// Loaded from ~/.config/atcomplete/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate settings file
pub const CONFIG_ENV: &str = "ATCOMPLETE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Trigger
    #[serde(rename = "trigger.chars")]
    pub trigger_chars: Vec<char>,

    #[serde(rename = "trigger.formulaOpen")]
    pub formula_open: char,

    // Input
    #[serde(rename = "input.keepTrailingNewline")]
    pub keep_trailing_newline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trigger_chars: vec!['@'],
            formula_open: '(',
            keep_trailing_newline: false,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Characters that open a mention or formula region.
    // Type the character twice to insert it literally.
    "trigger.chars": ["@"],

    // Character that switches a mention into formula mode
    // when typed right after the trigger, e.g. @(SUM(
    "trigger.formulaOpen": "(",

    // Keep the final line ending when reading text from stdin
    "input.keepTrailingNewline": false
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atcomplete");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            if let Err(e) = Self::write_default_file(&path) {
                log::warn!("could not create {}: {}", path.display(), e);
            }
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate a specific settings file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse settings JSON, allowing `//` line comments
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: Settings = serde_json::from_str(&cleaned)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_chars.is_empty() {
            return Err(ConfigError::Validation("trigger.chars must not be empty".into()));
        }

        for &c in &self.trigger_chars {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | '(' | ')' | ',') {
                return Err(ConfigError::Validation(format!(
                    "{:?} cannot be a trigger: it can appear inside a mention",
                    c
                )));
            }
        }

        let open = self.formula_open;
        if open.is_alphanumeric() || open.is_whitespace() || matches!(open, '_' | '.' | ')' | ',') {
            return Err(ConfigError::Validation(format!(
                "{:?} cannot open formula mode",
                open
            )));
        }
        if self.trigger_chars.contains(&open) {
            return Err(ConfigError::Validation(format!(
                "{:?} is both a trigger and the formula-open character",
                open
            )));
        }

        Ok(())
    }

    /// Save settings to a path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Create default settings file with comments
    pub fn write_default_file(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_FILE)?;
        Ok(())
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
