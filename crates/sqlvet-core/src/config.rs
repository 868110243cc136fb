//! Configuration schema (sqlvet.toml)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a source file is cut into queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Split on `;`
    #[default]
    Statement,

    /// One query per non-blank line
    Line,
}

impl std::str::FromStr for SplitMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "statement" => Ok(Self::Statement),
            "line" => Ok(Self::Line),
            other => Err(ConfigError::ParseError(format!(
                "unknown split mode '{}', expected 'statement' or 'line'",
                other
            ))),
        }
    }
}

/// Input selection rules
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputRules {
    /// Skip these files when reading a directory (glob patterns on the file name)
    #[serde(default)]
    pub skip_files: Vec<String>,
}

impl InputRules {
    /// Check if a file should be skipped
    pub fn is_file_skipped(&self, file_name: &str) -> bool {
        self.skip_files.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, file_name)
            } else {
                pattern == file_name
            }
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dialect name, resolved through the dialect registry
    #[serde(default = "default_dialect")]
    pub dialect: String,

    #[serde(default)]
    pub split: SplitMode,

    /// Directory that receives one JSON document per query
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the subquery and set-operation checks
    #[serde(default)]
    pub extended_checks: bool,

    /// Exit non-zero when any query fails
    #[serde(default = "default_true")]
    pub fail_on_invalid: bool,

    /// Where to write the run summary, if anywhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_file: Option<PathBuf>,

    #[serde(default)]
    pub input: InputRules,
}

fn default_dialect() -> String {
    "ansi".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            split: SplitMode::default(),
            output_dir: default_output_dir(),
            extended_checks: false,
            fail_on_invalid: true,
            summary_file: None,
            input: InputRules::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Simple glob matching (a single `*` wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
