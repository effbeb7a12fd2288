//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Profile store configuration section
    #[serde(default)]
    pub store: StoreSection,

    /// OS backend configuration section
    #[serde(default)]
    pub backend: BackendSection,

    /// Network adapter filter configuration
    #[serde(default)]
    pub filter: FilterSection,
}

/// Profile store configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Path to the profile store file
    pub profile_file: Option<String>,
}

/// OS backend configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSection {
    /// OS command timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Adapter filter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for adapters to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Hide wireless adapters in listings
    #[serde(default)]
    pub exclude_wireless: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipswitch Configuration File

[store]
# Path to the profile store file
# Default: <user config dir>/ipswitch/record.json
# profile_file = "record.json"

[backend]
# OS command timeout in seconds (default: 30)
# timeout_secs = 30

[filter]
# Regex patterns for adapters to include in listings (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^Ethernet", "^Wi-Fi"]

# Regex patterns for adapters to exclude from listings
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^vEthernet", "^Bluetooth"]

# Hide wireless adapters in listings
# exclude_wireless = false
"#
    .to_string()
}
