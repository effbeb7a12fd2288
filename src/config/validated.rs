//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::network::filter::{FilterChain, NameRegexFilter, WirelessFilter};

use super::cli::{Cli, Command};
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config. Regex patterns and durations are validated here, so the
/// command handlers never see raw configuration input.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the profile store file
    pub profile_file: PathBuf,

    /// OS command timeout
    pub timeout: Duration,

    /// Adapter filter for listings
    pub filter: FilterChain,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ profile_file: {}, timeout: {}s, filtered: {}, verbose: {} }}",
            self.profile_file.display(),
            self.timeout.as_secs(),
            !self.filter.is_empty(),
            self.verbose,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Regex patterns are invalid
    /// - The timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let profile_file = Self::resolve_profile_file(cli, toml);
        let timeout = Self::resolve_timeout(cli, toml)?;
        let filter = Self::build_filter(cli, toml)?;

        Ok(Self {
            profile_file,
            timeout,
            filter,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_profile_file(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        // CLI takes precedence
        if let Some(ref path) = cli.profile_file {
            return path.clone();
        }

        // Fall back to TOML, then the built-in default location
        toml.and_then(|t| t.store.profile_file.as_ref().map(PathBuf::from))
            .unwrap_or_else(defaults::profile_path)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.backend.timeout_secs))
            .unwrap_or(defaults::COMMAND_TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        let mut chain = FilterChain::new();

        // Filter flags only exist on the list command; other commands
        // address adapters by name and never consult the chain.
        let (cli_include, cli_exclude, wired_only) = match &cli.command {
            Command::List {
                include,
                exclude,
                wired_only,
            } => (include.as_slice(), exclude.as_slice(), *wired_only),
            _ => (&[][..], &[][..], false),
        };

        let exclude_wireless = wired_only || toml.is_some_and(|t| t.filter.exclude_wireless);
        if exclude_wireless {
            chain = chain.exclude(WirelessFilter);
        }

        // CLI patterns replace TOML patterns entirely, per pattern kind.
        let includes = if cli_include.is_empty() {
            toml.map_or(&[][..], |t| t.filter.include.as_slice())
        } else {
            cli_include
        };
        for pattern in includes {
            chain = chain.include(compile_pattern(pattern)?);
        }

        let excludes = if cli_exclude.is_empty() {
            toml.map_or(&[][..], |t| t.filter.exclude.as_slice())
        } else {
            cli_exclude
        };
        for pattern in excludes {
            chain = chain.exclude(compile_pattern(pattern)?);
        }

        Ok(chain)
    }
}

fn compile_pattern(pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
