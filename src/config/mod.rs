//! Configuration layer for ipswitch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`ProfileAction`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For filter patterns (`--include` / `--exclude` on `list`), CLI patterns
//! **replace** TOML patterns entirely (not merged). Include and exclude
//! patterns are handled independently: CLI includes replace only TOML
//! includes, and likewise for excludes.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--wired-only`) use OR semantics: if set `true` in either
//! CLI or TOML (`filter.exclude_wireless`), the result is `true`. Flags only
//! enable, not disable.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, ProfileAction};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
