//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ipswitch: IPv4 adapter configuration switcher
///
/// Lists network adapters, reads their IPv4 configuration, and switches
/// them between static assignments and DHCP. Frequently used assignments
/// can be saved as named profiles and re-applied later.
#[derive(Debug, Parser)]
#[command(name = "ipswitch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the profile store file
    #[arg(long = "profile-file", global = true)]
    pub profile_file: Option<PathBuf>,

    /// OS command timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ipswitch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List active network adapters
    List {
        /// Regex pattern for adapters to include (can be specified multiple times)
        #[arg(long = "include", value_name = "PATTERN")]
        include: Vec<String>,

        /// Regex pattern for adapters to exclude (can be specified multiple times)
        #[arg(long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Hide wireless adapters
        #[arg(long = "wired-only")]
        wired_only: bool,
    },

    /// Show an adapter's current IPv4 configuration
    Show {
        /// Adapter name or alias
        adapter: String,
    },

    /// Apply a static IPv4 configuration to an adapter
    Set {
        /// Adapter name or alias
        adapter: String,

        /// IPv4 address to assign
        #[arg(long)]
        address: String,

        /// Dotted-decimal subnet mask (alternative to --prefix)
        #[arg(long)]
        mask: Option<String>,

        /// CIDR prefix length (alternative to --mask)
        #[arg(long)]
        prefix: Option<String>,

        /// Default gateway
        #[arg(long)]
        gateway: Option<String>,

        /// DNS server (can be specified multiple times, in resolution order)
        #[arg(long = "dns", value_name = "ADDRESS")]
        dns: Vec<String>,
    },

    /// Re-enable DHCP on an adapter
    Dhcp {
        /// Adapter name or alias
        adapter: String,
    },

    /// Remove all IPv4 configuration from an adapter
    Clear {
        /// Adapter name or alias
        adapter: String,
    },

    /// Manage saved IP profiles
    Profile {
        /// Profile operation
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ipswitch.toml")]
        output: PathBuf,
    },
}

/// Profile management subcommands.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List saved profiles
    List,

    /// Show one saved profile
    Show {
        /// The profile's IPv4 address (its key)
        address: String,
    },

    /// Save (or overwrite) a profile
    Add {
        /// IPv4 address; doubles as the profile's key
        address: String,

        /// Dotted-decimal subnet mask (alternative to --prefix)
        #[arg(long)]
        mask: Option<String>,

        /// CIDR prefix length (alternative to --mask)
        #[arg(long)]
        prefix: Option<String>,

        /// Default gateway
        #[arg(long)]
        gateway: Option<String>,

        /// DNS server (can be specified multiple times, in resolution order)
        #[arg(long = "dns", value_name = "ADDRESS")]
        dns: Vec<String>,
    },

    /// Delete a saved profile
    Delete {
        /// The profile's IPv4 address (its key)
        address: String,
    },

    /// Apply a saved profile to an adapter
    Apply {
        /// Adapter name or alias
        adapter: String,

        /// The profile's IPv4 address (its key)
        address: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
