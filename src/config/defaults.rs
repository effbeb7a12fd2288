//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default profile store file name.
pub const PROFILE_FILE: &str = "record.json";

/// Default OS command timeout in seconds.
pub const COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default OS command timeout as Duration.
#[must_use]
pub const fn command_timeout() -> Duration {
    Duration::from_secs(COMMAND_TIMEOUT_SECS)
}

/// Default profile store path: `<user config dir>/ipswitch/record.json`,
/// falling back to the working directory when no config dir exists.
#[must_use]
pub fn profile_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(PROFILE_FILE),
        |dir| dir.join("ipswitch").join(PROFILE_FILE),
    )
}
