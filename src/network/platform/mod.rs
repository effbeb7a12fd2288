//! Platform-specific adapter backend implementations.
//!
//! # Platform Support
//!
//! - **Windows**: shells into PowerShell (`Get-NetAdapter`,
//!   `New-NetIPAddress`, etc.). Script construction and output parsing live
//!   in [`powershell`] and are compiled and tested on every platform.
//! - Other platforms have no backend yet; [`default_backend`] reports
//!   [`BackendError::Unavailable`].

pub mod powershell;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::PowerShellBackend;

// Re-export the platform backend under a uniform name for the binary.
#[cfg(windows)]
pub use windows::PowerShellBackend as PlatformBackend;

use std::time::Duration;

use super::BackendError;

/// Creates the platform's adapter backend with the given command timeout.
///
/// # Errors
///
/// Returns [`BackendError::Unavailable`] on platforms without a backend.
#[cfg(windows)]
pub fn default_backend(timeout: Duration) -> Result<PlatformBackend, BackendError> {
    Ok(PowerShellBackend::new(timeout))
}

/// Stub backend for platforms without an implementation.
///
/// Exists so the library's non-platform code keeps one code path; every
/// operation reports the backend as unavailable.
#[cfg(not(windows))]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

#[cfg(not(windows))]
mod unsupported {
    use super::super::{
        AdapterBackend, AdapterDescriptor, AdapterIpConfig, BackendError, StaticAssignment,
    };
    use super::UnsupportedBackend;

    fn unavailable() -> BackendError {
        BackendError::Unavailable {
            context: "no adapter backend exists for this platform".to_string(),
        }
    }

    impl AdapterBackend for UnsupportedBackend {
        fn enumerate(&self) -> Result<Vec<AdapterDescriptor>, BackendError> {
            Err(unavailable())
        }

        fn read_config(&self, _adapter: &str) -> Result<AdapterIpConfig, BackendError> {
            Err(unavailable())
        }

        fn clear_config(&self, _adapter: &str) -> Result<(), BackendError> {
            Err(unavailable())
        }

        fn apply_static(
            &self,
            _adapter: &str,
            _assignment: &StaticAssignment,
        ) -> Result<(), BackendError> {
            Err(unavailable())
        }

        fn enable_dhcp(&self, _adapter: &str) -> Result<(), BackendError> {
            Err(unavailable())
        }
    }
}

#[cfg(not(windows))]
pub use self::UnsupportedBackend as PlatformBackend;

/// Creates the platform's adapter backend with the given command timeout.
///
/// # Errors
///
/// Returns [`BackendError::Unavailable`] on platforms without a backend.
#[cfg(not(windows))]
pub fn default_backend(timeout: Duration) -> Result<PlatformBackend, BackendError> {
    let _ = timeout;
    Err(BackendError::Unavailable {
        context: "no adapter backend exists for this platform".to_string(),
    })
}
