//! Windows adapter backend shelling into PowerShell.
//!
//! Mirrors what the OS's own tooling exposes: enumeration and reads via the
//! `Get-Net*` cmdlets, mutations via `New-NetIPAddress` and friends. Every
//! invocation goes through one runner that hides the console window,
//! enforces the configured timeout and maps exit status to [`BackendError`].

use std::io::Read;
use std::os::windows::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crate::network::{
    AdapterBackend, AdapterDescriptor, AdapterIpConfig, BackendError, StaticAssignment,
};

use super::powershell;

/// Process creation flag suppressing the console window that would
/// otherwise flash up for every invocation.
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Poll interval while waiting for the child to exit.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Windows implementation of [`AdapterBackend`] using PowerShell.
///
/// All calls are synchronous and may take hundreds of milliseconds; run
/// them off any latency-sensitive thread.
#[derive(Debug, Clone)]
pub struct PowerShellBackend {
    timeout: Duration,
}

impl PowerShellBackend {
    /// Creates a backend enforcing the given per-command timeout.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs a script and returns its stdout.
    ///
    /// `adapter` is the name reported in not-found errors; pass `None` for
    /// scripts that do not target a single adapter.
    fn run_script(&self, script: &str, adapter: Option<&str>) -> Result<String, BackendError> {
        let mut child = Command::new("powershell")
            .args([
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                script,
            ])
            .creation_flags(CREATE_NO_WINDOW)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BackendError::Unavailable {
                context: format!("failed to start powershell: {e}"),
            })?;

        // Drain the pipes on separate threads so a chatty script cannot
        // fill a pipe buffer and deadlock against our wait loop.
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        let status = self.wait_with_timeout(&mut child)?;

        let stdout = join_pipe_reader(stdout_reader);
        let stderr = join_pipe_reader(stderr_reader);

        match status_code(status) {
            0 => Ok(stdout),
            powershell::EXIT_ADAPTER_NOT_FOUND => Err(BackendError::AdapterNotFound {
                name: adapter.unwrap_or("<unknown>").to_string(),
            }),
            _ => Err(classify_failure(&stderr)),
        }
    }

    /// Polls the child until it exits or the timeout elapses, killing it
    /// on expiry.
    fn wait_with_timeout(
        &self,
        child: &mut Child,
    ) -> Result<std::process::ExitStatus, BackendError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(BackendError::Timeout {
                            limit: self.timeout,
                        });
                    }
                    std::thread::sleep(WAIT_POLL);
                }
                Err(e) => {
                    return Err(BackendError::Unavailable {
                        context: format!("failed to wait for powershell: {e}"),
                    });
                }
            }
        }
    }
}

/// Reads a child pipe to the end on a worker thread.
///
/// Output is decoded lossily: localized consoles may emit non-UTF-8 bytes
/// in diagnostics, and a garbled error message beats a decode failure.
fn spawn_pipe_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<std::thread::JoinHandle<String>> {
    pipe.map(|mut reader| {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = reader.read_to_end(&mut buffer);
            String::from_utf8_lossy(&buffer).into_owned()
        })
    })
}

fn join_pipe_reader(handle: Option<std::thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn status_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Maps a failed invocation's stderr to the error taxonomy.
///
/// Privilege failures must surface as `Unavailable`, not as a generic
/// command failure, so the caller can suggest elevation.
fn classify_failure(stderr: &str) -> BackendError {
    let trimmed = stderr.trim();
    let lowered = trimmed.to_lowercase();

    if lowered.contains("access is denied")
        || lowered.contains("permissiondenied")
        || lowered.contains("requires elevation")
        || lowered.contains("administrator")
    {
        return BackendError::Unavailable {
            context: format!("insufficient privilege: {trimmed}"),
        };
    }

    BackendError::CommandFailed {
        detail: if trimmed.is_empty() {
            "powershell reported failure with no diagnostic output".to_string()
        } else {
            trimmed.to_string()
        },
    }
}

impl AdapterBackend for PowerShellBackend {
    fn enumerate(&self) -> Result<Vec<AdapterDescriptor>, BackendError> {
        let output = self.run_script(&powershell::enumerate_script(), None)?;
        powershell::parse_adapter_list(&output)
    }

    fn read_config(&self, adapter: &str) -> Result<AdapterIpConfig, BackendError> {
        let output = self.run_script(&powershell::read_config_script(adapter), Some(adapter))?;
        powershell::parse_ip_config(&output)
    }

    fn clear_config(&self, adapter: &str) -> Result<(), BackendError> {
        self.run_script(&powershell::clear_script(adapter), Some(adapter))?;
        Ok(())
    }

    fn apply_static(
        &self,
        adapter: &str,
        assignment: &StaticAssignment,
    ) -> Result<(), BackendError> {
        self.run_script(
            &powershell::apply_static_script(adapter, assignment),
            Some(adapter),
        )?;
        Ok(())
    }

    fn enable_dhcp(&self, adapter: &str) -> Result<(), BackendError> {
        self.run_script(&powershell::enable_dhcp_script(adapter), Some(adapter))?;
        Ok(())
    }
}
