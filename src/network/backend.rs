//! Adapter backend trait and error types.

use std::time::Duration;

use thiserror::Error;

use super::{AdapterDescriptor, AdapterIpConfig};

/// Error type for backend operations.
///
/// Describes what went wrong without dictating recovery strategy. Privilege
/// and availability failures are distinct from not-found failures so callers
/// can tell "run elevated" apart from "check the adapter name".
#[derive(Debug, Error)]
pub enum BackendError {
    /// The OS facility could not be invoked at all (missing tooling,
    /// insufficient privilege, unsupported platform).
    #[error("Backend unavailable: {context}")]
    Unavailable {
        /// What was being attempted when the facility failed.
        context: String,
    },

    /// The named adapter does not exist.
    #[error("Adapter '{name}' not found")]
    AdapterNotFound {
        /// The adapter name that failed to resolve.
        name: String,
    },

    /// The OS tool ran but reported failure.
    #[error("Backend command failed: {detail}")]
    CommandFailed {
        /// Stderr or status detail from the tool.
        detail: String,
    },

    /// The OS tool did not finish within the configured time limit.
    #[error("Backend command timed out after {limit:?}")]
    Timeout {
        /// The limit that was exceeded.
        limit: Duration,
    },

    /// The OS tool produced output this crate cannot parse.
    #[error("Unparseable backend output: {message}")]
    MalformedOutput {
        /// What failed to parse.
        message: String,
    },
}

/// A complete static IPv4 assignment, in both subnet notations.
///
/// This is the typed parameter block handed to backend implementations:
/// the backend formats structured fields into its own command invocation
/// and owns the escaping. Callers never build command strings themselves.
/// The engine fills `subnet_mask` and `prefix_length` from the same
/// [`crate::subnet::SubnetSpec`], so the two fields always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssignment {
    /// Dotted-decimal IPv4 address.
    pub address: String,
    /// Dotted-decimal subnet mask.
    pub subnet_mask: String,
    /// CIDR prefix length equivalent of `subnet_mask`.
    pub prefix_length: u8,
    /// Default gateway, if one should be set.
    pub gateway: Option<String>,
    /// DNS servers in resolution order; empty leaves DNS untouched.
    pub dns_servers: Vec<String>,
}

/// Trait for reading and mutating live OS adapter configuration.
///
/// # Design
///
/// - The engine and stores are testable with a mock implementation;
///   no real OS access is required outside `platform`.
/// - All operations are synchronous, blocking calls; concrete
///   implementations shell out to OS-native tooling and may take
///   hundreds of milliseconds.
/// - `clear_config` must be idempotent: clearing an already-clear adapter
///   succeeds. The engine relies on this for its unconditional
///   clear-before-set sequencing.
pub trait AdapterBackend {
    /// Enumerates the host's active network adapters.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the OS facility cannot be
    /// invoked.
    fn enumerate(&self) -> Result<Vec<AdapterDescriptor>, BackendError>;

    /// Reads the live IPv4 configuration of the named adapter.
    ///
    /// The returned `subnet_mask` may be a raw prefix-length string;
    /// normalization to dotted-decimal is the engine's job.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::AdapterNotFound`] or
    /// [`BackendError::Unavailable`].
    fn read_config(&self, adapter: &str) -> Result<AdapterIpConfig, BackendError>;

    /// Disables DHCP and removes address, default route and DNS overrides.
    ///
    /// Idempotent: succeeds on an already-clear adapter.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the underlying tool fails.
    fn clear_config(&self, adapter: &str) -> Result<(), BackendError>;

    /// Writes a static IPv4 assignment to the named adapter.
    ///
    /// Callers are expected to clear first; see
    /// [`crate::engine::ConfigurationEngine::apply_static`].
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the underlying tool fails.
    fn apply_static(&self, adapter: &str, assignment: &StaticAssignment)
    -> Result<(), BackendError>;

    /// Re-enables DHCP address assignment on the named adapter.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the underlying tool fails.
    fn enable_dhcp(&self, adapter: &str) -> Result<(), BackendError>;
}

/// Mock backend for testing.
///
/// Records every call in order and replays scripted results, so tests can
/// assert on the exact backend call sequence (e.g. that a clear always
/// precedes an apply).
#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::{
        AdapterBackend, AdapterDescriptor, AdapterIpConfig, BackendError, StaticAssignment,
    };

    /// One recorded backend invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum BackendCall {
        Enumerate,
        ReadConfig(String),
        ClearConfig(String),
        ApplyStatic(String, StaticAssignment),
        EnableDhcp(String),
    }

    /// A scripted, call-recording implementation of [`AdapterBackend`].
    #[derive(Debug, Default)]
    pub struct MockBackend {
        calls: Mutex<Vec<BackendCall>>,
        adapters: Vec<AdapterDescriptor>,
        configs: HashMap<String, AdapterIpConfig>,
        enumerate_errors: Mutex<VecDeque<BackendError>>,
        mutation_results: Mutex<VecDeque<Result<(), BackendError>>>,
    }

    impl MockBackend {
        /// Creates a mock with no adapters and all operations succeeding.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a mock that enumerates the given adapters.
        #[must_use]
        pub fn with_adapters(adapters: Vec<AdapterDescriptor>) -> Self {
            Self {
                adapters,
                ..Self::default()
            }
        }

        /// Sets the configuration returned by `read_config` for an adapter.
        #[must_use]
        pub fn with_config(mut self, adapter: &str, config: AdapterIpConfig) -> Self {
            self.configs.insert(adapter.to_string(), config);
            self
        }

        /// Queues an error for the next `enumerate` call.
        #[must_use]
        pub fn failing_enumerate(self, error: BackendError) -> Self {
            self.enumerate_errors.lock().unwrap().push_back(error);
            self
        }

        /// Queues an error for the next mutating call (clear/apply/dhcp).
        #[must_use]
        pub fn failing_mutation(self, error: BackendError) -> Self {
            self.mutation_results.lock().unwrap().push_back(Err(error));
            self
        }

        /// Queues a success for the next mutating call, so a later queued
        /// error lands on the call after it.
        #[must_use]
        pub fn passing_mutation(self) -> Self {
            self.mutation_results.lock().unwrap().push_back(Ok(()));
            self
        }

        /// Returns the recorded call sequence.
        pub fn calls(&self) -> Vec<BackendCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: BackendCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn next_mutation_result(&self) -> Result<(), BackendError> {
            self.mutation_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    impl AdapterBackend for MockBackend {
        fn enumerate(&self) -> Result<Vec<AdapterDescriptor>, BackendError> {
            self.record(BackendCall::Enumerate);
            match self.enumerate_errors.lock().unwrap().pop_front() {
                Some(error) => Err(error),
                None => Ok(self.adapters.clone()),
            }
        }

        fn read_config(&self, adapter: &str) -> Result<AdapterIpConfig, BackendError> {
            self.record(BackendCall::ReadConfig(adapter.to_string()));
            self.configs
                .get(adapter)
                .cloned()
                .ok_or_else(|| BackendError::AdapterNotFound {
                    name: adapter.to_string(),
                })
        }

        fn clear_config(&self, adapter: &str) -> Result<(), BackendError> {
            self.record(BackendCall::ClearConfig(adapter.to_string()));
            self.next_mutation_result()
        }

        fn apply_static(
            &self,
            adapter: &str,
            assignment: &StaticAssignment,
        ) -> Result<(), BackendError> {
            self.record(BackendCall::ApplyStatic(
                adapter.to_string(),
                assignment.clone(),
            ));
            self.next_mutation_result()
        }

        fn enable_dhcp(&self, adapter: &str) -> Result<(), BackendError> {
            self.record(BackendCall::EnableDhcp(adapter.to_string()));
            self.next_mutation_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{BackendCall, MockBackend};
    use super::*;
    use crate::network::AdapterDescriptor;

    #[test]
    fn mock_records_call_sequence() {
        let backend = MockBackend::new();

        let _ = backend.enumerate();
        let _ = backend.clear_config("Ethernet0");
        let _ = backend.enable_dhcp("Ethernet0");

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Enumerate,
                BackendCall::ClearConfig("Ethernet0".to_string()),
                BackendCall::EnableDhcp("Ethernet0".to_string()),
            ]
        );
    }

    #[test]
    fn mock_read_config_reports_unknown_adapters() {
        let backend = MockBackend::new();

        let err = backend.read_config("ghost").unwrap_err();

        assert!(matches!(err, BackendError::AdapterNotFound { name } if name == "ghost"));
    }

    #[test]
    fn mock_enumerate_returns_scripted_adapters() {
        let adapter = AdapterDescriptor::new("Ethernet0", "Ethernet0", "test", 1, false);
        let backend = MockBackend::with_adapters(vec![adapter.clone()]);

        assert_eq!(backend.enumerate().unwrap(), vec![adapter]);
    }

    #[test]
    fn mock_replays_queued_mutation_errors_once() {
        let backend = MockBackend::new().failing_mutation(BackendError::CommandFailed {
            detail: "boom".to_string(),
        });

        assert!(backend.clear_config("Ethernet0").is_err());
        assert!(backend.clear_config("Ethernet0").is_ok());
    }

    #[test]
    fn error_display_names_the_adapter() {
        let err = BackendError::AdapterNotFound {
            name: "Ethernet7".to_string(),
        };
        assert!(err.to_string().contains("Ethernet7"));
    }

    #[test]
    fn unavailable_and_not_found_are_distinct() {
        let unavailable = BackendError::Unavailable {
            context: "powershell missing".to_string(),
        };
        assert!(!matches!(
            unavailable,
            BackendError::AdapterNotFound { .. }
        ));
    }
}
