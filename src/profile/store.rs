//! File-backed profile store implementation.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{IpProfile, LoadOutcome, ProfileError};

/// Durable mapping from IPv4 address to saved profile.
///
/// # Ownership
///
/// The store assumes a single logical owner: one process, one holder. No
/// cross-process lock is taken on the backing file, and saves overwrite the
/// file entirely.
///
/// # Atomic Writes
///
/// Saves use write-to-temp-then-rename so the file is either fully written
/// or untouched; a crash mid-save never leaves a half-written file behind.
/// Changes made after the last save are lost on abnormal termination;
/// accepted, not mitigated.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, IpProfile>,
}

impl ProfileStore {
    /// Opens the store at the given path.
    ///
    /// A missing file yields an empty store and creates an empty file; an
    /// unreadable file yields an empty store with a logged warning. Neither
    /// is a process failure.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let path = path.into();
        let outcome = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, IpProfile>>(&content) {
                Ok(profiles) => {
                    let count = profiles.len();
                    return (Self { path, profiles }, LoadOutcome::Loaded(count));
                }
                Err(e) => {
                    let reason = format!("Invalid JSON: {e}");
                    tracing::warn!(
                        "Profile file {} unreadable ({reason}), starting empty",
                        path.display()
                    );
                    LoadOutcome::Unreadable { reason }
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Err(e) = write_empty_file(&path) {
                    tracing::warn!(
                        "Could not create profile file {}: {e}",
                        path.display()
                    );
                }
                LoadOutcome::Created
            }
            Err(e) => {
                let reason = format!("Failed to read file: {e}");
                tracing::warn!(
                    "Profile file {} unreadable ({reason}), starting empty",
                    path.display()
                );
                LoadOutcome::Unreadable { reason }
            }
        };

        (
            Self {
                path,
                profiles: BTreeMap::new(),
            },
            outcome,
        )
    }

    /// Returns the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upserts a profile by its address.
    ///
    /// Re-adding an existing address overwrites the prior profile; the
    /// replaced profile is returned. No validation against live adapters
    /// happens here.
    pub fn add(&mut self, profile: IpProfile) -> Option<IpProfile> {
        self.profiles.insert(profile.address.clone(), profile)
    }

    /// Looks up a profile by address.
    ///
    /// A miss is a normal query outcome, not an error.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&IpProfile> {
        self.profiles.get(address)
    }

    /// Removes the profile for an address, reporting whether one existed.
    pub fn delete(&mut self, address: &str) -> bool {
        self.profiles.remove(address).is_some()
    }

    /// Returns the number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Iterates profiles in address order.
    pub fn iter(&self) -> impl Iterator<Item = &IpProfile> {
        self.profiles.values()
    }

    /// Serializes the full mapping to the backing file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if serialization or any filesystem step
    /// fails.
    pub fn save(&self) -> Result<(), ProfileError> {
        let content =
            serde_json::to_string_pretty(&self.profiles).map_err(ProfileError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ProfileError::Write)?;
            }
        }

        // Append .tmp instead of replacing the extension to avoid clashing
        // with a sibling file (record.json -> record.json.tmp).
        let temp_path = PathBuf::from(format!("{}.tmp", self.path.display()));

        std::fs::write(&temp_path, content).map_err(ProfileError::Write)?;
        std::fs::rename(&temp_path, &self.path).map_err(ProfileError::Write)?;

        Ok(())
    }
}

/// Creates an empty (but valid) profile file.
fn write_empty_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, "{}\n")
}
