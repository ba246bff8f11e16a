//! JSON store file shared between concurrent `bookings` processes.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use booking_reconciler::MemoryStore;
use log::debug;
use tempfile::NamedTempFile;

/// Exclusive hold on a store file for one load / apply / save cycle.
///
/// The lock sits on a `<store>.lock` sidecar because [`LockedStore::save`]
/// replaces the store file itself. Dropping the value releases it.
pub struct LockedStore {
    path: PathBuf,
    _lock: File,
}

impl LockedStore {
    /// Block until no other process holds the store.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_path = lock_path(path);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock.lock()
            .with_context(|| format!("Failed to lock store: {}", path.display()))?;
        debug!("locked {}", lock_path.display());

        Ok(Self {
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    pub fn load(&self) -> Result<MemoryStore> {
        load(&self.path)
    }

    /// Write to a temporary file next to the store and rename it into place,
    /// so readers never see a half-written store.
    pub fn save(&self, store: &MemoryStore) -> Result<()> {
        let json = store.to_json()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        staged
            .write_all(json.as_bytes())
            .context("Failed to write temporary store")?;
        staged
            .persist(&self.path)
            .with_context(|| format!("Failed to write store: {}", self.path.display()))?;
        Ok(())
    }
}

/// Read the store without locking; an absent file is an empty store.
pub fn load(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        debug!("store {} does not exist yet, starting empty", path.display());
        return Ok(MemoryStore::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store: {}", path.display()))?;
    MemoryStore::from_json(&json)
        .with_context(|| format!("Failed to parse store: {}", path.display()))
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
