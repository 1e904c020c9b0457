//! Path-keyed byte stores.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::rw::{self, Options};
use crate::{Error, Result};

/// Minimal persistence seam: whole-value reads and writes keyed by path.
pub trait ByteStore {
    /// Read the bytes stored under `key`, or `None` when nothing is stored.
    fn read(&self, key: &Path) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`.
    fn write(&self, key: &Path, content: &[u8]) -> Result<()>;

    fn exists(&self, key: &Path) -> bool;
}

/// Store backed by the local filesystem. Keys are file paths.
#[derive(Clone, Copy, Debug)]
pub struct FsStore {
    options: Options,
}

impl Default for FsStore {
    fn default() -> Self { Self::new() }
}

impl FsStore {
    pub fn new() -> Self {
        Self {
            options: Options::new().sync(true).create_dirs(true),
        }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl ByteStore for FsStore {
    fn read(&self, key: &Path) -> Result<Option<Vec<u8>>> {
        match rw::atomic_read(key) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(Error::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &Path, content: &[u8]) -> Result<()> {
        tracing::debug!(path = %key.display(), bytes = content.len(), "writing");
        rw::atomic_write(key, content, self.options)
    }

    fn exists(&self, key: &Path) -> bool {
        key.is_file()
    }
}

/// In-memory store, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<PathBuf, Vec<u8>>>,
    writes:  Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without counting it as a write.
    pub fn with_entry(self, key: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.lock_entries().insert(key.into(), content.into());
        self
    }

    /// Number of `write` calls made through the [`ByteStore`] interface.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock_entries().get(key.as_ref()).cloned()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, key: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &Path, content: &[u8]) -> Result<()> {
        self.lock_entries().insert(key.to_path_buf(), content.to_vec());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn exists(&self, key: &Path) -> bool {
        self.lock_entries().contains_key(key)
    }
}

impl<S: ByteStore + ?Sized> ByteStore for &S {
    fn read(&self, key: &Path) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &Path, content: &[u8]) -> Result<()> {
        (**self).write(key, content)
    }

    fn exists(&self, key: &Path) -> bool {
        (**self).exists(key)
    }
}
