use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Knobs for [`atomic_write`].
///
/// `sync` flushes the temp file to disk before the rename. `create_dirs`
/// creates missing parent directories first, so a fresh state directory
/// does not fail the first run.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub sync:        bool,
    pub create_dirs: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

/// Replace `path` with `content` by writing a sibling temp file and renaming it over the target.
///
/// Readers observe either the previous bytes or the new bytes, never a partial write.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: Options) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| Error::NoParent {
        path: path.to_path_buf(),
    })?;

    if options.create_dirs && !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = parent.join(format!(".tmp.{}.catsync", uuid::Uuid::new_v4()));

    fs::write(&tmp_path, content).map_err(|e| Error::Write {
        path: tmp_path.clone(),
        source: e,
    })?;

    if options.sync {
        let file = fs::File::open(&tmp_path).map_err(|e| Error::Write {
            path: tmp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| Error::Write {
            path: tmp_path.clone(),
            source: e,
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
