use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

const PARTIAL_PREFIX: &str = ".partial-";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {path:?} as the download directory: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("writing {filename} failed: {source}")]
    Write {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Creates the download directory when missing. An existing path that is not
/// a directory is refused.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let refuse = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(refuse("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| refuse(e.to_string()))
        }
        Err(err) => Err(refuse(err.to_string())),
    }
}

/// Writes downloads into one directory. Each payload goes to a hidden
/// partial file first and is renamed over the target once complete.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let failed = |source: io::Error| PersistError::Write {
            filename: filename.to_string(),
            source,
        };

        let mut partial = Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempfile_in(&self.dir)
            .map_err(failed)?;
        partial.write_all(payload).map_err(failed)?;
        partial.as_file_mut().sync_all().map_err(failed)?;

        // Re-downloading the same result replaces the earlier copy.
        let target = self.dir.join(filename);
        partial
            .persist(&target)
            .map_err(|err| failed(err.error))?;
        Ok(target)
    }
}
