use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no file at {0:?}")]
    NotFound(PathBuf),
    #[error("{0:?} is not a regular file")]
    NotAFile(PathBuf),
    #[error("{0:?} has no file name")]
    NoName(PathBuf),
    #[error("cannot inspect {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file chosen by the user. Only the name is ever consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    path: PathBuf,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Host file picker.
pub trait FileSource {
    fn select(&self, request: &str) -> Result<SelectedFile, SourceError>;
}

/// Resolves typed paths against a base directory. Checks metadata only;
/// file contents are never opened.
#[derive(Debug, Clone)]
pub struct PathFileSource {
    base: PathBuf,
}

impl PathFileSource {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }
}

impl FileSource for PathFileSource {
    fn select(&self, request: &str) -> Result<SelectedFile, SourceError> {
        let requested = Path::new(request.trim());
        let path = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.base.join(requested)
        };

        let meta = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path));
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };
        if !meta.is_file() {
            return Err(SourceError::NotAFile(path));
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Err(SourceError::NoName(path)),
        };
        Ok(SelectedFile { name, path })
    }
}
