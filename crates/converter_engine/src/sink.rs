use std::path::PathBuf;

use converter_logging::conv_info;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{output_filename, EngineConfig};

/// Destination for finished conversions.
pub trait DownloadSink: Send {
    /// Stores `payload` under `filename` and returns where it went.
    fn save(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, PersistError>;
}

/// Saves downloads into a directory, replacing earlier copies.
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    writer: AtomicFileWriter,
}

impl DirectoryDownloadSink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }
}

impl DownloadSink for DirectoryDownloadSink {
    fn save(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, PersistError> {
        self.writer.write(filename, payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    pub filename: String,
    pub location: PathBuf,
    pub bytes: usize,
}

/// Names the output after `source_name` and hands it to `sink`.
///
/// Safe to call repeatedly for the same payload.
pub fn download(
    sink: &dyn DownloadSink,
    config: &EngineConfig,
    source_name: &str,
    extension: &str,
    payload: &[u8],
) -> Result<DownloadReceipt, PersistError> {
    let filename = output_filename(source_name, &config.version_tag, extension);
    let location = sink.save(&filename, payload)?;
    conv_info!(
        "Download saved filename={} bytes={} location={:?}",
        filename,
        payload.len(),
        location
    );
    Ok(DownloadReceipt {
        filename,
        location,
        bytes: payload.len(),
    })
}
