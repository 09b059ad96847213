//! Converter engine: timers and host side effects.
mod config;
mod engine;
mod filename;
mod persist;
mod sink;
mod source;
mod timers;
mod types;

pub use config::{EngineConfig, DEFAULT_VERSION_TAG};
pub use engine::EngineHandle;
pub use filename::output_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sink::{download, DirectoryDownloadSink, DownloadReceipt, DownloadSink};
pub use source::{FileSource, PathFileSource, SelectedFile, SourceError};
pub use timers::{schedule_reply, ConversionTimers};
pub use types::{EngineEvent, ReplyId, RunId};
