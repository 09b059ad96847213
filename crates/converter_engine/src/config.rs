use std::path::PathBuf;

pub const DEFAULT_VERSION_TAG: &str = "_v42";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Downloads land here.
    pub output_dir: PathBuf,
    /// Appended to the stripped source name before the extension.
    pub version_tag: String,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            version_tag: DEFAULT_VERSION_TAG.to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(PathBuf::from("output"))
    }
}
