use crate::{ErrorInfo, Message, TargetFormat, VisualState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub format: TargetFormat,
    pub error_state: Option<String>,
    pub conversion: ConversionView,
    pub assistant: AssistantView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionView {
    pub visual: VisualState,
    pub file_name: Option<String>,
    /// Tenths of a percent, 0..=1000.
    pub progress_tenths: u16,
    /// Only set while a run is on screen.
    pub telemetry_label: Option<String>,
    pub status_message: String,
    pub result_bytes: Option<usize>,
    /// Only set while the error overlay is visible.
    pub error: Option<ErrorInfo>,
}

impl ConversionView {
    pub fn progress_percent(&self) -> f64 {
        f64::from(self.progress_tenths) / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantView {
    pub messages: Vec<Message>,
    pub pending: bool,
}
