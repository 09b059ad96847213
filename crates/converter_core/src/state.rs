use crate::view_model::{AppViewModel, AssistantView, ConversionView};
use crate::{AssistantState, ConversionState, TargetFormat, VisualState};

/// Host state: the shared format, the forwarded error signal and both panels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    format: TargetFormat,
    error_state: Option<String>,
    conversion: ConversionState,
    assistant: AssistantState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: TargetFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn error_state(&self) -> Option<&str> {
        self.error_state.as_deref()
    }

    pub fn conversion(&self) -> &ConversionState {
        &self.conversion
    }

    pub fn assistant(&self) -> &AssistantState {
        &self.assistant
    }

    pub fn view(&self) -> AppViewModel {
        let conversion = &self.conversion;
        let visual = conversion.visual_state();
        AppViewModel {
            format: self.format,
            error_state: self.error_state.clone(),
            conversion: ConversionView {
                visual,
                file_name: conversion.selected_file().map(ToOwned::to_owned),
                progress_tenths: conversion.progress_tenths(),
                telemetry_label: (visual == VisualState::Running)
                    .then(|| conversion.telemetry_label().to_string()),
                status_message: conversion.status_message().to_string(),
                result_bytes: conversion.result().map(|payload| payload.len()),
                error: (visual == VisualState::Errored)
                    .then(|| conversion.error().cloned())
                    .flatten(),
            },
            assistant: AssistantView {
                messages: self.assistant.transcript().to_vec(),
                pending: self.assistant.is_pending(),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_format(&mut self, format: TargetFormat) -> bool {
        if self.format == format {
            return false;
        }
        self.format = format;
        true
    }

    pub(crate) fn set_error_state(&mut self, value: Option<String>) -> bool {
        if self.error_state == value {
            return false;
        }
        self.error_state = value;
        true
    }

    pub(crate) fn conversion_mut(&mut self) -> &mut ConversionState {
        &mut self.conversion
    }

    pub(crate) fn assistant_mut(&mut self) -> &mut AssistantState {
        &mut self.assistant
    }
}
