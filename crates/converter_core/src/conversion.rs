//! Conversion panel state machine.
//!
//! A run starts when a file is selected and is driven entirely by timer
//! ticks. Ticks carry the [`RunId`] they were scheduled for; anything that
//! does not match the live run is dropped, so a tick that was already in
//! flight when its timers were cancelled cannot touch a newer task.

use std::time::Duration;

use crate::effect::Reaction;
use crate::payload::{produce_result, ResultPayload};
use crate::TargetFormat;

pub type RunId = u64;

pub const PROGRESS_TICK: Duration = Duration::from_millis(80);
pub const TELEMETRY_TICK: Duration = Duration::from_millis(800);

/// Cosmetic labels cycled during a run.
pub const TELEMETRY_LABELS: [&str; 6] = [
    "Scanning page geometry",
    "Detecting table boundaries",
    "Decoding glyph runs",
    "Normalizing cell grid",
    "Mapping column widths",
    "Packing output stream",
];

// Progress is kept in tenths of a percent so every step is exact.
const PROGRESS_MAX: u16 = 1000;
const FAST_TIER_END: u16 = 400;
const SLOW_TIER_START: u16 = 850;
const FAST_STEP: u16 = 45;
const MEDIUM_STEP: u16 = 12;
const SLOW_STEP: u16 = 5;

const STATUS_IDLE: &str = "Awaiting source document";
const STATUS_UPLOADING: &str = "Uploading source document...";
const STATUS_ASSEMBLING: &str = "Assembling output...";
const STATUS_SUCCESS: &str = "Conversion complete";
const STATUS_HALTED: &str = "Conversion halted";

const ASSEMBLY_FAILURE: &str = "Extraction anomaly: output assembly failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMsg {
    FileSelected { name: String },
    /// `at` is the host's wall-clock time, used if this tick completes the run.
    ProgressTick { run: RunId, at: String },
    TelemetryTick { run: RunId },
    ExtractionFailed { message: String, detail: String },
    DownloadRequested,
    NewTaskRequested,
    DismissError,
    Reboot,
}

/// Effects the conversion panel hands to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConversionEffect {
    StartTimers { run: RunId },
    CancelTimers,
    Download {
        source_name: String,
        payload: ResultPayload,
    },
    ErrorUpdate(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Running,
    Succeeded(ResultPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Idle,
    Running,
    Succeeded,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionState {
    phase: Phase,
    selected_file: Option<String>,
    progress: u16,
    telemetry_index: usize,
    status_message: String,
    error: Option<ErrorInfo>,
    overlay_visible: bool,
    live_run: Option<RunId>,
    last_run: RunId,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            selected_file: None,
            progress: 0,
            telemetry_index: 0,
            status_message: STATUS_IDLE.to_string(),
            error: None,
            overlay_visible: false,
            live_run: None,
            last_run: 0,
        }
    }
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual_state(&self) -> VisualState {
        if self.overlay_visible {
            return VisualState::Errored;
        }
        match self.phase {
            Phase::Idle => VisualState::Idle,
            Phase::Running => VisualState::Running,
            Phase::Succeeded(_) => VisualState::Succeeded,
        }
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    /// Progress in tenths of a percent (0..=1000).
    pub fn progress_tenths(&self) -> u16 {
        self.progress
    }

    pub fn telemetry_label(&self) -> &'static str {
        TELEMETRY_LABELS[self.telemetry_index]
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn result(&self) -> Option<&ResultPayload> {
        match &self.phase {
            Phase::Succeeded(payload) => Some(payload),
            Phase::Idle | Phase::Running => None,
        }
    }

    /// Last error raised for this task; survives a dismiss.
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn live_run(&self) -> Option<RunId> {
        self.live_run
    }

    pub fn is_busy(&self) -> bool {
        self.live_run.is_some()
    }

    pub(crate) fn apply(
        &mut self,
        msg: ConversionMsg,
        format: TargetFormat,
    ) -> Reaction<ConversionEffect> {
        match msg {
            ConversionMsg::FileSelected { name } => self.select_file(name),
            ConversionMsg::ProgressTick { run, at } => self.progress_tick(run, &at, format),
            ConversionMsg::TelemetryTick { run } => self.telemetry_tick(run),
            ConversionMsg::ExtractionFailed { message, detail } => {
                self.fail(ErrorInfo { message, detail })
            }
            ConversionMsg::DownloadRequested => self.redownload(),
            ConversionMsg::NewTaskRequested | ConversionMsg::Reboot => self.reset(),
            ConversionMsg::DismissError => self.dismiss(),
        }
    }

    fn select_file(&mut self, name: String) -> Reaction<ConversionEffect> {
        // Busy policy: a live run is never overwritten by a second selection.
        // An error overlay only leaves through dismiss or reboot.
        if self.is_busy() || self.overlay_visible {
            return Reaction::ignored();
        }
        let run = self.last_run + 1;
        *self = Self {
            phase: Phase::Running,
            selected_file: Some(name),
            status_message: STATUS_UPLOADING.to_string(),
            live_run: Some(run),
            last_run: run,
            ..Self::default()
        };
        Reaction::changed(vec![
            ConversionEffect::ErrorUpdate(None),
            ConversionEffect::StartTimers { run },
        ])
    }

    fn progress_tick(
        &mut self,
        run: RunId,
        at: &str,
        format: TargetFormat,
    ) -> Reaction<ConversionEffect> {
        if self.live_run != Some(run) {
            return Reaction::ignored();
        }
        self.progress = next_progress(self.progress);
        if self.progress >= SLOW_TIER_START && self.progress < PROGRESS_MAX {
            self.status_message = STATUS_ASSEMBLING.to_string();
        }
        if self.progress < PROGRESS_MAX {
            return Reaction::changed(Vec::new());
        }

        self.live_run = None;
        let mut effects = vec![ConversionEffect::CancelTimers];
        let source_name = self.selected_file.clone().unwrap_or_default();
        match produce_result(format, &source_name, at) {
            Ok(payload) => {
                self.phase = Phase::Succeeded(payload.clone());
                self.status_message = STATUS_SUCCESS.to_string();
                effects.push(ConversionEffect::Download {
                    source_name,
                    payload,
                });
            }
            Err(err) => {
                self.status_message = STATUS_HALTED.to_string();
                effects.push(self.raise(ErrorInfo {
                    message: ASSEMBLY_FAILURE.to_string(),
                    detail: err.to_string(),
                }));
            }
        }
        Reaction::changed(effects)
    }

    fn telemetry_tick(&mut self, run: RunId) -> Reaction<ConversionEffect> {
        if self.live_run != Some(run) {
            return Reaction::ignored();
        }
        self.telemetry_index = (self.telemetry_index + 1) % TELEMETRY_LABELS.len();
        Reaction::changed(Vec::new())
    }

    fn fail(&mut self, info: ErrorInfo) -> Reaction<ConversionEffect> {
        let mut effects = Vec::new();
        if self.live_run.take().is_some() {
            self.status_message = STATUS_HALTED.to_string();
            effects.push(ConversionEffect::CancelTimers);
        }
        effects.push(self.raise(info));
        Reaction::changed(effects)
    }

    fn raise(&mut self, info: ErrorInfo) -> ConversionEffect {
        let signal = info.message.clone();
        self.error = Some(info);
        self.overlay_visible = true;
        ConversionEffect::ErrorUpdate(Some(signal))
    }

    fn dismiss(&mut self) -> Reaction<ConversionEffect> {
        if !self.overlay_visible {
            return Reaction::ignored();
        }
        self.overlay_visible = false;
        Reaction::changed(Vec::new())
    }

    fn redownload(&self) -> Reaction<ConversionEffect> {
        if self.overlay_visible {
            return Reaction::ignored();
        }
        match &self.phase {
            Phase::Succeeded(payload) => Reaction::unchanged(vec![ConversionEffect::Download {
                source_name: self.selected_file.clone().unwrap_or_default(),
                payload: payload.clone(),
            }]),
            Phase::Idle | Phase::Running => Reaction::ignored(),
        }
    }

    fn reset(&mut self) -> Reaction<ConversionEffect> {
        *self = Self {
            last_run: self.last_run,
            ..Self::default()
        };
        // The host may still hold timers for a run the core already closed.
        Reaction::changed(vec![
            ConversionEffect::CancelTimers,
            ConversionEffect::ErrorUpdate(None),
        ])
    }
}

/// Three-tier easing: fast below 40%, medium up to 85%, slow afterwards.
fn next_progress(current: u16) -> u16 {
    let step = if current < FAST_TIER_END {
        FAST_STEP
    } else if current < SLOW_TIER_START {
        MEDIUM_STEP
    } else {
        SLOW_STEP
    };
    (current + step).min(PROGRESS_MAX)
}
