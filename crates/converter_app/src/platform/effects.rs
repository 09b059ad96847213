use std::sync::mpsc;
use std::thread;

use chrono::Local;
use converter_core::{AssistantMsg, ConversionMsg, Effect, Msg, ResultPayload};
use converter_engine::{
    download, DownloadReceipt, DownloadSink, EngineConfig, EngineEvent, EngineHandle,
};
use converter_logging::{conv_debug, conv_error, conv_info};

use super::app::HostEvent;

/// Outcome of an effect the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerNotice {
    Downloaded(DownloadReceipt),
    DownloadFailed { source_name: String, reason: String },
}

pub struct EffectRunner {
    engine: EngineHandle,
    sink: Box<dyn DownloadSink>,
    config: EngineConfig,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, sink: Box<dyn DownloadSink>, config: EngineConfig) -> Self {
        Self {
            engine,
            sink,
            config,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<RunnerNotice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartConversionTimers {
                    run,
                    progress_period,
                    telemetry_period,
                } => {
                    conv_info!("StartConversionTimers run={}", run);
                    self.engine
                        .start_conversion_timers(run, progress_period, telemetry_period);
                }
                Effect::CancelConversionTimers => {
                    conv_debug!("CancelConversionTimers");
                    self.engine.cancel_conversion_timers();
                }
                Effect::Download {
                    source_name,
                    payload,
                } => notices.push(self.download(&source_name, &payload)),
                Effect::ScheduleReply { reply, delay } => {
                    conv_debug!("ScheduleReply reply={} delay={:?}", reply, delay);
                    self.engine.schedule_reply(reply, delay);
                }
            }
        }
        notices
    }

    fn download(&self, source_name: &str, payload: &ResultPayload) -> RunnerNotice {
        let extension = payload.format().extension();
        match download(
            self.sink.as_ref(),
            &self.config,
            source_name,
            extension,
            payload.bytes(),
        ) {
            Ok(receipt) => RunnerNotice::Downloaded(receipt),
            Err(err) => {
                conv_error!("Download of {} failed: {}", source_name, err);
                RunnerNotice::DownloadFailed {
                    source_name: source_name.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Forwards engine timer events into the host loop as messages.
pub fn spawn_event_pump(events: mpsc::Receiver<EngineEvent>, host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if host_tx.send(HostEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProgressTick { run } => Msg::Conversion(ConversionMsg::ProgressTick {
            run,
            at: timestamp(),
        }),
        EngineEvent::TelemetryTick { run } => Msg::Conversion(ConversionMsg::TelemetryTick { run }),
        EngineEvent::ReplyDue { reply } => Msg::Assistant(AssistantMsg::ReplyDue { reply }),
    }
}

pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
