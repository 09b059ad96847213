use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use converter_logging::{conv_debug, conv_error, conv_info, conv_warn};
use tokio_util::sync::CancellationToken;

use crate::timers::{schedule_reply, ConversionTimers};
use crate::{EngineEvent, ReplyId, RunId};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

enum EngineCommand {
    StartConversionTimers {
        run: RunId,
        progress_period: Duration,
        telemetry_period: Duration,
    },
    CancelConversionTimers,
    ScheduleReply {
        reply: ReplyId,
        delay: Duration,
    },
    Shutdown,
}

/// Owns the timer runtime thread. Timer output is delivered on the event
/// sender passed to [`EngineHandle::new`].
///
/// Dropping the handle cancels every outstanding timer and joins the thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(events: mpsc::Sender<EngineEvent>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(cmd_rx, events));
        Self {
            cmd_tx,
            worker: Some(worker),
        }
    }

    /// Replaces any live conversion timers with a fresh pair for `run`.
    pub fn start_conversion_timers(
        &self,
        run: RunId,
        progress_period: Duration,
        telemetry_period: Duration,
    ) {
        self.send(EngineCommand::StartConversionTimers {
            run,
            progress_period,
            telemetry_period,
        });
    }

    pub fn cancel_conversion_timers(&self) {
        self.send(EngineCommand::CancelConversionTimers);
    }

    pub fn schedule_reply(&self, reply: ReplyId, delay: Duration) {
        self.send(EngineCommand::ScheduleReply { reply, delay });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            conv_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                conv_error!("Engine worker panicked during shutdown");
            }
        }
    }
}

fn run_worker(cmd_rx: mpsc::Receiver<EngineCommand>, events: mpsc::Sender<EngineEvent>) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            conv_error!("Failed to start timer runtime: {}", err);
            return;
        }
    };
    let replies = CancellationToken::new();
    let mut conversion: Option<ConversionTimers> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartConversionTimers {
                run,
                progress_period,
                telemetry_period,
            } => {
                // Cancel before restart.
                drop(conversion.take());
                conversion = Some(ConversionTimers::spawn(
                    runtime.handle(),
                    run,
                    progress_period,
                    telemetry_period,
                    events.clone(),
                ));
            }
            EngineCommand::CancelConversionTimers => {
                if conversion.take().is_none() {
                    conv_debug!("Cancel requested with no live conversion timers");
                }
            }
            EngineCommand::ScheduleReply { reply, delay } => {
                schedule_reply(
                    runtime.handle(),
                    reply,
                    delay,
                    events.clone(),
                    replies.child_token(),
                );
            }
            EngineCommand::Shutdown => break,
        }
    }

    drop(conversion);
    replies.cancel();
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    conv_info!("Engine worker stopped");
}
