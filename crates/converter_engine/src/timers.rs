//! Cancellable timer loops on the engine's tokio runtime.

use std::sync::mpsc::Sender;
use std::time::Duration;

use converter_logging::{conv_debug, conv_trace};
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ReplyId, RunId};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Progress and telemetry loops for one run.
///
/// Both loops share one cancellation token; dropping the guard cancels them
/// together, so every exit path (completion, reset, new run, teardown)
/// releases both.
#[derive(Debug)]
pub struct ConversionTimers {
    run: RunId,
    token: CancellationToken,
}

impl ConversionTimers {
    pub fn spawn(
        handle: &Handle,
        run: RunId,
        progress_period: Duration,
        telemetry_period: Duration,
        events: Sender<EngineEvent>,
    ) -> Self {
        let token = CancellationToken::new();
        spawn_loop(
            handle,
            token.clone(),
            progress_period,
            events.clone(),
            EngineEvent::ProgressTick { run },
        );
        spawn_loop(
            handle,
            token.clone(),
            telemetry_period,
            events,
            EngineEvent::TelemetryTick { run },
        );
        conv_debug!(
            "Started timers run={} progress={:?} telemetry={:?}",
            run,
            progress_period,
            telemetry_period
        );
        Self { run, token }
    }

    pub fn run(&self) -> RunId {
        self.run
    }
}

impl Drop for ConversionTimers {
    fn drop(&mut self) {
        self.token.cancel();
        conv_debug!("Cancelled timers run={}", self.run);
    }
}

fn spawn_loop(
    handle: &Handle,
    token: CancellationToken,
    period: Duration,
    events: Sender<EngineEvent>,
    event: EngineEvent,
) {
    let period = period.max(MIN_PERIOD);
    handle.spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    conv_trace!("Timer fired {:?}", event);
                    if events.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Sends [`EngineEvent::ReplyDue`] once after `delay` unless `token` is
/// cancelled first.
pub fn schedule_reply(
    handle: &Handle,
    reply: ReplyId,
    delay: Duration,
    events: Sender<EngineEvent>,
    token: CancellationToken,
) {
    handle.spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                let _ = events.send(EngineEvent::ReplyDue { reply });
            }
        }
    });
}
