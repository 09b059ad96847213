use std::time::Duration;

use crate::{ReplyId, ResultPayload, RunId};

/// Side effects requested by [`crate::update`] for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the progress and telemetry loops for `run`, replacing any
    /// loops that are still alive.
    StartConversionTimers {
        run: RunId,
        progress_period: Duration,
        telemetry_period: Duration,
    },
    /// Stop both conversion loops.
    CancelConversionTimers,
    /// Hand the payload to the download sink.
    Download {
        source_name: String,
        payload: ResultPayload,
    },
    /// Deliver `AssistantMsg::ReplyDue { reply }` after `delay`.
    ScheduleReply { reply: ReplyId, delay: Duration },
}

/// What a component did with a message: whether its state changed and the
/// effects it wants the host to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reaction<E> {
    pub(crate) changed: bool,
    pub(crate) effects: Vec<E>,
}

impl<E> Reaction<E> {
    pub(crate) fn ignored() -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
        }
    }

    pub(crate) fn changed(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    pub(crate) fn unchanged(effects: Vec<E>) -> Self {
        Self {
            changed: false,
            effects,
        }
    }
}
