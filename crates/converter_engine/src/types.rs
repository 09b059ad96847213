pub type RunId = u64;
pub type ReplyId = u64;

/// Timer output forwarded to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    ProgressTick { run: RunId },
    TelemetryTick { run: RunId },
    ReplyDue { reply: ReplyId },
}
