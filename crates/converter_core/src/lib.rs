//! Converter core: pure state machines and view-model helpers.
//!
//! Nothing in this crate touches the clock, the filesystem or a timer. The
//! host feeds [`Msg`]s into [`update`] and executes the returned [`Effect`]s.
mod assistant;
mod conversion;
mod effect;
mod format;
mod msg;
mod payload;
mod state;
mod update;
mod view_model;

pub use assistant::{
    classify, classify_reply, AssistantMsg, AssistantState, Message, ReplyId, ReplyKind, Role,
    ALERT_PREFIX, GREETING, REPLY_DELAY,
};
pub use conversion::{
    ConversionMsg, ConversionState, ErrorInfo, RunId, VisualState, PROGRESS_TICK,
    TELEMETRY_LABELS, TELEMETRY_TICK,
};
pub use effect::Effect;
pub use format::{TargetFormat, UnknownFormat};
pub use msg::Msg;
pub use payload::{produce_result, PayloadError, ResultPayload, COLUMN_PADDING, FALLBACK_SENTENCE};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, AssistantView, ConversionView};
