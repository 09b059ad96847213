//! Assistant panel: canned replies chosen by keyword, plus proactive alerts
//! for conversion errors forwarded by the host.

use std::time::Duration;

use crate::effect::Reaction;

pub type ReplyId = u64;

/// Delay between a user message and the assistant's reply.
pub const REPLY_DELAY: Duration = Duration::from_millis(600);

pub const GREETING: &str =
    "Hi! Drop a PDF into the converter and pick Excel or Word. Ask me if anything looks off.";

/// Every error alert starts with this prefix.
pub const ALERT_PREFIX: &str = "System alert:";

const REMEDIATION_REPLY: &str = "Conversion errors usually come from scanned or password-protected PDFs. \
Try re-exporting the document from its source application, then reboot the converter and upload it again.";
const FORMAT_REPLY: &str = "Excel output lays the extracted text out as spreadsheet columns; \
Word output produces a plain-text report. Switch formats before uploading to choose.";
const USAGE_REPLY: &str = "Pick a target format, select a PDF and wait for the progress bar to finish. \
The converted file downloads automatically and you can download it again from the success panel.";
const GENERIC_REPLY: &str =
    "Got it. I'm keeping an eye on the converter; ask about errors, formats or how to get started.";

const ALERT_STEPS: [&str; 3] = [
    "Dismiss the overlay and check that the source file is a text-based PDF.",
    "Use Force_Reboot to clear the stalled task.",
    "Upload the document again, or switch the target format and retry.",
];

/// Which canned reply a message maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Remediation,
    FormatCapability,
    Usage,
    Generic,
}

impl ReplyKind {
    pub fn text(self) -> &'static str {
        match self {
            ReplyKind::Remediation => REMEDIATION_REPLY,
            ReplyKind::FormatCapability => FORMAT_REPLY,
            ReplyKind::Usage => USAGE_REPLY,
            ReplyKind::Generic => GENERIC_REPLY,
        }
    }
}

// Checked in order; the first group with a matching keyword wins.
const KEYWORD_GROUPS: [(&[&str], ReplyKind); 3] = [
    (&["error", "fail"], ReplyKind::Remediation),
    (&["excel", "word"], ReplyKind::FormatCapability),
    (&["how", "help"], ReplyKind::Usage),
];

/// Case-insensitive substring classification.
pub fn classify(text: &str) -> ReplyKind {
    let lowered = text.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ReplyKind::Generic)
}

pub fn classify_reply(text: &str) -> &'static str {
    classify(text).text()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn is_alert(&self) -> bool {
        self.role == Role::Assistant && self.text.starts_with(ALERT_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantMsg {
    UserSubmitted(String),
    ReplyDue { reply: ReplyId },
    /// Current error string from the host (re-delivery is harmless).
    ErrorSignal(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingReply {
    id: ReplyId,
    text: &'static str,
}

/// Effects the assistant hands to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AssistantEffect {
    ScheduleReply { reply: ReplyId, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantState {
    transcript: Vec<Message>,
    pending: Option<PendingReply>,
    last_reply: ReplyId,
    last_surfaced_error: Option<String>,
}

impl Default for AssistantState {
    fn default() -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            pending: None,
            last_reply: 0,
            last_surfaced_error: None,
        }
    }
}

impl AssistantState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_reply(&self) -> Option<ReplyId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub(crate) fn apply(&mut self, msg: AssistantMsg) -> Reaction<AssistantEffect> {
        match msg {
            AssistantMsg::UserSubmitted(text) => self.send_user_message(&text),
            AssistantMsg::ReplyDue { reply } => self.deliver_reply(reply),
            AssistantMsg::ErrorSignal(value) => self.on_error_signal(value.as_deref()),
        }
    }

    fn send_user_message(&mut self, text: &str) -> Reaction<AssistantEffect> {
        let text = text.trim();
        if text.is_empty() || self.pending.is_some() {
            return Reaction::ignored();
        }
        let id = self.last_reply + 1;
        self.last_reply = id;
        self.transcript.push(Message::user(text));
        self.pending = Some(PendingReply {
            id,
            text: classify_reply(text),
        });
        Reaction::changed(vec![AssistantEffect::ScheduleReply {
            reply: id,
            delay: REPLY_DELAY,
        }])
    }

    fn deliver_reply(&mut self, reply: ReplyId) -> Reaction<AssistantEffect> {
        match self.pending.take() {
            Some(pending) if pending.id == reply => {
                self.transcript.push(Message::assistant(pending.text));
                Reaction::changed(Vec::new())
            }
            other => {
                self.pending = other;
                Reaction::ignored()
            }
        }
    }

    pub(crate) fn on_error_signal(&mut self, value: Option<&str>) -> Reaction<AssistantEffect> {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Reaction::ignored();
        };
        if self.last_surfaced_error.as_deref() == Some(value) {
            return Reaction::ignored();
        }
        self.transcript.push(Message::assistant(alert_text(value)));
        self.last_surfaced_error = Some(value.to_string());
        Reaction::changed(Vec::new())
    }
}

fn alert_text(signal: &str) -> String {
    let mut text = format!("{ALERT_PREFIX} the converter reported \"{signal}\". Try this:");
    for (idx, step) in ALERT_STEPS.iter().enumerate() {
        text.push_str(&format!("\n{}. {}", idx + 1, step));
    }
    text
}
