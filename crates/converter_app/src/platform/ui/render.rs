use converter_core::{AppViewModel, ConversionView, Message, Role, TargetFormat, VisualState};

use super::super::effects::RunnerNotice;

const BAR_WIDTH: usize = 20;

pub const HELP_LINES: &[&str] = &[
    "Commands:",
    "  open <path>            convert a PDF (only its name is used)",
    "  format excel|word      choose the output format",
    "  download               save the finished result again",
    "  new                    start over with a fresh task",
    "  dismiss | reboot       hide the error overlay, or clear the task",
    "  fail [message]         inject an extraction anomaly",
    "  ask <text>             talk to the assistant (plain text works too)",
    "  help | quit",
];

/// Turns view models into terminal lines, printing only what changed since
/// the previous frame.
#[derive(Debug, Default)]
pub struct Renderer {
    printed_messages: usize,
    last_format: Option<TargetFormat>,
    last_conversion_key: Option<ConversionKey>,
}

// Progress only prints on whole 10% steps to keep the scrollback readable.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConversionKey {
    visual: VisualState,
    file_name: Option<String>,
    progress_step: u16,
    telemetry_label: Option<String>,
    status_message: String,
}

impl ConversionKey {
    fn of(view: &ConversionView) -> Self {
        Self {
            visual: view.visual,
            file_name: view.file_name.clone(),
            progress_step: view.progress_tenths / 100,
            telemetry_label: view.telemetry_label.clone(),
            status_message: view.status_message.clone(),
        }
    }
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.last_format != Some(view.format) {
            self.last_format = Some(view.format);
            lines.push(format!("Format: {}", view.format));
        }

        let key = ConversionKey::of(&view.conversion);
        if self.last_conversion_key.as_ref() != Some(&key) {
            self.last_conversion_key = Some(key);
            lines.extend(conversion_lines(&view.conversion, view.format));
        }

        // The transcript is append-only, so new messages are a suffix.
        for message in view.assistant.messages.iter().skip(self.printed_messages) {
            lines.extend(message_lines(message));
        }
        self.printed_messages = view.assistant.messages.len();

        lines
    }
}

fn conversion_lines(view: &ConversionView, format: TargetFormat) -> Vec<String> {
    let file = view.file_name.as_deref().unwrap_or("-");
    match view.visual {
        VisualState::Idle => vec![format!("[idle] {} | target {}", view.status_message, format)],
        VisualState::Running => vec![format!(
            "[running] {} {} {:>5.1}% | {} | {}",
            file,
            progress_bar(view.progress_tenths),
            view.progress_percent(),
            view.telemetry_label.as_deref().unwrap_or(""),
            view.status_message
        )],
        VisualState::Succeeded => vec![format!(
            "[done] {} -> {} bytes | {} | 'download' saves again, 'new' starts over",
            file,
            view.result_bytes.unwrap_or(0),
            view.status_message
        )],
        VisualState::Errored => {
            let mut lines = vec!["[error] ======== EXTRACTION ANOMALY ========".to_string()];
            if let Some(error) = &view.error {
                lines.push(format!("[error] {}", error.message));
                lines.push(format!("[error] log: {}", error.detail));
            }
            lines.push("[error] 'dismiss' to hide, 'reboot' to clear the task".to_string());
            lines
        }
    }
}

fn progress_bar(tenths: u16) -> String {
    let filled = (usize::from(tenths.min(1000)) * BAR_WIDTH) / 1000;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn message_lines(message: &Message) -> Vec<String> {
    let prefix = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut lines = Vec::new();
    for (idx, line) in message.text.lines().enumerate() {
        if idx == 0 {
            lines.push(format!("{prefix}> {line}"));
        } else {
            lines.push(format!("{}  {line}", " ".repeat(prefix.len())));
        }
    }
    lines
}

pub fn notice_line(notice: &RunnerNotice) -> String {
    match notice {
        RunnerNotice::Downloaded(receipt) => format!(
            "Saved {} ({} bytes) to {}",
            receipt.filename,
            receipt.bytes,
            receipt.location.display()
        ),
        RunnerNotice::DownloadFailed {
            source_name,
            reason,
        } => format!("Download of {source_name} failed: {reason}"),
    }
}
