use converter_core::TargetFormat;

const DEFAULT_FAILURE: &str = "Extraction anomaly";

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Format(TargetFormat),
    Download,
    NewTask,
    Dismiss,
    Reboot,
    /// Inject an extraction anomaly with this message.
    Fail(String),
    Ask(String),
    Help,
    Quit,
    Invalid(String),
    Empty,
}

/// Known verbs become commands; anything else is chat for the assistant.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "open" | "upload" => {
            if rest.is_empty() {
                Command::Invalid(format!("{verb} needs a file path"))
            } else {
                Command::Open(rest.to_string())
            }
        }
        "format" => match rest.parse() {
            Ok(format) => Command::Format(format),
            Err(err) => Command::Invalid(err.to_string()),
        },
        "download" if rest.is_empty() => Command::Download,
        "new" | "reset" if rest.is_empty() => Command::NewTask,
        "dismiss" if rest.is_empty() => Command::Dismiss,
        "reboot" | "force_reboot" if rest.is_empty() => Command::Reboot,
        "fail" => Command::Fail(if rest.is_empty() {
            DEFAULT_FAILURE.to_string()
        } else {
            rest.to_string()
        }),
        "ask" | "say" => {
            if rest.is_empty() {
                Command::Invalid(format!("{verb} needs a message"))
            } else {
                Command::Ask(rest.to_string())
            }
        }
        "help" | "?" if rest.is_empty() => Command::Help,
        "quit" | "exit" if rest.is_empty() => Command::Quit,
        _ => Command::Ask(line.to_string()),
    }
}
