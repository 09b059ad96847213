use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use converter_core::{update, AppState, AssistantMsg, ConversionMsg, Msg, VisualState};
use converter_engine::{DirectoryDownloadSink, EngineHandle, FileSource, PathFileSource};
use converter_logging::{conv_debug, conv_info, conv_warn};

use super::config::{self, AppConfig};
use super::effects::{self, EffectRunner};
use super::logging;
use super::ui::input::{parse_command, Command};
use super::ui::render::{self, Renderer, HELP_LINES};

/// Everything the host loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    Input(Command),
    Msg(Msg),
    InputClosed,
}

const OVERLAY_NOTICE: &str = "An extraction error is showing; 'dismiss' or 'reboot' first.";

enum Flow {
    Dispatch(Msg),
    Continue,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::config_path();
    let (config, config_problem) = match config::load_config(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    logging::initialize(config.log_destination, config.log_level(), &config.log_file);
    if let Some(err) = config_problem {
        conv_warn!("Using default configuration: {}", err);
    }
    conv_info!(
        "Starting converter output_dir={:?} version_tag={}",
        config.output_dir,
        config.version_tag
    );

    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();
    let (engine_tx, engine_rx) = mpsc::channel();
    let runner = EffectRunner::new(
        EngineHandle::new(engine_tx),
        Box::new(DirectoryDownloadSink::new(config.output_dir.clone())),
        config.engine_config(),
    );
    effects::spawn_event_pump(engine_rx, host_tx.clone());
    spawn_input_reader(host_tx);

    let cwd = std::env::current_dir().context("resolving the working directory")?;
    let source = PathFileSource::new(cwd);
    let mut state = AppState::with_format(config.initial_format());
    let mut renderer = Renderer::default();
    let mut out = io::stdout();

    write_lines(&mut out, &["Type 'help' for commands.".to_string()])?;
    write_lines(&mut out, &renderer.render(&state.view()))?;

    while let Ok(event) = host_rx.recv() {
        let msg = match event {
            HostEvent::Msg(msg) => msg,
            HostEvent::Input(command) => match handle_command(command, &state, &source, &mut out)? {
                Flow::Dispatch(msg) => msg,
                Flow::Continue => continue,
                Flow::Quit => break,
            },
            HostEvent::InputClosed => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        let mut lines: Vec<String> = runner
            .enqueue(effects)
            .iter()
            .map(render::notice_line)
            .collect();
        if state.consume_dirty() {
            lines.extend(renderer.render(&state.view()));
        }
        write_lines(&mut out, &lines)?;
    }

    conv_info!("Shutting down");
    Ok(())
}

fn handle_command(
    command: Command,
    state: &AppState,
    source: &dyn FileSource,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let flow = match command {
        Command::Open(_) | Command::Download
            if state.conversion().visual_state() == VisualState::Errored =>
        {
            write_lines(out, &[OVERLAY_NOTICE.to_string()])?;
            Flow::Continue
        }
        Command::Open(path) => {
            if state.conversion().is_busy() {
                write_lines(
                    out,
                    &["A conversion is already running; wait for it or use 'new'.".to_string()],
                )?;
                return Ok(Flow::Continue);
            }
            match source.select(&path) {
                Ok(file) => {
                    conv_info!("Selected {:?}", file.path());
                    Flow::Dispatch(
                        ConversionMsg::FileSelected {
                            name: file.name().to_string(),
                        }
                        .into(),
                    )
                }
                Err(err) => {
                    conv_warn!("File selection failed: {}", err);
                    write_lines(out, &[format!("Cannot open: {err}")])?;
                    Flow::Continue
                }
            }
        }
        Command::Format(format) => Flow::Dispatch(Msg::FormatSelected(format)),
        Command::Download => Flow::Dispatch(ConversionMsg::DownloadRequested.into()),
        Command::NewTask => Flow::Dispatch(ConversionMsg::NewTaskRequested.into()),
        Command::Dismiss => Flow::Dispatch(ConversionMsg::DismissError.into()),
        Command::Reboot => Flow::Dispatch(ConversionMsg::Reboot.into()),
        Command::Fail(message) => Flow::Dispatch(
            ConversionMsg::ExtractionFailed {
                message,
                detail: format!("host-injected failure at {}", effects::timestamp()),
            }
            .into(),
        ),
        Command::Ask(text) => Flow::Dispatch(AssistantMsg::UserSubmitted(text).into()),
        Command::Help => {
            let lines: Vec<String> = HELP_LINES.iter().map(|l| l.to_string()).collect();
            write_lines(out, &lines)?;
            Flow::Continue
        }
        Command::Invalid(reason) => {
            write_lines(out, &[reason])?;
            Flow::Continue
        }
        Command::Empty => Flow::Continue,
        Command::Quit => Flow::Quit,
    };
    Ok(flow)
}

fn spawn_input_reader(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    conv_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            conv_debug!("Input line {:?}", line);
            if host_tx.send(HostEvent::Input(parse_command(&line))).is_err() {
                return;
            }
        }
        let _ = host_tx.send(HostEvent::InputClosed);
    });
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
