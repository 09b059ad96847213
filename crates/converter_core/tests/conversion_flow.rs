use std::sync::Once;

use converter_core::{
    update, AppState, ConversionMsg, Effect, Msg, RunId, TargetFormat, VisualState, PROGRESS_TICK,
    TELEMETRY_LABELS, TELEMETRY_TICK,
};
use pretty_assertions::assert_eq;

const AT: &str = "2026-10-18 09:30:00";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(converter_logging::initialize_for_tests);
}

fn conv(state: AppState, msg: ConversionMsg) -> (AppState, Vec<Effect>) {
    update(state, Msg::Conversion(msg))
}

fn select(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    conv(
        state,
        ConversionMsg::FileSelected {
            name: name.to_string(),
        },
    )
}

fn started_run(effects: &[Effect]) -> RunId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartConversionTimers { run, .. } => Some(*run),
            _ => None,
        })
        .expect("start timers effect")
}

fn tick(state: AppState, run: RunId) -> (AppState, Vec<Effect>) {
    conv(
        state,
        ConversionMsg::ProgressTick {
            run,
            at: AT.to_string(),
        },
    )
}

/// Ticks until the run leaves `Running`; returns the effects of the last tick.
fn run_to_completion(mut state: AppState, run: RunId) -> (AppState, Vec<Effect>, usize) {
    let mut ticks = 0;
    loop {
        let (next, effects) = tick(state, run);
        state = next;
        ticks += 1;
        if state.conversion().visual_state() != VisualState::Running {
            return (state, effects, ticks);
        }
        assert!(ticks < 1_000, "run never finished");
    }
}

#[test]
fn selecting_a_file_starts_both_timers() {
    init_logging();
    let (mut state, effects) = select(AppState::new(), "report.pdf");

    assert_eq!(
        effects,
        vec![Effect::StartConversionTimers {
            run: 1,
            progress_period: PROGRESS_TICK,
            telemetry_period: TELEMETRY_TICK,
        }]
    );
    let view = state.view();
    assert_eq!(view.conversion.visual, VisualState::Running);
    assert_eq!(view.conversion.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(view.conversion.progress_tenths, 0);
    assert_eq!(
        view.conversion.telemetry_label.as_deref(),
        Some(TELEMETRY_LABELS[0])
    );
    assert!(state.consume_dirty());
}

#[test]
fn progress_is_monotonic_bounded_and_succeeds_only_at_100() {
    init_logging();
    let (mut state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);

    let mut last = 0;
    loop {
        let (next, effects) = tick(state, run);
        state = next;
        let progress = state.conversion().progress_tenths();
        assert!(progress >= last, "progress went backwards");
        assert!(progress <= 1000);
        last = progress;

        if progress < 1000 {
            assert_eq!(state.conversion().visual_state(), VisualState::Running);
            assert!(state.conversion().result().is_none());
            assert!(effects.is_empty());
        } else {
            assert_eq!(state.conversion().visual_state(), VisualState::Succeeded);
            assert!(state.conversion().result().is_some());
            break;
        }
    }
}

#[test]
fn completion_cancels_timers_and_downloads_once() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);

    let (state, effects, _) = run_to_completion(state, run);

    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::CancelConversionTimers);
    match &effects[1] {
        Effect::Download {
            source_name,
            payload,
        } => {
            assert_eq!(source_name, "report.pdf");
            assert_eq!(payload.format(), TargetFormat::Excel);
            assert_eq!(Some(payload), state.conversion().result());
        }
        other => panic!("expected download, got {other:?}"),
    }
    assert_eq!(state.conversion().status_message(), "Conversion complete");
}

#[test]
fn ticks_after_completion_are_ignored() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (mut state, _, _) = run_to_completion(state, run);
    state.consume_dirty();
    let before = state.clone();

    let (state, effects) = tick(state, run);
    let (mut state, more) = conv(state, ConversionMsg::TelemetryTick { run });

    assert!(effects.is_empty());
    assert!(more.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn telemetry_cycles_and_wraps() {
    init_logging();
    let (mut state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);

    for expected in TELEMETRY_LABELS.iter().skip(1) {
        state = conv(state, ConversionMsg::TelemetryTick { run }).0;
        assert_eq!(state.conversion().telemetry_label(), *expected);
    }
    state = conv(state, ConversionMsg::TelemetryTick { run }).0;
    assert_eq!(state.conversion().telemetry_label(), TELEMETRY_LABELS[0]);
    // Labels never move progress.
    assert_eq!(state.conversion().progress_tenths(), 0);
}

#[test]
fn selecting_while_running_is_rejected() {
    init_logging();
    let (state, effects) = select(AppState::new(), "first.pdf");
    let run = started_run(&effects);
    let (mut state, _) = tick(state, run);
    state.consume_dirty();

    let (mut state, effects) = select(state, "second.pdf");

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.conversion().selected_file(), Some("first.pdf"));
    assert_eq!(state.conversion().live_run(), Some(run));
    assert_eq!(state.conversion().progress_tenths(), 45);
}

#[test]
fn new_selection_after_success_gets_a_fresh_run() {
    init_logging();
    let (state, effects) = select(AppState::new(), "first.pdf");
    let first = started_run(&effects);
    let (state, _, _) = run_to_completion(state, first);

    let (state, effects) = select(state, "second.pdf");
    let second = started_run(&effects);

    assert!(second > first);
    assert_eq!(state.conversion().result(), None);
    assert_eq!(state.conversion().progress_tenths(), 0);

    // A straggling tick from the first run must not advance the second.
    let (state, effects) = tick(state, first);
    assert!(effects.is_empty());
    assert_eq!(state.conversion().progress_tenths(), 0);
}

#[test]
fn redownload_repeats_side_effect_without_mutation() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (mut state, _, _) = run_to_completion(state, run);
    state.consume_dirty();
    let before = state.clone();

    let (state, first) = conv(state, ConversionMsg::DownloadRequested);
    let (mut state, second) = conv(state, ConversionMsg::DownloadRequested);

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert!(matches!(first[0], Effect::Download { .. }));
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn download_before_success_does_nothing() {
    init_logging();
    let (state, effects) = conv(AppState::new(), ConversionMsg::DownloadRequested);
    assert!(effects.is_empty());

    let (state, _) = select(state, "report.pdf");
    let (_state, effects) = conv(state, ConversionMsg::DownloadRequested);
    assert!(effects.is_empty());
}

#[test]
fn reset_mid_run_is_total() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (state, _) = tick(state, run);
    let (state, _) = conv(state, ConversionMsg::TelemetryTick { run });

    let (state, effects) = conv(state, ConversionMsg::NewTaskRequested);

    assert_eq!(effects, vec![Effect::CancelConversionTimers]);
    let fresh = AppState::new().view();
    let view = state.view();
    assert_eq!(view.conversion, fresh.conversion);
    assert_eq!(view.error_state, None);
    assert_eq!(state.conversion().live_run(), None);

    // Late ticks from the cancelled run are dropped.
    let (state, effects) = tick(state, run);
    assert!(effects.is_empty());
    assert_eq!(state.conversion().progress_tenths(), 0);
}

#[test]
fn reset_after_error_clears_host_signal() {
    init_logging();
    let (state, _) = select(AppState::new(), "report.pdf");
    let (state, _) = conv(
        state,
        ConversionMsg::ExtractionFailed {
            message: "Extraction anomaly".into(),
            detail: "glyph table corrupt".into(),
        },
    );
    assert_eq!(state.error_state(), Some("Extraction anomaly"));

    let (state, _) = conv(state, ConversionMsg::Reboot);

    assert_eq!(state.error_state(), None);
    assert_eq!(state.view().conversion, AppState::new().view().conversion);
}

#[test]
fn failure_mid_run_cancels_timers_and_shows_overlay() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (state, _) = tick(state, run);

    let (state, effects) = conv(
        state,
        ConversionMsg::ExtractionFailed {
            message: "Extraction anomaly".into(),
            detail: "ERR_GLYPH_0x1F".into(),
        },
    );

    assert_eq!(effects, vec![Effect::CancelConversionTimers]);
    let view = state.view();
    assert_eq!(view.conversion.visual, VisualState::Errored);
    let error = view.conversion.error.expect("overlay error");
    assert_eq!(error.detail, "ERR_GLYPH_0x1F");
    assert_eq!(view.error_state.as_deref(), Some("Extraction anomaly"));

    let (state, effects) = tick(state, run);
    assert!(effects.is_empty());
    assert_eq!(state.conversion().progress_tenths(), 45);
}

#[test]
fn dismiss_keeps_task_but_reboot_clears_it() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (state, _, _) = run_to_completion(state, run);
    let (errored, _) = conv(
        state,
        ConversionMsg::ExtractionFailed {
            message: "Extraction anomaly".into(),
            detail: "late checksum mismatch".into(),
        },
    );
    assert_eq!(errored.conversion().visual_state(), VisualState::Errored);

    let (dismissed, effects) = conv(errored.clone(), ConversionMsg::DismissError);
    assert!(effects.is_empty());
    assert_eq!(dismissed.conversion().visual_state(), VisualState::Succeeded);
    assert!(dismissed.conversion().result().is_some());
    assert_eq!(dismissed.conversion().selected_file(), Some("report.pdf"));
    assert!(dismissed.conversion().error().is_some());
    assert_eq!(dismissed.error_state(), Some("Extraction anomaly"));

    let (rebooted, effects) = conv(errored, ConversionMsg::Reboot);
    assert_eq!(effects, vec![Effect::CancelConversionTimers]);
    assert_eq!(rebooted.conversion().visual_state(), VisualState::Idle);
    assert!(rebooted.conversion().result().is_none());
    assert_eq!(rebooted.conversion().selected_file(), None);
    assert!(rebooted.conversion().error().is_none());
    assert_eq!(rebooted.error_state(), None);
}

#[test]
fn dismissed_mid_run_failure_allows_a_new_selection() {
    init_logging();
    let (state, effects) = select(AppState::new(), "first.pdf");
    let run = started_run(&effects);
    let (state, _) = tick(state, run);
    let (state, _) = conv(
        state,
        ConversionMsg::ExtractionFailed {
            message: "Extraction anomaly".into(),
            detail: "stream truncated".into(),
        },
    );
    let (state, _) = conv(state, ConversionMsg::DismissError);
    assert_eq!(state.conversion().visual_state(), VisualState::Running);
    assert!(!state.conversion().is_busy());

    let (state, effects) = select(state, "second.pdf");

    assert_eq!(started_run(&effects), run + 1);
    assert_eq!(state.error_state(), None);
    assert!(state.conversion().error().is_none());
}

#[test]
fn dismiss_without_overlay_is_ignored() {
    init_logging();
    let (mut state, effects) = conv(AppState::new(), ConversionMsg::DismissError);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn word_result_uses_format_at_completion() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (state, _) = update(state, Msg::FormatSelected(TargetFormat::Word));

    let (state, _, _) = run_to_completion(state, run);

    let payload = state.conversion().result().expect("payload");
    assert_eq!(payload.format(), TargetFormat::Word);
    let text = std::str::from_utf8(payload.bytes()).expect("utf8 report");
    assert!(text.contains("report.pdf"));
    assert!(text.contains(AT));
}

#[test]
fn full_run_takes_seventy_five_ticks() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);

    let (_state, _, ticks) = run_to_completion(state, run);

    assert_eq!(ticks, 75);
}

#[test]
fn errored_overlay_blocks_download_and_new_selection() {
    init_logging();
    let (state, effects) = select(AppState::new(), "report.pdf");
    let run = started_run(&effects);
    let (state, _, _) = run_to_completion(state, run);
    let (mut errored, _) = conv(
        state,
        ConversionMsg::ExtractionFailed {
            message: "Extraction anomaly".into(),
            detail: "late checksum mismatch".into(),
        },
    );
    errored.consume_dirty();
    let before = errored.clone();

    let (state, download_effects) = conv(errored, ConversionMsg::DownloadRequested);
    let (mut state, select_effects) = select(state, "other.pdf");

    assert!(download_effects.is_empty());
    assert!(select_effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
    assert_eq!(state.conversion().visual_state(), VisualState::Errored);

    // Once dismissed, the finished result downloads again.
    let (state, _) = conv(state, ConversionMsg::DismissError);
    let (_state, effects) = conv(state, ConversionMsg::DownloadRequested);
    assert!(matches!(effects.as_slice(), [Effect::Download { .. }]));
}
