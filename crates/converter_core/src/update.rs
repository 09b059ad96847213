use crate::assistant::AssistantEffect;
use crate::conversion::ConversionEffect;
use crate::effect::Reaction;
use crate::{AppState, Effect, Msg, PROGRESS_TICK, TELEMETRY_TICK};

/// Pure update function: applies a message to state and returns any effects.
///
/// The conversion panel's error updates never leave the core: they are
/// stored as the host's error state and forwarded to the assistant here.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormatSelected(format) => {
            if state.set_format(format) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Conversion(msg) => {
            let format = state.format();
            let reaction = state.conversion_mut().apply(msg, format);
            route_conversion(&mut state, reaction)
        }
        Msg::Assistant(msg) => {
            let reaction = state.assistant_mut().apply(msg);
            route_assistant(&mut state, reaction)
        }
    };

    (state, effects)
}

fn route_conversion(state: &mut AppState, reaction: Reaction<ConversionEffect>) -> Vec<Effect> {
    if reaction.changed {
        state.mark_dirty();
    }
    let mut effects = Vec::with_capacity(reaction.effects.len());
    for effect in reaction.effects {
        match effect {
            ConversionEffect::StartTimers { run } => effects.push(Effect::StartConversionTimers {
                run,
                progress_period: PROGRESS_TICK,
                telemetry_period: TELEMETRY_TICK,
            }),
            ConversionEffect::CancelTimers => effects.push(Effect::CancelConversionTimers),
            ConversionEffect::Download {
                source_name,
                payload,
            } => effects.push(Effect::Download {
                source_name,
                payload,
            }),
            ConversionEffect::ErrorUpdate(value) => {
                if state.set_error_state(value.clone()) {
                    state.mark_dirty();
                }
                let forwarded = state.assistant_mut().on_error_signal(value.as_deref());
                effects.extend(route_assistant(state, forwarded));
            }
        }
    }
    effects
}

fn route_assistant(state: &mut AppState, reaction: Reaction<AssistantEffect>) -> Vec<Effect> {
    if reaction.changed {
        state.mark_dirty();
    }
    reaction
        .effects
        .into_iter()
        .map(|effect| match effect {
            AssistantEffect::ScheduleReply { reply, delay } => {
                Effect::ScheduleReply { reply, delay }
            }
        })
        .collect()
}
