//! Headless autoplay.
//!
//! Plays a session by always taking the engine's hint, advancing the blood
//! meter by a fixed amount of time between moves.

use serde::Serialize;
use tracing::debug;

use crate::core::{Engine, RandomSource};
use crate::types::{EngineEvent, GameState, MoveOutcome};

#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Seconds of blood growth between two moves
    pub seconds_per_move: f32,
    /// Hard stop on requested moves
    pub max_steps: u32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            seconds_per_move: 1.0,
            max_steps: 1_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimSummary {
    pub seed: u32,
    pub episode_id: u32,
    pub state: GameState,
    pub steps: u32,
    pub reverted: u32,
    pub combos: u32,
    pub destroyed: u32,
    pub specials_spawned: u32,
    pub longest_cascade: u32,
    pub shuffles: u32,
    pub moves_remaining: u32,
    pub target_remaining: u32,
    pub blood_level: f32,
}

/// Play until the game ends, no hint exists, or `max_steps` moves were made.
/// Every drained event is passed to `on_event` in order.
pub fn run_session<R, F>(engine: &mut Engine<R>, opts: &SimOptions, mut on_event: F) -> SimSummary
where
    R: RandomSource,
    F: FnMut(&EngineEvent),
{
    let mut summary = SimSummary {
        seed: engine.config().seed,
        episode_id: engine.episode_id(),
        ..SimSummary::default()
    };

    while engine.game_state() == GameState::Playing && summary.steps < opts.max_steps {
        let Some((a, b)) = engine.find_hint() else {
            debug!("no hint available, stopping");
            break;
        };

        summary.steps += 1;
        match engine.request_move(a, b) {
            MoveOutcome::Resolved(report) => {
                summary.destroyed += report.destroyed;
                summary.specials_spawned += report.specials_spawned;
                summary.longest_cascade = summary.longest_cascade.max(report.cascade_passes);
                if report.combo.is_some() {
                    summary.combos += 1;
                }
            }
            MoveOutcome::Reverted => summary.reverted += 1,
            MoveOutcome::Rejected(err) => {
                debug!(%a, %b, code = err.code(), "hinted move rejected");
                break;
            }
        }

        engine.tick(opts.seconds_per_move);

        for event in engine.drain_events() {
            if matches!(event, EngineEvent::BoardShuffled { .. }) {
                summary.shuffles += 1;
            }
            on_event(&event);
        }
    }

    summary.state = engine.game_state();
    summary.moves_remaining = engine.moves_remaining();
    summary.target_remaining = engine.target_remaining();
    summary.blood_level = engine.blood_level();
    summary
}
