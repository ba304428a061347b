//! Resource meters and win/loss evaluation
//!
//! Three meters decide a session: moves left, tiles still to destroy, and the
//! blood level. Blood rises with time and falls with every destroyed tile.
//!
//! Evaluation order after any mutation:
//!
//! 1. `target_remaining == 0` -> Won
//! 2. `blood_level >= 1` -> Lost
//! 3. `moves_remaining == 0` -> Lost
//!
//! The first terminal state reached is final. Moves and destroys keep
//! updating the meters afterwards; time does not.

use crate::types::GameState;

#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    moves_remaining: u32,
    target_remaining: u32,
    blood_level: f32,
    state: GameState,
    blood_increase_per_second: f32,
    blood_decrease_per_match: f32,
}

impl Resources {
    pub fn new(
        moves: u32,
        target: u32,
        initial_blood: f32,
        blood_increase_per_second: f32,
        blood_decrease_per_match: f32,
    ) -> Self {
        Self {
            moves_remaining: moves,
            target_remaining: target,
            blood_level: clamp01(initial_blood),
            state: GameState::Playing,
            blood_increase_per_second,
            blood_decrease_per_match,
        }
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn target_remaining(&self) -> u32 {
        self.target_remaining
    }

    pub fn blood_level(&self) -> f32 {
        self.blood_level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// One accepted action
    pub fn consume_move(&mut self) {
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    /// `n` tiles destroyed by a match pass or combo
    pub fn record_destroyed(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        self.target_remaining = self.target_remaining.saturating_sub(n);
        self.blood_level = clamp01(self.blood_level - n as f32 * self.blood_decrease_per_match);
    }

    /// Raise blood for `elapsed` seconds. Non-finite or negative input counts as 0.
    pub fn advance(&mut self, elapsed: f32) {
        if self.state.is_terminal() || !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }
        self.blood_level = clamp01(self.blood_level + self.blood_increase_per_second * elapsed);
    }

    /// Check the terminal conditions. Returns the new state on the transition
    /// out of `Playing`, `None` otherwise.
    pub fn evaluate(&mut self) -> Option<GameState> {
        if self.state.is_terminal() {
            return None;
        }
        let next = if self.target_remaining == 0 {
            GameState::Won
        } else if self.blood_level >= 1.0 {
            GameState::Lost
        } else if self.moves_remaining == 0 {
            GameState::Lost
        } else {
            return None;
        };
        self.state = next;
        Some(next)
    }

    #[cfg(test)]
    pub(crate) fn set_blood_level(&mut self, level: f32) {
        self.blood_level = clamp01(level);
    }
}

fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}
