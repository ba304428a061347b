//! Session configuration
//!
//! Immutable once an engine is built from it. Every field has a default, so a
//! partial JSON object is a valid config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    COLOR_COUNT, DEFAULT_BLOOD_DECREASE_PER_MATCH, DEFAULT_BLOOD_INCREASE_PER_SECOND,
    DEFAULT_HEIGHT, DEFAULT_TARGET_MAX, DEFAULT_TARGET_MIN, DEFAULT_TOTAL_MOVES, DEFAULT_WIDTH,
    MAX_BOARD_SIDE, MIN_BOARD_SIDE, MIN_COLOR_COUNT,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "board size {width}x{height} must be within {min}..={max} on each side",
        min = MIN_BOARD_SIDE,
        max = MAX_BOARD_SIDE
    )]
    BoardSize { width: u8, height: u8 },
    #[error(
        "color count {0} must be within {min}..={max}",
        min = MIN_COLOR_COUNT,
        max = COLOR_COUNT
    )]
    ColorCount(u8),
    #[error("total moves must be at least 1")]
    NoMoves,
    #[error("target range {min}..={max} is empty or starts at 0")]
    TargetRange { min: u32, max: u32 },
    #[error("initial blood {0} must be within [0, 1)")]
    InitialBlood(f32),
    #[error("{name} must be finite and non-negative, got {value}")]
    Rate { name: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    /// Number of palette colors in play, taken from the front of `Color::ALL`
    pub color_count: u8,
    pub total_moves: u32,
    /// Target tile count is drawn uniformly from `target_min..=target_max`
    pub target_min: u32,
    pub target_max: u32,
    pub initial_blood: f32,
    pub blood_increase_per_second: f32,
    pub blood_decrease_per_match: f32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_count: COLOR_COUNT as u8,
            total_moves: DEFAULT_TOTAL_MOVES,
            target_min: DEFAULT_TARGET_MIN,
            target_max: DEFAULT_TARGET_MAX,
            initial_blood: 0.0,
            blood_increase_per_second: DEFAULT_BLOOD_INCREASE_PER_SECOND,
            blood_decrease_per_match: DEFAULT_BLOOD_DECREASE_PER_MATCH,
            seed: 1,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Apply `VAMPIRE_MATCH_SEED` if it is set and parses
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        if let Some(seed) = env::var("VAMPIRE_MATCH_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.seed = seed;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(ConfigError::BoardSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_COLOR_COUNT..=COLOR_COUNT as u8).contains(&self.color_count) {
            return Err(ConfigError::ColorCount(self.color_count));
        }
        if self.total_moves == 0 {
            return Err(ConfigError::NoMoves);
        }
        if self.target_min == 0 || self.target_min > self.target_max {
            return Err(ConfigError::TargetRange {
                min: self.target_min,
                max: self.target_max,
            });
        }
        if !(0.0..1.0).contains(&self.initial_blood) {
            return Err(ConfigError::InitialBlood(self.initial_blood));
        }
        for (name, value) in [
            ("blood_increase_per_second", self.blood_increase_per_second),
            ("blood_decrease_per_match", self.blood_decrease_per_match),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Rate { name, value });
            }
        }
        Ok(())
    }
}
