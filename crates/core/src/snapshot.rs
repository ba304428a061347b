use serde::{Deserialize, Serialize};

use crate::tile::Tile;
use crate::types::{Color, GameState, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: u32,
    pub color: Color,
    pub kind: TileKind,
}

impl From<&Tile> for TileSnapshot {
    fn from(value: &Tile) -> Self {
        Self {
            id: value.id().0,
            color: value.color(),
            kind: value.kind(),
        }
    }
}

/// Read-only copy of everything presentation needs to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, bottom row first
    pub cells: Vec<Option<TileSnapshot>>,
    pub moves_remaining: u32,
    pub target_remaining: u32,
    pub blood_level: f32,
    pub game_state: GameState,
    pub paused: bool,
    pub busy: bool,
    pub episode_id: u32,
    pub seed: u32,
}

impl EngineSnapshot {
    pub fn cell(&self, x: u8, y: u8) -> Option<TileSnapshot> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .flatten()
    }

    pub fn playable(&self) -> bool {
        self.game_state == GameState::Playing && !self.paused && !self.busy
    }
}
