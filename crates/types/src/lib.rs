//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data exchanged between the resolution engine and
//! whatever drives it (a renderer, a bot, a test). Nothing here owns game state;
//! the engine in `vampire-match-core` does.
//!
//! # Board Coordinates
//!
//! - `x` grows left to right, `y` grows bottom to top
//! - `y = 0` is the bottom row, gravity pulls tiles toward it
//! - Default board is 5x5 with four colors
//!
//! # Tunables
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TOTAL_MOVES` | 20 | Moves granted per session |
//! | `DEFAULT_TARGET_MIN`..`DEFAULT_TARGET_MAX` | 30..=50 | Tiles to destroy to win |
//! | `DEFAULT_BLOOD_INCREASE_PER_SECOND` | 0.01 | Blood meter rise per second |
//! | `DEFAULT_BLOOD_DECREASE_PER_MATCH` | 0.03 | Blood meter drop per destroyed tile |
//!
//! # Examples
//!
//! ```
//! use vampire_match_types::{Color, Pos, TileKind};
//!
//! let a = Pos::new(1, 2);
//! assert!(a.is_adjacent(Pos::new(1, 3)));
//! assert!(!a.is_adjacent(Pos::new(2, 3)));
//!
//! assert_eq!(Color::from_str("yellow"), Some(Color::Yellow));
//! assert!(TileKind::BloodDrop { target: Color::Red }.is_special());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default board width (columns)
pub const DEFAULT_WIDTH: u8 = 5;

/// Default board height (rows)
pub const DEFAULT_HEIGHT: u8 = 5;

/// Smallest accepted board side
pub const MIN_BOARD_SIDE: u8 = 3;

/// Largest accepted board side (coordinates are stored as `i8`)
pub const MAX_BOARD_SIDE: u8 = 32;

/// Number of colors in the full palette
pub const COLOR_COUNT: usize = 4;

/// Fewest colors a session may use
pub const MIN_COLOR_COUNT: u8 = 3;

pub const DEFAULT_TOTAL_MOVES: u32 = 20;
pub const DEFAULT_TARGET_MIN: u32 = 30;
pub const DEFAULT_TARGET_MAX: u32 = 50;
pub const DEFAULT_BLOOD_INCREASE_PER_SECOND: f32 = 0.01;
pub const DEFAULT_BLOOD_DECREASE_PER_MATCH: f32 = 0.03;

/// Shortest run that counts as a match
pub const MIN_RUN: usize = 3;

/// Shortest run that spawns a blood drop
pub const BLOOD_DROP_RUN: usize = 4;

/// Bat + Bat destroys up to this many normal tiles
pub const BAT_PAIR_DESTROY: usize = 10;

/// Vampire + Bat destroys up to this many normal tiles
pub const VAMPIRE_BAT_DESTROY: usize = 20;

/// Bat + BloodDrop converts up to this many normal tiles into blood drops
pub const BAT_BLOOD_DROP_CONVERSIONS: usize = 3;

/// Vampire + Normal converts up to this many normal tiles into bats
pub const VAMPIRE_NORMAL_CONVERSIONS: usize = 3;

/// BloodDrop + BloodDrop clears this many distinct colors
pub const BLOOD_DROP_PAIR_COLORS: usize = 2;

/// Board cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Offset by (dx, dy) without bounds checking
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(self, other: Pos) -> u8 {
        let dx = (self.x as i16 - other.x as i16).unsigned_abs();
        let dy = (self.y as i16 - other.y as i16).unsigned_abs();
        dx.max(dy) as u8
    }

    /// Manhattan distance
    pub fn manhattan(self, other: Pos) -> u16 {
        (self.x as i16 - other.x as i16).unsigned_abs()
            + (self.y as i16 - other.y as i16).unsigned_abs()
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tile colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    /// Full palette in index order
    pub const ALL: [Color; COLOR_COUNT] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Yellow => 1,
            Color::Green => 2,
            Color::Blue => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use vampire_match_types::Color;
    ///
    /// assert_eq!(Color::from_str("RED"), Some(Color::Red));
    /// assert_eq!(Color::from_str("purple"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }

    /// Single-letter code used by board layouts (`R`, `Y`, `G`, `B`)
    pub fn as_char(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }

    /// Inverse of [`Color::as_char`], case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            _ => None,
        }
    }
}

/// What a tile is, with kind-specific payload
///
/// - **Normal**: takes part in line and square matching
/// - **BloodDrop**: spawned by runs of four or more, remembers a target color
/// - **Bat**: spawned by 2x2 squares
/// - **Vampire**: spawned by T/L/plus intersections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TileKind {
    Normal,
    BloodDrop { target: Color },
    Bat,
    Vampire,
}

impl TileKind {
    pub fn is_normal(&self) -> bool {
        matches!(self, TileKind::Normal)
    }

    pub fn is_special(&self) -> bool {
        !self.is_normal()
    }

    /// Special kind without payload, `None` for normal tiles
    pub fn special(&self) -> Option<SpecialKind> {
        match self {
            TileKind::Normal => None,
            TileKind::BloodDrop { .. } => Some(SpecialKind::BloodDrop),
            TileKind::Bat => Some(SpecialKind::Bat),
            TileKind::Vampire => Some(SpecialKind::Vampire),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "normal",
            TileKind::BloodDrop { .. } => "blood_drop",
            TileKind::Bat => "bat",
            TileKind::Vampire => "vampire",
        }
    }
}

/// Special tile kinds, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    BloodDrop,
    Bat,
    Vampire,
}

/// Session outcome state. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// Pairwise activation between two adjacent tiles where at least one is special
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    BloodDropPair,
    BatPair,
    BatBloodDrop,
    BatNormal,
    BloodDropNormal,
    VampirePair,
    VampireBat,
    VampireBloodDrop,
    VampireNormal,
}

impl ComboKind {
    /// Classify an unordered pair of tile kinds. `None` for two normal tiles.
    pub fn classify(a: TileKind, b: TileKind) -> Option<Self> {
        use SpecialKind::*;
        let combo = match (a.special(), b.special()) {
            (None, None) => return None,
            (Some(BloodDrop), Some(BloodDrop)) => ComboKind::BloodDropPair,
            (Some(Bat), Some(Bat)) => ComboKind::BatPair,
            (Some(Bat), Some(BloodDrop)) | (Some(BloodDrop), Some(Bat)) => ComboKind::BatBloodDrop,
            (Some(Bat), None) | (None, Some(Bat)) => ComboKind::BatNormal,
            (Some(BloodDrop), None) | (None, Some(BloodDrop)) => ComboKind::BloodDropNormal,
            (Some(Vampire), Some(Vampire)) => ComboKind::VampirePair,
            (Some(Vampire), Some(Bat)) | (Some(Bat), Some(Vampire)) => ComboKind::VampireBat,
            (Some(Vampire), Some(BloodDrop)) | (Some(BloodDrop), Some(Vampire)) => {
                ComboKind::VampireBloodDrop
            }
            (Some(Vampire), None) | (None, Some(Vampire)) => ComboKind::VampireNormal,
        };
        Some(combo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComboKind::BloodDropPair => "blood_drop_pair",
            ComboKind::BatPair => "bat_pair",
            ComboKind::BatBloodDrop => "bat_blood_drop",
            ComboKind::BatNormal => "bat_normal",
            ComboKind::BloodDropNormal => "blood_drop_normal",
            ComboKind::VampirePair => "vampire_pair",
            ComboKind::VampireBat => "vampire_bat",
            ComboKind::VampireBloodDrop => "vampire_blood_drop",
            ComboKind::VampireNormal => "vampire_normal",
        }
    }
}

/// Why a move request was refused. A rejected request never mutates the board
/// and never consumes a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Pos),
    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(Pos, Pos),
    #[error("board is resolving a previous move")]
    EngineBusy,
    #[error("game is over ({0:?})")]
    InvalidState(GameState),
    #[error("game is paused")]
    Paused,
    #[error("cell {0} is empty")]
    EmptyCell(Pos),
}

impl MoveError {
    pub fn code(self) -> &'static str {
        match self {
            MoveError::OutOfBounds(_) => "out_of_bounds",
            MoveError::NotAdjacent(..) => "not_adjacent",
            MoveError::EngineBusy => "engine_busy",
            MoveError::InvalidState(_) | MoveError::Paused => "invalid_state",
            MoveError::EmptyCell(_) => "empty_cell",
        }
    }
}

/// Summary of an accepted move that destroyed something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveReport {
    /// Combo that started the resolution, `None` for an ordinary swap
    pub combo: Option<ComboKind>,
    /// Tiles destroyed over the whole resolution, cascades included
    pub destroyed: u32,
    /// Destroy/collapse/refill passes run
    pub cascade_passes: u32,
    /// Specials spawned by matches during the resolution
    pub specials_spawned: u32,
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Refused during validation, nothing changed
    Rejected(MoveError),
    /// Ordinary swap with no match: swapped back, one move consumed
    Reverted,
    /// Match or combo resolved to a stable board, one move consumed
    Resolved(MoveReport),
}

impl MoveOutcome {
    /// True when the request consumed a move
    pub fn is_accepted(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }

    pub fn error(&self) -> Option<MoveError> {
        match self {
            MoveOutcome::Rejected(e) => Some(*e),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&MoveReport> {
        match self {
            MoveOutcome::Resolved(r) => Some(r),
            _ => None,
        }
    }
}

/// Tile as seen by presentation: where it is, what it looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileInfo {
    pub pos: Pos,
    pub color: Color,
    pub kind: TileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMove {
    pub from: Pos,
    pub to: Pos,
}

/// Step-boundary events, queued in order and drained by the caller.
///
/// The engine never waits for these to be consumed; presentation may animate
/// them at its own pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    TilesSwapped { a: Pos, b: Pos },
    SwapReverted { a: Pos, b: Pos },
    ComboActivated { combo: ComboKind, a: Pos, b: Pos },
    TilesDestroyed { tiles: Vec<TileInfo> },
    /// Collapse moves, one entry per tile that fell
    TilesMoved { moves: Vec<TileMove> },
    /// New tiles: refills and specials spawned by matches
    TilesSpawned { tiles: Vec<TileInfo> },
    /// Tiles changed kind in place (combo conversions)
    TilesConverted { tiles: Vec<TileInfo> },
    BoardShuffled { moves: Vec<TileMove> },
    GameWon,
    GameLost,
}
