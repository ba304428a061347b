//! Core match-3 resolution logic - pure, deterministic, and testable
//!
//! This crate contains the board model, match detection, special tiles and
//! combos, the cascade loop and the resource meters that decide a session.
//! It has **no dependencies** on rendering, input or I/O:
//!
//! - **Deterministic**: every random decision goes through an injected
//!   [`RandomSource`], so a seed reproduces a session exactly
//! - **Synchronous**: a move runs to a stable board before returning; what
//!   happened is reported as a queue of [`EngineEvent`](types::EngineEvent)s
//! - **Headless**: presentation drains events and animates at its own pace
//!
//! # Module Structure
//!
//! - [`board`]: grid of optional tiles, the only writer of tile positions
//! - [`tile`]: tiles with stable ids
//! - [`rng`]: injectable randomness and the default LCG
//! - [`fill`]: color picks that avoid creating matches
//! - [`matcher`]: runs, squares and T/L/plus detection
//! - [`specials`]: placing specials earned by matches
//! - [`combo`]: pairwise special activation
//! - [`hint`]: move search and dead-board shuffle
//! - [`resources`]: moves, target and blood meters
//! - [`engine`]: validation, cascade orchestration and lifecycle
//! - [`config`]: validated session configuration
//! - [`snapshot`]: serializable read-only view
//!
//! # Rules
//!
//! - **Runs**: three or more same-colored normal tiles in a row or column
//! - **Blood drop**: earned by a run of four or more, spawned at its midpoint
//! - **Bat**: earned by a 2x2 square
//! - **Vampire**: earned by a horizontal and a vertical run sharing a cell
//! - **Combos**: swapping a special with a neighbour activates it instead of
//!   swapping, see [`combo`]
//! - **Meters**: each accepted move costs one move; each destroyed tile lowers
//!   the target and the blood level; blood rises over time
//!
//! # Example
//!
//! ```
//! use vampire_match_core::{Engine, EngineConfig};
//! use vampire_match_types::{GameState, MoveOutcome};
//!
//! let mut engine = Engine::new(EngineConfig::default().with_seed(7)).unwrap();
//! let (a, b) = engine.find_hint().unwrap();
//!
//! match engine.request_move(a, b) {
//!     MoveOutcome::Resolved(report) => assert!(report.destroyed > 0),
//!     other => panic!("hinted move should resolve, got {other:?}"),
//! }
//! assert_eq!(engine.moves_remaining(), 19);
//!
//! engine.tick(0.5);
//! assert_eq!(engine.game_state(), GameState::Playing);
//! ```

pub mod board;
pub mod combo;
pub mod config;
pub mod engine;
pub mod fill;
pub mod hint;
pub mod matcher;
pub mod resources;
pub mod rng;
pub mod snapshot;
pub mod specials;
pub mod tile;

pub use vampire_match_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, LayoutError};
pub use combo::{resolve_combo, ComboEffect};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, Phase, MAX_CASCADE_PASSES, MAX_SHUFFLE_ATTEMPTS};
pub use fill::FillGenerator;
pub use hint::{find_hint, has_possible_move};
pub use matcher::{find_matches, MatchGroup, MatchSet, MatchShape, SpawnRequest};
pub use resources::Resources;
pub use rng::{RandomSource, SimpleRng};
pub use snapshot::{EngineSnapshot, TileSnapshot};
pub use tile::{Tile, TileId};
