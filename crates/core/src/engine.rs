//! Engine - move validation, cascade resolution and session lifecycle
//!
//! The engine is a single-threaded state machine advanced by two calls:
//! [`Engine::request_move`] and [`Engine::tick`]. A move either is rejected
//! during validation without touching anything, or runs to a stable board
//! before returning. Everything that happened along the way is queued as
//! [`EngineEvent`]s for the caller to drain.
//!
//! Resolution loop for one accepted move:
//!
//! 1. destroy the current match set (or apply the combo)
//! 2. update the resource meters
//! 3. place pending specials
//! 4. collapse columns
//! 5. refill empty cells
//! 6. detect again, repeat from 1 while anything matches

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::board::{Board, BoardError};
use crate::combo::resolve_combo;
use crate::config::{ConfigError, EngineConfig};
use crate::fill::FillGenerator;
use crate::hint::{find_hint, has_possible_move, shuffle_tiles};
use crate::matcher::{find_matches, MatchSet, SpawnRequest};
use crate::resources::Resources;
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::{EngineSnapshot, TileSnapshot};
use crate::specials::place_spawn;
use crate::tile::{Tile, TileIds};
use crate::types::{
    Color, ComboKind, EngineEvent, GameState, MoveError, MoveOutcome, MoveReport, Pos,
};

/// Upper bound on destroy/refill passes for a single move
pub const MAX_CASCADE_PASSES: u32 = 64;

/// Shuffle attempts on a dead board before it is regenerated
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Resolving,
}

#[derive(Debug, Clone)]
pub struct Engine<R: RandomSource = SimpleRng> {
    config: EngineConfig,
    board: Board,
    rng: R,
    ids: TileIds,
    fill: FillGenerator,
    resources: Resources,
    phase: Phase,
    paused: bool,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    events: Vec<EngineEvent>,
    pending_spawns: VecDeque<SpawnRequest>,
}

impl Engine<SimpleRng> {
    /// Start a session with a generated board, seeded from the config
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let rng = SimpleRng::new(config.seed);
        Self::with_rng(config, rng)
    }

    /// Start a session on a prepared board. The board's size replaces the
    /// configured one and its tiles are used as given.
    pub fn from_board(config: EngineConfig, board: Board) -> Result<Self, ConfigError> {
        let rng = SimpleRng::new(config.seed);
        Self::with_board_and_rng(config, board, rng)
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height);
        let mut engine = Self::assemble(config, board, rng);
        engine.generate_board();
        Ok(engine)
    }

    pub fn with_board_and_rng(
        mut config: EngineConfig,
        board: Board,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.width = board.width();
        config.height = board.height();
        config.validate()?;
        Ok(Self::assemble(config, board, rng))
    }

    fn assemble(config: EngineConfig, board: Board, mut rng: R) -> Self {
        let resources = draw_resources(&config, &mut rng);
        let ids = board.max_tile_id().map(TileIds::after).unwrap_or_default();
        Self {
            fill: FillGenerator::new(config.color_count),
            config,
            board,
            rng,
            ids,
            resources,
            phase: Phase::Idle,
            paused: false,
            episode_id: 0,
            events: Vec::new(),
            pending_spawns: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.board.tile(pos)
    }

    pub fn palette(&self) -> &[Color] {
        self.fill.palette()
    }

    pub fn moves_remaining(&self) -> u32 {
        self.resources.moves_remaining()
    }

    pub fn target_remaining(&self) -> u32 {
        self.resources.target_remaining()
    }

    pub fn blood_level(&self) -> f32 {
        self.resources.blood_level()
    }

    pub fn game_state(&self) -> GameState {
        self.resources.state()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a move is being resolved. Input should be disabled.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Resolving
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Events queued since the last drain, oldest first
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// A move that would match or activate a special, if the board has one
    pub fn find_hint(&self) -> Option<(Pos, Pos)> {
        find_hint(&self.board)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            cells: self
                .board
                .positions()
                .map(|p| self.board.tile(p).map(TileSnapshot::from))
                .collect(),
            moves_remaining: self.moves_remaining(),
            target_remaining: self.target_remaining(),
            blood_level: self.blood_level(),
            game_state: self.game_state(),
            paused: self.paused,
            busy: self.is_busy(),
            episode_id: self.episode_id,
            seed: self.config.seed,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Start a new episode with the same config. The RNG stream continues, so
    /// the new board differs from the previous one.
    pub fn restart(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.paused = false;
        self.phase = Phase::Idle;
        self.events.clear();
        self.pending_spawns.clear();
        self.resources = draw_resources(&self.config, &mut self.rng);
        self.board = Board::new(self.config.width, self.config.height);
        self.generate_board();
        info!(
            episode_id = self.episode_id,
            target = self.target_remaining(),
            "session restarted"
        );
    }

    /// Advance the blood meter by `elapsed_seconds`. Ignored while paused,
    /// resolving, or after the game ended.
    pub fn tick(&mut self, elapsed_seconds: f32) {
        if self.paused || self.phase != Phase::Idle || self.game_state().is_terminal() {
            return;
        }
        self.resources.advance(elapsed_seconds);
        self.evaluate();
    }

    /// Swap two adjacent tiles, or activate the combo they form
    pub fn request_move(&mut self, a: Pos, b: Pos) -> MoveOutcome {
        if let Err(err) = self.validate_move(a, b) {
            debug!(%a, %b, code = err.code(), "move rejected");
            return MoveOutcome::Rejected(err);
        }

        self.phase = Phase::Resolving;
        let outcome = match self.resolve_move(a, b) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%a, %b, error = %err, "board operation failed during resolution");
                let BoardError::OutOfBounds { x, y } = err;
                MoveOutcome::Rejected(MoveError::OutOfBounds(Pos::new(x, y)))
            }
        };
        self.phase = Phase::Idle;
        outcome
    }

    fn validate_move(&mut self, a: Pos, b: Pos) -> Result<(), MoveError> {
        let state = self.game_state();
        if state.is_terminal() {
            return Err(MoveError::InvalidState(state));
        }
        if self.paused {
            return Err(MoveError::Paused);
        }
        if self.phase == Phase::Resolving {
            return Err(MoveError::EngineBusy);
        }

        self.phase = Phase::Validating;
        let checked = self.check_cells(a, b);
        self.phase = Phase::Idle;
        checked
    }

    fn check_cells(&self, a: Pos, b: Pos) -> Result<(), MoveError> {
        for p in [a, b] {
            if !self.board.in_bounds(p) {
                return Err(MoveError::OutOfBounds(p));
            }
        }
        if !a.is_adjacent(b) {
            return Err(MoveError::NotAdjacent(a, b));
        }
        for p in [a, b] {
            if self.board.tile(p).is_none() {
                return Err(MoveError::EmptyCell(p));
            }
        }
        Ok(())
    }

    fn resolve_move(&mut self, a: Pos, b: Pos) -> Result<MoveOutcome, BoardError> {
        let kind_a = self.board.get(a)?.map(|t| t.kind());
        let kind_b = self.board.get(b)?.map(|t| t.kind());
        let combo = match (kind_a, kind_b) {
            (Some(ka), Some(kb)) => ComboKind::classify(ka, kb),
            _ => None,
        };

        let mut report = MoveReport {
            combo,
            ..MoveReport::default()
        };

        let matches = match combo {
            None => {
                self.board.swap(a, b)?;
                self.events.push(EngineEvent::TilesSwapped { a, b });
                let matches = find_matches(&self.board);
                if matches.is_empty() {
                    self.board.swap(a, b)?;
                    self.events.push(EngineEvent::SwapReverted { a, b });
                    debug!(%a, %b, "swap reverted");
                    self.finish_action();
                    return Ok(MoveOutcome::Reverted);
                }
                matches
            }
            Some(combo) => {
                self.events.push(EngineEvent::ComboActivated { combo, a, b });
                let palette = self.fill.palette().to_vec();
                if let Some(effect) =
                    resolve_combo(&mut self.board, a, b, &palette, &mut self.rng)?
                {
                    debug!(
                        combo = combo.as_str(),
                        destroyed = effect.destroyed.len(),
                        converted = effect.converted.len(),
                        "combo activated"
                    );
                    let n = effect.destroyed_count();
                    if !effect.destroyed.is_empty() {
                        self.events.push(EngineEvent::TilesDestroyed {
                            tiles: effect.destroyed,
                        });
                    }
                    if !effect.converted.is_empty() {
                        self.events.push(EngineEvent::TilesConverted {
                            tiles: effect.converted,
                        });
                    }
                    report.destroyed += n;
                    self.record_destroyed(n);
                }
                MatchSet::default()
            }
        };

        self.cascade(matches, &mut report)?;
        self.finish_action();
        if !self.game_state().is_terminal() {
            self.ensure_playable();
        }
        Ok(MoveOutcome::Resolved(report))
    }

    /// Run destroy/spawn/collapse/refill passes until nothing matches
    fn cascade(&mut self, mut matches: MatchSet, report: &mut MoveReport) -> Result<(), BoardError> {
        let mut passes = 0;
        loop {
            passes += 1;

            if !matches.is_empty() {
                self.pending_spawns.extend(matches.spawn_requests());
                let mut destroyed = Vec::with_capacity(matches.len());
                for pos in matches.cells() {
                    if let Some(t) = self.board.take(pos)? {
                        destroyed.push(t.info());
                    }
                }
                let n = destroyed.len() as u32;
                debug!(pass = passes, destroyed = n, groups = matches.groups().len(), "cascade pass");
                self.events.push(EngineEvent::TilesDestroyed { tiles: destroyed });
                report.destroyed += n;
                self.record_destroyed(n);
            }

            let mut spawned = Vec::new();
            while let Some(request) = self.pending_spawns.pop_front() {
                if let Some(info) = place_spawn(&mut self.board, &request, &mut self.ids)? {
                    spawned.push(info);
                }
            }
            if !spawned.is_empty() {
                report.specials_spawned += spawned.len() as u32;
                self.events.push(EngineEvent::TilesSpawned { tiles: spawned });
            }

            let moves = self.board.collapse();
            if !moves.is_empty() {
                self.events.push(EngineEvent::TilesMoved { moves });
            }

            let refilled = self.fill.fill_empty(&mut self.board, &mut self.rng, &mut self.ids);
            if !refilled.is_empty() {
                self.events.push(EngineEvent::TilesSpawned { tiles: refilled });
            }

            matches = find_matches(&self.board);
            if matches.is_empty() {
                break;
            }
            if passes >= MAX_CASCADE_PASSES {
                warn!(passes, remaining = matches.len(), "cascade pass limit reached");
                break;
            }
        }
        report.cascade_passes = passes;
        Ok(())
    }

    fn record_destroyed(&mut self, n: u32) {
        self.resources.record_destroyed(n);
        self.evaluate();
    }

    fn finish_action(&mut self) {
        self.resources.consume_move();
        self.evaluate();
    }

    fn evaluate(&mut self) {
        let Some(state) = self.resources.evaluate() else {
            return;
        };
        info!(
            episode_id = self.episode_id,
            state = ?state,
            moves = self.moves_remaining(),
            target = self.target_remaining(),
            blood = self.blood_level(),
            "game over"
        );
        match state {
            GameState::Won => self.events.push(EngineEvent::GameWon),
            GameState::Lost => self.events.push(EngineEvent::GameLost),
            GameState::Playing => {}
        }
    }

    /// Shuffle a board with no possible move, or regenerate it if shuffling
    /// keeps failing
    fn ensure_playable(&mut self) {
        if has_possible_move(&self.board) {
            return;
        }
        for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
            let mut candidate = self.board.clone();
            let moves = shuffle_tiles(&mut candidate, &mut self.rng);
            if find_matches(&candidate).is_empty() && has_possible_move(&candidate) {
                debug!(attempt, "dead board shuffled");
                self.board = candidate;
                self.events.push(EngineEvent::BoardShuffled { moves });
                return;
            }
        }

        warn!(
            attempts = MAX_SHUFFLE_ATTEMPTS,
            "no playable shuffle found, regenerating board"
        );
        let removed = self.board.clear();
        self.events.push(EngineEvent::TilesDestroyed { tiles: removed });
        self.generate_board();
        let spawned = self.board.tiles().map(Tile::info).collect();
        self.events.push(EngineEvent::TilesSpawned { tiles: spawned });
    }

    /// Fill an empty board with a stable layout that has at least one move
    fn generate_board(&mut self) {
        for _ in 0..MAX_SHUFFLE_ATTEMPTS {
            self.board.clear();
            self.fill.fill_empty(&mut self.board, &mut self.rng, &mut self.ids);
            if find_matches(&self.board).is_empty() && has_possible_move(&self.board) {
                return;
            }
        }
        self.settle();
    }

    /// Clear matches without scoring until the board is stable
    fn settle(&mut self) {
        for _ in 0..MAX_CASCADE_PASSES {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                return;
            }
            for pos in matches.cells() {
                if self.board.take(pos).is_err() {
                    warn!(%pos, "matched cell outside the board");
                }
            }
            self.board.collapse();
            self.fill.fill_empty(&mut self.board, &mut self.rng, &mut self.ids);
        }
        warn!("board did not settle");
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

fn draw_resources<R: RandomSource>(config: &EngineConfig, rng: &mut R) -> Resources {
    let span = config.target_max.saturating_sub(config.target_min).saturating_add(1);
    let target = config.target_min + rng.next_range(span);
    Resources::new(
        config.total_moves,
        target,
        config.initial_blood,
        config.blood_increase_per_second,
        config.blood_decrease_per_match,
    )
}
