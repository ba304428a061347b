//! Engine integration tests: move flow, combos, meters and lifecycle

use vampire_match::core::{find_matches, Board, Engine, EngineConfig};
use vampire_match::types::{
    ComboKind, EngineEvent, GameState, MoveError, MoveOutcome, Pos, SpecialKind, TileKind,
};

fn p(x: i8, y: i8) -> Pos {
    Pos::new(x, y)
}

fn engine(rows: &[&str], config: EngineConfig) -> Engine {
    Engine::from_board(config, Board::from_layout(rows).unwrap()).unwrap()
}

/// Swapping (2,2) and (2,3) completes a red run of four on row 2. Nothing
/// else on the board matches before or after, and the refill cannot match.
const RUN_OF_FOUR: [&str; 5] = [
    "RBGRG", //
    "BGRBY", //
    "RRYRB", //
    "YBGYG", //
    "GYBGR",
];

/// No swap on this board creates a match
const DEAD_3X3: [&str; 3] = [
    "RYG", //
    "GRY", //
    "YGR",
];

fn first_destroyed(events: &[EngineEvent]) -> Vec<Pos> {
    events
        .iter()
        .find_map(|e| match e {
            EngineEvent::TilesDestroyed { tiles } => Some(tiles.iter().map(|t| t.pos).collect()),
            _ => None,
        })
        .unwrap_or_default()
}

fn assert_stable(engine: &Engine) {
    let board = engine.board();
    assert!(board.is_full());
    assert!(board.positions_consistent());
    assert!(find_matches(board).is_empty());
}

#[test]
fn test_scenario_a_run_of_four_spawns_blood_drop() {
    let mut engine = engine(&RUN_OF_FOUR, EngineConfig::default());
    assert!(find_matches(engine.board()).is_empty());
    let target = engine.target_remaining();

    let outcome = engine.request_move(p(2, 2), p(2, 3));
    let report = *outcome.report().unwrap();
    assert_eq!(report.combo, None);
    assert_eq!(report.destroyed, 4);
    assert_eq!(report.specials_spawned, 1);
    assert_eq!(report.cascade_passes, 1);

    let events = engine.drain_events();
    assert_eq!(events[0], EngineEvent::TilesSwapped { a: p(2, 2), b: p(2, 3) });
    let mut destroyed = first_destroyed(&events);
    destroyed.sort();
    assert_eq!(destroyed, vec![p(0, 2), p(1, 2), p(2, 2), p(3, 2)]);

    let spawned_special = events.iter().find_map(|e| match e {
        EngineEvent::TilesSpawned { tiles } => tiles.iter().find(|t| t.kind.is_special()).copied(),
        _ => None,
    });
    let special = spawned_special.unwrap();
    assert_eq!(special.pos, p(2, 2));
    assert_eq!(special.kind.special(), Some(SpecialKind::BloodDrop));

    assert!(matches!(
        engine.tile(p(2, 2)).unwrap().kind(),
        TileKind::BloodDrop { .. }
    ));
    assert_eq!(engine.target_remaining(), target - 4);
    assert_eq!(engine.moves_remaining(), 19);
    assert_stable(&engine);
}

#[test]
fn test_scenario_b_bat_pair_on_small_board() {
    let mut engine = engine(
        &[
            "RYGB", //
            "GBRY", //
            "AAYG",
        ],
        EngineConfig::default(),
    );

    let outcome = engine.request_move(p(0, 0), p(1, 0));
    let report = *outcome.report().unwrap();
    assert_eq!(report.combo, Some(ComboKind::BatPair));

    let events = engine.drain_events();
    assert_eq!(
        events[0],
        EngineEvent::ComboActivated { combo: ComboKind::BatPair, a: p(0, 0), b: p(1, 0) }
    );
    // both bats plus min(10, normals) = all ten normals
    assert_eq!(first_destroyed(&events).len(), 12);
    assert!(report.destroyed >= 12);
    assert_eq!(engine.moves_remaining(), 19);
    assert_stable(&engine);
}

#[test]
fn test_scenario_c_single_destroy_lowers_blood() {
    let config = EngineConfig {
        initial_blood: 0.99,
        blood_decrease_per_match: 0.03,
        ..EngineConfig::default()
    };
    let mut engine = engine(
        &[
            "AGB", //
            "YRG", //
            "BGR",
        ],
        config,
    );

    let outcome = engine.request_move(p(0, 2), p(1, 2));
    let report = *outcome.report().unwrap();
    assert_eq!(report.combo, Some(ComboKind::BatNormal));
    assert_eq!(report.destroyed, 1);
    assert!((engine.blood_level() - 0.96).abs() < 1e-5);
    assert_eq!(engine.game_state(), GameState::Playing);
    assert_eq!(
        engine.tile(p(1, 2)).unwrap().kind(),
        TileKind::BloodDrop { target: vampire_match::types::Color::Green }
    );
}

#[test]
fn test_scenario_d_failed_swap_on_last_move_loses() {
    let config = EngineConfig {
        total_moves: 1,
        ..EngineConfig::default()
    };
    let mut engine = engine(&DEAD_3X3, config);
    let before = engine.board().clone();

    let outcome = engine.request_move(p(0, 0), p(1, 0));
    assert_eq!(outcome, MoveOutcome::Reverted);
    assert_eq!(engine.moves_remaining(), 0);
    assert_eq!(engine.game_state(), GameState::Lost);
    assert_eq!(engine.board(), &before);

    let events = engine.drain_events();
    assert_eq!(
        events,
        vec![
            EngineEvent::TilesSwapped { a: p(0, 0), b: p(1, 0) },
            EngineEvent::SwapReverted { a: p(0, 0), b: p(1, 0) },
            EngineEvent::GameLost,
        ]
    );

    let again = engine.request_move(p(0, 0), p(1, 0));
    assert_eq!(again, MoveOutcome::Rejected(MoveError::InvalidState(GameState::Lost)));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_scenario_e_vampire_pair_clears_and_refills() {
    let mut engine = engine(
        &[
            "RYGB", //
            "GBRY", //
            "YRBG", //
            "VVYR",
        ],
        EngineConfig::default(),
    );
    let occupied = engine.board().occupied_count();

    let outcome = engine.request_move(p(1, 0), p(0, 0));
    assert_eq!(outcome.report().unwrap().combo, Some(ComboKind::VampirePair));

    let events = engine.drain_events();
    assert_eq!(first_destroyed(&events).len(), occupied);
    assert_stable(&engine);
    assert!(engine.board().tiles().all(|t| t.is_normal()));
}

#[test]
fn test_falling_tiles_start_second_pass() {
    // The red run on row 1 clears, the blue at (2,2) falls next to the two
    // blues on row 1 and completes a second run.
    let mut engine = engine(
        &[
            "BGYBG", //
            "YBRGR", //
            "GYBRY", //
            "RRGBB", //
            "YGRYG",
        ],
        EngineConfig::default(),
    );
    assert!(find_matches(engine.board()).is_empty());
    let target = engine.target_remaining();

    let report = *engine.request_move(p(2, 1), p(2, 0)).report().unwrap();
    assert_eq!(report.cascade_passes, 2);
    assert_eq!(report.specials_spawned, 0);

    let events = engine.drain_events();
    let passes: Vec<Vec<Pos>> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::TilesDestroyed { tiles } => {
                let mut cells: Vec<Pos> = tiles.iter().map(|t| t.pos).collect();
                cells.sort();
                Some(cells)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        passes,
        vec![
            vec![p(0, 1), p(1, 1), p(2, 1)],
            vec![p(2, 1), p(3, 1), p(4, 1)],
        ]
    );

    let total: u32 = passes.iter().map(|cells| cells.len() as u32).sum();
    assert_eq!(report.destroyed, total);
    assert_eq!(engine.target_remaining(), target - total);
    assert_eq!(engine.moves_remaining(), 19);
    assert_stable(&engine);
}

#[test]
fn test_reaching_target_wins() {
    let config = EngineConfig {
        target_min: 4,
        target_max: 4,
        ..EngineConfig::default()
    };
    let mut engine = engine(&RUN_OF_FOUR, config);
    assert_eq!(engine.target_remaining(), 4);

    assert!(engine.request_move(p(2, 2), p(2, 3)).is_accepted());
    assert_eq!(engine.game_state(), GameState::Won);
    assert_eq!(engine.target_remaining(), 0);
    assert_eq!(engine.moves_remaining(), 19);

    let events = engine.drain_events();
    assert_eq!(events.iter().filter(|e| **e == EngineEvent::GameWon).count(), 1);
    assert!(!events.contains(&EngineEvent::GameLost));

    assert_eq!(
        engine.request_move(p(0, 0), p(1, 0)),
        MoveOutcome::Rejected(MoveError::InvalidState(GameState::Won))
    );
}

#[test]
fn test_win_on_last_move_beats_running_out() {
    let config = EngineConfig {
        total_moves: 1,
        target_min: 4,
        target_max: 4,
        ..EngineConfig::default()
    };
    let mut engine = engine(&RUN_OF_FOUR, config);
    engine.request_move(p(2, 2), p(2, 3));
    assert_eq!(engine.moves_remaining(), 0);
    assert_eq!(engine.game_state(), GameState::Won);
}

#[test]
fn test_rejections_do_not_mutate() {
    let mut engine = engine(&RUN_OF_FOUR, EngineConfig::default());
    let before = engine.board().clone();

    let cases = [
        ((p(0, 0), p(-1, 0)), MoveError::OutOfBounds(p(-1, 0))),
        ((p(4, 4), p(5, 4)), MoveError::OutOfBounds(p(5, 4))),
        ((p(0, 0), p(1, 1)), MoveError::NotAdjacent(p(0, 0), p(1, 1))),
        ((p(2, 2), p(2, 2)), MoveError::NotAdjacent(p(2, 2), p(2, 2))),
    ];
    for ((a, b), expected) in cases {
        assert_eq!(engine.request_move(a, b), MoveOutcome::Rejected(expected));
    }

    assert_eq!(engine.board(), &before);
    assert_eq!(engine.moves_remaining(), 20);
    assert!(engine.events().is_empty());
}

#[test]
fn test_empty_cell_is_rejected() {
    let mut engine = engine(
        &[
            "RYG", //
            "G.Y", //
            "YGR",
        ],
        EngineConfig::default(),
    );
    assert_eq!(
        engine.request_move(p(0, 1), p(1, 1)),
        MoveOutcome::Rejected(MoveError::EmptyCell(p(1, 1)))
    );
    assert_eq!(engine.moves_remaining(), 20);
}

#[test]
fn test_pause_blocks_moves_and_time() {
    let mut engine = engine(&RUN_OF_FOUR, EngineConfig::default());
    engine.pause();
    assert!(engine.is_paused());

    assert_eq!(engine.request_move(p(2, 2), p(2, 3)), MoveOutcome::Rejected(MoveError::Paused));
    engine.tick(10.0);
    assert_eq!(engine.blood_level(), 0.0);
    assert!(!engine.snapshot().playable());

    engine.resume();
    assert!(engine.request_move(p(2, 2), p(2, 3)).is_accepted());
}

#[test]
fn test_tick_zero_is_idempotent() {
    let config = EngineConfig {
        initial_blood: 0.5,
        ..EngineConfig::default()
    };
    let mut engine = engine(&RUN_OF_FOUR, config);
    for _ in 0..10 {
        engine.tick(0.0);
    }
    assert_eq!(engine.blood_level(), 0.5);
    assert_eq!(engine.game_state(), GameState::Playing);

    engine.tick(-3.0);
    engine.tick(f32::NAN);
    assert_eq!(engine.blood_level(), 0.5);
}

#[test]
fn test_blood_fills_over_time_and_loses() {
    let config = EngineConfig {
        blood_increase_per_second: 0.25,
        ..EngineConfig::default()
    };
    let mut engine = engine(&RUN_OF_FOUR, config);
    engine.tick(2.0);
    assert!((engine.blood_level() - 0.5).abs() < 1e-6);
    assert_eq!(engine.game_state(), GameState::Playing);

    engine.tick(2.0);
    assert_eq!(engine.blood_level(), 1.0);
    assert_eq!(engine.game_state(), GameState::Lost);
    assert_eq!(engine.drain_events(), vec![EngineEvent::GameLost]);

    // terminal: nothing changes and nothing is emitted again
    engine.tick(2.0);
    assert!(engine.events().is_empty());
}

#[test]
fn test_failed_swap_round_trips_board() {
    let mut engine = engine(&DEAD_3X3, EngineConfig::default());
    let before = engine.board().clone();
    for (a, b) in [(p(0, 0), p(0, 1)), (p(1, 1), p(2, 1)), (p(2, 2), p(1, 2))] {
        assert_eq!(engine.request_move(a, b), MoveOutcome::Reverted);
        assert_eq!(engine.board(), &before);
    }
    assert_eq!(engine.moves_remaining(), 17);
}

#[test]
fn test_same_seed_same_session() {
    let config = EngineConfig::default().with_seed(2024);
    let mut a = Engine::new(config.clone()).unwrap();
    let mut b = Engine::new(config).unwrap();
    assert_eq!(a.board(), b.board());

    for _ in 0..5 {
        let Some((x, y)) = a.find_hint() else { break };
        assert_eq!(a.request_move(x, y), b.request_move(x, y));
        assert_eq!(a.drain_events(), b.drain_events());
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_snapshot_matches_engine() {
    let engine = engine(&RUN_OF_FOUR, EngineConfig::default().with_seed(5));
    let snap = engine.snapshot();
    assert_eq!((snap.width, snap.height), (5, 5));
    assert_eq!(snap.cells.len(), 25);
    assert_eq!(snap.seed, 5);
    assert_eq!(snap.moves_remaining, engine.moves_remaining());
    let cell = snap.cell(0, 2).unwrap();
    assert_eq!(cell.color, vampire_match::types::Color::Red);
    assert_eq!(cell.id, engine.tile(p(0, 2)).unwrap().id().0);
    assert!(snap.cell(5, 0).is_none());
    assert!(snap.playable());

    let json = serde_json::to_string(&snap).unwrap();
    let back: vampire_match::core::EngineSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn test_invalid_config_is_refused() {
    let config = EngineConfig {
        color_count: 2,
        ..EngineConfig::default()
    };
    assert!(Engine::new(config).is_err());

    let tiny = Board::from_layout(&["RG", "GR"]).unwrap();
    assert!(Engine::from_board(EngineConfig::default(), tiny).is_err());
}
