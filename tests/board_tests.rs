//! Board model tests through the public API

use vampire_match::core::{Board, BoardError, Tile, TileId};
use vampire_match::types::{Color, Pos, TileKind, TileMove};

fn p(x: i8, y: i8) -> Pos {
    Pos::new(x, y)
}

#[test]
fn test_out_of_bounds_access_is_an_error() {
    let mut board = Board::new(4, 3);
    for pos in [p(-1, 0), p(0, -1), p(4, 0), p(0, 3)] {
        assert_eq!(
            board.get(pos).unwrap_err(),
            BoardError::OutOfBounds { x: pos.x, y: pos.y }
        );
        assert!(board.set(pos, Some(Tile::normal(TileId(1), Color::Red))).is_err());
        assert!(board.neighbors4(pos).is_err());
        assert!(board.tile(pos).is_none());
    }
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_swap_checks_both_cells_first() {
    let mut board = Board::from_layout(&["RY", "GB"]).unwrap();
    let before = board.clone();
    assert!(board.swap(p(0, 0), p(2, 0)).is_err());
    assert_eq!(board, before);
}

#[test]
fn test_swap_keeps_positions_consistent() {
    let mut board = Board::from_layout(&["RY", "GB"]).unwrap();
    let red = board.tile(p(0, 1)).unwrap().id();

    board.swap(p(0, 1), p(1, 1)).unwrap();
    let moved = board.tile(p(1, 1)).unwrap();
    assert_eq!(moved.id(), red);
    assert_eq!(moved.pos(), p(1, 1));
    assert!(board.positions_consistent());

    board.swap(p(0, 1), p(1, 1)).unwrap();
    assert_eq!(board.to_layout(), vec!["RY", "GB"]);
}

#[test]
fn test_swap_with_empty_cell_moves_tile() {
    let mut board = Board::from_layout(&["R.", "GB"]).unwrap();
    board.swap(p(0, 1), p(1, 1)).unwrap();
    assert_eq!(board.to_layout(), vec![".R", "GB"]);
    assert!(board.positions_consistent());
}

#[test]
fn test_neighbors_at_corner_and_center() {
    let board = Board::new(3, 3);
    let corner = board.neighbors4(p(0, 0)).unwrap();
    assert_eq!(corner.as_slice(), &[p(1, 0), p(0, 1)]);

    let center = board.neighbors4(p(1, 1)).unwrap();
    assert_eq!(center.len(), 4);
}

#[test]
fn test_collapse_reports_every_fall() {
    let mut board = Board::from_layout(&[
        "RY", //
        "..", //
        "G.", //
        ".B",
    ])
    .unwrap();
    let moves = board.collapse();
    assert_eq!(board.to_layout(), vec!["..", "..", "RY", "GB"]);
    assert_eq!(
        moves,
        vec![
            TileMove { from: p(0, 1), to: p(0, 0) },
            TileMove { from: p(0, 3), to: p(0, 1) },
            TileMove { from: p(1, 3), to: p(1, 1) },
        ]
    );
    assert!(board.positions_consistent());
}

#[test]
fn test_convert_changes_kind_in_place() {
    let mut board = Board::from_layout(&["RG"]).unwrap();
    let id = board.tile(p(1, 0)).unwrap().id();
    let converted = board.convert(p(1, 0), TileKind::Bat).unwrap().unwrap();
    assert_eq!(converted.id(), id);
    assert_eq!(converted.color(), Color::Green);
    assert!(board.tile(p(1, 0)).unwrap().is_special());
    assert_eq!(board.match_color(p(1, 0)), None);
}

#[test]
fn test_layout_parsing() {
    let board = Board::from_layout(&["ry", "VA"]).unwrap();
    assert_eq!(
        board.tile(p(0, 1)).unwrap().kind(),
        TileKind::BloodDrop { target: Color::Red }
    );
    assert_eq!(board.tile(p(0, 0)).unwrap().kind(), TileKind::Vampire);
    assert_eq!(board.tile(p(1, 0)).unwrap().kind(), TileKind::Bat);
    assert!(Board::from_layout(&[]).is_err());
}
