//! Move search and dead-board shuffle

use crate::board::Board;
use crate::matcher::matches_at;
use crate::rng::RandomSource;
use crate::types::{Pos, TileMove};

/// Find a move that does something: any pair involving a special, else a
/// normal swap that creates a match. Scans bottom row first, left to right.
pub fn find_hint(board: &Board) -> Option<(Pos, Pos)> {
    for pos in board.positions() {
        if !board.tile(pos).is_some_and(|t| t.is_special()) {
            continue;
        }
        let neighbors = board.neighbors4(pos).ok()?;
        if let Some(&n) = neighbors.iter().find(|&&n| board.tile(n).is_some()) {
            return Some((pos, n));
        }
    }

    let mut scratch = board.clone();
    for a in board.positions() {
        let Some(ca) = board.match_color(a) else {
            continue;
        };
        for b in [a.offset(1, 0), a.offset(0, 1)] {
            let Some(cb) = board.match_color(b) else {
                continue;
            };
            if ca == cb {
                continue;
            }
            if scratch.swap(a, b).is_err() {
                continue;
            }
            let hit = matches_at(&scratch, a) || matches_at(&scratch, b);
            // Swap back; the first swap already proved both cells in bounds.
            scratch.swap(a, b).ok()?;
            if hit {
                return Some((a, b));
            }
        }
    }
    None
}

pub fn has_possible_move(board: &Board) -> bool {
    find_hint(board).is_some()
}

/// Randomly permute every tile on the board
pub fn shuffle_tiles<R: RandomSource>(board: &mut Board, rng: &mut R) -> Vec<TileMove> {
    let mut targets: Vec<Pos> = board.tiles().map(|t| t.pos()).collect();
    rng.shuffle(&mut targets);
    board.permute(&targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::rng::SimpleRng;

    #[test]
    fn test_finds_swap_that_matches() {
        let board = Board::from_layout(&[
            "GYB", //
            "RBY", //
            "YRR",
        ])
        .unwrap();
        let (a, b) = find_hint(&board).unwrap();
        let mut after = board.clone();
        after.swap(a, b).unwrap();
        assert!(!find_matches(&after).is_empty());
    }

    #[test]
    fn test_special_always_has_a_move() {
        let board = Board::from_layout(&["RY", "GA"]).unwrap();
        assert_eq!(find_hint(&board), Some((Pos::new(1, 0), Pos::new(0, 0))));
    }

    #[test]
    fn test_dead_board_has_no_hint() {
        let board = Board::from_layout(&[
            "RYG", //
            "GRY", //
            "YGR",
        ])
        .unwrap();
        assert!(!has_possible_move(&board));
    }

    #[test]
    fn test_shuffle_keeps_tiles() {
        let mut board = Board::from_layout(&["RYG", "GRY", "YGB"]).unwrap();
        let before: Vec<_> = board.tiles().map(|t| t.id()).collect();
        shuffle_tiles(&mut board, &mut SimpleRng::new(4));
        let mut after: Vec<_> = board.tiles().map(|t| t.id()).collect();
        after.sort();
        let mut sorted = before.clone();
        sorted.sort();
        assert_eq!(after, sorted);
        assert!(board.positions_consistent());
    }
}
