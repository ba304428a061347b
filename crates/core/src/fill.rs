//! Fill generator - picks colors for new tiles without creating matches
//!
//! A color is rejected for a cell when placing it would complete a run of
//! three through neighbours already on the board, or close a 2x2 square with
//! them. If that leaves nothing, the square constraint is dropped; if that
//! still leaves nothing, any palette color is accepted. The search is a single
//! filter over at most four colors, so the cost per cell is constant.

use crate::board::Board;
use crate::rng::RandomSource;
use crate::tile::{Tile, TileIds};
use crate::types::{Color, Pos, TileInfo, COLOR_COUNT, MIN_RUN};

/// Square offsets: for each 2x2 block containing the cell, the other three cells
const SQUARE_BLOCKS: [[(i8, i8); 3]; 4] = [
    [(-1, 0), (0, -1), (-1, -1)],
    [(1, 0), (0, -1), (1, -1)],
    [(-1, 0), (0, 1), (-1, 1)],
    [(1, 0), (0, 1), (1, 1)],
];

#[derive(Debug, Clone)]
pub struct FillGenerator {
    palette: Vec<Color>,
}

impl FillGenerator {
    /// Use the first `color_count` palette colors (clamped to 1..=4)
    pub fn new(color_count: u8) -> Self {
        let n = (color_count as usize).clamp(1, COLOR_COUNT);
        Self {
            palette: Color::ALL[..n].to_vec(),
        }
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Choose a color for `pos` given the tiles already on the board
    pub fn pick_color<R: RandomSource>(&self, board: &Board, pos: Pos, rng: &mut R) -> Color {
        let strict: Vec<Color> = self
            .palette
            .iter()
            .copied()
            .filter(|&c| !completes_run(board, pos, c) && !completes_square(board, pos, c))
            .collect();
        if let Some(&c) = rng.choose(&strict) {
            return c;
        }

        let relaxed: Vec<Color> = self
            .palette
            .iter()
            .copied()
            .filter(|&c| !completes_run(board, pos, c))
            .collect();
        if let Some(&c) = rng.choose(&relaxed) {
            return c;
        }

        rng.choose(&self.palette).copied().unwrap_or(Color::Red)
    }

    /// Fill every empty cell with a new normal tile, bottom row first, left to
    /// right. Returns the spawned tiles in fill order.
    pub fn fill_empty<R: RandomSource>(
        &self,
        board: &mut Board,
        rng: &mut R,
        ids: &mut TileIds,
    ) -> Vec<TileInfo> {
        let empty = board.empty_positions();
        let mut spawned = Vec::with_capacity(empty.len());
        for pos in empty {
            let color = self.pick_color(board, pos, rng);
            let tile = Tile::normal(ids.next(), color);
            if board.set(pos, Some(tile)).is_ok() {
                if let Some(t) = board.tile(pos) {
                    spawned.push(t.info());
                }
            }
        }
        spawned
    }
}

/// Length of the same-colored normal run leaving `pos` in direction (dx, dy),
/// not counting `pos` itself
fn run_from(board: &Board, pos: Pos, color: Color, dx: i8, dy: i8) -> usize {
    let mut len = 0;
    let mut p = pos.offset(dx, dy);
    while board.match_color(p) == Some(color) {
        len += 1;
        p = p.offset(dx, dy);
    }
    len
}

/// Would `color` at `pos` complete a horizontal or vertical run of three?
pub fn completes_run(board: &Board, pos: Pos, color: Color) -> bool {
    let horizontal = 1 + run_from(board, pos, color, -1, 0) + run_from(board, pos, color, 1, 0);
    let vertical = 1 + run_from(board, pos, color, 0, -1) + run_from(board, pos, color, 0, 1);
    horizontal >= MIN_RUN || vertical >= MIN_RUN
}

/// Would `color` at `pos` close a 2x2 square of normal tiles?
pub fn completes_square(board: &Board, pos: Pos, color: Color) -> bool {
    SQUARE_BLOCKS.iter().any(|block| {
        block
            .iter()
            .all(|&(dx, dy)| board.match_color(pos.offset(dx, dy)) == Some(color))
    })
}
