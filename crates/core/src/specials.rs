//! Special tile spawning
//!
//! Spawn requests are produced by the match detector and placed by the engine
//! after the matched tiles are gone, before gravity runs.

use crate::board::{Board, BoardError};
use crate::matcher::SpawnRequest;
use crate::tile::{Tile, TileIds};
use crate::types::{Color, Pos, SpecialKind, TileInfo, TileKind, COLOR_COUNT};

/// Place one pending special.
///
/// Goes to the anchor if that cell is free, otherwise to the nearest free cell
/// of the originating group. Returns `None` when every cell is occupied.
pub fn place_spawn(
    board: &mut Board,
    request: &SpawnRequest,
    ids: &mut TileIds,
) -> Result<Option<TileInfo>, BoardError> {
    let Some(pos) = std::iter::once(request.anchor)
        .chain(request.cells.iter().copied())
        .find(|&p| board.in_bounds(p) && board.tile(p).is_none())
    else {
        return Ok(None);
    };

    let kind = match request.kind {
        SpecialKind::BloodDrop => TileKind::BloodDrop {
            target: blood_drop_target(board, pos),
        },
        SpecialKind::Bat => TileKind::Bat,
        SpecialKind::Vampire => TileKind::Vampire,
    };
    board.set(pos, Some(Tile::new(ids.next(), request.color, kind)))?;
    Ok(board.tile(pos).map(Tile::info))
}

/// Target color for a blood drop spawned at `pos`.
///
/// Majority color among the normal edge neighbours, then the majority normal
/// color on the whole board, then the first palette color. Ties go to the
/// lower color index.
pub fn blood_drop_target(board: &Board, pos: Pos) -> Color {
    let mut counts = [0usize; COLOR_COUNT];
    if let Ok(neighbors) = board.neighbors4(pos) {
        for n in neighbors {
            if let Some(c) = board.match_color(n) {
                counts[c.index()] += 1;
            }
        }
    }
    if let Some(c) = majority(&counts) {
        return c;
    }

    let mut counts = [0usize; COLOR_COUNT];
    for t in board.tiles().filter(|t| t.is_normal()) {
        counts[t.color().index()] += 1;
    }
    majority(&counts).unwrap_or(Color::Red)
}

fn majority(counts: &[usize; COLOR_COUNT]) -> Option<Color> {
    let mut best: Option<(usize, usize)> = None;
    for (i, &n) in counts.iter().enumerate() {
        if n > 0 && best.map_or(true, |(_, b)| n > b) {
            best = Some((i, n));
        }
    }
    best.and_then(|(i, _)| Color::from_index(i))
}
