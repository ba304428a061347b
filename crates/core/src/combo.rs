//! Combo resolver - pairwise activation of specials
//!
//! A move involving at least one special never swaps. The pair is classified
//! with [`ComboKind::classify`] and its effect is applied directly:
//!
//! | Pair | Effect |
//! |------|--------|
//! | BloodDrop + BloodDrop | both removed, every normal of 2 random palette colors destroyed |
//! | Bat + Bat | both removed, up to 10 random normals destroyed |
//! | Bat + BloodDrop | both removed, up to 3 random normals become blood drops of their color |
//! | Bat + Normal | bat removed, the normal becomes a blood drop of its color |
//! | BloodDrop + Normal | blood drop removed, every normal of the normal's color destroyed |
//! | Vampire + Vampire | every occupied cell destroyed |
//! | Vampire + Bat | both removed, up to 20 random normals destroyed |
//! | Vampire + BloodDrop | both removed, the 3x3 block around the blood drop destroyed |
//! | Vampire + Normal | vampire removed, up to 3 random normals become bats |
//!
//! Random picks shuffle the candidate positions with the engine RNG and take
//! from the front, so a seed fixes the outcome.

use crate::board::{Board, BoardError};
use crate::rng::RandomSource;
use crate::types::{
    Color, ComboKind, Pos, SpecialKind, TileInfo, TileKind, BAT_BLOOD_DROP_CONVERSIONS,
    BAT_PAIR_DESTROY, BLOOD_DROP_PAIR_COLORS, VAMPIRE_BAT_DESTROY, VAMPIRE_NORMAL_CONVERSIONS,
};

/// What a combo did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboEffect {
    pub kind: ComboKind,
    /// Tiles removed, the activated specials included
    pub destroyed: Vec<TileInfo>,
    /// Tiles that changed kind in place, with their new kind
    pub converted: Vec<TileInfo>,
}

impl ComboEffect {
    /// Count reported to the resource meters. Never zero for an activated combo.
    pub fn destroyed_count(&self) -> u32 {
        (self.destroyed.len() as u32).max(1)
    }
}

/// Apply the combo formed by the tiles at `a` and `b`.
///
/// Returns `Ok(None)` when either cell is empty or both tiles are normal.
pub fn resolve_combo<R: RandomSource>(
    board: &mut Board,
    a: Pos,
    b: Pos,
    palette: &[Color],
    rng: &mut R,
) -> Result<Option<ComboEffect>, BoardError> {
    let (Some(ta), Some(tb)) = (board.get(a)?.copied(), board.get(b)?.copied()) else {
        return Ok(None);
    };
    let Some(kind) = ComboKind::classify(ta.kind(), tb.kind()) else {
        return Ok(None);
    };

    // Orient the pair so `first` holds the higher-ranked special.
    let rank = |k: TileKind| match k.special() {
        Some(SpecialKind::Vampire) => 3,
        Some(SpecialKind::Bat) => 2,
        Some(SpecialKind::BloodDrop) => 1,
        None => 0,
    };
    let (first, second) = if rank(ta.kind()) >= rank(tb.kind()) {
        (a, b)
    } else {
        (b, a)
    };

    let mut effect = ComboEffect {
        kind,
        destroyed: Vec::new(),
        converted: Vec::new(),
    };

    match kind {
        ComboKind::BloodDropPair => {
            destroy(board, first, &mut effect.destroyed)?;
            destroy(board, second, &mut effect.destroyed)?;
            let mut colors = palette.to_vec();
            rng.shuffle(&mut colors);
            colors.truncate(BLOOD_DROP_PAIR_COLORS);
            destroy_colors(board, &colors, &mut effect.destroyed)?;
        }
        ComboKind::BatPair => {
            destroy(board, first, &mut effect.destroyed)?;
            destroy(board, second, &mut effect.destroyed)?;
            for pos in random_normals(board, BAT_PAIR_DESTROY, rng) {
                destroy(board, pos, &mut effect.destroyed)?;
            }
        }
        ComboKind::BatBloodDrop => {
            destroy(board, first, &mut effect.destroyed)?;
            destroy(board, second, &mut effect.destroyed)?;
            for pos in random_normals(board, BAT_BLOOD_DROP_CONVERSIONS, rng) {
                convert_to_blood_drop(board, pos, &mut effect.converted)?;
            }
        }
        ComboKind::BatNormal => {
            destroy(board, first, &mut effect.destroyed)?;
            convert_to_blood_drop(board, second, &mut effect.converted)?;
        }
        ComboKind::BloodDropNormal => {
            destroy(board, first, &mut effect.destroyed)?;
            let color = color_at(board, second);
            destroy_colors(board, &[color], &mut effect.destroyed)?;
        }
        ComboKind::VampirePair => {
            for pos in board.positions().collect::<Vec<_>>() {
                destroy(board, pos, &mut effect.destroyed)?;
            }
        }
        ComboKind::VampireBat => {
            destroy(board, first, &mut effect.destroyed)?;
            destroy(board, second, &mut effect.destroyed)?;
            for pos in random_normals(board, VAMPIRE_BAT_DESTROY, rng) {
                destroy(board, pos, &mut effect.destroyed)?;
            }
        }
        ComboKind::VampireBloodDrop => {
            destroy(board, first, &mut effect.destroyed)?;
            let center = second;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let pos = center.offset(dx, dy);
                    if board.in_bounds(pos) {
                        destroy(board, pos, &mut effect.destroyed)?;
                    }
                }
            }
        }
        ComboKind::VampireNormal => {
            destroy(board, first, &mut effect.destroyed)?;
            for pos in random_normals(board, VAMPIRE_NORMAL_CONVERSIONS, rng) {
                if let Some(t) = board.convert(pos, TileKind::Bat)? {
                    effect.converted.push(t.info());
                }
            }
        }
    }

    Ok(Some(effect))
}

fn color_at(board: &Board, pos: Pos) -> Color {
    board.tile(pos).map(|t| t.color()).unwrap_or(Color::Red)
}

fn destroy(board: &mut Board, pos: Pos, out: &mut Vec<TileInfo>) -> Result<(), BoardError> {
    if let Some(t) = board.take(pos)? {
        out.push(t.info());
    }
    Ok(())
}

fn destroy_colors(
    board: &mut Board,
    colors: &[Color],
    out: &mut Vec<TileInfo>,
) -> Result<(), BoardError> {
    let targets: Vec<Pos> = board
        .normal_positions()
        .into_iter()
        .filter(|&p| board.match_color(p).is_some_and(|c| colors.contains(&c)))
        .collect();
    for pos in targets {
        destroy(board, pos, out)?;
    }
    Ok(())
}

fn convert_to_blood_drop(
    board: &mut Board,
    pos: Pos,
    out: &mut Vec<TileInfo>,
) -> Result<(), BoardError> {
    let Some(color) = board.match_color(pos) else {
        return Ok(());
    };
    if let Some(t) = board.convert(pos, TileKind::BloodDrop { target: color })? {
        out.push(t.info());
    }
    Ok(())
}

/// Up to `n` distinct normal positions, uniformly chosen
fn random_normals<R: RandomSource>(board: &Board, n: usize, rng: &mut R) -> Vec<Pos> {
    let mut candidates = board.normal_positions();
    rng.shuffle(&mut candidates);
    candidates.truncate(n);
    candidates
}
