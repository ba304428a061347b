//! Match detector - finds runs, squares and T/L/plus intersections
//!
//! Only normal tiles take part. A special tile is neither a member of a run nor
//! transparent to it: a run stops at the first special it would have to cross.
//!
//! Shapes are collected in a fixed order (lines, squares, crosses). The
//! destroyed set is their union, so that order only matters for deciding which
//! special each shape gets to spawn, see [`MatchSet::spawn_requests`].

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{Color, Pos, SpecialKind, BLOOD_DROP_RUN, MIN_RUN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Geometric cause of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchShape {
    /// Maximal run of three or more along one axis
    Line { axis: Axis, len: u8 },
    /// 2x2 block
    Square,
    /// A horizontal and a vertical run of three or more sharing a cell
    Cross,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub shape: MatchShape,
    pub color: Color,
    /// Cells covered by the shape, sorted
    pub cells: Vec<Pos>,
    /// Reference cell: run midpoint, square's bottom-left cell, or cross pivot
    pub anchor: Pos,
}

impl MatchGroup {
    /// Special this shape earns, if any
    pub fn special(&self) -> Option<SpecialKind> {
        match self.shape {
            MatchShape::Line { len, .. } if len as usize >= BLOOD_DROP_RUN => {
                Some(SpecialKind::BloodDrop)
            }
            MatchShape::Line { .. } => None,
            MatchShape::Square => Some(SpecialKind::Bat),
            MatchShape::Cross => Some(SpecialKind::Vampire),
        }
    }
}

/// Deferred special creation, queued by detection and drained by the engine
/// after the matched tiles are destroyed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub kind: SpecialKind,
    pub color: Color,
    pub anchor: Pos,
    /// Fallback cells, nearest to the anchor first
    pub cells: Vec<Pos>,
}

/// Result of a detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeSet<Pos>,
    groups: Vec<MatchGroup>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of distinct matched cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    /// Distinct matched cells in position order
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().copied()
    }

    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    fn push(&mut self, group: MatchGroup) {
        self.cells.extend(group.cells.iter().copied());
        self.groups.push(group);
    }

    /// Specials to spawn for this match.
    ///
    /// Precedence is vampire, then blood drop, then bat. A shape that shares a
    /// cell with a shape already granted a special gets nothing, so one
    /// cluster of tiles produces one special.
    pub fn spawn_requests(&self) -> Vec<SpawnRequest> {
        let mut claimed: BTreeSet<Pos> = BTreeSet::new();
        let mut requests = Vec::new();
        for kind in [SpecialKind::Vampire, SpecialKind::BloodDrop, SpecialKind::Bat] {
            for group in self.groups.iter().filter(|g| g.special() == Some(kind)) {
                if group.cells.iter().any(|c| claimed.contains(c)) {
                    continue;
                }
                claimed.extend(group.cells.iter().copied());

                let mut cells = group.cells.clone();
                cells.sort_by_key(|c| (c.manhattan(group.anchor), *c));
                requests.push(SpawnRequest {
                    kind,
                    color: group.color,
                    anchor: group.anchor,
                    cells,
                });
            }
        }
        requests
    }
}

#[derive(Debug, Clone)]
struct Run {
    axis: Axis,
    color: Color,
    cells: Vec<Pos>,
}

/// Scan one line of cells for maximal same-colored normal runs of `MIN_RUN`+
fn scan_line(board: &Board, line: impl Iterator<Item = Pos>, axis: Axis, out: &mut Vec<Run>) {
    let mut current: Vec<Pos> = Vec::new();
    let mut current_color: Option<Color> = None;

    let flush = |cells: &mut Vec<Pos>, color: Option<Color>, out: &mut Vec<Run>| {
        if let Some(color) = color {
            if cells.len() >= MIN_RUN {
                out.push(Run {
                    axis,
                    color,
                    cells: std::mem::take(cells),
                });
            }
        }
        cells.clear();
    };

    for pos in line {
        let color = board.match_color(pos);
        if color.is_some() && color == current_color {
            current.push(pos);
            continue;
        }
        flush(&mut current, current_color, &mut *out);
        current_color = color;
        if color.is_some() {
            current.push(pos);
        }
    }
    flush(&mut current, current_color, &mut *out);
}

fn find_runs(board: &Board) -> Vec<Run> {
    let (w, h) = (board.width() as i8, board.height() as i8);
    let mut runs = Vec::new();
    for y in 0..h {
        scan_line(board, (0..w).map(|x| Pos::new(x, y)), Axis::Horizontal, &mut runs);
    }
    for x in 0..w {
        scan_line(board, (0..h).map(|y| Pos::new(x, y)), Axis::Vertical, &mut runs);
    }
    runs
}

/// Detect every match on the board
pub fn find_matches(board: &Board) -> MatchSet {
    let mut set = MatchSet::default();
    let runs = find_runs(board);

    // Lines
    let w = board.width() as usize;
    let mut h_run_at: Vec<Option<usize>> = vec![None; board.size()];
    let mut v_run_at: Vec<Option<usize>> = vec![None; board.size()];
    for (i, run) in runs.iter().enumerate() {
        let index = match run.axis {
            Axis::Horizontal => &mut h_run_at,
            Axis::Vertical => &mut v_run_at,
        };
        for c in &run.cells {
            index[c.y as usize * w + c.x as usize] = Some(i);
        }
        set.push(MatchGroup {
            shape: MatchShape::Line {
                axis: run.axis,
                len: run.cells.len() as u8,
            },
            color: run.color,
            cells: run.cells.clone(),
            anchor: run.cells[run.cells.len() / 2],
        });
    }

    // Squares
    for y in 0..board.height() as i8 - 1 {
        for x in 0..board.width() as i8 - 1 {
            let corner = Pos::new(x, y);
            let Some(color) = board.match_color(corner) else {
                continue;
            };
            let block = [corner, corner.offset(1, 0), corner.offset(0, 1), corner.offset(1, 1)];
            if block.iter().all(|&p| board.match_color(p) == Some(color)) {
                let mut cells = block.to_vec();
                cells.sort();
                set.push(MatchGroup {
                    shape: MatchShape::Square,
                    color,
                    cells,
                    anchor: corner,
                });
            }
        }
    }

    // Crosses: a pivot sitting in both a horizontal and a vertical run
    for pivot in board.positions() {
        let idx = pivot.y as usize * w + pivot.x as usize;
        let (Some(hi), Some(vi)) = (h_run_at[idx], v_run_at[idx]) else {
            continue;
        };
        let mut cells: Vec<Pos> = runs[hi].cells.iter().chain(&runs[vi].cells).copied().collect();
        cells.sort();
        cells.dedup();
        set.push(MatchGroup {
            shape: MatchShape::Cross,
            color: runs[hi].color,
            cells,
            anchor: pivot,
        });
    }

    set
}

/// True if the normal tile at `pos` is part of any run or square
pub fn matches_at(board: &Board, pos: Pos) -> bool {
    let Some(color) = board.match_color(pos) else {
        return false;
    };
    let same = |dx: i8, dy: i8| board.match_color(pos.offset(dx, dy)) == Some(color);
    let extent = |dx: i8, dy: i8| {
        let mut n = 0;
        let mut p = pos.offset(dx, dy);
        while board.match_color(p) == Some(color) {
            n += 1;
            p = p.offset(dx, dy);
        }
        n
    };

    if 1 + extent(-1, 0) + extent(1, 0) >= MIN_RUN || 1 + extent(0, -1) + extent(0, 1) >= MIN_RUN {
        return true;
    }
    [(-1, -1), (1, -1), (-1, 1), (1, 1)]
        .iter()
        .any(|&(dx, dy)| same(dx, 0) && same(0, dy) && same(dx, dy))
}
