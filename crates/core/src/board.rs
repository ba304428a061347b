//! Board module - manages the tile grid
//!
//! The board is a `width x height` grid where each cell is empty or holds a tile.
//! Uses a flat row-major vector (`y * width + x`) for cache locality.
//! Coordinates: `x` grows left to right, `y` grows bottom to top, so gravity
//! pulls tiles toward `y = 0`.
//!
//! Every mutation goes through this module. Storing a tile rewrites its
//! position, which keeps slot and reported position in step.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::tile::{Tile, TileId, TileIds};
use crate::types::{Color, Pos, TileInfo, TileKind, TileMove, MAX_BOARD_SIDE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position ({x}, {y}) is outside the board")]
    OutOfBounds { x: i8, y: i8 },
}

/// Rejected text layout passed to [`Board::from_layout`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid board layout: {0}")]
pub struct LayoutError(String);

impl BoardError {
    fn out_of_bounds(pos: Pos) -> Self {
        BoardError::OutOfBounds { x: pos.x, y: pos.y }
    }
}

/// The tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board. Sides are clamped to `MAX_BOARD_SIDE`.
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.min(MAX_BOARD_SIDE);
        let height = height.min(MAX_BOARD_SIDE);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Build a board from text rows, top row first.
    ///
    /// `R Y G B` are normal tiles, `r y g b` blood drops targeting that color,
    /// `A` a bat, `V` a vampire and `.` an empty cell. Whitespace is ignored.
    /// Tile ids are assigned from 1 in row-major order (bottom row first).
    ///
    /// # Examples
    ///
    /// ```
    /// use vampire_match_core::Board;
    /// use vampire_match_types::{Color, Pos};
    ///
    /// let board = Board::from_layout(&[
    ///     "RYG",
    ///     "GRY",
    ///     "YGA",
    /// ]).unwrap();
    /// assert_eq!(board.tile(Pos::new(0, 2)).unwrap().color(), Color::Red);
    /// assert!(board.tile(Pos::new(2, 0)).unwrap().is_special());
    /// ```
    pub fn from_layout(rows: &[&str]) -> Result<Self, LayoutError> {
        let parsed: Vec<Vec<char>> = rows
            .iter()
            .map(|r| r.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        let height = parsed.len();
        let width = parsed.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LayoutError("layout is empty".to_string()));
        }
        if width > MAX_BOARD_SIDE as usize || height > MAX_BOARD_SIDE as usize {
            return Err(LayoutError(format!(
                "layout {width}x{height} exceeds {MAX_BOARD_SIDE}x{MAX_BOARD_SIDE}"
            )));
        }
        if let Some(bad) = parsed.iter().position(|r| r.len() != width) {
            return Err(LayoutError(format!(
                "row {bad} has {} cells, expected {width}",
                parsed[bad].len()
            )));
        }

        let mut board = Board::new(width as u8, height as u8);
        let mut ids = TileIds::new();
        for y in 0..height {
            // First row in the layout is the top of the board.
            let row = &parsed[height - 1 - y];
            for (x, &c) in row.iter().enumerate() {
                let pos = Pos::new(x as i8, y as i8);
                let tile = match c {
                    '.' => None,
                    'A' => Some(Tile::new(ids.next(), Color::Red, TileKind::Bat)),
                    'V' => Some(Tile::new(ids.next(), Color::Red, TileKind::Vampire)),
                    c if c.is_ascii_lowercase() => {
                        let color = Color::from_char(c).ok_or_else(|| {
                            LayoutError(format!("unknown cell '{c}' at {pos}"))
                        })?;
                        Some(Tile::new(
                            ids.next(),
                            color,
                            TileKind::BloodDrop { target: color },
                        ))
                    }
                    c => {
                        let color = Color::from_char(c).ok_or_else(|| {
                            LayoutError(format!("unknown cell '{c}' at {pos}"))
                        })?;
                        Some(Tile::normal(ids.next(), color))
                    }
                };
                board
                    .set(pos, tile)
                    .map_err(|e| LayoutError(e.to_string()))?;
            }
        }
        Ok(board)
    }

    /// Render back to layout rows, top row first
    pub fn to_layout(&self) -> Vec<String> {
        (0..self.height as i8)
            .rev()
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| match self.tile(Pos::new(x, y)) {
                        None => '.',
                        Some(t) => match t.kind() {
                            TileKind::Normal => t.color().as_char(),
                            TileKind::BloodDrop { target } => target.as_char().to_ascii_lowercase(),
                            TileKind::Bat => 'A',
                            TileKind::Vampire => 'V',
                        },
                    })
                    .collect()
            })
            .collect()
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u8) < self.width && (pos.y as u8) < self.height
    }

    /// Get the occupant of a cell
    pub fn get(&self, pos: Pos) -> Result<Option<&Tile>, BoardError> {
        let idx = self.index(pos).ok_or_else(|| BoardError::out_of_bounds(pos))?;
        Ok(self.cells[idx].as_ref())
    }

    /// Occupant of a cell, `None` when empty or out of bounds
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Color of the cell if it holds a normal tile
    pub fn match_color(&self, pos: Pos) -> Option<Color> {
        self.tile(pos).and_then(Tile::match_color)
    }

    /// Store a tile (or clear the cell), returning the previous occupant
    pub fn set(&mut self, pos: Pos, tile: Option<Tile>) -> Result<Option<Tile>, BoardError> {
        let idx = self.index(pos).ok_or_else(|| BoardError::out_of_bounds(pos))?;
        let tile = tile.map(|mut t| {
            t.place_at(pos);
            t
        });
        Ok(std::mem::replace(&mut self.cells[idx], tile))
    }

    /// Remove and return the occupant of a cell
    pub fn take(&mut self, pos: Pos) -> Result<Option<Tile>, BoardError> {
        self.set(pos, None)
    }

    /// Exchange the occupants of two cells. Both positions are checked before
    /// anything moves.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = self.index(a).ok_or_else(|| BoardError::out_of_bounds(a))?;
        let ib = self.index(b).ok_or_else(|| BoardError::out_of_bounds(b))?;
        self.cells.swap(ia, ib);
        if let Some(t) = self.cells[ia].as_mut() {
            t.place_at(a);
        }
        if let Some(t) = self.cells[ib].as_mut() {
            t.place_at(b);
        }
        Ok(())
    }

    /// Change the kind of the tile in place. Returns the updated tile, or
    /// `None` if the cell is empty.
    pub fn convert(&mut self, pos: Pos, kind: TileKind) -> Result<Option<Tile>, BoardError> {
        let idx = self.index(pos).ok_or_else(|| BoardError::out_of_bounds(pos))?;
        Ok(self.cells[idx].as_mut().map(|t| {
            t.set_kind(kind);
            *t
        }))
    }

    /// In-bounds edge neighbours in left, right, down, up order
    pub fn neighbors4(&self, pos: Pos) -> Result<ArrayVec<Pos, 4>, BoardError> {
        if !self.in_bounds(pos) {
            return Err(BoardError::out_of_bounds(pos));
        }
        Ok([(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(|(dx, dy)| pos.offset(dx, dy))
            .filter(|p| self.in_bounds(*p))
            .collect())
    }

    /// All positions, bottom row first, left to right
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let (w, h) = (self.width as i8, self.height as i8);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Occupied cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn empty_positions(&self) -> Vec<Pos> {
        self.positions().filter(|p| self.tile(*p).is_none()).collect()
    }

    /// Positions holding normal tiles, row-major
    pub fn normal_positions(&self) -> Vec<Pos> {
        self.tiles().filter(|t| t.is_normal()).map(Tile::pos).collect()
    }

    /// Highest tile id on the board
    pub fn max_tile_id(&self) -> Option<TileId> {
        self.tiles().map(Tile::id).max()
    }

    /// Every occupied cell's tile reports that cell's position
    pub fn positions_consistent(&self) -> bool {
        self.positions()
            .all(|p| self.tile(p).map_or(true, |t| t.pos() == p))
    }

    /// Apply gravity: in each column tiles fall to fill gaps below them,
    /// keeping their relative order. Returns the moves made, column by column.
    pub fn collapse(&mut self) -> Vec<TileMove> {
        let mut moves = Vec::new();
        let w = self.width as usize;
        for x in 0..self.width as i8 {
            let mut write_y: i8 = 0;
            for read_y in 0..self.height as i8 {
                let read_idx = read_y as usize * w + x as usize;
                if self.cells[read_idx].is_none() {
                    continue;
                }
                if read_y != write_y {
                    let write_idx = write_y as usize * w + x as usize;
                    let mut tile = self.cells[read_idx].take();
                    if let Some(t) = tile.as_mut() {
                        t.place_at(Pos::new(x, write_y));
                    }
                    self.cells[write_idx] = tile;
                    moves.push(TileMove {
                        from: Pos::new(x, read_y),
                        to: Pos::new(x, write_y),
                    });
                }
                write_y += 1;
            }
        }
        moves
    }

    /// Remove every tile, returning what was removed
    pub fn clear(&mut self) -> Vec<TileInfo> {
        let removed = self.tiles().map(Tile::info).collect();
        for cell in &mut self.cells {
            *cell = None;
        }
        removed
    }

    /// Rearrange tiles into the given positions. `targets[i]` receives the tile
    /// currently at the i-th occupied cell. Used by the dead-board shuffle.
    pub(crate) fn permute(&mut self, targets: &[Pos]) -> Vec<TileMove> {
        let tiles: Vec<Tile> = self.cells.iter_mut().filter_map(Option::take).collect();
        let mut moves = Vec::with_capacity(tiles.len());
        for (tile, &to) in tiles.into_iter().zip(targets) {
            let from = tile.pos();
            if let Some(idx) = self.index(to) {
                let mut tile = tile;
                tile.place_at(to);
                self.cells[idx] = Some(tile);
                if from != to {
                    moves.push(TileMove { from, to });
                }
            }
        }
        moves
    }
}
