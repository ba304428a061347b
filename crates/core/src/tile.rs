//! Tile module - board pieces with stable identity
//!
//! A tile's position is owned by the [`Board`](crate::board::Board): only board
//! operations write it, so the slot a tile sits in and the position it reports
//! can never disagree.

use crate::types::{Color, Pos, TileInfo, TileKind};

/// Stable tile identity, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u32);

/// Monotonic tile id source
#[derive(Debug, Clone)]
pub struct TileIds {
    next: u32,
}

impl TileIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Continue numbering after `last`
    pub fn after(last: TileId) -> Self {
        Self {
            next: last.0.wrapping_add(1),
        }
    }

    pub fn next(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Default for TileIds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    id: TileId,
    color: Color,
    kind: TileKind,
    pos: Pos,
}

impl Tile {
    /// Create an unplaced tile. Its position is assigned when the board stores it.
    pub fn new(id: TileId, color: Color, kind: TileKind) -> Self {
        Self {
            id,
            color,
            kind,
            pos: Pos::new(0, 0),
        }
    }

    pub fn normal(id: TileId, color: Color) -> Self {
        Self::new(id, color, TileKind::Normal)
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Position last written by the board
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn is_normal(&self) -> bool {
        self.kind.is_normal()
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    /// Color if this tile can take part in matching
    pub fn match_color(&self) -> Option<Color> {
        self.is_normal().then_some(self.color)
    }

    pub fn info(&self) -> TileInfo {
        TileInfo {
            pos: self.pos,
            color: self.color,
            kind: self.kind,
        }
    }

    pub(crate) fn place_at(&mut self, pos: Pos) {
        self.pos = pos;
    }

    pub(crate) fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
    }
}
