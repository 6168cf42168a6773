use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{PIECE_SPAWN_X, PIECE_SPAWN_Y, board::Board};

/// Occupancy pattern of a piece within its 4×4 bounding box.
///
/// Cells are stored row-major: the cell at column `x`, row `y` lives at index
/// `y * 4 + x`. The same `(x, y)` offsets are added to the board position of the
/// piece when it is placed, so a mask cell may land outside the board.
///
/// # Example
///
/// ```
/// use tetrevo_engine::{PieceKind, PieceMask};
///
/// let mask = PieceKind::T.base_mask();
/// assert_eq!(mask.rotated().rotated().rotated().rotated(), mask);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceMask([bool; PieceMask::CELLS]);

impl PieceMask {
    /// Side length of the bounding box.
    pub const SIZE: usize = 4;
    /// Number of cells in the bounding box.
    pub const CELLS: usize = Self::SIZE * Self::SIZE;

    /// Builds a mask from a 16-character row-major pattern where `X` marks an
    /// occupied cell and any other byte an empty one.
    #[must_use]
    pub const fn from_pattern(pattern: &[u8; Self::CELLS]) -> Self {
        let mut cells = [false; Self::CELLS];
        let mut i = 0;
        while i < Self::CELLS {
            cells[i] = pattern[i] == b'X';
            i += 1;
        }
        Self(cells)
    }

    #[must_use]
    pub const fn from_cells(cells: [bool; Self::CELLS]) -> Self {
        Self(cells)
    }

    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.0[y * Self::SIZE + x]
    }

    /// Returns the mask turned a quarter turn.
    ///
    /// The cell at `(x, y)` moves to row `x`, column `3 - y`. Applying this four
    /// times yields the original mask.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let mut cells = [false; Self::CELLS];
        let mut y = 0;
        while y < Self::SIZE {
            let mut x = 0;
            while x < Self::SIZE {
                cells[x * Self::SIZE + (Self::SIZE - 1 - y)] = self.0[y * Self::SIZE + x];
                x += 1;
            }
            y += 1;
        }
        Self(cells)
    }

    /// Returns the mask after `times` quarter turns.
    #[must_use]
    pub fn rotated_times(self, times: u8) -> Self {
        (0..times % 4).fold(self, |mask, _| mask.rotated())
    }

    /// Returns the `(dx, dy)` offsets of every occupied cell, top-left first.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub fn occupied_offsets(&self) -> ArrayVec<(i32, i32), { PieceMask::CELLS }> {
        let mut offsets = ArrayVec::new();
        for (i, _) in self.0.iter().enumerate().filter(|(_, occupied)| **occupied) {
            offsets.push(((i % Self::SIZE) as i32, (i / Self::SIZE) as i32));
        }
        offsets
    }
}

/// Number of quarter turns applied to a piece's base orientation (0..=3).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a rotation, wrapping `turns` modulo 4.
    #[must_use]
    pub const fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    #[must_use]
    pub const fn turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self((self.0 + 1) % 4)
    }
}

/// Shape catalogue entry.
///
/// The discriminant is the catalogue index; the color identifier written into
/// the board is the index plus one, so 0 stays free for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    T = 1,
    O = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

const BASE_MASKS: [PieceMask; PieceKind::LEN] = [
    PieceMask::from_pattern(b"..X...X...X...X."),
    PieceMask::from_pattern(b"..X..XX...X....."),
    PieceMask::from_pattern(b".....XX..XX....."),
    PieceMask::from_pattern(b".X...XX...X....."),
    PieceMask::from_pattern(b"..X..XX..X......"),
    PieceMask::from_pattern(b"..X...X..XX....."),
    PieceMask::from_pattern(b"X...X...XX......"),
];

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::T,
        Self::O,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color identifier in `1..=7`.
    #[must_use]
    pub const fn color(self) -> u8 {
        self as u8 + 1
    }

    /// Catalogue mask in spawn orientation.
    #[must_use]
    pub const fn base_mask(self) -> PieceMask {
        BASE_MASKS[self as usize]
    }

    #[must_use]
    pub const fn mask(self, rotation: PieceRotation) -> PieceMask {
        let mut mask = self.base_mask();
        let mut i = 0;
        while i < rotation.turns() {
            mask = mask.rotated();
            i += 1;
        }
        mask
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use tetrevo_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// A piece with orientation and board position.
///
/// Pieces are values: moving or rotating returns a new `Piece` and never
/// touches the board. Position is signed because the 4×4 box may hang over the
/// left edge or above the top row while the occupied cells are still legal.
///
/// ```
/// use tetrevo_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O).right();
/// assert!(!board.is_piece_colliding(&piece));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    mask: PieceMask,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece in spawn orientation at the spawn position.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self::with_placement(kind, PieceRotation::new(0), PIECE_SPAWN_X, PIECE_SPAWN_Y)
    }

    #[must_use]
    pub const fn with_placement(kind: PieceKind, rotation: PieceRotation, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation,
            mask: kind.mask(rotation),
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn mask(&self) -> PieceMask {
        self.mask
    }

    #[must_use]
    pub const fn color(&self) -> u8 {
        self.kind.color()
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Quarter turn in place; position is unchanged.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.rotated(),
            mask: self.mask.rotated(),
            ..*self
        }
    }

    /// Quarter turn with a bounded horizontal kick.
    ///
    /// If the turned piece collides in place, displacements of +1 and then -1
    /// columns are tried. Returns `None` when neither fits; the caller keeps the
    /// original piece, shape and position alike.
    #[must_use]
    pub fn kicked_rotation(&self, board: &Board) -> Option<Self> {
        const KICKS: [i32; 3] = [0, 1, -1];
        let rotated = self.rotated();
        KICKS
            .into_iter()
            .map(|dx| rotated.shifted(dx, 0))
            .find(|piece| !board.is_piece_colliding(piece))
    }

    /// Moves the piece down row by row until the next row would collide.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while !board.is_piece_colliding(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }
}
