use super::{
    HEIGHT, WIDTH,
    piece::{Piece, PieceKind, PieceMask},
};

/// A single cell of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Block {
    #[default]
    Empty,
    /// Locked cell left behind by a piece of this kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Color identifier of the cell: 0 for empty, `1..=7` for locked cells.
    #[must_use]
    pub fn color(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.color(),
        }
    }
}

type BoardRow = [Block; WIDTH];

const EMPTY_ROW: BoardRow = [Block::Empty; WIDTH];

fn is_row_filled(row: &BoardRow) -> bool {
    row.iter().all(|b| !b.is_empty())
}

/// The 20×10 playfield.
///
/// Row 0 is the top and row `HEIGHT - 1` the bottom. Coordinates passed in with
/// a piece mask are signed: cells above the board (negative rows) belong to the
/// spawn buffer and never collide, cells left, right or below the board always do.
///
/// # Example
///
/// ```
/// use tetrevo_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::I).dropped(&board);
/// board.fill_piece(&piece);
/// assert_eq!(board.clear_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = WIDTH;
    pub const HEIGHT: usize = HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; HEIGHT],
    };

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block; WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        self.rows[y][x]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y][x] = block;
    }

    /// Returns the in-board cell at signed coordinates, or `None` when outside.
    fn checked_cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Block> {
        let x = usize::try_from(x).ok().filter(|x| *x < WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < HEIGHT)?;
        Some(&mut self.rows[y][x])
    }

    /// Tests whether `mask` placed with its top-left corner at `(x, y)` overlaps
    /// a wall, the floor or a locked cell.
    #[must_use]
    pub fn is_colliding(&self, mask: PieceMask, x: i32, y: i32) -> bool {
        mask.occupied_offsets().into_iter().any(|(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            let Ok(col) = usize::try_from(cx) else {
                return true;
            };
            if col >= WIDTH {
                return true;
            }
            match usize::try_from(cy) {
                // above the board: spawn buffer
                Err(_) => false,
                Ok(row) if row >= HEIGHT => true,
                Ok(row) => !self.rows[row][col].is_empty(),
            }
        })
    }

    #[must_use]
    pub fn is_piece_colliding(&self, piece: &Piece) -> bool {
        self.is_colliding(piece.mask(), piece.x(), piece.y())
    }

    /// Writes `block` into every in-board occupied cell of `mask` at `(x, y)`.
    ///
    /// Cells that fall outside the board are skipped.
    pub fn fill_mask(&mut self, mask: PieceMask, x: i32, y: i32, block: Block) {
        for (dx, dy) in mask.occupied_offsets() {
            if let Some(cell) = self.checked_cell_mut(x + dx, y + dy) {
                *cell = block;
            }
        }
    }

    /// Locks the piece into the board using its kind as the cell color.
    pub fn fill_piece(&mut self, piece: &Piece) {
        self.fill_mask(piece.mask(), piece.x(), piece.y(), Block::Piece(piece.kind()));
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Remaining rows keep their relative order and drop by the number of
    /// filled rows below them; empty rows are inserted at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..HEIGHT).rev() {
            if is_row_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Number of rows that are completely filled.
    #[must_use]
    pub fn filled_row_count(&self) -> usize {
        self.rows.iter().filter(|row| is_row_filled(row)).count()
    }

    #[must_use]
    pub fn is_row_filled(&self, y: usize) -> bool {
        is_row_filled(&self.rows[y])
    }

    #[must_use]
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.rows[y].iter().all(|b| b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceRotation;

    const FILL: Block = Block::Piece(PieceKind::I);

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..WIDTH {
            board.set_cell(x, y, FILL);
        }
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert!(board.rows().flatten().all(|b| b.is_empty()));
        assert_eq!(board.rows().count(), HEIGHT);
        assert_eq!(board.filled_row_count(), 0);
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::EMPTY;
        let o = PieceKind::O.base_mask(); // box columns 1..=2, rows 1..=2

        assert!(!board.is_colliding(o, 0, 0));
        assert!(!board.is_colliding(o, -1, 0));
        assert!(board.is_colliding(o, -2, 0));
        assert!(!board.is_colliding(o, 7, 0));
        assert!(board.is_colliding(o, 8, 0));
        assert!(!board.is_colliding(o, 0, 17));
        assert!(board.is_colliding(o, 0, 18));
    }

    #[test]
    fn test_rows_above_board_never_collide() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 0);
        board.set_cell(0, 0, Block::Empty);
        let o = PieceKind::O.base_mask();
        // Entirely above the board.
        assert!(!board.is_colliding(o, 3, -3));
        // Lower half reaches row 0, which is filled.
        assert!(board.is_colliding(o, 3, -2));
    }

    #[test]
    fn test_collision_with_locked_cell() {
        let mut board = Board::EMPTY;
        board.set_cell(5, 10, FILL);
        let piece = Piece::with_placement(PieceKind::O, PieceRotation::new(0), 4, 9);
        assert!(board.is_piece_colliding(&piece));
        assert!(!board.is_piece_colliding(&piece.left().left()));
    }

    #[test]
    fn test_fill_mask_skips_out_of_bounds_cells() {
        let mut board = Board::EMPTY;
        // I vertical in box column 2, three of its cells above the board.
        board.fill_mask(PieceKind::I.base_mask(), 0, -3, Block::Piece(PieceKind::I));
        assert_eq!(board.cell(2, 0), Block::Piece(PieceKind::I));
        assert_eq!(board.rows().flatten().filter(|b| !b.is_empty()).count(), 1);

        // Fully off the left edge: nothing written, no panic.
        board.fill_mask(PieceKind::I.base_mask(), -4, 5, Block::Piece(PieceKind::I));
        assert_eq!(board.rows().flatten().filter(|b| !b.is_empty()).count(), 1);
    }

    #[test]
    fn test_fill_piece_uses_piece_color() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::L).dropped(&board);
        board.fill_piece(&piece);
        let colors: Vec<u8> = board
            .rows()
            .flatten()
            .map(|b| b.color())
            .filter(|c| *c != 0)
            .collect();
        assert_eq!(colors, vec![PieceKind::L.color(); 4]);
    }

    #[test]
    fn test_clear_lines_basic() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, HEIGHT - 1);
        board.set_cell(3, HEIGHT - 2, FILL);

        assert_eq!(board.clear_lines(), 1);
        assert!(board.is_row_empty(0));
        assert_eq!(board.cell(3, HEIGHT - 1), FILL);
        assert!(board.is_row_empty(HEIGHT - 2));
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows_preserve_order() {
        let mut board = Board::EMPTY;
        // Marker rows with a single distinct cell each, interleaved with full rows.
        board.set_cell(0, 10, Block::Piece(PieceKind::T));
        fill_row(&mut board, 11);
        board.set_cell(1, 12, Block::Piece(PieceKind::S));
        fill_row(&mut board, 13);
        fill_row(&mut board, 14);
        board.set_cell(2, 15, Block::Piece(PieceKind::Z));
        fill_row(&mut board, 19);

        let before = board.clone();
        let cleared = board.clear_lines();
        assert_eq!(cleared, 4);

        // Reference: erase each full row top to bottom and insert an empty row on top.
        let mut expected: Vec<BoardRow> = before.rows.to_vec();
        for y in 0..HEIGHT {
            if is_row_filled(&expected[y]) {
                expected.remove(y);
                expected.insert(0, EMPTY_ROW);
            }
        }
        assert_eq!(board.rows.to_vec(), expected);

        for y in 0..cleared {
            assert!(board.is_row_empty(y));
        }
        // Each marker drops by the number of full rows below it.
        assert_eq!(board.cell(0, 14), Block::Piece(PieceKind::T));
        assert_eq!(board.cell(1, 15), Block::Piece(PieceKind::S));
        assert_eq!(board.cell(2, 16), Block::Piece(PieceKind::Z));
    }

    #[test]
    fn test_clear_lines_partial_line_stays() {
        let mut board = Board::EMPTY;
        for x in 0..WIDTH - 1 {
            board.set_cell(x, HEIGHT - 1, FILL);
        }
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(
            board.rows().flatten().filter(|b| !b.is_empty()).count(),
            WIDTH - 1
        );
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = Board::EMPTY;
        for y in 0..HEIGHT {
            fill_row(&mut board, y);
        }
        assert_eq!(board.filled_row_count(), HEIGHT);
        assert_eq!(board.clear_lines(), HEIGHT);
        assert_eq!(board, Board::EMPTY);
    }
}
