//! The four board metrics consulted by the heuristic evaluator.
//!
//! - **Aggregate height**: sum over columns of `HEIGHT - topmost occupied row`
//! - **Holes**: empty cells with at least one occupied cell above in the same column
//! - **Bumpiness**: sum of absolute height differences of adjacent columns
//! - **Completed lines**: rows with no empty cell
//!
//! No other metric takes part in the placement score.

use std::iter;

use tetrevo_engine::Board;

/// Per-column heights; an empty column has height 0.
#[must_use]
pub fn column_heights(board: &Board) -> [u32; Board::WIDTH] {
    let mut heights = [0; Board::WIDTH];
    for (x, h) in heights.iter_mut().enumerate() {
        let top = board.rows().position(|row| !row[x].is_empty());
        if let Some(top) = top {
            *h = u32::try_from(Board::HEIGHT - top).unwrap_or(u32::MAX);
        }
    }
    heights
}

fn column_occupied_cells(board: &Board) -> [u32; Board::WIDTH] {
    let mut occupied = [0; Board::WIDTH];
    for row in board.rows() {
        for (o, block) in iter::zip(&mut occupied, row) {
            if !block.is_empty() {
                *o += 1;
            }
        }
    }
    occupied
}

/// Metrics of a single board snapshot. All values are non-negative.
///
/// ```
/// use tetrevo_engine::Board;
/// use tetrevo_evaluator::board_metrics::BoardMetrics;
///
/// let metrics = BoardMetrics::from_board(&Board::EMPTY);
/// assert_eq!(metrics, BoardMetrics::default());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoardMetrics {
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub completed_lines: u32,
}

impl BoardMetrics {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let heights = column_heights(board);
        let occupied = column_occupied_cells(board);

        let aggregate_height = heights.iter().sum();
        // every cell below a column's top that is not occupied is a hole
        let holes = iter::zip(&heights, &occupied).map(|(h, o)| h - o).sum();
        let bumpiness = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
        let completed_lines = u32::try_from(board.filled_row_count()).unwrap_or(u32::MAX);

        Self {
            aggregate_height,
            holes,
            bumpiness,
            completed_lines,
        }
    }
}
