//! Move planning: choosing where the current piece should come to rest.
//!
//! The planner is a greedy one-step search. For every rotation `0..4` of the
//! piece's base mask and every column from `-4` to `WIDTH - 1` it simulates a
//! hard drop, merges the piece into a copy of the board, clears full rows and
//! scores the result with a [`PlacementEvaluator`]. The candidate with the
//! highest score wins.
//!
//! # Candidate Order and Ties
//!
//! Candidates are visited rotation-major, column-minor (ascending in both).
//! A candidate replaces the current best only if its score is strictly
//! greater, so among equally scored placements the first one visited, i.e. the
//! lexicographically smallest `(rotation, column)`, is returned.
//!
//! Columns left of the board are part of the search because a mask's occupied
//! cells need not start in its first column. Columns where the piece cannot
//! occupy even the top row are skipped.
//!
//! # Usage
//!
//! ```
//! use tetrevo_engine::{Board, PieceKind};
//! use tetrevo_evaluator::{move_planner::MovePlanner, placement_evaluator::HeuristicWeights};
//!
//! let planner = MovePlanner::from_weights(HeuristicWeights::new(0.76, 0.51, 0.36, 0.18));
//! let best = planner.select_best_move(&Board::EMPTY, PieceKind::T).unwrap();
//! assert!(best.rotation.turns() < 4);
//! ```

use std::ops::Range;

use tetrevo_engine::{
    Autopilot, Block, Board, Piece, PieceKind, PieceMask, PieceRotation, PlacementTarget,
};

use crate::placement_evaluator::{HeuristicWeights, PlacementEvaluator};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const SEARCH_COLUMNS: Range<i32> = -(PieceMask::SIZE as i32)..Board::WIDTH as i32;

/// A resting placement chosen by the planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// Quarter turns applied to the base mask.
    pub rotation: PieceRotation,
    /// Column of the mask's bounding box.
    pub x: i32,
    /// Resting row of the mask's bounding box.
    pub y: i32,
    /// Evaluation of the board after the placement.
    pub score: f32,
}

impl Move {
    #[must_use]
    pub fn target(&self) -> PlacementTarget {
        PlacementTarget {
            rotation: self.rotation,
            x: self.x,
        }
    }
}

/// Exhaustive one-piece placement search.
#[derive(Debug)]
pub struct MovePlanner {
    placement_evaluator: Box<dyn PlacementEvaluator>,
}

impl MovePlanner {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Creates a planner scoring boards with an agent's heuristic weights.
    #[must_use]
    pub fn from_weights(weights: HeuristicWeights) -> Self {
        Self::new(Box::new(weights))
    }

    /// Returns the best resting placement of `kind` on `board`.
    ///
    /// Returns `None` if the piece fits nowhere, e.g. when the stack reaches
    /// the top row in every column.
    #[must_use]
    pub fn select_best_move(&self, board: &Board, kind: PieceKind) -> Option<Move> {
        let mut best: Option<Move> = None;

        for (rotation, x) in candidates() {
            let mask = kind.mask(rotation);
            let Some(y) = resting_row(board, mask, x) else {
                continue;
            };

            let mut next = board.clone();
            next.fill_mask(mask, x, y, Block::Piece(kind));
            next.clear_lines();
            let score = self.placement_evaluator.evaluate_board(&next);

            if best.is_none_or(|best| score > best.score) {
                best = Some(Move {
                    rotation,
                    x,
                    y,
                    score,
                });
            }
        }

        best
    }
}

impl Autopilot for MovePlanner {
    fn plan(&self, board: &Board, piece: &Piece) -> Option<PlacementTarget> {
        self.select_best_move(board, piece.kind())
            .map(|best| best.target())
    }
}

fn candidates() -> impl Iterator<Item = (PieceRotation, i32)> {
    PieceRotation::ALL
        .into_iter()
        .flat_map(|rotation| SEARCH_COLUMNS.map(move |x| (rotation, x)))
}

/// Last collision-free row of a hard drop from row 0, or `None` if row 0
/// already collides.
fn resting_row(board: &Board, mask: PieceMask, x: i32) -> Option<i32> {
    let mut y = 0;
    while !board.is_colliding(mask, x, y) {
        y += 1;
    }
    (y > 0).then_some(y - 1)
}
