//! Placement evaluation: scoring the board left behind by a placement.
//!
//! The score is a fixed linear combination of the four [`BoardMetrics`]:
//!
//! ```text
//! score = w_lines·completedLines − w_height·aggregateHeight − w_holes·holes − w_bumpiness·bumpiness
//! ```
//!
//! The weights come from an agent and are tuned by the evolution loop
//! (see `tetrevo-training`). Their sign is not constrained: a negative
//! `w_height` makes the agent favor tall stacks.

use std::fmt;

use serde::{Deserialize, Serialize};
use tetrevo_engine::Board;

use crate::board_metrics::BoardMetrics;

/// Scores a board snapshot; higher is better.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_board(&self, board: &Board) -> f32;
}

/// The four evaluation weights of an agent.
///
/// ```
/// use tetrevo_engine::Board;
/// use tetrevo_evaluator::placement_evaluator::{HeuristicWeights, PlacementEvaluator};
///
/// let weights = HeuristicWeights::new(1.0, 0.5, 0.8, 0.2);
/// assert_eq!(weights.evaluate_board(&Board::EMPTY), 0.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub lines: f32,
    pub height: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl HeuristicWeights {
    /// Number of weight components.
    pub const LEN: usize = 4;

    #[must_use]
    pub const fn new(lines: f32, height: f32, holes: f32, bumpiness: f32) -> Self {
        Self {
            lines,
            height,
            holes,
            bumpiness,
        }
    }

    #[must_use]
    pub const fn from_array([lines, height, holes, bumpiness]: [f32; Self::LEN]) -> Self {
        Self::new(lines, height, holes, bumpiness)
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; Self::LEN] {
        [self.lines, self.height, self.holes, self.bumpiness]
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn score(&self, metrics: &BoardMetrics) -> f32 {
        self.lines * metrics.completed_lines as f32
            - self.height * metrics.aggregate_height as f32
            - self.holes * metrics.holes as f32
            - self.bumpiness * metrics.bumpiness as f32
    }
}

impl fmt::Display for HeuristicWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[lines {:.3}, height {:.3}, holes {:.3}, bumpiness {:.3}]",
            self.lines, self.height, self.holes, self.bumpiness
        )
    }
}

impl PlacementEvaluator for HeuristicWeights {
    #[inline]
    fn evaluate_board(&self, board: &Board) -> f32 {
        self.score(&BoardMetrics::from_board(board))
    }
}
