//! Heuristic evaluation and move planning for the falling-block game.
//!
//! The crate has two levels:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - Scores a board snapshot as a
//!    weighted linear combination of four [`board_metrics`].
//!
//! 2. **Move Planning** ([`move_planner`]) - Tries every rotation and column of the current
//!    piece, scores the board each placement leaves behind and keeps the best one.
//!
//! ```text
//! Move Planning (select resting placement)
//!     ↓ uses
//! Placement Evaluation (score board snapshot)
//!     ↓ uses
//! Board Metrics (height, holes, bumpiness, completed lines)
//! ```
//!
//! [`move_planner::MovePlanner`] implements [`tetrevo_engine::Autopilot`], so it can
//! drive a [`tetrevo_engine::GameSession`] directly:
//!
//! ```
//! use std::sync::Arc;
//!
//! use tetrevo_engine::{Controller, GameSession, MaxScore, PieceGenerator};
//! use tetrevo_evaluator::{move_planner::MovePlanner, placement_evaluator::HeuristicWeights};
//!
//! let planner = MovePlanner::from_weights(HeuristicWeights::new(0.76, 0.51, 0.36, 0.18));
//! let mut session = GameSession::new(
//!     Controller::Automatic(Box::new(planner)),
//!     PieceGenerator::from_seed(0),
//!     Arc::new(MaxScore::new()),
//! );
//! for _ in 0..100 {
//!     session.tick();
//! }
//! assert!(session.stats().completed_pieces() > 0);
//! ```

pub mod board_metrics;
pub mod move_planner;
pub mod placement_evaluator;
