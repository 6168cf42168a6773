//! Game rules on top of the core board and piece model.
//!
//! - [`GameSession`] - One game: board, falling piece, state machine, scoring
//! - [`GameStats`] - Score, level, cleared lines and locked pieces
//! - [`PieceGenerator`] - Uniform random piece supply, seedable
//! - [`MaxScore`] - Highest final score across sessions, shared by handle
//!
//! # Game Flow
//!
//! 1. A piece spawns at the fixed spawn position; if it collides the game is over
//! 2. Each tick the piece falls one row (after being steered, in automatic mode)
//! 3. When it cannot fall it locks; touching the top row ends the game
//! 4. Full rows are cleared and scored, then the next piece spawns
//!
//! Wall-clock pacing is left to the caller: [`GameSession::fall_interval`]
//! reports how long to wait between ticks at the current level.

pub use self::{game_session::*, game_stats::*, max_score::*, piece_generator::*};

mod game_session;
mod game_stats;
mod max_score;
mod piece_generator;
