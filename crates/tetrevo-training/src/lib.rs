//! Training loop that evolves heuristic weights across generations.
//!
//! # How Training Works
//!
//! 1. **Population** - Create agents with random weights in `[-1, 1]`
//! 2. **Play** - Each agent drives one automatic game session; sessions run in parallel
//! 3. **Fitness** - The final score of an agent's session is its fitness
//! 4. **Reproduction** - Cyclically adjacent agents are crossed to form the next generation
//! 5. **Repeat** - Indefinitely, or for a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! Evolution Loop
//!     ↓ evolves
//! Heuristic Weights (agents)
//!     ↓ used by
//! Move Planner (tetrevo-evaluator)
//!     ↓ drives
//! Game Session (tetrevo-engine)
//!     ↓ produces
//! Final Score = Fitness
//! ```
//!
//! See the [`genetic`] module for the loop and [`weights`] for the operators.
//!
//! # Current Limitations
//!
//! - Breeding pairs agents by position only; fitness never selects parents
//! - One session per agent and generation, so fitness is noisy
//! - Weights are unbounded and never normalized

pub mod genetic;
pub mod weights;
