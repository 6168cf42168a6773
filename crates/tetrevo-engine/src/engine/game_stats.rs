use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base score for clearing `lines` rows with a single piece, before the level multiplier.
///
/// 1: 40, 2: 100, 3: 300, 4: 1200; anything larger scores `200 × lines`.
#[must_use]
pub const fn base_line_clear_score(lines: usize) -> usize {
    match lines {
        0 => 0,
        1 => 40,
        2 => 100,
        3 => 300,
        4 => 1200,
        n => n * 200,
    }
}

/// Score awarded for clearing `lines` rows at `level`.
///
/// ```
/// use tetrevo_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(4, 1), 1200);
/// assert_eq!(line_clear_score(4, 2), 2400);
/// ```
#[must_use]
pub const fn line_clear_score(lines: usize, level: usize) -> usize {
    base_line_clear_score(lines) * level
}

const BASE_FALL_INTERVAL_MILLIS: u64 = 1000;
const FALL_INTERVAL_STEP_MILLIS: u64 = 100;
const MIN_FALL_INTERVAL_MILLIS: u64 = 100;

/// Interval between automatic one-row falls at `level` (1-based).
///
/// Starts at one second and shrinks by 100 ms per level, never below 100 ms.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = BASE_FALL_INTERVAL_MILLIS
        .saturating_sub(steps.saturating_mul(FALL_INTERVAL_STEP_MILLIS))
        .max(MIN_FALL_INTERVAL_MILLIS);
    Duration::from_millis(millis)
}

/// Running statistics of one game session.
///
/// - **Score**: sum of line clear awards, each scaled by the level reached
///   after that clear
/// - **Level**: `total_cleared_lines / 10 + 1`
/// - **Completed pieces**: number of pieces locked into the board
///
/// # Example
///
/// ```
/// use tetrevo_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Records a locked piece and the number of rows it cleared.
    ///
    /// The level is updated before the award is computed, so the clear that
    /// reaches a new level is already paid at that level.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        if cleared_lines == 0 {
            return;
        }
        self.total_cleared_lines += cleared_lines;
        self.level = self.total_cleared_lines / 10 + 1;
        self.score += line_clear_score(cleared_lines, self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table_at_level_one() {
        assert_eq!(line_clear_score(0, 1), 0);
        assert_eq!(line_clear_score(1, 1), 40);
        assert_eq!(line_clear_score(2, 1), 100);
        assert_eq!(line_clear_score(3, 1), 300);
        assert_eq!(line_clear_score(4, 1), 1200);
        assert_eq!(line_clear_score(5, 1), 1000);
    }

    #[test]
    fn test_score_scales_with_level() {
        assert_eq!(line_clear_score(4, 2), 2400);
        assert_eq!(line_clear_score(1, 3), 120);
    }

    #[test]
    fn test_level_progression() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.complete_piece_drop(1);
        }
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 9 * 40);

        // Tenth line moves to level 2 and is paid at level 2.
        stats.complete_piece_drop(1);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.score(), 9 * 40 + 80);
        assert_eq!(stats.total_cleared_lines(), 10);
    }

    #[test]
    fn test_piece_without_clear_counts_only_piece() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(0);
        assert_eq!(stats.completed_pieces(), 2);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn test_fall_interval_floors_at_minimum() {
        assert_eq!(fall_interval(1), Duration::from_millis(1000));
        assert_eq!(fall_interval(2), Duration::from_millis(900));
        assert_eq!(fall_interval(10), Duration::from_millis(100));
        assert_eq!(fall_interval(11), Duration::from_millis(100));
        assert_eq!(fall_interval(100), Duration::from_millis(100));
    }
}
