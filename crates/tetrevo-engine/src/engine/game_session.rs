use std::{fmt, sync::Arc, time::Duration};

use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceRotation},
    },
};

use super::{GameStats, MaxScore, PieceGenerator, game_stats};

/// Lifecycle of a session.
///
/// `Spawning → Falling → (Locking → LineClearing → Spawning)* → Finished`.
/// Between calls to [`GameSession::tick`] a session is always either
/// `Falling` or `Finished`; the other states are passed through within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Spawning,
    Falling,
    Locking,
    LineClearing,
    Finished,
}

/// Discrete player intents delivered by an input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

/// Where an autopilot wants the current piece to end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementTarget {
    pub rotation: PieceRotation,
    pub x: i32,
}

/// Chooses a target placement for a freshly spawned piece.
///
/// Implemented by the move planner; the session asks once per piece.
pub trait Autopilot: fmt::Debug + Send + Sync {
    /// Returns `None` when the piece has no legal resting placement.
    fn plan(&self, board: &Board, piece: &Piece) -> Option<PlacementTarget>;
}

/// Who moves the falling piece.
#[derive(Debug)]
pub enum Controller {
    /// Intents from an input collaborator.
    Human,
    /// Steered by an autopilot; intents are ignored.
    Automatic(Box<dyn Autopilot>),
}

/// Read-only view handed to a rendering collaborator.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    pub board: &'a Board,
    /// `None` once the session is finished.
    pub falling_piece: Option<&'a Piece>,
    pub score: usize,
    pub level: usize,
    pub max_score: usize,
}

/// One game: a board, the falling piece and the rules that move between them.
///
/// The session owns its board, piece generator and statistics. The only state
/// it shares is the [`MaxScore`] handle, updated once when the game ends.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use tetrevo_engine::{Controller, GameSession, Intent, MaxScore, PieceGenerator};
///
/// let max_score = Arc::new(MaxScore::new());
/// let mut session = GameSession::new(
///     Controller::Human,
///     PieceGenerator::from_seed(1),
///     Arc::clone(&max_score),
/// );
/// session.handle_intent(Intent::MoveLeft);
/// session.tick();
/// assert!(session.state().is_falling());
/// ```
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    falling_piece: Piece,
    state: SessionState,
    stats: GameStats,
    controller: Controller,
    generator: PieceGenerator,
    max_score: Arc<MaxScore>,
    steered: bool,
}

impl GameSession {
    /// Starts a session on an empty board and spawns the first piece.
    #[must_use]
    pub fn new(controller: Controller, generator: PieceGenerator, max_score: Arc<MaxScore>) -> Self {
        Self::with_board(Board::EMPTY, controller, generator, max_score)
    }

    /// Starts a session on a pre-filled board and spawns the first piece.
    ///
    /// If the first piece already collides, the session is finished immediately
    /// with a score of 0.
    #[must_use]
    pub fn with_board(
        board: Board,
        controller: Controller,
        mut generator: PieceGenerator,
        max_score: Arc<MaxScore>,
    ) -> Self {
        let falling_piece = Piece::new(generator.next_kind());
        let mut session = Self {
            board,
            falling_piece,
            state: SessionState::Spawning,
            stats: GameStats::new(),
            controller,
            generator,
            max_score,
            steered: false,
        };
        session.place_spawned_piece();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_automatic(&self) -> bool {
        matches!(self.controller, Controller::Automatic(_))
    }

    /// Final score, available once the session is finished.
    #[must_use]
    pub fn final_score(&self) -> Option<usize> {
        self.state.is_finished().then_some(self.stats.score())
    }

    /// Interval an external pacer should wait between ticks at the current level.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        game_stats::fall_interval(self.stats.level())
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            board: &self.board,
            falling_piece: (!self.state.is_finished()).then_some(&self.falling_piece),
            score: self.stats.score(),
            level: self.stats.level(),
            max_score: self.max_score.get(),
        }
    }

    /// Advances the session by one fall step.
    ///
    /// In automatic mode the first tick of each piece also steers it to the
    /// autopilot's target. If the piece can move down it does; otherwise it
    /// locks, full rows are cleared and the next piece spawns.
    pub fn tick(&mut self) {
        if self.state.is_finished() {
            return;
        }
        if !self.steered {
            self.steer();
        }
        if self.try_soft_drop().is_ok() {
            return;
        }
        self.lock_piece();
    }

    /// Ticks until the game is over and returns the final statistics.
    pub fn run_to_completion(&mut self) -> &GameStats {
        while !self.state.is_finished() {
            self.tick();
        }
        &self.stats
    }

    /// Applies a player intent in human-driven mode.
    ///
    /// Returns whether the intent changed the falling piece. Intents are
    /// ignored in automatic mode, after the game is over, and when blocked.
    pub fn handle_intent(&mut self, intent: Intent) -> bool {
        if self.is_automatic() || self.state.is_finished() {
            return false;
        }
        let result = match intent {
            Intent::MoveLeft => self.try_move_left(),
            Intent::MoveRight => self.try_move_right(),
            Intent::SoftDrop => self.try_soft_drop(),
            Intent::Rotate => self.try_rotate(),
        };
        result.is_ok()
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.left())
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.right())
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.down())
    }

    /// Quarter turn with wall kick; on failure the piece is left untouched.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .kicked_rotation(&self.board)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_piece_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Moves the piece toward the autopilot's target one legal step at a time,
    /// then lets it fall to rest.
    fn steer(&mut self) {
        self.steered = true;
        let Controller::Automatic(autopilot) = &self.controller else {
            return;
        };
        let Some(target) = autopilot.plan(&self.board, &self.falling_piece) else {
            return;
        };

        for _ in 0..target.rotation.turns() {
            // a blocked turn leaves the piece as is; the remaining steps still apply
            let _ = self.try_rotate();
        }
        while self.falling_piece.x() < target.x && self.try_move_right().is_ok() {}
        while self.falling_piece.x() > target.x && self.try_move_left().is_ok() {}
        while self.try_soft_drop().is_ok() {}
    }

    fn lock_piece(&mut self) {
        self.state = SessionState::Locking;
        self.board.fill_piece(&self.falling_piece);
        if !self.board.is_row_empty(0) {
            self.stats.complete_piece_drop(0);
            self.finish();
            return;
        }

        self.state = SessionState::LineClearing;
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);

        self.state = SessionState::Spawning;
        self.falling_piece = Piece::new(self.generator.next_kind());
        self.place_spawned_piece();
    }

    fn place_spawned_piece(&mut self) {
        debug_assert!(self.state.is_spawning());
        self.steered = false;
        if self.board.is_piece_colliding(&self.falling_piece) {
            self.finish();
            return;
        }
        self.state = SessionState::Falling;
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        let score = self.stats.score();
        self.max_score.record(score);
        tracing::debug!(
            score,
            lines = self.stats.total_cleared_lines(),
            pieces = self.stats.completed_pieces(),
            "session finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Block, HEIGHT, PIECE_SPAWN_X, PieceKind, WIDTH};

    /// Always aims for the same placement and counts how often it was asked.
    #[derive(Debug)]
    struct FixedAutopilot {
        target: PlacementTarget,
        calls: Arc<AtomicUsize>,
    }

    impl Autopilot for FixedAutopilot {
        fn plan(&self, _board: &Board, _piece: &Piece) -> Option<PlacementTarget> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Some(self.target)
        }
    }

    fn automatic(rotation: u8, x: i32) -> (Controller, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let autopilot = FixedAutopilot {
            target: PlacementTarget {
                rotation: PieceRotation::new(rotation),
                x,
            },
            calls: Arc::clone(&calls),
        };
        (Controller::Automatic(Box::new(autopilot)), calls)
    }

    fn human_session(board: Board) -> GameSession {
        GameSession::with_board(
            board,
            Controller::Human,
            PieceGenerator::from_seed(3),
            Arc::new(MaxScore::new()),
        )
    }

    #[test]
    fn test_spawn_collision_finishes_with_zero_score() {
        let mut board = Board::EMPTY;
        for y in 0..4 {
            for x in 0..WIDTH {
                board.set_cell(x, y, Block::Piece(PieceKind::O));
            }
        }
        let max_score = Arc::new(MaxScore::new());
        let session = GameSession::with_board(
            board,
            Controller::Human,
            PieceGenerator::from_seed(1),
            Arc::clone(&max_score),
        );
        assert!(session.state().is_finished());
        assert_eq!(session.final_score(), Some(0));
        assert_eq!(max_score.get(), 0);
        assert!(session.snapshot().falling_piece.is_none());
    }

    #[test]
    fn test_new_session_is_falling_at_spawn() {
        let session = human_session(Board::EMPTY);
        assert!(session.state().is_falling());
        assert_eq!(session.falling_piece().x(), PIECE_SPAWN_X);
        assert_eq!(session.falling_piece().y(), 0);
        assert_eq!(session.final_score(), None);
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_tick_moves_piece_down_one_row() {
        let mut session = human_session(Board::EMPTY);
        session.tick();
        assert_eq!(session.falling_piece().y(), 1);
        assert!(session.state().is_falling());
    }

    #[test]
    fn test_human_intents() {
        let mut session = human_session(Board::EMPTY);
        session.falling_piece = Piece::new(PieceKind::O);

        assert!(session.handle_intent(Intent::MoveLeft));
        assert_eq!(session.falling_piece().x(), PIECE_SPAWN_X - 1);
        assert!(session.handle_intent(Intent::MoveRight));
        assert!(session.handle_intent(Intent::SoftDrop));
        assert_eq!(session.falling_piece().y(), 1);
        assert!(session.handle_intent(Intent::Rotate));
        assert_eq!(session.falling_piece().rotation(), PieceRotation::new(1));

        // O occupies box columns 1..=2; it stops with its box at x = -1.
        while session.handle_intent(Intent::MoveLeft) {}
        assert_eq!(session.falling_piece().x(), -1);
    }

    #[test]
    fn test_intents_ignored_in_automatic_mode() {
        let (controller, _) = automatic(0, PIECE_SPAWN_X);
        let mut session = GameSession::new(
            controller,
            PieceGenerator::from_seed(5),
            Arc::new(MaxScore::new()),
        );
        let before = *session.falling_piece();
        assert!(!session.handle_intent(Intent::MoveLeft));
        assert!(!session.handle_intent(Intent::Rotate));
        assert_eq!(*session.falling_piece(), before);
    }

    #[test]
    fn test_lock_spawns_next_piece() {
        let mut session = human_session(Board::EMPTY);
        session.falling_piece = Piece::new(PieceKind::O);
        // 17 falls to reach the floor, one more tick to lock.
        for _ in 0..18 {
            session.tick();
        }
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.falling_piece().y(), 0);
        assert!(session.state().is_falling());
        let locked = session.board().rows().flatten().filter(|b| !b.is_empty()).count();
        assert_eq!(locked, 4);
    }

    #[test]
    fn test_four_line_clear_scores_1200() {
        let mut board = Board::EMPTY;
        for y in HEIGHT - 4..HEIGHT {
            for x in 0..WIDTH - 1 {
                board.set_cell(x, y, Block::Piece(PieceKind::O));
            }
        }
        let mut session = human_session(board);
        // Vertical I sits in box column 2; x = 7 puts it in the empty column 9.
        session.falling_piece = Piece::new(PieceKind::I).shifted(7 - PIECE_SPAWN_X, 0);
        while session.stats().completed_pieces() == 0 {
            session.tick();
        }
        assert_eq!(session.stats().total_cleared_lines(), 4);
        assert_eq!(session.stats().score(), 1200);
        assert_eq!(session.board(), &Board::EMPTY);
    }

    #[test]
    fn test_lock_into_top_row_finishes() {
        let mut board = Board::EMPTY;
        board.set_cell(5, 4, Block::Piece(PieceKind::O));
        let max_score = Arc::new(MaxScore::new());
        let mut session = GameSession::with_board(
            board,
            Controller::Human,
            PieceGenerator::from_seed(9),
            Arc::clone(&max_score),
        );
        // Vertical I in column 5 rows 0..=3, resting on the block at row 4.
        session.falling_piece = Piece::new(PieceKind::I);
        session.tick();
        assert!(session.state().is_finished());
        assert_eq!(session.final_score(), Some(0));

        // Finished sessions ignore further input.
        session.tick();
        assert!(!session.handle_intent(Intent::MoveLeft));
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_automatic_steering_once_per_piece() {
        let (controller, calls) = automatic(1, 0);
        let mut session = GameSession::new(
            controller,
            PieceGenerator::from_seed(11),
            Arc::new(MaxScore::new()),
        );
        session.falling_piece = Piece::new(PieceKind::I);

        // Steered, dropped to rest and locked within the first tick.
        session.tick();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(session.stats().completed_pieces(), 1);
        for x in 0..4 {
            assert_eq!(session.board().cell(x, HEIGHT - 1), Block::Piece(PieceKind::I));
        }
        // The next piece has not been planned for yet.
        assert!(session.state().is_falling());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_automatic_session_runs_to_completion() {
        let (controller, calls) = automatic(0, PIECE_SPAWN_X);
        let max_score = Arc::new(MaxScore::new());
        let mut session = GameSession::new(
            controller,
            PieceGenerator::from_seed(13),
            Arc::clone(&max_score),
        );
        let pieces = session.run_to_completion().completed_pieces();
        assert!(session.state().is_finished());
        assert!(pieces > 0);
        // One plan per locked piece; a spawn that tops out is never planned.
        assert_eq!(calls.load(Ordering::Relaxed), pieces);
        assert_eq!(max_score.get(), session.stats().score());
    }
}
