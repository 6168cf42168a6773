pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of playable columns.
pub const WIDTH: usize = 10;
/// Number of playable rows. Row 0 is the top.
pub const HEIGHT: usize = 20;

/// Column at which new pieces appear (left edge of the 4×4 mask).
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const PIECE_SPAWN_X: i32 = WIDTH as i32 / 2 - 2;
/// Row at which new pieces appear (top edge of the 4×4 mask).
pub const PIECE_SPAWN_Y: i32 = 0;
