use std::sync::atomic::{AtomicUsize, Ordering};

/// Highest final score observed across all finished sessions.
///
/// Shared by handle (`Arc<MaxScore>`) between concurrently running sessions.
/// Updates are a commutative atomic max, so the order in which sessions report
/// does not matter and the value never decreases.
///
/// ```
/// use tetrevo_engine::MaxScore;
///
/// let max = MaxScore::new();
/// for score in [10, 5, 20, 15] {
///     max.record(score);
/// }
/// assert_eq!(max.get(), 20);
/// ```
#[derive(Debug, Default)]
pub struct MaxScore(AtomicUsize);

impl MaxScore {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Replaces the stored maximum if `score` is greater; returns the previous value.
    pub fn record(&self, score: usize) -> usize {
        self.0.fetch_max(score, Ordering::Relaxed)
    }
}
