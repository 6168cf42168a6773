//! Weight vector operations for the evolution loop.
//!
//! - **Initialization**: [`random`] draws every weight uniformly from [`INITIAL_RANGE`]
//! - **Crossover**: [`crossover`] averages two parents component-wise and may
//!   perturb each averaged component, see [`Mutation`]
//!
//! Weights are not clamped or normalized after either step, so they can drift
//! outside the initial range over many generations.

use std::{iter, ops::RangeInclusive};

use rand::Rng;
use tetrevo_evaluator::placement_evaluator::HeuristicWeights;

/// Range of freshly generated weights.
pub const INITIAL_RANGE: RangeInclusive<f32> = -1.0..=1.0;

/// Per-component mutation applied by [`crossover`].
///
/// With probability `rate` a component receives an offset drawn uniformly from
/// `[-scale, scale]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutation {
    pub rate: f64,
    pub scale: f32,
}

impl Mutation {
    /// 10% chance per component, offsets within ±0.1.
    pub const DEFAULT: Self = Self {
        rate: 0.1,
        scale: 0.1,
    };

    /// Disables mutation; crossover becomes a plain average.
    pub const NONE: Self = Self {
        rate: 0.0,
        scale: 0.0,
    };
}

impl Default for Mutation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Generates a weight vector with each component uniform in [`INITIAL_RANGE`].
pub fn random<R>(rng: &mut R) -> HeuristicWeights
where
    R: Rng + ?Sized,
{
    HeuristicWeights::from_array(std::array::from_fn(|_| {
        rng.random_range(INITIAL_RANGE)
    }))
}

/// Produces a child from two parents.
///
/// Each component is the mean of the parents' components. Independently for
/// each component, the mutation offset is added with probability
/// `mutation.rate`.
///
/// ```
/// use tetrevo_evaluator::placement_evaluator::HeuristicWeights;
/// use tetrevo_training::weights::{self, Mutation};
///
/// let p1 = HeuristicWeights::new(1.0, 0.0, 0.5, -1.0);
/// let p2 = HeuristicWeights::new(0.0, 1.0, 0.5, 1.0);
/// let child = weights::crossover(&p1, &p2, Mutation::NONE, &mut rand::rng());
/// assert_eq!(child, HeuristicWeights::new(0.5, 0.5, 0.5, 0.0));
/// ```
pub fn crossover<R>(
    p1: &HeuristicWeights,
    p2: &HeuristicWeights,
    mutation: Mutation,
    rng: &mut R,
) -> HeuristicWeights
where
    R: Rng + ?Sized,
{
    let mut child = [0.0; HeuristicWeights::LEN];
    for (w, (x1, x2)) in iter::zip(&mut child, iter::zip(p1.to_array(), p2.to_array())) {
        *w = (x1 + x2) / 2.0;
        if rng.random_bool(mutation.rate) {
            *w += rng.random_range(INITIAL_RANGE) * mutation.scale;
        }
    }
    HeuristicWeights::from_array(child)
}
