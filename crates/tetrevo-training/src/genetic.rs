//! Generational evolution of heuristic weights.
//!
//! # Algorithm Overview
//!
//! Each generation follows this cycle:
//!
//! 1. **Play** - Every agent drives one automatic game session; all sessions of a
//!    generation run in parallel and the loop waits for the last one to finish
//! 2. **Fitness** - An agent's fitness is the final score of its session
//! 3. **Breed** - Agent `i` is crossed with agent `(i + 1) % N`, producing `N`
//!    children that replace the population wholesale
//!
//! Pairing is positional: fitness is reported but does not influence which
//! agents are bred.
//!
//! # Determinism
//!
//! Sessions never share random state. Before a generation is played the loop
//! draws one piece-generator seed per agent from its own RNG, so a loop driven
//! by a seeded RNG reproduces the same generations regardless of how the
//! sessions are scheduled.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64Mcg;
//! use tetrevo_evaluator::placement_evaluator::HeuristicWeights;
//! use tetrevo_training::genetic::{Agent, Evolution, Population};
//!
//! let agents = vec![
//!     Agent::new(HeuristicWeights::new(0.0, -1.0, 0.0, 0.0)),
//!     Agent::new(HeuristicWeights::new(0.0, -0.5, 0.0, 0.0)),
//! ];
//! let population = Population::from_agents(agents)?;
//! let mut evolution = Evolution::new(population, Pcg64Mcg::seed_from_u64(0));
//! let report = evolution.run(Some(2)).unwrap();
//! assert_eq!(report.generation, 1);
//! assert_eq!(evolution.generation(), 2);
//! # Ok::<(), tetrevo_training::genetic::PopulationSizeError>(())
//! ```

use std::{sync::Arc, thread};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tetrevo_engine::{Controller, GameSession, MaxScore, PieceGenerator};
use tetrevo_evaluator::{move_planner::MovePlanner, placement_evaluator::HeuristicWeights};

use crate::weights::{self, Mutation};

/// A weight vector and the fitness it earned in its last session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    weights: HeuristicWeights,
    fitness: usize,
}

impl Agent {
    /// Creates an agent that has not played yet (fitness 0).
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self {
            weights,
            fitness: 0,
        }
    }

    /// Creates an agent with random weights, see [`weights::random`].
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random(rng))
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    #[must_use]
    pub fn fitness(&self) -> usize {
        self.fitness
    }

    /// Plays one automatic session with this agent's weights.
    ///
    /// Returns the final score, which is also stored as the agent's fitness.
    pub fn play_session(&mut self, generator: PieceGenerator, max_score: Arc<MaxScore>) -> usize {
        let planner = MovePlanner::from_weights(self.weights);
        let mut session =
            GameSession::new(Controller::Automatic(Box::new(planner)), generator, max_score);
        self.fitness = session.run_to_completion().score();
        self.fitness
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("population needs at least 2 agents, got {size}")]
pub struct PopulationSizeError {
    size: usize,
}

/// A fixed-size, ordered set of agents.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Smallest population that can be bred.
    pub const MIN_SIZE: usize = 2;

    pub fn from_agents(agents: Vec<Agent>) -> Result<Self, PopulationSizeError> {
        if agents.len() < Self::MIN_SIZE {
            return Err(PopulationSizeError { size: agents.len() });
        }
        Ok(Self { agents })
    }

    /// Creates `count` agents with random weights.
    pub fn random<R>(count: usize, rng: &mut R) -> Result<Self, PopulationSizeError>
    where
        R: Rng + ?Sized,
    {
        Self::from_agents((0..count).map(|_| Agent::random(rng)).collect())
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Plays one session per agent in parallel and stores the fitness values.
    ///
    /// Agent `i` draws its pieces from the `i`-th generator. Agents past the
    /// end of `generators` do not play and keep their fitness. Returns once
    /// every session has finished.
    pub fn play_sessions<I>(&mut self, generators: I, max_score: &Arc<MaxScore>)
    where
        I: IntoIterator<Item = PieceGenerator>,
    {
        thread::scope(|s| {
            for (index, (agent, generator)) in self.agents.iter_mut().zip(generators).enumerate() {
                let max_score = Arc::clone(max_score);
                s.spawn(move || {
                    let _span = tracing::debug_span!("session", agent = index).entered();
                    agent.play_session(generator, max_score);
                });
            }
        });
    }

    /// Breeds the next generation by cyclic crossover of neighbors.
    #[must_use]
    pub fn breed<R>(&self, mutation: Mutation, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let n = self.agents.len();
        let agents = (0..n)
            .map(|i| {
                let p1 = &self.agents[i];
                let p2 = &self.agents[(i + 1) % n];
                Agent::new(weights::crossover(&p1.weights, &p2.weights, mutation, rng))
            })
            .collect();
        Self { agents }
    }
}

/// Outcome of one played generation, before breeding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    /// Agents in population order with the fitness they earned.
    pub agents: Vec<Agent>,
    pub min_fitness: usize,
    pub mean_fitness: f64,
    pub max_fitness: usize,
    /// Highest score of any session so far, this generation included.
    pub max_score: usize,
}

impl GenerationReport {
    #[must_use]
    pub fn new(generation: usize, population: &Population, max_score: usize) -> Self {
        let fitness = population.agents.iter().map(Agent::fitness);
        let min_fitness = fitness.clone().min().unwrap_or(0);
        let max_fitness = fitness.clone().max().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let mean_fitness = fitness.sum::<usize>() as f64 / population.len().max(1) as f64;
        Self {
            generation,
            agents: population.agents.clone(),
            min_fitness,
            mean_fitness,
            max_fitness,
            max_score,
        }
    }

    fn log(&self) {
        for (index, agent) in self.agents.iter().enumerate() {
            tracing::info!(
                generation = self.generation,
                agent = index,
                weights = %agent.weights,
                fitness = agent.fitness,
                "agent result"
            );
        }
        tracing::info!(
            generation = self.generation,
            min = self.min_fitness,
            mean = format_args!("{:.1}", self.mean_fitness),
            max = self.max_fitness,
            max_score = self.max_score,
            "generation finished"
        );
    }
}

/// The generational loop: play, report, breed, repeat.
#[derive(Debug)]
pub struct Evolution<R> {
    population: Population,
    generation: usize,
    mutation: Mutation,
    max_score: Arc<MaxScore>,
    rng: R,
}

impl<R> Evolution<R>
where
    R: Rng,
{
    pub fn new(population: Population, rng: R) -> Self {
        Self {
            population,
            generation: 0,
            mutation: Mutation::DEFAULT,
            max_score: Arc::new(MaxScore::new()),
            rng,
        }
    }

    #[must_use]
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// The population the next call to [`Evolution::step`] will play.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of generations played so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Highest score of any session played by this loop.
    #[must_use]
    pub fn max_score(&self) -> usize {
        self.max_score.get()
    }

    /// Plays the current generation, logs its report and replaces the
    /// population with the bred children.
    pub fn step(&mut self) -> GenerationReport {
        let generators = (0..self.population.len())
            .map(|_| PieceGenerator::from_seed(self.rng.random()))
            .collect::<Vec<_>>();
        self.population.play_sessions(generators, &self.max_score);

        let report = GenerationReport::new(self.generation, &self.population, self.max_score.get());
        report.log();

        self.population = self.population.breed(self.mutation, &mut self.rng);
        self.generation += 1;
        report
    }

    /// Steps until `generations` generations have been played in total, or
    /// forever when `generations` is `None`.
    ///
    /// Returns the report of the last generation played by this call.
    pub fn run(&mut self, generations: Option<usize>) -> Option<GenerationReport> {
        let mut last = None;
        while generations.is_none_or(|limit| self.generation < limit) {
            last = Some(self.step());
        }
        last
    }
}
