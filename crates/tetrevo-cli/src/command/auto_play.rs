use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use serde::Serialize;
use tetrevo_engine::{Controller, GameSession, MaxScore, PieceGenerator};
use tetrevo_evaluator::{move_planner::MovePlanner, placement_evaluator::HeuristicWeights};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Weights as `lines,height,holes,bumpiness`
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 1,
        allow_hyphen_values = true,
        required_unless_present = "population_file",
        conflicts_with = "population_file"
    )]
    weights: Option<Vec<f32>>,
    /// Population file written by `evolve`
    #[arg(long)]
    population_file: Option<PathBuf>,
    /// Index of the agent to take from the population file
    #[arg(long, default_value_t = 0, requires = "population_file")]
    agent: usize,
    /// Seed of the piece sequence
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct AutoPlaySummary {
    weights: HeuristicWeights,
    score: usize,
    level: usize,
    lines: usize,
    pieces: usize,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        weights,
        population_file,
        agent,
        seed,
    } = arg;

    let weights = match (weights, population_file) {
        (Some(weights), _) => parse_weights(weights)?,
        (None, Some(path)) => util::read_population_file(path)?.agent_weights(*agent)?,
        (None, None) => anyhow::bail!("either --weights or --population-file is required"),
    };
    let generator = match seed {
        Some(seed) => PieceGenerator::from_seed(*seed),
        None => PieceGenerator::new(),
    };

    tracing::info!(%weights, "playing automatic session");
    let planner = MovePlanner::from_weights(weights);
    let mut session = GameSession::new(
        Controller::Automatic(Box::new(planner)),
        generator,
        Arc::new(MaxScore::new()),
    );
    let stats = session.run_to_completion();

    let summary = AutoPlaySummary {
        weights,
        score: stats.score(),
        level: stats.level(),
        lines: stats.total_cleared_lines(),
        pieces: stats.completed_pieces(),
    };
    Output::save_json(&summary, None)
}

fn parse_weights(values: &[f32]) -> anyhow::Result<HeuristicWeights> {
    let values = <[f32; HeuristicWeights::LEN]>::try_from(values).with_context(|| {
        format!(
            "expected {} weights, got {}",
            HeuristicWeights::LEN,
            values.len()
        )
    })?;
    Ok(HeuristicWeights::from_array(values))
}
