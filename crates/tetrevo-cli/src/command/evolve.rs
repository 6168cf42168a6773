use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use tetrevo_training::genetic::{Evolution, Population};

use crate::{model::population::PopulationSnapshot, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Number of agents per generation
    #[arg(long, default_value_t = 3)]
    population: usize,
    /// Stop after this many generations; runs indefinitely when omitted
    #[arg(long)]
    generations: Option<usize>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the final population (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let EvolveArg {
        population,
        generations,
        seed,
        output,
    } = arg;

    let mut rng = match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(*seed),
        None => Pcg64Mcg::from_os_rng(),
    };
    let population = Population::random(*population, &mut rng)?;
    tracing::info!(
        population = population.len(),
        generations = *generations,
        seed = *seed,
        "starting evolution"
    );

    let mut evolution = Evolution::new(population, rng);
    let Some(report) = evolution.run(*generations) else {
        tracing::warn!("no generation was played");
        return Ok(());
    };

    let snapshot = PopulationSnapshot::from_report(&report);
    Output::save_json(&snapshot, output.clone())?;
    tracing::info!(
        generation = snapshot.generation,
        max_score = snapshot.max_score,
        "population saved"
    );
    Ok(())
}
