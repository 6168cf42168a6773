use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetrevo_evaluator::placement_evaluator::HeuristicWeights;
use tetrevo_training::genetic::{Agent, GenerationReport};

/// The last played generation of an evolution run, as saved to disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopulationSnapshot {
    pub saved_at: DateTime<Utc>,
    pub generation: usize,
    pub max_score: usize,
    pub agents: Vec<Agent>,
}

impl PopulationSnapshot {
    pub fn from_report(report: &GenerationReport) -> Self {
        Self {
            saved_at: Utc::now(),
            generation: report.generation,
            max_score: report.max_score,
            agents: report.agents.clone(),
        }
    }

    pub fn agent_weights(&self, index: usize) -> anyhow::Result<HeuristicWeights> {
        self.agents
            .get(index)
            .map(|agent| *agent.weights())
            .with_context(|| {
                format!(
                    "agent #{index} not found; population has {} agents",
                    self.agents.len()
                )
            })
    }
}
