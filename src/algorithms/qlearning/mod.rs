//! Tabular Q-learning allocation.
//!
//! For every round a fresh [`QTable`] over (vehicle, task, bid / no-bid) is
//! trained against the round's feasible pairs, then read off task by task to
//! commit allocations. Costs use the plain engagement model; chargers are
//! ignored.
//!
//! Randomness comes from two seeded generators, one for pair sampling and
//! one for action sampling, so a policy built from the same configuration
//! reproduces the same allocations.

pub mod config;
pub mod environment;
pub mod policy;
pub mod q_table;
pub mod reward;
pub mod trainer;

pub use config::{QLearningConfig, RewardConfig};
pub use environment::{EnvEntry, QEnvironment};
pub use policy::extract_allocations;
pub use q_table::{BidAction, QKey, QTable};
pub use reward::RewardComputer;
pub use trainer::Trainer;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::{AllocationError, AllocationStrategy, ConfigError};
use crate::fleet::{Round, Task, Vehicle};
use crate::outcome::AllocationOutcome;

/// Q-learning allocation strategy.
#[derive(Debug, Clone)]
pub struct QPolicy {
    config: QLearningConfig,
    pair_rng: StdRng,
    action_rng: StdRng,
}

impl QPolicy {
    /// Builds a policy after validating `config`.
    pub fn new(config: QLearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::seeded(config))
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Trains a table for the given registries, advancing the generators.
    pub fn train(&mut self, vehicles: &[Vehicle], tasks: &[Task]) -> QTable {
        Trainer::new(&self.config, &mut self.pair_rng, &mut self.action_rng).train(vehicles, tasks)
    }

    fn seeded(config: QLearningConfig) -> Self {
        Self {
            pair_rng: StdRng::seed_from_u64(config.pair_seed),
            action_rng: StdRng::seed_from_u64(config.action_seed),
            config,
        }
    }
}

impl Default for QPolicy {
    fn default() -> Self {
        Self::seeded(QLearningConfig::default())
    }
}

impl AllocationStrategy for QPolicy {
    fn allocate(&mut self, round: &mut Round<'_>) -> Result<AllocationOutcome, AllocationError> {
        round.validate()?;
        let mut outcome = AllocationOutcome::new();

        if QEnvironment::extract(round.vehicles, round.tasks).is_empty() {
            debug!("no idle vehicle can afford any task");
            return Ok(outcome);
        }

        let table = self.train(round.vehicles, round.tasks);
        let committed = extract_allocations(&table, round.vehicles, round.tasks, &mut outcome);
        debug!(committed, "q-learning round allocated");
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "q_learning"
    }
}
