//! Episodic Q-learning over a round's state pairs.
//!
//! Each episode rebuilds the environment, picks a random seed step, and then
//! walks the environment until it is empty:
//!
//! 1. choose the next (pair, action), exploiting with probability ε
//! 2. compute the reward of that choice
//! 3. credit it to the *previous* step's Q entry with a TD(0) update
//! 4. drop every pair sharing the previous step's vehicle or task
//!
//! The reward of a step is therefore credited to its predecessor. This delayed
//! credit is part of the learned values and is kept as-is.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, debug_span, trace};

use super::config::QLearningConfig;
use super::environment::QEnvironment;
use super::q_table::{BidAction, QKey, QTable};
use super::reward::RewardComputer;
use crate::fleet::{Task, Vehicle};
use crate::generate_id;

/// Runs training episodes against one round's registries.
pub struct Trainer<'a> {
    config: &'a QLearningConfig,
    pair_rng: &'a mut StdRng,
    action_rng: &'a mut StdRng,
}

impl<'a> Trainer<'a> {
    pub fn new(
        config: &'a QLearningConfig,
        pair_rng: &'a mut StdRng,
        action_rng: &'a mut StdRng,
    ) -> Self {
        Self {
            config,
            pair_rng,
            action_rng,
        }
    }

    /// Trains a fresh table over the full vehicle × task cross product.
    ///
    /// Registries are read, never mutated.
    pub fn train(&mut self, vehicles: &[Vehicle], tasks: &[Task]) -> QTable {
        let mut table = QTable::new(vehicles, tasks);
        let run_id = generate_id();
        let span = debug_span!("q_training", run_id = %run_id, episodes = self.config.episodes);
        let _guard = span.enter();

        for episode in 0..self.config.episodes {
            let mut env = QEnvironment::extract(vehicles, tasks);
            // Seed step is always explored.
            let Some(mut prev) = self.choose(&env, &table, 0.0) else {
                debug!("no feasible pairs, training skipped");
                break;
            };
            let mut updates = 0usize;

            while !env.is_empty() {
                let Some(next) = self.choose(&env, &table, self.config.epsilon) else {
                    break;
                };
                let reward = env
                    .get(next.vehicle, next.task)
                    .map(|e| {
                        RewardComputer::compute(
                            e.battery,
                            e.bid.engagement_time,
                            next.action,
                            &self.config.rewards,
                        )
                    })
                    .unwrap_or(0.0);

                self.update(&mut table, prev, reward, next);
                env.remove_touching(prev.vehicle, prev.task);
                prev = next;
                updates += 1;
            }
            trace!(episode, updates, "episode finished");
        }
        table
    }

    /// TD(0) update of `prev` towards `reward + γ · max_a Q(next pair, a)`.
    fn update(&self, table: &mut QTable, prev: QKey, reward: f64, next: QKey) {
        let old = table.get(prev);
        let future = table.max_value(next.vehicle, next.task);
        let target = reward + self.config.discount_factor * future;
        let value = old + self.config.learning_rate * (target - old);
        table.set(prev, value);
        trace!(
            vehicle = table.vehicle_id(prev.vehicle),
            task = table.task_id(prev.task),
            action = %prev.action,
            reward,
            old,
            value,
            "q update"
        );
    }

    /// Chooses a pair and an action, each exploiting with probability
    /// `exploit`.
    fn choose(&mut self, env: &QEnvironment, table: &QTable, exploit: f64) -> Option<QKey> {
        let entry = if self.pair_rng.gen::<f64>() < exploit {
            env.best_pair()?
        } else {
            let entries = env.entries();
            if entries.is_empty() {
                return None;
            }
            &entries[self.pair_rng.gen_range(0..entries.len())]
        };

        let action = if self.action_rng.gen::<f64>() < exploit {
            table.best_action(entry.vehicle, entry.task)
        } else {
            BidAction::all()[self.action_rng.gen_range(0..2)]
        };

        Some(QKey {
            vehicle: entry.vehicle,
            task: entry.task,
            action,
        })
    }
}
