//! Configuration for Q-learning training and reward shaping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::error::ConfigError;

/// Reward table for a bid / no-bid decision.
///
/// "Sufficient" means the vehicle's battery covers the engagement time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    /// Bidding on a pair the vehicle can afford.
    pub bid_sufficient: f64,
    /// Passing on a pair the vehicle could have afforded.
    pub no_bid_sufficient: f64,
    /// Bidding beyond the battery (overcommitment).
    pub bid_insufficient: f64,
    /// Passing on a pair the vehicle cannot afford.
    pub no_bid_insufficient: f64,
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_finite("bid_sufficient", self.bid_sufficient)?;
        ConfigError::check_finite("no_bid_sufficient", self.no_bid_sufficient)?;
        ConfigError::check_finite("bid_insufficient", self.bid_insufficient)?;
        ConfigError::check_finite("no_bid_insufficient", self.no_bid_insufficient)
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            bid_sufficient: 1.0,
            no_bid_sufficient: -1.0,
            bid_insufficient: -10.0,
            no_bid_insufficient: 0.0,
        }
    }
}

/// Configuration for [`super::QPolicy`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QLearningConfig {
    /// Number of training episodes per round.
    pub episodes: usize,
    /// Probability of exploiting (best pair / best action) rather than
    /// sampling uniformly. 1.0 is pure exploitation.
    pub epsilon: f64,
    /// Discount factor γ for the next pair's value.
    pub discount_factor: f64,
    /// Learning rate α.
    pub learning_rate: f64,
    /// Seed for state-pair sampling.
    pub pair_seed: u64,
    /// Seed for action sampling.
    pub action_seed: u64,
    pub rewards: RewardConfig,
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("epsilon", self.epsilon, 0.0, 1.0, false, "[0, 1]")?;
        ConfigError::check_range(
            "discount_factor",
            self.discount_factor,
            0.0,
            1.0,
            false,
            "[0, 1]",
        )?;
        ConfigError::check_range(
            "learning_rate",
            self.learning_rate,
            0.0,
            1.0,
            true,
            "(0, 1]",
        )?;
        self.rewards.validate()
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            epsilon: 0.3,
            discount_factor: 0.95,
            learning_rate: 0.05,
            pair_seed: 42,
            action_seed: 43,
            rewards: RewardConfig::default(),
        }
    }
}
