//! Bid / no-bid reward function.

use qtty::{Minute, Quantity};

use super::config::RewardConfig;
use super::q_table::BidAction;

/// Computes rewards for Q-learning updates.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward for taking `action` on a pair whose engagement costs
    /// `engagement` against a battery of `battery`.
    ///
    /// The battery is sufficient when it covers the engagement, the same rule
    /// bid feasibility uses.
    pub fn compute(
        battery: f64,
        engagement: Quantity<Minute>,
        action: BidAction,
        config: &RewardConfig,
    ) -> f64 {
        let sufficient = battery >= engagement.value();
        match (action, sufficient) {
            (BidAction::Bid, true) => config.bid_sufficient,
            (BidAction::NoBid, true) => config.no_bid_sufficient,
            (BidAction::Bid, false) => config.bid_insufficient,
            (BidAction::NoBid, false) => config.no_bid_insufficient,
        }
    }
}
