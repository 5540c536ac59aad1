//! Feasible bids for one auction round.

use crate::engagement::{Bid, EngagementModel};
use crate::fleet::{Task, Vehicle};

use super::ordering::compare_bids;

/// The set of feasible (vehicle, task) bids for one round.
///
/// Bids are kept in generation order (vehicle-major, task-minor), which is
/// the final tie-break when two bids compare equal.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    bids: Vec<Bid>,
}

impl BidBook {
    /// Prices every vehicle against every task and keeps the feasible pairs.
    pub fn collect(vehicles: &[Vehicle], tasks: &[Task], model: &EngagementModel<'_>) -> Self {
        let bids = vehicles
            .iter()
            .flat_map(move |vehicle| {
                tasks
                    .iter()
                    .filter_map(move |task| model.evaluate(vehicle, task).into_bid())
            })
            .collect();
        Self { bids }
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bid> {
        self.bids.iter()
    }

    /// The winning bid under [`compare_bids`], earliest on ties.
    pub fn best(&self) -> Option<&Bid> {
        self.bids.iter().min_by(|a, b| compare_bids(a, b))
    }

    /// Drops every bid naming `vehicle_id` or `task_id`.
    ///
    /// Returns the number of bids removed.
    pub fn claim(&mut self, vehicle_id: &str, task_id: &str) -> usize {
        let before = self.bids.len();
        self.bids
            .retain(|bid| bid.vehicle_id != vehicle_id && bid.task_id != task_id);
        before - self.bids.len()
    }

    /// True if `vehicle_id` placed at least one bid.
    pub fn has_bids_from(&self, vehicle_id: &str) -> bool {
        self.bids.iter().any(|bid| bid.vehicle_id == vehicle_id)
    }
}
