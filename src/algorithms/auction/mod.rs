//! Greedy iterative auction.
//!
//! Every vehicle bids on every pending task it can afford; bids are then
//! resolved greedily into a conflict-free matching:
//!
//! 1. **Bid collection**: each (vehicle, task) pair is priced by the
//!    [`EngagementModel`]; infeasible pairs are dropped.
//! 2. **Resolution**: the bid with the shortest engagement (highest urgency
//!    on ties) wins, every other bid on its vehicle or task is removed, and
//!    the winner is committed if the vehicle is idle. This repeats until no
//!    vehicle is idle or no bids remain.
//!
//! The charger-aware variant prices each bid with a detour to the charger
//! nearest the task, and sends idle vehicles that could not bid at all to
//! reserve a charger instead.
//!
//! # Module Structure
//!
//! - [`bid_book`] - Feasible bids for the round
//! - [`ordering`] - Bid comparison
//! - [`engine`] - Resolution loop
//! - [`reservation`] - Charger reservation side effect

pub mod bid_book;
pub mod engine;
pub mod ordering;
pub mod reservation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engagement::EngagementModel;
use crate::fleet::Round;
use crate::outcome::AllocationOutcome;

use super::error::{AllocationError, ConfigError};
use super::AllocationStrategy;

pub use bid_book::BidBook;
use engine::resolve;
use reservation::reserve_chargers;

/// Auction without charging.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuctionAllocator;

impl AuctionAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationStrategy for AuctionAllocator {
    fn allocate(&mut self, round: &mut Round<'_>) -> Result<AllocationOutcome, AllocationError> {
        round.validate()?;

        let mut outcome = AllocationOutcome::new();
        let book = BidBook::collect(round.vehicles, round.tasks, &EngagementModel::plain());
        if book.is_empty() {
            return Ok(outcome);
        }

        resolve(book, round.vehicles, round.tasks, &mut outcome);
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "auction"
    }
}

/// Charging parameters for the charger-aware auction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChargingConfig {
    /// Battery level of a fully charged vehicle.
    pub full_charge: f64,
}

impl ChargingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_finite("full_charge", self.full_charge)?;
        ConfigError::check_range(
            "full_charge",
            self.full_charge,
            0.0,
            f64::MAX,
            true,
            "(0, inf)",
        )
    }
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self { full_charge: 100.0 }
    }
}

/// Auction with charger detours and pre-emptive charger reservation.
#[derive(Debug, Clone, Default)]
pub struct ChargerAwareAuction {
    config: ChargingConfig,
}

impl ChargerAwareAuction {
    /// Creates the strategy, rejecting an invalid configuration.
    pub fn new(config: ChargingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChargingConfig {
        &self.config
    }
}

impl AllocationStrategy for ChargerAwareAuction {
    fn allocate(&mut self, round: &mut Round<'_>) -> Result<AllocationOutcome, AllocationError> {
        round.validate()?;

        let mut outcome = AllocationOutcome::new();
        let book = BidBook::collect(
            round.vehicles,
            round.tasks,
            &EngagementModel::charger_aware(round.chargers),
        );

        reserve_chargers(
            &book,
            round.vehicles,
            round.chargers,
            &self.config,
            &mut outcome,
        );

        if book.is_empty() {
            return Ok(outcome);
        }

        resolve(book, round.vehicles, round.tasks, &mut outcome);
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "charger_aware_auction"
    }
}
