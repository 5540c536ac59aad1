//! fleetbid - battery-aware task allocation for vehicle fleets
//!
//! Allocates pending tasks to vehicles one round at a time. Three strategies
//! share a single engagement cost model:
//!
//! - a greedy iterative auction
//! - the same auction with charger detours and charger reservation
//! - a tabular Q-learning policy that learns whether a vehicle should bid
//!
//! The caller owns the vehicle, task and charger registries across rounds and
//! lends them to a strategy through a [`Round`]; the strategy mutates them in
//! place and reports what it did in an [`AllocationOutcome`].

pub mod algorithms;
pub mod engagement;
pub mod fleet;
pub mod outcome;

pub use algorithms::{
    AllocationError, AllocationStrategy, AuctionAllocator, ChargerAwareAuction, ChargingConfig,
    ConfigError, QLearningConfig, QPolicy,
};
pub use engagement::{Bid, Engagement, EngagementModel, Infeasibility};
pub use fleet::{Charger, FleetError, Position, Round, Task, Vehicle, VehicleStatus};
pub use outcome::{AllocationOutcome, ChargerReservation, EngagementDetail, RoundSummary};

/// Identifier type used for vehicles, tasks, and chargers.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
