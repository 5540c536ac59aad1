//! Allocation strategies.
//!
//! Three strategies share one cost model ([`crate::engagement`]):
//!
//! - [`AuctionAllocator`] - iterative greedy auction without charging
//! - [`ChargerAwareAuction`] - the same auction with charger detours and
//!   pre-emptive charger reservation for vehicles that cannot bid
//! - [`QPolicy`] - tabular Q-learning deciding whether a vehicle should bid

pub mod auction;
pub mod error;
pub mod qlearning;


pub use auction::{AuctionAllocator, ChargerAwareAuction, ChargingConfig};
pub use error::{AllocationError, ConfigError};
pub use qlearning::{QLearningConfig, QPolicy};

use tracing::debug;

use crate::engagement::Bid;
use crate::fleet::{Round, Task, Vehicle, VehicleStatus};
use crate::outcome::{AllocationOutcome, EngagementDetail};

/// Strategy for allocating pending tasks to vehicles for one round.
///
/// Implementations mutate the round's vehicle (and, where applicable,
/// charger) registries in place and report what they committed. The driver
/// owns time advancement: decrementing remaining durations and returning
/// vehicles to idle happen outside this trait.
pub trait AllocationStrategy {
    /// Allocates tasks for a single round.
    ///
    /// # Arguments
    ///
    /// * `round` - Exclusive access to this timestep's registries
    ///
    /// # Returns
    ///
    /// The allocations and engagement details in commit order, or an error if
    /// the registries are malformed. Malformed input is rejected before any
    /// state changes.
    fn allocate(&mut self, round: &mut Round<'_>) -> Result<AllocationOutcome, AllocationError>;

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;
}

/// Commits `vehicle` to `task` at the price given by `bid`.
///
/// The battery is debited by the engagement time, the vehicle turns busy for
/// that long, and its position snaps to the task location (the traveled path
/// is not modeled).
pub(crate) fn commit(vehicle: &mut Vehicle, task: &Task, bid: &Bid) -> EngagementDetail {
    vehicle.battery -= bid.engagement_time.value();
    vehicle.status = VehicleStatus::Busy;
    vehicle.remaining_duration = bid.engagement_time;
    vehicle.position = task.position;

    debug!(
        task = %task.id,
        vehicle = %vehicle.id,
        engagement = bid.engagement_time.value(),
        battery_left = vehicle.battery,
        "committed allocation"
    );

    EngagementDetail::from_bid(bid)
}
