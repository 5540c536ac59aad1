//! Engagement cost model shared by every allocation strategy.
//!
//! Engagement time is the total time a vehicle is committed to a task:
//!
//! ```text
//! engagement = travel + task duration [+ remaining duration if not idle] [+ charger detour]
//! ```
//!
//! Energy consumed equals engagement time, so a pair is only feasible when the
//! vehicle's battery covers it. Infeasible pairs come back as
//! [`Engagement::Infeasible`] and never as a sentinel number.

pub mod charger;

use std::fmt;

use qtty::{Minute, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fleet::{Charger, Task, Vehicle};
use crate::Id;

pub use charger::{ChargerLocator, ChargerReach};

/// A feasible (vehicle, task) pairing for one round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bid {
    pub vehicle_id: Id,
    pub task_id: Id,
    pub engagement_time: Quantity<Minute>,
    pub task_duration: Quantity<Minute>,
    pub urgency: u32,
    /// Travel time from the vehicle to the task.
    pub travel_time: Quantity<Minute>,
    /// Travel from the task to the chosen charger (zero without chargers).
    ///
    /// Waiting at a busy charger only affects which charger is chosen.
    pub charger_detour: Quantity<Minute>,
}

/// Why a pair cannot become a bid.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    /// The battery does not cover the engagement.
    InsufficientBattery {
        required: Quantity<Minute>,
        available: f64,
    },
    /// A zero-length task has no meaningful normalized engagement.
    ZeroDuration,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::InsufficientBattery {
                required,
                available,
            } => write!(
                f,
                "needs {:.2} battery, has {:.2}",
                required.value(),
                available
            ),
            Infeasibility::ZeroDuration => write!(f, "task has zero duration"),
        }
    }
}

/// Outcome of evaluating one (vehicle, task) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Engagement {
    Feasible(Bid),
    Infeasible(Infeasibility),
}

impl Engagement {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Engagement::Feasible(_))
    }

    /// Returns the bid if the pair is feasible.
    pub fn into_bid(self) -> Option<Bid> {
        match self {
            Engagement::Feasible(bid) => Some(bid),
            Engagement::Infeasible(_) => None,
        }
    }
}

/// Prices (vehicle, task) pairs, optionally with a charger detour.
#[derive(Debug, Clone, Copy)]
pub struct EngagementModel<'c> {
    locator: Option<ChargerLocator<'c>>,
}

impl EngagementModel<'static> {
    /// Engagement without charging: travel, task, and any prior commitment.
    pub fn plain() -> Self {
        Self { locator: None }
    }
}

impl<'c> EngagementModel<'c> {
    /// Engagement that also routes the vehicle to a charger after the task.
    ///
    /// With an empty charger registry there is nowhere to detour to, and the
    /// result equals [`EngagementModel::plain`].
    pub fn charger_aware(chargers: &'c [Charger]) -> Self {
        Self {
            locator: Some(ChargerLocator::new(chargers)),
        }
    }

    /// Prices `vehicle` taking on `task`.
    pub fn evaluate(&self, vehicle: &Vehicle, task: &Task) -> Engagement {
        if task.duration.value() <= 0.0 {
            return Engagement::Infeasible(Infeasibility::ZeroDuration);
        }

        let travel_time = vehicle.travel_time_to(&task.position);
        let task_finish = vehicle.time_until_free() + travel_time + task.duration;

        let charger_detour = self
            .locator
            .and_then(|locator| locator.nearest_to_task(vehicle, task, task_finish))
            .map(|reach| reach.travel_time)
            .unwrap_or_else(|| Quantity::new(0.0));

        let engagement_time = task_finish + charger_detour;

        if !vehicle.can_afford(engagement_time) {
            return Engagement::Infeasible(Infeasibility::InsufficientBattery {
                required: engagement_time,
                available: vehicle.battery,
            });
        }

        Engagement::Feasible(Bid {
            vehicle_id: vehicle.id.clone(),
            task_id: task.id.clone(),
            engagement_time,
            task_duration: task.duration,
            urgency: task.urgency,
            travel_time,
            charger_detour,
        })
    }
}
