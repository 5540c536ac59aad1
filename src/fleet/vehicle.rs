//! Vehicles: mobile agents with a finite battery.

use std::fmt;

use qtty::{Minute, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::Id;

/// What a vehicle is doing at the start of a round.
///
/// Exactly one status holds at any time. Only [`VehicleStatus::Idle`] vehicles
/// can be committed to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleStatus {
    #[default]
    Idle,
    Busy,
    Charging,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Idle => write!(f, "idle"),
            VehicleStatus::Busy => write!(f, "busy"),
            VehicleStatus::Charging => write!(f, "charging"),
        }
    }
}

/// A vehicle snapshot as supplied by the driver for one round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// Unique identifier within the vehicle registry.
    pub id: Id,
    /// Current position.
    pub position: Position,
    /// Battery level in percent. One percent powers one minute of engagement.
    pub battery: f64,
    /// Distance units covered per minute.
    pub speed: f64,
    pub status: VehicleStatus,
    /// Minutes left on the current engagement or charge (zero when idle).
    pub remaining_duration: Quantity<Minute>,
}

impl Vehicle {
    /// Creates an idle vehicle.
    pub fn new(id: impl Into<Id>, position: Position, battery: f64, speed: f64) -> Self {
        Self {
            id: id.into(),
            position,
            battery,
            speed,
            status: VehicleStatus::Idle,
            remaining_duration: Quantity::new(0.0),
        }
    }

    /// Returns this vehicle occupied with `status` for `remaining` more minutes.
    pub fn occupied(mut self, status: VehicleStatus, remaining: Quantity<Minute>) -> Self {
        self.status = status;
        self.remaining_duration = remaining;
        self
    }

    pub fn is_idle(&self) -> bool {
        self.status == VehicleStatus::Idle
    }

    /// Busy in the broad sense: engaged on a task or charging.
    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    /// Time before the vehicle can start something new.
    pub fn time_until_free(&self) -> Quantity<Minute> {
        if self.is_idle() {
            Quantity::new(0.0)
        } else {
            self.remaining_duration
        }
    }

    /// Travel time from the current position to `target`.
    pub fn travel_time_to(&self, target: &Position) -> Quantity<Minute> {
        self.travel_time_between(&self.position, target)
    }

    /// Travel time between two arbitrary points at this vehicle's speed.
    pub fn travel_time_between(&self, from: &Position, to: &Position) -> Quantity<Minute> {
        Quantity::new(from.distance_to(to) / self.speed)
    }

    /// Returns true if the battery covers `required` minutes of engagement.
    pub fn can_afford(&self, required: Quantity<Minute>) -> bool {
        self.battery >= required.value()
    }
}
