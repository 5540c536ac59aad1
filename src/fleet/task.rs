//! Pending tasks awaiting a vehicle.

use qtty::{Minute, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::Id;

/// A pending task at a fixed location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: Id,
    pub position: Position,
    /// Ordinal urgency; higher values are more urgent.
    pub urgency: u32,
    /// On-site work time once the vehicle arrives.
    pub duration: Quantity<Minute>,
}

impl Task {
    pub fn new(id: impl Into<Id>, position: Position, urgency: u32, duration: f64) -> Self {
        Self {
            id: id.into(),
            position,
            urgency,
            duration: Quantity::new(duration),
        }
    }
}
