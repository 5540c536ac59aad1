//! Charging stations.

use qtty::{Minute, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::Id;

/// A charging station.
///
/// A busy charger becomes usable once `available_after` minutes have elapsed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Charger {
    pub id: Id,
    pub position: Position,
    pub busy: bool,
    pub available_after: Quantity<Minute>,
}

impl Charger {
    /// Creates a free charger.
    pub fn new(id: impl Into<Id>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            busy: false,
            available_after: Quantity::new(0.0),
        }
    }

    /// Returns this charger busy until `available_after`.
    pub fn busy_until(mut self, available_after: f64) -> Self {
        self.busy = true;
        self.available_after = Quantity::new(available_after);
        self
    }

    /// Minutes a vehicle arriving after `arrival` minutes must wait to plug in.
    ///
    /// Arriving exactly at `available_after` counts as available.
    pub fn wait_on_arrival(&self, arrival: Quantity<Minute>) -> Quantity<Minute> {
        if !self.busy || arrival.value() >= self.available_after.value() {
            Quantity::new(0.0)
        } else {
            self.available_after - arrival
        }
    }

    /// Marks the charger busy for the next `busy_for` minutes.
    pub fn reserve(&mut self, busy_for: Quantity<Minute>) {
        self.busy = true;
        self.available_after = busy_for;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_charger_has_no_wait() {
        let c = Charger::new("C1", Position::origin());
        assert_eq!(c.wait_on_arrival(Quantity::new(0.0)).value(), 0.0);
    }

    #[test]
    fn busy_charger_waits_until_available() {
        let c = Charger::new("C1", Position::origin()).busy_until(10.0);
        assert_eq!(c.wait_on_arrival(Quantity::new(4.0)).value(), 6.0);
    }

    #[test]
    fn arrival_at_available_after_is_inclusive() {
        let c = Charger::new("C1", Position::origin()).busy_until(10.0);
        assert_eq!(c.wait_on_arrival(Quantity::new(10.0)).value(), 0.0);
    }

    #[test]
    fn late_arrival_uses_charger_immediately() {
        let c = Charger::new("C1", Position::origin()).busy_until(10.0);
        assert_eq!(c.wait_on_arrival(Quantity::new(12.5)).value(), 0.0);
    }

    #[test]
    fn reserve_marks_busy() {
        let mut c = Charger::new("C1", Position::origin());
        c.reserve(Quantity::new(42.0));
        assert!(c.busy);
        assert_eq!(c.available_after.value(), 42.0);
    }
}
