//! Nearest-charger search with charger availability.

use std::cmp::Ordering;

use qtty::{Minute, Quantity};

use crate::fleet::{Charger, Position, Task, Vehicle};
use crate::Id;

/// A charger as reached by a particular vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerReach {
    /// Index into the charger registry.
    pub charger_index: usize,
    pub charger_id: Id,
    pub distance: f64,
    pub travel_time: Quantity<Minute>,
    /// Time spent at the charger before it frees up.
    pub wait_time: Quantity<Minute>,
}

impl ChargerReach {
    /// Travel plus waiting: the cost of routing through this charger.
    pub fn time_until_usable(&self) -> Quantity<Minute> {
        self.travel_time + self.wait_time
    }
}

/// Finds the charger a vehicle can use soonest.
///
/// Chargers are ranked by time until usable, then distance, then id. For
/// chargers that are free on arrival this is plain nearest-by-distance, since
/// one vehicle drives to all of them at the same speed.
#[derive(Debug, Clone, Copy)]
pub struct ChargerLocator<'c> {
    chargers: &'c [Charger],
}

impl<'c> ChargerLocator<'c> {
    pub fn new(chargers: &'c [Charger]) -> Self {
        Self { chargers }
    }

    /// Nearest usable charger to the vehicle's current position.
    ///
    /// The vehicle leaves once its current engagement (if any) ends.
    pub fn nearest_to_vehicle(&self, vehicle: &Vehicle) -> Option<ChargerReach> {
        self.reaches(vehicle, &vehicle.position, vehicle.time_until_free())
            .min_by(compare_reach)
    }

    /// Like [`nearest_to_vehicle`](Self::nearest_to_vehicle), restricted to
    /// chargers whose travel time the vehicle's battery strictly exceeds.
    pub fn nearest_reachable(&self, vehicle: &Vehicle) -> Option<ChargerReach> {
        self.reaches(vehicle, &vehicle.position, vehicle.time_until_free())
            .filter(|reach| vehicle.battery > reach.travel_time.value())
            .min_by(compare_reach)
    }

    /// Nearest usable charger to the task's position, leaving once the task
    /// finishes `task_finish` minutes from now.
    pub fn nearest_to_task(
        &self,
        vehicle: &Vehicle,
        task: &Task,
        task_finish: Quantity<Minute>,
    ) -> Option<ChargerReach> {
        self.nearest_from(vehicle, &task.position, task_finish)
    }

    /// Nearest usable charger from `origin`, departing `departure` minutes
    /// from now at the vehicle's speed.
    pub fn nearest_from(
        &self,
        vehicle: &Vehicle,
        origin: &Position,
        departure: Quantity<Minute>,
    ) -> Option<ChargerReach> {
        self.reaches(vehicle, origin, departure)
            .min_by(compare_reach)
    }

    fn reaches<'s>(
        &'s self,
        vehicle: &'s Vehicle,
        origin: &'s Position,
        departure: Quantity<Minute>,
    ) -> impl Iterator<Item = ChargerReach> + 's {
        let chargers: &'s [Charger] = self.chargers;
        chargers
            .iter()
            .enumerate()
            .map(move |(charger_index, charger)| {
                let distance = origin.distance_to(&charger.position);
                let travel_time = vehicle.travel_time_between(origin, &charger.position);
                let wait_time = charger.wait_on_arrival(departure + travel_time);
                ChargerReach {
                    charger_index,
                    charger_id: charger.id.clone(),
                    distance,
                    travel_time,
                    wait_time,
                }
            })
    }
}

fn compare_reach(a: &ChargerReach, b: &ChargerReach) -> Ordering {
    a.time_until_usable()
        .value()
        .total_cmp(&b.time_until_usable().value())
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.charger_id.cmp(&b.charger_id))
}
