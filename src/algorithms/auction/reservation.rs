//! Pre-emptive charger reservation for vehicles that cannot bid.

use qtty::{Minute, Quantity};
use tracing::debug;

use crate::engagement::ChargerLocator;
use crate::fleet::{Charger, Vehicle, VehicleStatus};
use crate::outcome::{AllocationOutcome, ChargerReservation};

use super::bid_book::BidBook;
use super::ChargingConfig;

/// Sends idle vehicles without a single feasible bid to a charger.
///
/// Only chargers whose travel time the vehicle's battery strictly exceeds are
/// considered; among those the one usable soonest is taken. The charge deficit
/// is what the vehicle still lacks on arrival, and a vehicle with no deficit
/// stays put. The charger turns busy until the current occupant (if any) has
/// left and the deficit is charged; the vehicle moves onto the charger and is
/// marked charging for the travel and wait time. Battery is not debited.
///
/// Vehicles are handled in registry order, so later vehicles see chargers
/// reserved by earlier ones.
pub fn reserve_chargers(
    book: &BidBook,
    vehicles: &mut [Vehicle],
    chargers: &mut [Charger],
    config: &ChargingConfig,
    outcome: &mut AllocationOutcome,
) {
    for vehicle in vehicles.iter_mut() {
        if !vehicle.is_idle() || book.has_bids_from(&vehicle.id) {
            continue;
        }
        let Some(reach) = ChargerLocator::new(chargers).nearest_reachable(vehicle) else {
            continue;
        };

        let deficit: Quantity<Minute> = Quantity::new(
            (config.full_charge - vehicle.battery - reach.travel_time.value()).max(0.0),
        );
        if deficit.value() <= 0.0 {
            continue;
        }
        let charger = &mut chargers[reach.charger_index];
        charger.reserve(reach.wait_time + deficit);

        vehicle.status = VehicleStatus::Charging;
        vehicle.remaining_duration = reach.time_until_usable();
        vehicle.position = charger.position;

        debug!(
            vehicle = %vehicle.id,
            charger = %charger.id,
            deficit = deficit.value(),
            "charger reserved"
        );

        outcome.record_reservation(ChargerReservation {
            vehicle_id: vehicle.id.clone(),
            charger_id: charger.id.clone(),
            travel_time: reach.travel_time,
            wait_time: reach.wait_time,
            charge_deficit: deficit,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::EngagementModel;
    use crate::fleet::{Position, Task};

    fn stranded() -> Vehicle {
        Vehicle::new("V2", Position::new(50.0, 50.0), 5.0, 10.0)
    }

    fn reserve(vehicles: &mut [Vehicle], chargers: &mut [Charger]) -> AllocationOutcome {
        let tasks = vec![Task::new("T1", Position::new(0.0, 10.0), 3, 5.0)];
        let book = BidBook::collect(vehicles, &tasks, &EngagementModel::charger_aware(chargers));
        let mut outcome = AllocationOutcome::new();
        reserve_chargers(
            &book,
            vehicles,
            chargers,
            &ChargingConfig::default(),
            &mut outcome,
        );
        outcome
    }

    #[test]
    fn stranded_vehicle_reserves_nearest_charger() {
        let mut vehicles = vec![stranded()];
        let mut chargers = vec![
            Charger::new("C1", Position::new(50.0, 60.0)),
            Charger::new("C2", Position::new(0.0, 0.0)),
        ];
        let outcome = reserve(&mut vehicles, &mut chargers);

        assert_eq!(outcome.charger_reservations.len(), 1);
        let r = &outcome.charger_reservations[0];
        assert_eq!(r.charger_id, "C1");
        assert!((r.travel_time.value() - 1.0).abs() < 1e-12);
        // 100 - 5 - 1
        assert!((r.charge_deficit.value() - 94.0).abs() < 1e-12);

        assert!(chargers[0].busy);
        assert!((chargers[0].available_after.value() - 94.0).abs() < 1e-12);
        assert!(!chargers[1].busy);

        assert_eq!(vehicles[0].status, VehicleStatus::Charging);
        assert_eq!(vehicles[0].position, Position::new(50.0, 60.0));
        assert_eq!(vehicles[0].battery, 5.0);
        assert!((vehicles[0].remaining_duration.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn vehicle_with_bids_does_not_reserve() {
        let mut vehicles = vec![Vehicle::new("V1", Position::new(0.0, 0.0), 100.0, 10.0)];
        let mut chargers = vec![Charger::new("C1", Position::new(0.0, 20.0))];
        let outcome = reserve(&mut vehicles, &mut chargers);
        assert!(outcome.charger_reservations.is_empty());
        assert!(!chargers[0].busy);
    }

    #[test]
    fn charger_out_of_reach_is_not_reserved() {
        let mut vehicles = vec![stranded()];
        let mut chargers = vec![Charger::new("C1", Position::new(50.0, 100.0))];
        let outcome = reserve(&mut vehicles, &mut chargers);
        assert!(outcome.charger_reservations.is_empty());
        assert!(vehicles[0].is_idle());
    }

    #[test]
    fn reachable_busy_charger_beats_unreachable_free_one() {
        let mut vehicles = vec![Vehicle::new("V2", Position::new(0.0, 0.0), 5.0, 1.0)];
        let mut chargers = vec![
            Charger::new("C1", Position::new(3.0, 0.0)).busy_until(100.0),
            Charger::new("C2", Position::new(20.0, 0.0)),
        ];
        let outcome = reserve(&mut vehicles, &mut chargers);

        assert_eq!(outcome.charger_reservations.len(), 1);
        let r = &outcome.charger_reservations[0];
        assert_eq!(r.charger_id, "C1");
        assert!((r.wait_time.value() - 97.0).abs() < 1e-12);
        // 100 - 5 - 3
        assert!((r.charge_deficit.value() - 92.0).abs() < 1e-12);

        // busy until the previous occupant leaves, then charging
        assert!((chargers[0].available_after.value() - (97.0 + 92.0)).abs() < 1e-12);
        assert!(!chargers[1].busy);
        assert_eq!(vehicles[0].status, VehicleStatus::Charging);
        assert!((vehicles[0].remaining_duration.value() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn full_battery_without_tasks_does_not_reserve() {
        let mut vehicles = vec![Vehicle::new("V1", Position::new(0.0, 0.0), 100.0, 10.0)];
        let mut chargers = vec![Charger::new("C1", Position::new(0.0, 20.0))];
        let book = BidBook::collect(&vehicles, &[], &EngagementModel::charger_aware(&chargers));
        let mut outcome = AllocationOutcome::new();
        reserve_chargers(
            &book,
            &mut vehicles,
            &mut chargers,
            &ChargingConfig::default(),
            &mut outcome,
        );

        assert!(outcome.charger_reservations.is_empty());
        assert!(!chargers[0].busy);
        assert!(vehicles[0].is_idle());
    }

    #[test]
    fn second_vehicle_sees_first_reservation() {
        let mut vehicles = vec![
            stranded(),
            Vehicle::new("V3", Position::new(50.0, 50.0), 5.0, 10.0),
        ];
        let mut chargers = vec![
            Charger::new("C1", Position::new(50.0, 60.0)),
            Charger::new("C2", Position::new(50.0, 80.0)),
        ];
        let outcome = reserve(&mut vehicles, &mut chargers);
        let ids: Vec<_> = outcome
            .charger_reservations
            .iter()
            .map(|r| r.charger_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C1", "C2"]);
    }

    #[test]
    fn busy_vehicle_never_reserves() {
        let mut vehicles =
            vec![stranded().occupied(VehicleStatus::Busy, Quantity::new(3.0))];
        let mut chargers = vec![Charger::new("C1", Position::new(50.0, 60.0))];
        let outcome = reserve(&mut vehicles, &mut chargers);
        assert!(outcome.charger_reservations.is_empty());
    }
}
