//! Turning a trained table into allocations.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::environment::{EnvEntry, QEnvironment};
use super::q_table::{BidAction, QTable};
use crate::algorithms::auction::ordering::compare_bids;
use crate::algorithms::commit;
use crate::fleet::{Task, Vehicle};
use crate::outcome::AllocationOutcome;

/// A vehicle's standing for one task: registry index, `Q(Bid)`, and its
/// feasible pair if it has one.
type Candidate<'e> = (usize, f64, Option<&'e EnvEntry>);

/// Commits allocations read off `table`, task by task in registry order.
///
/// For each task the unclaimed vehicles are ranked by `Q(vehicle, task, Bid)`.
/// Equal values fall back to the auction's bid order (shorter engagement,
/// then higher urgency), then registry order. The task is skipped when the
/// top value is not positive, or when the top vehicle is busy or cannot
/// afford the task at the start of extraction; there is no fallback to the
/// runner-up. A committed vehicle leaves the ranking for later tasks.
///
/// Returns the number of commits.
pub fn extract_allocations(
    table: &QTable,
    vehicles: &mut [Vehicle],
    tasks: &[Task],
    outcome: &mut AllocationOutcome,
) -> usize {
    let env = QEnvironment::extract(vehicles, tasks);
    let mut claimed = vec![false; vehicles.len()];
    let mut committed = 0;

    for (ti, task) in tasks.iter().enumerate() {
        let top = vehicles
            .iter()
            .enumerate()
            .filter(|(vi, _)| !claimed[*vi])
            .filter_map(|(vi, v)| {
                table
                    .value(&v.id, &task.id, BidAction::Bid)
                    .map(|q| (vi, q, env.get(vi, ti)))
            })
            .min_by(rank);

        let Some((vi, q, entry)) = top else {
            continue;
        };
        if q <= 0.0 {
            trace!(task = %task.id, q, "no vehicle wants task");
            continue;
        }
        let Some(entry) = entry else {
            debug!(
                task = %task.id,
                vehicle = %vehicles[vi].id,
                "top vehicle busy or out of battery, task skipped"
            );
            continue;
        };

        outcome.record(commit(&mut vehicles[vi], task, &entry.bid));
        claimed[vi] = true;
        committed += 1;
    }
    committed
}

/// Higher `Q(Bid)` first, then the better bid. A vehicle without a feasible
/// pair ranks after one with.
fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| match (a.2, b.2) {
        (Some(x), Some(y)) => compare_bids(&x.bid, &y.bid),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{Position, VehicleStatus};
    use qtty::Quantity;

    fn registry() -> (Vec<Vehicle>, Vec<Task>) {
        let vehicles = vec![
            Vehicle::new("V1", Position::new(0.0, 0.0), 100.0, 10.0),
            Vehicle::new("V2", Position::new(50.0, 0.0), 100.0, 10.0),
        ];
        let tasks = vec![
            Task::new("T1", Position::new(0.0, 10.0), 3, 5.0),
            Task::new("T2", Position::new(50.0, 10.0), 2, 5.0),
        ];
        (vehicles, tasks)
    }

    #[test]
    fn dominant_table_matches_nearest_assignment() {
        let (mut vehicles, tasks) = registry();
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T1", BidAction::Bid, 1.0);
        table.set_value("V2", "T2", BidAction::Bid, 1.0);
        let mut outcome = AllocationOutcome::new();

        let n = extract_allocations(&table, &mut vehicles, &tasks, &mut outcome);

        assert_eq!(n, 2);
        assert_eq!(outcome.vehicle_for("T1"), Some("V1"));
        assert_eq!(outcome.vehicle_for("T2"), Some("V2"));
        assert_eq!(vehicles[0].battery, 94.0);
        assert_eq!(vehicles[1].status, VehicleStatus::Busy);
    }

    #[test]
    fn non_positive_values_allocate_nothing() {
        let (mut vehicles, tasks) = registry();
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T1", BidAction::Bid, -0.5);
        let mut outcome = AllocationOutcome::new();

        assert_eq!(extract_allocations(&table, &mut vehicles, &tasks, &mut outcome), 0);
        assert!(outcome.is_empty());
        assert!(vehicles.iter().all(Vehicle::is_idle));
    }

    #[test]
    fn busy_top_vehicle_blocks_task() {
        let (mut vehicles, tasks) = registry();
        vehicles[0] = vehicles[0]
            .clone()
            .occupied(VehicleStatus::Busy, Quantity::new(4.0));
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T1", BidAction::Bid, 2.0);
        table.set_value("V2", "T1", BidAction::Bid, 1.0);
        let mut outcome = AllocationOutcome::new();

        extract_allocations(&table, &mut vehicles, &tasks, &mut outcome);

        // No fallback to V2 for T1.
        assert_eq!(outcome.vehicle_for("T1"), None);
    }

    #[test]
    fn claimed_vehicle_leaves_ranking() {
        let (mut vehicles, tasks) = registry();
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T1", BidAction::Bid, 3.0);
        table.set_value("V1", "T2", BidAction::Bid, 3.0);
        table.set_value("V2", "T2", BidAction::Bid, 0.5);
        let mut outcome = AllocationOutcome::new();

        extract_allocations(&table, &mut vehicles, &tasks, &mut outcome);

        assert_eq!(outcome.vehicle_for("T1"), Some("V1"));
        assert_eq!(outcome.vehicle_for("T2"), Some("V2"));
    }

    #[test]
    fn equal_values_go_to_cheaper_bid() {
        let (mut vehicles, tasks) = registry();
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T2", BidAction::Bid, 1.0);
        table.set_value("V2", "T2", BidAction::Bid, 1.0);
        let mut outcome = AllocationOutcome::new();

        extract_allocations(&table, &mut vehicles, &tasks[1..], &mut outcome);

        // V2 sits right below T2; V1 is 50 units away.
        assert_eq!(outcome.vehicle_for("T2"), Some("V2"));
    }

    #[test]
    fn equal_values_and_bids_go_to_registry_order() {
        let (mut vehicles, _) = registry();
        let tasks = vec![Task::new("T9", Position::new(25.0, 10.0), 1, 5.0)];
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T9", BidAction::Bid, 1.0);
        table.set_value("V2", "T9", BidAction::Bid, 1.0);
        let mut outcome = AllocationOutcome::new();

        extract_allocations(&table, &mut vehicles, &tasks, &mut outcome);

        assert_eq!(outcome.vehicle_for("T9"), Some("V1"));
    }

    #[test]
    fn higher_value_beats_cheaper_bid() {
        let (mut vehicles, tasks) = registry();
        let mut table = QTable::new(&vehicles, &tasks);
        table.set_value("V1", "T2", BidAction::Bid, 2.0);
        table.set_value("V2", "T2", BidAction::Bid, 1.0);
        let mut outcome = AllocationOutcome::new();

        extract_allocations(&table, &mut vehicles, &tasks[1..], &mut outcome);

        assert_eq!(outcome.vehicle_for("T2"), Some("V1"));
    }
}
