//! Training environment: the feasible (vehicle, task) pairs of a round.

use std::cmp::Ordering;

use crate::algorithms::auction::ordering::compare_bids;
use crate::engagement::{Bid, EngagementModel};
use crate::fleet::{Task, Vehicle};

/// One state pair: an idle vehicle and a task it can afford.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEntry {
    /// Registry index of the vehicle.
    pub vehicle: usize,
    /// Registry index of the task.
    pub task: usize,
    pub bid: Bid,
    /// Vehicle battery when the environment was built.
    pub battery: f64,
}

/// The set of state pairs still open in an episode.
///
/// Built fresh at the start of every episode and shrunk as pairs are
/// consumed: once a pair is acted on, every entry sharing its vehicle or its
/// task leaves the environment.
#[derive(Debug, Clone, Default)]
pub struct QEnvironment {
    entries: Vec<EnvEntry>,
}

impl QEnvironment {
    /// Collects every idle, feasible pair in registry order.
    ///
    /// Costs come from the plain engagement model (no charger detours).
    pub fn extract(vehicles: &[Vehicle], tasks: &[Task]) -> Self {
        let model = EngagementModel::plain();
        let mut entries = Vec::new();
        for (vi, vehicle) in vehicles.iter().enumerate() {
            if !vehicle.is_idle() {
                continue;
            }
            for (ti, task) in tasks.iter().enumerate() {
                if let Some(bid) = model.evaluate(vehicle, task).into_bid() {
                    entries.push(EnvEntry {
                        vehicle: vi,
                        task: ti,
                        bid,
                        battery: vehicle.battery,
                    });
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    pub fn get(&self, vehicle: usize, task: usize) -> Option<&EnvEntry> {
        self.entries
            .iter()
            .find(|e| e.vehicle == vehicle && e.task == task)
    }

    /// The pair with the lowest engagement, ties broken by higher urgency and
    /// then registry order.
    pub fn best_pair(&self) -> Option<&EnvEntry> {
        self.entries.iter().min_by(|a, b| match compare_bids(&a.bid, &b.bid) {
            Ordering::Equal => (a.vehicle, a.task).cmp(&(b.vehicle, b.task)),
            other => other,
        })
    }

    /// Removes every entry sharing `vehicle` or `task`.
    pub fn remove_touching(&mut self, vehicle: usize, task: usize) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.vehicle != vehicle && e.task != task);
        before - self.entries.len()
    }
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
            Vehicle::new("V3", Position::new(0.0, 0.0), 2.0, 10.0),
        ];
        let tasks = vec![
            Task::new("T1", Position::new(0.0, 10.0), 3, 5.0),
            Task::new("T2", Position::new(50.0, 10.0), 2, 5.0),
        ];
        (vehicles, tasks)
    }

    #[test]
    fn extract_keeps_idle_feasible_pairs() {
        let (vehicles, tasks) = registry();
        let env = QEnvironment::extract(&vehicles, &tasks);
        // V3 cannot afford anything.
        assert_eq!(env.len(), 4);
        assert!(env.entries().iter().all(|e| e.vehicle != 2));
        let entry = env.get(1, 1).map(|e| e.bid.engagement_time.value());
        assert_eq!(entry, Some(6.0));
    }

    #[test]
    fn extract_skips_busy_vehicles() {
        let (mut vehicles, tasks) = registry();
        vehicles[0] = vehicles[0]
            .clone()
            .occupied(VehicleStatus::Busy, Quantity::new(3.0));
        let env = QEnvironment::extract(&vehicles, &tasks);
        assert!(env.entries().iter().all(|e| e.vehicle == 1));
    }

    #[test]
    fn best_pair_prefers_lower_engagement_then_urgency() {
        let (vehicles, tasks) = registry();
        let env = QEnvironment::extract(&vehicles, &tasks);
        // V1-T1 and V2-T2 both cost 6; T1 is more urgent.
        let best = env.best_pair().map(|e| (e.vehicle, e.task));
        assert_eq!(best, Some((0, 0)));
    }

    #[test]
    fn remove_touching_drops_vehicle_and_task_rows() {
        let (vehicles, tasks) = registry();
        let mut env = QEnvironment::extract(&vehicles, &tasks);
        let removed = env.remove_touching(0, 0);
        assert_eq!(removed, 3);
        assert_eq!(env.len(), 1);
        assert!(env.get(1, 1).is_some());
    }

    #[test]
    fn empty_registries_give_empty_environment() {
        let env = QEnvironment::extract(&[], &[]);
        assert!(env.is_empty());
        assert!(env.best_pair().is_none());
    }
}
