//! Tabular action values over (vehicle, task, action).

use std::collections::HashMap;
use std::fmt;

use crate::fleet::{Task, Vehicle};
use crate::Id;

/// Whether a vehicle bids on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidAction {
    Bid,
    NoBid,
}

impl BidAction {
    /// All actions, in tie-break order.
    pub fn all() -> [BidAction; 2] {
        [BidAction::Bid, BidAction::NoBid]
    }

    pub fn index(&self) -> usize {
        match self {
            BidAction::Bid => 0,
            BidAction::NoBid => 1,
        }
    }
}

impl fmt::Display for BidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidAction::Bid => write!(f, "bid"),
            BidAction::NoBid => write!(f, "no_bid"),
        }
    }
}

/// Index of one Q-table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QKey {
    pub vehicle: usize,
    pub task: usize,
    pub action: BidAction,
}

/// Dense Q-table over the full vehicle × task × action cross product.
///
/// Vehicles and tasks are indexed by their registry position at creation
/// time; id lookups go through the stored id maps.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f64>,
    vehicle_ids: Vec<Id>,
    task_ids: Vec<Id>,
    vehicle_index: HashMap<Id, usize>,
    task_index: HashMap<Id, usize>,
}

impl QTable {
    /// A zero-initialized table for every vehicle, task, and action.
    pub fn new(vehicles: &[Vehicle], tasks: &[Task]) -> Self {
        let vehicle_ids: Vec<Id> = vehicles.iter().map(|v| v.id.clone()).collect();
        let task_ids: Vec<Id> = tasks.iter().map(|t| t.id.clone()).collect();
        let vehicle_index = index_of(&vehicle_ids);
        let task_index = index_of(&task_ids);
        Self {
            values: vec![0.0; vehicle_ids.len() * task_ids.len() * 2],
            vehicle_ids,
            task_ids,
            vehicle_index,
            task_index,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn n_vehicles(&self) -> usize {
        self.vehicle_ids.len()
    }

    pub fn n_tasks(&self) -> usize {
        self.task_ids.len()
    }

    pub fn vehicle_id(&self, vehicle: usize) -> &str {
        &self.vehicle_ids[vehicle]
    }

    pub fn task_id(&self, task: usize) -> &str {
        &self.task_ids[task]
    }

    /// Resolves ids to a key, if both are in the table.
    pub fn key(&self, vehicle_id: &str, task_id: &str, action: BidAction) -> Option<QKey> {
        Some(QKey {
            vehicle: *self.vehicle_index.get(vehicle_id)?,
            task: *self.task_index.get(task_id)?,
            action,
        })
    }

    pub fn get(&self, key: QKey) -> f64 {
        self.values[self.offset(key)]
    }

    pub fn set(&mut self, key: QKey, value: f64) {
        let offset = self.offset(key);
        self.values[offset] = value;
    }

    /// Value by ids; `None` if either id is unknown.
    pub fn value(&self, vehicle_id: &str, task_id: &str, action: BidAction) -> Option<f64> {
        self.key(vehicle_id, task_id, action).map(|k| self.get(k))
    }

    /// Sets a value by ids. Returns false if either id is unknown.
    pub fn set_value(
        &mut self,
        vehicle_id: &str,
        task_id: &str,
        action: BidAction,
        value: f64,
    ) -> bool {
        match self.key(vehicle_id, task_id, action) {
            Some(key) => {
                self.set(key, value);
                true
            }
            None => false,
        }
    }

    /// Highest action value for the pair.
    pub fn max_value(&self, vehicle: usize, task: usize) -> f64 {
        BidAction::all()
            .into_iter()
            .map(|action| {
                self.get(QKey {
                    vehicle,
                    task,
                    action,
                })
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest-valued action for the pair; ties go to [`BidAction::Bid`].
    pub fn best_action(&self, vehicle: usize, task: usize) -> BidAction {
        let bid = self.get(QKey {
            vehicle,
            task,
            action: BidAction::Bid,
        });
        let no_bid = self.get(QKey {
            vehicle,
            task,
            action: BidAction::NoBid,
        });
        if no_bid > bid {
            BidAction::NoBid
        } else {
            BidAction::Bid
        }
    }

    fn offset(&self, key: QKey) -> usize {
        (key.vehicle * self.task_ids.len() + key.task) * 2 + key.action.index()
    }
}

fn index_of(ids: &[Id]) -> HashMap<Id, usize> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect()
}
