//! Fleet registries: vehicles, tasks, and chargers for one round.
//!
//! The driver owns these registries across timesteps. An allocation call
//! borrows them through a [`Round`] for exactly one round, which rules out
//! aliasing between concurrent rounds.

pub mod charger;
pub mod error;
pub mod position;
pub mod task;
pub mod vehicle;

use std::collections::HashSet;

pub use charger::Charger;
pub use error::{FleetError, RegistryKind};
pub use position::Position;
pub use task::Task;
pub use vehicle::{Vehicle, VehicleStatus};

/// Exclusive access to one timestep's registries.
#[derive(Debug)]
pub struct Round<'a> {
    pub vehicles: &'a mut [Vehicle],
    pub tasks: &'a [Task],
    pub chargers: &'a mut [Charger],
}

impl<'a> Round<'a> {
    /// A round with no charging infrastructure.
    pub fn new(vehicles: &'a mut [Vehicle], tasks: &'a [Task]) -> Self {
        Self {
            vehicles,
            tasks,
            chargers: &mut [],
        }
    }

    pub fn with_chargers(
        vehicles: &'a mut [Vehicle],
        tasks: &'a [Task],
        chargers: &'a mut [Charger],
    ) -> Self {
        Self {
            vehicles,
            tasks,
            chargers,
        }
    }

    /// Checks every registry for malformed records.
    pub fn validate(&self) -> Result<(), FleetError> {
        validate(self.vehicles, self.tasks, self.chargers)
    }
}

/// Rejects malformed registries before any state is mutated.
///
/// Ids must be non-empty and unique per registry, positions finite, battery
/// and times finite and non-negative, and speeds finite and positive.
pub fn validate(
    vehicles: &[Vehicle],
    tasks: &[Task],
    chargers: &[Charger],
) -> Result<(), FleetError> {
    check_ids(RegistryKind::Vehicle, vehicles.iter().map(|v| v.id.as_str()))?;
    check_ids(RegistryKind::Task, tasks.iter().map(|t| t.id.as_str()))?;
    check_ids(RegistryKind::Charger, chargers.iter().map(|c| c.id.as_str()))?;

    for v in vehicles {
        let kind = RegistryKind::Vehicle;
        check_position(kind, &v.id, &v.position)?;
        check_non_negative(kind, &v.id, "battery", v.battery)?;
        if !(v.speed.is_finite() && v.speed > 0.0) {
            return Err(invalid(kind, &v.id, "speed", v.speed));
        }
        check_non_negative(kind, &v.id, "remaining_duration", v.remaining_duration.value())?;
    }

    for t in tasks {
        let kind = RegistryKind::Task;
        check_position(kind, &t.id, &t.position)?;
        check_non_negative(kind, &t.id, "duration", t.duration.value())?;
    }

    for c in chargers {
        let kind = RegistryKind::Charger;
        check_position(kind, &c.id, &c.position)?;
        check_non_negative(kind, &c.id, "available_after", c.available_after.value())?;
    }

    Ok(())
}

fn check_ids<'a>(
    kind: RegistryKind,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), FleetError> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if id.is_empty() {
            return Err(FleetError::EmptyId { kind, index });
        }
        if !seen.insert(id) {
            return Err(FleetError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_position(kind: RegistryKind, id: &str, position: &Position) -> Result<(), FleetError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(FleetError::InvalidPosition {
            kind,
            id: id.to_string(),
        })
    }
}

fn check_non_negative(
    kind: RegistryKind,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), FleetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(kind, id, field, value))
    }
}

fn invalid(kind: RegistryKind, id: &str, field: &'static str, value: f64) -> FleetError {
    FleetError::InvalidField {
        kind,
        id: id.to_string(),
        field,
        value,
    }
}
