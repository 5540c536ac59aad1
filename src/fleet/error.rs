use thiserror::Error;

use crate::Id;

/// Which registry a malformed record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Vehicle,
    Task,
    Charger,
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Vehicle => write!(f, "vehicle"),
            RegistryKind::Task => write!(f, "task"),
            RegistryKind::Charger => write!(f, "charger"),
        }
    }
}

/// Malformed registry input, rejected before any state is mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FleetError {
    #[error("{kind} at index {index} has an empty id")]
    EmptyId { kind: RegistryKind, index: usize },

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: RegistryKind, id: Id },

    #[error("{kind} {id} has a non-finite position")]
    InvalidPosition { kind: RegistryKind, id: Id },

    #[error("{kind} {id} has invalid {field}: {value}")]
    InvalidField {
        kind: RegistryKind,
        id: Id,
        field: &'static str,
        value: f64,
    },
}
