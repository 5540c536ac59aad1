//! Iterative bid resolution.

use tracing::{debug, trace};

use crate::algorithms::commit;
use crate::fleet::{Task, Vehicle};
use crate::outcome::AllocationOutcome;

use super::bid_book::BidBook;

/// Returns true once no vehicle can take a task or no bids remain.
pub fn is_done(book: &BidBook, vehicles: &[Vehicle]) -> bool {
    book.is_empty() || !vehicles.iter().any(Vehicle::is_idle)
}

/// Resolves the book into a conflict-free set of assignments.
///
/// Repeatedly:
/// 1. Takes the best remaining bid
/// 2. Drops every bid naming its vehicle or task
/// 3. Commits it, unless the vehicle is not idle (a busy vehicle can still
///    win a task on engagement time; the task then waits for a later round)
///
/// Each pass removes at least the winning bid, so the loop ends after at most
/// `book.len()` passes and commits at most min(vehicles, tasks) times.
pub fn resolve(
    mut book: BidBook,
    vehicles: &mut [Vehicle],
    tasks: &[Task],
    outcome: &mut AllocationOutcome,
) {
    trace!(bids = book.len(), "resolving bids");
    while !is_done(&book, vehicles) {
        let Some(best) = book.best().cloned() else {
            break;
        };
        let dropped = book.claim(&best.vehicle_id, &best.task_id);
        trace!(
            task = %best.task_id,
            vehicle = %best.vehicle_id,
            dropped,
            "winning bid claimed"
        );

        let Some(vehicle) = vehicles.iter_mut().find(|v| v.id == best.vehicle_id) else {
            continue;
        };
        if !vehicle.is_idle() {
            debug!(
                task = %best.task_id,
                vehicle = %vehicle.id,
                status = %vehicle.status,
                "winner not idle, task deferred"
            );
            continue;
        }
        let Some(task) = tasks.iter().find(|t| t.id == best.task_id) else {
            continue;
        };

        outcome.record(commit(vehicle, task, &best));
    }
}
