//! Results of one allocation round.

use std::collections::BTreeMap;
use std::fmt;

use qtty::{Minute, Quantity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engagement::Bid;
use crate::Id;

/// Metrics record for one committed assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngagementDetail {
    pub task_id: Id,
    pub vehicle_id: Id,
    pub task_duration: Quantity<Minute>,
    pub travel_time: Quantity<Minute>,
    pub engagement_time: Quantity<Minute>,
    /// `engagement_time / task_duration`; 1.0 means no overhead at all.
    pub normalized_engagement_time: f64,
    /// Battery debited, equal to the engagement time.
    pub energy_consumed: f64,
}

impl EngagementDetail {
    /// Builds the record for a committed bid.
    ///
    /// Bids never carry a zero task duration, so the ratio is always defined.
    pub fn from_bid(bid: &Bid) -> Self {
        let engagement = bid.engagement_time.value();
        Self {
            task_id: bid.task_id.clone(),
            vehicle_id: bid.vehicle_id.clone(),
            task_duration: bid.task_duration,
            travel_time: bid.travel_time,
            engagement_time: bid.engagement_time,
            normalized_engagement_time: engagement / bid.task_duration.value(),
            energy_consumed: engagement,
        }
    }
}

/// A vehicle sent to charge instead of bidding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChargerReservation {
    pub vehicle_id: Id,
    pub charger_id: Id,
    pub travel_time: Quantity<Minute>,
    pub wait_time: Quantity<Minute>,
    /// Charge still missing on arrival; becomes the charger's available-after.
    pub charge_deficit: Quantity<Minute>,
}

/// Everything a strategy produced in one round.
///
/// `allocations` maps task id to vehicle id; unallocated tasks are absent.
/// `engagement_details` is in commit order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationOutcome {
    pub allocations: BTreeMap<Id, Id>,
    pub engagement_details: Vec<EngagementDetail>,
    pub charger_reservations: Vec<ChargerReservation>,
}

impl AllocationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed assignment.
    pub(crate) fn record(&mut self, detail: EngagementDetail) {
        self.allocations
            .insert(detail.task_id.clone(), detail.vehicle_id.clone());
        self.engagement_details.push(detail);
    }

    pub(crate) fn record_reservation(&mut self, reservation: ChargerReservation) {
        self.charger_reservations.push(reservation);
    }

    /// True if no task was allocated and no charger reserved.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty() && self.charger_reservations.is_empty()
    }

    /// Vehicle allocated to `task_id`, if any.
    pub fn vehicle_for(&self, task_id: &str) -> Option<&str> {
        self.allocations.get(task_id).map(String::as_str)
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary::from_outcome(self)
    }
}

/// Aggregate metrics over a round's engagement details.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub tasks_allocated: usize,
    pub chargers_reserved: usize,
    pub total_energy: f64,
    pub mean_travel_time: f64,
    pub mean_normalized_engagement: f64,
    pub max_normalized_engagement: f64,
}

impl RoundSummary {
    pub fn from_outcome(outcome: &AllocationOutcome) -> Self {
        let details = &outcome.engagement_details;
        let n = details.len();
        let mean = |f: fn(&EngagementDetail) -> f64| {
            if n == 0 {
                0.0
            } else {
                details.iter().map(f).sum::<f64>() / n as f64
            }
        };

        Self {
            tasks_allocated: n,
            chargers_reserved: outcome.charger_reservations.len(),
            total_energy: details.iter().map(|d| d.energy_consumed).sum(),
            mean_travel_time: mean(|d| d.travel_time.value()),
            mean_normalized_engagement: mean(|d| d.normalized_engagement_time),
            max_normalized_engagement: details
                .iter()
                .map(|d| d.normalized_engagement_time)
                .fold(0.0, f64::max),
        }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Round Summary ===")?;
        writeln!(f, "  Tasks allocated:           {}", self.tasks_allocated)?;
        writeln!(f, "  Chargers reserved:         {}", self.chargers_reserved)?;
        writeln!(f, "  Total energy consumed:     {:.2}", self.total_energy)?;
        writeln!(f, "  Mean travel time:          {:.2}", self.mean_travel_time)?;
        writeln!(
            f,
            "  Mean normalized engagement: {:.3}",
            self.mean_normalized_engagement
        )?;
        writeln!(
            f,
            "  Max normalized engagement:  {:.3}",
            self.max_normalized_engagement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(task: &str, vehicle: &str, travel: f64, duration: f64) -> Bid {
        Bid {
            vehicle_id: vehicle.into(),
            task_id: task.into(),
            engagement_time: Quantity::new(travel + duration),
            task_duration: Quantity::new(duration),
            urgency: 0,
            travel_time: Quantity::new(travel),
            charger_detour: Quantity::new(0.0),
        }
    }

    #[test]
    fn detail_normalizes_by_task_duration() {
        let d = EngagementDetail::from_bid(&bid("T1", "V1", 1.0, 5.0));
        assert!((d.normalized_engagement_time - 1.2).abs() < 1e-12);
        assert_eq!(d.energy_consumed, 6.0);
    }

    #[test]
    fn zero_travel_normalizes_to_one() {
        let d = EngagementDetail::from_bid(&bid("T1", "V1", 0.0, 5.0));
        assert_eq!(d.normalized_engagement_time, 1.0);
    }

    #[test]
    fn record_tracks_allocation_and_order() {
        let mut outcome = AllocationOutcome::new();
        assert!(outcome.is_empty());
        outcome.record(EngagementDetail::from_bid(&bid("T2", "V1", 1.0, 5.0)));
        outcome.record(EngagementDetail::from_bid(&bid("T1", "V2", 2.0, 5.0)));
        assert_eq!(outcome.vehicle_for("T2"), Some("V1"));
        assert_eq!(outcome.vehicle_for("T1"), Some("V2"));
        assert_eq!(outcome.vehicle_for("T3"), None);
        assert_eq!(outcome.engagement_details[0].task_id, "T2");
    }

    #[test]
    fn summary_of_empty_outcome_is_zero() {
        let s = AllocationOutcome::new().summary();
        assert_eq!(s.tasks_allocated, 0);
        assert_eq!(s.mean_travel_time, 0.0);
        assert_eq!(s.max_normalized_engagement, 0.0);
    }

    #[test]
    fn summary_aggregates_details() {
        let mut outcome = AllocationOutcome::new();
        outcome.record(EngagementDetail::from_bid(&bid("T1", "V1", 1.0, 5.0)));
        outcome.record(EngagementDetail::from_bid(&bid("T2", "V2", 3.0, 10.0)));
        let s = outcome.summary();
        assert_eq!(s.tasks_allocated, 2);
        assert!((s.total_energy - 19.0).abs() < 1e-12);
        assert!((s.mean_travel_time - 2.0).abs() < 1e-12);
        assert!((s.mean_normalized_engagement - 1.25).abs() < 1e-12);
        assert!((s.max_normalized_engagement - 1.3).abs() < 1e-12);
        assert!(s.to_string().contains("Tasks allocated:           2"));
    }
}
