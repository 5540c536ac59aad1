//! Bid comparison.

use std::cmp::Ordering;

use crate::engagement::Bid;

/// Orders bids best-first: shorter engagement, then higher urgency.
///
/// Remaining ties are left `Equal`; callers keep the earliest bid in book
/// order (vehicle registry order, then task order).
pub fn compare_bids(a: &Bid, b: &Bid) -> Ordering {
    a.engagement_time
        .value()
        .total_cmp(&b.engagement_time.value())
        .then_with(|| b.urgency.cmp(&a.urgency))
}
