//! In-process equivalents of the gateway's "current subscription" and
//! "recent invoices" lookups.

use crate::models::{Invoice, Subscription};
use std::cmp::{Ordering, Reverse};

/// The subscription in a current status with the soonest renewal date.
///
/// Rows whose renewal date does not parse rank after every dated row.
pub fn select_current_subscription(subscriptions: &[Subscription]) -> Option<&Subscription> {
    subscriptions
        .iter()
        .filter(|sub| sub.status.is_current())
        .min_by(|a, b| earliest_first(a.renewal_date(), b.renewal_date()))
}

/// Up to `limit` invoices, latest `period_end` first.
pub fn select_recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<Invoice> {
    let mut sorted: Vec<&Invoice> = invoices.iter().collect();
    sorted.sort_by(|a, b| {
        earliest_first(
            a.period_end_date().map(Reverse),
            b.period_end_date().map(Reverse),
        )
    });
    sorted.into_iter().take(limit).cloned().collect()
}

fn earliest_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
