//! Dashboard statistics over one subscription and a bounded list of invoices.

use super::format::format_medium_date;
use crate::models::{Invoice, InvoiceStatus, Subscription};
use chrono::{Days, NaiveDate};
use serde::Serialize;

pub const DEFAULT_RECENT_PAID_WINDOW_DAYS: u32 = 30;

/// Derived dashboard statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub open_invoice_count: usize,
    pub recently_paid_count: usize,
    /// Length of the fetched window, not the client's lifetime total.
    pub total_invoice_count: usize,
    pub next_renewal_date: String,
    pub subscription_status_label: String,
}

impl Summary {
    /// Shown wherever a value has no source.
    pub const UNKNOWN: &'static str = "—";
}

/// Computes [`Summary`] values with a configurable "recently paid" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
    recent_paid_window_days: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_PAID_WINDOW_DAYS)
    }
}

impl Aggregator {
    pub fn new(recent_paid_window_days: u32) -> Self {
        Self {
            recent_paid_window_days,
        }
    }

    pub fn recent_paid_window_days(&self) -> u32 {
        self.recent_paid_window_days
    }

    /// Earliest `period_end` that still counts as recently paid on `today`.
    pub fn recent_paid_cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.recent_paid_window_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Summarise `invoices` and the optional current `subscription` as of `today`.
    ///
    /// The recently-paid count depends on `today`: the same invoices can give a
    /// different count on another day once a `period_end` crosses the window
    /// edge. Invoices whose `period_end` does not parse are left out of that
    /// count; nothing here fails.
    pub fn summarize(
        &self,
        subscription: Option<&Subscription>,
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> Summary {
        let cutoff = self.recent_paid_cutoff(today);

        let open_invoice_count = invoices
            .iter()
            .filter(|invoice| invoice.status == InvoiceStatus::Open)
            .count();

        let recently_paid_count = invoices
            .iter()
            .filter(|invoice| invoice.status == InvoiceStatus::Paid)
            .filter(|invoice| {
                invoice
                    .period_end_date()
                    .is_some_and(|period_end| period_end >= cutoff)
            })
            .count();

        let next_renewal_date = subscription
            .and_then(Subscription::renewal_date)
            .map(format_medium_date)
            .unwrap_or_else(|| Summary::UNKNOWN.to_string());

        let subscription_status_label = subscription
            .map(|sub| sub.status.as_str())
            .unwrap_or(Summary::UNKNOWN)
            .to_string();

        Summary {
            open_invoice_count,
            recently_paid_count,
            total_invoice_count: invoices.len(),
            next_renewal_date,
            subscription_status_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubscriptionStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn days_ago(days: u64) -> String {
        (today() - Days::new(days)).format("%Y-%m-%d").to_string()
    }

    fn invoice(status: InvoiceStatus, period_end: String) -> Invoice {
        Invoice {
            invoice_id: format!("inv-{}-{}", status.as_str(), period_end),
            client_id: "c-1".to_string(),
            subscription_id: Some("s-1".to_string()),
            number: "INV-0001".to_string(),
            period_start: "2026-09-01".to_string(),
            period_end,
            amount_idr: 1_500_000,
            status,
            payment_due_date: "2026-10-01".to_string(),
            pdf_url: None,
        }
    }

    fn subscription() -> Subscription {
        Subscription {
            subscription_id: "s-1".to_string(),
            client_id: "c-1".to_string(),
            plan_id: Some("p-1".to_string()),
            start_date: "2026-01-01".to_string(),
            renew_date: "2026-11-01".to_string(),
            status: SubscriptionStatus::Active,
            plan: None,
        }
    }

    #[test]
    fn mixed_invoices_scenario() {
        let invoices = vec![
            invoice(InvoiceStatus::Open, days_ago(5)),
            invoice(InvoiceStatus::Paid, days_ago(10)),
            invoice(InvoiceStatus::Paid, days_ago(40)),
            invoice(InvoiceStatus::Void, days_ago(1)),
        ];

        let summary = Aggregator::default().summarize(None, &invoices, today());

        assert_eq!(summary.open_invoice_count, 1);
        assert_eq!(summary.recently_paid_count, 1);
        assert_eq!(summary.total_invoice_count, 4);
    }

    #[test]
    fn empty_input_gives_zeroes_and_sentinels() {
        let summary = Aggregator::default().summarize(None, &[], today());

        assert_eq!(
            summary,
            Summary {
                open_invoice_count: 0,
                recently_paid_count: 0,
                total_invoice_count: 0,
                next_renewal_date: Summary::UNKNOWN.to_string(),
                subscription_status_label: Summary::UNKNOWN.to_string(),
            }
        );
    }

    #[test]
    fn recency_window_boundaries() {
        let aggregator = Aggregator::default();
        let count = |days: u64| {
            aggregator
                .summarize(None, &[invoice(InvoiceStatus::Paid, days_ago(days))], today())
                .recently_paid_count
        };

        assert_eq!(count(29), 1);
        assert_eq!(count(30), 1);
        assert_eq!(count(31), 0);
    }

    #[test]
    fn window_length_is_configurable() {
        let invoices = vec![invoice(InvoiceStatus::Paid, days_ago(10))];

        assert_eq!(
            Aggregator::new(7)
                .summarize(None, &invoices, today())
                .recently_paid_count,
            0
        );
        assert_eq!(
            Aggregator::new(14)
                .summarize(None, &invoices, today())
                .recently_paid_count,
            1
        );
    }

    #[test]
    fn malformed_period_end_is_excluded_not_fatal() {
        let invoices = vec![
            invoice(InvoiceStatus::Paid, "yesterday".to_string()),
            invoice(InvoiceStatus::Paid, String::new()),
            invoice(InvoiceStatus::Paid, days_ago(3)),
            invoice(InvoiceStatus::Open, "???".to_string()),
        ];

        let summary = Aggregator::default().summarize(None, &invoices, today());

        assert_eq!(summary.recently_paid_count, 1);
        assert_eq!(summary.open_invoice_count, 1);
        assert_eq!(summary.total_invoice_count, 4);
    }

    #[test]
    fn open_count_ignores_order() {
        let mut invoices = vec![
            invoice(InvoiceStatus::Open, days_ago(1)),
            invoice(InvoiceStatus::Uncollectible, days_ago(2)),
            invoice(InvoiceStatus::Open, days_ago(3)),
            invoice(InvoiceStatus::Paid, days_ago(4)),
        ];
        let aggregator = Aggregator::default();
        let forward = aggregator.summarize(None, &invoices, today());
        invoices.reverse();
        let backward = aggregator.summarize(None, &invoices, today());

        assert_eq!(forward.open_invoice_count, 2);
        assert_eq!(forward, backward);
    }

    #[test]
    fn subscription_fields_are_formatted() {
        let sub = subscription();
        let summary = Aggregator::default().summarize(Some(&sub), &[], today());

        assert_eq!(summary.next_renewal_date, "Nov 1, 2026");
        assert_eq!(summary.subscription_status_label, "active");
    }

    #[test]
    fn unparseable_renewal_date_falls_back_to_sentinel() {
        let mut sub = subscription();
        sub.renew_date = "next month".to_string();
        sub.status = SubscriptionStatus::OnHold;

        let summary = Aggregator::default().summarize(Some(&sub), &[], today());

        assert_eq!(summary.next_renewal_date, Summary::UNKNOWN);
        assert_eq!(summary.subscription_status_label, "on_hold");
    }

    #[test]
    fn same_inputs_same_day_same_summary() {
        let sub = subscription();
        let invoices = vec![
            invoice(InvoiceStatus::Paid, days_ago(2)),
            invoice(InvoiceStatus::Open, days_ago(12)),
        ];
        let aggregator = Aggregator::default();

        assert_eq!(
            aggregator.summarize(Some(&sub), &invoices, today()),
            aggregator.summarize(Some(&sub), &invoices, today())
        );
    }

    #[test]
    fn huge_window_does_not_overflow() {
        let invoices = vec![invoice(InvoiceStatus::Paid, "1970-01-01".to_string())];
        let summary = Aggregator::new(u32::MAX).summarize(None, &invoices, today());
        assert_eq!(summary.recently_paid_count, 1);
    }
}
