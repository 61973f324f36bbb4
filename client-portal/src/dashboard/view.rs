//! Display-ready dashboard fields, shared by the HTML page and the JSON API.

use super::format::{
    avatar_url, format_day_month, format_eur, format_idr, format_medium_date, mailto,
};
use super::summary::Summary;
use crate::models::{Client, Invoice, InvoiceStatus, Subscription, SubscriptionStatus};
use serde::Serialize;

/// Rows fetched from the gateway for one signed-in user.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub client: Option<Client>,
    pub subscription: Option<Subscription>,
    pub invoices: Vec<Invoice>,
}

/// Contact addresses and asset origins used when rendering links.
#[derive(Debug, Clone)]
pub struct DashboardLinks {
    pub support_email: String,
    pub billing_email: String,
    pub avatar_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Success,
    Warning,
    Neutral,
    Danger,
}

impl BadgeTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeTone::Success => "badge badge-success",
            BadgeTone::Warning => "badge badge-warning",
            BadgeTone::Neutral => "badge badge-neutral",
            BadgeTone::Danger => "badge badge-danger",
        }
    }

    fn for_subscription(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Active => BadgeTone::Success,
            SubscriptionStatus::PastDue => BadgeTone::Warning,
            SubscriptionStatus::Canceled
            | SubscriptionStatus::OnHold
            | SubscriptionStatus::Unknown => BadgeTone::Neutral,
        }
    }

    fn for_invoice(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Paid => BadgeTone::Success,
            InvoiceStatus::Open => BadgeTone::Warning,
            InvoiceStatus::Void | InvoiceStatus::Unknown => BadgeTone::Neutral,
            InvoiceStatus::Uncollectible => BadgeTone::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPanel {
    pub has_subscription: bool,
    pub plan_name: String,
    pub billing_cycle: String,
    pub price: String,
    pub status_label: String,
    pub status_tone: BadgeTone,
    pub next_billing: String,
    pub manage_plan_url: String,
    pub pause_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRow {
    pub invoice_id: String,
    pub number: String,
    pub period: String,
    pub amount: String,
    pub due_date: String,
    pub status_label: String,
    pub status_tone: BadgeTone,
    pub pdf_url: Option<String>,
    pub pay_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    pub avatar_url: String,
    pub avatar_fallback: String,
    pub support_url: String,
    pub summary: Summary,
    pub stats: Vec<StatCard>,
    pub subscription: SubscriptionPanel,
    pub invoices: Vec<InvoiceRow>,
}

impl DashboardView {
    pub fn build(
        data: &DashboardData,
        summary: Summary,
        links: &DashboardLinks,
        recent_paid_window_days: u32,
    ) -> Self {
        let client_name = data.client.as_ref().and_then(Client::display_name);

        let greeting = match client_name {
            Some(name) => format!("Welcome back, {}", name),
            None => "Welcome back".to_string(),
        };

        let stats = vec![
            StatCard {
                label: "Open Invoices".to_string(),
                value: summary.open_invoice_count.to_string(),
                hint: "Need your action".to_string(),
            },
            StatCard {
                label: format!("Paid ({} days)", recent_paid_window_days),
                value: summary.recently_paid_count.to_string(),
                hint: "Recent payments".to_string(),
            },
            StatCard {
                label: "Total Invoices".to_string(),
                value: summary.total_invoice_count.to_string(),
                hint: "All time".to_string(),
            },
            StatCard {
                label: "Next Renewal".to_string(),
                value: summary.next_renewal_date.clone(),
                hint: summary.subscription_status_label.clone(),
            },
        ];

        let invoices = data
            .invoices
            .iter()
            .map(|invoice| invoice_row(invoice, links))
            .collect();

        Self {
            greeting,
            avatar_url: avatar_url(&links.avatar_base_url, client_name.unwrap_or("Client")),
            avatar_fallback: "CL".to_string(),
            support_url: mailto(&links.support_email, None),
            subscription: subscription_panel(data.subscription.as_ref(), &summary, links),
            summary,
            stats,
            invoices,
        }
    }
}

fn subscription_panel(
    subscription: Option<&Subscription>,
    summary: &Summary,
    links: &DashboardLinks,
) -> SubscriptionPanel {
    let plan = subscription.and_then(|sub| sub.plan.as_ref());

    let price = plan
        .map(|plan| {
            let mut price = format!("{} / {}", format_idr(plan.price_idr), plan.billing_cycle.unit());
            if let Some(eur) = plan.price_eur {
                price.push_str(&format!(" ({})", format_eur(eur)));
            }
            price
        })
        .unwrap_or_else(|| Summary::UNKNOWN.to_string());

    SubscriptionPanel {
        has_subscription: subscription.is_some(),
        plan_name: plan
            .map(|plan| plan.name.clone())
            .unwrap_or_else(|| Summary::UNKNOWN.to_string()),
        billing_cycle: plan
            .map(|plan| plan.billing_cycle.as_str().to_string())
            .unwrap_or_else(|| Summary::UNKNOWN.to_string()),
        price,
        status_label: summary.subscription_status_label.clone(),
        status_tone: subscription
            .map(|sub| BadgeTone::for_subscription(sub.status))
            .unwrap_or(BadgeTone::Neutral),
        next_billing: summary.next_renewal_date.clone(),
        manage_plan_url: mailto(&links.billing_email, Some("Manage Plan")),
        pause_url: mailto(&links.billing_email, Some("Pause/Hold Request")),
    }
}

fn invoice_row(invoice: &Invoice, links: &DashboardLinks) -> InvoiceRow {
    let day_month = |date: Option<chrono::NaiveDate>| {
        date.map(format_day_month)
            .unwrap_or_else(|| Summary::UNKNOWN.to_string())
    };

    InvoiceRow {
        invoice_id: invoice.invoice_id.clone(),
        number: invoice.number.clone(),
        period: format!(
            "{} – {}",
            day_month(invoice.period_start_date()),
            day_month(invoice.period_end_date())
        ),
        amount: format_idr(invoice.amount_idr),
        due_date: medium_date_or_unknown(&invoice.payment_due_date),
        status_label: invoice.status.label().to_string(),
        status_tone: BadgeTone::for_invoice(invoice.status),
        pdf_url: invoice.pdf_url.clone().filter(|url| !url.is_empty()),
        pay_url: (invoice.status == InvoiceStatus::Open).then(|| {
            mailto(
                &links.billing_email,
                Some(&format!("Payment for {}", invoice.number)),
            )
        }),
    }
}

fn medium_date_or_unknown(raw: &str) -> String {
    super::format::parse_calendar_date(raw)
        .map(format_medium_date)
        .unwrap_or_else(|| Summary::UNKNOWN.to_string())
}
