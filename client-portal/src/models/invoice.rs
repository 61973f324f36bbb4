use crate::dashboard::format::parse_calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    Paid,
    Void,
    Uncollectible,
    /// Any status this portal does not know; counted nowhere.
    #[serde(other)]
    Unknown,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
            InvoiceStatus::Uncollectible => "uncollectible",
            InvoiceStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Open => "Open",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Void => "Void",
            InvoiceStatus::Uncollectible => "Uncollectible",
            InvoiceStatus::Unknown => "Unknown",
        }
    }
}

/// Invoice for one billing period. `amount_idr` is whole rupiah.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub client_id: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
    pub number: String,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub period_start: String,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub period_end: String,
    pub amount_idr: i64,
    pub status: InvoiceStatus,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub payment_due_date: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl Invoice {
    pub fn period_start_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.period_start)
    }

    pub fn period_end_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.period_end)
    }
}
