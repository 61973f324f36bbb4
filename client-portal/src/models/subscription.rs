//! Subscription model.

use super::plan::Plan;
use crate::dashboard::format::parse_calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    OnHold,
    /// Any status this portal does not know; never current.
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Statuses that make a subscription eligible to be the client's current one.
    pub const CURRENT: [SubscriptionStatus; 3] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::OnHold,
        SubscriptionStatus::PastDue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::OnHold => "on_hold",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    pub fn is_current(&self) -> bool {
        Self::CURRENT.contains(self)
    }
}

/// Subscription row, optionally joined with its plan.
///
/// Dates are kept as the text the gateway returned and parsed on use, so a bad
/// value only blanks the field that reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: String,
    pub client_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub start_date: String,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub renew_date: String,
    pub status: SubscriptionStatus,
    #[serde(default, rename = "plans")]
    pub plan: Option<Plan>,
}

impl Subscription {
    pub fn renewal_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.renew_date)
    }
}
