pub mod client;
pub mod invoice;
pub mod plan;
pub mod subscription;
pub mod user;

pub use client::Client;
pub use invoice::{Invoice, InvoiceStatus};
pub use plan::{BillingCycle, Plan};
pub use subscription::{Subscription, SubscriptionStatus};
pub use user::{AuthUser, Identity, SessionTokens};

use serde::Deserialize;

/// Decode a date column as text. `null`, missing and non-string values become
/// an empty string, which never parses, so only that field goes blank.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => raw,
        _ => String::new(),
    })
}
