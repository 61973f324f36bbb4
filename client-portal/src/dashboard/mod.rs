//! Dashboard statistics and display preparation. Pure: no I/O, no shared state.

pub mod clock;
pub mod format;
pub mod selection;
pub mod summary;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use selection::{select_current_subscription, select_recent_invoices};
pub use summary::{Aggregator, Summary, DEFAULT_RECENT_PAID_WINDOW_DAYS};
pub use view::{BadgeTone, DashboardData, DashboardLinks, DashboardView};
