//! Bounded in-memory record of scored submissions and the aggregate queries
//! answered over it.

mod store;
mod summary;
pub mod views;

pub use store::{AnalyticsEntry, AnalyticsSink, AnalyticsStore, DEFAULT_ANALYTICS_CAPACITY};
pub use views::{AnalyticsFilter, AnalyticsQuery, AnalyticsSummary};
