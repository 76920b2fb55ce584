//! Activity aggregation for charts.
//!
//! Sparse per-day event counts from the activity log are folded into
//! gap-free daily, weekly, or biweekly series over a date range.

mod aggregator;
mod range;

pub use aggregator::{
    ActivityAggregator, ActivityPoint, AggregatorConfig, DailyActivitySource, Granularity,
};
pub use range::{ActivityRange, DateSpan};
