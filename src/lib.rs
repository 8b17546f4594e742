// Donation Analytics - Core Library
// Repeat-donor detection and running percentile statistics over FEC
// itemized contribution records, in a single forward pass.

pub mod record;
pub mod validator;
pub mod ledger;
pub mod order_stats;
pub mod aggregator;
pub mod pipeline;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use record::RawRecord;
pub use validator::{validate, Rejection, ValidatedRecord};
pub use ledger::{Classification, DonorKey, DonorLedger};
pub use order_stats::OrderStatisticsTree;
pub use aggregator::{GroupKey, GroupSnapshot, GroupState, Percentile, PercentileAggregator};
pub use pipeline::{run_files, write_summary, DonationAnalyzer, RunStats};
pub use config::{parse_percentile, read_percentile, RunConfig};
pub use error::{AnalyticsError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
