//! Data model and the pure pieces every view builds on.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod stats;

pub use config::DashboardConfig;
pub use dataset::{Dataset, VideoRecord};
pub use error::{DashboardError, Result};
pub use filter::{DateRangeInput, FilterState, Metric};
