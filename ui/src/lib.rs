//! Shared crate for Trendscope: the data model, aggregation, chart
//! rendering, PDF report and the Dioxus dashboard components.

pub mod charts;
pub mod core;
pub mod dashboard;
pub mod insights;
pub mod report;
pub mod view;
pub mod views;

pub use dashboard::DashboardContext;
