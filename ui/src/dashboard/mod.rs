//! Dashboard components: sidebar controls, tabs and chart frames.

mod chart;
mod filters;
mod insights;
mod report;
mod tabs;

use std::sync::Arc;

pub use chart::ChartFrame;
pub use filters::{DateRangeFilter, RegionFilter};
pub use insights::InsightsTab;
pub use report::ReportPanel;
pub use tabs::{GenreTab, RegionalTab, SentimentTab, Tab, TabBar};

use crate::core::{DashboardConfig, Dataset};

/// Root context shared by every dashboard component. The dataset is loaded
/// once before launch and never mutated.
#[derive(Clone)]
pub struct DashboardContext {
    pub dataset: Arc<Dataset>,
    pub config: Arc<DashboardConfig>,
}

impl DashboardContext {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
        }
    }
}
