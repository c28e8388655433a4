//! Dashboard configuration. Everything has a fixed default; callers override
//! fields directly (tests point the directories at temp folders).

use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/cleaned data/combined_regions.csv";
pub const DEFAULT_INSIGHTS_DIR: &str = "insights";
pub const REPORT_FILENAME: &str = "youtube_analysis_report.pdf";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub insights_dir: PathBuf,
    /// Raster density of the static artifacts.
    pub artifact_dpi: u32,
    /// Upper bound on points in the sentiment/engagement scatter.
    pub sample_size: usize,
    /// Categories kept by category-based charts.
    pub top_categories: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            insights_dir: PathBuf::from(DEFAULT_INSIGHTS_DIR),
            artifact_dpi: 300,
            sample_size: 1000,
            top_categories: 10,
        }
    }
}

impl DashboardConfig {
    pub fn with_insights_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.insights_dir = dir.into();
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn report_path(&self) -> PathBuf {
        self.insights_dir.join(REPORT_FILENAME)
    }

    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.insights_dir.join(filename)
    }
}
