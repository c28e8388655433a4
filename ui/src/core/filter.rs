//! Filter state driven by the sidebar controls.

use time::Date;

use super::aggregate::Measure;
use super::dataset::{Dataset, VideoRecord};

/// Value of the two-ended date picker. Either end may be unset while the
/// user is mid-selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRangeInput {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRangeInput {
    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn single(date: Date) -> Self {
        Self {
            start: Some(date),
            end: None,
        }
    }

    /// Inclusive bounds when both ends are chosen; reversed ends are swapped.
    /// A half-chosen range yields `None` and filters nothing.
    pub fn resolved(&self) -> Option<(Date, Date)> {
        match (self.start, self.end) {
            (Some(a), Some(b)) => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub regions: Vec<String>,
    pub dates: DateRangeInput,
}

impl FilterState {
    /// All regions over the dataset's full date span.
    pub fn everything(dataset: &Dataset) -> Self {
        Self {
            regions: dataset.regions().to_vec(),
            dates: dataset
                .date_bounds()
                .map(|(lo, hi)| DateRangeInput::between(lo, hi))
                .unwrap_or_default(),
        }
    }

    pub fn is_region_selected(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn toggle_region(&mut self, region: &str) {
        if let Some(pos) = self.regions.iter().position(|r| r == region) {
            self.regions.remove(pos);
        } else {
            self.regions.push(region.to_string());
        }
    }

    pub fn matches(&self, row: &VideoRecord) -> bool {
        if !self.is_region_selected(&row.region) {
            return false;
        }
        match self.dates.resolved() {
            Some((start, end)) => row.trending_date >= start && row.trending_date <= end,
            None => true,
        }
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a VideoRecord> {
        dataset.rows().iter().filter(|row| self.matches(row)).collect()
    }
}

/// User-selectable metric for the regional comparison tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    LikeRatio,
    CommentRatio,
    Views,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::LikeRatio, Metric::CommentRatio, Metric::Views];

    pub fn measure(self) -> Measure {
        match self {
            Metric::LikeRatio => Measure::LikeRatio,
            Metric::CommentRatio => Measure::CommentRatio,
            Metric::Views => Measure::Views,
        }
    }

    pub fn label(self) -> &'static str {
        self.measure().column()
    }
}
