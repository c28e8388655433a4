//! The five static comparison charts and their PNG artifacts.

mod raster;
mod renderer;

pub use raster::Rasterizer;
pub use renderer::{Artifact, ChartRenderer};

use crate::charts::{
    box_plot, grouped_bars, heatmap, line_chart, violin_plot, BarSeries, Canvas, LineSeries, Orientation, Svg,
    XAxis,
};
use crate::core::aggregate::{
    distributions, retain_categories, summarize, top_categories, GroupSpec, Key, KeyValue, Measure,
};
use crate::core::dataset::VideoRecord;

/// SVG user units per inch of the printed artifact.
pub const UNITS_PER_INCH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insight {
    EngagementByRegion,
    CategoryDistribution,
    SentimentByRegion,
    PublishTimeHeatmap,
    TrendingDuration,
}

impl Insight {
    pub const ALL: [Insight; 5] = [
        Insight::EngagementByRegion,
        Insight::CategoryDistribution,
        Insight::SentimentByRegion,
        Insight::PublishTimeHeatmap,
        Insight::TrendingDuration,
    ];

    pub fn filename(self) -> &'static str {
        match self {
            Insight::EngagementByRegion => "engagement_comparison.png",
            Insight::CategoryDistribution => "category_distribution.png",
            Insight::SentimentByRegion => "sentiment_comparison.png",
            Insight::PublishTimeHeatmap => "publish_time_heatmap.png",
            Insight::TrendingDuration => "trending_duration.png",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Insight::EngagementByRegion => "Like Ratio Comparison by Region",
            Insight::CategoryDistribution => "Top 10 Categories by Region",
            Insight::SentimentByRegion => "Title Sentiment Distribution by Region",
            Insight::PublishTimeHeatmap => "Median Views by Publish Hour (UTC)",
            Insight::TrendingDuration => "Videos Trending Duration by Region",
        }
    }

    /// Printed size in inches.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            Insight::CategoryDistribution => (12.0, 8.0),
            Insight::PublishTimeHeatmap => (12.0, 6.0),
            _ => (10.0, 6.0),
        }
    }

    fn canvas_size(self) -> (f64, f64) {
        let (w, h) = self.size_inches();
        (w * UNITS_PER_INCH, h * UNITS_PER_INCH)
    }

    /// Build the chart from the full row set.
    pub fn chart(self, rows: &[&VideoRecord], top_n: usize) -> Svg {
        let size = self.canvas_size();
        match self {
            Insight::EngagementByRegion => box_plot(
                self.title(),
                "region",
                "like_ratio",
                &distributions(rows, Key::Region, Measure::LikeRatio),
                size,
            ),
            Insight::SentimentByRegion => violin_plot(
                self.title(),
                "region",
                "title_sentiment",
                &distributions(rows, Key::Region, Measure::TitleSentiment),
                size,
            ),
            Insight::CategoryDistribution => category_distribution(self.title(), rows, top_n, size),
            Insight::PublishTimeHeatmap => {
                let table = summarize(
                    rows,
                    &GroupSpec::median(&[Key::PublishHour, Key::Region], Measure::Views),
                );
                match table.pivot() {
                    Ok(matrix) => heatmap(self.title(), &matrix, size),
                    Err(err) => {
                        tracing::warn!(error = %err, "publish-hour pivot failed");
                        Canvas::new(size.0, size.1).no_data(self.title())
                    }
                }
            }
            Insight::TrendingDuration => {
                let table = summarize(rows, &GroupSpec::count(&[Key::Region, Key::DaysTrending]));
                let series: Vec<LineSeries> = table
                    .series()
                    .into_iter()
                    .map(|(region, points)| LineSeries {
                        name: region.to_string(),
                        points: points
                            .into_iter()
                            .filter_map(|(days, count)| days.as_f64().map(|d| (d, count)))
                            .collect(),
                    })
                    .collect();
                line_chart(self.title(), "days_trending", "count", "region", &series, &XAxis::Numeric, size)
            }
        }
    }
}

/// Horizontal grouped counts of the most frequent categories, one bar per region.
pub(crate) fn category_distribution(title: &str, rows: &[&VideoRecord], top_n: usize, size: (f64, f64)) -> Svg {
    let categories = top_categories(rows, top_n);
    let kept = retain_categories(rows, &categories);
    let table = summarize(&kept, &GroupSpec::count(&[Key::Region, Key::Category]));
    let series: Vec<BarSeries> = table
        .distinct(0)
        .into_iter()
        .map(|region| BarSeries {
            name: region.to_string(),
            values: categories
                .iter()
                .map(|c| table.get(&[region.clone(), KeyValue::text(c.as_str())]))
                .collect(),
        })
        .collect();
    grouped_bars(title, "category_name", "count", &categories, &series, Orientation::Horizontal, size)
}
