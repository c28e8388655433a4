//! Aggregates and charts behind the interactive tabs.
//!
//! Everything is recomputed from the filtered rows on each call; nothing here
//! is cached between interactions.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::charts::{
    box_plot, grouped_bars, line_chart, scatter_plot, BarSeries, LineSeries, Orientation, ScatterSeries, Svg,
    XAxis,
};
use crate::core::aggregate::{distributions, summarize, Distribution, GroupSpec, Key, KeyValue, Measure, SummaryTable};
use crate::core::dataset::{Dataset, VideoRecord};
use crate::core::filter::{FilterState, Metric};
use crate::core::stats::linear_fit;

/// Points drawn in the sentiment/engagement scatter unless configured otherwise.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

const WIDE: (f64, f64) = (1100.0, 500.0);
const HALF: (f64, f64) = (700.0, 420.0);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub row_count: usize,
    pub metric: Metric,
    /// region × category → count
    pub category_counts: SummaryTable,
    /// region × month × category → count
    pub monthly_trends: SummaryTable,
    pub sentiment: Vec<Distribution>,
    /// Sampled (title_sentiment, like_ratio) points per region with a fitted line.
    pub engagement_sample: Vec<ScatterSeries>,
    /// (region, category, mean title_sentiment), highest mean first.
    pub sentiment_by_category: Vec<(String, String, f64)>,
    pub metric_distribution: Vec<Distribution>,
    /// region × publish_hour → median views
    pub hourly_views: SummaryTable,
}

/// Filter the dataset and compute every tab's aggregates.
pub fn render_view(dataset: &Dataset, filters: &FilterState, metric: Metric, rng: &mut impl Rng) -> ViewModel {
    render_view_sampled(dataset, filters, metric, DEFAULT_SAMPLE_SIZE, rng)
}

pub fn render_view_sampled(
    dataset: &Dataset,
    filters: &FilterState,
    metric: Metric,
    sample_size: usize,
    rng: &mut impl Rng,
) -> ViewModel {
    let rows = filters.apply(dataset);
    tracing::trace!(rows = rows.len(), ?metric, "view recomputed");
    ViewModel::compute(&rows, metric, sample_size, rng)
}

impl ViewModel {
    pub fn compute(rows: &[&VideoRecord], metric: Metric, sample_size: usize, rng: &mut impl Rng) -> Self {
        let sentiment_by_category = summarize(
            rows,
            &GroupSpec::mean(&[Key::Region, Key::Category], Measure::TitleSentiment),
        )
        .ranked()
        .into_iter()
        .filter_map(|(key, mean)| match key.as_slice() {
            [region, category] => Some((region.to_string(), category.to_string(), mean)),
            _ => None,
        })
        .collect();

        Self {
            row_count: rows.len(),
            metric,
            category_counts: summarize(rows, &GroupSpec::count(&[Key::Region, Key::Category])),
            monthly_trends: summarize(
                rows,
                &GroupSpec::count(&[Key::Region, Key::TrendingMonth, Key::Category]),
            ),
            sentiment: distributions(rows, Key::Region, Measure::TitleSentiment),
            engagement_sample: engagement_sample(rows, sample_size, rng),
            sentiment_by_category,
            metric_distribution: distributions(rows, Key::Region, metric.measure()),
            hourly_views: summarize(
                rows,
                &GroupSpec::median(&[Key::Region, Key::PublishHour], Measure::Views),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn genre_chart(&self) -> Svg {
        let categories = categories_by_total(&self.category_counts);
        let series = region_bars(&self.category_counts, &categories);
        grouped_bars(
            "Most Popular Genres",
            "category_name",
            "count",
            &categories,
            &series,
            Orientation::Vertical,
            WIDE,
        )
    }

    /// One line chart per region, a line per category over trending months.
    /// Every facet carries the same category list so colours agree.
    pub fn trend_charts(&self) -> Vec<(String, Svg)> {
        let months = self.monthly_trends.distinct(1);
        let categories: Vec<String> = self.monthly_trends.distinct(2).iter().map(ToString::to_string).collect();
        let position = |month: &KeyValue| months.iter().position(|m| m == month).map(|p| p as f64);
        let labels: Vec<(f64, String)> = months
            .iter()
            .enumerate()
            .map(|(i, m)| (i as f64, m.to_string()))
            .collect();

        let mut per_region: BTreeMap<String, BTreeMap<String, Vec<(f64, f64)>>> = BTreeMap::new();
        for (key, count) in self.monthly_trends.iter() {
            if let [region, month, category] = key {
                if let Some(x) = position(month) {
                    per_region
                        .entry(region.to_string())
                        .or_default()
                        .entry(category.to_string())
                        .or_default()
                        .push((x, count));
                }
            }
        }

        per_region
            .into_iter()
            .map(|(region, mut lines)| {
                let series: Vec<LineSeries> = categories
                    .iter()
                    .map(|name| {
                        let mut points = lines.remove(name).unwrap_or_default();
                        points.sort_by(|a, b| a.0.total_cmp(&b.0));
                        LineSeries {
                            name: name.clone(),
                            points,
                        }
                    })
                    .collect();
                let svg = line_chart(
                    &format!("region = {region}"),
                    "trending_date",
                    "count",
                    "category_name",
                    &series,
                    &XAxis::Labels(labels.clone()),
                    WIDE,
                );
                (region, svg)
            })
            .collect()
    }

    pub fn sentiment_chart(&self) -> Svg {
        box_plot("Title Sentiment by Region", "region", "title_sentiment", &self.sentiment, HALF)
    }

    pub fn engagement_chart(&self) -> Svg {
        scatter_plot(
            "Sentiment vs Engagement",
            "title_sentiment",
            "like_ratio",
            &self.engagement_sample,
            HALF,
        )
    }

    pub fn sentiment_category_chart(&self) -> Svg {
        // Category order follows the first appearance in the descending ranking.
        let mut categories: Vec<String> = Vec::new();
        for (_, category, _) in &self.sentiment_by_category {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        let mut regions: Vec<String> = self.sentiment_by_category.iter().map(|(r, _, _)| r.clone()).collect();
        regions.sort();
        regions.dedup();

        let series: Vec<BarSeries> = regions
            .into_iter()
            .map(|region| BarSeries {
                values: categories
                    .iter()
                    .map(|category| {
                        self.sentiment_by_category
                            .iter()
                            .find(|(r, c, _)| *r == region && c == category)
                            .map(|(_, _, mean)| *mean)
                    })
                    .collect(),
                name: region,
            })
            .collect();
        grouped_bars(
            "Sentiment by Video Category",
            "category_name",
            "title_sentiment",
            &categories,
            &series,
            Orientation::Vertical,
            WIDE,
        )
    }

    pub fn metric_chart(&self) -> Svg {
        box_plot(
            &format!("{} by Region", self.metric.label()),
            "region",
            self.metric.label(),
            &self.metric_distribution,
            WIDE,
        )
    }

    pub fn hourly_chart(&self) -> Svg {
        let series: Vec<LineSeries> = self
            .hourly_views
            .series()
            .into_iter()
            .map(|(region, points)| LineSeries {
                name: region.to_string(),
                points: points
                    .into_iter()
                    .filter_map(|(hour, views)| hour.as_f64().map(|h| (h, views)))
                    .collect(),
            })
            .collect();
        line_chart(
            "Optimal Publishing Times",
            "publish_hour",
            "views",
            "region",
            &series,
            &XAxis::Numeric,
            WIDE,
        )
    }
}

/// Random sample of at most `size` rows, split by region, each with a
/// least-squares trend line when it has two or more distinct x values.
/// Rows without a sentiment score can't be placed and are skipped.
fn engagement_sample(rows: &[&VideoRecord], size: usize, rng: &mut impl Rng) -> Vec<ScatterSeries> {
    let mut by_region: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    let sampled = rows.choose_multiple(rng, size.min(rows.len()));
    for row in sampled.filter(|row| row.title_sentiment.is_finite()) {
        by_region
            .entry(row.region.as_str())
            .or_default()
            .push((row.title_sentiment, row.like_ratio));
    }
    by_region
        .into_iter()
        .map(|(region, points)| ScatterSeries {
            name: region.to_string(),
            trend: linear_fit(&points),
            points,
        })
        .collect()
}

/// Second-level key values ordered by their total across the first level, largest first.
fn categories_by_total(table: &SummaryTable) -> Vec<String> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (key, value) in table.iter() {
        if let [_, category] = key {
            *totals.entry(category.to_string()).or_default() += value;
        }
    }
    let mut ordered: Vec<(String, f64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
    ordered.into_iter().map(|(name, _)| name).collect()
}

fn region_bars(table: &SummaryTable, categories: &[String]) -> Vec<BarSeries> {
    table
        .distinct(0)
        .into_iter()
        .map(|region| BarSeries {
            values: categories
                .iter()
                .map(|c| table.get(&[region.clone(), KeyValue::text(c)]))
                .collect(),
            name: region.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::series_color;
    use crate::core::dataset::fixtures::{record, two_regions};
    use crate::core::filter::DateRangeInput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::date;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn single_region_filter_keeps_one_row() {
        let dataset = two_regions();
        let filters = FilterState {
            regions: vec!["US".into()],
            ..FilterState::everything(&dataset)
        };
        let view = render_view(&dataset, &filters, Metric::LikeRatio, &mut rng());

        assert_eq!(view.row_count, 1);
        assert_eq!(view.metric_distribution.len(), 1);
        assert_eq!(view.metric_distribution[0].group, "US");
        assert_eq!(view.metric_distribution[0].values, vec![0.1]);
        assert!(view.genre_chart().markup.contains("Music"));
        assert!(!view.genre_chart().markup.contains("Sports"));
    }

    #[test]
    fn counts_conserve_mass() {
        let mut rows = Vec::new();
        for day in 1..=28u8 {
            let region = ["US", "GB", "IN"][usize::from(day) % 3];
            let category = ["Music", "Comedy", "Sports", "Gaming"][usize::from(day) % 4];
            let date = time::Date::from_calendar_date(2024, time::Month::February, day).expect("date");
            rows.push(record(region, category, date));
        }
        let dataset = Dataset::from_records(rows);
        let filters = FilterState {
            regions: vec!["US".into(), "IN".into()],
            dates: DateRangeInput::between(date!(2024 - 02 - 05), date!(2024 - 02 - 20)),
        };
        let filtered = filters.apply(&dataset).len();
        let view = render_view(&dataset, &filters, Metric::Views, &mut rng());

        assert_eq!(view.row_count, filtered);
        assert_eq!(view.category_counts.total() as usize, filtered);
        assert_eq!(view.monthly_trends.total() as usize, filtered);
        let sampled: usize = view.engagement_sample.iter().map(|s| s.points.len()).sum();
        assert_eq!(sampled, filtered);
    }

    #[test]
    fn sample_is_capped() {
        let rows: Vec<VideoRecord> = (0..40)
            .map(|i| {
                let mut row = record("US", "Music", date!(2024 - 01 - 01));
                row.title_sentiment = f64::from(i) / 40.0;
                row
            })
            .collect();
        let dataset = Dataset::from_records(rows);
        let refs = dataset.all();
        let view = ViewModel::compute(&refs, Metric::LikeRatio, 10, &mut rng());
        assert_eq!(view.engagement_sample.len(), 1);
        assert_eq!(view.engagement_sample[0].points.len(), 10);
    }

    #[test]
    fn missing_sentiment_is_left_out_of_sentiment_aggregates() {
        let mut blank = record("US", "Music", date!(2024 - 01 - 01));
        blank.title_sentiment = f64::NAN;
        let mut scored = record("US", "Music", date!(2024 - 01 - 02));
        scored.title_sentiment = 0.6;
        let dataset = Dataset::from_records(vec![blank, scored]);
        let view = render_view(&dataset, &FilterState::everything(&dataset), Metric::LikeRatio, &mut rng());

        assert_eq!(view.row_count, 2);
        assert_eq!(view.engagement_sample[0].points, vec![(0.6, 0.05)]);
        assert_eq!(view.sentiment_by_category, vec![("US".to_string(), "Music".to_string(), 0.6)]);
        assert!(!view.sentiment_chart().markup.contains("NaN"));
    }

    #[test]
    fn sentiment_by_category_is_descending() {
        let dataset = two_regions();
        let view = render_view(&dataset, &FilterState::everything(&dataset), Metric::LikeRatio, &mut rng());
        let means: Vec<f64> = view.sentiment_by_category.iter().map(|(_, _, m)| *m).collect();
        assert_eq!(means, vec![0.5, -0.2]);
        assert_eq!(view.sentiment_by_category[0].1, "Music");
    }

    #[test]
    fn empty_selection_renders_placeholders() {
        let dataset = two_regions();
        let filters = FilterState {
            regions: Vec::new(),
            ..FilterState::everything(&dataset)
        };
        let view = render_view(&dataset, &filters, Metric::CommentRatio, &mut rng());
        assert!(view.is_empty());
        assert!(view.trend_charts().is_empty());
        for svg in [
            view.genre_chart(),
            view.sentiment_chart(),
            view.engagement_chart(),
            view.sentiment_category_chart(),
            view.metric_chart(),
            view.hourly_chart(),
        ] {
            assert!(svg.markup.contains("No data"));
        }
    }

    #[test]
    fn trend_facets_use_month_labels() {
        let dataset = Dataset::from_records(vec![
            record("US", "Music", date!(2024 - 01 - 03)),
            record("US", "Music", date!(2024 - 02 - 03)),
            record("GB", "Sports", date!(2024 - 02 - 10)),
        ]);
        let view = render_view(&dataset, &FilterState::everything(&dataset), Metric::LikeRatio, &mut rng());
        let charts = view.trend_charts();
        let names: Vec<&str> = charts.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(names, ["GB", "US"]);
        assert!(charts[1].1.markup.contains("Music · 2024-02 · 1"));
    }

    #[test]
    fn a_category_keeps_its_colour_across_facets() {
        let dataset = Dataset::from_records(vec![
            record("US", "Comedy", date!(2024 - 01 - 03)),
            record("US", "Music", date!(2024 - 01 - 04)),
            record("GB", "Music", date!(2024 - 01 - 10)),
            record("GB", "Sports", date!(2024 - 02 - 10)),
        ]);
        let view = render_view(&dataset, &FilterState::everything(&dataset), Metric::LikeRatio, &mut rng());
        let charts = view.trend_charts();
        assert_eq!(charts.len(), 2);

        // Comedy, Music, Sports share one palette order in every region.
        let music = format!(r#"fill="{}"/>"#, series_color(1));
        for (region, svg) in &charts {
            assert!(svg.markup.contains(&music), "{region}");
            assert!(svg.markup.contains(">Music</text>"), "{region}");
        }
        assert!(!charts[0].1.markup.contains(">Comedy</text>"));
        assert!(!charts[1].1.markup.contains(">Sports</text>"));
    }

    #[test]
    fn genre_bars_follow_region_and_category_counts() {
        let dataset = Dataset::from_records(vec![
            record("US", "Music", date!(2024 - 01 - 01)),
            record("US", "Music", date!(2024 - 01 - 02)),
            record("GB", "Music", date!(2024 - 01 - 03)),
        ]);
        let view = render_view(&dataset, &FilterState::everything(&dataset), Metric::LikeRatio, &mut rng());
        let markup = view.genre_chart().markup;
        assert!(markup.contains("Music · US · 2"));
        assert!(markup.contains("Music · GB · 1"));
    }
}
