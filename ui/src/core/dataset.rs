//! Trending-video dataset: CSV loading, row validation and the shared,
//! read-only collection every chart aggregates from.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use time::{macros::format_description, Date, Month};

use super::error::{DashboardError, Result};

/// One trending-video observation.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub region: String,
    pub category_name: String,
    pub like_ratio: f64,
    pub comment_ratio: f64,
    pub views: u64,
    pub title_sentiment: f64,
    pub publish_hour: u8,
    pub trending_date: Date,
    pub days_trending: u32,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    region: String,
    category_name: String,
    like_ratio: f64,
    comment_ratio: f64,
    /// Float-typed exports write counts as `100.0`.
    views: f64,
    /// Blank when no sentiment score was computed; kept as NaN.
    title_sentiment: Option<f64>,
    publish_hour: u8,
    trending_date: String,
    days_trending: u32,
}

impl RawRow {
    fn into_record(self) -> std::result::Result<VideoRecord, String> {
        let region = self.region.trim().to_string();
        if region.is_empty() {
            return Err("region is empty".into());
        }
        let category_name = self.category_name.trim().to_string();
        if category_name.is_empty() {
            return Err("category_name is empty".into());
        }
        if self.like_ratio.is_nan() || self.like_ratio < 0.0 {
            return Err(format!("like_ratio must be non-negative, got {}", self.like_ratio));
        }
        if self.comment_ratio.is_nan() || self.comment_ratio < 0.0 {
            return Err(format!(
                "comment_ratio must be non-negative, got {}",
                self.comment_ratio
            ));
        }
        if !self.views.is_finite() || self.views < 0.0 || self.views.fract() != 0.0 {
            return Err(format!("views must be a non-negative whole number, got {}", self.views));
        }
        if self.publish_hour > 23 {
            return Err(format!("publish_hour out of range: {}", self.publish_hour));
        }
        let trending_date = parse_trending_date(&self.trending_date)
            .ok_or_else(|| format!("unrecognised trending_date `{}`", self.trending_date))?;

        Ok(VideoRecord {
            region,
            category_name,
            like_ratio: self.like_ratio,
            comment_ratio: self.comment_ratio,
            views: self.views as u64,
            title_sentiment: self.title_sentiment.unwrap_or(f64::NAN),
            publish_hour: self.publish_hour,
            trending_date,
            days_trending: self.days_trending,
        })
    }
}

/// Accepts `YYYY-MM-DD` (anything after the date part is ignored, so
/// timestamps work) and the `YY.DD.MM` form of the raw trending exports.
pub fn parse_trending_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Some(iso) = raw.get(..10) {
        if let Ok(date) = Date::parse(iso, format_description!("[year]-[month]-[day]")) {
            return Some(date);
        }
    }

    let mut parts = raw.split('.');
    let (yy, dd, mm) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || yy.len() != 2 {
        return None;
    }
    let year = 2000 + yy.parse::<i32>().ok()?;
    let month = Month::try_from(mm.parse::<u8>().ok()?).ok()?;
    Date::from_calendar_date(year, month, dd.parse().ok()?).ok()
}

/// Immutable row collection, loaded once and shared by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<VideoRecord>,
    regions: Vec<String>,
    date_bounds: Option<(Date, Date)>,
}

impl Dataset {
    pub fn from_records(rows: Vec<VideoRecord>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut bounds: Option<(Date, Date)> = None;

        for row in &rows {
            if !regions.iter().any(|r| r == &row.region) {
                regions.push(row.region.clone());
            }
            let date = row.trending_date;
            bounds = Some(match bounds {
                None => (date, date),
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
            });
        }

        Self {
            rows,
            regions,
            date_bounds: bounds,
        }
    }

    /// Read the CSV at `path`. A missing or unreadable file is reported as
    /// [`DashboardError::DatasetUnreadable`]; bad rows carry their line.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| DashboardError::DatasetUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        let dataset = Self::from_csv(reader)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            regions = dataset.regions.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
            // Header is line 1.
            let line = idx as u64 + 2;
            let raw = result.map_err(|err| DashboardError::InvalidRow {
                line,
                reason: err.to_string(),
            })?;
            let record = raw
                .into_record()
                .map_err(|reason| DashboardError::InvalidRow { line, reason })?;
            rows.push(record);
        }
        Ok(Self::from_records(rows))
    }

    pub fn rows(&self) -> &[VideoRecord] {
        &self.rows
    }

    /// Borrowed view of every row, the unfiltered input to the aggregator.
    pub fn all(&self) -> Vec<&VideoRecord> {
        self.rows.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct regions in first-seen order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Earliest and latest trending date, `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(Date, Date)> {
        self.date_bounds
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const HEADER: &str = "region,category_name,like_ratio,comment_ratio,views,title_sentiment,publish_hour,trending_date,days_trending\n";

    #[test]
    fn parses_rows_and_tracks_regions_and_bounds() {
        let csv = format!(
            "{HEADER}US,Music,0.1,0.01,100,0.5,14,2024-01-01,2\nGB,Sports,0.2,0.02,200,-0.2,9,2024-01-05,1\nUS,Comedy,0.3,0.03,300,0.1,20,2023-12-30,4\n"
        );
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.regions(), &["US".to_string(), "GB".to_string()]);
        assert_eq!(
            dataset.date_bounds(),
            Some((date!(2023 - 12 - 30), date!(2024 - 01 - 05)))
        );
        assert_eq!(dataset.rows()[1].publish_hour, 9);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "title,region,category_name,like_ratio,comment_ratio,views,title_sentiment,publish_hour,trending_date,days_trending\nHello,IN,Music,0.1,0.01,10,0.0,1,2024-02-02,1\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows()[0].region, "IN");
    }

    #[test]
    fn negative_ratio_is_rejected_with_line() {
        let csv = format!("{HEADER}US,Music,0.1,0.01,100,0.5,14,2024-01-01,2\nUS,Music,-0.1,0.01,100,0.5,14,2024-01-01,2\n");
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            DashboardError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("like_ratio"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn float_view_counts_load_as_integers() {
        let csv = format!("{HEADER}US,Music,0.1,0.01,100.0,0.5,14,2024-01-01,2\n");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows()[0].views, 100);
    }

    #[test]
    fn fractional_or_negative_views_are_rejected() {
        for views in ["100.5", "-3", "NaN"] {
            let csv = format!("{HEADER}US,Music,0.1,0.01,{views},0.5,14,2024-01-01,2\n");
            match Dataset::from_reader(csv.as_bytes()) {
                Err(DashboardError::InvalidRow { line: 2, reason }) => assert!(reason.contains("views"), "{reason}"),
                other => panic!("{views}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn blank_sentiment_loads_as_nan() {
        let csv = format!(
            "{HEADER}US,Music,0.1,0.01,100,,14,2024-01-01,2\nGB,Music,0.1,0.01,100,0.4,14,2024-01-01,2\n"
        );
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.rows()[0].title_sentiment.is_nan());
        assert_eq!(dataset.rows()[1].title_sentiment, 0.4);
    }

    #[test]
    fn empty_region_is_rejected() {
        let csv = format!("{HEADER} ,Music,0.1,0.01,100,0.5,14,2024-01-01,2\n");
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(DashboardError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = Dataset::load(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DatasetUnreadable { .. }));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }

    #[test]
    fn trending_date_formats() {
        assert_eq!(parse_trending_date("2024-03-09"), Some(date!(2024 - 03 - 09)));
        assert_eq!(
            parse_trending_date("2024-03-09 00:00:00"),
            Some(date!(2024 - 03 - 09))
        );
        assert_eq!(parse_trending_date("17.14.11"), Some(date!(2017 - 11 - 14)));
        assert_eq!(parse_trending_date("yesterday"), None);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let dataset = Dataset::from_records(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.date_bounds(), None);
        assert!(dataset.regions().is_empty());
    }
}
