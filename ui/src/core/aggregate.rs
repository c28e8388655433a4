//! Group-by aggregation over dataset rows.
//!
//! Every chart in the dashboard is fed by one of these summaries. Grouping
//! keys are collected into a `BTreeMap`, so summary rows come back sorted by
//! key tuple the same way a data-frame group-by orders them.

use std::collections::BTreeMap;
use std::fmt;

use time::Date;

use super::dataset::VideoRecord;
use super::error::{DashboardError, Result};
use super::stats;

/// Grouping columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Region,
    Category,
    PublishHour,
    DaysTrending,
    /// Trending date truncated to the first of its month.
    TrendingMonth,
}

impl Key {
    pub fn value(self, row: &VideoRecord) -> KeyValue {
        match self {
            Key::Region => KeyValue::Text(row.region.clone()),
            Key::Category => KeyValue::Text(row.category_name.clone()),
            Key::PublishHour => KeyValue::Int(i64::from(row.publish_hour)),
            Key::DaysTrending => KeyValue::Int(i64::from(row.days_trending)),
            Key::TrendingMonth => KeyValue::Month(month_bucket(row.trending_date)),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Key::Region => "region",
            Key::Category => "category_name",
            Key::PublishHour => "publish_hour",
            Key::DaysTrending => "days_trending",
            Key::TrendingMonth => "trending_date",
        }
    }
}

/// One component of a grouping tuple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Text(String),
    Int(i64),
    Month(Date),
}

impl KeyValue {
    /// Numeric position for plotting on a continuous axis.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Int(n) => Some(*n as f64),
            KeyValue::Month(date) => Some(f64::from(date.year()) * 12.0 + f64::from(date.month() as u8 - 1)),
            KeyValue::Text(_) => None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        KeyValue::Text(value.into())
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Text(s) => f.write_str(s),
            KeyValue::Int(n) => write!(f, "{n}"),
            KeyValue::Month(date) => write!(f, "{:04}-{:02}", date.year(), date.month() as u8),
        }
    }
}

/// Numeric columns that can be aggregated or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    LikeRatio,
    CommentRatio,
    Views,
    TitleSentiment,
}

impl Measure {
    pub fn value(self, row: &VideoRecord) -> f64 {
        match self {
            Measure::LikeRatio => row.like_ratio,
            Measure::CommentRatio => row.comment_ratio,
            Measure::Views => row.views as f64,
            Measure::TitleSentiment => row.title_sentiment,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Measure::LikeRatio => "like_ratio",
            Measure::CommentRatio => "comment_ratio",
            Measure::Views => "views",
            Measure::TitleSentiment => "title_sentiment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Count,
    Mean(Measure),
    Median(Measure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub keys: Vec<Key>,
    pub aggregation: Aggregation,
}

impl GroupSpec {
    pub fn count(keys: &[Key]) -> Self {
        Self {
            keys: keys.to_vec(),
            aggregation: Aggregation::Count,
        }
    }

    pub fn mean(keys: &[Key], measure: Measure) -> Self {
        Self {
            keys: keys.to_vec(),
            aggregation: Aggregation::Mean(measure),
        }
    }

    pub fn median(keys: &[Key], measure: Measure) -> Self {
        Self {
            keys: keys.to_vec(),
            aggregation: Aggregation::Median(measure),
        }
    }
}

/// Aggregate keyed by the distinct key tuples present in the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    keys: Vec<Key>,
    entries: BTreeMap<Vec<KeyValue>, f64>,
}

impl SummaryTable {
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &[KeyValue]) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[KeyValue], f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_slice(), *v))
    }

    /// Sum of all aggregate values. For count summaries this is the row count.
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Sorted distinct values of the key at `level`.
    pub fn distinct(&self, level: usize) -> Vec<KeyValue> {
        let mut values: Vec<KeyValue> = self
            .entries
            .keys()
            .filter_map(|k| k.get(level).cloned())
            .collect();
        values.sort();
        values.dedup();
        values
    }

    /// Entries ordered by descending value; ties keep key order.
    pub fn ranked(&self) -> Vec<(Vec<KeyValue>, f64)> {
        let mut out: Vec<(Vec<KeyValue>, f64)> =
            self.entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    /// Split a two-key summary into one series per first-key value.
    pub fn series(&self) -> Vec<(KeyValue, Vec<(KeyValue, f64)>)> {
        let mut grouped: BTreeMap<KeyValue, Vec<(KeyValue, f64)>> = BTreeMap::new();
        for (key, value) in &self.entries {
            if let [outer, inner, ..] = key.as_slice() {
                grouped
                    .entry(outer.clone())
                    .or_default()
                    .push((inner.clone(), *value));
            }
        }
        grouped.into_iter().collect()
    }

    /// Reshape a two-key summary into a matrix: rows are the first key's
    /// distinct values, columns the second's. Absent combinations stay `None`.
    pub fn pivot(&self) -> Result<Matrix> {
        if self.keys.len() != 2 {
            return Err(DashboardError::PivotShape(self.keys.len()));
        }
        let rows = self.distinct(0);
        let columns = self.distinct(1);
        let cells = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| self.get(&[r.clone(), c.clone()]))
                    .collect()
            })
            .collect();

        Ok(Matrix {
            row_key: self.keys[0],
            column_key: self.keys[1],
            rows,
            columns,
            cells,
        })
    }
}

/// Row × column view of a two-key summary, with gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub row_key: Key,
    pub column_key: Key,
    pub rows: Vec<KeyValue>,
    pub columns: Vec<KeyValue>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Matrix {
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Min and max over present cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, v| match acc {
                None => Some((*v, *v)),
                Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
            })
    }
}

pub fn summarize(rows: &[&VideoRecord], spec: &GroupSpec) -> SummaryTable {
    let mut buckets: BTreeMap<Vec<KeyValue>, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let key: Vec<KeyValue> = spec.keys.iter().map(|k| k.value(row)).collect();
        let sample = match spec.aggregation {
            Aggregation::Count => 1.0,
            Aggregation::Mean(measure) | Aggregation::Median(measure) => measure.value(row),
        };
        buckets.entry(key).or_default().push(sample);
    }

    let entries = buckets
        .into_iter()
        .map(|(key, samples)| {
            let value = match spec.aggregation {
                Aggregation::Count => samples.len() as f64,
                Aggregation::Mean(_) => stats::mean(&samples),
                Aggregation::Median(_) => stats::median(&samples),
            };
            (key, value)
        })
        .collect();

    SummaryTable {
        keys: spec.keys.clone(),
        entries,
    }
}

/// The `n` most frequent categories, by descending count. Equal counts keep
/// the order in which the categories were first encountered.
pub fn top_categories(rows: &[&VideoRecord], n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for row in rows {
        match counts.iter_mut().find(|(name, _)| *name == row.category_name) {
            Some((_, count)) => *count += 1,
            None => counts.push((row.category_name.as_str(), 1)),
        }
    }
    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(name, _)| name.to_string())
        .collect()
}

pub fn retain_categories<'a>(rows: &[&'a VideoRecord], categories: &[String]) -> Vec<&'a VideoRecord> {
    rows.iter()
        .copied()
        .filter(|row| categories.iter().any(|c| c == &row.category_name))
        .collect()
}

pub fn month_bucket(date: Date) -> Date {
    Date::from_calendar_date(date.year(), date.month(), 1).unwrap_or(date)
}

/// Raw measure values for one group, the input to box and violin charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub group: String,
    pub values: Vec<f64>,
}

pub fn distributions(rows: &[&VideoRecord], key: Key, measure: Measure) -> Vec<Distribution> {
    let mut groups: BTreeMap<KeyValue, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(key.value(row))
            .or_default()
            .push(measure.value(row));
    }
    groups
        .into_iter()
        .map(|(group, values)| Distribution {
            group: group.to_string(),
            values,
        })
        .collect()
}
