//! Small numeric helpers shared by the aggregator and the chart builders.

/// Mean of the finite values; NaN when there are none.
pub fn mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

pub fn std_dev(data: &[f64], mean: f64) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n as f64 - 1.0);
    variance.sqrt()
}

/// Linear-interpolated quantile of an ascending slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    if sorted.len() == 1 {
        return sorted[0];
    }

    let clamped_pct = pct.clamp(0.0, 1.0);
    let rank = clamped_pct * (sorted.len() as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * weight
    }
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

pub fn median(values: &[f64]) -> f64 {
    percentile(&sorted(values), 0.5)
}

/// Five-number summary plus Tukey whiskers (1.5 × IQR, clamped to data).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= q1 - fence)
            .unwrap_or(min);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= q3 + fence)
            .unwrap_or(max);

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            lower_whisker,
            upper_whisker,
        })
    }
}

/// Gaussian kernel density estimate on `points` evenly spaced samples
/// between the data extremes (padded by three bandwidths). Scott's rule.
pub fn kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let data = sorted(values);
    if data.is_empty() || points < 2 {
        return Vec::new();
    }

    let n = data.len() as f64;
    let sd = std_dev(&data, mean(&data));
    let spread = if sd > 0.0 { sd } else { 0.1 };
    let bandwidth = 1.06 * spread * n.powf(-0.2);

    let lo = data[0] - 3.0 * bandwidth;
    let hi = data[data.len() - 1] + 3.0 * bandwidth;
    let step = (hi - lo) / (points as f64 - 1.0);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = data
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

/// Ordinary least squares fit `y = slope * x + intercept`.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}
