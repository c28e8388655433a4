use std::fmt::Write as FmtWrite;

use crate::core::format::format_compact;

use super::{escape, padded_extent, series_color, Canvas, LinearScale, Svg};

/// Points for one legend entry with an optional fitted line `y = slope·x + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub trend: Option<(f64, f64)>,
}

pub fn scatter_plot(
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[ScatterSeries],
    size: (f64, f64),
) -> Svg {
    let points = || series.iter().flat_map(|s| s.points.iter().copied());
    if points().next().is_none() {
        return Canvas::new(size.0, size.1).no_data(title);
    }
    let mut canvas = Canvas::new(size.0, size.1);
    canvas.title(title);

    let x = LinearScale::new(
        padded_extent(points().map(|p| p.0), false),
        (canvas.plot_left(), canvas.plot_right()),
    );
    let y = LinearScale::new(
        padded_extent(points().map(|p| p.1), false),
        (canvas.plot_bottom(), canvas.plot_top()),
    );
    canvas.y_value_axis(&y, format_compact);
    canvas.x_value_axis(&x, format_compact);
    canvas.axis_titles(x_label, y_label);

    for (i, s) in series.iter().enumerate() {
        let color = series_color(i);
        let mut mark = String::from("<g>");
        for (px, py) in &s.points {
            let _ = write!(
                mark,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3.5" fill="{color}" fill-opacity="0.55"><title>{} · {} · {}</title></circle>"#,
                x.map(*px),
                y.map(*py),
                escape(&s.name),
                format_compact(*px),
                format_compact(*py)
            );
        }
        if let Some((slope, intercept)) = s.trend {
            let (lo, hi) = x.domain();
            let (ylo, yhi) = y.domain();
            // Clip the fitted line to the visible value range.
            let clamp = |v: f64| v.clamp(ylo.min(yhi), ylo.max(yhi));
            let _ = write!(
                mark,
                r#"<line class="trend" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{color}" stroke-width="2.5"/>"#,
                x.map(lo),
                y.map(clamp(slope * lo + intercept)),
                x.map(hi),
                y.map(clamp(slope * hi + intercept)),
            );
        }
        mark.push_str("</g>");
        canvas.push(&mark);
    }

    let legend: Vec<(String, &str)> = series
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), series_color(i)))
        .collect();
    canvas.legend("region", &legend);
    canvas.finish()
}
