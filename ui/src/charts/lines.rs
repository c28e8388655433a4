use std::fmt::Write as FmtWrite;

use crate::core::format::format_compact;

use super::{escape, nice_ticks, padded_extent, series_color, Canvas, LinearScale, Svg, MUTED};

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    /// Points in ascending x order.
    pub points: Vec<(f64, f64)>,
}

/// How the x axis is labelled.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Round numeric ticks.
    Numeric,
    /// Explicit labels at the given positions (months, hours…).
    Labels(Vec<(f64, String)>),
}

pub fn line_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    legend_heading: &str,
    series: &[LineSeries],
    x_axis: &XAxis,
    size: (f64, f64),
) -> Svg {
    let points = || series.iter().flat_map(|s| s.points.iter().copied());
    if points().next().is_none() {
        return Canvas::new(size.0, size.1).no_data(title);
    }
    let mut canvas = Canvas::new(size.0, size.1);
    canvas.title(title);

    let x_extent = points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.0), hi.max(p.0))
    });
    let x = LinearScale::new(x_extent, (canvas.plot_left() + 10.0, canvas.plot_right() - 10.0));
    let y = LinearScale::new(
        padded_extent(points().map(|p| p.1), true),
        (canvas.plot_bottom(), canvas.plot_top()),
    );
    canvas.y_value_axis(&y, format_compact);
    canvas.axis_titles(x_label, y_label);

    let label_y = canvas.plot_bottom() + 20.0;
    match x_axis {
        XAxis::Numeric => {
            let (lo, hi) = x.domain();
            for tick in nice_ticks(lo, hi, 10) {
                canvas.text(x.map(tick), label_y, 12.0, "middle", MUTED, &format_compact(tick));
            }
        }
        XAxis::Labels(labels) => {
            // Thin out dense label sets so they stay legible.
            let stride = labels.len().div_ceil(16).max(1);
            for (pos, text) in labels.iter().step_by(stride) {
                canvas.text(x.map(*pos), label_y, 12.0, "middle", MUTED, text);
            }
        }
    }

    for (i, line) in series.iter().enumerate() {
        if line.points.is_empty() {
            continue;
        }
        let color = series_color(i);
        let mut d = String::new();
        for (j, (px, py)) in line.points.iter().enumerate() {
            let cmd = if j == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{:.1},{:.1} ", x.map(*px), y.map(*py));
        }
        let mut mark = String::new();
        let _ = write!(
            mark,
            r#"<g><path d="{}" fill="none" stroke="{color}" stroke-width="2.2" stroke-linejoin="round"/>"#,
            d.trim_end()
        );
        for (px, py) in &line.points {
            let _ = write!(
                mark,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{color}"><title>{} · {} · {}</title></circle>"#,
                x.map(*px),
                y.map(*py),
                escape(&line.name),
                x_label_for(x_axis, *px),
                format_compact(*py)
            );
        }
        mark.push_str("</g>");
        canvas.push(&mark);
    }

    // Colours follow the series position, so empty series still hold their slot.
    let legend: Vec<(String, &str)> = series
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.points.is_empty())
        .map(|(i, s)| (s.name.clone(), series_color(i)))
        .collect();
    canvas.legend(legend_heading, &legend);
    canvas.finish()
}

fn x_label_for(axis: &XAxis, value: f64) -> String {
    match axis {
        XAxis::Labels(labels) => labels
            .iter()
            .find(|(pos, _)| (*pos - value).abs() < 1e-9)
            .map(|(_, text)| escape(text))
            .unwrap_or_else(|| format_compact(value)),
        XAxis::Numeric => format_compact(value),
    }
}
