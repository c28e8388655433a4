use std::fmt::Write as FmtWrite;

use crate::core::aggregate::Distribution;
use crate::core::format::format_compact;
use crate::core::stats::{self, BoxStats};

use super::{escape, series_color, Canvas, LinearScale, Svg};

const DENSITY_POINTS: usize = 80;

/// Mirrored kernel-density outline per group with a miniature box inside.
pub fn violin_plot(title: &str, x_label: &str, y_label: &str, groups: &[Distribution], size: (f64, f64)) -> Svg {
    let canvas = Canvas::new(size.0, size.1);
    let shapes: Vec<(&Distribution, Vec<(f64, f64)>, BoxStats)> = groups
        .iter()
        .filter_map(|g| {
            let stats = BoxStats::from_values(&g.values)?;
            Some((g, stats::kde(&g.values, DENSITY_POINTS), stats))
        })
        .collect();
    if shapes.is_empty() {
        return canvas.no_data(title);
    }
    let mut canvas = canvas;

    let lo = shapes
        .iter()
        .flat_map(|(_, curve, _)| curve.first().map(|p| p.0))
        .fold(f64::INFINITY, f64::min);
    let hi = shapes
        .iter()
        .flat_map(|(_, curve, _)| curve.last().map(|p| p.0))
        .fold(f64::NEG_INFINITY, f64::max);
    let y = LinearScale::new((lo, hi), (canvas.plot_bottom(), canvas.plot_top()));
    canvas.title(title);
    canvas.y_value_axis(&y, format_compact);
    canvas.axis_titles(x_label, y_label);

    let band = canvas.plot_width() / shapes.len() as f64;
    let half_width = (band * 0.4).min(110.0);

    for (i, (group, curve, s)) in shapes.iter().enumerate() {
        let color = series_color(i);
        let cx = canvas.plot_left() + band * (i as f64 + 0.5);
        let peak = curve.iter().map(|p| p.1).fold(0.0, f64::max);
        let spread = |density: f64| if peak > 0.0 { density / peak * half_width } else { 0.0 };

        let mut path = String::new();
        for (j, (value, density)) in curve.iter().enumerate() {
            let cmd = if j == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{cmd}{:.1},{:.1} ", cx + spread(*density), y.map(*value));
        }
        for (value, density) in curve.iter().rev() {
            let _ = write!(path, "L{:.1},{:.1} ", cx - spread(*density), y.map(*value));
        }
        path.push('Z');

        let mut mark = String::new();
        let _ = write!(
            mark,
            r#"<g><title>{} · n={} · median {}</title><path d="{path}" fill="{color}" fill-opacity="0.45" stroke="{color}" stroke-width="1.2"/>"#,
            escape(&group.group),
            group.values.len(),
            format_compact(s.median),
        );
        let _ = write!(
            mark,
            r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5"/><rect x="{:.1}" y="{:.1}" width="8" height="{:.1}" fill="{}"/><circle cx="{cx:.1}" cy="{:.1}" r="3.5" fill="{}"/></g>"#,
            y.map(s.lower_whisker),
            y.map(s.upper_whisker),
            "#333333",
            cx - 4.0,
            y.map(s.q3),
            (y.map(s.q1) - y.map(s.q3)).max(1.0),
            "#333333",
            y.map(s.median),
            "#ffffff",
        );
        canvas.push(&mark);
        canvas.text(cx, canvas.plot_bottom() + 20.0, 13.0, "middle", "#1f2933", &group.group);
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_a_closed_outline_per_group() {
        let groups = vec![
            Distribution {
                group: "GB".into(),
                values: vec![-0.2, 0.0, 0.1, 0.4],
            },
            Distribution {
                group: "IN".into(),
                values: vec![0.3, 0.35, 0.5],
            },
        ];
        let svg = violin_plot("Title Sentiment Distribution by Region", "region", "title_sentiment", &groups, (1000.0, 600.0));
        assert_eq!(svg.markup.matches("fill-opacity=\"0.45\"").count(), 2);
        assert_eq!(svg.markup.matches("Z\"").count(), 2);
    }

    #[test]
    fn constant_values_do_not_break_density() {
        let groups = vec![Distribution {
            group: "US".into(),
            values: vec![0.0, 0.0, 0.0],
        }];
        let svg = violin_plot("t", "x", "y", &groups, (600.0, 400.0));
        assert!(!svg.markup.contains("NaN"));
    }
}
