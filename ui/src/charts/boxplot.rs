use std::fmt::Write as FmtWrite;

use crate::core::aggregate::Distribution;
use crate::core::format::format_compact;
use crate::core::stats::BoxStats;

use super::{escape, padded_extent, series_color, Canvas, LinearScale, Svg};

/// One box per group along the x axis, Tukey whiskers, outliers as dots.
pub fn box_plot(title: &str, x_label: &str, y_label: &str, groups: &[Distribution], size: (f64, f64)) -> Svg {
    let canvas = Canvas::new(size.0, size.1);
    let stats: Vec<(&Distribution, BoxStats)> = groups
        .iter()
        .filter_map(|g| BoxStats::from_values(&g.values).map(|s| (g, s)))
        .collect();
    if stats.is_empty() {
        return canvas.no_data(title);
    }
    let mut canvas = canvas;

    let extent = padded_extent(groups.iter().flat_map(|g| g.values.iter().copied()), false);
    let y = LinearScale::new(extent, (canvas.plot_bottom(), canvas.plot_top()));
    canvas.title(title);
    canvas.y_value_axis(&y, format_compact);
    canvas.axis_titles(x_label, y_label);

    let band = canvas.plot_width() / stats.len() as f64;
    let box_width = (band * 0.5).min(120.0);

    for (i, (group, s)) in stats.iter().enumerate() {
        let color = series_color(i);
        let cx = canvas.plot_left() + band * (i as f64 + 0.5);
        let x0 = cx - box_width / 2.0;
        let (y_q1, y_q3, y_med) = (y.map(s.q1), y.map(s.q3), y.map(s.median));
        let (y_lo, y_hi) = (y.map(s.lower_whisker), y.map(s.upper_whisker));

        let mut mark = String::new();
        let _ = write!(
            mark,
            r#"<g><title>{} · n={} · median {} · IQR {}–{}</title>"#,
            escape(&group.group),
            group.values.iter().filter(|v| v.is_finite()).count(),
            format_compact(s.median),
            format_compact(s.q1),
            format_compact(s.q3),
        );
        let _ = write!(
            mark,
            r#"<line x1="{cx:.1}" y1="{y_lo:.1}" x2="{cx:.1}" y2="{y_q1:.1}" stroke="{color}" stroke-width="1.5"/><line x1="{cx:.1}" y1="{y_q3:.1}" x2="{cx:.1}" y2="{y_hi:.1}" stroke="{color}" stroke-width="1.5"/>"#
        );
        let cap = box_width / 4.0;
        for wy in [y_lo, y_hi] {
            let _ = write!(
                mark,
                r#"<line x1="{:.1}" y1="{wy:.1}" x2="{:.1}" y2="{wy:.1}" stroke="{color}" stroke-width="1.5"/>"#,
                cx - cap,
                cx + cap
            );
        }
        let _ = write!(
            mark,
            r#"<rect x="{x0:.1}" y="{y_q3:.1}" width="{box_width:.1}" height="{:.1}" fill="{color}" fill-opacity="0.35" stroke="{color}" stroke-width="1.5"/>"#,
            (y_q1 - y_q3).max(1.0)
        );
        let _ = write!(
            mark,
            r#"<line x1="{x0:.1}" y1="{y_med:.1}" x2="{:.1}" y2="{y_med:.1}" stroke="{color}" stroke-width="3"/>"#,
            x0 + box_width
        );
        for v in group
            .values
            .iter()
            .filter(|v| **v < s.lower_whisker || **v > s.upper_whisker)
        {
            let _ = write!(
                mark,
                r#"<circle cx="{cx:.1}" cy="{:.1}" r="2.5" fill="none" stroke="{color}"/>"#,
                y.map(*v)
            );
        }
        mark.push_str("</g>");
        canvas.push(&mark);
        canvas.text(cx, canvas.plot_bottom() + 20.0, 13.0, "middle", "#1f2933", &group.group);
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(group: &str, values: &[f64]) -> Distribution {
        Distribution {
            group: group.into(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn one_box_per_group() {
        let svg = box_plot(
            "Like Ratio Comparison by Region",
            "region",
            "like_ratio",
            &[dist("GB", &[0.1, 0.2, 0.3]), dist("US", &[0.05, 0.5, 0.07, 0.06])],
            (1000.0, 600.0),
        );
        assert_eq!(svg.markup.matches("fill-opacity=\"0.35\"").count(), 2);
        assert!(svg.markup.contains(">GB</text>"));
        assert!(svg.markup.contains("US · n=4"));
    }

    #[test]
    fn single_value_group_still_draws() {
        let svg = box_plot("t", "x", "y", &[dist("US", &[0.1])], (600.0, 400.0));
        assert!(svg.markup.contains("US · n=1"));
        assert!(!svg.markup.contains("No data"));
    }

    #[test]
    fn missing_values_are_not_counted() {
        let svg = box_plot("t", "x", "y", &[dist("US", &[0.1, f64::NAN, 0.3])], (600.0, 400.0));
        assert!(svg.markup.contains("US · n=2"));
        assert!(!svg.markup.contains("NaN"));
    }

    #[test]
    fn empty_groups_render_placeholder() {
        let svg = box_plot("t", "x", "y", &[], (600.0, 400.0));
        assert!(svg.markup.contains("No data"));
    }
}
