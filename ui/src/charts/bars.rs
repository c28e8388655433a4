use std::fmt::Write as FmtWrite;

use crate::core::format::format_compact;

use super::{escape, padded_extent, series_color, Canvas, LinearScale, Svg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories down the y axis, bars grow to the right.
    Horizontal,
    /// Categories along the x axis, bars grow upwards.
    Vertical,
}

/// One bar per category for a single legend entry. `values` is aligned with
/// the chart's category list; `None` leaves a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

const MAX_LABEL_CHARS: usize = 24;

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let mut out: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        out.push('…');
        out
    }
}

pub fn grouped_bars(
    title: &str,
    category_label: &str,
    value_label: &str,
    categories: &[String],
    series: &[BarSeries],
    orientation: Orientation,
    size: (f64, f64),
) -> Svg {
    let values = series.iter().flat_map(|s| s.values.iter().flatten().copied());
    if categories.is_empty() || series.is_empty() || values.clone().next().is_none() {
        return Canvas::new(size.0, size.1).no_data(title);
    }

    let mut canvas = match orientation {
        Orientation::Horizontal => Canvas::new(size.0, size.1).with_left_margin(190.0),
        Orientation::Vertical => Canvas::new(size.0, size.1).with_bottom_margin(130.0),
    };
    canvas.title(title);

    let extent = padded_extent(values, true);
    let slots = series.len() as f64;
    let (band, scale) = match orientation {
        Orientation::Horizontal => {
            let scale = LinearScale::new(extent, (canvas.plot_left(), canvas.plot_right()));
            canvas.x_value_axis(&scale, format_compact);
            canvas.axis_titles(value_label, category_label);
            (canvas.plot_height() / categories.len() as f64, scale)
        }
        Orientation::Vertical => {
            let scale = LinearScale::new(extent, (canvas.plot_bottom(), canvas.plot_top()));
            canvas.y_value_axis(&scale, format_compact);
            canvas.axis_titles(category_label, value_label);
            (canvas.plot_width() / categories.len() as f64, scale)
        }
    };
    let bar = band * 0.8 / slots;
    let zero = scale.map(0.0);

    for (c, category) in categories.iter().enumerate() {
        let band_start = match orientation {
            Orientation::Horizontal => canvas.plot_top() + band * c as f64,
            Orientation::Vertical => canvas.plot_left() + band * c as f64,
        };
        let first_slot = band_start + band * 0.1;

        for (s, entry) in series.iter().enumerate() {
            let Some(value) = entry.values.get(c).copied().flatten() else {
                continue;
            };
            let color = series_color(s);
            let offset = first_slot + bar * s as f64;
            let end = scale.map(value);
            let (x, y, w, h) = match orientation {
                Orientation::Horizontal => (zero.min(end), offset, (end - zero).abs(), bar),
                Orientation::Vertical => (offset, zero.min(end), bar, (end - zero).abs()),
            };
            let mut mark = String::new();
            let _ = write!(
                mark,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{} · {} · {}</title></rect>"#,
                escape(category),
                escape(&entry.name),
                format_compact(value)
            );
            canvas.push(&mark);
        }

        let label = short_label(category);
        match orientation {
            Orientation::Horizontal => {
                let y = band_start + band / 2.0 + 4.0;
                canvas.text(canvas.plot_left() - 8.0, y, 12.0, "end", "#1f2933", &label);
            }
            Orientation::Vertical => {
                let x = band_start + band / 2.0;
                let y = canvas.plot_bottom() + 14.0;
                canvas.push(&format!(
                    r#"<text x="{x:.1}" y="{y:.1}" font-size="12" text-anchor="end" fill="{}" transform="rotate(-35, {x:.1}, {y:.1})">{}</text>"#,
                    "#1f2933",
                    escape(&label)
                ));
            }
        }
    }

    let legend: Vec<(String, &str)> = series
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), series_color(i)))
        .collect();
    canvas.legend("region", &legend);
    canvas.finish()
}
