use std::fmt::Write as FmtWrite;

use crate::core::aggregate::Matrix;
use crate::core::format::format_compact;

use super::{escape, Canvas, Svg};

/// Yellow → green → blue ramp.
const RAMP: [(u8, u8, u8); 5] = [
    (255, 255, 217),
    (199, 233, 180),
    (65, 182, 196),
    (34, 94, 168),
    (8, 29, 88),
];

fn ramp(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (RAMP.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(RAMP.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (RAMP[i], RAMP[i + 1]);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Annotated heatmap of a pivoted summary, axes titled by the pivot keys.
/// Absent cells are hatched grey.
pub fn heatmap(title: &str, matrix: &Matrix, size: (f64, f64)) -> Svg {
    let Some((lo, hi)) = matrix.value_range() else {
        return Canvas::new(size.0, size.1).no_data(title);
    };
    let mut canvas = Canvas::new(size.0, size.1);
    canvas.title(title);
    canvas.axis_titles(matrix.column_key.column(), matrix.row_key.column());

    let cell_w = canvas.plot_width() / matrix.columns.len() as f64;
    let cell_h = canvas.plot_height() / matrix.rows.len() as f64;
    let font = (cell_h * 0.55).clamp(7.0, 13.0);
    let span = hi - lo;

    for (r, row) in matrix.rows.iter().enumerate() {
        let y = canvas.plot_top() + cell_h * r as f64;
        for (c, column) in matrix.columns.iter().enumerate() {
            let x = canvas.plot_left() + cell_w * c as f64;
            let mut mark = String::new();
            match matrix.cell(r, c) {
                Some(value) => {
                    let t = if span > 0.0 { (value - lo) / span } else { 0.5 };
                    let fill = hex(ramp(t));
                    let ink = if t > 0.55 { "#ffffff" } else { "#1f2933" };
                    let _ = write!(
                        mark,
                        r#"<g><title>{} · {} · {}</title><rect x="{x:.1}" y="{y:.1}" width="{cell_w:.1}" height="{cell_h:.1}" fill="{fill}" stroke="{}" stroke-width="0.5"/><text x="{:.1}" y="{:.1}" font-size="{font:.1}" text-anchor="middle" fill="{ink}">{}</text></g>"#,
                        escape(&row.to_string()),
                        escape(&column.to_string()),
                        format_compact(value),
                        "#ffffff",
                        x + cell_w / 2.0,
                        y + cell_h / 2.0 + font * 0.35,
                        format_compact(value),
                    );
                }
                None => {
                    let _ = write!(
                        mark,
                        r#"<rect x="{x:.1}" y="{y:.1}" width="{cell_w:.1}" height="{cell_h:.1}" fill="{}" stroke="{}" stroke-width="0.5"><title>{} · {} · no data</title></rect>"#,
                        "#f3f4f6",
                        "#ffffff",
                        escape(&row.to_string()),
                        escape(&column.to_string()),
                    );
                }
            }
            canvas.push(&mark);
        }
        canvas.text(
            canvas.plot_left() - 8.0,
            y + cell_h / 2.0 + 4.0,
            font.min(12.0),
            "end",
            "#1f2933",
            &row.to_string(),
        );
    }

    for (c, column) in matrix.columns.iter().enumerate() {
        let x = canvas.plot_left() + cell_w * (c as f64 + 0.5);
        canvas.text(x, canvas.plot_bottom() + 20.0, 13.0, "middle", "#1f2933", &column.to_string());
    }

    color_bar(&mut canvas, lo, hi);
    canvas.finish()
}

fn color_bar(canvas: &mut Canvas, lo: f64, hi: f64) {
    const STEPS: usize = 24;
    let x = canvas.plot_right() + 30.0;
    let top = canvas.plot_top();
    let step_h = canvas.plot_height() / STEPS as f64;
    let mut bar = String::new();
    for i in 0..STEPS {
        // Highest values at the top.
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let _ = write!(
            bar,
            r#"<rect x="{x:.1}" y="{:.1}" width="18" height="{:.1}" fill="{}"/>"#,
            top + step_h * i as f64,
            step_h + 0.5,
            hex(ramp(t))
        );
    }
    canvas.push(&bar);
    canvas.text(x + 24.0, top + 10.0, 11.0, "start", "#6b7280", &format_compact(hi));
    canvas.text(x + 24.0, canvas.plot_bottom(), 11.0, "start", "#6b7280", &format_compact(lo));
}
