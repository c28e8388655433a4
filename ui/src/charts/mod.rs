//! SVG chart builders.
//!
//! Every chart in the dashboard is a self-contained SVG document. The
//! interactive tabs inline the markup (hover titles give the tooltips); the
//! insight renderer rasterizes the same markup into print-resolution PNGs.

use std::fmt::Write as FmtWrite;

mod bars;
mod boxplot;
mod heatmap;
mod lines;
mod scatter;
mod violin;

pub use bars::{grouped_bars, BarSeries, Orientation};
pub use boxplot::box_plot;
pub use heatmap::heatmap;
pub use lines::{line_chart, LineSeries, XAxis};
pub use scatter::{scatter_plot, ScatterSeries};
pub use violin::violin_plot;

/// Rendered chart markup plus its user-space size.
#[derive(Debug, Clone, PartialEq)]
pub struct Svg {
    pub markup: String,
    pub width: f64,
    pub height: f64,
}

impl Svg {
    pub fn as_str(&self) -> &str {
        &self.markup
    }
}

pub(crate) const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";
const INK: &str = "#1f2933";
const MUTED: &str = "#6b7280";
const GRID: &str = "#e5e7eb";

/// Categorical colours (the usual ten-colour qualitative set).
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub(crate) fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Maps a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub(crate) fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let domain = if (hi - lo).abs() < f64::EPSILON {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            (lo - pad, hi + pad)
        } else {
            (lo, hi)
        };
        Self { domain, range }
    }

    pub(crate) fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub(crate) fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// Round tick positions covering `[lo, hi]`, roughly `count` of them.
pub(crate) fn nice_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || count == 0 {
        return Vec::new();
    }
    let span = (hi - lo).abs().max(f64::EPSILON);
    let raw_step = span / count as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let start = (lo.min(hi) / step).ceil() * step;
    let end = lo.max(hi) + step * 1e-9;
    let mut ticks = Vec::new();
    let mut tick = start;
    while tick <= end && ticks.len() < 64 {
        // Snap away float noise like 0.30000000000000004.
        ticks.push((tick / step).round() * step);
        tick += step;
    }
    ticks
}

/// Data extent padded to nice tick boundaries.
pub(crate) fn padded_extent(values: impl IntoIterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = ((hi - lo) * 0.05).max(f64::EPSILON);
    let lo = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    (lo, hi + pad)
}

/// Drawing surface with a plot rectangle inside fixed margins.
pub(crate) struct Canvas {
    width: f64,
    height: f64,
    pub(crate) left: f64,
    pub(crate) right: f64,
    pub(crate) top: f64,
    pub(crate) bottom: f64,
    body: String,
}

impl Canvas {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            left: 80.0,
            right: 150.0,
            top: 60.0,
            bottom: 70.0,
            body: String::new(),
        }
    }

    pub(crate) fn with_left_margin(mut self, left: f64) -> Self {
        self.left = left;
        self
    }

    pub(crate) fn with_bottom_margin(mut self, bottom: f64) -> Self {
        self.bottom = bottom;
        self
    }

    pub(crate) fn plot_left(&self) -> f64 {
        self.left
    }

    pub(crate) fn plot_right(&self) -> f64 {
        self.width - self.right
    }

    pub(crate) fn plot_top(&self) -> f64 {
        self.top
    }

    pub(crate) fn plot_bottom(&self) -> f64 {
        self.height - self.bottom
    }

    pub(crate) fn plot_width(&self) -> f64 {
        self.plot_right() - self.plot_left()
    }

    pub(crate) fn plot_height(&self) -> f64 {
        self.plot_bottom() - self.plot_top()
    }

    pub(crate) fn push(&mut self, fragment: &str) {
        self.body.push_str(fragment);
        self.body.push('\n');
    }

    pub(crate) fn text(&mut self, x: f64, y: f64, size: f64, anchor: &str, fill: &str, text: &str) {
        let _ = writeln!(
            self.body,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="{size}" text-anchor="{anchor}" fill="{fill}">{}</text>"#,
            escape(text)
        );
    }

    pub(crate) fn title(&mut self, title: &str) {
        let x = self.width / 2.0;
        let _ = writeln!(
            self.body,
            r#"<text x="{x:.1}" y="32" font-size="20" font-weight="600" text-anchor="middle" fill="{INK}">{}</text>"#,
            escape(title)
        );
    }

    pub(crate) fn axis_titles(&mut self, x_label: &str, y_label: &str) {
        let x = self.plot_left() + self.plot_width() / 2.0;
        let y = self.height - 18.0;
        self.text(x, y, 14.0, "middle", MUTED, x_label);

        let cy = self.plot_top() + self.plot_height() / 2.0;
        let _ = writeln!(
            self.body,
            r#"<text x="20" y="{cy:.1}" font-size="14" text-anchor="middle" fill="{MUTED}" transform="rotate(-90, 20, {cy:.1})">{}</text>"#,
            escape(y_label)
        );
    }

    /// Horizontal gridlines and labels for a vertical value axis.
    pub(crate) fn y_value_axis(&mut self, scale: &LinearScale, format: fn(f64) -> String) {
        let (lo, hi) = scale.domain();
        let (left, right) = (self.plot_left(), self.plot_right());
        for tick in nice_ticks(lo, hi, 6) {
            let y = scale.map(tick);
            let _ = writeln!(
                self.body,
                r#"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="{GRID}" stroke-width="1"/>"#
            );
            self.text(left - 8.0, y + 4.0, 12.0, "end", MUTED, &format(tick));
        }
        self.frame();
    }

    /// Vertical gridlines and labels for a horizontal value axis.
    pub(crate) fn x_value_axis(&mut self, scale: &LinearScale, format: fn(f64) -> String) {
        let (lo, hi) = scale.domain();
        let (top, bottom) = (self.plot_top(), self.plot_bottom());
        for tick in nice_ticks(lo, hi, 8) {
            let x = scale.map(tick);
            let _ = writeln!(
                self.body,
                r#"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="{GRID}" stroke-width="1"/>"#
            );
            self.text(x, bottom + 20.0, 12.0, "middle", MUTED, &format(tick));
        }
        self.frame();
    }

    fn frame(&mut self) {
        let (l, r, t, b) = (
            self.plot_left(),
            self.plot_right(),
            self.plot_top(),
            self.plot_bottom(),
        );
        let _ = writeln!(
            self.body,
            r#"<path d="M{l:.1},{t:.1} L{l:.1},{b:.1} L{r:.1},{b:.1}" fill="none" stroke="{INK}" stroke-width="1.2"/>"#
        );
    }

    /// Colour key in the right margin. Entries past the plot bottom collapse
    /// into a trailing "+N more" line.
    pub(crate) fn legend(&mut self, heading: &str, entries: &[(String, &str)]) {
        const STEP: f64 = 22.0;
        if entries.is_empty() {
            return;
        }
        let x = self.plot_right() + 20.0;
        let mut y = self.plot_top() + 4.0;
        self.text(x, y, 13.0, "start", INK, heading);

        let room = ((self.plot_bottom() - y) / STEP).floor().max(1.0) as usize;
        let shown = if entries.len() > room { room - 1 } else { entries.len() };
        for (label, color) in &entries[..shown] {
            y += STEP;
            let _ = writeln!(
                self.body,
                r#"<rect x="{x:.1}" y="{:.1}" width="14" height="14" rx="2" fill="{color}"/>"#,
                y - 11.0
            );
            self.text(x + 20.0, y, 12.0, "start", INK, label);
        }
        if shown < entries.len() {
            y += STEP;
            self.text(x, y, 12.0, "start", MUTED, &format!("+{} more", entries.len() - shown));
        }
    }

    pub(crate) fn no_data(mut self, title: &str) -> Svg {
        self.title(title);
        let x = self.width / 2.0;
        let y = self.height / 2.0;
        self.text(x, y, 18.0, "middle", MUTED, "No data for the current filters");
        self.finish()
    }

    pub(crate) fn finish(self) -> Svg {
        let (w, h) = (self.width, self.height);
        let markup = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">
<rect width="{w}" height="{h}" fill="#ffffff"/>
{}</svg>"##,
            self.body
        );
        Svg {
            markup,
            width: w,
            height: h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_round_and_cover_range() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let ticks = nice_ticks(0.013, 0.087, 5);
        assert!(ticks.iter().all(|t| *t >= 0.013 && *t <= 0.087));
        assert!(!ticks.is_empty());
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn flat_domain_is_widened() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert!((scale.map(5.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape("Film & <Animation>"), "Film &amp; &lt;Animation&gt;");
    }

    #[test]
    fn long_legend_stays_inside_the_canvas() {
        let entries: Vec<(String, &str)> = (0..30).map(|i| (format!("category {i}"), series_color(i))).collect();
        let mut canvas = Canvas::new(1000.0, 500.0);
        canvas.legend("category_name", &entries);
        let svg = canvas.finish();

        // 500 high with 60/70 margins leaves room for the heading and 16 rows.
        assert_eq!(svg.markup.matches(r#"rx="2""#).count(), 15);
        assert!(svg.markup.contains(">category 14</text>"));
        assert!(!svg.markup.contains(">category 15</text>"));
        assert!(svg.markup.contains(">+15 more</text>"));
        let lowest = svg
            .markup
            .split("<text ")
            .filter_map(|t| t.split("y=\"").nth(1)?.split('"').next()?.parse::<f64>().ok())
            .fold(0.0, f64::max);
        assert!(lowest <= 430.0, "{lowest}");
    }

    #[test]
    fn short_legend_is_not_truncated() {
        let entries: Vec<(String, &str)> = (0..3).map(|i| (format!("r{i}"), series_color(i))).collect();
        let mut canvas = Canvas::new(1000.0, 500.0);
        canvas.legend("region", &entries);
        let svg = canvas.finish();
        assert_eq!(svg.markup.matches(r#"rx="2""#).count(), 3);
        assert!(!svg.markup.contains("more</text>"));
    }

    #[test]
    fn no_data_placeholder_is_a_complete_document() {
        let svg = Canvas::new(400.0, 300.0).no_data("Empty");
        assert!(svg.markup.starts_with("<svg"));
        assert!(svg.markup.trim_end().ends_with("</svg>"));
        assert!(svg.markup.contains("No data"));
    }
}
