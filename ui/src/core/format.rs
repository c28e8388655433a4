//! Formatting helpers for presenting metrics.

pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact axis / annotation label: `1.2M`, `35.0k`, `0.042`.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return "—".into();
    }
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if magnitude >= 10.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else if magnitude >= 0.1 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    }
}

pub fn format_date(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_thousand_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn compact_labels() {
        assert_eq!(format_compact(2_500_000.0), "2.5M");
        assert_eq!(format_compact(35_000.0), "35.0k");
        assert_eq!(format_compact(42.0), "42");
        assert_eq!(format_compact(3.0), "3");
        assert_eq!(format_compact(0.5), "0.50");
        assert_eq!(format_compact(0.042), "0.042");
        assert_eq!(format_compact(f64::NAN), "—");
    }

    #[test]
    fn dates_are_iso() {
        assert_eq!(format_date(time::macros::date!(2024 - 03 - 09)), "2024-03-09");
    }
}
