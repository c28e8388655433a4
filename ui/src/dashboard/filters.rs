use dioxus::prelude::*;
use time::macros::format_description;
use time::Date;

use crate::core::filter::FilterState;
use crate::core::format::format_date;

#[component]
pub fn RegionFilter(regions: Vec<String>, filters: Signal<FilterState>) -> Element {
    let mut filters = filters;
    rsx! {
        fieldset { class: "sidebar__group region-filter",
            legend { "Select Regions" }
            for region in regions {
                label { class: "region-filter__option", key: "{region}",
                    input {
                        r#type: "checkbox",
                        checked: filters.read().is_region_selected(&region),
                        onchange: {
                            let region = region.clone();
                            move |_| filters.write().toggle_region(&region)
                        },
                    }
                    span { "{region}" }
                }
            }
        }
    }
}

fn parse_input_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Two date inputs bounded by the dataset span. Clearing one end leaves a
/// half-open range, which does not filter.
#[component]
pub fn DateRangeFilter(bounds: Option<(Date, Date)>, filters: Signal<FilterState>) -> Element {
    let mut filters = filters;
    let (min, max) = bounds
        .map(|(lo, hi)| (format_date(lo), format_date(hi)))
        .unwrap_or_default();
    let dates = filters.read().dates;
    let start = dates.start.map(format_date).unwrap_or_default();
    let end = dates.end.map(format_date).unwrap_or_default();

    rsx! {
        fieldset { class: "sidebar__group date-filter",
            legend { "Date Range" }
            label { class: "date-filter__field",
                span { "From" }
                input {
                    r#type: "date",
                    min: "{min}",
                    max: "{max}",
                    value: "{start}",
                    onchange: move |evt: FormEvent| {
                        filters.write().dates.start = parse_input_date(&evt.value());
                    },
                }
            }
            label { class: "date-filter__field",
                span { "To" }
                input {
                    r#type: "date",
                    min: "{min}",
                    max: "{max}",
                    value: "{end}",
                    onchange: move |evt: FormEvent| {
                        filters.write().dates.end = parse_input_date(&evt.value());
                    },
                }
            }
            if dates.resolved().is_none() {
                p { class: "sidebar__hint", "Pick both dates to filter by trending date." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn input_dates_parse_iso_only() {
        assert_eq!(parse_input_date("2024-03-09"), Some(date!(2024 - 03 - 09)));
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("09/03/2024"), None);
    }
}
