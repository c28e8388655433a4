use dioxus::prelude::*;

use super::ChartFrame;
use crate::core::filter::Metric;
use crate::view::ViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    GenrePopularity,
    SentimentAnalysis,
    RegionalComparison,
    ReportInsights,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::GenrePopularity,
        Tab::SentimentAnalysis,
        Tab::RegionalComparison,
        Tab::ReportInsights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::GenrePopularity => "Genre Popularity",
            Tab::SentimentAnalysis => "Sentiment Analysis",
            Tab::RegionalComparison => "Regional Comparison",
            Tab::ReportInsights => "Report Insights",
        }
    }
}

#[component]
pub fn TabBar(active: Signal<Tab>) -> Element {
    let mut active = active;
    rsx! {
        nav { class: "tabs", role: "tablist",
            for (tab, label) in Tab::ALL.map(|t| (t, t.label())) {
                button {
                    key: "{label}",
                    r#type: "button",
                    role: "tab",
                    class: if active() == tab { "tabs__tab tabs__tab--active" } else { "tabs__tab" },
                    onclick: move |_| active.set(tab),
                    "{label}"
                }
            }
        }
    }
}

#[component]
pub fn GenreTab(view: ViewModel) -> Element {
    let trends = view.trend_charts();
    rsx! {
        section { class: "tab-panel",
            h2 { "Most Popular Genres" }
            ChartFrame { svg: view.genre_chart() }

            h3 { "Genre Trends Over Time" }
            if trends.is_empty() {
                p { class: "tab-panel__placeholder", "No data for the current filters." }
            }
            div { class: "facets",
                for (region, svg) in trends {
                    ChartFrame { key: "{region}", svg }
                }
            }
        }
    }
}

#[component]
pub fn SentimentTab(view: ViewModel) -> Element {
    rsx! {
        section { class: "tab-panel",
            h2 { "Sentiment Analysis" }
            div { class: "chart-row",
                ChartFrame { svg: view.sentiment_chart() }
                ChartFrame { svg: view.engagement_chart() }
            }
            h3 { "Sentiment by Video Category" }
            ChartFrame { svg: view.sentiment_category_chart() }
        }
    }
}

#[component]
pub fn RegionalTab(view: ViewModel, metric: Signal<Metric>) -> Element {
    let mut metric = metric;
    rsx! {
        section { class: "tab-panel",
            h2 { "Region-wise Comparison" }
            fieldset { class: "metric-picker",
                legend { "Select Metric" }
                for (option, name) in Metric::ALL.map(|m| (m, m.label())) {
                    label { class: "metric-picker__option", key: "{name}",
                        input {
                            r#type: "radio",
                            name: "metric",
                            checked: metric() == option,
                            onchange: move |_| metric.set(option),
                        }
                        span { "{name}" }
                    }
                }
            }
            ChartFrame { svg: view.metric_chart() }

            h3 { "Optimal Publishing Times" }
            ChartFrame { svg: view.hourly_chart() }
        }
    }
}
