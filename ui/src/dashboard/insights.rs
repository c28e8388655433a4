use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dioxus::prelude::*;

use super::DashboardContext;
use crate::insights::Insight;

struct Section {
    heading: &'static str,
    insight: Insight,
    lead: &'static str,
    points: &'static [&'static str],
}

static SECTIONS: [Section; 3] = [
    Section {
        heading: "Category Popularity",
        insight: Insight::CategoryDistribution,
        lead: "Insight: Music dominates across all regions, but regional variations exist:",
        points: &[
            "IN: Strong presence of Bollywood music",
            "US: More diverse categories including Comedy",
            "GB: Higher proportion of Sports content",
        ],
    },
    Section {
        heading: "Engagement Metrics",
        insight: Insight::EngagementByRegion,
        lead: "Key Finding: GB has the highest like-to-view ratio, while US leads in comments per view.",
        points: &[],
    },
    Section {
        heading: "Optimal Posting Times",
        insight: Insight::PublishTimeHeatmap,
        lead: "Recommendation: Best posting times (UTC):",
        points: &["IN: 13:00-16:00", "US: 18:00-21:00", "GB: 16:00-19:00"],
    },
];

/// `data:` URL for a PNG on disk, or `None` when it can't be read.
fn png_data_url(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "artifact unavailable");
            None
        }
    }
}

struct SectionView {
    heading: &'static str,
    filename: &'static str,
    alt: &'static str,
    image: Option<String>,
    lead: &'static str,
    points: &'static [&'static str],
}

/// Static artifacts with fixed commentary.
#[component]
pub fn InsightsTab() -> Element {
    let ctx = use_context::<DashboardContext>();
    let sections: Vec<SectionView> = SECTIONS
        .iter()
        .map(|section| SectionView {
            heading: section.heading,
            filename: section.insight.filename(),
            alt: section.insight.title(),
            image: png_data_url(&ctx.config.artifact_path(section.insight.filename())),
            lead: section.lead,
            points: section.points,
        })
        .collect();

    rsx! {
        section { class: "tab-panel insights",
            h2 { "Report Insights" }
            for SectionView { heading, filename, alt, image, lead, points } in sections {
                article { class: "insights__section", key: "{heading}",
                    h3 { "{heading}" }
                    if let Some(src) = image {
                        img { class: "insights__image", src: "{src}", alt: "{alt}" }
                    } else {
                        div { class: "insights__placeholder", "{filename} has not been generated yet." }
                    }
                    p { class: "insights__lead", "{lead}" }
                    if !points.is_empty() {
                        ul { class: "insights__points",
                            for point in points {
                                li { key: "{point}", "{point}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
