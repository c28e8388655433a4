use dioxus::prelude::*;

use crate::core::filter::{FilterState, Metric};
use crate::core::format::format_count;
use crate::dashboard::{
    DashboardContext, DateRangeFilter, GenreTab, InsightsTab, RegionFilter, RegionalTab, ReportPanel, SentimentTab,
    Tab, TabBar,
};
use crate::view::render_view_sampled;

#[component]
pub fn Dashboard() -> Element {
    let ctx = use_context::<DashboardContext>();
    let filters = use_signal({
        let dataset = ctx.dataset.clone();
        move || FilterState::everything(&dataset)
    });
    let metric = use_signal(Metric::default);
    let active = use_signal(Tab::default);

    // Recomputed on every render, never cached.
    let view = render_view_sampled(
        &ctx.dataset,
        &filters.read(),
        metric(),
        ctx.config.sample_size,
        &mut rand::thread_rng(),
    );
    let badge = format!("{} videos", format_count(view.row_count));

    rsx! {
        div { class: "page dashboard",
            aside { class: "sidebar",
                ReportPanel {}
                h2 { "Filters" }
                RegionFilter { regions: ctx.dataset.regions().to_vec(), filters }
                DateRangeFilter { bounds: ctx.dataset.date_bounds(), filters }
            }

            main { class: "dashboard__main",
                header { class: "dashboard__header",
                    h1 { "YouTube Trending Videos Analysis Dashboard" }
                    span { class: "badge", "{badge}" }
                }
                TabBar { active }
                {match active() {
                    Tab::GenrePopularity => rsx! { GenreTab { view } },
                    Tab::SentimentAnalysis => rsx! { SentimentTab { view } },
                    Tab::RegionalComparison => rsx! { RegionalTab { view, metric } },
                    Tab::ReportInsights => rsx! { InsightsTab {} },
                }}
            }
        }
    }
}
