#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use ui::core::{DashboardConfig, Dataset};
use ui::insights::ChartRenderer;
use ui::views::Dashboard;
use ui::DashboardContext;

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load the dataset and make sure every insight artifact exists. A missing
/// or unreadable dataset is fatal; artifact failures are only logged.
fn prepare(config: DashboardConfig) -> DashboardContext {
    let dataset = match Dataset::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(err) => {
            tracing::error!(error = %err, "dataset load failed");
            eprintln!("trendscope: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = ChartRenderer::new(&config).render_missing(&dataset.all()) {
        tracing::error!(error = %err, "couldn't render insight artifacts");
    }

    DashboardContext::new(dataset, config)
}

#[cfg(feature = "desktop")]
fn main() {
    init_tracing();
    let context = prepare(DashboardConfig::default());

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Trendscope – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .with_context(context)
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn main() {
    init_tracing();
    let context = prepare(DashboardConfig::default());
    tracing::info!(
        rows = context.dataset.len(),
        "artifacts prepared; rebuild with the `desktop` feature for the window"
    );
}

#[component]
fn App() -> Element {
    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }
        Dashboard {}
    }
}
