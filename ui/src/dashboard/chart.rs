use dioxus::prelude::*;

use crate::charts::Svg;

/// Inline SVG chart. Hover titles inside the markup act as tooltips.
#[component]
pub fn ChartFrame(svg: Svg) -> Element {
    rsx! {
        figure { class: "chart",
            div { class: "chart__canvas", dangerous_inner_html: svg.markup }
        }
    }
}
