use dioxus::prelude::*;

use super::DashboardContext;
use crate::core::config::REPORT_FILENAME;
use crate::report::ReportBuilder;

#[derive(Clone, Debug, PartialEq)]
enum ReportStatus {
    Idle,
    Working,
    Ready { href: String, images: usize, bytes: usize },
    Error(String),
}

/// Generates the PDF on demand and offers it as an inline download.
#[component]
pub fn ReportPanel() -> Element {
    let ctx = use_context::<DashboardContext>();
    let mut status = use_signal(|| ReportStatus::Idle);

    let generate = move |_| {
        if status() == ReportStatus::Working {
            return;
        }
        status.set(ReportStatus::Working);
        let rows = ctx.dataset.all();
        let outcome = ReportBuilder::new(&ctx.config)
            .build_with_recovery(&rows)
            .and_then(|report| {
                report.save()?;
                Ok(report)
            });
        match outcome {
            Ok(report) => status.set(ReportStatus::Ready {
                href: report.data_url(),
                images: report.embedded.len(),
                bytes: report.bytes.len(),
            }),
            Err(err) => {
                tracing::error!(error = %err, "report generation failed");
                status.set(ReportStatus::Error(err.to_string()));
            }
        }
    };

    rsx! {
        section { class: "sidebar__group report-panel",
            h2 { "Report" }
            button {
                r#type: "button",
                class: "button button--primary",
                disabled: status() == ReportStatus::Working,
                onclick: generate,
                "Generate PDF Report"
            }
            {match status() {
                ReportStatus::Idle => rsx! {},
                ReportStatus::Working => rsx! {
                    p { class: "report-panel__status", "Generating report…" }
                },
                ReportStatus::Ready { href, images, bytes } => {
                    let kib = bytes.div_ceil(1024);
                    rsx! {
                        p { class: "report-panel__status report-panel__status--success",
                            "{images} charts, {kib} KiB"
                        }
                        a {
                            class: "button button--ghost report-panel__download",
                            href: "{href}",
                            download: REPORT_FILENAME,
                            "Download Report"
                        }
                    }
                }
                ReportStatus::Error(message) => rsx! {
                    p { class: "report-panel__status report-panel__status--error", "⚠️ {message}" }
                },
            }}
        }
    }
}
