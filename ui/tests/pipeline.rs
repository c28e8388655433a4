//! Dataset file → insight artifacts → PDF report, end to end.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use time::macros::date;
use ui::core::filter::DateRangeInput;
use ui::core::{DashboardConfig, DashboardError, Dataset, FilterState, Metric};
use ui::insights::{ChartRenderer, Insight};
use ui::report::ReportBuilder;
use ui::view::render_view;

const HEADER: &str = "video_id,region,category_name,like_ratio,comment_ratio,views,title_sentiment,publish_hour,trending_date,days_trending";

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    let regions = ["US", "GB", "IN"];
    let categories = ["Music", "Comedy", "Sports", "Gaming", "News & Politics"];
    for i in 0..60u32 {
        let region = regions[i as usize % regions.len()];
        let category = categories[(i as usize / 3) % categories.len()];
        let like = 0.01 + f64::from(i % 7) * 0.005;
        let comment = 0.001 + f64::from(i % 5) * 0.0005;
        let views = 10_000 + u64::from(i) * 1_250;
        let sentiment = (f64::from(i % 11) - 5.0) / 10.0;
        let hour = (i * 5) % 24;
        // Mix both date encodings the loader understands.
        let date = if i % 2 == 0 {
            format!("2024-{:02}-{:02}T00:00:00", 1 + i % 3, 1 + i % 27)
        } else {
            format!("24.{:02}.{:02}", 1 + i % 27, 1 + i % 3)
        };
        let days = 1 + i % 6;
        csv.push_str(&format!(
            "v{i},{region},\"{category}\",{like},{comment},{views},{sentiment},{hour},{date},{days}\n"
        ));
    }
    let path = dir.join("combined_regions.csv");
    fs::write(&path, csv).expect("write dataset");
    path
}

fn config(dir: &Path) -> DashboardConfig {
    let mut config = DashboardConfig::default()
        .with_data_path(write_dataset(dir))
        .with_insights_dir(dir.join("insights"));
    config.artifact_dpi = 24;
    config
}

#[test]
fn report_before_artifacts_fails_with_missing_artifact() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = config(tmp.path());

    let err = ReportBuilder::new(&config).build().unwrap_err();
    assert!(err.is_missing_artifact(), "{err}");
    assert!(!config.report_path().exists());
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn artifacts_then_report_embeds_five_images() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = config(tmp.path());
    let dataset = Dataset::load(&config.data_path).expect("load");
    assert_eq!(dataset.len(), 60);
    assert_eq!(dataset.regions(), ["US", "GB", "IN"]);

    let renderer = ChartRenderer::new(&config);
    let first = renderer.render_missing(&dataset.all()).expect("render");
    assert!(first.iter().all(|a| a.written));
    for insight in Insight::ALL {
        let bytes = fs::read(config.artifact_path(insight.filename())).expect("artifact");
        assert_eq!(&bytes[1..4], b"PNG", "{insight:?}");
    }

    let second = renderer.render_missing(&dataset.all()).expect("render again");
    assert!(second.iter().all(|a| !a.written));

    let report = ReportBuilder::new(&config).build().expect("report");
    assert_eq!(report.embedded.len(), 5);
    assert_eq!(count(&report.bytes, b"/Subtype /Image") + count(&report.bytes, b"/Subtype/Image"), 5);
    let path = report.save().expect("save");
    assert!(path.ends_with("youtube_analysis_report.pdf"));
    assert!(fs::read(path).expect("pdf").starts_with(b"%PDF"));
}

#[test]
fn deleting_one_artifact_recovers_only_that_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = config(tmp.path());
    let dataset = Dataset::load(&config.data_path).expect("load");
    ChartRenderer::new(&config)
        .render_missing(&dataset.all())
        .expect("render");

    let heatmap = config.artifact_path(Insight::PublishTimeHeatmap.filename());
    fs::remove_file(&heatmap).expect("remove");
    let err = ReportBuilder::new(&config).build().unwrap_err();
    match err {
        DashboardError::MissingArtifact { name, .. } => assert_eq!(name, "publish_time_heatmap.png"),
        other => panic!("unexpected error: {other}"),
    }

    let report = ReportBuilder::new(&config)
        .build_with_recovery(&dataset.all())
        .expect("recovered");
    assert_eq!(report.embedded.len(), 5);
    assert!(heatmap.is_file());
}

#[test]
fn missing_dataset_is_unreadable() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = Dataset::load(&tmp.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DashboardError::DatasetUnreadable { .. }), "{err}");
}

#[test]
fn loaded_dataset_drives_the_view() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = config(tmp.path());
    let dataset = Dataset::load(&config.data_path).expect("load");
    let mut rng = StdRng::seed_from_u64(11);

    let all = render_view(&dataset, &FilterState::everything(&dataset), Metric::Views, &mut rng);
    assert_eq!(all.row_count, dataset.len());
    assert_eq!(all.category_counts.total() as usize, dataset.len());

    let day = date!(2024 - 01 - 01);
    let filters = FilterState {
        regions: dataset.regions().to_vec(),
        dates: DateRangeInput::between(day, day),
    };
    let view = render_view(&dataset, &filters, Metric::Views, &mut rng);
    let expected = dataset.rows().iter().filter(|r| r.trending_date == day).count();
    assert!(expected > 0);
    assert_eq!(view.row_count, expected);

    let half_open = FilterState {
        regions: dataset.regions().to_vec(),
        dates: DateRangeInput::single(day),
    };
    let view = render_view(&dataset, &half_open, Metric::Views, &mut rng);
    assert_eq!(view.row_count, dataset.len());
}
