use std::fs;
use std::path::PathBuf;

use super::{Insight, Rasterizer};
use crate::charts::Svg;
use crate::core::config::DashboardConfig;
use crate::core::dataset::VideoRecord;
use crate::core::error::{DashboardError, Result};

/// A PNG under the insights directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub insight: Insight,
    pub path: PathBuf,
    /// False when the file already existed and nothing was done.
    pub written: bool,
}

/// Writes insight artifacts once. An existing file is never regenerated.
pub struct ChartRenderer {
    dir: PathBuf,
    top_categories: usize,
    raster: Rasterizer,
}

impl ChartRenderer {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dir: config.insights_dir.clone(),
            top_categories: config.top_categories,
            raster: Rasterizer::new(config.artifact_dpi),
        }
    }

    pub fn artifact_path(&self, insight: Insight) -> PathBuf {
        self.dir.join(insight.filename())
    }

    pub fn exists(&self, insight: Insight) -> bool {
        self.artifact_path(insight).is_file()
    }

    /// Rasterize and write `chart` unless the artifact file is already present.
    pub fn render(&self, insight: Insight, chart: &Svg) -> Result<Artifact> {
        let path = self.artifact_path(insight);
        if path.is_file() {
            tracing::debug!(file = insight.filename(), "artifact present, skipping");
            return Ok(Artifact {
                insight,
                path,
                written: false,
            });
        }
        fs::create_dir_all(&self.dir).map_err(|err| DashboardError::io(&self.dir, err))?;
        let png = self.raster.to_png(chart)?;
        fs::write(&path, &png).map_err(|err| DashboardError::io(&path, err))?;
        tracing::info!(
            file = insight.filename(),
            bytes = png.len(),
            dpi = self.raster.dpi(),
            "artifact written"
        );
        Ok(Artifact {
            insight,
            path,
            written: true,
        })
    }

    /// Render every insight whose artifact is absent. Chart data is only
    /// prepared for those. Stops at the first failure.
    pub fn render_missing(&self, rows: &[&VideoRecord]) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::with_capacity(Insight::ALL.len());
        for insight in Insight::ALL {
            if self.exists(insight) {
                artifacts.push(Artifact {
                    insight,
                    path: self.artifact_path(insight),
                    written: false,
                });
                continue;
            }
            let chart = insight.chart(rows, self.top_categories);
            artifacts.push(self.render(insight, &chart)?);
        }
        let written = artifacts.iter().filter(|a| a.written).count();
        tracing::info!(written, dir = %self.dir.display(), "insight artifacts ready");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::dataset::fixtures::two_regions;

    fn renderer(dir: &Path) -> ChartRenderer {
        let mut config = DashboardConfig::default().with_insights_dir(dir);
        config.artifact_dpi = 20;
        ChartRenderer::new(&config)
    }

    #[test]
    fn creates_directory_and_writes_png() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let nested = tmp.path().join("out").join("insights");
        let renderer = renderer(&nested);
        let rows = two_regions();
        let chart = Insight::EngagementByRegion.chart(&rows.all(), 10);

        let artifact = renderer.render(Insight::EngagementByRegion, &chart).expect("render");
        assert!(artifact.written);
        let bytes = fs::read(&artifact.path).expect("read back");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn second_render_is_a_no_op() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let renderer = renderer(tmp.path());
        let rows = two_regions();
        let chart = Insight::TrendingDuration.chart(&rows.all(), 10);

        let first = renderer.render(Insight::TrendingDuration, &chart).expect("first");
        let before = fs::metadata(&first.path).and_then(|m| m.modified()).expect("mtime");

        let second = renderer.render(Insight::TrendingDuration, &chart).expect("second");
        let after = fs::metadata(&second.path).and_then(|m| m.modified()).expect("mtime");
        assert!(!second.written);
        assert_eq!(before, after);
    }

    #[test]
    fn existing_file_is_trusted_without_inspection() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let renderer = renderer(tmp.path());
        let path = renderer.artifact_path(Insight::SentimentByRegion);
        fs::write(&path, b"not a png").expect("seed");

        let chart = Svg {
            markup: "<svg".into(),
            width: 1.0,
            height: 1.0,
        };
        let artifact = renderer.render(Insight::SentimentByRegion, &chart).expect("skip");
        assert!(!artifact.written);
        assert_eq!(fs::read(&path).expect("read"), b"not a png");
    }

    #[test]
    fn render_missing_fills_only_gaps() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let renderer = renderer(tmp.path());
        fs::write(renderer.artifact_path(Insight::PublishTimeHeatmap), b"kept").expect("seed");

        let rows = two_regions();
        let artifacts = renderer.render_missing(&rows.all()).expect("render");
        assert_eq!(artifacts.len(), 5);
        assert_eq!(artifacts.iter().filter(|a| a.written).count(), 4);
        assert!(Insight::ALL.iter().all(|i| renderer.exists(*i)));

        let again = renderer.render_missing(&rows.all()).expect("again");
        assert!(again.iter().all(|a| !a.written));
    }
}
