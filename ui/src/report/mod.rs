//! PDF report assembled from the insight artifacts.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::core::config::DashboardConfig;
use crate::core::dataset::VideoRecord;
use crate::core::error::{DashboardError, Result};
use crate::insights::{ChartRenderer, Insight};

pub const REPORT_TITLE: &str = "YouTube Trending Videos Analysis Report";

/// Report sections in print order.
pub const REPORT_ENTRIES: [(Insight, &str); 5] = [
    (Insight::CategoryDistribution, "Top 10 Categories by Region"),
    (Insight::SentimentByRegion, "Title Sentiment Distribution"),
    (Insight::EngagementByRegion, "Engagement Metrics Comparison"),
    (Insight::PublishTimeHeatmap, "Optimal Publishing Times"),
    (Insight::TrendingDuration, "Trending Duration Patterns"),
];

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 10.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
const LINE_HEIGHT: f64 = 10.0;
const TITLE_SIZE: f64 = 16.0;
const CAPTION_SIZE: f64 = 12.0;
const POINTS_TO_MM: f64 = 25.4 / 72.0;

/// A rendered PDF and the insights embedded in it.
#[derive(Debug, Clone)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub embedded: Vec<Insight>,
    path: PathBuf,
}

impl Report {
    /// Inline download payload.
    pub fn data_url(&self) -> String {
        format!("data:application/pdf;base64,{}", STANDARD.encode(&self.bytes))
    }

    /// Write the document to its fixed location, replacing any earlier one.
    pub fn save(&self) -> Result<&Path> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| DashboardError::io(parent, err))?;
        }
        fs::write(&self.path, &self.bytes).map_err(|err| DashboardError::io(&self.path, err))?;
        tracing::info!(path = %self.path.display(), bytes = self.bytes.len(), "report saved");
        Ok(&self.path)
    }
}

pub struct ReportBuilder {
    config: DashboardConfig,
}

impl ReportBuilder {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Fails with `MissingArtifact` for the first absent file; nothing is
    /// emitted unless every artifact is present.
    pub fn build(&self) -> Result<Report> {
        let mut images = Vec::with_capacity(REPORT_ENTRIES.len());
        for (insight, caption) in REPORT_ENTRIES {
            let path = self.config.artifact_path(insight.filename());
            if !path.is_file() {
                return Err(DashboardError::MissingArtifact {
                    name: insight.filename(),
                    path,
                });
            }
            let bytes = fs::read(&path).map_err(|err| DashboardError::io(&path, err))?;
            images.push((insight, caption, bytes));
        }

        let bytes = compose(&images)?;
        tracing::info!(bytes = bytes.len(), images = images.len(), "report built");
        Ok(Report {
            bytes,
            embedded: images.into_iter().map(|(insight, _, _)| insight).collect(),
            path: self.config.report_path(),
        })
    }

    /// Build, and if artifacts are missing render them once and try again.
    pub fn build_with_recovery(&self, rows: &[&VideoRecord]) -> Result<Report> {
        match self.build() {
            Err(err) if err.is_missing_artifact() => {
                tracing::warn!(error = %err, "artifacts missing, rendering before retry");
                ChartRenderer::new(&self.config).render_missing(rows)?;
                self.build()
            }
            other => other,
        }
    }
}

fn report_error(err: impl std::fmt::Display) -> DashboardError {
    DashboardError::Report(err.to_string())
}

struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    /// Distance from the top edge of the current page.
    y: f64,
    pages: usize,
}

impl PageCursor {
    fn ensure_room(&mut self, height: f64) {
        if self.y + height > PAGE_HEIGHT - MARGIN && self.y > MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = MARGIN;
            self.pages += 1;
        }
    }

    fn text(&mut self, text: &str, size: f64, x: f64, font: &IndirectFontRef) {
        let baseline = self.y + LINE_HEIGHT * 0.7;
        self.layer.use_text(
            text,
            size as f32,
            Mm(x as f32),
            Mm((PAGE_HEIGHT - baseline) as f32),
            font,
        );
        self.y += LINE_HEIGHT;
    }
}

/// Rough Helvetica advance; enough to center a single line.
fn text_width_mm(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.5 * POINTS_TO_MM
}

fn compose(images: &[(Insight, &str, Vec<u8>)]) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "content",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(report_error)?;
    let layer = doc.get_page(page).get_layer(layer);
    let mut cursor = PageCursor {
        doc,
        layer,
        y: MARGIN,
        pages: 1,
    };

    let title_x = ((PAGE_WIDTH - text_width_mm(REPORT_TITLE, TITLE_SIZE)) / 2.0).max(MARGIN);
    cursor.text(REPORT_TITLE, TITLE_SIZE, title_x, &font);
    cursor.y += LINE_HEIGHT;

    for (insight, caption, bytes) in images {
        let decoder = PngDecoder::new(Cursor::new(bytes.as_slice()))
            .map_err(|err| report_error(format!("{}: {err}", insight.filename())))?;
        let image = Image::try_from(decoder)
            .map_err(|err| report_error(format!("{}: {err}", insight.filename())))?;
        let px_width = image.image.width.0 as f64;
        let px_height = image.image.height.0 as f64;
        if px_width <= 0.0 || px_height <= 0.0 {
            return Err(report_error(format!("{} has no pixels", insight.filename())));
        }
        let height = CONTENT_WIDTH * px_height / px_width;
        // Density that makes the image exactly the content width.
        let dpi = px_width * 25.4 / CONTENT_WIDTH;

        cursor.ensure_room(LINE_HEIGHT + height);
        cursor.text(caption, CAPTION_SIZE, MARGIN, &font);
        image.add_to_layer(
            cursor.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN as f32)),
                translate_y: Some(Mm((PAGE_HEIGHT - cursor.y - height) as f32)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
        cursor.y += height + 5.0;
    }

    tracing::debug!(pages = cursor.pages, "report laid out");
    cursor.doc.save_to_bytes().map_err(report_error)
}
