//! SVG → PNG at print resolution.

use once_cell::unsync::OnceCell;
use tiny_skia::{Color, Pixmap, Transform};

use super::UNITS_PER_INCH;
use crate::charts::Svg;
use crate::core::error::{DashboardError, Result};

const INCHES_PER_METER: f64 = 39.370_078_740_157_48;

/// Rasterizes chart markup onto an opaque white background. System fonts are
/// loaded on first use and reused for every later chart.
pub struct Rasterizer {
    dpi: u32,
    options: OnceCell<usvg::Options<'static>>,
}

impl Rasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi: dpi.max(1),
            options: OnceCell::new(),
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn options(&self) -> &usvg::Options<'static> {
        self.options.get_or_init(|| {
            let mut options = usvg::Options::default();
            options.fontdb_mut().load_system_fonts();
            tracing::debug!(faces = options.fontdb.len(), "font database loaded");
            options
        })
    }

    /// Render `svg` and encode it as an 8-bit RGB PNG with its pixel density recorded.
    pub fn to_png(&self, svg: &Svg) -> Result<Vec<u8>> {
        let tree = usvg::Tree::from_str(svg.as_str(), self.options())
            .map_err(|err| DashboardError::Render(format!("parse: {err}")))?;

        let scale = self.dpi as f32 / UNITS_PER_INCH as f32;
        let size = tree.size();
        let width = (size.width() * scale).round().max(1.0) as u32;
        let height = (size.height() * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| DashboardError::Render(format!("invalid pixmap size {width}x{height}")))?;
        pixmap.fill(Color::WHITE);
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        // The background is opaque, so dropping alpha loses nothing.
        let rgb: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let pixels_per_meter = (f64::from(self.dpi) * INCHES_PER_METER).round() as u32;
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: pixels_per_meter,
                yppu: pixels_per_meter,
                unit: png::Unit::Meter,
            }));
            encoder
                .write_header()
                .map_err(|err| DashboardError::Render(err.to_string()))?
                .write_image_data(&rgb)
                .map_err(|err| DashboardError::Render(err.to_string()))?;
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Svg;

    fn square() -> Svg {
        Svg {
            markup: r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50" viewBox="0 0 100 50"><rect x="0" y="0" width="50" height="50" fill="#ff0000"/></svg>"##.into(),
            width: 100.0,
            height: 50.0,
        }
    }

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>, Option<png::PixelDimensions>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().expect("png header");
        let dims = reader.info().pixel_dims;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("png frame");
        (info, buf, dims)
    }

    #[test]
    fn scales_by_dpi_and_records_density() {
        let png = Rasterizer::new(200).to_png(&square()).expect("render");
        let (info, pixels, dims) = decode(&png);
        assert_eq!((info.width, info.height), (200, 100));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(dims.map(|d| d.xppu), Some(7874));
        // Left half red, right half white background.
        assert_eq!(&pixels[..3], &[255, 0, 0]);
        let last = pixels.len() - 3;
        assert_eq!(&pixels[last..], &[255, 255, 255]);
    }

    #[test]
    fn malformed_markup_is_a_render_error() {
        let bad = Svg {
            markup: "<svg".into(),
            width: 1.0,
            height: 1.0,
        };
        let err = Rasterizer::new(72).to_png(&bad).unwrap_err();
        assert!(matches!(err, DashboardError::Render(_)));
    }
}
