//! Export-facing side of the core: the fixed target canvas sizing, the
//! scale-and-center fit shared with any external raster/PDF sink, and a PNG
//! sink fed from an eframe screenshot.

use std::path::Path;

use egui::{ColorImage, Pos2, Rect, Vec2};
use thiserror::Error;

use crate::geometry::BoundingBox;
use crate::pages::AspectRatio;
use crate::renderer::CanvasTransform;

/// Width of the fixed export canvas; high resolution for good quality.
pub const EXPORT_BASE_WIDTH: u32 = 1920;
/// Padding kept clear around the fitted drawing.
pub const EXPORT_PADDING: f32 = 40.0;

/// Pixel size of the export canvas for a page aspect ratio.
pub fn export_size(aspect_ratio: AspectRatio) -> (u32, u32) {
    let height = EXPORT_BASE_WIDTH as f32 * aspect_ratio.height_factor();
    (EXPORT_BASE_WIDTH, height as u32)
}

/// Scale the drawing bounds into `(width, height)` with padding on every
/// side, centered; uniform scale (the smaller axis fit wins).
///
/// `None` when the bounds have no positive extent, in which case the sink
/// renders only the background.
pub fn fit_transform(
    bounds: &BoundingBox,
    width: f32,
    height: f32,
    padding: f32,
) -> Option<CanvasTransform> {
    let bounds_width = bounds.width();
    let bounds_height = bounds.height();
    if bounds_width <= 0.0 || bounds_height <= 0.0 {
        return None;
    }
    let scale_x = (width - padding * 2.0) / bounds_width;
    let scale_y = (height - padding * 2.0) / bounds_height;
    let scale = scale_x.min(scale_y);

    let offset = Vec2::new(
        (width - bounds_width * scale) / 2.0 - bounds.min_x * scale,
        (height - bounds_height * scale) / 2.0 - bounds.min_y * scale,
    );
    Some(CanvasTransform {
        origin: Pos2::ZERO,
        pan: offset,
        zoom: scale,
    })
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("screenshot did not cover the canvas")]
    EmptyRegion,
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Crop the canvas region out of a full-window screenshot and write it as a
/// PNG file.
pub fn save_canvas_png(
    screenshot: &ColorImage,
    canvas_rect: Rect,
    pixels_per_point: f32,
    path: &Path,
) -> Result<(), ExportError> {
    let region = screenshot.region(&canvas_rect, Some(pixels_per_point));
    let [width, height] = region.size;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyRegion);
    }
    let pixels: Vec<u8> = region
        .pixels
        .iter()
        .flat_map(|color| color.to_array())
        .collect();
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, pixels)
        .ok_or(ExportError::EmptyRegion)?;
    buffer.save(path)?;
    log::info!("exported canvas to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_sizes_follow_aspect_ratio() {
        assert_eq!(export_size(AspectRatio::SixteenNine), (1920, 1080));
        assert_eq!(export_size(AspectRatio::FourThree), (1920, 1440));
    }

    #[test]
    fn fit_centers_and_uses_uniform_scale() {
        let bounds = BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        };
        let fit = fit_transform(&bounds, 1920.0, 1080.0, 40.0).unwrap();
        // Height is the limiting axis: (1080 - 80) / 100.
        assert!((fit.zoom - 10.0).abs() < 1e-3);
        // Centered horizontally, padded vertically.
        let center = fit.to_screen(Pos2::new(50.0, 50.0));
        assert!((center.x - 960.0).abs() < 1e-2);
        assert!((center.y - 540.0).abs() < 1e-2);
    }

    #[test]
    fn degenerate_bounds_produce_no_fit() {
        let bounds = BoundingBox {
            min_x: 5.0,
            min_y: 5.0,
            max_x: 5.0,
            max_y: 9.0,
        };
        assert!(fit_transform(&bounds, 1920.0, 1080.0, 40.0).is_none());
    }
}
