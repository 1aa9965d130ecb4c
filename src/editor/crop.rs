use image::RgbaImage;
use thiserror::Error;

use crate::geometry::{clamp_point, image_rect, Affine, ImageSize, Point, Rect};
use crate::raster::{render_region, MAX_RASTER_DIMENSION};

use super::gesture::CropBounds;
use super::resize::ResizeLimits;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CropError {
    #[error("no source image is loaded")]
    NoSourceImage,
    #[error("crop is only available while the crop frame is shown")]
    CropInactive,
    #[error("crop region {width}x{height} is below the minimum size")]
    InvalidCrop { width: f64, height: f64 },
    #[error("crop region {width}x{height} exceeds the largest renderable size")]
    RegionTooLarge { width: f64, height: f64 },
}

/// Pixels cut out of the transformed bitmap, with the screen position they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    pub image: RgbaImage,
    pub origin: Point,
}

impl CroppedImage {
    pub fn size(&self) -> ImageSize {
        let (width, height) = self.image.dimensions();
        ImageSize::new(width, height)
    }
}

/// Cuts the screen region `bounds` out of `source` as displayed through `display`.
///
/// The region is clamped to the on-screen image rect first. Regions narrower
/// or shorter than the configured minimum are rejected. Only the region itself
/// is rasterized, so the size of the displayed image does not matter.
pub fn crop_image(
    source: Option<&RgbaImage>,
    display: Affine,
    bounds: CropBounds,
    limits: ResizeLimits,
) -> Result<CroppedImage, CropError> {
    let source = source
        .filter(|image| image.width() > 0 && image.height() > 0)
        .ok_or(CropError::NoSourceImage)?;
    let rect = image_rect(display, ImageSize::new(source.width(), source.height()));

    let start = clamp_point(bounds.start, rect);
    let end = clamp_point(bounds.end, rect);
    let region = Rect::new(start.x, start.y, end.x, end.y);
    let invalid = CropError::InvalidCrop {
        width: region.width(),
        height: region.height(),
    };
    if !(region.width() >= limits.min_width && region.height() >= limits.min_height) {
        return Err(invalid);
    }

    // Pixel grid of the whole displayed image, rounded to whole pixels.
    let grid_width = rect.width().round();
    let grid_height = rect.height().round();
    let left = scaled_offset(region.x0 - rect.x0, rect.width(), grid_width);
    let top = scaled_offset(region.y0 - rect.y0, rect.height(), grid_height);
    let width =
        scaled_offset(region.width(), rect.width(), grid_width).min(grid_width - left);
    let height =
        scaled_offset(region.height(), rect.height(), grid_height).min(grid_height - top);
    if !(width >= 1.0 && height >= 1.0) {
        return Err(invalid);
    }
    let max = f64::from(MAX_RASTER_DIMENSION);
    if width > max || height > max {
        return Err(CropError::RegionTooLarge { width, height });
    }

    let image = render_region(
        source,
        display,
        Point::new(rect.x0 + left, rect.y0 + top),
        ImageSize::new(width as u32, height as u32),
    );
    Ok(CroppedImage {
        image,
        origin: start,
    })
}

/// Maps a screen-space span onto whole grid pixels, truncating toward zero.
fn scaled_offset(span: f64, extent: f64, pixels: f64) -> f64 {
    if !(extent > 0.0) {
        return 0.0;
    }
    (span / extent * pixels).trunc().max(0.0)
}
