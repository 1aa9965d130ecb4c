//! Pixel resampling of a bitmap through an affine transform.

use image::{imageops, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::geometry::{Affine, ImageSize, Point};

/// Largest edge, in pixels, a rendered region may have.
pub const MAX_RASTER_DIMENSION: u32 = 16_384;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Renders the `size` pixels of screen space starting at `origin`, with
/// `source` drawn through `transform`. Uncovered pixels stay transparent.
pub fn render_region(
    source: &RgbaImage,
    transform: Affine,
    origin: Point,
    size: ImageSize,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(size.width, size.height);
    if source.width() == 0 || source.height() == 0 || size.is_empty() {
        return canvas;
    }
    let Some(projection) = pixel_projection(transform, origin) else {
        return canvas;
    };
    warp_into(
        &with_transparent_border(source),
        &projection,
        Interpolation::Bilinear,
        TRANSPARENT,
        &mut canvas,
    );
    canvas
}

/// Draws `source` through `transform` onto a transparent canvas of `view` size.
pub fn compose_view(
    source: &RgbaImage,
    transform: Affine,
    view: ImageSize,
    opacity: f32,
) -> RgbaImage {
    let mut canvas = render_region(source, transform, Point::ZERO, view);
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in canvas.pixels_mut() {
            pixel.0[3] = (f32::from(pixel.0[3]) * opacity).round() as u8;
        }
    }
    canvas
}

/// One transparent pixel around the bitmap, so edge pixels interpolate
/// against transparency instead of falling off the sampling grid.
fn with_transparent_border(source: &RgbaImage) -> RgbaImage {
    let mut padded = RgbaImage::new(source.width() + 2, source.height() + 2);
    imageops::replace(&mut padded, source, 1, 1);
    padded
}

/// Maps padded-source pixel centers to canvas pixel centers.
///
/// imageproc puts pixel `i` at coordinate `i`; `transform` treats pixel `i`
/// as covering `[i, i + 1)`.
fn pixel_projection(transform: Affine, origin: Point) -> Option<Projection> {
    let to_canvas = Affine::translate((-origin.x - 0.5, -origin.y - 0.5));
    let from_padded = Affine::translate((-0.5, -0.5));
    let matrix = to_canvas * transform * from_padded;
    let [a, b, c, d, e, f] = matrix.as_coeffs();
    let determinant = matrix.determinant();
    if determinant == 0.0 || !determinant.is_finite() || !e.is_finite() || !f.is_finite() {
        return None;
    }
    Projection::from_matrix([
        a as f32, c as f32, e as f32, b as f32, d as f32, f as f32, 0.0, 0.0, 1.0,
    ])
}
