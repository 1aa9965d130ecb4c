//! Shared geometric primitives used by the gesture, overlay and raster modules.

pub use kurbo::{Affine, Line, Point, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The bitmap's own rectangle in source space.
    pub fn bitmap_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Bounding box of the bitmap rectangle mapped through `transform`.
pub fn image_rect(transform: Affine, size: ImageSize) -> Rect {
    transform.transform_rect_bbox(size.bitmap_rect())
}

pub fn post_translate(transform: Affine, delta: Vec2) -> Affine {
    Affine::translate(delta) * transform
}

pub fn post_scale_about(transform: Affine, scale_x: f64, scale_y: f64, pivot: Point) -> Affine {
    about(pivot, Affine::scale_non_uniform(scale_x, scale_y)) * transform
}

pub fn post_skew_about(transform: Affine, skew_x: f64, skew_y: f64, pivot: Point) -> Affine {
    about(pivot, Affine::skew(skew_x, skew_y)) * transform
}

fn about(pivot: Point, operation: Affine) -> Affine {
    let offset = pivot.to_vec2();
    Affine::translate(offset) * operation * Affine::translate(-offset)
}

/// Coerces `point` into `rect` without panicking on inverted bounds or NaN.
pub fn clamp_point(point: Point, rect: Rect) -> Point {
    Point::new(
        point.x.max(rect.x0).min(rect.x1),
        point.y.max(rect.y0).min(rect.y1),
    )
}

#[cfg(test)]
pub(crate) fn assert_affine_close(actual: Affine, expected: Affine) {
    for (index, (a, e)) in actual
        .as_coeffs()
        .iter()
        .zip(expected.as_coeffs().iter())
        .enumerate()
    {
        assert!(
            (a - e).abs() < 1e-9,
            "coefficient {index} differs: {actual:?} vs {expected:?}"
        );
    }
}
