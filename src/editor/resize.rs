use crate::geometry::{post_scale_about, Affine, Point, Rect};

use super::handles::{locate, Handle};

pub const DEFAULT_MIN_WIDTH: f64 = 10.0;
pub const DEFAULT_MIN_HEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub handle_size: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            handle_size: super::handles::DEFAULT_HANDLE_SIZE,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

/// Target dimensions and fixed pivot for a drag on `handle`.
fn plan_for_handle(
    handle: Handle,
    rect: Rect,
    dx: f64,
    dy: f64,
    point: Point,
) -> (f64, f64, Point) {
    let width = rect.width();
    let height = rect.height();
    let center_x = (rect.x0 + rect.x1) / 2.0;
    let center_y = (rect.y0 + rect.y1) / 2.0;
    match handle {
        Handle::TopLeft => (width - dx, height - dy, Point::new(rect.x1, rect.y1)),
        Handle::TopRight => (width + dx, height - dy, Point::new(rect.x0, rect.y1)),
        Handle::BottomLeft => (width - dx, height + dy, Point::new(rect.x1, rect.y0)),
        Handle::BottomRight => (width + dx, height + dy, Point::new(rect.x0, rect.y0)),
        Handle::Top => (width, height - dy, Point::new(center_x, rect.y1)),
        Handle::Bottom => (width, height + dy, Point::new(center_x, rect.y0)),
        Handle::Left => (width - dx, height, Point::new(rect.x1, center_y)),
        Handle::Right => (width + dx, height, Point::new(rect.x0, center_y)),
        // Degenerate branch: unit scale about the touch point.
        Handle::None => (width, height, point),
    }
}

/// One move step of a handle drag against `rect`, the on-screen bounds of `transform`.
///
/// `anchor` is where the previous accepted step ended. The handle is
/// classified from `point`, so it is re-evaluated on every move. Returns the
/// rescaled transform, or `None` when the step would shrink the rect to the
/// minimum size or below; the caller then leaves both transform and anchor
/// untouched. On `Some`, the caller moves its anchor to `point`.
pub fn resize_step(
    rect: Rect,
    transform: Affine,
    anchor: Point,
    point: Point,
    limits: ResizeLimits,
) -> Option<Affine> {
    let handle = locate(point, rect, limits.handle_size);
    resize_with_handle(handle, rect, transform, anchor, point, limits)
}

/// [`resize_step`] with the handle already decided by the caller.
pub fn resize_with_handle(
    handle: Handle,
    rect: Rect,
    transform: Affine,
    anchor: Point,
    point: Point,
    limits: ResizeLimits,
) -> Option<Affine> {
    let width = rect.width();
    let height = rect.height();
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let delta = point - anchor;
    let (new_width, new_height, pivot) =
        plan_for_handle(handle, rect, delta.x, delta.y, point);

    if !(new_width > limits.min_width && new_height > limits.min_height) {
        return None;
    }

    Some(post_scale_about(
        transform,
        new_width / width,
        new_height / height,
        pivot,
    ))
}
