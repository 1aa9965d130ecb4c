use crate::geometry::{
    image_rect, post_scale_about, post_skew_about, post_translate, Affine, ImageSize, Point, Rect,
};

use super::handles::locate;
use super::overlay::{grid_segments, handle_segments, GridStyle, Overlay, DEFAULT_HANDLE_LENGTH};
use super::resize::{resize_step, ResizeLimits};
use super::EditMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down(Point),
    Move(Point),
    Up,
}

/// Per-gesture bookkeeping, replaced wholesale by each mode handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start_point: Point,
    /// Where the running handle drag last advanced to; `None` when no handle is engaged.
    pub active_corner: Option<Point>,
    pub saved_transform: Affine,
}

impl Default for GestureSession {
    fn default() -> Self {
        Self {
            start_point: Point::ZERO,
            active_corner: None,
            saved_transform: Affine::IDENTITY,
        }
    }
}

impl GestureSession {
    fn begin(point: Point, display: Affine) -> Self {
        Self {
            start_point: point,
            active_corner: None,
            saved_transform: display,
        }
    }

    fn with_corner(self, corner: Option<Point>) -> Self {
        Self {
            active_corner: corner,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSet {
    pub display: Affine,
    pub crop: Affine,
    pub pending_skew: Option<Affine>,
}

impl Default for TransformSet {
    fn default() -> Self {
        Self {
            display: Affine::IDENTITY,
            crop: Affine::IDENTITY,
            pending_skew: None,
        }
    }
}

/// Screen-space corners of the crop frame as of the last finished crop gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBounds {
    pub start: Point,
    pub end: Point,
}

impl Default for CropBounds {
    fn default() -> Self {
        Self {
            start: Point::ZERO,
            end: Point::ZERO,
        }
    }
}

impl CropBounds {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            start: Point::new(rect.x0, rect.y0),
            end: Point::new(rect.x1, rect.y1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub handle_length: f64,
    pub grid: GridStyle,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            handle_length: DEFAULT_HANDLE_LENGTH,
            grid: GridStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkewAxis {
    Horizontal,
    Vertical,
}

/// State handed to a mode handler alongside the current session.
struct GestureFrame<'a> {
    size: ImageSize,
    limits: ResizeLimits,
    transforms: &'a mut TransformSet,
    crop_bounds: &'a mut CropBounds,
}

type ModeHandler = fn(&mut GestureFrame<'_>, GestureSession, TouchEvent) -> GestureSession;

fn handler_for(mode: EditMode) -> ModeHandler {
    match mode {
        EditMode::Drag => drag_gesture,
        EditMode::Resize => resize_gesture,
        EditMode::Crop => crop_gesture,
        EditMode::None | EditMode::Skew | EditMode::Alpha => idle_gesture,
    }
}

fn idle_gesture(
    frame: &mut GestureFrame<'_>,
    session: GestureSession,
    event: TouchEvent,
) -> GestureSession {
    match event {
        TouchEvent::Down(point) => GestureSession::begin(point, frame.transforms.display),
        TouchEvent::Move(_) | TouchEvent::Up => session,
    }
}

fn drag_gesture(
    frame: &mut GestureFrame<'_>,
    session: GestureSession,
    event: TouchEvent,
) -> GestureSession {
    match event {
        TouchEvent::Down(point) => GestureSession::begin(point, frame.transforms.display),
        TouchEvent::Move(point) => {
            // Always relative to the gesture origin so moves never accumulate.
            frame.transforms.display =
                post_translate(session.saved_transform, point - session.start_point);
            session
        }
        TouchEvent::Up => session,
    }
}

fn resize_gesture(
    frame: &mut GestureFrame<'_>,
    session: GestureSession,
    event: TouchEvent,
) -> GestureSession {
    let rect = image_rect(frame.transforms.display, frame.size);
    match event {
        TouchEvent::Down(point) => {
            let session = GestureSession::begin(point, frame.transforms.display);
            if locate(point, rect, frame.limits.handle_size).is_none() {
                session
            } else {
                session.with_corner(Some(point))
            }
        }
        TouchEvent::Move(point) => {
            if locate(point, rect, frame.limits.handle_size).is_none() {
                return session;
            }
            let anchor = session.active_corner.unwrap_or(point);
            match resize_step(rect, frame.transforms.display, anchor, point, frame.limits) {
                Some(next) => {
                    frame.transforms.display = next;
                    session.with_corner(Some(point))
                }
                None => session.with_corner(Some(anchor)),
            }
        }
        TouchEvent::Up => session.with_corner(None),
    }
}

fn crop_gesture(
    frame: &mut GestureFrame<'_>,
    session: GestureSession,
    event: TouchEvent,
) -> GestureSession {
    match event {
        TouchEvent::Down(point) => {
            GestureSession::begin(point, frame.transforms.display).with_corner(Some(point))
        }
        TouchEvent::Move(point) => {
            // Crop handles only follow touches that stay over the displayed image.
            if !image_rect(frame.transforms.display, frame.size).contains(point) {
                return session;
            }
            let crop_rect = image_rect(frame.transforms.crop, frame.size);
            let anchor = session.active_corner.unwrap_or(point);
            match resize_step(crop_rect, frame.transforms.crop, anchor, point, frame.limits) {
                Some(next) => {
                    frame.transforms.crop = next;
                    session.with_corner(Some(point))
                }
                None => session.with_corner(Some(anchor)),
            }
        }
        TouchEvent::Up => {
            *frame.crop_bounds =
                CropBounds::from_rect(image_rect(frame.transforms.crop, frame.size));
            session.with_corner(None)
        }
    }
}

/// Owns the edit mode and the transforms that touch input mutates.
#[derive(Debug, Clone)]
pub struct GestureController {
    mode: EditMode,
    source_size: Option<ImageSize>,
    transforms: TransformSet,
    session: GestureSession,
    crop_bounds: CropBounds,
    limits: ResizeLimits,
    style: OverlayStyle,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(ResizeLimits::default(), OverlayStyle::default())
    }
}

impl GestureController {
    pub fn new(limits: ResizeLimits, style: OverlayStyle) -> Self {
        Self {
            mode: EditMode::default(),
            source_size: None,
            transforms: TransformSet::default(),
            session: GestureSession::default(),
            crop_bounds: CropBounds::default(),
            limits,
            style,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn source_size(&self) -> Option<ImageSize> {
        self.source_size
    }

    pub fn limits(&self) -> ResizeLimits {
        self.limits
    }

    pub fn transforms(&self) -> TransformSet {
        self.transforms
    }

    pub fn display_transform(&self) -> Affine {
        self.transforms.display
    }

    pub fn crop_transform(&self) -> Affine {
        self.transforms.crop
    }

    pub fn pending_skew(&self) -> Option<Affine> {
        self.transforms.pending_skew
    }

    /// The transform the host should present the bitmap with this frame.
    pub fn presented_transform(&self) -> Affine {
        self.transforms
            .pending_skew
            .unwrap_or(self.transforms.display)
    }

    pub fn session(&self) -> GestureSession {
        self.session
    }

    pub fn crop_bounds(&self) -> CropBounds {
        self.crop_bounds
    }

    pub fn image_rect(&self) -> Rect {
        self.source_size
            .map_or(Rect::ZERO, |size| image_rect(self.transforms.display, size))
    }

    pub fn crop_rect(&self) -> Rect {
        self.source_size
            .map_or(Rect::ZERO, |size| image_rect(self.transforms.crop, size))
    }

    /// Starts over for a newly loaded bitmap presented through `display`.
    pub fn reset(&mut self, size: Option<ImageSize>, display: Affine) {
        self.source_size = size;
        self.transforms = TransformSet {
            display,
            ..TransformSet::default()
        };
        self.session = GestureSession::default();
        self.crop_bounds = CropBounds::default();
        self.mode = EditMode::Drag;
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        tracing::debug!(from = ?self.mode, to = ?mode, "edit mode changed");
        if mode != EditMode::Skew && self.transforms.pending_skew.take().is_some() {
            tracing::debug!("discarding unconfirmed skew preview");
        }
        self.mode = mode;
        self.session = self.session.with_corner(None);
        if mode == EditMode::Crop {
            self.prepare_crop_frame();
        }
    }

    fn prepare_crop_frame(&mut self) {
        self.transforms.crop = self.transforms.display;
        self.crop_bounds = CropBounds::from_rect(self.crop_rect());
    }

    pub fn touch(&mut self, event: TouchEvent) {
        let Some(size) = self.source_size else {
            return;
        };
        let handler = handler_for(self.mode);
        let mut frame = GestureFrame {
            size,
            limits: self.limits,
            transforms: &mut self.transforms,
            crop_bounds: &mut self.crop_bounds,
        };
        self.session = handler(&mut frame, self.session, event);
    }

    pub fn touch_down(&mut self, point: Point) {
        self.touch(TouchEvent::Down(point));
    }

    pub fn touch_move(&mut self, point: Point) {
        self.touch(TouchEvent::Move(point));
    }

    pub fn touch_up(&mut self) {
        self.touch(TouchEvent::Up);
    }

    /// Builds a skew preview of the display transform without committing it.
    pub fn commit_skew(&mut self, horizontal: f64, vertical: f64, anchor_top: bool) {
        let Some(size) = self.source_size else {
            return;
        };
        let rect = image_rect(self.transforms.display, size);
        let top_left = Point::new(rect.x0, rect.y0);
        let bottom_right = Point::new(rect.x1, rect.y1);
        let (skew_x, skew_y, pivot) = if horizontal == 0.0 {
            (0.0, vertical, if anchor_top { top_left } else { bottom_right })
        } else {
            (horizontal, 0.0, if anchor_top { bottom_right } else { top_left })
        };
        self.transforms.pending_skew = Some(post_skew_about(
            self.transforms.display,
            skew_x,
            skew_y,
            pivot,
        ));
    }

    pub fn skew_along(&mut self, axis: SkewAxis, amount: f64, anchor_top: bool) {
        match axis {
            SkewAxis::Vertical => self.commit_skew(0.0, amount, anchor_top),
            SkewAxis::Horizontal => self.commit_skew(amount, 0.0, anchor_top),
        }
    }

    /// Promotes the skew preview into the display transform.
    pub fn confirm_skew(&mut self) -> bool {
        match self.transforms.pending_skew.take() {
            Some(skewed) => {
                tracing::debug!("skew confirmed");
                self.transforms.display = skewed;
                true
            }
            None => false,
        }
    }

    /// Mirrors the display transform about the vertical center line of the image.
    pub fn flip_horizontal(&mut self) {
        let Some(size) = self.source_size else {
            return;
        };
        let center = image_rect(self.transforms.display, size).center();
        self.transforms.display = post_scale_about(self.transforms.display, -1.0, 1.0, center);
        self.transforms.pending_skew = None;
        tracing::debug!("image flipped horizontally");
    }

    pub fn overlay(&self) -> Overlay {
        if self.source_size.is_none() {
            return Overlay::default();
        }
        let framed = |rect: Rect, grid: bool| Overlay {
            frame: Some(rect),
            handles: handle_segments(rect, self.style.handle_length),
            grid: if grid {
                grid_segments(rect, self.style.grid)
            } else {
                Vec::new()
            },
        };
        match self.mode {
            EditMode::Resize => framed(self.image_rect(), false),
            EditMode::Crop => framed(self.crop_rect(), true),
            EditMode::None | EditMode::Drag | EditMode::Skew | EditMode::Alpha => {
                Overlay::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{assert_affine_close, Vec2};

    fn loaded(size: ImageSize) -> GestureController {
        let mut controller = GestureController::default();
        controller.reset(Some(size), Affine::IDENTITY);
        controller
    }

    fn placed_square() -> GestureController {
        let mut controller = loaded(ImageSize::new(400, 400));
        controller.reset(
            Some(ImageSize::new(400, 400)),
            Affine::translate((100.0, 100.0)),
        );
        controller
    }

    #[test]
    fn starts_in_drag_mode_with_identity_transforms() {
        let controller = GestureController::default();
        assert_eq!(controller.mode(), EditMode::Drag);
        assert_eq!(controller.transforms(), TransformSet::default());
        assert_eq!(controller.image_rect(), Rect::ZERO);
    }

    #[test]
    fn drag_translates_relative_to_gesture_origin() {
        let mut controller = loaded(ImageSize::new(200, 100));
        controller.touch_down(Point::new(10.0, 10.0));
        controller.touch_move(Point::new(30.0, 15.0));
        controller.touch_move(Point::new(50.0, 20.0));
        controller.touch_move(Point::new(40.0, 60.0));
        controller.touch_up();

        assert_eq!(
            controller.display_transform(),
            Affine::translate(Vec2::new(30.0, 50.0))
        );
    }

    #[test]
    fn successive_drags_compose_from_each_saved_transform() {
        let mut controller = loaded(ImageSize::new(200, 100));
        controller.touch_down(Point::new(0.0, 0.0));
        controller.touch_move(Point::new(10.0, 0.0));
        controller.touch_up();
        controller.touch_down(Point::new(100.0, 100.0));
        controller.touch_move(Point::new(100.0, 120.0));
        controller.touch_up();

        assert_eq!(
            controller.display_transform(),
            Affine::translate(Vec2::new(10.0, 20.0))
        );
    }

    #[test]
    fn touches_without_a_bitmap_are_ignored() {
        let mut controller = GestureController::default();
        controller.touch_down(Point::new(0.0, 0.0));
        controller.touch_move(Point::new(50.0, 50.0));
        assert_eq!(controller.display_transform(), Affine::IDENTITY);
        assert_eq!(controller.session(), GestureSession::default());
    }

    #[test]
    fn resize_drag_on_corner_scales_display_transform() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Resize);
        controller.touch_down(Point::new(500.0, 500.0));
        assert_eq!(
            controller.session().active_corner,
            Some(Point::new(500.0, 500.0))
        );
        controller.touch_move(Point::new(510.0, 510.0));
        controller.touch_move(Point::new(520.0, 520.0));

        let rect = controller.image_rect();
        assert!((rect.width() - 420.0).abs() < 1e-9);
        assert!((rect.height() - 420.0).abs() < 1e-9);
        assert!((rect.x0 - 100.0).abs() < 1e-9);

        controller.touch_up();
        assert_eq!(controller.session().active_corner, None);
    }

    #[test]
    fn resize_touch_off_handles_leaves_transform_untouched() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Resize);
        controller.touch_down(Point::new(300.0, 300.0));
        assert_eq!(controller.session().active_corner, None);
        controller.touch_move(Point::new(320.0, 320.0));
        assert_eq!(
            controller.display_transform(),
            Affine::translate((100.0, 100.0))
        );
    }

    #[test]
    fn resize_engages_handle_reached_mid_gesture() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Resize);
        controller.touch_down(Point::new(300.0, 300.0));
        // First move onto the right handle only seeds the anchor.
        controller.touch_move(Point::new(500.0, 300.0));
        assert_eq!(
            controller.session().active_corner,
            Some(Point::new(500.0, 300.0))
        );
        controller.touch_move(Point::new(520.0, 300.0));
        let rect = controller.image_rect();
        assert!((rect.x1 - 520.0).abs() < 1e-9);
        assert!((rect.y1 - 500.0).abs() < 1e-9);
    }

    #[test]
    fn resize_move_below_minimum_keeps_transform_and_anchor() {
        let limits = ResizeLimits {
            min_width: 150.0,
            ..ResizeLimits::default()
        };
        let mut controller = GestureController::new(limits, OverlayStyle::default());
        controller.reset(
            Some(ImageSize::new(200, 200)),
            Affine::translate((100.0, 100.0)),
        );
        controller.set_mode(EditMode::Resize);
        controller.touch_down(Point::new(300.0, 300.0));
        // Still on the bottom-right handle, but 60 units narrower is below 150.
        controller.touch_move(Point::new(240.0, 300.0));

        assert_eq!(
            controller.display_transform(),
            Affine::translate((100.0, 100.0))
        );
        assert_eq!(
            controller.session().active_corner,
            Some(Point::new(300.0, 300.0))
        );
    }

    #[test]
    fn crop_move_off_handles_advances_anchor_only() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        controller.touch_down(Point::new(300.0, 300.0));
        controller.touch_move(Point::new(310.0, 320.0));

        assert_eq!(controller.crop_transform(), controller.display_transform());
        assert_eq!(
            controller.session().active_corner,
            Some(Point::new(310.0, 320.0))
        );
    }

    #[test]
    fn entering_crop_snapshots_display_into_crop_frame() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        assert_eq!(controller.crop_transform(), controller.display_transform());
        assert_eq!(
            controller.crop_bounds(),
            CropBounds {
                start: Point::new(100.0, 100.0),
                end: Point::new(500.0, 500.0),
            }
        );
    }

    #[test]
    fn crop_drag_shrinks_crop_frame_but_not_display() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        controller.touch_down(Point::new(490.0, 490.0));
        controller.touch_move(Point::new(450.0, 470.0));
        controller.touch_up();

        assert_eq!(
            controller.display_transform(),
            Affine::translate((100.0, 100.0))
        );
        let bounds = controller.crop_bounds();
        assert!((bounds.start.x - 100.0).abs() < 1e-9);
        assert!((bounds.start.y - 100.0).abs() < 1e-9);
        assert!((bounds.end.x - 460.0).abs() < 1e-9);
        assert!((bounds.end.y - 480.0).abs() < 1e-9);
    }

    #[test]
    fn crop_moves_outside_the_image_are_ignored() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        controller.touch_down(Point::new(499.0, 499.0));
        controller.touch_move(Point::new(520.0, 520.0));
        assert_eq!(controller.crop_transform(), controller.display_transform());
    }

    #[test]
    fn crop_bounds_only_refresh_when_gesture_ends() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        let before = controller.crop_bounds();
        controller.touch_down(Point::new(110.0, 110.0));
        controller.touch_move(Point::new(140.0, 150.0));
        assert_eq!(controller.crop_bounds(), before);
        controller.touch_up();
        assert_ne!(controller.crop_bounds(), before);
    }

    #[test]
    fn skew_previews_until_confirmed() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Skew);
        controller.commit_skew(0.0, 0.25, true);

        let preview = controller.pending_skew().expect("skew preview should exist");
        assert_eq!(controller.presented_transform(), preview);
        assert_eq!(
            controller.display_transform(),
            Affine::translate((100.0, 100.0))
        );

        assert!(controller.confirm_skew());
        assert_eq!(controller.display_transform(), preview);
        assert_eq!(controller.pending_skew(), None);
        assert!(!controller.confirm_skew());
    }

    #[test]
    fn vertical_skew_anchors_top_left_when_top_selected() {
        let mut controller = placed_square();
        controller.commit_skew(0.0, 0.5, true);
        let preview = controller.pending_skew().expect("preview");
        assert_eq!(preview * Point::new(0.0, 0.0), Point::new(100.0, 100.0));

        controller.commit_skew(0.0, 0.5, false);
        let preview = controller.pending_skew().expect("preview");
        let corner = preview * Point::new(400.0, 400.0);
        assert!((corner.x - 500.0).abs() < 1e-9 && (corner.y - 500.0).abs() < 1e-9);
    }

    #[test]
    fn horizontal_skew_anchors_bottom_right_when_top_selected() {
        let mut controller = placed_square();
        controller.commit_skew(0.5, 0.0, true);
        let preview = controller.pending_skew().expect("preview");
        let corner = preview * Point::new(400.0, 400.0);
        assert!((corner.x - 500.0).abs() < 1e-9 && (corner.y - 500.0).abs() < 1e-9);
        // Top edge shifts left by skew * height.
        let top_left = preview * Point::new(0.0, 0.0);
        assert!((top_left.x - (100.0 - 200.0)).abs() < 1e-9);

        controller.commit_skew(0.5, 0.0, false);
        let preview = controller.pending_skew().expect("preview");
        assert_eq!(preview * Point::new(0.0, 0.0), Point::new(100.0, 100.0));
    }

    #[test]
    fn leaving_skew_mode_discards_preview() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Skew);
        controller.skew_along(SkewAxis::Horizontal, 0.3, false);
        assert!(controller.pending_skew().is_some());
        controller.set_mode(EditMode::Drag);
        assert_eq!(controller.pending_skew(), None);
        assert_eq!(
            controller.presented_transform(),
            controller.display_transform()
        );
    }

    #[test]
    fn flip_is_self_inverse() {
        let mut controller = placed_square();
        controller.reset(
            Some(ImageSize::new(300, 200)),
            Affine::new([1.5, 0.2, 0.1, 0.8, 40.0, 25.0]),
        );
        let original = controller.display_transform();
        controller.flip_horizontal();
        assert_ne!(controller.display_transform(), original);
        controller.flip_horizontal();
        assert_affine_close(controller.display_transform(), original);
    }

    #[test]
    fn flip_mirrors_in_place() {
        let mut controller = placed_square();
        let before = controller.image_rect();
        controller.flip_horizontal();
        assert_eq!(controller.image_rect(), before);
        let mapped = controller.display_transform() * Point::new(0.0, 0.0);
        assert_eq!(mapped, Point::new(500.0, 100.0));
    }

    #[test]
    fn overlay_depends_on_mode() {
        let mut controller = placed_square();
        assert!(controller.overlay().is_empty());

        controller.set_mode(EditMode::Resize);
        let overlay = controller.overlay();
        assert_eq!(overlay.frame, Some(controller.image_rect()));
        assert_eq!(overlay.handles.len(), 12);
        assert!(overlay.grid.is_empty());

        controller.set_mode(EditMode::Crop);
        let overlay = controller.overlay();
        assert_eq!(overlay.frame, Some(controller.crop_rect()));
        assert_eq!(overlay.grid.len(), 8);
    }

    #[test]
    fn reset_returns_to_drag_and_clears_crop_state() {
        let mut controller = placed_square();
        controller.set_mode(EditMode::Crop);
        controller.reset(
            Some(ImageSize::new(50, 50)),
            Affine::translate((20.0, 30.0)),
        );
        assert_eq!(controller.mode(), EditMode::Drag);
        assert_eq!(controller.crop_transform(), Affine::IDENTITY);
        assert_eq!(controller.crop_bounds(), CropBounds::default());
        assert_eq!(controller.image_rect(), Rect::new(20.0, 30.0, 70.0, 80.0));
    }
}
