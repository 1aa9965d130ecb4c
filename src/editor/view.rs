use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::config::EditorConfig;
use crate::error::AppResult;
use crate::geometry::{Affine, ImageSize};
use crate::raster::compose_view;
use crate::storage::{decode_image, scale_for_view, ResultStore, StorageResult};

use super::crop::{crop_image, CropError};
use super::gesture::{GestureController, SkewAxis, TouchEvent};
use super::overlay::Overlay;
use super::EditMode;

/// The editing surface: the loaded bitmap plus everything the user has done to it.
#[derive(Debug)]
pub struct ImageEditor {
    config: EditorConfig,
    view_size: ImageSize,
    source: Option<RgbaImage>,
    gestures: GestureController,
    opacity: f32,
}

impl Default for ImageEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), ImageSize::new(0, 0))
    }
}

impl ImageEditor {
    pub fn new(config: EditorConfig, view_size: ImageSize) -> Self {
        let config = config.normalized();
        Self {
            config,
            view_size,
            source: None,
            gestures: GestureController::new(config.resize_limits(), config.overlay_style()),
            opacity: 1.0,
        }
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    pub fn view_size(&self) -> ImageSize {
        self.view_size
    }

    pub fn set_view_size(&mut self, view_size: ImageSize) {
        self.view_size = view_size;
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn mode(&self) -> EditMode {
        self.gestures.mode()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Replaces the bitmap and starts over with an identity display transform.
    pub fn load_image(&mut self, image: RgbaImage) {
        if image.width() == 0 || image.height() == 0 {
            tracing::warn!("ignoring empty image");
            self.source = None;
            self.gestures.reset(None, Affine::IDENTITY);
            return;
        }
        let size = ImageSize::new(image.width(), image.height());
        tracing::debug!(width = size.width, height = size.height, "image loaded");
        self.source = Some(image);
        self.gestures.reset(Some(size), Affine::IDENTITY);
    }

    /// Loads `image` scaled down to the configured fraction of the view.
    pub fn load_scaled(&mut self, image: &RgbaImage) {
        let scaled = scale_for_view(image, self.view_size, self.config.load_scale_divisor);
        self.load_image(scaled);
    }

    pub fn open(&mut self, path: &Path) -> StorageResult<()> {
        let image = decode_image(path)?;
        self.load_scaled(&image);
        Ok(())
    }

    pub fn touch(&mut self, event: TouchEvent) {
        self.gestures.touch(event);
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.gestures.set_mode(mode);
    }

    pub fn skew_slider_changed(&mut self, value: f64, axis: SkewAxis, anchor_top: bool) {
        if !value.is_finite() {
            return;
        }
        self.gestures.skew_along(axis, value, anchor_top);
    }

    pub fn skew_slider_released(&mut self) -> bool {
        self.gestures.confirm_skew()
    }

    pub fn flip_horizontal(&mut self) {
        self.gestures.flip_horizontal();
    }

    /// The slider measures transparency, so the drawn opacity is its complement.
    pub fn opacity_slider_changed(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.opacity = (1.0 - value).clamp(0.0, 1.0);
    }

    /// Replaces the bitmap with the framed crop region and places it where it was cut from.
    ///
    /// The new bitmap sits at the crop origin after clamping to the image rect.
    /// On error nothing changes.
    pub fn crop_and_commit(&mut self) -> Result<ImageSize, CropError> {
        if self.gestures.mode() != EditMode::Crop {
            return Err(CropError::CropInactive);
        }
        let cropped = crop_image(
            self.source.as_ref(),
            self.gestures.display_transform(),
            self.gestures.crop_bounds(),
            self.gestures.limits(),
        )
        .inspect_err(|err| tracing::warn!(%err, "crop rejected"))?;

        let size = cropped.size();
        let origin = cropped.origin;
        self.source = Some(cropped.image);
        self.gestures.reset(Some(size), Affine::translate(origin.to_vec2()));
        tracing::debug!(
            width = size.width,
            height = size.height,
            x = origin.x,
            y = origin.y,
            "crop committed"
        );
        Ok(size)
    }

    pub fn overlay(&self) -> Overlay {
        self.gestures.overlay()
    }

    pub fn presented_transform(&self) -> Affine {
        self.gestures.presented_transform()
    }

    /// The bitmap as currently presented, drawn onto a view-sized transparent canvas.
    pub fn render_result(&self) -> Option<RgbaImage> {
        let source = self.source.as_ref()?;
        if self.view_size.is_empty() {
            return None;
        }
        Some(compose_view(
            source,
            self.presented_transform(),
            self.view_size,
            self.opacity,
        ))
    }

    pub fn save_result(&self, store: &dyn ResultStore) -> AppResult<PathBuf> {
        let image = self.render_result().ok_or(CropError::NoSourceImage)?;
        Ok(store.save_png(&image)?)
    }
}
