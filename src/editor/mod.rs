//! Touch-driven transform and crop editing of a single bitmap.

mod crop;
mod gesture;
mod handles;
mod overlay;
mod resize;
mod view;

pub use crop::{crop_image, CropError, CroppedImage};
pub use gesture::{
    CropBounds, GestureController, GestureSession, OverlayStyle, SkewAxis, TouchEvent,
    TransformSet,
};
pub use handles::{locate, Handle, DEFAULT_HANDLE_SIZE};
pub use overlay::{
    grid_segments, handle_segments, GridStyle, Overlay, DEFAULT_HANDLE_LENGTH,
    DEFAULT_MAX_GRID_LINES, DEFAULT_MIN_GRID_SIZE,
};
pub use resize::{
    resize_step, resize_with_handle, ResizeLimits, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH,
};
pub use view::ImageEditor;

/// Which transform touch input edits and what the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    None,
    #[default]
    Drag,
    Resize,
    Crop,
    Skew,
    Alpha,
}
