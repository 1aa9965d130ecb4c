pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod raster;
pub mod storage;
pub use editor::{EditMode, ImageEditor, TouchEvent};
pub use error::{AppError, AppResult};

/// Builds an editor for a view of `view_size` using the user's `config.json`.
pub fn editor_for_view(view_size: geometry::ImageSize) -> ImageEditor {
    logging::init();
    let config = config::load_editor_config();
    tracing::info!(?config, "editor configured");
    ImageEditor::new(config, view_size)
}
