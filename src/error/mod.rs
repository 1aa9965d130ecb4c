use crate::editor::CropError;
use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
