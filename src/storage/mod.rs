use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::imageops::{self, FilterType};
use image::{ImageError, ImageFormat, RgbaImage};
use thiserror::Error;

use crate::config::{app_cache_dir, cache_env_dirs, APP_DIR};
use crate::geometry::ImageSize;

const RESULT_SUBDIR: &str = "images";
const RESULT_PREFIX: &str = "edit-";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("failed to decode image bytes: {0}")]
    DecodeBytes(#[source] ImageError),
    #[error("failed to encode png: {0}")]
    Encode(#[source] ImageError),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub fn decode_image(path: &Path) -> StorageResult<RgbaImage> {
    let image = image::open(path)
        .map_err(|source| StorageError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    non_empty(image)
}

pub fn decode_image_bytes(bytes: &[u8]) -> StorageResult<RgbaImage> {
    let image = image::load_from_memory(bytes)
        .map_err(StorageError::DecodeBytes)?
        .to_rgba8();
    non_empty(image)
}

fn non_empty(image: RgbaImage) -> StorageResult<RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(StorageError::EmptyImage);
    }
    Ok(image)
}

/// Resamples `image` to exactly `width x height`, with each edge at least one pixel.
pub fn scale_image(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Stretches `image` to the view size divided by `divisor`, the size a freshly loaded bitmap gets.
pub fn scale_for_view(image: &RgbaImage, view: ImageSize, divisor: u32) -> RgbaImage {
    let divisor = divisor.max(1);
    scale_image(image, view.width / divisor, view.height / divisor)
}

pub fn encode_png(image: &RgbaImage) -> StorageResult<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(StorageError::EmptyImage);
    }
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(StorageError::Encode)?;
    Ok(bytes)
}

pub trait ResultStore {
    fn save_png(&self, image: &RgbaImage) -> StorageResult<PathBuf>;
}

/// Writes finished edits as PNG files into a cache directory.
#[derive(Debug, Clone)]
pub struct StorageService {
    cache_dir: PathBuf,
}

impl StorageService {
    pub const fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn with_default_paths() -> StorageResult<Self> {
        let (xdg_cache_home, home) = cache_env_dirs();
        Self::with_default_paths_from(xdg_cache_home.as_deref(), home.as_deref())
    }

    fn with_default_paths_from(
        xdg_cache_home: Option<&Path>,
        home: Option<&Path>,
    ) -> StorageResult<Self> {
        let cache_dir = app_cache_dir(APP_DIR, RESULT_SUBDIR, xdg_cache_home, home)
            .map_err(|_| StorageError::MissingHomeDirectory)?;
        Ok(Self::with_cache_dir(cache_dir))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// First `edit-<id>.png` path in the cache directory not already taken.
    pub fn allocate_result_path(&self, result_id: &str) -> PathBuf {
        let mut path = self.cache_dir.join(format!("{RESULT_PREFIX}{result_id}.png"));
        let mut suffix = 1_u32;
        while path.exists() {
            path = self
                .cache_dir
                .join(format!("{RESULT_PREFIX}{result_id}-{suffix}.png"));
            suffix += 1;
        }
        path
    }

    pub fn save_png(&self, image: &RgbaImage) -> StorageResult<PathBuf> {
        let bytes = encode_png(image)?;
        fs::create_dir_all(&self.cache_dir)?;
        let target = self.allocate_result_path(&new_result_id());
        fs::write(&target, bytes)?;
        tracing::info!(path = %target.display(), "edited image saved");
        Ok(target)
    }
}

impl ResultStore for StorageService {
    fn save_png(&self, image: &RgbaImage) -> StorageResult<PathBuf> {
        self.save_png(image)
    }
}

fn new_result_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("{nanos}")
}
