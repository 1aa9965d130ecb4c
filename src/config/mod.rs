use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::editor::{GridStyle, OverlayStyle, ResizeLimits};
use crate::editor::{DEFAULT_HANDLE_LENGTH, DEFAULT_HANDLE_SIZE};
use crate::editor::{DEFAULT_MAX_GRID_LINES, DEFAULT_MIN_GRID_SIZE};
use crate::editor::{DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

pub(crate) const APP_DIR: &str = "framecut";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_LOAD_SCALE_DIVISOR: u32 = 2;

/// Editor tuning read from `config.json`; missing keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub handle_size: f64,
    pub handle_length: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub max_grid_lines: u32,
    pub min_grid_size: u32,
    /// A loaded bitmap is fitted to `view / load_scale_divisor`.
    pub load_scale_divisor: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_size: DEFAULT_HANDLE_SIZE,
            handle_length: DEFAULT_HANDLE_LENGTH,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_grid_lines: DEFAULT_MAX_GRID_LINES,
            min_grid_size: DEFAULT_MIN_GRID_SIZE,
            load_scale_divisor: DEFAULT_LOAD_SCALE_DIVISOR,
        }
    }
}

impl EditorConfig {
    /// Replaces every non-positive or non-finite value with its default.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        let nonzero = |value: u32, fallback: u32| if value == 0 { fallback } else { value };

        Self {
            handle_size: positive(self.handle_size, defaults.handle_size),
            handle_length: positive(self.handle_length, defaults.handle_length),
            min_width: positive(self.min_width, defaults.min_width),
            min_height: positive(self.min_height, defaults.min_height),
            max_grid_lines: nonzero(self.max_grid_lines, defaults.max_grid_lines),
            min_grid_size: nonzero(self.min_grid_size, defaults.min_grid_size),
            load_scale_divisor: nonzero(self.load_scale_divisor, defaults.load_scale_divisor),
        }
    }

    pub fn resize_limits(&self) -> ResizeLimits {
        ResizeLimits {
            handle_size: self.handle_size,
            min_width: self.min_width,
            min_height: self.min_height,
        }
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            handle_length: self.handle_length,
            grid: GridStyle {
                max_lines: self.max_grid_lines,
                min_cell: self.min_grid_size,
            },
        }
    }
}

pub fn load_editor_config() -> EditorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_editor_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_editor_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EditorConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EditorConfig::default(),
    };
    if !path.exists() {
        return EditorConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_editor_config(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EditorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EditorConfig::default()
        }
    }
}

fn parse_editor_config(contents: &str) -> serde_json::Result<EditorConfig> {
    serde_json::from_str::<EditorConfig>(contents).map(EditorConfig::normalized)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn cache_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CACHE_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_config_home, home, ".config")?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

/// `$XDG_CACHE_HOME/<app_dir>/<subdir>`, falling back to `~/.cache`.
pub(crate) fn app_cache_dir(
    app_dir: &str,
    subdir: &str,
    xdg_cache_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_cache_home, home, ".cache")?;
    path.push(app_dir);
    path.push(subdir);
    Ok(path)
}

fn xdg_root(
    xdg_dir: Option<&Path>,
    home: Option<&Path>,
    home_fallback: &str,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_dir.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(home_fallback))
}
