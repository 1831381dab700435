// Asset loading functionality

use super::AssetError;
use crate::engine::sprite::Bitmap;
use std::path::{Path, PathBuf};

/// Environment variable naming the asset root
pub const ASSET_DIR_ENV: &str = "CASTLE_BRAWL_ASSETS";

pub const DEFAULT_ASSET_DIR: &str = "assets";

const SHEET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Asset loader responsible for finding and decoding sheet files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Create a loader rooted at `$CASTLE_BRAWL_ASSETS`, or `assets/`
    pub fn from_env() -> Self {
        let base = std::env::var_os(ASSET_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));
        Self::new(base)
    }

    /// Get the full path for a sheet
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Decode a sheet into an RGBA bitmap, sampling its background at (0, 0)
    pub fn load_bitmap(&self, name: &str) -> Result<Bitmap, AssetError> {
        let path = self.resolve_path(name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        let image = image::open(&path).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?;

        Ok(Bitmap::new(image.to_rgba8()))
    }

    /// Check if a sheet exists
    pub fn exists(&self, name: &str) -> bool {
        self.resolve_path(name).exists()
    }

    /// List every image file directly under the base path
    pub fn list_sheets(&self) -> Result<Vec<String>, AssetError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut sheets = Vec::new();
        for entry in std::fs::read_dir(&self.base_path)? {
            let path = entry?.path();

            if path.is_file() {
                let known = path
                    .extension()
                    .map(|ext| SHEET_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
                    .unwrap_or(false);
                if known {
                    if let Some(name) = path.file_name() {
                        sheets.push(name.to_string_lossy().to_string());
                    }
                }
            }
        }

        sheets.sort();
        Ok(sheets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
