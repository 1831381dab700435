// Asset management system
//
// Loads contact sheets from disk and caches the frame sets cut from them.

mod loader;
mod manager;

pub use loader::{AssetLoader, ASSET_DIR_ENV, DEFAULT_ASSET_DIR};
pub use manager::{AssetManager, AssetStats};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
