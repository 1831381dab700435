// Central asset management system

use super::{AssetError, AssetLoader};
use crate::engine::sprite::{ExtractOptions, FrameExtractor, FrameSet};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

type SheetKey = (String, ExtractOptions);

/// Central asset manager for the game
///
/// Sheets are decoded and sliced once per (name, options) pair; later lookups
/// share the cached frame set. A sheet that fails to load degrades to an empty
/// set so the match keeps running with missing visuals.
pub struct AssetManager {
    /// Asset loader
    loader: AssetLoader,

    /// Extracted frame sets
    sheets: HashMap<SheetKey, FrameSet>,

    /// Sheets that failed and were replaced by an empty set
    failures: usize,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self::with_loader(AssetLoader::new(asset_path))
    }

    pub fn with_loader(loader: AssetLoader) -> Self {
        Self {
            loader,
            sheets: HashMap::new(),
            failures: 0,
        }
    }

    /// Load and slice a sheet, propagating failures
    pub fn try_frames(&mut self, name: &str, options: ExtractOptions) -> Result<FrameSet, AssetError> {
        let key = (name.to_string(), options);
        if let Some(set) = self.sheets.get(&key) {
            return Ok(set.clone());
        }

        let sheet = self.loader.load_bitmap(name)?;
        let set = FrameExtractor::new(options).extract(&sheet);
        info!("Loaded {} ({} frames)", name, set.len());

        self.sheets.insert(key, set.clone());
        Ok(set)
    }

    /// Load and slice a sheet, substituting an empty set when it is unavailable
    pub fn frames(&mut self, name: &str, options: ExtractOptions) -> FrameSet {
        match self.try_frames(name, options) {
            Ok(set) => set,
            Err(err) => {
                warn!("{}; using an empty frame set", err);
                self.failures += 1;
                let empty = FrameSet::empty();
                self.sheets.insert((name.to_string(), options), empty.clone());
                empty
            }
        }
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            sheet_count: self.sheets.len(),
            failed_count: self.failures,
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub sheet_count: usize,
    pub failed_count: usize,
}
