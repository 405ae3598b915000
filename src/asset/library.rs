//! Asset Cache - Loading and deduplication of assets
//!
//! Entries are keyed by filename and live until the whole cache is cleared.
//! A repeat load of a known filename only bumps its reference count; the file
//! is not read or validated again, even if it changed on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::asset::{Asset, AssetError, AssetId, AssetKind};
use super::thumbnail::{self, thumbnail_path};
use super::validate::{validate, Validated};

/// Bounded, append-only cache of loaded assets
#[derive(Debug)]
pub struct AssetCache {
    /// Entries in load order; an entry's index is its [`AssetId`]
    assets: Vec<Asset>,
    /// Filename -> index for dedup lookups
    by_filename: HashMap<String, AssetId>,
    /// Maximum number of distinct entries
    capacity: usize,
    /// Where thumbnails go (None = don't write any)
    thumbnail_dir: Option<PathBuf>,
}

impl AssetCache {
    /// Create an empty cache with room for `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            assets: Vec::new(),
            by_filename: HashMap::new(),
            capacity: capacity.max(1),
            thumbnail_dir: None,
        }
    }

    /// Write texture/model thumbnails under `dir`
    pub fn with_thumbnail_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.thumbnail_dir = Some(dir.into());
        self
    }

    /// Load `filename`, or reuse the existing entry for it.
    ///
    /// On a miss the whole file is read and checked against `kind`; nothing
    /// is cached if reading or validation fails.
    pub fn load(&mut self, filename: &str, display_name: &str, kind: AssetKind) -> Result<AssetId, AssetError> {
        if let Some(&id) = self.by_filename.get(filename) {
            let asset = &mut self.assets[id];
            asset.reference_count += 1;
            log::debug!("asset cache hit: {} (refs = {})", filename, asset.reference_count);
            return Ok(id);
        }

        if self.assets.len() >= self.capacity {
            return Err(AssetError::CacheFull { capacity: self.capacity });
        }

        let data = fs::read(filename)?;
        let validated = validate(kind, &data)?;

        let thumb_path = thumbnail_path(
            self.thumbnail_dir.as_deref().unwrap_or(Path::new("thumbnails")),
            display_name,
        );
        if self.thumbnail_dir.is_some() {
            write_thumbnail_for(&thumb_path, &data, validated);
        }

        let id = self.assets.len();
        log::debug!("asset cache miss: loaded {} as {} ({} bytes) -> #{}", filename, kind, data.len(), id);
        self.assets.push(Asset {
            filename: filename.to_string(),
            display_name: display_name.to_string(),
            kind,
            data,
            reference_count: 1,
            thumbnail_path: thumb_path,
        });
        self.by_filename.insert(filename.to_string(), id);
        Ok(id)
    }

    /// Get an asset by index
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Find the index of an already-loaded filename
    pub fn find(&self, filename: &str) -> Option<AssetId> {
        self.by_filename.get(filename).copied()
    }

    /// Filename of an asset, if the index is valid
    pub fn filename(&self, id: AssetId) -> Option<&str> {
        self.assets.get(id).map(|a| a.filename.as_str())
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over entries in load order
    pub fn iter(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets.iter().enumerate()
    }

    /// Drop every entry and its data
    pub fn clear(&mut self) {
        self.assets.clear();
        self.by_filename.clear();
    }
}

fn write_thumbnail_for(path: &Path, data: &[u8], validated: Validated) {
    let image = match validated {
        Validated::Texture { width, height } => thumbnail::texture_thumbnail(data, width, height),
        Validated::Model { .. } => thumbnail::model_thumbnail(),
        Validated::Sound | Validated::Opaque => return,
    };
    if let Err(e) = thumbnail::write_thumbnail(path, &image) {
        log::warn!("failed to write thumbnail {}: {}", path.display(), e);
    }
}
