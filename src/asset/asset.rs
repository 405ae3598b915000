//! Asset Definition
//!
//! One cached resource: its identity (filename), the raw bytes it was loaded
//! from and how many times it has been requested.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of an asset inside its [`AssetCache`](super::AssetCache)
///
/// Indices are stable for the lifetime of the cache (entries are never
/// evicted individually).
pub type AssetId = usize;

/// What kind of resource an asset is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Texture,
    Model,
    Sound,
    Script,
    Material,
    Prefab,
    Animation,
}

impl AssetKind {
    pub const ALL: [AssetKind; 7] = [
        AssetKind::Texture,
        AssetKind::Model,
        AssetKind::Sound,
        AssetKind::Script,
        AssetKind::Material,
        AssetKind::Prefab,
        AssetKind::Animation,
    ];

    /// Lowercase name, as accepted on the command line
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Texture => "texture",
            AssetKind::Model => "model",
            AssetKind::Sound => "sound",
            AssetKind::Script => "script",
            AssetKind::Material => "material",
            AssetKind::Prefab => "prefab",
            AssetKind::Animation => "animation",
        }
    }

    /// Parse a label produced by [`AssetKind::label`] (case-insensitive)
    pub fn from_label(label: &str) -> Option<AssetKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }

    /// Whether a successful load of this kind writes a thumbnail
    pub fn has_thumbnail(&self) -> bool {
        matches!(self, AssetKind::Texture | AssetKind::Model)
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for asset operations
#[derive(Debug, Error)]
pub enum AssetError {
    /// Every cache slot is taken
    #[error("asset cache full ({capacity} entries)")]
    CacheFull { capacity: usize },
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Bytes do not look like the requested kind
    #[error("invalid {kind} data: {reason}")]
    FormatInvalid { kind: AssetKind, reason: String },
}

impl AssetError {
    pub(crate) fn invalid(kind: AssetKind, reason: impl Into<String>) -> Self {
        AssetError::FormatInvalid { kind, reason: reason.into() }
    }
}

/// A cached resource
#[derive(Debug, Clone)]
pub struct Asset {
    /// Path the asset was loaded from; the cache key (case-sensitive)
    pub filename: String,
    /// Human-readable name, also used for the thumbnail filename
    pub display_name: String,
    pub kind: AssetKind,
    /// Raw file contents, owned exclusively by the cache entry
    pub data: Vec<u8>,
    /// Number of `load` calls that resolved to this entry
    pub reference_count: u32,
    /// Where the thumbnail is (or would be) written
    pub thumbnail_path: PathBuf,
}

impl Asset {
    /// Size of the loaded data in bytes
    pub fn data_size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        for kind in AssetKind::ALL {
            assert_eq!(AssetKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(AssetKind::from_label("TEXTURE"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_label("mesh"), None);
        assert!(AssetKind::Model.has_thumbnail());
        assert!(!AssetKind::Sound.has_thumbnail());
    }
}
