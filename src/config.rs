//! Editor configuration
//!
//! Capacities, terrain defaults and asset-cache behaviour for an
//! [`EditorSession`](crate::editor::EditorSession). Stored as RON so it stays
//! hand-editable; every field falls back to its default when missing.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::AssetKind;
use crate::math::Vec3;

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "endor";
/// Config filename inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "editor.ron";

/// Error type for config loading and saving
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// An asset loaded into every fresh session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultAsset {
    pub path: String,
    pub name: String,
    pub kind: AssetKind,
}

impl DefaultAsset {
    fn new(path: &str, name: &str, kind: AssetKind) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}

/// Editor session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of live objects in the store
    pub max_objects: usize,
    /// Maximum number of distinct cached assets
    pub max_assets: usize,
    /// Undo ring capacity (total undo depth)
    pub undo_depth: usize,
    /// Maximum number of selected objects
    pub max_selection: usize,
    /// Terrain cells per side for a fresh session
    pub terrain_size: usize,
    /// World units per terrain cell
    pub terrain_scale: f32,
    /// Where texture/model thumbnails are written (None disables them)
    pub thumbnail_dir: Option<PathBuf>,
    /// Offset applied to duplicated objects
    pub duplicate_offset: Vec3,
    /// Advance the id allocator past ids read from a level file
    pub reconcile_loaded_ids: bool,
    /// Assets loaded on session reset (failures are ignored)
    pub default_assets: Vec<DefaultAsset>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_objects: 1024,
            max_assets: 512,
            undo_depth: 100,
            max_selection: 64,
            terrain_size: 64,
            terrain_scale: 1.0,
            thumbnail_dir: Some(PathBuf::from("thumbnails")),
            duplicate_offset: Vec3::new(2.0, 0.0, 2.0),
            reconcile_loaded_ids: true,
            default_assets: vec![
                DefaultAsset::new("models/cube.obj", "Cube", AssetKind::Model),
                DefaultAsset::new("models/sphere.obj", "Sphere", AssetKind::Model),
                DefaultAsset::new("models/plane.obj", "Plane", AssetKind::Model),
                DefaultAsset::new("models/cylinder.obj", "Cylinder", AssetKind::Model),
                DefaultAsset::new("textures/default.bmp", "Default", AssetKind::Texture),
                DefaultAsset::new("textures/grass.bmp", "Grass", AssetKind::Texture),
                DefaultAsset::new("textures/stone.bmp", "Stone", AssetKind::Texture),
                DefaultAsset::new("textures/metal.bmp", "Metal", AssetKind::Texture),
            ],
        }
    }
}

impl EditorConfig {
    /// Settings with no default assets and no thumbnail output.
    ///
    /// Handy for tools and tests that must not touch the working directory.
    pub fn headless() -> Self {
        Self {
            thumbnail_dir: None,
            default_assets: Vec::new(),
            ..Self::default()
        }
    }

    /// Load settings from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&contents)?;
        Ok(config.sanitized())
    }

    /// Load from the platform config location, or defaults if there is none
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring editor config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty RON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        fs::write(path, ron::ser::to_string_pretty(self, pretty)?)?;
        Ok(())
    }

    /// `<config dir>/endor/editor.ron`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Raise zero capacities to one and fall back on bad terrain values
    pub fn sanitized(mut self) -> Self {
        self.max_objects = self.max_objects.max(1);
        self.max_assets = self.max_assets.max(1);
        self.undo_depth = self.undo_depth.max(1);
        self.max_selection = self.max_selection.max(1);
        self.terrain_size = self.terrain_size.clamp(1, crate::world::limits::MAX_TERRAIN_SIZE);
        if !(self.terrain_scale.is_finite() && self.terrain_scale > 0.0) {
            self.terrain_scale = 1.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = ron::from_str("(undo_depth: 8, max_selection: 0)").unwrap();
        let config = config.sanitized();
        assert_eq!(config.undo_depth, 8);
        assert_eq!(config.max_selection, 1);
        assert_eq!(config.max_objects, 1024);
        assert_eq!(config.default_assets.len(), 8);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/editor.ron");

        let mut config = EditorConfig::headless();
        config.terrain_size = 32;
        config.reconcile_loaded_ids = false;
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_terrain_values_fall_back() {
        let mut config = EditorConfig::headless();
        config.terrain_size = 4096;
        config.terrain_scale = -2.0;
        let config = config.sanitized();
        assert_eq!(config.terrain_size, 128);
        assert_eq!(config.terrain_scale, 1.0);
    }
}
