//! Editor modes, grid snapping and view toggles

use serde::{Deserialize, Serialize};

/// Active editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorMode {
    #[default]
    Select,
    Move,
    Rotate,
    Scale,
    Terrain,
    Paint,
    Lighting,
    Camera,
}

/// Smallest allowed grid cell
pub const MIN_GRID_SIZE: f32 = 0.1;
/// Largest allowed grid cell
pub const MAX_GRID_SIZE: f32 = 10.0;

/// Grid display and snapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub enabled: bool,
    pub snap_enabled: bool,
    size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            snap_enabled: true,
            size: 1.0,
        }
    }
}

impl GridSettings {
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Set the cell size, clamped to [MIN_GRID_SIZE, MAX_GRID_SIZE]
    pub fn set_size(&mut self, size: f32) {
        if size.is_nan() {
            return;
        }
        self.size = size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn toggle_snap(&mut self) {
        self.snap_enabled = !self.snap_enabled;
    }

    /// Round to the nearest grid line when snapping is on
    pub fn snap(&self, value: f32) -> f32 {
        if !self.snap_enabled {
            return value;
        }
        (value / self.size).round() * self.size
    }
}

/// Viewport overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub show_gizmos: bool,
    pub show_wireframe: bool,
    pub show_bounds: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_gizmos: true,
            show_wireframe: false,
            show_bounds: false,
        }
    }
}
