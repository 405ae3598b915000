//! Heightmap terrain with a 4-layer texture blend map
//!
//! The grid is `size × size` cells centred on the world origin: world
//! position `p` maps to cell `floor(p / scale + size / 2)` on each axis.
//! Brush edits (sculpt, paint, smooth) affect every cell within a world-space
//! radius of the brush centre, weighted by a linear falloff.

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use super::limits::MAX_TERRAIN_SIZE;

/// Lowest allowed cell height
pub const HEIGHT_MIN: f32 = -50.0;
/// Highest allowed cell height
pub const HEIGHT_MAX: f32 = 50.0;
/// Number of blend-map channels / texture layers
pub const BLEND_LAYERS: usize = 4;

/// One texture layer of the blend map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureLayer {
    pub asset: Option<AssetId>,
    /// UV tiling factor
    pub scale: f32,
}

impl Default for TextureLayer {
    fn default() -> Self {
        Self { asset: None, scale: 1.0 }
    }
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRegion {
    pub x1: usize,
    pub z1: usize,
    pub x2: usize,
    pub z2: usize,
}

impl CellRegion {
    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    pub fn depth(&self) -> usize {
        self.z2 - self.z1 + 1
    }

    pub fn contains(&self, x: usize, z: usize) -> bool {
        x >= self.x1 && x <= self.x2 && z >= self.z1 && z <= self.z2
    }

    /// Iterate cells row by row (z outer, x inner)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (x1, x2) = (self.x1, self.x2);
        (self.z1..=self.z2).flat_map(move |z| (x1..=x2).map(move |x| (x, z)))
    }
}

/// Copy of the heights inside a region, taken before an edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainBackup {
    pub region: CellRegion,
    /// Row-major within `region`
    pub heights: Vec<f32>,
}

/// Heightmap + blend map
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    size: usize,
    scale: f32,
    /// Row-major, index `z * size + x`
    heights: Vec<f32>,
    blend: Vec<[f32; BLEND_LAYERS]>,
    layers: [TextureLayer; BLEND_LAYERS],
}

impl Terrain {
    /// Flat terrain with no painted layers.
    ///
    /// `size` is clamped to `1..=MAX_TERRAIN_SIZE`; a non-positive scale
    /// falls back to 1.0.
    pub fn new(size: usize, scale: f32) -> Self {
        let size = size.clamp(1, MAX_TERRAIN_SIZE);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            size,
            scale,
            heights: vec![0.0; size * size],
            blend: vec![[0.0; BLEND_LAYERS]; size * size],
            layers: [TextureLayer::default(); BLEND_LAYERS],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn index(&self, x: usize, z: usize) -> usize {
        z * self.size + x
    }

    pub fn height(&self, x: usize, z: usize) -> Option<f32> {
        (x < self.size && z < self.size).then(|| self.heights[self.index(x, z)])
    }

    /// Set a cell height directly (clamped), without any undo record
    pub fn set_height(&mut self, x: usize, z: usize, height: f32) {
        if x < self.size && z < self.size {
            let i = self.index(x, z);
            self.heights[i] = height.clamp(HEIGHT_MIN, HEIGHT_MAX);
        }
    }

    /// All heights, row-major `z * size + x`
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn blend(&self, x: usize, z: usize) -> Option<[f32; BLEND_LAYERS]> {
        (x < self.size && z < self.size).then(|| self.blend[self.index(x, z)])
    }

    pub fn layers(&self) -> &[TextureLayer; BLEND_LAYERS] {
        &self.layers
    }

    /// Assign a texture to a layer; out-of-range layers are ignored
    pub fn set_texture_layer(&mut self, layer: usize, asset: Option<AssetId>, scale: f32) {
        if let Some(slot) = self.layers.get_mut(layer) {
            slot.asset = asset;
            slot.scale = scale;
        }
    }

    /// Set only the tiling factor of a layer
    pub fn set_layer_scale(&mut self, layer: usize, scale: f32) {
        if let Some(slot) = self.layers.get_mut(layer) {
            slot.scale = scale;
        }
    }

    /// Cell containing a world position, or None when it is off the grid
    pub fn world_to_cell(&self, world_x: f32, world_z: f32) -> Option<(usize, usize)> {
        let half = self.size as f32 * 0.5;
        let cx = (world_x / self.scale + half).floor();
        let cz = (world_z / self.scale + half).floor();
        let limit = self.size as f32;
        if cx >= 0.0 && cx < limit && cz >= 0.0 && cz < limit {
            Some((cx as usize, cz as usize))
        } else {
            None
        }
    }

    /// Height of the cell under a world position
    pub fn height_at_world(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let (x, z) = self.world_to_cell(world_x, world_z)?;
        self.height(x, z)
    }

    /// Square of cells around a centre, clamped to the grid
    fn window(&self, cx: usize, cz: usize, radius_cells: usize) -> CellRegion {
        let max = self.size - 1;
        CellRegion {
            x1: cx.saturating_sub(radius_cells),
            z1: cz.saturating_sub(radius_cells),
            x2: (cx + radius_cells).min(max),
            z2: (cz + radius_cells).min(max),
        }
    }

    /// Brush centre and clamped window for a brush of `radius` world units
    fn brush(&self, world_x: f32, world_z: f32, radius: f32) -> Option<(usize, usize, CellRegion)> {
        if !(radius.is_finite() && radius > 0.0) {
            return None;
        }
        let (cx, cz) = self.world_to_cell(world_x, world_z)?;
        let radius_cells = (radius / self.scale) as usize + 1;
        Some((cx, cz, self.window(cx, cz, radius_cells)))
    }

    /// World-space distance between two cells
    fn cell_distance(&self, (ax, az): (usize, usize), (bx, bz): (usize, usize)) -> f32 {
        let dx = (ax as f32 - bx as f32) * self.scale;
        let dz = (az as f32 - bz as f32) * self.scale;
        (dx * dx + dz * dz).sqrt()
    }

    /// Copy the heights of a region
    pub fn backup(&self, region: CellRegion) -> TerrainBackup {
        let heights = region.cells().map(|(x, z)| self.heights[self.index(x, z)]).collect();
        TerrainBackup { region, heights }
    }

    /// Write a backup's heights back over its region
    pub fn restore(&mut self, backup: &TerrainBackup) {
        for ((x, z), &h) in backup.region.cells().zip(backup.heights.iter()) {
            if x < self.size && z < self.size {
                let i = self.index(x, z);
                self.heights[i] = h;
            }
        }
    }

    /// Raise/lower cells around a world position.
    ///
    /// Returns the pre-edit copy of the whole brush window (including cells
    /// outside the circular radius), or None when nothing was touched.
    pub fn modify_height(
        &mut self,
        world_x: f32,
        world_z: f32,
        delta: f32,
        radius: f32,
        smooth: bool,
    ) -> Option<TerrainBackup> {
        let (cx, cz, region) = self.brush(world_x, world_z, radius)?;
        let backup = self.backup(region);

        for (x, z) in region.cells() {
            let distance = self.cell_distance((x, z), (cx, cz));
            if distance > radius {
                continue;
            }
            let mut influence = 1.0 - distance / radius;
            if smooth {
                influence = influence * influence * (3.0 - 2.0 * influence);
            }
            let i = self.index(x, z);
            self.heights[i] = (self.heights[i] + delta * influence).clamp(HEIGHT_MIN, HEIGHT_MAX);
        }

        Some(backup)
    }

    /// Paint a texture layer into the blend map. Returns false for a no-op.
    pub fn paint_texture(&mut self, world_x: f32, world_z: f32, layer: usize, intensity: f32, radius: f32) -> bool {
        if layer >= BLEND_LAYERS {
            return false;
        }
        let Some((cx, cz, region)) = self.brush(world_x, world_z, radius) else {
            return false;
        };

        for (x, z) in region.cells() {
            let distance = self.cell_distance((x, z), (cx, cz));
            if distance > radius {
                continue;
            }
            let influence = (1.0 - distance / radius) * intensity;
            let i = self.index(x, z);
            let weights = &mut self.blend[i];
            weights[layer] = (weights[layer] + influence).min(1.0);

            let total: f32 = weights.iter().sum();
            if total > 1.0 {
                for w in weights.iter_mut() {
                    *w /= total;
                }
            }
        }
        true
    }

    /// Relax heights around a world position.
    ///
    /// Each iteration records a zero-delta sculpt backup (returned in order)
    /// and then blends interior cells with their 4-neighbour average.
    pub fn smooth(&mut self, world_x: f32, world_z: f32, radius: f32, iterations: u32) -> Vec<TerrainBackup> {
        let mut backups = Vec::new();
        if !(radius.is_finite() && radius > 0.0) {
            return backups;
        }
        let Some((cx, cz)) = self.world_to_cell(world_x, world_z) else {
            return backups;
        };
        let radius_cells = (radius / self.scale) as usize;
        let inner = self.size.saturating_sub(1);

        for _ in 0..iterations {
            backups.extend(self.modify_height(world_x, world_z, 0.0, radius, true));

            let x_range = cx.saturating_sub(radius_cells).max(1)..=(cx + radius_cells).min(inner.saturating_sub(1));
            for z in cz.saturating_sub(radius_cells).max(1)..=(cz + radius_cells).min(inner.saturating_sub(1)) {
                for x in x_range.clone() {
                    let h = |xx: usize, zz: usize| self.heights[self.index(xx, zz)];
                    let avg = (h(x, z - 1) + h(x, z + 1) + h(x - 1, z) + h(x + 1, z) + h(x, z)) / 5.0;
                    let i = self.index(x, z);
                    self.heights[i] = (self.heights[i] + avg) * 0.5;
                }
            }
        }
        backups
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::new(64, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sculpt_center_and_edge() {
        let mut terrain = Terrain::new(64, 1.0);
        terrain.modify_height(0.0, 0.0, 10.0, 2.0, false).unwrap();

        assert_eq!(terrain.height(32, 32), Some(10.0));
        // distance == radius => zero influence
        assert_eq!(terrain.height(34, 32), Some(0.0));
        assert_eq!(terrain.height(33, 32), Some(5.0));
    }

    #[test]
    fn test_smoothstep_falloff() {
        let mut terrain = Terrain::new(64, 1.0);
        terrain.modify_height(0.0, 0.0, 10.0, 4.0, true).unwrap();
        // t = 0.5 => smoothstep(0.5) = 0.5
        assert_eq!(terrain.height(34, 32), Some(5.0));
        // t = 0.75 => 0.84375
        assert!((terrain.height(33, 32).unwrap() - 8.4375).abs() < 1e-5);
    }

    #[test]
    fn test_heights_clamp() {
        let mut terrain = Terrain::new(16, 1.0);
        for _ in 0..20 {
            terrain.modify_height(0.0, 0.0, 1000.0, 3.0, false);
        }
        assert_eq!(terrain.height(8, 8), Some(HEIGHT_MAX));
        assert!(terrain.heights().iter().all(|&h| h <= HEIGHT_MAX));

        for _ in 0..20 {
            terrain.modify_height(0.0, 0.0, -1000.0, 3.0, false);
        }
        assert_eq!(terrain.height(8, 8), Some(HEIGHT_MIN));
        assert!(terrain.heights().iter().all(|&h| h >= HEIGHT_MIN));
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut terrain = Terrain::new(8, 1.0);
        let before = terrain.clone();
        assert!(terrain.modify_height(100.0, 0.0, 5.0, 2.0, false).is_none());
        assert!(terrain.modify_height(0.0, 0.0, 5.0, 0.0, false).is_none());
        assert!(!terrain.paint_texture(0.0, -4.5, 0, 1.0, 2.0));
        assert!(!terrain.paint_texture(0.0, 0.0, 4, 1.0, 2.0));
        assert!(terrain.smooth(-9.0, 0.0, 2.0, 3).is_empty());
        assert_eq!(terrain, before);
    }

    #[test]
    fn test_world_to_cell_floors() {
        let terrain = Terrain::new(64, 2.0);
        assert_eq!(terrain.world_to_cell(0.0, 0.0), Some((32, 32)));
        assert_eq!(terrain.world_to_cell(-0.5, 1.9), Some((31, 32)));
        assert_eq!(terrain.world_to_cell(-64.0, 63.9), Some((0, 63)));
        assert_eq!(terrain.world_to_cell(-64.1, 0.0), None);
        assert_eq!(terrain.world_to_cell(64.0, 0.0), None);
    }

    #[test]
    fn test_backup_covers_whole_window() {
        let mut terrain = Terrain::new(64, 1.0);
        let backup = terrain.modify_height(0.0, 0.0, 1.0, 2.0, false).unwrap();
        // radius_cells = 2 + 1
        assert_eq!(backup.region, CellRegion { x1: 29, z1: 29, x2: 35, z2: 35 });
        assert_eq!(backup.heights.len(), 49);

        // Window is clamped at the grid edge
        let backup = terrain.modify_height(-32.0, -32.0, 1.0, 2.0, false).unwrap();
        assert_eq!(backup.region, CellRegion { x1: 0, z1: 0, x2: 3, z2: 3 });
    }

    #[test]
    fn test_restore_reverts_region() {
        let mut terrain = Terrain::new(32, 1.0);
        terrain.modify_height(3.0, 3.0, 4.0, 5.0, false);
        let before = terrain.clone();

        let backup = terrain.modify_height(0.0, 0.0, 7.0, 3.0, true).unwrap();
        assert_ne!(terrain, before);
        terrain.restore(&backup);
        assert_eq!(terrain, before);
    }

    #[test]
    fn test_paint_keeps_weights_normalized() {
        let mut terrain = Terrain::new(16, 1.0);
        for step in 0..12 {
            terrain.paint_texture(0.0, 0.0, step % BLEND_LAYERS, 0.7, 3.0);
            let sum: f32 = terrain.blend(8, 8).unwrap().iter().sum();
            assert!(sum <= 1.0 + 1e-5, "sum {} after step {}", sum, step);
        }

        let mut fresh = Terrain::new(16, 1.0);
        fresh.paint_texture(0.0, 0.0, 2, 0.25, 3.0);
        assert_eq!(fresh.blend(8, 8), Some([0.0, 0.0, 0.25, 0.0]));
        fresh.paint_texture(0.0, 0.0, 2, 5.0, 3.0);
        assert_eq!(fresh.blend(8, 8), Some([0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_smooth_flattens_spike() {
        let mut terrain = Terrain::new(16, 1.0);
        terrain.set_height(8, 8, 40.0);

        let backups = terrain.smooth(0.0, 0.0, 2.0, 3);
        assert_eq!(backups.len(), 3);

        let peak = terrain.height(8, 8).unwrap();
        assert!(peak < 40.0 && peak > 0.0);
        assert!(terrain.height(9, 8).unwrap() > 0.0);

        // Restoring in reverse order gets the spike back
        for backup in backups.iter().rev() {
            terrain.restore(backup);
        }
        assert_eq!(terrain.height(8, 8), Some(40.0));
        assert_eq!(terrain.height(9, 8), Some(0.0));
    }

    #[test]
    fn test_smooth_skips_border_cells() {
        let mut terrain = Terrain::new(4, 1.0);
        terrain.set_height(0, 0, 20.0);
        terrain.smooth(-2.0, -2.0, 3.0, 1);
        assert_eq!(terrain.height(0, 0), Some(20.0));
    }
}
