//! Editor session - the single owner of all level-editing state

use std::path::{Path, PathBuf};

use crate::asset::{AssetCache, AssetError, AssetId, AssetKind};
use crate::config::EditorConfig;
use crate::math::Vec3;
use crate::world::{self, EditorObject, LevelDocument, LevelError, ObjectId, ObjectType, Terrain};
use super::camera::{CameraInput, EditorCamera};
use super::selection::Selection;
use super::store::{EditorError, ObjectStore};
use super::tools::{EditorMode, GridSettings, ViewOptions};
use super::undo::{UndoAction, UndoLog};

/// Everything one open level needs: objects, terrain, selection, undo
/// history, asset cache and tool state.
///
/// All mutations go through `&mut self`. Edits made through
/// [`EditorSession::find_object_mut`] or [`EditorSession::terrain_mut`] bypass
/// the undo log; use [`EditorSession::modify_object`] and the terrain brush
/// methods for undoable edits.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    store: ObjectStore,
    terrain: Terrain,
    selection: Selection,
    undo: UndoLog,
    assets: AssetCache,

    mode: EditorMode,
    pub grid: GridSettings,
    pub view: ViewOptions,
    pub camera: EditorCamera,

    /// Unsaved changes
    dirty: bool,
    /// Last file saved to or loaded from
    current_file: Option<PathBuf>,
}

impl EditorSession {
    /// Fresh session; default assets that fail to load are skipped
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        let mut assets = AssetCache::new(config.max_assets);
        if let Some(dir) = &config.thumbnail_dir {
            assets = assets.with_thumbnail_dir(dir);
        }

        let mut session = Self {
            store: ObjectStore::new(config.max_objects),
            terrain: Terrain::new(config.terrain_size, config.terrain_scale),
            selection: Selection::new(config.max_selection),
            undo: UndoLog::new(config.undo_depth),
            assets,
            mode: EditorMode::default(),
            grid: GridSettings::default(),
            view: ViewOptions::default(),
            camera: EditorCamera::default(),
            dirty: false,
            current_file: None,
            config,
        };
        session.load_default_assets();
        session
    }

    /// Back to an empty level: drops objects, selection, history, terrain
    /// edits and cached assets, then reloads the default assets.
    pub fn reset(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.selection.recompute(&self.store);
        self.undo.clear();
        self.terrain = Terrain::new(self.config.terrain_size, self.config.terrain_scale);
        self.assets.clear();
        self.mode = EditorMode::default();
        self.camera = EditorCamera::default();
        self.dirty = false;
        self.current_file = None;
        self.load_default_assets();
    }

    /// Load the configured default assets; returns how many are available
    pub fn load_default_assets(&mut self) -> usize {
        let mut loaded = 0;
        for default in &self.config.default_assets {
            match self.assets.load(&default.path, &default.name, default.kind) {
                Ok(_) => loaded += 1,
                Err(e) => log::debug!("default asset {} unavailable: {}", default.path, e),
            }
        }
        loaded
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Place a new object with its type's defaults
    pub fn create_object(&mut self, object_type: ObjectType, position: Vec3) -> Result<ObjectId, EditorError> {
        let id = self.store.create(object_type, position)?;
        self.undo.push(UndoAction::ObjectCreate { id });
        self.dirty = true;
        Ok(id)
    }

    /// Delete an object. Returns false (and records nothing) for unknown ids.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.store.remove(id) else {
            return false;
        };
        self.undo.push(UndoAction::ObjectDelete { object });
        if self.selection.remove(id) {
            self.selection.recompute(&self.store);
        }
        self.dirty = true;
        true
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&EditorObject> {
        self.store.find(id)
    }

    /// Direct mutable access; not recorded for undo
    pub fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut EditorObject> {
        self.store.find_mut(id)
    }

    /// Apply `edit` to an object as one undoable step.
    ///
    /// The object's id cannot be changed this way. Returns false for unknown
    /// ids.
    pub fn modify_object<F>(&mut self, id: ObjectId, edit: F) -> bool
    where
        F: FnOnce(&mut EditorObject),
    {
        let Some(object) = self.store.find_mut(id) else {
            return false;
        };
        let before = object.clone();
        edit(&mut *object);
        object.id = id;
        let after = object.clone();

        self.undo.push(UndoAction::ObjectModify { before, after });
        if self.selection.contains(id) {
            self.selection.recompute(&self.store);
        }
        self.dirty = true;
        true
    }

    /// Copy every selected object, offset by the configured duplicate
    /// offset. Each copy is a separate undo step. Stops early, without error,
    /// when the store fills up.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let offset = self.config.duplicate_offset;
        // Originals in store order, captured before any copies exist
        let originals: Vec<EditorObject> = self
            .store
            .iter()
            .filter(|o| self.selection.contains(o.id))
            .cloned()
            .collect();

        let mut created = Vec::new();
        for original in originals {
            let Ok(id) = self.create_object(original.object_type(), original.position + offset) else {
                log::debug!("duplicate stopped: object store full");
                break;
            };
            if let Some(copy) = self.store.find_mut(id) {
                copy.rotation = original.rotation;
                copy.scale = original.scale;
                copy.asset = original.asset;
                copy.properties = original.properties.clone();
                copy.name = format!("{}_Copy", original.name);
            }
            created.push(id);
        }
        created
    }

    /// Objects in store order
    pub fn objects(&self) -> impl Iterator<Item = &EditorObject> {
        self.store.iter()
    }

    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    /// Point an object at an asset, loading it through the cache first
    pub fn assign_asset(&mut self, id: ObjectId, filename: &str, kind: AssetKind) -> Result<bool, AssetError> {
        if !self.store.contains(id) {
            return Ok(false);
        }
        let asset = self.assets.load(filename, filename, kind)?;
        Ok(self.modify_object(id, |o| o.asset = Some(asset)))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.selection.recompute(&self.store);
    }

    /// Add an object to the selection. Unknown ids and a full selection are
    /// ignored.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        let added = self.selection.insert(id);
        if added {
            self.selection.recompute(&self.store);
        }
        added
    }

    pub fn deselect(&mut self, id: ObjectId) -> bool {
        let removed = self.selection.remove(id);
        if removed {
            self.selection.recompute(&self.store);
        }
        removed
    }

    pub fn toggle_selection(&mut self, id: ObjectId) {
        if self.is_selected(id) {
            self.deselect(id);
        } else {
            self.select(id);
        }
    }

    /// Replace the selection with every visible, unlocked object (up to the
    /// selection capacity)
    pub fn select_all(&mut self) {
        self.selection.clear();
        for object in self.store.iter().filter(|o| o.is_selectable()) {
            if self.selection.is_full() {
                break;
            }
            self.selection.insert(object.id);
        }
        self.selection.recompute(&self.store);
    }

    /// Record the current selection as an undo step
    pub fn record_selection_change(&mut self) {
        self.undo.push(UndoAction::SelectionChange { ids: self.selection.ids().to_vec() });
    }

    // ------------------------------------------------------------------
    // Terrain
    // ------------------------------------------------------------------

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Direct mutable access; not recorded for undo
    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    /// Sculpt brush. Returns false when the brush missed the terrain.
    pub fn modify_terrain_height(&mut self, world_x: f32, world_z: f32, delta: f32, radius: f32, smooth: bool) -> bool {
        match self.terrain.modify_height(world_x, world_z, delta, radius, smooth) {
            Some(backup) => {
                self.undo.push(UndoAction::TerrainModify(backup));
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Paint brush. Not undoable.
    pub fn paint_terrain_texture(&mut self, world_x: f32, world_z: f32, layer: usize, intensity: f32, radius: f32) -> bool {
        let painted = self.terrain.paint_texture(world_x, world_z, layer, intensity, radius);
        self.dirty |= painted;
        painted
    }

    /// Smoothing brush; each iteration is its own undo step
    pub fn smooth_terrain(&mut self, world_x: f32, world_z: f32, radius: f32, iterations: u32) -> bool {
        let backups = self.terrain.smooth(world_x, world_z, radius, iterations);
        let touched = !backups.is_empty();
        for backup in backups {
            self.undo.push(UndoAction::TerrainModify(backup));
        }
        self.dirty |= touched;
        touched
    }

    /// Load a texture and bind it to a blend layer
    pub fn set_terrain_texture(&mut self, layer: usize, filename: &str, scale: f32) -> Result<AssetId, AssetError> {
        let id = self.assets.load(filename, filename, AssetKind::Texture)?;
        self.terrain.set_texture_layer(layer, Some(id), scale);
        self.dirty = true;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn load_asset(&mut self, filename: &str, display_name: &str, kind: AssetKind) -> Result<AssetId, AssetError> {
        self.assets.load(filename, display_name, kind)
    }

    // ------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Revert the newest recorded action. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.undo.pop() else {
            return false;
        };
        log::debug!("undo: {}", action.label());

        match action {
            UndoAction::ObjectCreate { id } => {
                self.store.remove(id);
                self.selection.remove(id);
            }
            UndoAction::ObjectDelete { object } => {
                let id = object.id;
                if self.store.insert(object).is_err() {
                    log::warn!("cannot restore object {}: store full", id);
                }
            }
            UndoAction::ObjectModify { before, .. } => {
                if let Some(object) = self.store.find_mut(before.id) {
                    *object = before;
                }
            }
            UndoAction::TerrainModify(backup) => self.terrain.restore(&backup),
            UndoAction::SelectionChange { ids } => {
                self.selection.clear();
                for id in ids.into_iter().filter(|&id| self.store.contains(id)) {
                    self.selection.insert(id);
                }
            }
        }

        self.selection.recompute(&self.store);
        self.dirty = true;
        true
    }

    // ------------------------------------------------------------------
    // Modes and camera
    // ------------------------------------------------------------------

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch tools; the selection is cleared
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.clear_selection();
    }

    pub fn focus_camera_on_selection(&mut self) {
        self.camera.focus_on(&self.selection);
    }

    pub fn update_camera(&mut self, dt: f32, input: CameraInput) {
        self.camera.update(dt, input);
    }

    // ------------------------------------------------------------------
    // Level files
    // ------------------------------------------------------------------

    /// Write the level to `path`
    pub fn save_level<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LevelError> {
        let path = path.as_ref();
        world::save_level(path, &self.terrain, self.store.iter(), &self.assets)?;
        log::info!(
            "saved level {} ({} objects, terrain {}x{})",
            path.display(),
            self.store.len(),
            self.terrain.size(),
            self.terrain.size()
        );
        self.dirty = false;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Replace the session contents with a level file.
    ///
    /// Nothing changes if the file cannot be read or is invalid. The undo
    /// log is empty afterwards.
    pub fn load_level<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LevelError> {
        let path = path.as_ref();
        let doc = world::read_level(path)?;

        self.reset();
        self.apply_document(doc);
        self.undo.clear();
        self.dirty = false;
        self.current_file = Some(path.to_path_buf());

        log::info!(
            "loaded level {} ({} objects, terrain {}x{})",
            path.display(),
            self.store.len(),
            self.terrain.size(),
            self.terrain.size()
        );
        Ok(())
    }

    fn apply_document(&mut self, doc: LevelDocument) {
        let record = doc.terrain;
        let size = record.size.unwrap_or(self.config.terrain_size);
        let scale = record.scale.unwrap_or(self.config.terrain_scale);
        self.terrain = Terrain::new(size, scale);

        for layer in 0..record.textures.len() {
            let scale = record.texture_scales[layer];
            match &record.textures[layer] {
                Some(path) => {
                    let asset = match self.assets.load(path, path, AssetKind::Texture) {
                        Ok(id) => Some(id),
                        Err(e) => {
                            log::warn!("terrain texture {} not loaded: {}", path, e);
                            None
                        }
                    };
                    self.terrain.set_texture_layer(layer, asset, scale.unwrap_or(1.0));
                }
                None => {
                    if let Some(scale) = scale {
                        self.terrain.set_layer_scale(layer, scale);
                    }
                }
            }
        }

        if let Some(heights) = record.heights {
            let size = self.terrain.size();
            if heights.len() != size * size {
                log::warn!("expected {} heights, found {}", size * size, heights.len());
            }
            for (i, h) in heights.into_iter().take(size * size).enumerate() {
                self.terrain.set_height(i % size, i / size, h);
            }
        }

        for record in doc.objects {
            // Each object takes an allocator slot before its id is forced
            let slot = match self.store.create(ObjectType::StaticMesh, Vec3::ZERO) {
                Ok(slot) => slot,
                Err(e) => {
                    log::warn!("{}; skipping remaining objects", e);
                    break;
                }
            };
            let mut object = record.object;
            if let Some(path) = &record.asset_path {
                object.asset = match self.assets.load(path, path, AssetKind::Model) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("asset {} for object {} not loaded: {}", path, object.id, e);
                        None
                    }
                };
            }
            if let Some(stored) = self.store.find_mut(slot) {
                *stored = object;
            }
        }

        if self.config.reconcile_loaded_ids {
            self.store.reserve_past_existing();
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        EditorSession::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{LightKind, ObjectProperties};
    use tempfile::TempDir;

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::headless())
    }

    fn session_with(edit: impl FnOnce(&mut EditorConfig)) -> EditorSession {
        let mut config = EditorConfig::headless();
        edit(&mut config);
        EditorSession::new(config)
    }

    #[test]
    fn test_create_and_undo() {
        let mut s = session();
        let a = s.create_object(ObjectType::StaticMesh, Vec3::ZERO).unwrap();
        let b = s.create_object(ObjectType::Light, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(s.object_count(), 2);
        s.select(b);

        assert!(s.undo());
        assert_eq!(s.object_count(), 1);
        assert!(s.find_object(b).is_none());
        assert!(!s.is_selected(b));
        // Undoing a create records nothing new
        assert_eq!(s.undo_log().len(), 1);
    }

    #[test]
    fn test_delete_and_undo_restores_identical_object() {
        let mut s = session();
        let id = s.create_object(ObjectType::Trigger, Vec3::new(4.0, 0.0, 4.0)).unwrap();
        s.find_object_mut(id).unwrap().name = "Door".to_string();
        let snapshot = s.find_object(id).unwrap().clone();
        s.select(id);

        assert!(s.delete_object(id));
        assert!(s.selection().is_empty());
        assert!(!s.delete_object(id));

        assert!(s.undo());
        assert_eq!(s.find_object(id), Some(&snapshot));
        // Restored objects do not rejoin the selection
        assert!(!s.is_selected(id));
    }

    #[test]
    fn test_modify_object_undo() {
        let mut s = session();
        let id = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        s.select(id);

        assert!(s.modify_object(id, |o| {
            o.position = Vec3::new(3.0, 0.0, 0.0);
            o.id = 999;
            if let ObjectProperties::Light(light) = &mut o.properties {
                light.light_kind = LightKind::Spot;
            }
        }));
        assert_eq!(s.find_object(id).unwrap().light().unwrap().light_kind, LightKind::Spot);
        assert_eq!(s.selection().center(), Vec3::new(3.0, 0.0, 0.0));

        assert!(s.undo());
        let restored = s.find_object(id).unwrap();
        assert_eq!(restored.position, Vec3::ZERO);
        assert_eq!(restored.light().unwrap().light_kind, LightKind::Point);
        assert_eq!(s.selection().center(), Vec3::ZERO);
        assert!(!s.modify_object(12345, |_| {}));
    }

    #[test]
    fn test_select_rules() {
        let mut s = session_with(|c| c.max_selection = 2);
        let ids: Vec<_> = (0..3)
            .map(|i| s.create_object(ObjectType::Waypoint, Vec3::splat(i as f32)).unwrap())
            .collect();

        assert!(!s.select(777));
        assert!(s.select(ids[0]));
        assert!(!s.select(ids[0]));
        assert!(s.select(ids[1]));
        assert!(!s.select(ids[2]));
        assert_eq!(s.selection().len(), 2);

        s.toggle_selection(ids[0]);
        assert!(!s.is_selected(ids[0]));
        s.toggle_selection(ids[2]);
        assert!(s.is_selected(ids[2]));
    }

    #[test]
    fn test_select_all_skips_hidden_and_locked() {
        let mut s = session();
        let a = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        let b = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        let c = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        s.find_object_mut(b).unwrap().visible = false;
        s.find_object_mut(c).unwrap().locked = true;

        s.select_all();
        assert_eq!(s.selection().ids(), &[a]);
    }

    #[test]
    fn test_selection_change_undo() {
        let mut s = session();
        let a = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        let b = s.create_object(ObjectType::Light, Vec3::new(2.0, 0.0, 0.0)).unwrap();
        s.select(a);
        s.select(b);
        s.record_selection_change();

        s.clear_selection();
        s.select(a);
        assert!(s.undo());
        assert_eq!(s.selection().ids(), &[a, b]);
        assert_eq!(s.selection().center(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_duplicate_selected() {
        let mut s = session();
        let a = s.create_object(ObjectType::Light, Vec3::new(1.0, 0.0, 1.0)).unwrap();
        let b = s.create_object(ObjectType::SpawnPoint, Vec3::ZERO).unwrap();
        s.modify_object(a, |o| o.rotation = Vec3::new(0.0, 45.0, 0.0));
        s.select(b);
        s.select(a);
        let undo_before = s.undo_log().len();

        let copies = s.duplicate_selected();
        assert_eq!(copies.len(), 2);
        // Store order, not selection order
        let first = s.find_object(copies[0]).unwrap();
        assert_eq!(first.name, "Light_1_Copy");
        assert_eq!(first.position, Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(first.rotation, Vec3::new(0.0, 45.0, 0.0));
        assert_eq!(s.find_object(copies[1]).unwrap().object_type(), ObjectType::SpawnPoint);

        assert_eq!(s.undo_log().len(), undo_before + 2);
        s.undo();
        s.undo();
        assert_eq!(s.object_count(), 2);
    }

    #[test]
    fn test_duplicate_stops_when_full() {
        let mut s = session_with(|c| c.max_objects = 3);
        let a = s.create_object(ObjectType::Decal, Vec3::ZERO).unwrap();
        let b = s.create_object(ObjectType::Decal, Vec3::ZERO).unwrap();
        s.select_all();
        assert_eq!(s.duplicate_selected().len(), 1);
        assert_eq!(s.object_count(), 3);
        assert!(s.find_object(a).is_some() && s.find_object(b).is_some());
        assert!(matches!(
            s.create_object(ObjectType::Decal, Vec3::ZERO),
            Err(EditorError::StoreFull { capacity: 3 })
        ));
    }

    #[test]
    fn test_undo_delete_skipped_when_full() {
        let mut s = session_with(|c| c.max_objects = 1);
        let a = s.create_object(ObjectType::Decal, Vec3::ZERO).unwrap();
        s.delete_object(a);
        let other = s.store.create(ObjectType::Decal, Vec3::ZERO).unwrap();
        assert!(s.undo());
        assert_eq!(s.object_count(), 1);
        assert!(s.find_object(other).is_some());
    }

    #[test]
    fn test_terrain_edit_undo() {
        let mut s = session();
        assert!(s.modify_terrain_height(0.0, 0.0, 10.0, 2.0, false));
        assert_eq!(s.terrain().height(32, 32), Some(10.0));
        assert!(!s.modify_terrain_height(500.0, 0.0, 10.0, 2.0, false));

        assert!(s.undo());
        assert_eq!(s.terrain().height(32, 32), Some(0.0));

        // Paint is not undoable
        assert!(s.paint_terrain_texture(0.0, 0.0, 1, 0.5, 2.0));
        assert!(s.undo_log().is_empty());
    }

    #[test]
    fn test_smooth_pushes_one_entry_per_iteration() {
        let mut s = session();
        s.terrain_mut().set_height(32, 32, 20.0);
        assert!(s.smooth_terrain(0.0, 0.0, 3.0, 4));
        assert_eq!(s.undo_log().len(), 4);
        while s.undo() {}
        assert_eq!(s.terrain().height(32, 32), Some(20.0));
    }

    #[test]
    fn test_undo_capacity_eviction() {
        let mut s = session_with(|c| c.undo_depth = 3);
        let ids: Vec<_> = (0..4)
            .map(|_| s.create_object(ObjectType::Camera, Vec3::ZERO).unwrap())
            .collect();

        for _ in 0..3 {
            assert!(s.undo());
        }
        assert!(!s.undo());
        assert_eq!(s.objects().map(|o| o.id).collect::<Vec<_>>(), vec![ids[0]]);
    }

    #[test]
    fn test_set_mode_clears_selection() {
        let mut s = session();
        let id = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        s.select(id);
        s.set_mode(EditorMode::Terrain);
        assert_eq!(s.mode(), EditorMode::Terrain);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lvl");

        let mut s = session();
        let light = s.create_object(ObjectType::Light, Vec3::new(5.0, 1.0, -2.0)).unwrap();
        s.modify_object(light, |o| {
            if let ObjectProperties::Light(l) = &mut o.properties {
                l.color = Vec3::new(1.0, 0.5, 0.25);
                l.intensity = 2.0;
                l.range = 15.0;
                l.light_kind = LightKind::Spot;
            }
        });
        let mesh = s.create_object(ObjectType::StaticMesh, Vec3::ZERO).unwrap();
        s.find_object_mut(mesh).unwrap().properties =
            ObjectProperties::StaticMesh(crate::world::MeshProperties {
                material_id: Some(3),
                cast_shadows: false,
                receive_shadows: true,
            });
        s.modify_terrain_height(0.0, 0.0, 10.0, 2.0, false);
        s.save_level(&path).unwrap();
        assert!(!s.is_dirty());

        let expected_light = s.find_object(light).unwrap().clone();

        let mut loaded = session();
        loaded.create_object(ObjectType::Decal, Vec3::ZERO).unwrap();
        loaded.load_level(&path).unwrap();

        assert_eq!(loaded.object_count(), 2);
        assert!(loaded.undo_log().is_empty());
        assert_eq!(loaded.find_object(light), Some(&expected_light));
        let ObjectProperties::StaticMesh(props) = &loaded.find_object(mesh).unwrap().properties else {
            panic!("expected static mesh");
        };
        assert_eq!(props.material_id, None);
        assert_eq!(loaded.terrain().height(32, 32), Some(10.0));
        assert_eq!(loaded.current_file(), Some(path.as_path()));

        // Reconciled allocator never hands out a loaded id
        let fresh = loaded.create_object(ObjectType::Waypoint, Vec3::ZERO).unwrap();
        assert!(fresh > light && fresh > mesh);
    }

    #[test]
    fn test_load_missing_file_leaves_state() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        let id = s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        assert!(matches!(s.load_level(dir.path().join("missing.lvl")), Err(LevelError::Io(_))));
        assert!(s.find_object(id).is_some());
        assert_eq!(s.undo_log().len(), 1);
    }

    #[test]
    fn test_load_invalid_terrain_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.lvl");
        std::fs::write(&path, "[TERRAIN]\nsize=500\n").unwrap();

        let mut s = session();
        s.create_object(ObjectType::Light, Vec3::ZERO).unwrap();
        assert!(matches!(s.load_level(&path), Err(LevelError::Validation(_))));
        assert_eq!(s.object_count(), 1);
    }

    #[test]
    fn test_load_max_object_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("max.lvl");
        std::fs::write(&path, "[OBJECT_4294967295]\ntype=6\n").unwrap();

        let mut s = session();
        s.load_level(&path).unwrap();
        assert_eq!(s.object_count(), 0);
        assert_eq!(s.create_object(ObjectType::Waypoint, Vec3::ZERO).unwrap(), 1);

        std::fs::write(&path, "[OBJECT_4294967294]\ntype=6\n").unwrap();
        s.load_level(&path).unwrap();
        assert_eq!(s.object_count(), 1);
        assert_eq!(s.find_object(ObjectId::MAX - 1).unwrap().object_type(), ObjectType::Waypoint);
        assert_eq!(
            s.create_object(ObjectType::Waypoint, Vec3::ZERO),
            Err(EditorError::IdsExhausted)
        );
        assert_eq!(s.object_count(), 1);
    }
}
