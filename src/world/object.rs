//! Editor objects
//!
//! Every placeable thing in a level is an [`EditorObject`]. What kind of
//! object it is lives in [`ObjectProperties`]: the variant *is* the type, so
//! the type tag and its payload cannot disagree.

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use crate::math::Vec3;

/// Unique, positive object identifier
pub type ObjectId = u32;

/// Object type tag
///
/// The discriminants are the integers written to level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    StaticMesh = 0,
    Light = 1,
    SpawnPoint = 2,
    Trigger = 3,
    ParticleEmitter = 4,
    AudioSource = 5,
    Waypoint = 6,
    Camera = 7,
    Decal = 8,
}

impl ObjectType {
    pub const ALL: [ObjectType; 9] = [
        ObjectType::StaticMesh,
        ObjectType::Light,
        ObjectType::SpawnPoint,
        ObjectType::Trigger,
        ObjectType::ParticleEmitter,
        ObjectType::AudioSource,
        ObjectType::Waypoint,
        ObjectType::Camera,
        ObjectType::Decal,
    ];

    /// Integer code used in level files
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Inverse of [`ObjectType::code`]
    pub fn from_code(code: i32) -> Option<ObjectType> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Display name for the object type
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::StaticMesh => "Static Mesh",
            ObjectType::Light => "Light",
            ObjectType::SpawnPoint => "Spawn Point",
            ObjectType::Trigger => "Trigger",
            ObjectType::ParticleEmitter => "Particle Emitter",
            ObjectType::AudioSource => "Audio Source",
            ObjectType::Waypoint => "Waypoint",
            ObjectType::Camera => "Camera",
            ObjectType::Decal => "Decal",
        }
    }

    /// Prefix for auto-generated names (`<prefix>_<id>`)
    fn name_prefix(self) -> &'static str {
        match self {
            ObjectType::StaticMesh => "StaticMesh",
            ObjectType::Light => "Light",
            ObjectType::SpawnPoint => "SpawnPoint",
            ObjectType::Trigger => "Trigger",
            ObjectType::ParticleEmitter
            | ObjectType::AudioSource
            | ObjectType::Waypoint
            | ObjectType::Camera
            | ObjectType::Decal => "Object",
        }
    }
}

/// Static mesh settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshProperties {
    pub material_id: Option<i32>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl Default for MeshProperties {
    fn default() -> Self {
        Self {
            material_id: None,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

/// Light falloff model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

impl LightKind {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<LightKind> {
        match code {
            0 => Some(LightKind::Directional),
            1 => Some(LightKind::Point),
            2 => Some(LightKind::Spot),
            _ => None,
        }
    }
}

/// Light settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightProperties {
    /// RGB, 0.0-1.0 per channel
    pub color: Vec3,
    pub intensity: f32,
    /// Falloff range in world units
    pub range: f32,
    pub light_kind: LightKind,
    /// Cone angle in degrees (spot lights)
    pub spot_angle: f32,
}

impl Default for LightProperties {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            light_kind: LightKind::Point,
            spot_angle: 45.0,
        }
    }
}

/// Spawn point settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnProperties {
    pub team: i32,
    pub spawn_type: i32,
}

/// Trigger volume settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerProperties {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    /// Script run when the trigger fires
    pub script: String,
    pub trigger_once: bool,
}

impl TriggerProperties {
    /// A 2x2x2 volume centred on `position`
    pub fn around(position: Vec3) -> Self {
        Self {
            bounds_min: position - Vec3::ONE,
            bounds_max: position + Vec3::ONE,
            script: String::new(),
            trigger_once: false,
        }
    }
}

/// Type-specific payload; the variant determines the object's type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectProperties {
    StaticMesh(MeshProperties),
    Light(LightProperties),
    SpawnPoint(SpawnProperties),
    Trigger(TriggerProperties),
    ParticleEmitter,
    AudioSource,
    Waypoint,
    Camera,
    Decal,
}

impl ObjectProperties {
    /// Default payload for a freshly placed object of `object_type`
    pub fn defaults_for(object_type: ObjectType, position: Vec3) -> Self {
        match object_type {
            ObjectType::StaticMesh => ObjectProperties::StaticMesh(MeshProperties::default()),
            ObjectType::Light => ObjectProperties::Light(LightProperties::default()),
            ObjectType::SpawnPoint => ObjectProperties::SpawnPoint(SpawnProperties::default()),
            ObjectType::Trigger => ObjectProperties::Trigger(TriggerProperties::around(position)),
            ObjectType::ParticleEmitter => ObjectProperties::ParticleEmitter,
            ObjectType::AudioSource => ObjectProperties::AudioSource,
            ObjectType::Waypoint => ObjectProperties::Waypoint,
            ObjectType::Camera => ObjectProperties::Camera,
            ObjectType::Decal => ObjectProperties::Decal,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectProperties::StaticMesh(_) => ObjectType::StaticMesh,
            ObjectProperties::Light(_) => ObjectType::Light,
            ObjectProperties::SpawnPoint(_) => ObjectType::SpawnPoint,
            ObjectProperties::Trigger(_) => ObjectType::Trigger,
            ObjectProperties::ParticleEmitter => ObjectType::ParticleEmitter,
            ObjectProperties::AudioSource => ObjectType::AudioSource,
            ObjectProperties::Waypoint => ObjectType::Waypoint,
            ObjectProperties::Camera => ObjectType::Camera,
            ObjectProperties::Decal => ObjectType::Decal,
        }
    }
}

/// A placed object in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorObject {
    pub id: ObjectId,
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    pub scale: Vec3,
    pub name: String,
    /// Referenced asset in the session's cache
    pub asset: Option<AssetId>,
    pub visible: bool,
    pub locked: bool,
    pub properties: ObjectProperties,
}

impl EditorObject {
    /// Create an object with the per-type defaults and generated name
    pub fn new(id: ObjectId, object_type: ObjectType, position: Vec3) -> Self {
        Self {
            id,
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            name: format!("{}_{}", object_type.name_prefix(), id),
            asset: None,
            visible: true,
            locked: false,
            properties: ObjectProperties::defaults_for(object_type, position),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.properties.object_type()
    }

    /// Light payload, if this is a light
    pub fn light(&self) -> Option<&LightProperties> {
        match &self.properties {
            ObjectProperties::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Trigger payload, if this is a trigger
    pub fn trigger(&self) -> Option<&TriggerProperties> {
        match &self.properties {
            ObjectProperties::Trigger(trigger) => Some(trigger),
            _ => None,
        }
    }

    /// Whether select-all and similar bulk tools may pick this object
    pub fn is_selectable(&self) -> bool {
        self.visible && !self.locked
    }
}
