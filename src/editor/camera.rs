//! Editor camera
//!
//! Two modes: orbit (the default) keeps the camera on a sphere around
//! `target`, free mode flies it with WASD-style input. Angles are degrees.

use crate::math::Vec3;
use super::selection::Selection;

/// Closest the camera gets when framing a selection
pub const MIN_FOCUS_DISTANCE: f32 = 5.0;
/// How far ahead of a free camera its target sits
const FREE_LOOK_DISTANCE: f32 = 10.0;

/// Movement keys held this frame (free mode only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Orbit radius
    pub distance: f32,
    /// Free-fly speed in units per second
    pub speed: f32,
    pub free: bool,
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, -10.0),
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: -30.0,
            distance: 15.0,
            speed: 10.0,
            free: false,
        }
    }
}

impl EditorCamera {
    /// Horizontal forward and right vectors for the current yaw
    fn ground_axes(&self) -> (Vec3, Vec3) {
        let yaw = self.yaw.to_radians();
        let right_yaw = (self.yaw + 90.0).to_radians();
        (
            Vec3::new(yaw.sin(), 0.0, yaw.cos()),
            Vec3::new(right_yaw.sin(), 0.0, right_yaw.cos()),
        )
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, input: CameraInput) {
        if self.free {
            let step = self.speed * dt;
            let (forward, right) = self.ground_axes();
            let mut motion = Vec3::ZERO;
            if input.forward {
                motion = motion + forward;
            }
            if input.back {
                motion = motion - forward;
            }
            if input.right {
                motion = motion + right;
            }
            if input.left {
                motion = motion - right;
            }
            if input.up {
                motion.y += 1.0;
            }
            if input.down {
                motion.y -= 1.0;
            }
            self.position = self.position + motion * step;

            let look = Vec3::new(forward.x, self.pitch.to_radians().sin(), forward.z);
            self.target = self.position + look * FREE_LOOK_DISTANCE;
        } else {
            let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
            let orbit = Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos());
            self.position = self.target + orbit * self.distance;
        }
    }

    /// Aim at the selection centre and back off to fit its bounds
    pub fn focus_on(&mut self, selection: &Selection) {
        if selection.is_empty() {
            return;
        }
        let (min, max) = selection.bounds();
        self.target = selection.center();
        self.distance = MIN_FOCUS_DISTANCE.max((max - min).max_element() * 2.0);
    }
}
