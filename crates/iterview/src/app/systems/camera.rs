//! Orbiting camera
//!
//! The camera circles the vertical axis at a fixed radius and height, one
//! revolution every `2π / speed` seconds, always looking at a fixed target
//! between the base mesh and the checkpoint mesh. Position depends only on
//! elapsed time, so every frame recomputes it from scratch.

use bevy::prelude::*;

use crate::lib::settings::CameraSettings;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Distance from the vertical axis
    pub radius: f32,
    /// Angular speed in radians per second
    pub speed: f32,
    /// Camera height
    pub height: f32,
    /// Point the camera looks at
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 3.0,
            speed: 0.5,
            height: 0.015,
            target: Vec3::new(0.0, 0.1, 0.0),
        }
    }
}

impl OrbitCamera {
    /// Apply any values present in the settings file
    pub fn from_settings(settings: Option<&CameraSettings>) -> Self {
        let defaults = Self::default();
        let Some(settings) = settings else {
            return defaults;
        };
        Self {
            radius: settings.radius.unwrap_or(defaults.radius),
            speed: settings.speed.unwrap_or(defaults.speed),
            height: settings.height.unwrap_or(defaults.height),
            target: settings
                .target
                .map(Vec3::from_array)
                .unwrap_or(defaults.target),
        }
    }

    /// Camera position after `elapsed` seconds
    pub fn position_at(&self, elapsed: f32) -> Vec3 {
        let angle = elapsed * self.speed;
        Vec3::new(
            angle.cos() * self.radius,
            self.height,
            angle.sin() * self.radius,
        )
    }

    /// Full camera transform after `elapsed` seconds
    pub fn transform_at(&self, elapsed: f32) -> Transform {
        Transform::from_translation(self.position_at(elapsed)).looking_at(self.target, Vec3::Y)
    }
}

/// System that moves every orbit camera along its circle
pub fn orbit_camera(time: Res<Time>, mut query: Query<(&mut Transform, &OrbitCamera)>) {
    let elapsed = time.elapsed_secs();
    for (mut transform, orbit) in query.iter_mut() {
        *transform = orbit.transform_at(elapsed);
    }
}
