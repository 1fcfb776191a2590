//! Static scene: camera, lights, fog and the ground plane

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

use super::camera::OrbitCamera;

/// Background and fog colour, #72645b
pub const BACKGROUND_COLOR: Color = Color::srgb(0.447, 0.392, 0.357);

/// Ground plane height, level with the bottom of the meshes
pub const GROUND_HEIGHT: f32 = -0.5;

/// Orbit parameters resolved from the settings file
#[derive(Resource, Debug, Clone, Default)]
pub struct OrbitConfig(pub OrbitCamera);

pub fn setup_scene(
    mut commands: Commands,
    orbit: Res<OrbitConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let orbit = orbit.0.clone();

    commands.insert_resource(ClearColor(BACKGROUND_COLOR));

    commands.spawn((
        Name::new("Orbit Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 35.0_f32.to_radians(),
            near: 0.1,
            far: 15.0,
            ..default()
        }),
        orbit.transform_at(0.0),
        DistanceFog {
            color: BACKGROUND_COLOR,
            falloff: FogFalloff::Linear {
                start: 2.0,
                end: 15.0,
            },
            ..default()
        },
        AmbientLight {
            color: Color::srgb_u8(0x44, 0x33, 0x33),
            brightness: 400.0,
            ..default()
        },
        orbit,
    ));

    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x99, 0x99, 0x99),
            perceptual_roughness: 0.9,
            reflectance: 0.1,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_HEIGHT, 0.0),
    ));

    commands.spawn((
        Name::new("Key Light"),
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 1.35 * light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Warm Fill Light"),
        DirectionalLight {
            color: Color::srgb_u8(0xff, 0xaa, 0x00),
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.5, 1.0, -1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

