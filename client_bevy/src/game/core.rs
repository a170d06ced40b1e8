use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use heads_shared::mode::BASE_SKY;
use heads_shared::player::EYE_HEIGHT;
use heads_shared::sprite::GROUND_Y;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::constants::{
    color_from_hex, Colors, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, GROUND_SIZE, MOON_POSITION,
    MOON_RADIUS,
};
use crate::net::ServerLink;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Network,
    Input,
    Simulate,
    Visuals,
}

pub struct CorePlugin {
    pub server_url: String,
}

#[derive(Component)]
pub(crate) struct MainCamera;

/// Randomness shared by every simulation system.
#[derive(Resource)]
pub(crate) struct SimRng(pub(crate) ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ServerLink::new(self.server_url.clone()))
            .init_resource::<SimRng>()
            .insert_resource(ClearColor(color_from_hex(BASE_SKY)))
            .configure_sets(
                Update,
                (
                    UpdateSet::Network,
                    UpdateSet::Input,
                    UpdateSet::Simulate,
                    UpdateSet::Visuals,
                )
                    .chain(),
            )
            .add_systems(Startup, (setup_camera, setup_world));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        // Keep palette colours exact
        Tonemapping::None,
        Transform::from_xyz(0.0, EYE_HEIGHT as f32, 40.0),
        MainCamera,
    ));
}

fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::GROUND),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_Y as f32, 0.0),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(MOON_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::MOON),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(Vec3::from_array(MOON_POSITION)),
    ));
}
