use bevy::prelude::*;
use heads_shared::player::Player;

use super::core::MainCamera;
use super::input::InputState;
use super::UpdateSet;

pub struct PlayerPlugin;

#[derive(Resource, Default)]
pub(crate) struct PlayerState {
    pub(crate) player: Player,
}

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerState>()
            .add_systems(Update, player_motion_system.in_set(UpdateSet::Simulate))
            .add_systems(Update, camera_follow_system.in_set(UpdateSet::Visuals));
    }
}

pub(crate) fn player_motion_system(input: Res<InputState>, mut state: ResMut<PlayerState>, time: Res<Time>) {
    let look = input.look_delta;
    if look != Vec2::ZERO {
        state.player.look(look.x as f64, look.y as f64);
    }
    state.player.step(input.movement, time.delta_secs_f64());
}

/// Camera sits at eye height above the player, yaw then pitch.
pub(crate) fn camera_follow_system(
    state: Res<PlayerState>,
    mut q_camera: Query<&mut Transform, With<MainCamera>>,
) {
    let player = &state.player;
    let [x, y, z] = player.eye();
    for mut transform in &mut q_camera {
        transform.translation = Vec3::new(x as f32, y as f32, z as f32);
        transform.rotation =
            Quat::from_euler(EulerRot::YXZ, player.yaw as f32, player.pitch as f32, 0.0);
    }
}
