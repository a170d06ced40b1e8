use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use heads_shared::player::MoveInput;

use super::UpdateSet;

pub struct InputPlugin;

#[derive(Resource, Default)]
pub(crate) struct InputState {
    pub(crate) movement: MoveInput,
    /// Mouse motion this frame in pixels, zero while the cursor is free.
    pub(crate) look_delta: Vec2,
    pub(crate) toggle_mode: bool,
    pub(crate) pointer_locked: bool,
}

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>().add_systems(
            Update,
            (pointer_lock_system, input_system)
                .chain()
                .in_set(UpdateSet::Input),
        );
    }
}

/// Lock the cursor on click, release it on Escape.
fn pointer_lock_system(
    mut input: ResMut<InputState>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut q_cursor: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let lock = if mouse.just_pressed(MouseButton::Left) {
        true
    } else if keys.just_pressed(KeyCode::Escape) {
        false
    } else {
        return;
    };

    input.pointer_locked = lock;
    for mut cursor in &mut q_cursor {
        cursor.grab_mode = if lock {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
        cursor.visible = !lock;
    }
}

fn input_system(
    mut input: ResMut<InputState>,
    keys: Res<ButtonInput<KeyCode>>,
    motion: Res<AccumulatedMouseMotion>,
) {
    input.movement = MoveInput {
        forward: keys.pressed(KeyCode::KeyW),
        back: keys.pressed(KeyCode::KeyS),
        left: keys.pressed(KeyCode::KeyA),
        right: keys.pressed(KeyCode::KeyD),
    };
    input.toggle_mode = keys.just_pressed(KeyCode::KeyP);
    input.look_delta = if input.pointer_locked {
        motion.delta
    } else {
        Vec2::ZERO
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<InputState>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<AccumulatedMouseMotion>();
        app.add_systems(Update, (pointer_lock_system, input_system).chain());
        app
    }

    #[test]
    fn wasd_maps_to_movement() {
        let mut app = make_test_app();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyW);
            keys.press(KeyCode::KeyD);
        }
        app.update();

        let input = app.world().resource::<InputState>();
        assert!(input.movement.forward && input.movement.right);
        assert!(!input.movement.back && !input.movement.left);
    }

    #[test]
    fn p_requests_a_single_toggle() {
        let mut app = make_test_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyP);
        app.update();
        assert!(app.world().resource::<InputState>().toggle_mode);

        // Still held, no longer just pressed
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();
        assert!(!app.world().resource::<InputState>().toggle_mode);
    }

    #[test]
    fn mouse_look_needs_pointer_lock() {
        let mut app = make_test_app();
        app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(5.0, -2.0);
        app.update();
        assert_eq!(app.world().resource::<InputState>().look_delta, Vec2::ZERO);

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(5.0, -2.0);
        app.update();
        let input = app.world().resource::<InputState>();
        assert!(input.pointer_locked);
        assert_eq!(input.look_delta, Vec2::new(5.0, -2.0));
    }
}
