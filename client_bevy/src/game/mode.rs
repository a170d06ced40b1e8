use bevy::prelude::*;
use heads_shared::mode::ModeState;

use crate::constants::{color_from_hex, Colors};

use super::core::SimRng;
use super::input::InputState;
use super::UpdateSet;

pub struct ModePlugin;

const HUD_LEFT: f32 = 10.0;
const HUD_TOP: f32 = 10.0;
const HUD_PADDING: f32 = 6.0;
const HUD_FONT_SIZE: f32 = 14.0;

#[derive(Resource, Default)]
pub(crate) struct SceneModeState(pub(crate) ModeState);

#[derive(Component)]
struct HudModeText;

impl Plugin for ModePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneModeState>()
            .add_systems(Startup, spawn_mode_hud)
            .add_systems(
                Update,
                (mode_toggle_system, sky_cycle_system)
                    .chain()
                    .in_set(UpdateSet::Simulate),
            );
    }
}

fn spawn_mode_hud(mut commands: Commands, mode: Res<SceneModeState>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_LEFT),
            top: Val::Px(HUD_TOP),
            padding: UiRect::all(Val::Px(HUD_PADDING)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Text::new(mode.0.label()),
        TextFont::from_font_size(HUD_FONT_SIZE),
        TextColor(color_from_hex(Colors::HUD_TEXT)),
        HudModeText,
    ));
}

fn mode_toggle_system(
    input: Res<InputState>,
    mut mode: ResMut<SceneModeState>,
    mut clear: ResMut<ClearColor>,
    mut q_text: Query<&mut Text, With<HudModeText>>,
) {
    if !input.toggle_mode {
        return;
    }
    let now = mode.0.toggle();
    info!("Scene mode: {:?}", now);

    for mut text in &mut q_text {
        text.0 = mode.0.label().to_string();
    }
    clear.0 = color_from_hex(mode.0.sky_color());
}

fn sky_cycle_system(
    mut mode: ResMut<SceneModeState>,
    mut clear: ResMut<ClearColor>,
    mut rng: ResMut<SimRng>,
    time: Res<Time>,
) {
    if mode.0.advance(time.delta_secs_f64(), &mut rng.0) {
        clear.0 = color_from_hex(mode.0.sky_color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use heads_shared::mode::{BASE_SKY, CRAZY_PALETTE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    fn make_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(SimRng(ChaCha8Rng::seed_from_u64(3)));
        app.insert_resource(ClearColor(color_from_hex(BASE_SKY)));
        app.init_resource::<InputState>();
        app.init_resource::<SceneModeState>();
        app.add_systems(Startup, spawn_mode_hud);
        app.add_systems(Update, (mode_toggle_system, sky_cycle_system).chain());
        app
    }

    fn hud_text(app: &mut App) -> String {
        let mut q = app
            .world_mut()
            .query_filtered::<&Text, With<HudModeText>>();
        q.single(app.world()).unwrap().0.clone()
    }

    #[test]
    fn toggle_flips_mode_and_label() {
        let mut app = make_test_app();
        app.update();
        assert!(hud_text(&mut app).contains("DISABLED"));

        app.world_mut().resource_mut::<InputState>().toggle_mode = true;
        app.update();
        assert!(app.world().resource::<SceneModeState>().0.is_crazy());
        assert!(hud_text(&mut app).contains("ENABLED"));
    }

    #[test]
    fn crazy_sky_cycles_through_palette_and_resets() {
        let mut app = make_test_app();
        app.world_mut().resource_mut::<InputState>().toggle_mode = true;
        app.update();
        app.world_mut().resource_mut::<InputState>().toggle_mode = false;
        // 0.5s cycle at 100ms per frame
        for _ in 0..8 {
            app.update();
        }
        let sky = app.world().resource::<SceneModeState>().0.sky_color();
        assert!(CRAZY_PALETTE.contains(&sky));
        assert_eq!(app.world().resource::<ClearColor>().0, color_from_hex(sky));

        app.world_mut().resource_mut::<InputState>().toggle_mode = true;
        app.update();
        assert_eq!(
            app.world().resource::<ClearColor>().0,
            color_from_hex(BASE_SKY)
        );
    }
}
