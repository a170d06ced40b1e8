use bevy::prelude::*;
use heads_shared::hover::pick_hovered;
use heads_shared::sprite::SpriteId;

use crate::constants::{color_from_hex, Colors};

use super::core::MainCamera;
use super::heads::FlockState;
use super::player::{camera_follow_system, PlayerState};
use super::UpdateSet;

pub struct HoverPlugin;

const LABEL_WIDTH: f32 = 240.0;
const LABEL_HEIGHT: f32 = 24.0;
const LABEL_FONT_SIZE: f32 = 16.0;

/// The head under the centre of the screen, if any.
#[derive(Resource, Default)]
pub(crate) struct HoverState {
    pub(crate) target: Option<SpriteId>,
    pub(crate) name: String,
    /// World position the label is centred on
    pub(crate) anchor: Vec3,
}

#[derive(Component)]
struct HoverLabel;

#[derive(Component)]
struct HoverLabelText;

impl Plugin for HoverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoverState>()
            .add_systems(Startup, spawn_hover_label)
            .add_systems(
                Update,
                (hover_pick_system, hover_label_system)
                    .chain()
                    .after(camera_follow_system)
                    .in_set(UpdateSet::Visuals),
            );
    }
}

fn spawn_hover_label(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH),
                height: Val::Px(LABEL_HEIGHT),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Visibility::Hidden,
            HoverLabel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(LABEL_FONT_SIZE),
                TextColor(color_from_hex(Colors::HUD_TEXT)),
                HoverLabelText,
            ));
        });
}

fn hover_pick_system(
    player: Res<PlayerState>,
    state: Res<FlockState>,
    mut hover: ResMut<HoverState>,
) {
    let player = &player.player;
    let hit = pick_hovered(state.flock.sprites(), player.eye(), player.look_direction())
        .and_then(|id| state.flock.sprite(id));

    let Some(sprite) = hit else {
        if hover.target.is_some() {
            hover.target = None;
        }
        return;
    };

    let [x, y, z] = sprite.label_anchor();
    hover.anchor = Vec3::new(x as f32, y as f32, z as f32);
    if hover.target != Some(sprite.id) {
        hover.target = Some(sprite.id);
        hover.name = sprite.display_name().to_string();
    }
}

/// Project the hovered head's label anchor onto the screen.
fn hover_label_system(
    hover: Res<HoverState>,
    q_camera: Query<(&Camera, &Transform), With<MainCamera>>,
    mut q_label: Query<(&mut Node, &mut Visibility), With<HoverLabel>>,
    mut q_text: Query<&mut Text, With<HoverLabelText>>,
) {
    let screen = hover.target.and_then(|_| {
        let (camera, transform) = q_camera.iter().next()?;
        camera
            .world_to_viewport(&GlobalTransform::from(*transform), hover.anchor)
            .ok()
    });

    if hover.target.is_some() {
        for mut text in &mut q_text {
            if text.0 != hover.name {
                text.0 = hover.name.clone();
            }
        }
    }

    for (mut node, mut visibility) in &mut q_label {
        match screen {
            Some(pos) => {
                node.left = Val::Px(pos.x - LABEL_WIDTH * 0.5);
                node.top = Val::Px(pos.y - LABEL_HEIGHT * 0.5);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
