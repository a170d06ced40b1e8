use bevy::asset::LoadState;
use bevy::prelude::*;
use heads_shared::config::FlockConfig;
use heads_shared::flock::Flock;
use heads_shared::sprite::{Billboard, SpriteId};
use heads_shared::talk::TalkScheduler;

use crate::constants::{asset_path, HEAD_ALPHA_CUTOFF};
use crate::net::ImageListMessage;

use super::core::SimRng;
use super::mode::SceneModeState;
use super::player::{player_motion_system, PlayerState};
use super::UpdateSet;

pub struct HeadsPlugin;

#[derive(Resource)]
pub(crate) struct FlockState {
    pub(crate) flock: Flock,
}

impl Default for FlockState {
    fn default() -> Self {
        Self {
            flock: Flock::new(FlockConfig::default()),
        }
    }
}

#[derive(Resource, Default)]
pub(crate) struct TalkState(pub(crate) TalkScheduler);

/// Images requested from the asset server that have not become heads yet.
#[derive(Resource, Default)]
pub(crate) struct HeadLoader {
    pending: Vec<PendingHead>,
    expected_total: usize,
}

struct PendingHead {
    source: String,
    handle: Handle<Image>,
}

/// Billboard entity for one head in the flock.
#[derive(Component)]
pub(crate) struct Head {
    pub(crate) id: SpriteId,
}

impl Plugin for HeadsPlugin {
    fn build(&self, app: &mut App) {
        let config = FlockConfig::default();
        if let Err(e) = config.validate() {
            error!("Invalid flock configuration: {}", e);
        }

        app.insert_resource(FlockState {
            flock: Flock::new(config),
        })
        .init_resource::<TalkState>()
        .init_resource::<HeadLoader>()
        .add_systems(
            Update,
            (
                request_head_images,
                spawn_loaded_heads,
                flock_tick_system.after(player_motion_system),
                talk_system,
            )
                .chain()
                .in_set(UpdateSet::Simulate),
        )
        .add_systems(Update, sync_head_transforms.in_set(UpdateSet::Visuals));
    }
}

fn request_head_images(
    mut reader: MessageReader<ImageListMessage>,
    asset_server: Res<AssetServer>,
    mut loader: ResMut<HeadLoader>,
) {
    for ImageListMessage(list) in reader.read() {
        loader.expected_total += list.len();
        for source in list {
            let handle = asset_server.load::<Image>(asset_path(source).to_string());
            loader.pending.push(PendingHead {
                source: source.clone(),
                handle,
            });
        }
    }
}

/// Turn every image that finished loading into a head; drop failed ones.
#[allow(clippy::too_many_arguments)]
fn spawn_loaded_heads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut loader: ResMut<HeadLoader>,
    mut state: ResMut<FlockState>,
    mut rng: ResMut<SimRng>,
    player: Res<PlayerState>,
) {
    if loader.pending.is_empty() {
        return;
    }
    let expected_total = loader.expected_total;

    for head in std::mem::take(&mut loader.pending) {
        match asset_server.load_state(&head.handle) {
            LoadState::Loaded => {
                let Some(image) = images.get(&head.handle) else {
                    loader.pending.push(head);
                    continue;
                };
                let billboard = Billboard::from_image_size(image.width(), image.height());
                let id = state.flock.spawn(
                    head.source.clone(),
                    billboard,
                    player.player.position,
                    expected_total,
                    &mut rng.0,
                );
                let Some(sprite) = state.flock.sprite(id) else {
                    continue;
                };

                let [x, y, z] = sprite.translation();
                commands.spawn((
                    Mesh3d(meshes.add(Rectangle::new(
                        billboard.width as f32,
                        billboard.height as f32,
                    ))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color_texture: Some(head.handle.clone()),
                        unlit: true,
                        alpha_mode: AlphaMode::Mask(HEAD_ALPHA_CUTOFF),
                        double_sided: true,
                        cull_mode: None,
                        ..default()
                    })),
                    Transform::from_xyz(x as f32, y as f32, z as f32)
                        .with_rotation(Quat::from_rotation_y(sprite.yaw as f32)),
                    Head { id },
                    Name::new(sprite.display_name().to_string()),
                ));
                info!(
                    "Head {} joined ({} of {})",
                    sprite.display_name(),
                    state.flock.len(),
                    expected_total
                );
            }
            LoadState::Failed(err) => {
                warn!(source = %head.source, "Failed to load image: {}", err);
            }
            _ => loader.pending.push(head),
        }
    }
}

fn flock_tick_system(
    mut state: ResMut<FlockState>,
    player: Res<PlayerState>,
    mode: Res<SceneModeState>,
    mut rng: ResMut<SimRng>,
    time: Res<Time>,
) {
    let position = player.player.position;
    state
        .flock
        .tick(time.delta_secs_f64(), position, mode.0.mode(), &mut rng.0);
}

fn talk_system(
    mut talk: ResMut<TalkState>,
    state: Res<FlockState>,
    mut rng: ResMut<SimRng>,
    time: Res<Time>,
) {
    let ids: Vec<SpriteId> = state.flock.sprites().iter().map(|s| s.id).collect();
    if let Some(id) = talk.0.advance(time.delta_secs_f64(), &ids, &mut rng.0) {
        if let Some(sprite) = state.flock.sprite(id) {
            debug!("{} is talking", sprite.display_name());
        }
    }
}

fn sync_head_transforms(
    state: Res<FlockState>,
    talk: Res<TalkState>,
    mut q_heads: Query<(&Head, &mut Transform)>,
) {
    for (head, mut transform) in &mut q_heads {
        let Some(sprite) = state.flock.sprite(head.id) else {
            continue;
        };
        let [x, y, z] = sprite.translation();
        transform.translation = Vec3::new(x as f32, y as f32, z as f32);
        transform.rotation = Quat::from_rotation_y(sprite.yaw as f32);
        transform.scale = Vec3::new(1.0, talk.0.vertical_scale(head.id) as f32, 1.0);
    }
}
