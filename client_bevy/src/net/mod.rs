mod connection;
mod forward;
mod panic;

pub use connection::{NetEvent, ServerLink};
pub use forward::forward_log_layer;
pub use panic::install_panic_forwarder;

use bevy::prelude::*;
use heads_shared::protocol::{images_or_fallback, AssetList};

use crate::game::UpdateSet;

/// The image paths to turn into heads, delivered once.
#[derive(Message, Debug, Clone)]
pub struct ImageListMessage(pub AssetList);

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ImageListMessage>()
            .add_systems(
                Update,
                (network_event_system, forward::forward_logs_system).in_set(UpdateSet::Network),
            );
    }
}

fn network_event_system(link: Res<ServerLink>, mut writer: MessageWriter<ImageListMessage>) {
    for evt in link.poll_events() {
        match evt {
            NetEvent::ImageList(list) => {
                if list.is_empty() {
                    warn!("No images from server, using fallback list");
                }
                let list = images_or_fallback(list);
                info!("Loading {} heads", list.len());
                writer.write(ImageListMessage(list));
            }
            NetEvent::ImageListFailed(e) => {
                error!(url = link.base_url(), "Error fetching images: {}", e);
                writer.write(ImageListMessage(images_or_fallback(Vec::new())));
            }
        }
    }
}
