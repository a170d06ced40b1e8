mod core;
mod heads;
mod hover;
mod input;
mod mode;
mod player;

pub use core::CorePlugin;
pub(crate) use core::UpdateSet;
pub use heads::HeadsPlugin;
pub use hover::HoverPlugin;
pub use input::InputPlugin;
pub use mode::ModePlugin;
pub use player::PlayerPlugin;
