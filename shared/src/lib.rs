pub mod config;
pub mod flock;
pub mod hover;
pub mod mode;
pub mod player;
pub mod protocol;
pub mod resolve;
pub mod spawn;
pub mod sprite;
pub mod steering;
pub mod talk;
pub mod vec2;
