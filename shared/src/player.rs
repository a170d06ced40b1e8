//! First-person player: mouse look and WASD walking on the ground plane.

use crate::vec2::{add, length_sq, scale, vec2, Vec2};
use std::f64::consts::FRAC_PI_2;

/// Camera height above the ground plane origin.
pub const EYE_HEIGHT: f64 = 1.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    /// Forward walking speed (units/s)
    pub move_speed: f64,
    /// Sideways speed as a fraction of `move_speed`
    pub strafe_factor: f64,
    /// Radians of turn per pixel of mouse motion
    pub mouse_sensitivity: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            strafe_factor: 0.75,
            mouse_sensitivity: 0.002,
        }
    }
}

/// Which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub config: PlayerConfig,
    /// Ground-plane position under the camera
    pub position: Vec2,
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default(), vec2(0.0, 40.0))
    }
}

impl Player {
    pub fn new(config: PlayerConfig, position: Vec2) -> Self {
        Self {
            config,
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Apply raw mouse motion in pixels.
    pub fn look(&mut self, dx: f64, dy: f64) {
        self.yaw -= dx * self.config.mouse_sensitivity;
        self.pitch = (self.pitch - dy * self.config.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Ground-plane direction the camera looks along (yaw only).
    pub fn forward(&self) -> Vec2 {
        vec2(-self.yaw.sin(), -self.yaw.cos())
    }

    pub fn right(&self) -> Vec2 {
        vec2(self.yaw.cos(), -self.yaw.sin())
    }

    /// Walk according to `input`. Returns true if the player moved.
    pub fn step(&mut self, input: MoveInput, dt: f64) -> bool {
        let mut dir = Vec2::ZERO;
        if input.forward {
            dir = add(dir, self.forward());
        }
        if input.back {
            dir = add(dir, scale(self.forward(), -1.0));
        }
        if input.right {
            dir = add(dir, scale(self.right(), self.config.strafe_factor));
        }
        if input.left {
            dir = add(dir, scale(self.right(), -self.config.strafe_factor));
        }
        if length_sq(dir) < 1e-12 {
            return false;
        }
        self.position = add(self.position, scale(dir, self.config.move_speed * dt));
        true
    }

    /// Unit view direction (x, y, z) including pitch, as seen through the camera.
    pub fn look_direction(&self) -> [f64; 3] {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        [-sy * cp, sp, -cy * cp]
    }

    /// Camera position (x, y, z).
    pub fn eye(&self) -> [f64; 3] {
        [self.position.x, EYE_HEIGHT, self.position.z]
    }
}
