//! The flock of talking heads and its per-frame update.

use crate::config::FlockConfig;
use crate::mode::SceneMode;
use crate::resolve::resolve_overlaps;
use crate::spawn::{seed_behaviour, spawn_position, SpawnArea};
use crate::sprite::{Billboard, Sprite, SpriteId};
use crate::steering::{
    apply_burst, choose_target, integrate, steering_force, update_facing, update_spin,
};
use crate::vec2::Vec2;
use rand::Rng;

/// All heads in the scene, updated in insertion order.
pub struct Flock {
    config: FlockConfig,
    sprites: Vec<Sprite>,
    spawn_area: SpawnArea,
    next_id: u32,
    /// Simulated seconds since the flock was created
    elapsed: f64,
}

impl Flock {
    pub fn new(config: FlockConfig) -> Self {
        Self {
            config,
            sprites: Vec::new(),
            spawn_area: SpawnArea::default(),
            next_id: 0,
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Place a newly loaded head near the player with randomized behaviour.
    ///
    /// `expected_total` is how many heads are being loaded overall; it only
    /// affects the fallback ring position.
    pub fn spawn(
        &mut self,
        source: impl Into<String>,
        billboard: Billboard,
        player: Vec2,
        expected_total: usize,
        rng: &mut impl Rng,
    ) -> SpriteId {
        let position = spawn_position(
            &self.sprites,
            player,
            expected_total,
            &self.spawn_area,
            rng,
        );
        let id = self.insert(source, billboard, position);
        if let Some(sprite) = self.sprites.last_mut() {
            seed_behaviour(sprite, rng);
        }
        id
    }

    /// Add a head at an exact position with default behaviour state.
    pub fn insert(&mut self, source: impl Into<String>, billboard: Billboard, position: Vec2) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sprites.push(Sprite::new(id, source, billboard, position));
        id
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        // Ids are handed out in insertion order, so the index usually matches
        match self.sprites.get(id.0 as usize) {
            Some(s) if s.id == id => Some(s),
            _ => self.sprites.iter().find(|s| s.id == id),
        }
    }

    /// Mutable access to one head, e.g. to force its behaviour state.
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Simulate one frame.
    ///
    /// Heads are updated one after another; later heads already see the
    /// new positions of earlier ones. A single overlap sweep follows.
    pub fn tick(&mut self, dt: f64, player: Vec2, mode: SceneMode, rng: &mut impl Rng) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };
        self.elapsed += dt;

        let config = &self.config;
        let elapsed = self.elapsed;
        for i in 0..self.sprites.len() {
            choose_target(&mut self.sprites[i], player, dt, config, rng);
            apply_burst(&mut self.sprites[i], dt, config, rng);
            let steer = steering_force(i, &self.sprites, player, config);

            let sprite = &mut self.sprites[i];
            integrate(sprite, steer, dt, config);
            update_facing(sprite, player, dt, config, rng);
            update_spin(sprite, i, mode, elapsed, dt, config, rng);
        }

        resolve_overlaps(&mut self.sprites, player, config);
    }
}
