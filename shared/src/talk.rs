//! Periodic "talking" squash on a random head.

use crate::sprite::SpriteId;
use crate::steering::uniform;
use rand::Rng;
use std::f64::consts::PI;

/// Seconds between talk starts.
pub const TALK_INTERVAL: f64 = 1.2;
/// How far a talking head stretches vertically at peak amplitude.
pub const TALK_STRETCH: f64 = 0.04;
const TALK_DURATION_MIN: f64 = 0.8;
const TALK_DURATION_MAX: f64 = 1.8;

/// Mouth amplitude at normalized time `t` in [0, 1]: a decaying wobble.
pub fn talk_amplitude(t: f64) -> f64 {
    if !(0.0..1.0).contains(&t) {
        return 0.0;
    }
    ((t * PI * 3.0).sin() * (1.0 - t)).max(0.0)
}

#[derive(Debug, Clone, PartialEq)]
struct Talk {
    target: SpriteId,
    elapsed: f64,
    duration: f64,
}

/// Starts a talk on a random head every interval and tracks running ones.
#[derive(Debug, Clone, Default)]
pub struct TalkScheduler {
    timer: f64,
    active: Vec<Talk>,
}

impl TalkScheduler {
    /// Advance running talks and maybe start a new one among `heads`.
    /// Returns the head that started talking this frame, if any.
    pub fn advance(&mut self, dt: f64, heads: &[SpriteId], rng: &mut impl Rng) -> Option<SpriteId> {
        for talk in &mut self.active {
            talk.elapsed += dt;
        }
        self.active.retain(|t| t.elapsed < t.duration);

        self.timer += dt;
        if self.timer < TALK_INTERVAL {
            return None;
        }
        self.timer -= TALK_INTERVAL;
        if heads.is_empty() {
            return None;
        }

        let target = heads[rng.gen_range(0..heads.len())];
        self.active.push(Talk {
            target,
            elapsed: 0.0,
            duration: uniform(rng, TALK_DURATION_MIN, TALK_DURATION_MAX),
        });
        Some(target)
    }

    /// Current amplitude for a head; zero if it is not talking.
    pub fn amplitude(&self, id: SpriteId) -> f64 {
        self.active
            .iter()
            .filter(|t| t.target == id)
            .map(|t| talk_amplitude(t.elapsed / t.duration))
            .fold(0.0, f64::max)
    }

    /// Vertical scale factor for a head.
    pub fn vertical_scale(&self, id: SpriteId) -> f64 {
        1.0 + self.amplitude(id) * TALK_STRETCH
    }

    pub fn is_talking(&self, id: SpriteId) -> bool {
        self.active.iter().any(|t| t.target == id)
    }
}
