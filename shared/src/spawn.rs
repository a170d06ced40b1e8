//! Initial placement and behaviour seeding for newly loaded heads.

use crate::sprite::{Facing, SpinState, Sprite};
use crate::steering::uniform;
use crate::vec2::{length, sub, vec2, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

/// Where new heads may appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    /// Centre of the square spawn area
    pub center: Vec2,
    /// Side length of the square spawn area
    pub size: f64,
    /// Heads never spawn closer than this to the player
    pub min_player_dist: f64,
    /// Heads never spawn closer than this to each other
    pub min_spacing: f64,
    pub max_attempts: u32,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: 20.0,
            min_player_dist: 1.0,
            min_spacing: 0.3,
            max_attempts: 50,
        }
    }
}

/// Pick a spawn point for the next head.
///
/// Random points in the area are tried until one clears the player and all
/// existing heads. If none does, the head goes on a spiral-ish ring keyed by
/// how many heads already exist out of `expected_total`.
pub fn spawn_position(
    existing: &[Sprite],
    player: Vec2,
    expected_total: usize,
    area: &SpawnArea,
    rng: &mut impl Rng,
) -> Vec2 {
    for _ in 0..area.max_attempts {
        let candidate = vec2(
            area.center.x + (rng.gen::<f64>() - 0.5) * area.size,
            area.center.z + (rng.gen::<f64>() - 0.5) * area.size,
        );
        if length(sub(candidate, player)) < area.min_player_dist {
            continue;
        }
        let clear = existing
            .iter()
            .all(|s| length(sub(candidate, s.position)) >= area.min_spacing);
        if clear {
            return candidate;
        }
    }

    let count = existing.len();
    let angle = (count as f64 / expected_total.max(1) as f64) * TAU;
    let radius = 1.0 + count as f64 * 0.3;
    vec2(
        area.center.x + angle.cos() * radius,
        area.center.z + angle.sin() * radius,
    )
}

/// Randomize the behaviour state of a freshly placed head.
pub fn seed_behaviour(sprite: &mut Sprite, rng: &mut impl Rng) {
    sprite.velocity = vec2(
        (rng.gen::<f64>() * 2.0 - 1.0) * 1.5,
        (rng.gen::<f64>() * 2.0 - 1.0) * 1.5,
    );
    sprite.retarget_timer = uniform(rng, 1.0, 3.0);
    sprite.spin = SpinState::Orbiting {
        remaining: uniform(rng, 1.0, 4.0),
    };
    sprite.burst_timer = uniform(rng, 1.0, 4.0);
    sprite.wander_angle = rng.gen::<f64>() * TAU;
    sprite.face_timer = uniform(rng, 0.4, 1.2);
    sprite.facing = if rng.gen::<f64>() < 0.4 {
        Facing::Player
    } else {
        Facing::Travel
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{Billboard, SpriteId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sprite_at(id: u32, p: Vec2) -> Sprite {
        Sprite::new(SpriteId(id), "s", Billboard::from_image_size(1, 1), p)
    }

    #[test]
    fn spawn_lands_inside_area_away_from_player() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let area = SpawnArea::default();
        let player = vec2(0.0, 0.0);
        let mut existing = Vec::new();
        for i in 0..20 {
            let p = spawn_position(&existing, player, 20, &area, &mut rng);
            assert!(p.x.abs() <= 10.0 && p.z.abs() <= 10.0);
            assert!(length(p) >= 1.0);
            for s in &existing {
                assert!(length(sub(p, s.position)) >= 0.3);
            }
            existing.push(sprite_at(i, p));
        }
    }

    #[test]
    fn impossible_area_uses_ring_fallback() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        // The whole area is inside the player exclusion zone
        let area = SpawnArea {
            size: 0.5,
            ..Default::default()
        };
        let existing = vec![sprite_at(0, vec2(5.0, 5.0)), sprite_at(1, vec2(-5.0, 5.0))];
        let p = spawn_position(&existing, Vec2::ZERO, 4, &area, &mut rng);
        let angle = (2.0 / 4.0) * TAU;
        let radius = 1.0 + 2.0 * 0.3;
        assert!((p.x - angle.cos() * radius).abs() < 1e-9);
        assert!((p.z - angle.sin() * radius).abs() < 1e-9);
    }

    #[test]
    fn fallback_tolerates_zero_expected_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let area = SpawnArea {
            size: 0.0,
            ..Default::default()
        };
        let p = spawn_position(&[], Vec2::ZERO, 0, &area, &mut rng);
        assert!(p.x.is_finite() && p.z.is_finite());
    }

    #[test]
    fn seeded_behaviour_is_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut s = sprite_at(0, Vec2::ZERO);
        seed_behaviour(&mut s, &mut rng);
        assert!(s.velocity.x.abs() <= 1.5 && s.velocity.z.abs() <= 1.5);
        assert!((1.0..3.0).contains(&s.retarget_timer));
        assert!((1.0..4.0).contains(&s.burst_timer));
        assert!((0.4..1.2).contains(&s.face_timer));
        match s.spin {
            SpinState::Orbiting { remaining } => assert!((1.0..4.0).contains(&remaining)),
            SpinState::Spinning => panic!("new heads start orbiting"),
        }
    }
}
