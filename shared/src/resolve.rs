//! Hard overlap resolution, run once after the steering pass.
//!
//! A single all-pairs sweep: overlapping footprints are pushed apart by half
//! the overlap each, and heads sharing a bearing from the player are rotated
//! apart by half the angular deficit each. The sweep is not iterated, so
//! crowded flocks may keep small residual overlaps.

use crate::config::FlockConfig;
use crate::sprite::Sprite;
use crate::steering::MIN_BEARING_DIST_SQ;
use crate::vec2::{add, bearing, length_sq, rotate_about, scale, sub, wrap_angle, Vec2};

/// Squared distance below which two heads count as coincident.
const COINCIDENT_DIST_SQ: f64 = 1e-6;

/// Push a pair of heads apart so their centres end `desired` apart.
fn separate_pair(a: &mut Sprite, b: &mut Sprite, config: &FlockConfig) {
    let desired = config.separation_for(a.radius(), b.radius());
    let delta = sub(a.position, b.position);
    let dist_sq = length_sq(delta);
    if dist_sq >= desired * desired {
        return;
    }

    // Coincident heads have no connecting vector; split them along +X.
    let (dir, dist) = if dist_sq <= COINCIDENT_DIST_SQ {
        (Vec2::new(1.0, 0.0), 0.0)
    } else {
        let dist = dist_sq.sqrt();
        (scale(delta, 1.0 / dist), dist)
    };
    let push = scale(dir, (desired - dist) * 0.5);
    a.position = add(a.position, push);
    b.position = sub(b.position, push);
}

/// Rotate a pair of heads about the player until their bearings differ by
/// at least the lane angle.
fn spread_pair(a: &mut Sprite, b: &mut Sprite, player: Vec2, config: &FlockConfig) {
    let off_a = sub(a.position, player);
    let off_b = sub(b.position, player);
    if length_sq(off_a) <= MIN_BEARING_DIST_SQ || length_sq(off_b) <= MIN_BEARING_DIST_SQ {
        return;
    }
    let d_ang = wrap_angle(bearing(off_a) - bearing(off_b));
    if d_ang.abs() >= config.lane_min_angle {
        return;
    }
    let sign = if d_ang >= 0.0 { 1.0 } else { -1.0 };
    let half_deficit = (config.lane_min_angle - d_ang.abs()) * 0.5;
    a.position = rotate_about(a.position, player, sign * half_deficit);
    b.position = rotate_about(b.position, player, -sign * half_deficit);
}

/// Run one resolution sweep over every pair of heads.
pub fn resolve_overlaps(sprites: &mut [Sprite], player: Vec2, config: &FlockConfig) {
    for i in 0..sprites.len() {
        let (head, tail) = sprites.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            separate_pair(a, b, config);
            spread_pair(a, b, player, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{Billboard, SpriteId};
    use crate::vec2::{length, vec2};

    fn unit_sprite_at(id: u32, x: f64, z: f64) -> Sprite {
        let billboard = Billboard {
            width: 2.5,
            height: 2.5,
        };
        Sprite::new(SpriteId(id), "unit", billboard, vec2(x, z))
    }

    fn distance(a: &Sprite, b: &Sprite) -> f64 {
        length(sub(a.position, b.position))
    }

    #[test]
    fn coincident_pair_ends_at_min_separation() {
        let config = FlockConfig::default();
        let mut sprites = vec![unit_sprite_at(1, 10.0, 0.0), unit_sprite_at(2, 10.0, 0.0)];
        resolve_overlaps(&mut sprites, Vec2::ZERO, &config);
        let d = distance(&sprites[0], &sprites[1]);
        assert!(d.is_finite());
        assert!(d >= config.separation_for(1.0, 1.0) - 1e-9, "distance {d}");
    }

    #[test]
    fn coincident_pair_on_player_has_no_nan() {
        let config = FlockConfig::default();
        let mut sprites = vec![unit_sprite_at(1, 0.0, 0.0), unit_sprite_at(2, 0.0, 0.0)];
        resolve_overlaps(&mut sprites, Vec2::ZERO, &config);
        for s in &sprites {
            assert!(s.position.x.is_finite() && s.position.z.is_finite());
        }
        assert!(distance(&sprites[0], &sprites[1]) >= 12.0 - 1e-9);
    }

    #[test]
    fn overlapping_pair_moves_apart() {
        let config = FlockConfig::default();
        // Player sits between the pair, so their bearings are opposite
        let player = vec2(0.5, 0.0);
        let mut sprites = vec![unit_sprite_at(1, -2.0, 0.0), unit_sprite_at(2, 3.0, 0.0)];
        let before = distance(&sprites[0], &sprites[1]);
        resolve_overlaps(&mut sprites, player, &config);
        let after = distance(&sprites[0], &sprites[1]);
        assert!(after > before);
        assert!((after - 12.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_push_is_split_evenly() {
        let config = FlockConfig {
            lane_min_angle: 0.0,
            ..Default::default()
        };
        let player = vec2(0.0, -1000.0);
        let mut sprites = vec![unit_sprite_at(1, -1.0, 0.0), unit_sprite_at(2, 1.0, 0.0)];
        resolve_overlaps(&mut sprites, player, &config);
        assert!((sprites[0].position.x + 6.0).abs() < 1e-9);
        assert!((sprites[1].position.x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn same_bearing_pair_is_spread_to_lane_angle() {
        let config = FlockConfig {
            separation_scale: 1e-3,
            ..Default::default()
        };
        let player = Vec2::ZERO;
        let mut sprites = vec![unit_sprite_at(1, 0.0, 20.0), unit_sprite_at(2, 0.0, 30.0)];
        resolve_overlaps(&mut sprites, player, &config);
        let gap = wrap_angle(bearing(sprites[0].position) - bearing(sprites[1].position));
        assert!((gap.abs() - config.lane_min_angle).abs() < 1e-9);
        // Radial distances are preserved by the rotation
        assert!((length(sprites[0].position) - 20.0).abs() < 1e-9);
        assert!((length(sprites[1].position) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn separated_pair_is_untouched() {
        let config = FlockConfig::default();
        let mut sprites = vec![unit_sprite_at(1, 30.0, 0.0), unit_sprite_at(2, -30.0, 0.0)];
        resolve_overlaps(&mut sprites, Vec2::ZERO, &config);
        assert_eq!(sprites[0].position, vec2(30.0, 0.0));
        assert_eq!(sprites[1].position, vec2(-30.0, 0.0));
    }

    #[test]
    fn close_pairs_always_move_apart() {
        let config = FlockConfig::default();
        let player = vec2(3.0, -7.0);
        for k in 0..40 {
            let t = k as f64 * 0.37;
            let a = vec2(t.cos() * 15.0, t.sin() * 15.0);
            let b = add(a, vec2((t * 3.1).cos() * 4.0, (t * 1.7).sin() * 4.0));
            let mut sprites = vec![unit_sprite_at(1, a.x, a.z), unit_sprite_at(2, b.x, b.z)];
            let before = distance(&sprites[0], &sprites[1]);
            assert!(before < 12.0);
            resolve_overlaps(&mut sprites, player, &config);
            let after = distance(&sprites[0], &sprites[1]);
            assert!(after > before, "case {k}: {before} -> {after}");
        }
    }

    #[test]
    fn crowded_flock_stays_finite() {
        let config = FlockConfig::default();
        let mut sprites: Vec<Sprite> = (0..6)
            .map(|i| unit_sprite_at(i, 20.0 + i as f64 * 0.1, 0.0))
            .collect();
        resolve_overlaps(&mut sprites, Vec2::ZERO, &config);
        for s in &sprites {
            assert!(s.position.x.is_finite() && s.position.z.is_finite());
        }
    }
}
