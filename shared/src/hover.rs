//! Which head sits under the centre of the screen.

use crate::sprite::{Sprite, SpriteId};

const PARALLEL_EPS: f64 = 1e-9;

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Distance along the ray at which it crosses the head's billboard, if it
/// does. The billboard is the upright `width` x `height` rectangle centred on
/// the head and turned by its yaw; both faces count.
pub fn ray_hit(sprite: &Sprite, origin: [f64; 3], dir: [f64; 3]) -> Option<f64> {
    let (sin_yaw, cos_yaw) = sprite.yaw.sin_cos();
    let normal = [sin_yaw, 0.0, cos_yaw];
    let right = [cos_yaw, 0.0, -sin_yaw];
    let center = sprite.translation();

    let denom = dot3(dir, normal);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let t = dot3(sub3(center, origin), normal) / denom;
    if !t.is_finite() || t <= 0.0 {
        return None;
    }

    let hit = [origin[0] + dir[0] * t, origin[1] + dir[1] * t, origin[2] + dir[2] * t];
    let local = sub3(hit, center);
    let u = dot3(local, right);
    let v = local[1];
    let half_w = sprite.billboard.width * 0.5;
    let half_h = sprite.billboard.height * 0.5;
    (u.abs() <= half_w && v.abs() <= half_h).then_some(t)
}

/// Nearest head hit by the ray.
pub fn pick_hovered(sprites: &[Sprite], origin: [f64; 3], dir: [f64; 3]) -> Option<SpriteId> {
    sprites
        .iter()
        .filter_map(|s| ray_hit(s, origin, dir).map(|t| (t, s.id)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::sprite::Billboard;
    use crate::vec2::vec2;

    fn head(id: u32, x: f64, z: f64) -> Sprite {
        Sprite::new(
            SpriteId(id),
            format!("/images/{id}.png"),
            Billboard::from_image_size(1, 1),
            vec2(x, z),
        )
    }

    #[test]
    fn head_straight_ahead_is_hit() {
        let player = Player::default();
        let s = head(0, 0.0, 20.0);
        let t = ray_hit(&s, player.eye(), player.look_direction()).unwrap();
        assert!((t - 20.0).abs() < 1e-9);
    }

    #[test]
    fn head_behind_is_not_hit() {
        let player = Player::default();
        let s = head(0, 0.0, 60.0);
        assert!(ray_hit(&s, player.eye(), player.look_direction()).is_none());
    }

    #[test]
    fn ray_past_the_edge_misses() {
        let player = Player::default();
        // Billboard is 19.2 wide, so an 11 unit offset is past its edge
        let s = head(0, 11.0, 20.0);
        assert!(ray_hit(&s, player.eye(), player.look_direction()).is_none());
        let s = head(0, 9.0, 20.0);
        assert!(ray_hit(&s, player.eye(), player.look_direction()).is_some());
    }

    #[test]
    fn edge_on_billboard_is_not_hit() {
        let player = Player::default();
        let mut s = head(0, 0.0, 20.0);
        s.yaw = std::f64::consts::FRAC_PI_2;
        assert!(ray_hit(&s, player.eye(), player.look_direction()).is_none());
    }

    #[test]
    fn looking_over_the_head_misses() {
        let mut player = Player::default();
        player.look(0.0, -400.0);
        let s = head(0, 0.0, 20.0);
        assert!(ray_hit(&s, player.eye(), player.look_direction()).is_none());
    }

    #[test]
    fn nearest_head_wins() {
        let player = Player::default();
        let sprites = vec![head(0, 0.0, 0.0), head(1, 1.0, 25.0), head(2, 0.0, 60.0)];
        assert_eq!(
            pick_hovered(&sprites, player.eye(), player.look_direction()),
            Some(SpriteId(1))
        );
        assert_eq!(pick_hovered(&[], player.eye(), player.look_direction()), None);
    }
}
