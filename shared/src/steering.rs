//! Per-head steering behaviours.
//!
//! Each function covers one step of the per-frame head update so the flock
//! tick reads as a sequence and every step can be tested on its own.

use crate::config::FlockConfig;
use crate::mode::SceneMode;
use crate::sprite::{Facing, SpinState, Sprite};
use crate::vec2::{
    add, bearing, clamp_length, from_angle, length, length_sq, normalize, scale, sub, tangent,
    wrap_angle, Vec2,
};
use rand::Rng;

/// Below this distance a direction toward the player is meaningless.
pub const MIN_STEER_DIST: f64 = 1e-4;

/// Squared distance from the player inside which seeking keeps the old velocity.
pub const MIN_SEEK_DIST_SQ: f64 = 1e-4;

/// Squared distance from the player below which bearings are undefined.
pub const MIN_BEARING_DIST_SQ: f64 = 1e-6;

/// Uniform sample in [min, max). Tolerates min == max.
pub fn uniform(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Uniform sample in [-magnitude, magnitude).
fn symmetric(rng: &mut impl Rng, magnitude: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * magnitude
}

/// Count down the retarget timer and pick a new velocity when it expires.
///
/// Mostly heads seek the player along a jittered line; otherwise they
/// wander along a slowly drifting heading.
pub fn choose_target(
    sprite: &mut Sprite,
    player: Vec2,
    dt: f64,
    config: &FlockConfig,
    rng: &mut impl Rng,
) {
    sprite.retarget_timer -= dt;
    if sprite.retarget_timer > 0.0 {
        return;
    }

    if rng.gen::<f64>() < config.seek_probability {
        let to_player = sub(player, sprite.position);
        if length_sq(to_player) > MIN_SEEK_DIST_SQ {
            let jitter = Vec2::new(
                symmetric(rng, config.seek_jitter),
                symmetric(rng, config.seek_jitter),
            );
            let dir = normalize(add(normalize(to_player), jitter));
            let speed = uniform(rng, config.seek_speed_min, config.seek_speed_max);
            sprite.velocity = scale(dir, speed);
        }
    } else {
        sprite.wander_angle += symmetric(rng, config.wander_turn);
        let speed = uniform(rng, config.wander_speed_min, config.wander_speed_max);
        sprite.velocity = scale(from_angle(sprite.wander_angle), speed);
    }
    sprite.retarget_timer = uniform(rng, config.retarget_min, config.retarget_max);
}

/// Add a random impulse when the burst timer expires.
pub fn apply_burst(sprite: &mut Sprite, dt: f64, config: &FlockConfig, rng: &mut impl Rng) {
    sprite.burst_timer -= dt;
    if sprite.burst_timer > 0.0 {
        return;
    }
    let burst = Vec2::new(
        symmetric(rng, config.burst_strength),
        symmetric(rng, config.burst_strength),
    );
    sprite.velocity = add(sprite.velocity, burst);
    sprite.burst_timer = uniform(rng, config.burst_interval_min, config.burst_interval_max);
}

/// Keep a head inside the preferred ring around the player, plus a pursuit
/// pull that never drops to zero and grows toward the ring's outer edge.
pub fn ring_force(position: Vec2, player: Vec2, config: &FlockConfig) -> Vec2 {
    let to_player = sub(player, position);
    let dist = length(to_player);
    if dist <= MIN_STEER_DIST {
        return Vec2::ZERO;
    }
    let inward = scale(to_player, 1.0 / dist);

    let mut steer = Vec2::ZERO;
    if dist > config.ring_outer {
        steer = add(steer, scale(inward, config.ring_push));
    } else if dist < config.ring_inner {
        steer = add(steer, scale(inward, -config.ring_push));
    }

    let band = (config.ring_outer - config.ring_inner).max(1e-3);
    let pursuit = ((dist - config.ring_inner) / band).clamp(0.0, 1.0);
    let pull = config.pursuit_base + config.pursuit_gain * pursuit;
    add(steer, scale(inward, pull))
}

/// Push head `index` away from every head closer than the separation
/// distance, harder the deeper the overlap.
pub fn separation_force(index: usize, sprites: &[Sprite], config: &FlockConfig) -> Vec2 {
    let me = &sprites[index];
    let mut steer = Vec2::ZERO;
    for (j, other) in sprites.iter().enumerate() {
        if j == index {
            continue;
        }
        let delta = sub(me.position, other.position);
        let d = length(delta);
        let min_d = config.separation_for(me.radius(), other.radius());
        if d > MIN_STEER_DIST && d < min_d {
            steer = add(steer, scale(delta, (min_d - d) * config.separation_gain / d));
        }
    }
    steer
}

/// Push head `index` sideways around the player when another head sits at
/// nearly the same bearing, so heads spread into separate lanes.
pub fn lane_force(index: usize, sprites: &[Sprite], player: Vec2, config: &FlockConfig) -> Vec2 {
    let off_i = sub(sprites[index].position, player);
    if length_sq(off_i) < MIN_BEARING_DIST_SQ {
        return Vec2::ZERO;
    }
    let bearing_i = bearing(off_i);
    let lateral = tangent(off_i);

    let mut steer = Vec2::ZERO;
    for (j, other) in sprites.iter().enumerate() {
        if j == index {
            continue;
        }
        let off_j = sub(other.position, player);
        if length_sq(off_j) < MIN_BEARING_DIST_SQ {
            continue;
        }
        let d_ang = wrap_angle(bearing_i - bearing(off_j));
        if d_ang.abs() < config.lane_min_angle {
            let sign = if d_ang >= 0.0 { 1.0 } else { -1.0 };
            let push = (config.lane_min_angle - d_ang.abs()) * config.lane_gain;
            steer = add(steer, scale(lateral, sign * push));
        }
    }
    steer
}

/// Sum of ring keeping, separation and lane forces for head `index`.
pub fn steering_force(index: usize, sprites: &[Sprite], player: Vec2, config: &FlockConfig) -> Vec2 {
    let ring = ring_force(sprites[index].position, player, config);
    let separation = separation_force(index, sprites, config);
    let lanes = lane_force(index, sprites, player, config);
    add(add(ring, separation), lanes)
}

/// Apply steering, clamp speed and move on the ground plane.
pub fn integrate(sprite: &mut Sprite, steer: Vec2, dt: f64, config: &FlockConfig) {
    sprite.velocity = add(sprite.velocity, scale(steer, dt));
    sprite.velocity = clamp_length(sprite.velocity, config.max_speed);
    sprite.position = add(sprite.position, scale(sprite.velocity, dt));
}

/// Re-roll the facing choice when its timer expires, then turn toward the
/// chosen yaw at a bounded rate. Returns the yaw change applied.
pub fn update_facing(
    sprite: &mut Sprite,
    player: Vec2,
    dt: f64,
    config: &FlockConfig,
    rng: &mut impl Rng,
) -> f64 {
    sprite.face_timer -= dt;
    if sprite.face_timer <= 0.0 {
        sprite.facing = if rng.gen::<f64>() < config.face_player_probability {
            Facing::Player
        } else {
            Facing::Travel
        };
        sprite.face_timer = uniform(rng, config.face_interval_min, config.face_interval_max);
    }

    let look = match sprite.facing {
        Facing::Player => sub(player, sprite.position),
        Facing::Travel => sprite.velocity,
    };
    if length_sq(look) < MIN_BEARING_DIST_SQ {
        return 0.0;
    }

    let delta = wrap_angle(bearing(look) - sprite.yaw);
    let max_turn = config.turn_rate * dt;
    let turn = delta.clamp(-max_turn, max_turn);
    sprite.yaw += turn;
    turn
}

/// Advance the spin state machine for head `index`.
///
/// Crazy mode spins every head at the crazy rate and freezes the state, so
/// the head resumes where it was once crazy mode ends.
pub fn update_spin(
    sprite: &mut Sprite,
    index: usize,
    mode: SceneMode,
    elapsed: f64,
    dt: f64,
    config: &FlockConfig,
    rng: &mut impl Rng,
) {
    if mode.is_crazy() {
        sprite.yaw += config.crazy_spin_rate * dt;
        return;
    }

    match sprite.spin {
        SpinState::Spinning => {
            sprite.yaw += config.spin_rate * dt;
            if rng.gen::<f64>() < config.spin_stop_probability {
                sprite.spin = SpinState::Orbiting {
                    remaining: uniform(rng, config.spin_cooldown_min, config.spin_cooldown_max),
                };
            }
        }
        SpinState::Orbiting { remaining } => {
            let sway = (elapsed * config.sway_frequency + index as f64).sin();
            sprite.yaw += sway * config.sway_amplitude * dt;

            let drain = uniform(rng, config.spin_drain_min, config.spin_drain_max);
            let remaining = remaining - dt * drain;
            sprite.spin = if remaining <= 0.0 || rng.gen::<f64>() < config.spin_start_probability {
                SpinState::Spinning
            } else {
                SpinState::Orbiting { remaining }
            };
        }
    }
}
