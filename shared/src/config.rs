/// Steering and behaviour tuning for the head flock.
///
/// Distances are world units, rates are per second, probabilities are
/// per decision (or per frame where noted).
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlockConfig {
    /// Upper bound on a single tick's dt (seconds)
    pub max_dt: f64,
    /// Inner radius of the preferred ring around the player
    pub ring_inner: f64,
    /// Outer radius of the preferred ring around the player
    pub ring_outer: f64,
    /// Steering strength when outside the ring
    pub ring_push: f64,
    /// Minimum inward pursuit pull
    pub pursuit_base: f64,
    /// Extra pursuit pull at the outer edge of the ring
    pub pursuit_gain: f64,
    /// Separation distance as a multiple of the radius sum
    pub separation_scale: f64,
    /// Separation push per unit of overlap
    pub separation_gain: f64,
    /// Minimum bearing difference between two heads (radians)
    pub lane_min_angle: f64,
    /// Lane push per radian of deficit
    pub lane_gain: f64,
    pub max_speed: f64,

    /// Probability of seeking the player when a new target is chosen
    pub seek_probability: f64,
    /// Per-axis jitter added to the seek direction
    pub seek_jitter: f64,
    pub seek_speed_min: f64,
    pub seek_speed_max: f64,
    /// Maximum wander angle change per retarget (radians)
    pub wander_turn: f64,
    pub wander_speed_min: f64,
    pub wander_speed_max: f64,
    pub retarget_min: f64,
    pub retarget_max: f64,

    /// Per-axis burst impulse magnitude
    pub burst_strength: f64,
    pub burst_interval_min: f64,
    pub burst_interval_max: f64,

    /// Probability of facing the player when the facing timer expires
    pub face_player_probability: f64,
    pub face_interval_min: f64,
    pub face_interval_max: f64,
    /// Maximum facing turn rate (rad/s)
    pub turn_rate: f64,

    /// Spin rate (rad/s)
    pub spin_rate: f64,
    /// Spin rate while crazy mode forces every head to spin (rad/s)
    pub crazy_spin_rate: f64,
    /// Per-frame probability that a spin ends
    pub spin_stop_probability: f64,
    /// Per-frame probability that an orbiting head starts spinning early
    pub spin_start_probability: f64,
    pub spin_cooldown_min: f64,
    pub spin_cooldown_max: f64,
    /// Cooldown drain multiplier range while orbiting
    pub spin_drain_min: f64,
    pub spin_drain_max: f64,
    /// Idle sway amplitude (rad/s)
    pub sway_amplitude: f64,
    /// Idle sway frequency (rad/s of the sine argument)
    pub sway_frequency: f64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.05,
            ring_inner: 20.0,
            ring_outer: 50.0,
            ring_push: 3.5,
            pursuit_base: 0.4,
            pursuit_gain: 2.0,
            separation_scale: 6.0,
            separation_gain: 12.0,
            lane_min_angle: 0.5, // ~28.6 degrees
            lane_gain: 8.0,
            max_speed: 6.2,

            seek_probability: 0.7,
            seek_jitter: 0.4,
            seek_speed_min: 3.2,
            seek_speed_max: 5.7,
            wander_turn: 0.3,
            wander_speed_min: 1.0,
            wander_speed_max: 2.0,
            retarget_min: 1.2,
            retarget_max: 3.7,

            burst_strength: 1.0,
            burst_interval_min: 2.0,
            burst_interval_max: 6.0,

            face_player_probability: 0.6,
            face_interval_min: 0.7,
            face_interval_max: 1.8,
            turn_rate: 4.0,

            spin_rate: 8.0,
            crazy_spin_rate: 12.0,
            spin_stop_probability: 0.15,
            spin_start_probability: 0.02,
            spin_cooldown_min: 0.8,
            spin_cooldown_max: 3.3,
            spin_drain_min: 2.2,
            spin_drain_max: 3.0,
            sway_amplitude: 0.12,
            sway_frequency: 0.4,
        }
    }
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
        return Err(format!("{name} range must be finite with 0 <= min <= max"));
    }
    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&p) {
        return Err(format!("{name} must be within [0, 1]"));
    }
    Ok(())
}

impl FlockConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err("max_dt must be finite and > 0".to_string());
        }
        if !self.ring_inner.is_finite() || self.ring_inner < 0.0 {
            return Err("ring_inner must be finite and >= 0".to_string());
        }
        if !self.ring_outer.is_finite() || self.ring_outer < self.ring_inner {
            return Err("ring_outer must be finite and >= ring_inner".to_string());
        }
        if !self.separation_scale.is_finite() || self.separation_scale <= 0.0 {
            return Err("separation_scale must be finite and > 0".to_string());
        }
        if !self.lane_min_angle.is_finite()
            || self.lane_min_angle < 0.0
            || self.lane_min_angle > std::f64::consts::PI
        {
            return Err("lane_min_angle must be within [0, PI]".to_string());
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("max_speed must be finite and > 0".to_string());
        }
        if !self.turn_rate.is_finite() || self.turn_rate < 0.0 {
            return Err("turn_rate must be finite and >= 0".to_string());
        }
        if self.spin_rate <= 0.0 || self.crazy_spin_rate <= 0.0 {
            return Err("spin rates must be > 0".to_string());
        }
        check_range("seek_speed", self.seek_speed_min, self.seek_speed_max)?;
        check_range("wander_speed", self.wander_speed_min, self.wander_speed_max)?;
        check_range("retarget", self.retarget_min, self.retarget_max)?;
        check_range(
            "burst_interval",
            self.burst_interval_min,
            self.burst_interval_max,
        )?;
        check_range("face_interval", self.face_interval_min, self.face_interval_max)?;
        check_range("spin_cooldown", self.spin_cooldown_min, self.spin_cooldown_max)?;
        check_range("spin_drain", self.spin_drain_min, self.spin_drain_max)?;
        check_probability("seek_probability", self.seek_probability)?;
        check_probability("face_player_probability", self.face_player_probability)?;
        check_probability("spin_stop_probability", self.spin_stop_probability)?;
        check_probability("spin_start_probability", self.spin_start_probability)?;
        Ok(())
    }

    /// Minimum centre distance between two heads with the given radii.
    pub fn separation_for(&self, radius_a: f64, radius_b: f64) -> f64 {
        (radius_a + radius_b) * self.separation_scale
    }
}
