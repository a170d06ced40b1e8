/// Ground-plane vector utilities.
/// The scene's up axis is Y, so planar vectors carry (x, z) components.

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub z: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Shorthand constructor
pub fn vec2(x: f64, z: f64) -> Vec2 {
    Vec2::new(x, z)
}

/// Dot product
pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.x * b.x + a.z * b.z
}

/// Squared length
pub fn length_sq(v: Vec2) -> f64 {
    v.x * v.x + v.z * v.z
}

/// Vector length
pub fn length(v: Vec2) -> f64 {
    length_sq(v).sqrt()
}

/// Normalize vector to unit length.
/// Degenerate input maps to +X so callers never see NaN.
pub fn normalize(v: Vec2) -> Vec2 {
    let len = length(v);
    if len < 1e-10 {
        return Vec2::new(1.0, 0.0);
    }
    Vec2::new(v.x / len, v.z / len)
}

/// Scale vector by scalar
pub fn scale(v: Vec2, s: f64) -> Vec2 {
    Vec2::new(v.x * s, v.z * s)
}

/// Add two vectors
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x + b.x, a.z + b.z)
}

/// Subtract vectors (a - b)
pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x - b.x, a.z - b.z)
}

/// Shorten `v` to `max_len` if it is longer, keeping its direction.
pub fn clamp_length(v: Vec2, max_len: f64) -> Vec2 {
    let len = length(v);
    if len > max_len && len > 0.0 {
        scale(v, max_len / len)
    } else {
        v
    }
}

/// Wrap an angle to [-PI, PI].
pub fn wrap_angle(a: f64) -> f64 {
    a.sin().atan2(a.cos())
}

/// Bearing of a planar direction, measured as atan2(x, z).
/// This matches yaw about +Y: yaw 0 looks down +Z.
pub fn bearing(v: Vec2) -> f64 {
    v.x.atan2(v.z)
}

/// Unit tangent pointing toward increasing bearing.
pub fn tangent(v: Vec2) -> Vec2 {
    normalize(Vec2::new(v.z, -v.x))
}

/// Rotate `p` about `center` so its bearing from `center` grows by `angle`.
pub fn rotate_about(p: Vec2, center: Vec2, angle: f64) -> Vec2 {
    let off = sub(p, center);
    let (sin_a, cos_a) = angle.sin_cos();
    add(
        center,
        Vec2::new(
            off.x * cos_a + off.z * sin_a,
            off.z * cos_a - off.x * sin_a,
        ),
    )
}

/// Unit direction for a wander angle (x = cos, z = sin).
pub fn from_angle(angle: f64) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
