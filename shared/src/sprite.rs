use crate::vec2::Vec2;

/// Ground level the billboards stand on.
pub const GROUND_Y: f64 = -1.5;

/// Billboard height in world units.
pub const BILLBOARD_HEIGHT: f64 = 24.0 * 0.8;

/// Gap between the top of a billboard and its hover label.
pub const LABEL_CLEARANCE: f64 = 2.0;

/// Footprint radius relative to the larger billboard extent.
const RADIUS_FACTOR: f64 = 0.4;

/// Stable handle for a head in the flock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

/// Spin behaviour: either orbiting with a countdown to the next spin, or
/// spinning until a per-frame coin flip ends it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinState {
    Orbiting { remaining: f64 },
    Spinning,
}

impl SpinState {
    pub fn is_spinning(&self) -> bool {
        matches!(self, SpinState::Spinning)
    }
}

/// What a head turns to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Player,
    Travel,
}

/// Size of a billboard, derived once from its image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub width: f64,
    pub height: f64,
}

impl Billboard {
    /// Billboard for an image with the given pixel dimensions.
    /// Degenerate images fall back to a square.
    pub fn from_image_size(width_px: u32, height_px: u32) -> Self {
        let aspect = if width_px > 0 && height_px > 0 {
            width_px as f64 / height_px as f64
        } else {
            1.0
        };
        Self {
            width: BILLBOARD_HEIGHT * aspect,
            height: BILLBOARD_HEIGHT,
        }
    }

    pub fn radius(&self) -> f64 {
        self.width.max(self.height) * RADIUS_FACTOR
    }

    /// Height of the billboard centre when standing on the ground.
    pub fn baseline(&self) -> f64 {
        GROUND_Y + self.height * 0.5
    }
}

/// A flat talking head moving on the ground plane.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    /// Asset path the billboard was loaded from
    pub source: String,
    pub billboard: Billboard,
    pub position: Vec2,
    pub velocity: Vec2,
    pub yaw: f64,
    pub wander_angle: f64,
    pub retarget_timer: f64,
    pub burst_timer: f64,
    pub face_timer: f64,
    pub facing: Facing,
    pub spin: SpinState,
    radius: f64,
    baseline: f64,
}

impl Sprite {
    pub fn new(id: SpriteId, source: impl Into<String>, billboard: Billboard, position: Vec2) -> Self {
        Self {
            id,
            source: source.into(),
            billboard,
            position,
            velocity: Vec2::ZERO,
            yaw: 0.0,
            wander_angle: 0.0,
            retarget_timer: 0.0,
            burst_timer: 0.0,
            face_timer: 0.0,
            facing: Facing::Travel,
            spin: SpinState::Orbiting { remaining: 0.0 },
            radius: billboard.radius(),
            baseline: billboard.baseline(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Fixed vertical position of the billboard centre.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// World translation (x, y, z) of the billboard centre.
    pub fn translation(&self) -> [f64; 3] {
        [self.position.x, self.baseline, self.position.z]
    }

    /// Where the hover label sits: centred over the head, clear of its top edge.
    pub fn label_anchor(&self) -> [f64; 3] {
        [
            self.position.x,
            self.baseline + self.billboard.height * 0.5 + LABEL_CLEARANCE,
            self.position.z,
        ]
    }

    /// File stem of the source path, e.g. `/images/Doge.png` -> `Doge`.
    pub fn display_name(&self) -> &str {
        let file = self.source.rsplit('/').next().unwrap_or(&self.source);
        match file.rfind('.') {
            Some(dot) if dot > 0 => &file[..dot],
            _ => file,
        }
    }
}
