//! Level entities
//!
//! Passive data with a self-contained per-tick `update`. Entities never look
//! at each other or at the player; all interaction is resolved by the tick.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Common surface for anything placed in a level
pub trait Body {
    /// Collision box in world space
    fn rect(&self) -> Rect;

    /// Advance one tick (no-op for static entities)
    fn update(&mut self) {}
}

/// A solid platform, optionally oscillating horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Center of oscillation
    pub origin_x: f32,
    /// Oscillation amplitude (0 = static)
    pub move_range: f32,
    /// Oscillation phase (radians)
    pub phase: f32,
}

impl Platform {
    /// Angular step of the oscillation per tick
    pub const PHASE_STEP: f32 = 0.02;
    pub const DEFAULT_HEIGHT: f32 = 16.0;

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            origin_x: x,
            move_range: 0.0,
            phase: 0.0,
        }
    }

    /// Thin floating ledge
    pub fn ledge(x: f32, y: f32, w: f32) -> Self {
        Self::new(x, y, w, Self::DEFAULT_HEIGHT)
    }

    /// Ledge oscillating `range` either side of `x`, starting at `phase`
    pub fn moving(x: f32, y: f32, w: f32, range: f32, phase: f32) -> Self {
        let mut platform = Self::ledge(x, y, w);
        platform.move_range = range.max(0.0);
        platform.phase = phase;
        platform.rect.x = x + phase.sin() * platform.move_range;
        platform
    }

    pub fn is_moving(&self) -> bool {
        self.move_range > 0.0
    }

    /// Horizontal velocity of the platform, taken from the phase derivative
    ///
    /// This approximates the per-tick displacement; riders drift slightly
    /// relative to the exact discrete delta.
    pub fn carry_velocity(&self) -> f32 {
        if !self.is_moving() {
            return 0.0;
        }
        self.phase.cos() * self.move_range * Self::PHASE_STEP
    }
}

impl Body for Platform {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        if self.is_moving() {
            self.phase += Self::PHASE_STEP;
            self.rect.x = self.origin_x + self.phase.sin() * self.move_range;
        }
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub collected: bool,
    /// Cosmetic bob phase; collision uses the unbobbed rect
    pub bob_phase: f32,
}

impl Coin {
    pub const SIZE: f32 = 16.0;
    pub const BOB_STEP: f32 = 0.06;
    pub const BOB_AMPLITUDE: f32 = 4.0;

    pub fn new(x: f32, y: f32, bob_phase: f32) -> Self {
        Self {
            rect: Rect::new(x, y, Self::SIZE, Self::SIZE),
            collected: false,
            bob_phase,
        }
    }

    /// Vertical draw offset for the bob animation
    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * Self::BOB_AMPLITUDE
    }
}

impl Body for Coin {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        self.bob_phase += Self::BOB_STEP;
    }
}

/// Ground patroller, killable only by a stomp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub origin_x: f32,
    pub range: f32,
    /// +1 moving right, -1 moving left
    pub dir: f32,
    pub alive: bool,
    /// Walk animation counter
    pub anim: f32,
}

impl Enemy {
    pub const W: f32 = 30.0;
    pub const H: f32 = 28.0;
    pub const SPEED: f32 = 1.2;
    /// Player bottom must be above `y + HEAD_BAND` for a stomp
    pub const HEAD_BAND: f32 = 16.0;

    pub fn new(x: f32, y: f32, range: f32) -> Self {
        Self {
            rect: Rect::new(x, y, Self::W, Self::H),
            origin_x: x,
            range: range.max(0.0),
            dir: 1.0,
            alive: true,
            anim: 0.0,
        }
    }

    /// Standing on a surface whose top is at `ground_y`
    pub fn on_ground(x: f32, ground_y: f32, range: f32) -> Self {
        Self::new(x, ground_y - Self::H, range)
    }
}

impl Body for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        if !self.alive {
            return;
        }
        self.rect.x += Self::SPEED * self.dir;
        self.anim += 0.1;
        if self.rect.x > self.origin_x + self.range || self.rect.x < self.origin_x - self.range {
            self.dir = -self.dir;
        }
    }
}

/// Flying patroller with a vertical bob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bat {
    pub rect: Rect,
    pub origin_x: f32,
    pub origin_y: f32,
    pub range: f32,
    pub dir: f32,
    pub alive: bool,
    /// Bob phase; affects the collision box, so it comes from level data
    pub phase: f32,
}

impl Bat {
    pub const W: f32 = 28.0;
    pub const H: f32 = 20.0;
    pub const SPEED: f32 = 1.5;
    pub const PHASE_STEP: f32 = 0.06;
    pub const BOB_AMPLITUDE: f32 = 24.0;
    pub const HEAD_BAND: f32 = 10.0;

    pub fn new(x: f32, y: f32, range: f32, phase: f32) -> Self {
        Self {
            rect: Rect::new(x, y + phase.sin() * Self::BOB_AMPLITUDE, Self::W, Self::H),
            origin_x: x,
            origin_y: y,
            range: range.max(0.0),
            dir: 1.0,
            alive: true,
            phase,
        }
    }
}

impl Body for Bat {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        if !self.alive {
            return;
        }
        self.rect.x += Self::SPEED * self.dir;
        self.phase += Self::PHASE_STEP;
        self.rect.y = self.origin_y + self.phase.sin() * Self::BOB_AMPLITUDE;
        if self.rect.x > self.origin_x + self.range || self.rect.x < self.origin_x - self.range {
            self.dir = -self.dir;
        }
    }
}

/// Row of floor spikes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spike {
    pub rect: Rect,
}

impl Spike {
    pub const H: f32 = 16.0;

    /// Spikes sitting on a surface whose top is at `ground_y`
    pub fn on_ground(x: f32, ground_y: f32, w: f32) -> Self {
        Self {
            rect: Rect::new(x, ground_y - Self::H, w, Self::H),
        }
    }
}

impl Body for Spike {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Lava pool, lethal unless the invincibility power-up is active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lava {
    pub rect: Rect,
    /// Cosmetic surface animation
    pub phase: f32,
}

impl Lava {
    pub fn new(x: f32, y: f32, w: f32, h: f32, phase: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            phase,
        }
    }
}

impl Body for Lava {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        self.phase += 0.05;
    }
}

/// Timed buff variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Invincibility,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Invincibility,
        PowerUpKind::Magnet,
    ];

    /// Full buff duration in ticks
    pub fn duration(self) -> u32 {
        match self {
            PowerUpKind::Speed => SPEED_BOOST_TICKS,
            PowerUpKind::Invincibility => INVINCIBILITY_TICKS,
            PowerUpKind::Magnet => MAGNET_TICKS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Invincibility => "invincibility",
            PowerUpKind::Magnet => "magnet",
        }
    }
}

/// A buff pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub collected: bool,
    pub bob_phase: f32,
}

impl PowerUp {
    pub const SIZE: f32 = 20.0;
    pub const BOB_STEP: f32 = 0.05;

    pub fn new(x: f32, y: f32, kind: PowerUpKind, bob_phase: f32) -> Self {
        Self {
            rect: Rect::new(x, y, Self::SIZE, Self::SIZE),
            kind,
            collected: false,
            bob_phase,
        }
    }

    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * 3.0
    }
}

impl Body for PowerUp {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        self.bob_phase += Self::BOB_STEP;
    }
}

/// Level goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub rect: Rect,
    /// Cloth wave animation
    pub wave: f32,
}

impl Flag {
    pub const W: f32 = 20.0;
    pub const H: f32 = 60.0;

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, Self::W, Self::H),
            wave: 0.0,
        }
    }

    pub fn on_ground(x: f32, ground_y: f32) -> Self {
        Self::new(x, ground_y - Self::H)
    }
}

impl Body for Flag {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self) {
        self.wave += 0.05;
    }
}

/// Respawn anchor; once active it stays active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    pub active: bool,
}

impl Checkpoint {
    pub const W: f32 = 20.0;
    pub const H: f32 = 50.0;

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, Self::W, Self::H),
            active: false,
        }
    }

    pub fn on_ground(x: f32, ground_y: f32) -> Self {
        Self::new(x, ground_y - Self::H)
    }

    /// Player top-left position used when respawning here
    ///
    /// Bottom-aligned with the post so the player stands where it stands.
    pub fn respawn_point(&self) -> glam::Vec2 {
        glam::Vec2::new(self.rect.x, self.rect.bottom() - PLAYER_H)
    }
}

impl Body for Checkpoint {
    fn rect(&self) -> Rect {
        self.rect
    }
}
