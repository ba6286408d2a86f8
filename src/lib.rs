//! Sky Runner - A side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, abilities, game state)
//! - `session`: Fixed-timestep session controller that owns the simulation
//! - `settings`: Host configuration

pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

use rand::Rng;

/// Game configuration constants
///
/// Physics values are expressed per tick, not per second.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta the session will accumulate
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport dimensions (camera framing)
    pub const VIEW_WIDTH: f32 = 960.0;
    pub const VIEW_HEIGHT: f32 = 540.0;

    pub const GRAVITY: f32 = 0.6;
    pub const FRICTION: f32 = 0.85;
    pub const PLAYER_ACCEL: f32 = 0.8;
    /// Upward impulse (negative y is up)
    pub const JUMP_FORCE: f32 = -13.0;
    /// Ticks after takeoff during which a held jump keeps climbing
    pub const JUMP_SUSTAIN_TICKS: u32 = 10;
    pub const JUMP_SUSTAIN_FRACTION: f32 = 0.05;
    pub const DOUBLE_JUMP_MULT: f32 = 0.85;
    pub const WALL_JUMP_MULT: f32 = 0.9;
    pub const WALL_JUMP_KICK: f32 = 8.0;
    pub const WALL_SLIDE_MAX_FALL: f32 = 2.0;
    pub const STOMP_BOUNCE_MULT: f32 = 0.6;

    /// Player defaults
    pub const PLAYER_W: f32 = 28.0;
    pub const PLAYER_H: f32 = 36.0;
    pub const PLAYER_START_X: f32 = 80.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const MAX_JUMPS: u8 = 2;
    pub const STARTING_LIVES: u8 = 3;
    /// Falling below this y is fatal
    pub const FALL_DEATH_Y: f32 = 600.0;

    /// Platform contact tuning
    pub const LANDING_TOLERANCE: f32 = 6.0;
    pub const CORNER_INSET: f32 = 4.0;
    pub const SIDE_BAND: f32 = 12.0;

    /// Timers (ticks)
    pub const RESPAWN_INVINCIBILITY_TICKS: u32 = 90;
    pub const LEVEL_COMPLETE_TICKS: u32 = 90;
    pub const SPEED_BOOST_TICKS: u32 = 300;
    pub const INVINCIBILITY_TICKS: u32 = 300;
    pub const MAGNET_TICKS: u32 = 480;

    pub const SPEED_BOOST_MULT: f32 = 1.8;
    pub const MAGNET_RADIUS: f32 = 150.0;
    pub const MAGNET_STEP: f32 = 5.0;

    /// Score awards
    pub const COIN_SCORE: u64 = 100;
    pub const ENEMY_SCORE: u64 = 200;
    pub const BAT_SCORE: u64 = 300;
    pub const FLAG_SCORE: u64 = 500;

    /// Camera smoothing per tick
    pub const CAMERA_LERP: f32 = 0.08;
    pub const CAMERA_MIN_Y: f32 = -50.0;
    pub const CAMERA_MAX_Y: f32 = 100.0;

    pub const MENU_BOB_STEP: f32 = 0.03;
}

/// Linear interpolation from `a` toward `b` by fraction `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Uniform random value in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(4.0, 4.0, 0.3), 4.0);
        assert_eq!(lerp(-2.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let v = rand_range(&mut rng, -3.0, 5.0);
            assert!((-3.0..5.0).contains(&v));
        }
        assert_eq!(rand_range(&mut rng, 2.0, 2.0), 2.0);
    }

    #[test]
    fn test_rand_range_deterministic() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(rand_range(&mut a, 0.0, 1.0), rand_range(&mut b, 0.0, 1.0));
        }
    }
}
