//! The player character and its ability state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::PowerUpKind;
use super::input::JumpLatch;
use super::rect::Rect;
use crate::consts::*;

/// Horizontal facing / wall side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Remaining ticks on each timed buff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffs {
    pub speed: u32,
    pub invincibility: u32,
    pub magnet: u32,
}

impl Buffs {
    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Speed => self.speed,
            PowerUpKind::Invincibility => self.invincibility,
            PowerUpKind::Magnet => self.magnet,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0
    }

    /// Start (or restart) a buff at its full duration
    pub fn apply(&mut self, kind: PowerUpKind) {
        let slot = self.slot_mut(kind);
        *slot = kind.duration();
    }

    /// Count every timer down by one, returning the buffs that just ran out
    pub fn tick(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    /// Cancel every buff, returning the ones that were still running
    pub fn clear(&mut self) -> Vec<PowerUpKind> {
        let active: Vec<_> = PowerUpKind::ALL
            .into_iter()
            .filter(|&kind| self.is_active(kind))
            .collect();
        *self = Buffs::default();
        active
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut u32 {
        match kind {
            PowerUpKind::Speed => &mut self.speed,
            PowerUpKind::Invincibility => &mut self.invincibility,
            PowerUpKind::Magnet => &mut self.magnet,
        }
    }
}

/// The protagonist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    /// Side of the wall currently touched while airborne
    pub wall_dir: Option<Facing>,
    pub jump_latch: JumpLatch,
    /// Ticks of sustained climb spent on the current jump
    pub jump_time: u32,
    pub jumps_left: u8,
    pub max_jumps: u8,
    /// Post-respawn grace period (ticks)
    pub invincible: u32,
    pub buffs: Buffs,
    pub lives: u8,
    pub score: u64,
    /// Respawn position from the latest checkpoint this level
    pub last_checkpoint: Option<Vec2>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl Player {
    pub fn new(lives: u8) -> Self {
        Self {
            pos: Self::start_position(),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_W, PLAYER_H),
            facing: Facing::Right,
            on_ground: false,
            wall_dir: None,
            jump_latch: JumpLatch::default(),
            jump_time: 0,
            jumps_left: MAX_JUMPS,
            max_jumps: MAX_JUMPS,
            invincible: 0,
            buffs: Buffs::default(),
            lives,
            score: 0,
            last_checkpoint: None,
        }
    }

    pub fn start_position() -> Vec2 {
        Vec2::new(PLAYER_START_X, PLAYER_START_Y)
    }

    /// Reinitialize transient state at `pos`; lives, score and checkpoint survive
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.wall_dir = None;
        self.jump_time = 0;
        self.jumps_left = self.max_jumps;
        self.buffs = Buffs::default();
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn on_wall(&self) -> bool {
        self.wall_dir.is_some()
    }

    /// Protected by either the respawn grace period or the power-up
    pub fn is_invincible(&self) -> bool {
        self.invincible > 0 || self.buffs.is_active(PowerUpKind::Invincibility)
    }

    /// Restore every jump charge (landing)
    pub fn refill_jumps(&mut self) {
        self.jumps_left = self.max_jumps;
    }

    /// Spend one jump charge, never going below zero
    pub fn spend_jump(&mut self) {
        self.jumps_left = self.jumps_left.saturating_sub(1);
    }

    /// Horizontal acceleration this tick, including the speed buff
    pub fn run_accel(&self) -> f32 {
        if self.buffs.is_active(PowerUpKind::Speed) {
            PLAYER_ACCEL * SPEED_BOOST_MULT
        } else {
            PLAYER_ACCEL
        }
    }
}
