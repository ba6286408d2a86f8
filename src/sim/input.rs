//! Per-tick input contract
//!
//! The host maps its devices onto a small set of named actions and hands the
//! simulation one snapshot per tick.

use serde::{Deserialize, Serialize};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Left held
    pub move_left: bool,
    /// Right held
    pub move_right: bool,
    /// Jump held
    pub jump: bool,
    /// Start / restart (one-shot, consumed by the first tick that sees it)
    pub restart: bool,
}

/// Jump debounce flag
///
/// Engaged when a jump actually fires and released as soon as the key is
/// let go, so holding the key never repeats a jump but the next press is
/// seen on the very next tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpLatch {
    held: bool,
}

impl JumpLatch {
    /// True when the key is down and no jump has fired since the last release
    #[inline]
    pub fn just_pressed(&self, jump_down: bool) -> bool {
        jump_down && !self.held
    }

    #[inline]
    pub fn engage(&mut self) {
        self.held = true;
    }

    #[inline]
    pub fn release(&mut self) {
        self.held = false;
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.held
    }
}
