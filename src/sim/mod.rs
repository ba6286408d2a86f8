//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level data order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod input;
pub mod level;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Contact, resolve_platform};
pub use entities::{
    Bat, Body, Checkpoint, Coin, Enemy, Flag, Lava, Platform, PowerUp, PowerUpKind, Spike,
};
pub use input::{JumpLatch, TickInput};
pub use level::{LEVEL_COUNT, LevelError, LevelId, World, build_level, level_for_index};
pub use player::{Buffs, Facing, Player};
pub use rect::Rect;
pub use state::{Camera, DeathCause, GameEvent, GamePhase, GameState, JumpKind};
pub use tick::tick;
