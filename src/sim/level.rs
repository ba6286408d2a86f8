//! Level registry
//!
//! Levels are fixed content tables. Only cosmetic animation phases (coin and
//! power-up bob, lava shimmer) come from the RNG; anything that moves a
//! collision box uses a phase written in the table.

use std::f32::consts::TAU;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{
    Bat, Checkpoint, Coin, Enemy, Flag, Lava, Platform, PowerUp, PowerUpKind, Spike,
};
use crate::rand_range;

/// Number of authored levels
pub const LEVEL_COUNT: u32 = 5;

/// Top of the standard ground strip
pub const GROUND_Y: f32 = 480.0;
pub const GROUND_HEIGHT: f32 = 60.0;
/// Horizontal margin past the flag included in the level width
pub const FLAG_MARGIN: f32 = 200.0;

/// Level registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {index} does not exist (levels are 1..={count})")]
    OutOfRange { index: u32, count: u32 },
}

/// A validated level number in `1..=LEVEL_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LevelId(u32);

impl LevelId {
    pub const FIRST: LevelId = LevelId(1);
    pub const LAST: LevelId = LevelId(LEVEL_COUNT);

    pub fn new(index: u32) -> Result<Self, LevelError> {
        if (1..=LEVEL_COUNT).contains(&index) {
            Ok(Self(index))
        } else {
            Err(LevelError::OutOfRange {
                index,
                count: LEVEL_COUNT,
            })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The following level, or `None` after the final one
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}

impl TryFrom<u32> for LevelId {
    type Error = LevelError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<LevelId> for u32 {
    fn from(id: LevelId) -> u32 {
        id.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything placed in one level
///
/// Entities are addressed by their index in the owning collection; the
/// collections never change length after the level is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub bats: Vec<Bat>,
    pub spikes: Vec<Spike>,
    pub lavas: Vec<Lava>,
    pub power_ups: Vec<PowerUp>,
    pub checkpoints: Vec<Checkpoint>,
    pub flag: Flag,
    /// Horizontal extent used for camera/background bounds
    pub width: f32,
}

impl World {
    /// Empty world with its goal; width derives from the flag position
    pub fn new(name: impl Into<String>, flag: Flag) -> Self {
        let width = flag.rect.x + FLAG_MARGIN;
        Self {
            name: name.into(),
            platforms: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            bats: Vec::new(),
            spikes: Vec::new(),
            lavas: Vec::new(),
            power_ups: Vec::new(),
            checkpoints: Vec::new(),
            flag,
            width,
        }
    }

    pub fn coins_remaining(&self) -> usize {
        self.coins.iter().filter(|c| !c.collected).count()
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count() + self.bats.iter().filter(|b| b.alive).count()
    }
}

/// Build the world for a level number, failing fast on unknown levels
pub fn level_for_index<R: Rng + ?Sized>(index: u32, rng: &mut R) -> Result<World, LevelError> {
    Ok(build_level(LevelId::new(index)?, rng))
}

/// Build a fully populated world for `id`
pub fn build_level<R: Rng + ?Sized>(id: LevelId, rng: &mut R) -> World {
    let world = match id.get() {
        1 => green_hills(rng),
        2 => stone_ridge(rng),
        3 => canyon_run(rng),
        4 => bat_cavern(rng),
        _ => summit(rng),
    };
    log::debug!(
        "Built level {} '{}': {} platforms, {} coins, {} foes, width {}",
        id,
        world.name,
        world.platforms.len(),
        world.coins.len(),
        world.enemies_alive(),
        world.width
    );
    world
}

/// Accumulates level content; the flag is supplied last
struct LevelBuilder<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    world: World,
}

impl<'a, R: Rng + ?Sized> LevelBuilder<'a, R> {
    fn new(name: &str, rng: &'a mut R) -> Self {
        Self {
            rng,
            world: World::new(name, Flag::new(0.0, 0.0)),
        }
    }

    fn cosmetic_phase(&mut self) -> f32 {
        rand_range(&mut *self.rng, 0.0, TAU)
    }

    fn ground(&mut self, x: f32, w: f32) -> &mut Self {
        self.world
            .platforms
            .push(Platform::new(x, GROUND_Y, w, GROUND_HEIGHT));
        self
    }

    fn ledge(&mut self, x: f32, y: f32, w: f32) -> &mut Self {
        self.world.platforms.push(Platform::ledge(x, y, w));
        self
    }

    fn mover(&mut self, x: f32, y: f32, w: f32, range: f32, phase: f32) -> &mut Self {
        self.world
            .platforms
            .push(Platform::moving(x, y, w, range, phase));
        self
    }

    /// Solid pillar standing on the ground strip
    fn pillar(&mut self, x: f32, top: f32, w: f32) -> &mut Self {
        self.world
            .platforms
            .push(Platform::new(x, top, w, GROUND_Y - top));
        self
    }

    fn coin(&mut self, x: f32, y: f32) -> &mut Self {
        let phase = self.cosmetic_phase();
        self.world.coins.push(Coin::new(x, y, phase));
        self
    }

    fn coins(&mut self, spots: &[(f32, f32)]) -> &mut Self {
        for &(x, y) in spots {
            self.coin(x, y);
        }
        self
    }

    fn enemy(&mut self, x: f32, range: f32) -> &mut Self {
        self.world
            .enemies
            .push(Enemy::on_ground(x, GROUND_Y, range));
        self
    }

    fn enemy_on(&mut self, x: f32, surface_y: f32, range: f32) -> &mut Self {
        self.world
            .enemies
            .push(Enemy::on_ground(x, surface_y, range));
        self
    }

    fn bat(&mut self, x: f32, y: f32, range: f32, phase: f32) -> &mut Self {
        self.world.bats.push(Bat::new(x, y, range, phase));
        self
    }

    fn spikes(&mut self, x: f32, w: f32) -> &mut Self {
        self.world.spikes.push(Spike::on_ground(x, GROUND_Y, w));
        self
    }

    /// Lava filling a pit between ground strips
    fn lava(&mut self, x: f32, w: f32) -> &mut Self {
        let phase = self.cosmetic_phase();
        self.world
            .lavas
            .push(Lava::new(x, GROUND_Y + 20.0, w, GROUND_HEIGHT - 20.0, phase));
        self
    }

    fn power_up(&mut self, x: f32, y: f32, kind: PowerUpKind) -> &mut Self {
        let phase = self.cosmetic_phase();
        self.world.power_ups.push(PowerUp::new(x, y, kind, phase));
        self
    }

    fn checkpoint(&mut self, x: f32) -> &mut Self {
        self.world
            .checkpoints
            .push(Checkpoint::on_ground(x, GROUND_Y));
        self
    }

    fn finish(&mut self, flag_x: f32) -> World {
        let flag = Flag::on_ground(flag_x, GROUND_Y);
        let mut world = std::mem::replace(&mut self.world, World::new("", Flag::new(0.0, 0.0)));
        world.width = flag.rect.x + FLAG_MARGIN;
        world.flag = flag;
        world
    }
}

fn green_hills<R: Rng + ?Sized>(rng: &mut R) -> World {
    LevelBuilder::new("Green Hills", rng)
        .ground(0.0, 400.0)
        .ground(500.0, 300.0)
        .ground(900.0, 500.0)
        .ground(1500.0, 400.0)
        .ledge(300.0, 380.0, 100.0)
        .ledge(480.0, 300.0, 100.0)
        .ledge(650.0, 360.0, 120.0)
        .ledge(850.0, 280.0, 100.0)
        .ledge(1050.0, 350.0, 120.0)
        .ledge(1250.0, 300.0, 100.0)
        .ledge(1400.0, 380.0, 120.0)
        .coins(&[
            (340.0, 340.0),
            (510.0, 260.0),
            (700.0, 320.0),
            (880.0, 240.0),
            (1100.0, 310.0),
            (1280.0, 260.0),
            (950.0, 440.0),
            (1000.0, 440.0),
        ])
        .enemy(600.0, 80.0)
        .enemy(1000.0, 100.0)
        .enemy(1550.0, 80.0)
        .power_up(1120.0, 440.0, PowerUpKind::Speed)
        .checkpoint(1200.0)
        .finish(1830.0)
}

fn stone_ridge<R: Rng + ?Sized>(rng: &mut R) -> World {
    LevelBuilder::new("Stone Ridge", rng)
        .ground(0.0, 300.0)
        .ground(600.0, 200.0)
        .ground(1100.0, 200.0)
        .ground(1700.0, 500.0)
        .ledge(250.0, 380.0, 80.0)
        .ledge(400.0, 300.0, 80.0)
        .ledge(550.0, 220.0, 120.0)
        .ledge(750.0, 320.0, 80.0)
        .mover(900.0, 380.0, 100.0, 80.0, 0.0)
        .mover(1100.0, 280.0, 100.0, 100.0, 1.0)
        .mover(1350.0, 350.0, 80.0, 60.0, 2.0)
        .ledge(1550.0, 280.0, 120.0)
        .ledge(1500.0, 400.0, 100.0)
        .coins(&[
            (280.0, 340.0),
            (430.0, 260.0),
            (590.0, 180.0),
            (780.0, 280.0),
            (940.0, 340.0),
            (1140.0, 240.0),
            (1380.0, 310.0),
            (1580.0, 240.0),
            (1750.0, 440.0),
            (1800.0, 440.0),
        ])
        .enemy(650.0, 60.0)
        .enemy(1150.0, 60.0)
        .enemy(1800.0, 100.0)
        .enemy_on(1580.0, 280.0, 40.0)
        .power_up(200.0, 440.0, PowerUpKind::Magnet)
        .checkpoint(1260.0)
        .finish(2100.0)
}

fn canyon_run<R: Rng + ?Sized>(rng: &mut R) -> World {
    LevelBuilder::new("Canyon Run", rng)
        .ground(0.0, 200.0)
        .ground(800.0, 200.0)
        .ground(1600.0, 200.0)
        .ground(2200.0, 400.0)
        .ledge(200.0, 400.0, 60.0)
        .ledge(320.0, 340.0, 60.0)
        .ledge(460.0, 280.0, 60.0)
        .ledge(600.0, 220.0, 80.0)
        .ledge(700.0, 340.0, 60.0)
        .mover(900.0, 350.0, 80.0, 100.0, 0.0)
        .mover(1100.0, 280.0, 80.0, 80.0, 1.2)
        .mover(1300.0, 350.0, 80.0, 120.0, 2.4)
        .mover(1500.0, 250.0, 80.0, 60.0, 3.6)
        .ledge(1750.0, 380.0, 60.0)
        .ledge(1900.0, 320.0, 60.0)
        .ledge(2050.0, 380.0, 80.0)
        .coins(&[
            (230.0, 360.0),
            (350.0, 300.0),
            (490.0, 240.0),
            (630.0, 180.0),
            (730.0, 300.0),
            (950.0, 300.0),
            (1150.0, 230.0),
            (1350.0, 300.0),
            (1530.0, 200.0),
            (1780.0, 340.0),
            (1930.0, 280.0),
            (2300.0, 440.0),
            (2350.0, 440.0),
            (2400.0, 440.0),
        ])
        .enemy(850.0, 60.0)
        .enemy(1650.0, 60.0)
        .enemy(2300.0, 80.0)
        .enemy(2400.0, 60.0)
        .enemy_on(620.0, 220.0, 30.0)
        .bat(1200.0, 180.0, 80.0, 0.0)
        .power_up(900.0, 440.0, PowerUpKind::Invincibility)
        .checkpoint(1620.0)
        .finish(2530.0)
}

fn bat_cavern<R: Rng + ?Sized>(rng: &mut R) -> World {
    LevelBuilder::new("Bat Cavern", rng)
        .ground(0.0, 500.0)
        .ground(600.0, 400.0)
        .ground(1100.0, 500.0)
        .ground(1700.0, 300.0)
        .ground(2100.0, 600.0)
        .lava(500.0, 100.0)
        .lava(1000.0, 100.0)
        .lava(1600.0, 100.0)
        .lava(2000.0, 100.0)
        .ledge(420.0, 380.0, 80.0)
        .ledge(660.0, 360.0, 100.0)
        .ledge(900.0, 300.0, 100.0)
        .pillar(1250.0, 280.0, 40.0)
        .ledge(1330.0, 340.0, 80.0)
        .ledge(1560.0, 360.0, 100.0)
        .ledge(1960.0, 340.0, 100.0)
        .spikes(700.0, 60.0)
        .spikes(1450.0, 80.0)
        .spikes(2300.0, 60.0)
        .bat(800.0, 360.0, 120.0, 0.0)
        .bat(1400.0, 330.0, 100.0, 1.5)
        .bat(1850.0, 350.0, 90.0, 3.0)
        .enemy(1150.0, 60.0)
        .enemy(2200.0, 80.0)
        .coins(&[
            (450.0, 340.0),
            (700.0, 320.0),
            (940.0, 260.0),
            (1260.0, 240.0),
            (1360.0, 300.0),
            (1600.0, 320.0),
            (1990.0, 300.0),
            (2450.0, 440.0),
            (2500.0, 440.0),
        ])
        .power_up(150.0, 440.0, PowerUpKind::Speed)
        .power_up(1760.0, 440.0, PowerUpKind::Invincibility)
        .checkpoint(1120.0)
        .checkpoint(2120.0)
        .finish(2600.0)
}

fn summit<R: Rng + ?Sized>(rng: &mut R) -> World {
    LevelBuilder::new("Summit", rng)
        .ground(0.0, 400.0)
        .ground(900.0, 300.0)
        .ground(1700.0, 300.0)
        .ground(2500.0, 700.0)
        .lava(400.0, 500.0)
        .lava(1200.0, 500.0)
        .lava(2000.0, 500.0)
        .mover(480.0, 380.0, 90.0, 60.0, 0.0)
        .mover(700.0, 320.0, 90.0, 60.0, 1.5)
        .mover(1300.0, 360.0, 90.0, 80.0, 0.5)
        .mover(1530.0, 300.0, 80.0, 60.0, 2.5)
        // Wall-jump chimney
        .pillar(1760.0, 240.0, 30.0)
        .pillar(1900.0, 180.0, 30.0)
        .mover(2100.0, 360.0, 90.0, 70.0, 1.0)
        .mover(2330.0, 300.0, 90.0, 60.0, 2.0)
        .spikes(1000.0, 60.0)
        .spikes(2600.0, 80.0)
        .bat(600.0, 250.0, 120.0, 0.8)
        .bat(1450.0, 220.0, 120.0, 2.2)
        .bat(2200.0, 260.0, 100.0, 0.0)
        .enemy(1080.0, 60.0)
        .enemy(2750.0, 100.0)
        .enemy(2950.0, 60.0)
        .coins(&[
            (520.0, 340.0),
            (740.0, 280.0),
            (1340.0, 320.0),
            (1560.0, 260.0),
            (1840.0, 300.0),
            (1840.0, 220.0),
            (1905.0, 150.0),
            (2140.0, 320.0),
            (2370.0, 260.0),
            (2800.0, 440.0),
            (2850.0, 440.0),
        ])
        .power_up(200.0, 440.0, PowerUpKind::Magnet)
        .power_up(960.0, 440.0, PowerUpKind::Speed)
        .power_up(2560.0, 440.0, PowerUpKind::Invincibility)
        .checkpoint(950.0)
        .checkpoint(1720.0)
        .checkpoint(2520.0)
        .finish(3100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_every_level_builds_with_goal() {
        for index in 1..=LEVEL_COUNT {
            let world = level_for_index(index, &mut rng()).expect("level exists");
            assert!(!world.platforms.is_empty(), "level {index} has no platforms");
            assert!(!world.coins.is_empty(), "level {index} has no coins");
            assert_eq!(world.width, world.flag.rect.x + FLAG_MARGIN);
            assert!(world.flag.rect.x > 1000.0);
        }
    }

    #[test]
    fn test_out_of_range_levels_rejected() {
        assert_eq!(
            level_for_index(0, &mut rng()).unwrap_err(),
            LevelError::OutOfRange { index: 0, count: 5 }
        );
        assert!(level_for_index(6, &mut rng()).is_err());
        assert!(LevelId::new(u32::MAX).is_err());
    }

    #[test]
    fn test_level_id_sequence() {
        let mut id = LevelId::FIRST;
        let mut seen = vec![id.get()];
        while let Some(next) = id.next() {
            id = next;
            seen.push(id.get());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert!(id.is_last());
    }

    #[test]
    fn test_layout_independent_of_seed() {
        let a = build_level(LevelId::LAST, &mut Pcg32::seed_from_u64(1));
        let b = build_level(LevelId::LAST, &mut Pcg32::seed_from_u64(2));
        assert_eq!(a.platforms.len(), b.platforms.len());
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.rect, pb.rect);
            assert_eq!(pa.phase, pb.phase);
        }
        for (ba, bb) in a.bats.iter().zip(&b.bats) {
            assert_eq!(ba.rect, bb.rect);
        }
        let coin_rects: Vec<_> = a.coins.iter().map(|c| c.rect).collect();
        let other_rects: Vec<_> = b.coins.iter().map(|c| c.rect).collect();
        assert_eq!(coin_rects, other_rects);
    }

    #[test]
    fn test_later_levels_introduce_hazards() {
        let cavern = build_level(LevelId::new(4).unwrap(), &mut rng());
        assert!(!cavern.bats.is_empty());
        assert!(!cavern.spikes.is_empty());
        assert!(!cavern.lavas.is_empty());
        let summit = build_level(LevelId::LAST, &mut rng());
        assert_eq!(summit.checkpoints.len(), 3);
        assert_eq!(summit.power_ups.len(), 3);
    }

    #[test]
    fn test_level_id_serde_validates() {
        let id: LevelId = serde_json::from_str("3").unwrap();
        assert_eq!(id.get(), 3);
        assert!(serde_json::from_str::<LevelId>("9").is_err());
        assert_eq!(serde_json::to_string(&LevelId::LAST).unwrap(), "5");
    }
}
