//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: the host owns one, passes it
//! to `tick`, and reads it back for rendering.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::PowerUpKind;
use super::level::{LevelId, World, build_level};
use super::player::Player;
use crate::consts::*;
use crate::lerp;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Flag reached, counting down to the next level
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Final level cleared
    Win,
}

impl GamePhase {
    /// Phases in which physics advances
    pub fn is_simulating(self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// How a jump was launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    Air,
    Wall,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Fall,
    Enemy,
    Bat,
    Spikes,
    Lava,
}

/// One-shot notifications for audio/visual feedback
///
/// Each occurrence is reported exactly once, on the tick it happens.
/// Positions are world-space points suitable for spawning particles.
/// `BuffExpired` also fires for buffs cut short by a death or level load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: LevelId },
    Jumped { pos: Vec2, kind: JumpKind },
    CoinCollected { index: usize, pos: Vec2 },
    EnemyStomped { index: usize, pos: Vec2 },
    BatStomped { index: usize, pos: Vec2 },
    PowerUpCollected { index: usize, kind: PowerUpKind },
    BuffExpired { kind: PowerUpKind },
    CheckpointReached { index: usize, pos: Vec2 },
    PlayerDied { pos: Vec2, cause: DeathCause, lives_left: u8 },
    LevelCleared { level: LevelId, score: u64 },
    GameOver { score: u64 },
    GameWon { score: u64 },
}

/// Smoothed follow camera (top-left of the view in world space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    /// Where the camera wants to be for a player at `player_pos`
    ///
    /// Player sits a third of the way in from the left, vertically centered.
    pub fn target_for(player_pos: Vec2) -> Vec2 {
        Vec2::new(
            (player_pos.x - VIEW_WIDTH / 3.0).max(0.0),
            (player_pos.y - VIEW_HEIGHT / 2.0).clamp(CAMERA_MIN_Y, CAMERA_MAX_Y),
        )
    }

    /// Ease toward the target by one tick
    pub fn follow(&mut self, player_pos: Vec2) {
        let target = Self::target_for(player_pos);
        self.x = lerp(self.x, target.x, CAMERA_LERP).max(0.0);
        self.y = lerp(self.y, target.y, CAMERA_LERP);
    }

    /// Jump straight to the target
    pub fn snap_to(&mut self, player_pos: Vec2) {
        let target = Self::target_for(player_pos);
        self.x = target.x;
        self.y = target.y;
    }
}

/// Complete game state (deterministic given seed and inputs)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Session seed for cosmetic randomness
    pub seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    pub phase: GamePhase,
    /// Level currently loaded
    pub level: LevelId,
    /// Level a fresh game starts on
    pub first_level: LevelId,
    /// Lives granted at a fresh game start
    pub starting_lives: u8,
    pub world: World,
    pub player: Player,
    pub camera: Camera,
    /// Ticks left before moving on from `LevelComplete`
    pub level_complete_ticks: u32,
    /// Title screen idle animation
    pub menu_bob: f32,
    /// Simulation tick counter (advances only while playing)
    pub time_ticks: u64,
}

impl GameState {
    /// New session on the title screen with default options
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, LevelId::FIRST, STARTING_LIVES)
    }

    /// New session on the title screen
    ///
    /// The first level is pre-built so there is always a world to render.
    pub fn with_options(seed: u64, first_level: LevelId, starting_lives: u8) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = build_level(first_level, &mut rng);
        let starting_lives = starting_lives.max(1);
        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            level: first_level,
            first_level,
            starting_lives,
            world,
            player: Player::new(starting_lives),
            camera: Camera::default(),
            level_complete_ticks: 0,
            menu_bob: 0.0,
            time_ticks: 0,
        }
    }

    /// Fresh run: lives and score reset, first level loaded
    pub fn start_game(&mut self, events: &mut Vec<GameEvent>) {
        log::info!(
            "Starting new game on level {} with {} lives",
            self.first_level,
            self.starting_lives
        );
        self.player = Player::new(self.starting_lives);
        self.start_level(self.first_level, events);
    }

    /// Build and enter a level, keeping lives and score
    pub fn start_level(&mut self, id: LevelId, events: &mut Vec<GameEvent>) {
        let world = build_level(id, &mut self.rng);
        self.level = id;
        self.load_world(world, events);
    }

    /// Replace the world wholesale and begin playing it
    pub fn load_world(&mut self, world: World, events: &mut Vec<GameEvent>) {
        log::info!("Level {} '{}' started", self.level, world.name);
        self.world = world;
        self.cancel_buffs(events);
        self.player.reset(Player::start_position());
        self.player.last_checkpoint = None;
        self.player.invincible = 0;
        self.camera = Camera::default();
        self.level_complete_ticks = 0;
        self.phase = GamePhase::Playing;
        events.push(GameEvent::LevelStarted { level: self.level });
    }

    /// Flag reached
    pub(crate) fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        self.player.score += FLAG_SCORE;
        self.phase = GamePhase::LevelComplete;
        self.level_complete_ticks = LEVEL_COMPLETE_TICKS;
        log::info!("Level {} cleared, score {}", self.level, self.player.score);
        events.push(GameEvent::LevelCleared {
            level: self.level,
            score: self.player.score,
        });
    }

    /// Countdown finished: next level or victory
    pub(crate) fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        match self.level.next() {
            Some(next) => self.start_level(next, events),
            None => {
                self.phase = GamePhase::Win;
                log::info!("All levels cleared, final score {}", self.player.score);
                events.push(GameEvent::GameWon {
                    score: self.player.score,
                });
            }
        }
    }

    fn cancel_buffs(&mut self, events: &mut Vec<GameEvent>) {
        for kind in self.player.buffs.clear() {
            events.push(GameEvent::BuffExpired { kind });
        }
    }

    /// Lose a life; respawn or end the run
    pub(crate) fn kill_player(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        let pos = self.player.center();
        self.player.lives = self.player.lives.saturating_sub(1);
        events.push(GameEvent::PlayerDied {
            pos,
            cause,
            lives_left: self.player.lives,
        });

        if self.player.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over ({cause:?}), final score {}", self.player.score);
            events.push(GameEvent::GameOver {
                score: self.player.score,
            });
            return;
        }

        let spawn = self
            .player
            .last_checkpoint
            .unwrap_or_else(Player::start_position);
        log::debug!(
            "Player died ({cause:?}), {} lives left, respawning at {spawn}",
            self.player.lives
        );
        self.cancel_buffs(events);
        self.player.reset(spawn);
        self.player.invincible = RESPAWN_INVINCIBILITY_TICKS;
        self.camera.snap_to(spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level, LevelId::FIRST);
        assert_eq!(state.player.lives, STARTING_LIVES);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_zero_starting_lives_clamped() {
        let state = GameState::with_options(1, LevelId::FIRST, 0);
        assert_eq!(state.starting_lives, 1);
    }

    #[test]
    fn test_start_game_resets_progress() {
        let mut state = GameState::new(5);
        state.player.score = 999;
        state.player.lives = 1;
        let mut events = Vec::new();
        state.start_game(&mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.lives, STARTING_LIVES);
        assert_eq!(
            events,
            vec![GameEvent::LevelStarted {
                level: LevelId::FIRST
            }]
        );
    }

    #[test]
    fn test_death_reports_cancelled_buffs() {
        let mut state = GameState::new(5);
        state.start_game(&mut Vec::new());
        state.player.buffs.apply(PowerUpKind::Magnet);
        let mut events = Vec::new();
        state.kill_player(DeathCause::Fall, &mut events);
        assert!(events.contains(&GameEvent::BuffExpired {
            kind: PowerUpKind::Magnet
        }));
        assert!(!state.player.buffs.is_active(PowerUpKind::Magnet));
    }

    #[test]
    fn test_level_load_reports_cancelled_buffs() {
        let mut state = GameState::new(5);
        state.start_game(&mut Vec::new());
        state.player.buffs.apply(PowerUpKind::Speed);
        let mut events = Vec::new();
        state.start_level(LevelId::new(2).unwrap(), &mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::BuffExpired {
                    kind: PowerUpKind::Speed
                },
                GameEvent::LevelStarted {
                    level: LevelId::new(2).unwrap()
                },
            ]
        );
    }

    #[test]
    fn test_camera_target_clamps() {
        let t = Camera::target_for(Vec2::new(10.0, 1000.0));
        assert_eq!(t.x, 0.0);
        assert_eq!(t.y, CAMERA_MAX_Y);
        let t = Camera::target_for(Vec2::new(1000.0, -500.0));
        assert_eq!(t.x, 1000.0 - VIEW_WIDTH / 3.0);
        assert_eq!(t.y, CAMERA_MIN_Y);
    }

    #[test]
    fn test_camera_converges_for_stationary_player() {
        let mut camera = Camera::default();
        let player = Vec2::new(2000.0, 444.0);
        let target = Camera::target_for(player);
        let mut ticks = 0;
        while (camera.x - target.x).abs() > 0.5 {
            camera.follow(player);
            assert!(camera.x >= 0.0);
            ticks += 1;
            assert!(ticks < 200, "camera did not converge");
        }
        // 0.92^n shrinks the gap; ~1700px closes to 0.5px in about 100 ticks
        assert!(ticks > 50);
    }
}
