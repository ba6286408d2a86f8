//! Fixed-timestep session controller
//!
//! Owns one `GameState` and feeds it ticks, either one per call (`step`) or
//! from accumulated wall-clock time (`advance`).

use crate::consts::{MAX_FRAME_DT, SIM_DT};
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameEvent, GameState, TickInput, tick};

pub struct Session {
    state: GameState,
    accumulator: f32,
    max_substeps: u32,
    /// Restart pressed but not yet seen by a tick
    pending_restart: bool,
}

impl Session {
    /// Validate `settings` and open a session on the title screen
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        let first_level = settings.validate()?;
        log::info!(
            "Session created: seed {}, level {first_level}, {} lives",
            settings.seed,
            settings.starting_lives
        );
        Ok(Self {
            state: GameState::with_options(settings.seed, first_level, settings.starting_lives),
            accumulator: 0.0,
            max_substeps: settings.max_substeps,
            pending_restart: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run exactly one tick
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input)
    }

    /// Run as many ticks as `frame_dt` seconds cover
    ///
    /// The delta is capped and at most `max_substeps` ticks run; leftover
    /// time carries into the next call. A `restart` press is held until a
    /// tick runs and then reaches only that first tick.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.pending_restart |= input.restart;

        let mut input = *input;
        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            input.restart = self.pending_restart;
            events.extend(tick(&mut self.state, &input));
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_restart = false;
        }

        // Drop time we could not simulate rather than spiral
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn session() -> Session {
        Session::new(&Settings::default()).unwrap()
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            first_level: 0,
            ..Default::default()
        };
        assert!(Session::new(&settings).is_err());
    }

    #[test]
    fn test_first_level_from_settings() {
        let settings = Settings {
            first_level: 3,
            ..Default::default()
        };
        let mut session = Session::new(&settings).unwrap();
        let start = TickInput {
            restart: true,
            ..Default::default()
        };
        session.step(&start);
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert_eq!(session.state().level.get(), 3);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut s = session();
        s.advance(SIM_DT * 0.5, &TickInput::default());
        assert_eq!(s.state().menu_bob, 0.0);
        s.advance(SIM_DT * 0.6, &TickInput::default());
        assert!(s.state().menu_bob > 0.0);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut s = session();
        s.step(&TickInput {
            restart: true,
            ..Default::default()
        });
        let before = s.state().time_ticks;
        s.advance(10.0, &TickInput::default());
        assert_eq!(s.state().time_ticks - before, 4);
        // Backlog beyond the cap is dropped
        s.advance(0.0, &TickInput::default());
        assert!(s.state().time_ticks - before <= 5);
    }

    #[test]
    fn test_restart_consumed_by_first_tick() {
        let mut s = session();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let events = s.advance(SIM_DT * 3.5, &restart);
        let starts = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelStarted { .. }))
            .count();
        assert_eq!(starts, 1);
        assert_eq!(s.state().phase, GamePhase::Playing);
        // Two more ticks ran as plain play
        assert_eq!(s.state().time_ticks, 2);
    }

    #[test]
    fn test_restart_survives_short_frames() {
        let mut s = session();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        // 144 Hz frames: the press lands on a frame that runs no tick
        s.advance(1.0 / 144.0, &restart);
        assert_eq!(s.state().phase, GamePhase::Menu);
        for _ in 0..5 {
            s.advance(1.0 / 144.0, &TickInput::default());
        }
        assert_eq!(s.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_pending_restart_fires_once() {
        let mut s = session();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        s.advance(1.0 / 144.0, &restart);
        let mut starts = 0;
        for _ in 0..20 {
            starts += s
                .advance(1.0 / 144.0, &TickInput::default())
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelStarted { .. }))
                .count();
        }
        assert_eq!(starts, 1);
    }
}
