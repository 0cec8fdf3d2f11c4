//! Session controller
//!
//! Owns the [`World`] and drives the Idle -> Running -> Ended state machine.
//! Every start/restart claims a fresh [`SessionToken`]; async work started for
//! an older token must drop its result.

use crate::settings::Settings;
use crate::sim::{FrameEvents, SessionPhase, TickInput, Viewport, World, WorldOptions, tick};
use crate::tuning::Tuning;

/// Monotonically increasing identifier of a start attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Converts animation-frame timestamps into clamped deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_dt_ms,
        }
    }

    /// Forget the previous timestamp; the next frame reports dt = 0
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Delta since the previous call, clamped to `[0, max_dt_ms]`.
    /// Long gaps (tab suspended) never feed the simulation a huge step.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.max_dt_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}

/// Shown on the game-over overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub seconds: u64,
}

impl GameOverSummary {
    pub fn text(&self) -> String {
        format!("{} seconds", self.seconds)
    }
}

/// HUD survival counter
pub fn hud_text(seconds: u64) -> String {
    format!("Time: {}s", seconds)
}

/// Why a session could not begin
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginError {
    /// A newer start attempt superseded this one
    #[error("start attempt superseded")]
    StaleToken,
    #[error("session already running")]
    AlreadyRunning,
}

/// One player's sequence of play-throughs
#[derive(Debug, Clone)]
pub struct Session {
    pub world: World,
    clock: FrameClock,
    token: SessionToken,
}

impl Session {
    pub fn new(tuning: Tuning, settings: &Settings, viewport: Viewport, seed: u64) -> Self {
        let options = WorldOptions::new(&tuning, settings);
        let clock = FrameClock::new(tuning.max_frame_dt_ms);
        Self {
            world: World::new(tuning, options, viewport, seed),
            clock,
            token: SessionToken(0),
        }
    }

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.world.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.world.phase == SessionPhase::Running
    }

    /// Begin a new start attempt, invalidating every older token
    pub fn claim_token(&mut self) -> SessionToken {
        self.token = SessionToken(self.token.0 + 1);
        self.token
    }

    #[inline]
    pub fn is_current(&self, token: SessionToken) -> bool {
        self.token == token
    }

    /// Enter `Running` with fresh entities (start from Idle/Ended, or restart)
    pub fn begin(&mut self, token: SessionToken, viewport: Viewport) -> Result<(), BeginError> {
        if !self.is_current(token) {
            return Err(BeginError::StaleToken);
        }
        if self.is_running() {
            return Err(BeginError::AlreadyRunning);
        }
        self.world.reset(viewport);
        self.clock.reset();
        log::info!(
            "Session {} started (scale {:.2}, {} enemies seeded)",
            token.value(),
            self.world.scale,
            self.world.enemies.len()
        );
        Ok(())
    }

    /// Run one animation frame: advance, render, then update.
    ///
    /// Returns `None` (and renders nothing) when no session is running, which
    /// is the loop's signal to stop rescheduling.
    pub fn frame<R>(&mut self, input: &TickInput, now_ms: f64, render: R) -> Option<FrameEvents>
    where
        R: FnOnce(&World),
    {
        if !self.is_running() {
            return None;
        }
        let dt = self.clock.delta(now_ms);
        crate::sim::advance(&mut self.world, dt);
        render(&self.world);
        let events = crate::sim::update(&mut self.world, input, dt);
        if events.ship_destroyed {
            log::info!("Session {} ended", self.token.value());
        }
        Some(events)
    }

    /// Step without rendering (headless runs)
    pub fn step(&mut self, input: &TickInput, dt_ms: f64) -> Option<FrameEvents> {
        if !self.is_running() {
            return None;
        }
        let dt = dt_ms.clamp(0.0, self.world.tuning.max_frame_dt_ms);
        Some(tick(&mut self.world, input, dt))
    }

    /// Back to the start screen. Only reachable from the game-over overlay,
    /// so the world is left as it ended: phase stays `Ended` and the summary
    /// still reads the final time. Overlay toggling is the caller's job.
    pub fn menu(&mut self) {
        debug_assert_ne!(self.world.phase, SessionPhase::Running);
        log::info!("Returning to menu from {:?}", self.world.phase);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.world.resize(viewport);
    }

    pub fn summary(&self) -> GameOverSummary {
        GameOverSummary {
            seconds: self.world.survived_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, Ship};
    use glam::Vec2;

    fn session() -> Session {
        Session::new(
            Tuning::default(),
            &Settings::default(),
            Viewport::new(900.0, 800.0),
            99,
        )
    }

    #[test]
    fn test_frame_clock_clamps() {
        let mut clock = FrameClock::new(50.0);
        assert_eq!(clock.delta(1000.0), 0.0);
        assert_eq!(clock.delta(1016.0), 16.0);
        // Tab was suspended for ten seconds
        assert_eq!(clock.delta(11_016.0), 50.0);
        // Timestamps going backwards never produce negative time
        assert_eq!(clock.delta(11_000.0), 0.0);
    }

    #[test]
    fn test_idle_to_running() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.frame(&TickInput::default(), 0.0, |_| panic!("idle renders")).is_none());

        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.world.enemies.len(), 2);
    }

    #[test]
    fn test_stale_token_is_rejected() {
        let mut s = session();
        let first = s.claim_token();
        let second = s.claim_token();
        assert!(!s.is_current(first));
        assert_eq!(s.begin(first, Viewport::new(900.0, 800.0)), Err(BeginError::StaleToken));
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.begin(second, Viewport::new(900.0, 800.0)).is_ok());
        assert!(second > first);
    }

    #[test]
    fn test_running_to_ended_to_restart() {
        let mut s = session();
        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();

        s.world.ship = Some(Ship {
            pos: Vec2::new(450.0, 700.0),
            size: Vec2::new(120.0, 160.0),
        });
        s.world.enemies = vec![Enemy {
            id: 99,
            pos: Vec2::new(450.0, 700.0),
            radius: 48.0,
            hp: 3,
            max_hp: 3,
            angle: 0.0,
            hit_flash_ms: 0.0,
        }];

        let mut rendered = 0;
        let events = s
            .frame(&TickInput::default(), 10.0, |_| rendered += 1)
            .unwrap();
        assert!(events.ship_destroyed);
        assert_eq!(rendered, 1);
        assert_eq!(s.phase(), SessionPhase::Ended);
        // The loop stops: no further frames run
        assert!(s.frame(&TickInput::default(), 26.0, |_| rendered += 1).is_none());
        assert_eq!(rendered, 1);

        s.menu();
        assert_eq!(s.phase(), SessionPhase::Ended);

        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.world.time_ms, 0.0);
        assert_eq!(s.world.spawn_interval_ms, 900.0);
    }

    #[test]
    fn test_menu_keeps_final_summary() {
        let mut s = session();
        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();
        s.world.time_ms = 7_400.0;
        s.world.phase = SessionPhase::Ended;

        s.menu();
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.summary().text(), "7 seconds");
        assert!(s.frame(&TickInput::default(), 100.0, |_| {}).is_none());
    }

    #[test]
    fn test_cannot_begin_twice() {
        let mut s = session();
        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();
        assert_eq!(s.begin(token, Viewport::new(900.0, 800.0)), Err(BeginError::AlreadyRunning));
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut s = session();
        let token = s.claim_token();
        s.begin(token, Viewport::new(900.0, 800.0)).unwrap();
        s.frame(&TickInput::default(), 5_000.0, |_| {});
        assert_eq!(s.world.time_ms, 0.0);
        s.frame(&TickInput::default(), 5_016.0, |_| {});
        assert_eq!(s.world.time_ms, 16.0);
    }

    #[test]
    fn test_summary_text() {
        let mut s = session();
        s.world.time_ms = 12_999.0;
        assert_eq!(s.summary().text(), "12 seconds");
        assert_eq!(hud_text(s.summary().seconds), "Time: 12s");
    }
}
