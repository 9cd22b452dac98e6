//! Session shell
//!
//! Owns the level and its context, forwards per-frame update/draw calls,
//! and keeps the tick cadence honest: a frame that arrives absurdly late
//! (>500 ms) is discarded rather than fed to the collision pipeline, and
//! `FrameClock` sleeps off the shortfall of fast frames to hold ~60 Hz.

use std::time::{Duration, Instant};

use crate::consts::{FRAME_TIME_MS, MAX_FRAME_DELTA};
use crate::context::GameContext;
use crate::platform::DrawSurface;
use crate::settings::{Settings, Tuning};
use crate::sim::{Level, LevelOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Running,
    /// Orderly shutdown requested; stop the frame loop.
    Exit,
}

pub struct Session {
    ctx: GameContext,
    level: Level,
}

impl Session {
    pub fn new(seed: u64, settings: Settings, tuning: Tuning, mut ctx: GameContext) -> Self {
        ctx.music_on = settings.music_on;
        let mut level = Level::new(seed, &settings, tuning);
        level.init(1, true, &mut ctx);
        log::info!("Session started with seed {seed}");
        Self { ctx, level }
    }

    /// Advance one frame. `dt` is in seconds.
    pub fn update(&mut self, dt: f32) -> SessionOutcome {
        if dt > MAX_FRAME_DELTA {
            log::warn!("Skipped update, excessive delta time: {:.0} ms", dt * 1000.0);
            return SessionOutcome::Running;
        }

        self.ctx.clock += dt as f64;
        match self.level.update(dt, &mut self.ctx) {
            LevelOutcome::Running => SessionOutcome::Running,
            LevelOutcome::Exit => SessionOutcome::Exit,
        }
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface) {
        self.level.draw(gfx, &self.ctx);
    }

    pub fn set_music(&mut self, on: bool) {
        self.ctx.music_on = on;
    }

    pub fn music_on(&self) -> bool {
        self.ctx.music_on
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn clock(&self) -> f64 {
        self.ctx.clock
    }

    pub fn canvas_width(&self) -> f32 {
        self.ctx.canvas.x
    }

    pub fn canvas_height(&self) -> f32 {
        self.ctx.canvas.y
    }
}

/// Wall-clock pacer for the native frame loop.
pub struct FrameClock {
    last: Instant,
    target: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            target: Duration::from_secs_f32(FRAME_TIME_MS / 1000.0),
        }
    }

    /// Sleep off whatever is left of the frame budget, then return the
    /// delta time (seconds) since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.target {
            std::thread::sleep(self.target - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
