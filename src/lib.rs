//! Duel Pong - a two-player arcade paddle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timers, collisions, level state machine)
//! - `platform`: Rendering/audio/input/asset collaborator traits + headless impls
//! - `session`: Frame-paced shell owning the level and its context
//! - `settings`: Preferences and gameplay tuning
//! - `audio`: Named sound cues fired through the audio collaborator
//! - `menu`: Main/pause/game-over menu collaborator

pub mod audio;
pub mod context;
pub mod menu;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use context::GameContext;
pub use session::{FrameClock, Session, SessionOutcome};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (square playfield)
    pub const CANVAS_WIDTH: f32 = 900.0;
    pub const CANVAS_HEIGHT: f32 = 900.0;

    /// Target frame duration for the ~60 Hz driver (milliseconds)
    pub const FRAME_TIME_MS: f32 = 16.7;
    /// Ticks with a larger delta (seconds) are discarded to keep collision response stable
    pub const MAX_FRAME_DELTA: f32 = 0.5;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    pub const BALL_SPEED: f32 = 700.0;
    /// Seconds the ball takes to ramp from zero to its target velocity after a reset
    pub const BALL_RAMP_UP_SECS: f32 = 1.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 70.0;
    pub const PADDLE_SPEED: f32 = 1000.0;
    /// Horizontal inset of each paddle from its wall
    pub const PADDLE_MARGIN: f32 = 50.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 10.0;
    pub const OBSTACLE_HEIGHT: f32 = 100.0;
    pub const OBSTACLE_SPEED: f32 = 700.0;
    pub const BREAKABLE_HIT_POINTS: u32 = 2;

    /// Powerup defaults
    pub const POWERUP_SIZE: f32 = 50.0;
    /// Seconds a powerup effect stays on the ball
    pub const POWERUP_DURATION_SECS: f32 = 4.0;
    pub const SPEED_UP_FACTOR: f32 = 1.5;
    pub const SLOW_DOWN_FACTOR: f32 = 0.60;
    pub const GROW_FACTOR: f32 = 1.4;
    pub const SHRINK_FACTOR: f32 = 0.7;

    /// Sudden death ball speed boost
    pub const SUDDEN_DEATH_SPEED_FACTOR: f32 = 1.4;
}
