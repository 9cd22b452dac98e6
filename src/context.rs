//! Explicit game context
//!
//! One canonical bundle of session-wide state and collaborator handles,
//! constructed once by the shell and passed by reference into the level
//! and its entities. There is no ambient global lookup.

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::platform::{AssetResolver, AudioSink, InputSource};

pub struct GameContext {
    /// Playfield dimensions in pixels
    pub canvas: Vec2,
    /// Session clock in seconds, advanced once per frame by the shell
    pub clock: f64,
    /// Global music toggle
    pub music_on: bool,
    pub input: Box<dyn InputSource>,
    pub audio: Box<dyn AudioSink>,
    pub assets: Box<dyn AssetResolver>,
}

impl GameContext {
    pub fn new(
        input: Box<dyn InputSource>,
        audio: Box<dyn AudioSink>,
        assets: Box<dyn AssetResolver>,
    ) -> Self {
        Self {
            canvas: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            clock: 0.0,
            music_on: true,
            input,
            audio,
            assets,
        }
    }

    /// Headless context for tests and the demo binary.
    pub fn headless() -> Self {
        use crate::platform::{DirAssets, NullAudio, SharedKeys};
        Self::new(
            Box::new(SharedKeys::new()),
            Box::new(NullAudio),
            Box::new(DirAssets::new("assets")),
        )
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas.x
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas.y
    }
}
