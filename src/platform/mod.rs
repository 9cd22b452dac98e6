//! Platform collaborator interfaces
//!
//! The simulation never talks to a concrete windowing, audio, or input
//! backend. It consumes the narrow traits defined here; a real frontend
//! implements them, and the headless implementations below serve tests
//! and the demo binary.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use glam::Vec2;

/// Logical keys the game binds actions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Space,
    E,
    R,
}

/// Fill/outline/texture descriptor for a draw call.
#[derive(Debug, Clone)]
pub struct Paint {
    pub fill: [f32; 3],
    pub fill_opacity: f32,
    pub outline: [f32; 3],
    pub outline_opacity: f32,
    pub outline_width: f32,
    pub texture: Option<String>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: [1.0, 1.0, 1.0],
            fill_opacity: 1.0,
            outline: [0.0, 0.0, 0.0],
            outline_opacity: 0.0,
            outline_width: 1.0,
            texture: None,
        }
    }
}

impl Paint {
    pub fn fill(rgb: [f32; 3]) -> Self {
        Self {
            fill: rgb,
            ..Self::default()
        }
    }

    pub fn textured(texture: String) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }
}

/// Primitive draw calls, invoked only during the draw pass.
pub trait DrawSurface {
    fn fill_rect(&mut self, center: Vec2, size: Vec2, paint: &Paint);
    fn fill_disk(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn draw_text(&mut self, pos: Vec2, font_size: f32, text: &str, paint: &Paint);
}

/// Fire-and-forget audio triggers.
pub trait AudioSink {
    fn play_sound(&mut self, path: &str, volume: f32);
    fn play_music(&mut self, path: &str, volume: f32, looping: bool);
    fn stop_music(&mut self);
}

/// Boolean key-state queries.
pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;
}

/// Resolves a logical asset name to a loadable path.
pub trait AssetResolver {
    fn resolve(&self, asset: &str) -> String;
}

/// Draw surface that discards everything. Used by tests and the headless demo.
#[derive(Debug, Default)]
pub struct NullDraw;

impl DrawSurface for NullDraw {
    fn fill_rect(&mut self, _center: Vec2, _size: Vec2, _paint: &Paint) {}
    fn fill_disk(&mut self, _center: Vec2, _radius: f32, _paint: &Paint) {}
    fn draw_text(&mut self, _pos: Vec2, _font_size: f32, _text: &str, _paint: &Paint) {}
}

/// Audio sink that discards everything.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sound(&mut self, _path: &str, _volume: f32) {}
    fn play_music(&mut self, _path: &str, _volume: f32, _looping: bool) {}
    fn stop_music(&mut self) {}
}

/// Key-state store shared between the frame driver (which writes) and the
/// game context (which reads). Single-threaded by design.
#[derive(Debug, Clone, Default)]
pub struct SharedKeys(Rc<RefCell<HashSet<Key>>>);

impl SharedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.0.borrow_mut().insert(key);
    }

    pub fn release(&self, key: Key) {
        self.0.borrow_mut().remove(&key);
    }

    pub fn release_all(&self) {
        self.0.borrow_mut().clear();
    }
}

impl InputSource for SharedKeys {
    fn is_down(&self, key: Key) -> bool {
        self.0.borrow().contains(&key)
    }
}

/// Resolves asset names under a base directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetResolver for DirAssets {
    fn resolve(&self, asset: &str) -> String {
        self.root.join(asset).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_keys_reflect_press_and_release() {
        let keys = SharedKeys::new();
        let reader = keys.clone();
        assert!(!reader.is_down(Key::Space));
        keys.press(Key::Space);
        assert!(reader.is_down(Key::Space));
        keys.release(Key::Space);
        assert!(!reader.is_down(Key::Space));
    }

    #[test]
    fn dir_assets_joins_root() {
        let assets = DirAssets::new("assets");
        let path = assets.resolve("paddle_hit.wav");
        assert!(path.ends_with("paddle_hit.wav"));
        assert!(path.starts_with("assets"));
    }
}
