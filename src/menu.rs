//! Menu collaborator
//!
//! Polls logical keys with edge detection and exposes boolean flags the
//! level reads once per tick while in a menu state. The main and pause
//! menus draw themselves; the game-over screen is drawn by the level,
//! which only needs this type for input.

use glam::Vec2;

use crate::platform::{DrawSurface, InputSource, Key, Paint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Main,
    Pause,
    GameOver,
}

#[derive(Debug)]
pub struct Menu {
    kind: MenuKind,
    play_clicked: bool,
    exit_clicked: bool,
    ready_pressed: bool,
    play_again_clicked: bool,
    prev_space: bool,
    prev_e: bool,
    prev_r: bool,
}

impl Menu {
    pub fn new(kind: MenuKind) -> Self {
        Self {
            kind,
            play_clicked: false,
            exit_clicked: false,
            ready_pressed: false,
            play_again_clicked: false,
            prev_space: false,
            prev_e: false,
            prev_r: false,
        }
    }

    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: MenuKind) {
        self.kind = kind;
        self.reset_flags();
    }

    pub fn reset_flags(&mut self) {
        self.play_clicked = false;
        self.exit_clicked = false;
        self.ready_pressed = false;
        self.play_again_clicked = false;
    }

    /// Poll keys once; flags latch on the press edge, not while held.
    pub fn update(&mut self, input: &dyn InputSource) {
        let space = input.is_down(Key::Space);
        let e = input.is_down(Key::E);
        let r = input.is_down(Key::R);

        match self.kind {
            MenuKind::Main => {
                if space && !self.prev_space {
                    self.play_clicked = true;
                    log::debug!("menu: play pressed");
                }
                if e && !self.prev_e {
                    self.exit_clicked = true;
                    log::debug!("menu: exit pressed");
                }
            }
            MenuKind::Pause => {
                if space && !self.prev_space {
                    self.ready_pressed = true;
                    log::debug!("menu: ready pressed");
                }
                if e && !self.prev_e {
                    self.exit_clicked = true;
                }
            }
            MenuKind::GameOver => {
                if r && !self.prev_r {
                    self.play_again_clicked = true;
                    log::debug!("menu: play again pressed");
                }
                if e && !self.prev_e {
                    self.exit_clicked = true;
                }
            }
        }

        self.prev_space = space;
        self.prev_e = e;
        self.prev_r = r;
    }

    pub fn is_play_clicked(&self) -> bool {
        self.play_clicked
    }

    pub fn is_exit_clicked(&self) -> bool {
        self.exit_clicked
    }

    pub fn is_ready_pressed(&self) -> bool {
        self.ready_pressed
    }

    pub fn is_play_again_clicked(&self) -> bool {
        self.play_again_clicked
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface, canvas: Vec2) {
        let mut bg = Paint::fill([0.0, 0.0, 0.0]);
        bg.fill_opacity = 1.0;
        gfx.fill_rect(canvas * 0.5, canvas, &bg);

        let text = Paint::default();
        let center = canvas * 0.5;
        match self.kind {
            MenuKind::Main => {
                gfx.draw_text(center - Vec2::new(0.0, 50.0), 30.0, "Press SPACE to Play", &text);
                gfx.draw_text(center + Vec2::new(0.0, 50.0), 30.0, "Press E to Exit", &text);
            }
            MenuKind::Pause => {
                gfx.draw_text(center, 50.0, "Ready?", &text);
                gfx.draw_text(
                    center + Vec2::new(0.0, 60.0),
                    20.0,
                    "Press SPACE to Continue",
                    &text,
                );
            }
            MenuKind::GameOver => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SharedKeys;

    #[test]
    fn play_fires_once_per_press() {
        let keys = SharedKeys::new();
        let mut menu = Menu::new(MenuKind::Main);

        keys.press(Key::Space);
        menu.update(&keys);
        assert!(menu.is_play_clicked());

        // Held key does not re-fire after the flags are consumed
        menu.reset_flags();
        menu.update(&keys);
        assert!(!menu.is_play_clicked());

        keys.release(Key::Space);
        menu.update(&keys);
        keys.press(Key::Space);
        menu.update(&keys);
        assert!(menu.is_play_clicked());
    }

    #[test]
    fn pause_menu_only_latches_ready() {
        let keys = SharedKeys::new();
        let mut menu = Menu::new(MenuKind::Pause);
        keys.press(Key::Space);
        menu.update(&keys);
        assert!(menu.is_ready_pressed());
        assert!(!menu.is_play_clicked());
    }

    #[test]
    fn game_over_menu_latches_play_again_and_exit() {
        let keys = SharedKeys::new();
        let mut menu = Menu::new(MenuKind::GameOver);
        keys.press(Key::R);
        menu.update(&keys);
        assert!(menu.is_play_again_clicked());

        keys.press(Key::E);
        menu.update(&keys);
        assert!(menu.is_exit_clicked());
    }

    #[test]
    fn set_kind_clears_flags() {
        let keys = SharedKeys::new();
        let mut menu = Menu::new(MenuKind::Main);
        keys.press(Key::Space);
        menu.update(&keys);
        assert!(menu.is_play_clicked());

        menu.set_kind(MenuKind::Pause);
        assert!(!menu.is_play_clicked());
        assert_eq!(menu.kind(), MenuKind::Pause);
    }
}
