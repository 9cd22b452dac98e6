//! Sound cues
//!
//! The level fires short named cues and one looping background track
//! through the `AudioSink` collaborator. Files are logical asset names
//! resolved at play time.

use crate::platform::{AssetResolver, AudioSink};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Ball hits a paddle or obstacle
    PaddleHit,
    /// Ball collects a powerup
    PowerupPickup,
}

impl SoundCue {
    pub fn file(self) -> &'static str {
        match self {
            SoundCue::PaddleHit => "paddle_hit.wav",
            SoundCue::PowerupPickup => "powerup.wav",
        }
    }

    fn base_volume(self) -> f32 {
        match self {
            SoundCue::PaddleHit => 0.6,
            SoundCue::PowerupPickup => 0.6,
        }
    }
}

const MUSIC_FILE: &str = "background_music.mp3";

/// Per-level audio front end: cue playback plus background-music state.
#[derive(Debug)]
pub struct SoundBank {
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
}

impl SoundBank {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            music_playing: false,
        }
    }

    /// Fire-and-forget playback of a cue.
    pub fn play(&self, cue: SoundCue, audio: &mut dyn AudioSink, assets: &dyn AssetResolver) {
        let path = assets.resolve(cue.file());
        audio.play_sound(&path, cue.base_volume() * self.sfx_volume);
    }

    pub fn start_music(&mut self, audio: &mut dyn AudioSink, assets: &dyn AssetResolver) {
        if !self.music_playing {
            let path = assets.resolve(MUSIC_FILE);
            audio.play_music(&path, self.music_volume, true);
            self.music_playing = true;
            log::debug!("music started");
        }
    }

    pub fn stop_music(&mut self, audio: &mut dyn AudioSink) {
        if self.music_playing {
            audio.stop_music();
            self.music_playing = false;
            log::debug!("music stopped");
        }
    }

    /// Reconcile the background track with the session toggle; issues
    /// play/stop only when the state actually changes.
    pub fn sync_music(
        &mut self,
        music_on: bool,
        audio: &mut dyn AudioSink,
        assets: &dyn AssetResolver,
    ) {
        if music_on {
            self.start_music(audio, assets);
        } else {
            self.stop_music(audio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DirAssets;

    #[derive(Default)]
    struct RecordingAudio {
        sounds: Vec<(String, f32)>,
        music_plays: u32,
        music_stops: u32,
    }

    impl AudioSink for RecordingAudio {
        fn play_sound(&mut self, path: &str, volume: f32) {
            self.sounds.push((path.to_string(), volume));
        }
        fn play_music(&mut self, _path: &str, _volume: f32, _looping: bool) {
            self.music_plays += 1;
        }
        fn stop_music(&mut self) {
            self.music_stops += 1;
        }
    }

    #[test]
    fn cue_resolves_file_and_scales_volume() {
        let mut audio = RecordingAudio::default();
        let assets = DirAssets::new("assets");
        let settings = Settings {
            master_volume: 1.0,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let bank = SoundBank::new(&settings);
        bank.play(SoundCue::PaddleHit, &mut audio, &assets);

        let (path, volume) = &audio.sounds[0];
        assert!(path.ends_with("paddle_hit.wav"));
        assert!((volume - 0.3).abs() < 1e-6);
    }

    #[test]
    fn music_toggles_only_on_change() {
        let mut audio = RecordingAudio::default();
        let assets = DirAssets::new("assets");
        let mut bank = SoundBank::new(&Settings::default());

        bank.sync_music(true, &mut audio, &assets);
        bank.sync_music(true, &mut audio, &assets);
        assert_eq!(audio.music_plays, 1);

        bank.sync_music(false, &mut audio, &assets);
        bank.sync_music(false, &mut audio, &assets);
        assert_eq!(audio.music_stops, 1);

        bank.sync_music(true, &mut audio, &assets);
        assert_eq!(audio.music_plays, 2);
    }
}
