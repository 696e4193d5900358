//! Audio cue routing
//!
//! The simulation only names cues; the mixer applies volume and mute
//! settings and hands them to whatever backend the host provides.

use serde::{Deserialize, Serialize};

use crate::services::{AudioSink, MusicTrack};
use crate::sim::Cue;

impl Cue {
    /// Asset stem for this cue's sound effect
    pub fn asset_name(&self) -> &'static str {
        match self {
            Cue::EatWhite => "sfx_eat_white",
            Cue::EatGold => "sfx_eat_gold",
            Cue::EchoSpawn => "sfx_echo_spawn",
            Cue::EchoFuse => "sfx_echo_fuse",
            Cue::BumpWall => "sfx_bump_wall",
            Cue::GameOver => "sfx_game_over",
        }
    }
}

impl MusicTrack {
    pub fn asset_name(&self) -> &'static str {
        match self {
            MusicTrack::Menu => "bg_menu_loop",
            MusicTrack::Game => "bg_game_loop",
        }
    }
}

/// Volume preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Applies [`AudioSettings`] in front of an [`AudioSink`]
pub struct AudioMixer {
    settings: AudioSettings,
    sink: Box<dyn AudioSink>,
    track: Option<MusicTrack>,
}

impl AudioMixer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            settings: AudioSettings::default(),
            sink,
            track: None,
        }
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: AudioSettings) {
        self.settings = AudioSettings {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        };
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.settings.muted {
            0.0
        } else {
            self.settings.master_volume * self.settings.sfx_volume
        }
    }

    /// Forward a cue unless the effective volume is zero
    pub fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }

    /// Switch music; asking for the current track again is a no-op
    pub fn music(&mut self, track: Option<MusicTrack>) {
        if self.track == track {
            return;
        }
        self.track = track;
        log::debug!(
            "Music -> {}",
            track.map(|t| t.asset_name()).unwrap_or("off")
        );
        self.sink.music(track);
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.track
    }
}
