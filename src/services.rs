//! Narrow interfaces to the collaborators outside the simulation core
//!
//! The engine is built with a [`Services`] value instead of reaching for
//! global singletons, so it runs headless in tests with the null sinks.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::{Cue, EntityEvent, GameOverReason};

/// Scene-graph side of rendering
pub trait RenderSink {
    fn entity_event(&mut self, event: &EntityEvent);
}

pub trait HudSink {
    /// Called once per completed tick, plus one initial frame when a run starts
    fn update(&mut self, score: u64, multiplier: f64, elapsed_secs: f64, echo_peak: usize);
}

pub trait GameOverSink {
    /// Called once when a run ends
    fn show(&mut self, reason: GameOverReason, score: u64, elapsed_secs: f64, echo_peak: usize);
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Game,
}

/// Fire-and-forget audio/haptics
pub trait AudioSink {
    fn play(&mut self, cue: Cue, volume: f32);

    /// Switch background music; `None` stops it
    fn music(&mut self, _track: Option<MusicTrack>) {}
}

/// Sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn entity_event(&mut self, _event: &EntityEvent) {}
}

impl HudSink for NullSink {
    fn update(&mut self, _score: u64, _multiplier: f64, _elapsed_secs: f64, _echo_peak: usize) {}
}

impl GameOverSink for NullSink {
    fn show(&mut self, _reason: GameOverReason, _score: u64, _elapsed_secs: f64, _echo_peak: usize) {}
}

impl AudioSink for NullSink {
    fn play(&mut self, _cue: Cue, _volume: f32) {}
}

/// The collaborators handed to the engine at construction
pub struct Services {
    pub render: Box<dyn RenderSink>,
    pub hud: Box<dyn HudSink>,
    pub game_over: Box<dyn GameOverSink>,
    pub audio: Box<dyn AudioSink>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            render: Box::new(NullSink),
            hud: Box::new(NullSink),
            game_over: Box::new(NullSink),
            audio: Box::new(NullSink),
        }
    }
}

/// Snapshot of one HUD update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudFrame {
    pub score: u64,
    pub multiplier: f64,
    pub elapsed_secs: f64,
    pub echo_peak: usize,
}

/// Final result of a run as shown by the game-over sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverReport {
    pub reason: GameOverReason,
    pub score: u64,
    pub elapsed_secs: f64,
    pub echo_peak: usize,
}

/// Everything a [`Recorder`] has seen
#[derive(Debug, Default)]
pub struct Recording {
    pub entity_events: Vec<EntityEvent>,
    pub hud: Vec<HudFrame>,
    pub game_overs: Vec<GameOverReport>,
    pub cues: Vec<Cue>,
    pub music: Vec<Option<MusicTrack>>,
}

/// Shared recording sink; clones write to the same log.
///
/// Useful for tests and headless runs that inspect what the engine emitted.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    log: Rc<RefCell<Recording>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Services that all write into this recorder
    pub fn services(&self) -> Services {
        Services {
            render: Box::new(self.clone()),
            hud: Box::new(self.clone()),
            game_over: Box::new(self.clone()),
            audio: Box::new(self.clone()),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&Recording) -> T) -> T {
        f(&self.log.borrow())
    }

    pub fn clear(&self) {
        *self.log.borrow_mut() = Recording::default();
    }
}

impl RenderSink for Recorder {
    fn entity_event(&mut self, event: &EntityEvent) {
        self.log.borrow_mut().entity_events.push(*event);
    }
}

impl HudSink for Recorder {
    fn update(&mut self, score: u64, multiplier: f64, elapsed_secs: f64, echo_peak: usize) {
        self.log.borrow_mut().hud.push(HudFrame {
            score,
            multiplier,
            elapsed_secs,
            echo_peak,
        });
    }
}

impl GameOverSink for Recorder {
    fn show(&mut self, reason: GameOverReason, score: u64, elapsed_secs: f64, echo_peak: usize) {
        self.log.borrow_mut().game_overs.push(GameOverReport {
            reason,
            score,
            elapsed_secs,
            echo_peak,
        });
    }
}

impl AudioSink for Recorder {
    fn play(&mut self, cue: Cue, _volume: f32) {
        self.log.borrow_mut().cues.push(cue);
    }

    fn music(&mut self, track: Option<MusicTrack>) {
        self.log.borrow_mut().music.push(track);
    }
}
