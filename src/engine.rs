//! Frame-driven game engine
//!
//! [`TickEngine`] sits between a host frame loop and the pure simulation. It
//! turns frame deltas into whole ticks, runs the run lifecycle
//! (idle, playing, over) and forwards each tick's events to the sinks.

use crate::audio::AudioMixer;
use crate::config::{ConfigError, SimConfig};
use crate::persistence::{self, PersistError};
use crate::platform::{FixedStep, InputState};
use crate::services::{GameOverSink, HudSink, MusicTrack, RenderSink, Services};
use crate::sim::{
    self, EntityEvent, EntityKind, GameEvent, GamePhase, GameState, PLAYER_ID, TickInput,
    TickOutcome,
};

pub struct TickEngine {
    state: GameState,
    clock: FixedStep,
    render: Box<dyn RenderSink>,
    hud: Box<dyn HudSink>,
    game_over: Box<dyn GameOverSink>,
    audio: AudioMixer,
}

impl TickEngine {
    /// Build an idle engine with a generated world
    pub fn new(config: SimConfig, seed: u64, services: Services) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = FixedStep::new(config.max_frame_dt);
        let mut engine = Self {
            state: GameState::new(config, seed),
            clock,
            render: services.render,
            hud: services.hud,
            game_over: services.game_over,
            audio: AudioMixer::new(services.audio),
        };
        engine.audio.music(Some(MusicTrack::Menu));
        engine.dispatch();
        log::info!("Engine ready (seed {seed})");
        Ok(engine)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn audio_mut(&mut self) -> &mut AudioMixer {
        &mut self.audio
    }

    /// Begin a new run from `Idle` or `Over`. Returns false if already playing.
    ///
    /// The HUD receives one frame for the fresh run before its first tick.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Idle | GamePhase::Over => {}
            GamePhase::Playing | GamePhase::Paused => return false,
        }
        self.state.rebuild();
        self.state.phase = GamePhase::Playing;
        self.clock.reset();
        self.audio.music(Some(MusicTrack::Game));
        self.dispatch();
        self.update_hud();
        log::info!("Run started");
        true
    }

    /// Dismiss a finished run and return to `Idle`
    pub fn acknowledge(&mut self) -> bool {
        if self.state.phase != GamePhase::Over {
            return false;
        }
        self.state.phase = GamePhase::Idle;
        self.audio.music(Some(MusicTrack::Menu));
        log::info!("Result acknowledged");
        true
    }

    /// Feed one frame. Returns the number of ticks simulated.
    pub fn update(&mut self, dt: f64, input: &mut InputState) -> u32 {
        if input.take_start() && self.state.phase != GamePhase::Playing {
            self.start();
        }
        if self.state.phase != GamePhase::Playing {
            return 0;
        }

        self.clock.accumulate(dt);
        let mut ticks = 0;
        // The interval is re-read every pass; a ramp mid-frame takes effect at once
        while self.state.phase == GamePhase::Playing
            && self.clock.try_consume(self.state.tick_interval())
        {
            self.step(input.tick_input());
            ticks += 1;
        }
        if self.state.phase != GamePhase::Playing {
            self.clock.reset();
        }
        ticks
    }

    /// Run exactly one tick and dispatch its events
    pub fn step(&mut self, input: TickInput) -> TickOutcome {
        let outcome = sim::tick(&mut self.state, &input);
        self.dispatch();
        if outcome == TickOutcome::Advanced {
            self.update_hud();
        }
        outcome
    }

    /// Serialize the running game
    pub fn snapshot(&self) -> Result<String, PersistError> {
        persistence::save_to_string(&self.state)
    }

    /// Replace the running game with a saved one and resync the scene
    pub fn restore(&mut self, json: &str) -> Result<(), PersistError> {
        let state = persistence::load_from_str(json)?;
        self.clock = FixedStep::new(state.config.max_frame_dt);
        self.state = state;
        self.resync_scene();
        self.dispatch();
        self.audio.music(match self.state.phase {
            GamePhase::Playing | GamePhase::Paused => Some(MusicTrack::Game),
            GamePhase::Idle => Some(MusicTrack::Menu),
            GamePhase::Over => None,
        });
        self.update_hud();
        log::info!("Restored game at tick {}", self.state.tick);
        Ok(())
    }

    fn resync_scene(&mut self) {
        let state = &mut self.state;
        let mut events: Vec<GameEvent> = vec![
            EntityEvent::Cleared.into(),
            EntityEvent::Spawned {
                id: PLAYER_ID,
                kind: EntityKind::Player,
                at: state.player.pos,
            }
            .into(),
        ];
        for ob in &state.obstacles {
            events.push(
                EntityEvent::Spawned {
                    id: ob.id(),
                    kind: ob.kind(),
                    at: ob.cell(),
                }
                .into(),
            );
        }
        for echo in &state.echoes {
            events.push(
                EntityEvent::Spawned {
                    id: echo.id,
                    kind: EntityKind::Echo,
                    at: echo.pos,
                }
                .into(),
            );
        }
        for (&at, &kind) in &state.orbs {
            events.push(EntityEvent::OrbPlaced { at, kind }.into());
        }
        state.events = events;
    }

    fn update_hud(&mut self) {
        let score = &self.state.score;
        self.hud.update(
            score.score,
            score.multiplier,
            self.state.elapsed_secs(),
            score.echo_peak,
        );
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Entity(e) => self.render.entity_event(&e),
                GameEvent::Cue(cue) => self.audio.play(cue),
                GameEvent::GameOver { reason } => {
                    self.game_over.show(
                        reason,
                        self.state.score.score,
                        self.state.elapsed_secs(),
                        self.state.score.echo_peak,
                    );
                    self.audio.music(None);
                }
                GameEvent::Fused { at, echoes } => {
                    log::debug!("Fusion of {echoes} at ({}, {})", at.x, at.y);
                }
                GameEvent::TickRateChanged { rate } => {
                    log::debug!("Tick rate {rate:.2}/s");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Key;
    use crate::services::Recorder;
    use crate::sim::{Cue, Direction, GameOverReason};

    fn engine_with(config: SimConfig, seed: u64) -> (TickEngine, Recorder) {
        let recorder = Recorder::new();
        let engine = TickEngine::new(config, seed, recorder.services()).unwrap();
        (engine, recorder)
    }

    #[test]
    fn test_starts_idle_with_menu_music() {
        let (engine, recorder) = engine_with(SimConfig::default(), 1);
        assert_eq!(engine.phase(), GamePhase::Idle);
        recorder.with(|r| {
            assert_eq!(r.music, vec![Some(MusicTrack::Menu)]);
            assert_eq!(r.entity_events.first(), Some(&EntityEvent::Cleared));
            assert!(r.hud.is_empty());
        });
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimConfig {
            grid_width: 2,
            ..SimConfig::default()
        };
        assert!(TickEngine::new(config, 1, Services::default()).is_err());
    }

    #[test]
    fn test_idle_frames_do_not_tick() {
        let (mut engine, _) = engine_with(SimConfig::default(), 1);
        let mut input = InputState::new();
        assert_eq!(engine.update(1.0, &mut input), 0);
        assert_eq!(engine.state().tick, 0);
    }

    #[test]
    fn test_start_request_and_fixed_step() {
        let (mut engine, recorder) = engine_with(SimConfig::default(), 1);
        let mut input = InputState::new();
        input.key_down(Key::Space);
        // Clamped to 0.25s at 10 ticks/s
        assert_eq!(engine.update(5.0, &mut input), 2);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().tick, 2);
        assert_eq!(engine.update(0.04, &mut input), 0);
        assert_eq!(engine.update(0.02, &mut input), 1);
        recorder.with(|r| {
            assert_eq!(r.music, vec![Some(MusicTrack::Menu), Some(MusicTrack::Game)]);
            // One frame on start plus one per tick
            assert_eq!(r.hud.len(), 4);
            assert_eq!(r.hud[3].elapsed_secs, 0.3);
        });
    }

    #[test]
    fn test_game_over_flow() {
        let config = SimConfig {
            echo_delay: 2,
            ..SimConfig::default()
        };
        let (mut engine, recorder) = engine_with(config, 8);
        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.step(TickInput::default()), TickOutcome::Advanced);
        assert_eq!(engine.step(TickInput::default()), TickOutcome::Advanced);
        assert_eq!(
            engine.step(TickInput::default()),
            TickOutcome::GameOver(GameOverReason::CollidedWithEcho)
        );
        assert_eq!(engine.phase(), GamePhase::Over);

        let mut input = InputState::new();
        assert_eq!(engine.update(1.0, &mut input), 0);
        recorder.with(|r| {
            assert_eq!(r.game_overs.len(), 1);
            let report = r.game_overs[0];
            assert_eq!(report.reason, GameOverReason::CollidedWithEcho);
            assert_eq!(report.elapsed_secs, 0.2);
            assert_eq!(report.echo_peak, 1);
            assert_eq!(r.cues.last(), Some(&Cue::GameOver));
            assert_eq!(r.music.last(), Some(&None));
        });

        assert_eq!(engine.audio_mut().current_track(), None);
        assert!(engine.acknowledge());
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.audio_mut().current_track(), Some(MusicTrack::Menu));
        assert!(!engine.acknowledge());
        input.key_down(Key::Up);
        engine.update(0.0, &mut input);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().tick, 0);
    }

    #[test]
    fn test_ramp_mid_frame_uses_new_interval() {
        let config = SimConfig {
            echo_delay: 500,
            speed_step: 3,
            max_frame_dt: 0.5,
            ..SimConfig::default()
        };
        let (mut engine, recorder) = engine_with(config, 3);
        engine.start();
        for _ in 0..3 {
            engine.step(TickInput::default());
        }
        assert_eq!(engine.state().tick, 3);
        assert_eq!(engine.state().tick_rate, 10.0);

        // The next tick ramps and reports it through the event log
        let mut preview = engine.state().clone();
        sim::tick(&mut preview, &TickInput::default());
        assert!(preview.events.iter().any(|e| matches!(
            e,
            GameEvent::TickRateChanged { rate } if (rate - 10.8).abs() < 1e-12
        )));

        // Tick 3 costs 0.1s and ramps to 10.8/s; two more fit at 1/10.8s each.
        // At a cached 0.1s only two ticks would fit in 0.29s.
        let mut input = InputState::new();
        assert_eq!(engine.update(0.29, &mut input), 3);
        assert_eq!(engine.state().tick, 6);
        assert_eq!(engine.state().last_speed_up, 3);
        assert!((engine.state().tick_rate - 10.8).abs() < 1e-12);
        assert!(engine.state().events.is_empty());
        recorder.with(|r| {
            let last = r.hud.last().unwrap();
            assert_eq!(last.elapsed_secs, 0.6);
            assert_eq!(r.hud.len(), 7);
        });
    }

    #[test]
    fn test_over_restarts_directly() {
        let config = SimConfig {
            echo_delay: 2,
            ..SimConfig::default()
        };
        let (mut engine, _) = engine_with(config, 8);
        engine.start();
        for _ in 0..3 {
            engine.step(TickInput::default());
        }
        assert_eq!(engine.phase(), GamePhase::Over);
        assert!(engine.start());
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().score.echo_peak, 0);
    }

    #[test]
    fn test_snapshot_restore_continues_identically() {
        let (mut a, _) = engine_with(SimConfig::default(), 21);
        a.start();
        let script = [Direction::Up, Direction::Left, Direction::Hold, Direction::Right];
        for i in 0..25 {
            a.step(TickInput::moving(script[i % 4]));
        }
        let saved = a.snapshot().unwrap();

        let (mut b, recorder) = engine_with(SimConfig::default(), 999);
        recorder.clear();
        b.restore(&saved).unwrap();
        recorder.with(|r| {
            assert_eq!(r.entity_events.first(), Some(&EntityEvent::Cleared));
            assert_eq!(r.music.last(), Some(&Some(MusicTrack::Game)));
        });

        for i in 25..90 {
            let input = TickInput::moving(script[i % 4]);
            assert_eq!(a.step(input), b.step(input));
        }
        assert_eq!(a.state().tick, b.state().tick);
        assert_eq!(a.state().player, b.state().player);
        assert_eq!(a.state().score, b.state().score);
        assert_eq!(a.state().orbs, b.state().orbs);
    }
}
