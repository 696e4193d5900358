//! Echo Trail headless driver
//!
//! Runs the engine at a fixed frame rate with a wandering autopilot and logs
//! what the sinks receive. Useful for soak runs and balance checks.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use echo_trail::audio::AudioSettings;
use echo_trail::config::SimConfig;
use echo_trail::persistence;
use echo_trail::platform::InputState;
use echo_trail::render::GridProjection;
use echo_trail::services::{AudioSink, GameOverSink, HudSink, MusicTrack, RenderSink, Services};
use echo_trail::sim::{
    Cue, Direction, EntityEvent, EntityKind, GameOverReason, GamePhase, GameState, Grid, GridPos,
};
use echo_trail::TickEngine;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Frames per second of the simulated host loop
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// JSON file with `SimConfig` overrides
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the final game state here
    #[arg(long)]
    save: Option<PathBuf>,
    #[arg(long)]
    mute: bool,
}

/// Logs player motion in scene coordinates
struct LogRender {
    projection: GridProjection,
}

impl RenderSink for LogRender {
    fn entity_event(&mut self, event: &EntityEvent) {
        match *event {
            EntityEvent::Moved {
                kind: EntityKind::Player,
                to,
                ..
            } => {
                let p = self.projection.point(to);
                log::trace!("player -> ({:.0}, {:.0})", p.x, p.y);
            }
            EntityEvent::Cleared => log::trace!("scene cleared"),
            _ => {}
        }
    }
}

struct LogHud;

impl HudSink for LogHud {
    fn update(&mut self, score: u64, multiplier: f64, elapsed_secs: f64, echo_peak: usize) {
        log::trace!("hud: {score} x{multiplier:.1} {elapsed_secs:.1}s peak {echo_peak}");
    }
}

/// Collects finished runs
#[derive(Default)]
struct Results {
    runs: Vec<(GameOverReason, u64, f64, usize)>,
}

struct LogGameOver(Rc<RefCell<Results>>);

impl GameOverSink for LogGameOver {
    fn show(&mut self, reason: GameOverReason, score: u64, elapsed_secs: f64, echo_peak: usize) {
        log::info!("Run over: {reason}, score {score}, {elapsed_secs:.1}s, echo peak {echo_peak}");
        self.0
            .borrow_mut()
            .runs
            .push((reason, score, elapsed_secs, echo_peak));
    }
}

struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {} @ {volume:.2}", cue.asset_name());
    }

    fn music(&mut self, track: Option<MusicTrack>) {
        log::debug!("music {}", track.map(|t| t.asset_name()).unwrap_or("off"));
    }
}

/// Wanders toward open cells, avoiding echoes and obstacles one step ahead
struct Autopilot {
    rng: Pcg32,
    heading: Direction,
}

impl Autopilot {
    const DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::new(seed, 0xa11ce),
            heading: Direction::Up,
        }
    }

    fn safe(state: &GameState, cell: GridPos) -> bool {
        state.passable(cell) && !state.echoes.iter().any(|e| e.pos == cell)
    }

    fn choose(&mut self, state: &GameState) -> Direction {
        let here = state.player.pos;
        let keep = Self::safe(state, here.step(self.heading)) && self.rng.random_range(0..4) != 0;
        if keep {
            return self.heading;
        }
        let options: Vec<Direction> = Self::DIRECTIONS
            .into_iter()
            .filter(|d| Self::safe(state, here.step(*d)))
            .collect();
        if options.is_empty() {
            return Direction::Hold;
        }
        self.heading = options[self.rng.random_range(0..options.len())];
        self.heading
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {e}", path.display()))?;
    SimConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bad config: {e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.fps == 0 || cli.seconds.is_nan() || cli.seconds < 0.0 {
        log::error!("--fps must be positive and --seconds non-negative");
        return ExitCode::FAILURE;
    }

    let results = Rc::new(RefCell::new(Results::default()));
    let grid = Grid::new(config.grid_width, config.grid_height);
    let services = Services {
        render: Box::new(LogRender {
            projection: GridProjection::new(grid, Vec2::new(720.0, 1280.0)),
        }),
        hud: Box::new(LogHud),
        game_over: Box::new(LogGameOver(results.clone())),
        audio: Box::new(LogAudio),
    };
    let mut engine = match TickEngine::new(config, cli.seed, services) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid config: {e}");
            return ExitCode::FAILURE;
        }
    };
    engine.audio_mut().set_settings(AudioSettings {
        muted: cli.mute,
        ..AudioSettings::default()
    });

    let dt = 1.0 / cli.fps as f64;
    let frames = (cli.seconds * cli.fps as f64).round() as u64;
    let mut autopilot = Autopilot::new(cli.seed);
    let mut input = InputState::new();
    input.request_start();
    let mut total_ticks = 0u64;

    for _ in 0..frames {
        if engine.phase() == GamePhase::Over {
            engine.acknowledge();
            input.request_start();
        }
        // Boxed in: hold still rather than bump
        let direction = autopilot.choose(engine.state());
        input.set_hold(direction == Direction::Hold);
        input.set_direction(Some(direction));
        total_ticks += engine.update(dt, &mut input) as u64;
    }

    let results = results.borrow();
    let best = results.runs.iter().map(|r| r.1).max().unwrap_or(0);
    println!(
        "seed {} | {} ticks | {} finished runs | best score {} | current score {} at tick {}",
        cli.seed,
        total_ticks,
        results.runs.len(),
        best,
        engine.state().score.score,
        engine.state().tick
    );

    if let Some(path) = cli.save {
        if let Err(e) = persistence::save_to_file(engine.state(), &path) {
            log::error!("Save failed: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
