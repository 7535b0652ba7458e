//! Number Knight headless entry point
//!
//! Runs the level with the autopilot driving input, forwarding simulation
//! events to logging collaborators. Useful for soak tests and tuning.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use number_knight::audio::{AudioManager, LogBackend};
use number_knight::consts::*;
use number_knight::hooks::{AnimationPlayer, ExitHook, Hooks, ProgressTracker};
use number_knight::sim::{Actor, AnimTrigger, ExitReason, GameState, TickInput, tick};
use number_knight::ui::{FilledImage, FractionalFill, RuneProgress};
use number_knight::{LevelTuning, Settings};

#[derive(Parser)]
#[command(name = "number-knight")]
#[command(about = "Play the number quiz level headlessly with the autopilot")]
struct Cli {
    /// Level tuning JSON (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Wall-clock seconds to simulate before giving up
    #[arg(long, default_value_t = 90.0)]
    seconds: f32,

    /// Wrong answers the autopilot gives before answering correctly
    #[arg(long, default_value_t = 0)]
    mistakes: u32,
}

struct LogAnimator;

impl AnimationPlayer for LogAnimator {
    fn trigger(&mut self, actor: Actor, anim: AnimTrigger) {
        log::debug!("anim: {:?} -> {:?}", actor, anim);
    }
}

struct ExitLatch(Rc<Cell<Option<ExitReason>>>);

impl ExitHook for ExitLatch {
    fn request_exit(&mut self, reason: ExitReason) {
        log::info!("Exit requested: {:?}", reason);
        self.0.set(Some(reason));
    }
}

struct SharedRunes(Rc<RefCell<RuneProgress>>);

impl ProgressTracker for SharedRunes {
    fn register_correct(&mut self) {
        self.0.borrow_mut().register_correct();
    }

    fn update(&mut self, dt: f32) {
        self.0.borrow_mut().update(dt);
    }
}

/// Level instance plus its collaborators
struct Game {
    state: GameState,
    hooks: Hooks,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            let events = self.state.drain_events();
            self.hooks.dispatch(&events);
            self.hooks.update(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.config {
        Some(path) => LevelTuning::load(path)
            .with_context(|| format!("loading level tuning {}", path.display()))?,
        None => LevelTuning::default(),
    };
    let settings = cli
        .settings
        .as_ref()
        .map(Settings::load)
        .unwrap_or_default();

    let rune_count = tuning.presentation.rune_count;
    let to_fill = (tuning.quiz.parity_correct_required + tuning.quiz.prime_correct_required)
        as usize;
    let runes: Vec<Box<dyn FractionalFill>> = (0..rune_count)
        .map(|_| Box::new(FilledImage::default()) as Box<dyn FractionalFill>)
        .collect();
    let runes = Rc::new(RefCell::new(RuneProgress::new(
        runes,
        to_fill.min(rune_count),
        tuning.presentation.fill_tween_time,
    )));
    let exit = Rc::new(Cell::new(None));

    let mut state = GameState::new(tuning, cli.seed).context("building level")?;
    state.apply_settings(&settings);
    state.autopilot.mistakes_left = cli.mistakes;

    let mut game = Game {
        state,
        hooks: Hooks {
            animation: Some(Box::new(LogAnimator)),
            audio: Some(Box::new(AudioManager::with_settings(
                Some(Box::new(LogBackend)),
                &settings,
            ))),
            progress: Some(Box::new(SharedRunes(runes.clone()))),
            exit: Some(Box::new(ExitLatch(exit.clone()))),
        },
        accumulator: 0.0,
        input: TickInput {
            idle_mode: true,
            ..Default::default()
        },
    };

    log::info!("Number Knight (headless) starting, seed {}", cli.seed);
    let frame_dt = 1.0 / 60.0;
    let frames = (cli.seconds / frame_dt).ceil() as u32;
    for _ in 0..frames {
        game.update(frame_dt);
        if exit.get().is_some() && game.state.is_over() && !game.state.fade.is_fading() {
            break;
        }
    }

    let state = &game.state;
    let runes = runes.borrow();
    log::info!(
        "Finished after {:.2}s: phase {:?}, hits {}/{}, runes {}/{}",
        state.time,
        state.phase,
        state.player.hits_taken,
        state.player.total_allowed_hits,
        runes.filled_count(),
        rune_count
    );
    match exit.get() {
        Some(reason) => println!("{:?} in {:.2}s", reason, state.time),
        None => println!("Timed out in phase {:?}", state.phase),
    }
    Ok(())
}
