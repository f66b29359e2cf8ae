//! Terminal runner (default binary).
//!
//! Owns the event loop: crossterm input, the framebuffer renderer, the
//! terminal bell and wall-clock time for the gravity timer.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use meowtris::core::{dispatch, EventSink, GameConfig, GameState};
use meowtris::input::{handle_key_event, should_quit};
use meowtris::term::{BellNotifier, FrameBuffer, GameView, TerminalRenderer, Viewport};
use meowtris::types::{GameEvent, GRAVITY_MS};

/// Poll interval while no gravity timer is armed (paused or game over).
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "meowtris", version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    #[arg(long, help = "Seed for the piece sequence (default: derived from the clock)")]
    seed: Option<u32>,

    #[arg(
        long,
        default_value_t = GRAVITY_MS,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Milliseconds between gravity steps"
    )]
    gravity_ms: u32,

    #[arg(long, help = "Write logs to this file (nothing is logged without it)")]
    log_file: Option<PathBuf>,

    #[arg(long, help = "Do not ring the terminal bell")]
    no_bell: bool,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            seed: self.seed.unwrap_or_else(clock_seed),
            gravity_ms: self.gravity_ms,
        }
    }
}

/// Logs every game event at debug level.
struct EventLog;

impl EventSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        debug!(?event, "game event");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.game_config();
    info!(seed = config.seed, gravity_ms = config.gravity_ms, "starting meowtris");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, !cli.no_bell);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!(%err, "failed to restore terminal");
    }
    if let Err(err) = &result {
        warn!(%err, "game loop failed");
    }
    result
}

/// Install a file-backed subscriber. The terminal is in raw mode while the
/// game runs, so logs never go to stdout or stderr.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(level)
        .init();
    info!(%level, "logging initialized");
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: GameConfig, bell_enabled: bool) -> Result<()> {
    let mut game = GameState::new(config);
    game.start();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut bell = BellNotifier::stdout(bell_enabled);
    let mut log = EventLog;

    let mut last = Instant::now();
    // Sub-millisecond remainder carried into the next advance.
    let mut carry = Duration::ZERO;
    let mut dirty = true;

    loop {
        if dirty {
            let (w, h) = terminal::size().unwrap_or((80, 24));
            view.render_into(&game.snapshot(), Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        let timeout = game
            .timer()
            .remaining_ms()
            .map_or(IDLE_POLL, |ms| Duration::from_millis(ms as u64));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = game.score(), lines = game.lines(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        dirty |= game.apply_action(action);
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed = carry + now.duration_since(last);
        last = now;
        let ms = elapsed.as_millis().min(u32::MAX as u128) as u32;
        carry = elapsed.saturating_sub(Duration::from_millis(ms as u64));
        if game.advance(ms) > 0 {
            dirty = true;
        }

        dispatch(
            game.drain_events(),
            &mut [&mut bell as &mut dyn EventSink, &mut log],
        );
    }
}
