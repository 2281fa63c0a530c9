mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use invaders::compute::{InputSignal, Key};
use invaders::game_loop::{self, InputSource, SystemClock};
use invaders::{GameConfig, GameState, StartupError};

use display::TerminalSink;

#[derive(Debug, Parser)]
#[command(name = "invaders", about = "Fixed-shooter arcade simulation in the terminal")]
struct Args {
    /// TOML file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write logs here (the terminal is taken over while playing)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Simulation rate and frame cap
    #[arg(long)]
    fps: Option<u32>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Translate a terminal event into a core input signal.  Only key presses
/// count; repeats and releases are dropped so a held key is one action.
fn signal_for(event: &Event) -> Option<InputSignal> {
    let Event::Key(KeyEvent {
        code,
        kind: KeyEventKind::Press,
        modifiers,
        ..
    }) = event
    else {
        return None;
    };
    match code {
        KeyCode::Esc => Some(InputSignal::KeyDown(Key::Escape)),
        KeyCode::Left => Some(InputSignal::KeyDown(Key::Left)),
        KeyCode::Right => Some(InputSignal::KeyDown(Key::Right)),
        KeyCode::Char(' ') => Some(InputSignal::KeyDown(Key::Space)),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputSignal::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputSignal::Quit)
        }
        _ => None,
    }
}

/// Events arrive from a reader thread; draining never blocks the loop.
struct ChannelInput {
    rx: mpsc::Receiver<Event>,
}

impl InputSource for ChannelInput {
    fn drain(&mut self, out: &mut Vec<InputSignal>) {
        while let Ok(event) = self.rx.try_recv() {
            out.extend(signal_for(&event));
        }
    }
}

fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // loop has shut down
                }
            }
            Err(err) => {
                log::warn!("event reader stopped: {err}");
                break;
            }
        }
    });
    rx
}

// ── Startup & teardown ────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("logger already initialised")?;
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig, StartupError> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = fps;
        config.validate()?;
    }
    Ok(config)
}

/// Raw mode, alternate screen, hidden cursor.  Returns whether the terminal
/// accepted keyboard enhancement flags.
fn acquire_terminal<W: Write>(out: &mut W) -> Result<bool, StartupError> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Lets the reader tell presses from repeats; unsupported terminals only
    // ever report presses.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(keyboard_enhanced)
}

fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = load_config(&args).context("startup aborted")?;
    log::info!("starting with {config:?}");

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = match acquire_terminal(&mut out) {
        Ok(enhanced) => enhanced,
        Err(err) => {
            restore_terminal(&mut out, false);
            log::error!("{err}");
            return Err(err).context("startup aborted");
        }
    };

    let mut input = ChannelInput {
        rx: spawn_event_reader(),
    };
    let mut state = GameState::new(&config);
    let mut clock = SystemClock::new();
    let mut sink = TerminalSink::new(&mut out, config.playfield_width, config.playfield_height);

    let result = game_loop::run(&mut state, &config, &mut input, &mut sink, &mut clock);

    drop(sink);
    restore_terminal(&mut out, keyboard_enhanced);

    let stats = result.context("rendering failed")?;
    println!(
        "Game exited after {} frames with {} of {} enemies left.",
        stats.frames,
        state.enemies_remaining(),
        invaders::config::ENEMY_ROWS * invaders::config::ENEMY_COLS
    );
    Ok(())
}
