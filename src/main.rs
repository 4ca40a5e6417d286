mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::input::{Event, Key};
use space_invaders::{Game, GameConfig, GameError, Level, Outcome};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Defend the planet from a descending martian formation")]
struct Args {
    /// TOML file overriding the default tunables
    #[arg(long)]
    config: Option<String>,

    /// Start straight at this level instead of showing the menu
    /// (applied on top of --config)
    #[arg(long)]
    level: Option<Level>,

    /// Enemy bullets cost no lives
    #[arg(long)]
    god_mode: bool,

    /// Where diagnostics are written; the terminal belongs to the game
    #[arg(long, default_value = "space_invaders.log")]
    log_file: PathBuf,

    /// Seed for the shooter selection RNG
    #[arg(long)]
    seed: Option<u64>,
}

// ── Held-key model ──────────────────────────────────────────────────────────

/// Frames a key stays down after its last press or repeat event.  Terminals
/// without release reporting only send repeats, at 15 Hz or faster.
const HOLD_WINDOW: u64 = 4;

/// Frame number of the last press/repeat seen per key code.
type KeyFrames = HashMap<KeyCode, u64>;

fn is_held(key_frame: &KeyFrames, code: &KeyCode, frame: u64) -> bool {
    matches!(key_frame.get(code), Some(&last) if frame.saturating_sub(last) <= HOLD_WINDOW)
}

const BINDINGS: [(Key, &[KeyCode]); 4] = [
    (Key::Left, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
    (Key::Right, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
    (Key::Fire, &[KeyCode::Char(' ')]),
    (Key::Escape, &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')]),
];

/// Keyboard snapshot for the simulation at `frame`.
fn held_keys(key_frame: &KeyFrames, frame: u64) -> Vec<Key> {
    BINDINGS
        .iter()
        .filter(|(_, codes)| codes.iter().any(|c| is_held(key_frame, c, frame)))
        .map(|(key, _)| *key)
        .collect()
}

// ── Menu ──────────────────────────────────────────────────────────────────────

/// Block on the input channel until a level is picked.  `None` means quit.
fn choose_level<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<TermEvent>,
) -> std::io::Result<Option<Level>> {
    display::draw_menu(out)?;

    while let Ok(term_event) = rx.recv() {
        let TermEvent::Key(KeyEvent { code, kind, .. }) = term_event else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Char(c @ '1'..='3') => {
                if let Ok(level) = c.to_string().parse::<Level>() {
                    return Ok(Some(level));
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(None),
            _ => {}
        }
    }
    // Input thread gone: nothing more can be chosen.
    Ok(None)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive one game at the configured tick rate.  `Ok(true)` ends the
/// program, `Ok(false)` goes back to the level menu.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    level: Level,
    rx: &mpsc::Receiver<TermEvent>,
    rng: &mut StdRng,
) -> Result<bool, GameError> {
    let frame_period = Duration::from_secs_f32(1.0 / game.config.display.fps);
    let mut key_frame = KeyFrames::new();
    let mut frame = 0u64;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let finished = game.outcome() != Outcome::Playing;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(term_event) = rx.try_recv() {
            let TermEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = term_event
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            game.handle_event(Event::DisplayClose, &[] as &[Key], rng)?;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if finished => {
                            return Ok(false);
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc if finished => {
                            return Ok(true);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !finished {
            let keys = held_keys(&key_frame, frame);
            game.handle_event(Event::Tick, keys.as_slice(), rng)?;
        }

        // A quit request ends the session; a lost game waits on the overlay.
        if game.is_done() && !game.ship.is_destroyed() {
            return Ok(true);
        }

        if game.take_redraw() || finished {
            display::render_frame(out, game, level)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            thread::sleep(frame_period - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("cannot open log file {}: {e}", args.log_file.display());
        return ExitCode::FAILURE;
    }

    let base = match &args.config {
        Some(path) => match GameConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load {path}: {e}");
                eprintln!("failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut out = BufWriter::new(stdout());
    let result = with_terminal(&mut out, |out, rx| run(out, rx, &args, base));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("session aborted: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Enter raw mode and the alternate screen, run `body`, and always restore
/// the terminal afterwards.
fn with_terminal<W: Write>(
    out: &mut W,
    body: impl FnOnce(&mut W, &mpsc::Receiver<TermEvent>) -> Result<(), GameError>,
) -> Result<(), GameError> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release reporting makes held keys drop immediately; terminals that
    // refuse it fall back to HOLD_WINDOW expiry.
    let release_events = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; the loops only poll the channel.
    let (tx, rx) = mpsc::channel::<TermEvent>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = body(out, &rx);

    if release_events {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<TermEvent>,
    args: &Args,
    base: GameConfig,
) -> Result<(), GameError> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut preset = args.level;
    let mut best = 0;

    loop {
        let level = match preset.take() {
            Some(level) => level,
            None => match choose_level(out, rx)? {
                Some(level) => level,
                None => break,
            },
        };

        let mut config = base.clone();
        config.apply_level(level);
        config.god_mode |= args.god_mode;

        info!("starting {} game", level.as_str());
        let mut game = Game::new(config, &mut rng)?;
        let quit = game_loop(out, &mut game, level, rx, &mut rng)?;

        best = best.max(game.score);
        info!(
            "session ended: {:?}, score {}, best {}, {} martians destroyed",
            game.outcome(),
            game.score,
            best,
            game.destroyed
        );

        if quit {
            break;
        }
    }
    Ok(())
}
