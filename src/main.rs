use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::{self, OpenOptions};
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use keybird::analytics::LogAnalytics;
use keybird::audio;
use keybird::bird::BirdKind;
use keybird::clock::FramePacer;
use keybird::render::{self, Renderer};
use keybird::session::{Services, Session};
use keybird::storage::{self, JsonFileStore, MemoryStore, Storage};
use keybird::surface::PixelCanvas;
use keybird::theme::{self, ThemeChoice};

// ── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(version, about = "Flappy Bird in your terminal")]
struct Args {
    /// classic, festive or auto (festive from December 1st to January 6th)
    #[arg(long, default_value = "auto")]
    theme: ThemeChoice,

    /// classic, realistic or advanced. Not saved.
    #[arg(long)]
    bird: Option<BirdKind>,

    /// Start muted. Not saved.
    #[arg(long)]
    mute: bool,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Where the save file and default log live.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep scores and preferences in memory only.
    #[arg(long)]
    ephemeral: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Setup ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keybird=info,analytics=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    // The terminal is in raw mode; panics go to the log instead. The renderer
    // reports the ones it contains itself.
    std::panic::set_hook(Box::new(|info| {
        if render::is_guarding() {
            tracing::debug!("{info}");
        } else {
            tracing::error!("{info}");
        }
    }));
    Ok(())
}

fn open_storage(args: &Args, dir: &Path) -> Box<dyn Storage> {
    if args.ephemeral {
        return Box::new(MemoryStore::new());
    }
    match JsonFileStore::open(dir.join("save.json")) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "save file opened");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("save file unavailable, progress will not persist: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

fn build_session(args: &Args, dir: &Path) -> Session {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = chrono::Local::now().date_naive();
    let mode = args.theme.resolve(today);
    tracing::info!(choice = ?args.theme, %mode, %today, "theme resolved");

    let theme = theme::build(mode, &mut rng);
    let services = Services {
        audio: audio::open(),
        storage: open_storage(args, dir),
        analytics: Box::new(LogAnalytics),
    };
    let mut session = Session::new(theme, services, rng);
    if let Some(kind) = args.bird {
        session = session.with_bird(kind);
    }
    if args.mute {
        session = session.with_muted(true);
    }
    session
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let dir = match &args.data_dir {
        Some(dir) => dir.clone(),
        None => storage::data_dir().context("locating data directory")?,
    };
    let log_path = args.log_file.clone().unwrap_or_else(|| dir.join("keybird.log"));
    init_logging(&log_path)?;

    let session = build_session(&args, &dir);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let result = run(&mut out, session, args.fps);

    execute!(
        out,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    tracing::info!("bye");
    result
}

fn run(out: &mut Stdout, mut session: Session, fps: u32) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = PixelCanvas::new(cols as usize, rows as usize * 2);
    let mut renderer = Renderer::new();
    let mut pacer = FramePacer::new(fps);

    loop {
        pacer.begin();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => session.primary_action(),
                    KeyCode::Char('m') => session.toggle_mute(),
                    KeyCode::Char(c @ '1'..='3') => {
                        let i = c as usize - '1' as usize;
                        session.select_bird(BirdKind::ALL[i]);
                    }
                    _ => {}
                },
                Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => session.primary_action(),
                Event::Resize(c, r) => canvas.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        session.tick();

        canvas.clear();
        renderer.draw(&mut canvas, &session);
        canvas.render(out).context("drawing frame")?;

        pacer.wait();
    }
}
