use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use env_logger::{Env, Target};
use fog_maze::{
    elapsed_since, format_elapsed, Advance, Clock, Dir, GameSession, MazeError, MazeResult,
    MoveOutcome, Overlay, Phase, Renderer, Reveal, Settings, Stopwatch, SystemClock,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

const MESSAGE_SECS: u64 = 3;
const HISTORY_SHOWN: usize = 5;

/// Timing state the core leaves to the front end.
struct Timers {
    preview_started: Instant,
    stopwatch: Option<Stopwatch>,
    message: Option<(String, Instant)>,
}

fn main() -> MazeResult<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

// The terminal is in raw alternate-screen mode, so logs only go to a file.
fn init_logging(settings: &Settings) -> MazeResult<()> {
    let default_filter = if settings.log_path.is_some() { "info" } else { "off" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = &settings.log_path {
        let file = File::create(path).map_err(|source| MazeError::LogFile {
            path: path.clone(),
            source,
        })?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> MazeResult<()> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let clock = SystemClock;
    let mut session = GameSession::with_view_radius(rng, settings.view_radius);
    let mut renderer = Renderer::new();
    let mut timers = Timers {
        preview_started: clock.now(),
        stopwatch: None,
        message: None,
    };
    let preview = Duration::from_secs(settings.preview_secs);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    info!("session started with {:?}", settings);

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Held keys arrive as repeats; only fresh presses move.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                if let Some(dir) = dir_for_key(key.code) {
                    if session.try_move(dir) == MoveOutcome::Won {
                        finish_level(&mut session, &mut timers, &clock);
                    }
                }
            }
        }

        if session.phase() == Phase::Previewing
            && elapsed_since(&clock, timers.preview_started) >= preview
        {
            session.begin_play();
            timers.stopwatch = Some(Stopwatch::start(&clock));
        }

        let reveal = if session.phase() == Phase::Previewing {
            Reveal::Full
        } else {
            Reveal::Fogged
        };
        let overlay = overlay(&session, &timers, &clock, preview);
        renderer.render(stdout, terminal::size()?, &session, reveal, &overlay)?;

        // The final frame above carries the last level's message and time.
        if session.phase() == Phase::Completed {
            return wait_for_quit();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn finish_level(session: &mut GameSession, timers: &mut Timers, clock: &impl Clock) {
    let time = timers
        .stopwatch
        .take()
        .map(|watch| watch.formatted(clock))
        .unwrap_or_else(|| format_elapsed(Duration::ZERO));
    session.record_completion(time.clone());
    timers.message = Some((
        format!("Level {} completed! Time: {}", session.level(), time),
        clock.now(),
    ));
    if let Advance::Next(_) = session.advance_level() {
        timers.preview_started = clock.now();
    }
}

fn overlay(session: &GameSession, timers: &Timers, clock: &impl Clock, preview: Duration) -> Overlay {
    let hud = match session.phase() {
        Phase::Completed => completion_text(session.max_level(), session.history()),
        Phase::Previewing => {
            let left = preview.saturating_sub(elapsed_since(clock, timers.preview_started));
            format!(
                "Level: {}/{}  Memorize the maze! Starting in {}s  (q to quit)",
                session.level(),
                session.max_level(),
                left.as_secs() + 1
            )
        }
        _ => {
            let time = timers
                .stopwatch
                .map(|watch| watch.formatted(clock))
                .unwrap_or_else(|| format_elapsed(Duration::ZERO));
            format!(
                "Level: {}/{}  Time: {}  (q to quit)",
                session.level(),
                session.max_level(),
                time
            )
        }
    };

    let message = match &timers.message {
        Some((text, shown)) if elapsed_since(clock, *shown) < Duration::from_secs(MESSAGE_SECS) => {
            text.clone()
        }
        _ => String::new(),
    };

    let skip = session.history().len().saturating_sub(HISTORY_SHOWN);
    let history = session
        .history()
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(idx, time)| format!("Level {}: {}", idx + 1, time))
        .collect::<Vec<_>>()
        .join("  ");

    Overlay {
        hud,
        message,
        history,
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

fn completion_text(max_level: u32, history: &[String]) -> String {
    match history.last() {
        Some(time) => format!(
            "Congratulations! You have completed all {} levels! Last level: {}  (q to quit)",
            max_level, time
        ),
        None => format!(
            "Congratulations! You have completed all {} levels!  (q to quit)",
            max_level
        ),
    }
}

fn wait_for_quit() -> MazeResult<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
