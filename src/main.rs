use std::env::temp_dir;
use std::fs;
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

use mindease_maze::config::{self, Settings};
use mindease_maze::game::Game;
use mindease_maze::generator::Difficulty;
use mindease_maze::grid::Dir;
use mindease_maze::render::Renderer;

#[derive(Parser)]
#[clap(version, about = "A calm little maze to wander through")]
struct Opts {
    /// Settings file (defaults to the user config directory)
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,
    /// Board width and height
    #[clap(long, value_parser)]
    size: Option<usize>,
    /// easy, medium or hard
    #[clap(long, value_parser)]
    difficulty: Option<Difficulty>,
    #[clap(long, value_parser)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Move(Dir),
    NewMaze,
    SetDifficulty(Difficulty),
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let settings = load_settings(&opts)?;

    if settings.debug {
        init_logging()?;
    }

    panic::set_hook(Box::new(|e| {
        restore_terminal();
        log::error!("{}", e);
        eprintln!("{}", e);
    }));

    let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("rng seed {}", seed);
    let mut rng = Isaac64Rng::seed_from_u64(seed);
    let mut game = Game::new(&settings, &mut rng);

    let mut stdout = io::stdout();
    or_restore(|| enter_terminal(&mut stdout), restore_terminal)
        .context("preparing the terminal")?;

    let result = run(&mut stdout, &mut game, &settings, &mut rng);
    game.shutdown();

    restore_terminal();
    result.context("running the maze")
}

fn load_settings(opts: &Opts) -> Result<Settings> {
    let mut settings = match opts.config.clone().or_else(config::default_path) {
        Some(path) => config::load(path)?,
        None => Settings::default(),
    };
    settings.apply_env();
    if let Some(size) = opts.size {
        settings.size = size;
    }
    if let Some(difficulty) = opts.difficulty {
        settings.difficulty = difficulty;
    }
    if opts.seed.is_some() {
        settings.seed = opts.seed;
    }
    settings.validate()?;
    Ok(settings)
}

fn init_logging() -> Result<()> {
    let path = temp_dir().join("mindease-maze.log");
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn enter_terminal(stdout: &mut Stdout) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    Ok(())
}

/// Runs `restore` when `setup` fails part way through.
fn or_restore<T>(setup: impl FnOnce() -> io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    setup().map_err(|e| {
        restore();
        e
    })
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.execute(Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn run(
    stdout: &mut Stdout,
    game: &mut Game,
    settings: &Settings,
    rng: &mut impl Rng,
) -> io::Result<()> {
    let mut renderer = Renderer::new(settings.size);
    let tick = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match command_for(key.code) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Move(dir)) => {
                        game.try_move(dir);
                    }
                    Some(Command::NewMaze) => game.new_maze(rng),
                    Some(Command::SetDifficulty(difficulty)) => game.set_difficulty(difficulty, rng),
                    None => {}
                }
            }
        }

        let since_tick = last_tick.elapsed();
        if since_tick >= tick {
            last_tick = Instant::now();
            game.update(since_tick, rng);
        }
        renderer.render(stdout, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Command::Move(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Command::Move(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Command::Move(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Command::Move(Dir::Right),
        KeyCode::Char('n') => Command::NewMaze,
        KeyCode::Char('1') => Command::SetDifficulty(Difficulty::Easy),
        KeyCode::Char('2') => Command::SetDifficulty(Difficulty::Medium),
        KeyCode::Char('3') => Command::SetDifficulty(Difficulty::Hard),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vi_arrow_and_wasd_keys_all_move() {
        for (keys, dir) in [
            ([KeyCode::Up, KeyCode::Char('k'), KeyCode::Char('w')], Dir::Up),
            ([KeyCode::Down, KeyCode::Char('j'), KeyCode::Char('s')], Dir::Down),
            ([KeyCode::Left, KeyCode::Char('h'), KeyCode::Char('a')], Dir::Left),
            ([KeyCode::Right, KeyCode::Char('l'), KeyCode::Char('d')], Dir::Right),
        ] {
            for key in keys {
                assert_eq!(command_for(key), Some(Command::Move(dir)));
            }
        }
    }

    #[test]
    fn other_bindings() {
        assert_eq!(command_for(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Char('n')), Some(Command::NewMaze));
        assert_eq!(
            command_for(KeyCode::Char('3')),
            Some(Command::SetDifficulty(Difficulty::Hard))
        );
        assert_eq!(command_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn failed_setup_restores_the_terminal() {
        let mut restored = false;
        let result: io::Result<()> = or_restore(
            || Err(io::Error::new(io::ErrorKind::Other, "no tty")),
            || restored = true,
        );
        assert!(result.is_err());
        assert!(restored);

        let mut restored = false;
        assert!(or_restore(|| Ok(()), || restored = true).is_ok());
        assert!(!restored);
    }

    #[test]
    fn cli_flags_override_settings() {
        let opts = Opts::parse_from([
            "mindease-maze",
            "--config",
            "/nonexistent/mindease-maze.toml",
            "--size",
            "9",
            "--difficulty",
            "hard",
            "--seed",
            "5",
        ]);
        let settings = load_settings(&opts).unwrap();
        assert_eq!(settings.size, 9);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.seed, Some(5));
    }

    #[test]
    fn invalid_size_is_rejected() {
        let opts = Opts::parse_from([
            "mindease-maze",
            "--config",
            "/nonexistent/mindease-maze.toml",
            "--size",
            "0",
        ]);
        assert!(load_settings(&opts).is_err());
    }
}
