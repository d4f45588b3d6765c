use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde_derive::Deserialize;

use crate::generator::{Difficulty, DEFAULT_RETRY_CEILING};

pub const MAX_SIZE: usize = 32;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub size: usize,
    pub difficulty: Difficulty,
    pub retry_ceiling: u32,
    pub hint_delay_secs: u64,
    pub win_delay_secs: u64,
    pub tick_ms: u64,
    pub render_fps: u64,
    pub debug: bool,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            size: 6,
            difficulty: Difficulty::Easy,
            retry_ceiling: DEFAULT_RETRY_CEILING,
            hint_delay_secs: 10,
            win_delay_secs: 3,
            tick_ms: 50,
            render_fps: 60,
            debug: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn hint_delay(&self) -> Duration {
        Duration::from_secs(self.hint_delay_secs)
    }

    pub fn win_delay(&self) -> Duration {
        Duration::from_secs(self.win_delay_secs)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_SIZE).contains(&self.size),
            "size must be between 1 and {}, got {}",
            MAX_SIZE,
            self.size
        );
        ensure!(self.retry_ceiling >= 1, "retry_ceiling must be at least 1");
        ensure!(self.hint_delay_secs > 0, "hint_delay_secs must be positive");
        ensure!(self.win_delay_secs > 0, "win_delay_secs must be positive");
        Ok(())
    }

    /// `MAZE_TICK_MS` / `MAZE_FPS` override the file; junk or zero is ignored.
    pub fn apply_env(&mut self) {
        if let Some(v) = positive_env("MAZE_TICK_MS") {
            self.tick_ms = v;
        }
        if let Some(v) = positive_env("MAZE_FPS") {
            self.render_fps = v;
        }
    }
}

fn positive_env(key: &str) -> Option<u64> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mindease-maze").join("config.toml"))
}

pub fn parse_str(s: &str) -> Result<Settings> {
    let settings = toml::from_str(s)?;
    Ok(settings)
}

/// Reads a settings file. A missing file yields the defaults.
pub fn load<P: AsRef<Path>>(p: P) -> Result<Settings> {
    let path = p.as_ref();
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    parse_str(&s).with_context(|| format!("parsing {}", path.display()))
}
