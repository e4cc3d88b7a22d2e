use std::path::PathBuf;
use std::str::FromStr;

use crate::session::DEFAULT_VIEW_RADIUS;

pub const DEFAULT_PREVIEW_SECS: u64 = 12;
pub const DEFAULT_RENDER_FPS: u64 = 60;

/// Front-end settings, read from `MAZE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub view_radius: usize,
    pub preview_secs: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_radius: DEFAULT_VIEW_RADIUS,
            preview_secs: DEFAULT_PREVIEW_SECS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            view_radius: parse(&lookup, "MAZE_VIEW_RADIUS").unwrap_or(defaults.view_radius),
            preview_secs: parse(&lookup, "MAZE_PREVIEW_SECS").unwrap_or(defaults.preview_secs),
            render_fps: parse(&lookup, "MAZE_FPS")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.render_fps),
            seed: parse(&lookup, "MAZE_SEED"),
            log_path: lookup("MAZE_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse::<T>().ok())
}
