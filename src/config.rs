// Shared game/UI constants and runtime settings.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ARENA_W: usize = 12;
pub const ARENA_H: usize = 20;
pub const MIN_DIM: usize = 4;
pub const MAX_DIM: usize = 40;
pub const CELL_W: usize = 2; // each block is drawn two characters wide
pub const DROP_INTERVAL_MS: u64 = 1000;
pub const POLL_INTERVAL_MS: u64 = 16;
pub const HIGHSCORE_FILE: &str = ".blockfall-highscore.json";

pub const ENV_WIDTH: &str = "BLOCKFALL_WIDTH";
pub const ENV_HEIGHT: &str = "BLOCKFALL_HEIGHT";
pub const ENV_DROP_MS: &str = "BLOCKFALL_DROP_MS";
pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_OVERFLOW: &str = "BLOCKFALL_OVERFLOW";
pub const ENV_HIGHSCORE: &str = "BLOCKFALL_HIGHSCORE";
pub const ENV_LOG: &str = "BLOCKFALL_LOG";

/// Play-field size in terminal cells, walls included.
pub fn play_size(arena_w: usize, arena_h: usize) -> (usize, usize) {
    (arena_w * CELL_W + 2, arena_h + 2)
}

/// What happens when a freshly spawned piece has nowhere to go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Stop in the game-over state until restarted.
    #[default]
    Halt,
    /// Wipe the arena and keep playing.
    Clear,
}

impl OverflowPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "halt" | "stop" => Some(OverflowPolicy::Halt),
            "clear" | "reset" => Some(OverflowPolicy::Clear),
            _ => None,
        }
    }
}

/// Runtime settings, resolved from the environment by `from_env`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub drop_interval: Duration,
    pub seed: Option<u64>,
    pub overflow: OverflowPolicy,
    pub highscore_path: PathBuf,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: ARENA_W,
            height: ARENA_H,
            drop_interval: Duration::from_millis(DROP_INTERVAL_MS),
            seed: None,
            overflow: OverflowPolicy::Halt,
            highscore_path: PathBuf::from(HIGHSCORE_FILE),
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through `lookup`, falling back to defaults for
    /// anything missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(w) = parse_var::<usize>(&lookup, ENV_WIDTH) {
            settings.width = clamp_dim(ENV_WIDTH, w);
        }
        if let Some(h) = parse_var::<usize>(&lookup, ENV_HEIGHT) {
            settings.height = clamp_dim(ENV_HEIGHT, h);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_DROP_MS) {
            if ms == 0 {
                log::warn!("{ENV_DROP_MS}=0 ignored, keeping {DROP_INTERVAL_MS}ms");
            } else {
                settings.drop_interval = Duration::from_millis(ms);
            }
        }
        settings.seed = parse_var::<u64>(&lookup, ENV_SEED);
        if let Some(raw) = lookup(ENV_OVERFLOW) {
            match OverflowPolicy::from_str(&raw) {
                Some(policy) => settings.overflow = policy,
                None => log::warn!("unknown {ENV_OVERFLOW} value {raw:?}, using halt"),
            }
        }
        if let Some(path) = lookup(ENV_HIGHSCORE).filter(|p| !p.trim().is_empty()) {
            settings.highscore_path = PathBuf::from(path);
        }
        settings.log_path = lookup(ENV_LOG)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        settings
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring malformed {key}={raw:?}");
            None
        }
    }
}

fn clamp_dim(key: &str, value: usize) -> usize {
    let clamped = value.clamp(MIN_DIM, MAX_DIM);
    if clamped != value {
        log::warn!("{key}={value} out of range, using {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.width, 12);
        assert_eq!(settings.drop_interval, Duration::from_millis(1000));
    }

    #[test]
    fn reads_every_variable() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_WIDTH, "10"),
            (ENV_HEIGHT, "22"),
            (ENV_DROP_MS, "250"),
            (ENV_SEED, "42"),
            (ENV_OVERFLOW, "clear"),
            (ENV_HIGHSCORE, "/tmp/hs.json"),
            (ENV_LOG, "/tmp/blockfall.log"),
        ]));
        assert_eq!(settings.width, 10);
        assert_eq!(settings.height, 22);
        assert_eq!(settings.drop_interval, Duration::from_millis(250));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.overflow, OverflowPolicy::Clear);
        assert_eq!(settings.highscore_path, PathBuf::from("/tmp/hs.json"));
        assert_eq!(settings.log_path, Some(PathBuf::from("/tmp/blockfall.log")));
    }

    #[test]
    fn bad_values_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_WIDTH, "wide"),
            (ENV_HEIGHT, "1000"),
            (ENV_DROP_MS, "0"),
            (ENV_OVERFLOW, "explode"),
        ]));
        assert_eq!(settings.width, ARENA_W);
        assert_eq!(settings.height, MAX_DIM);
        assert_eq!(settings.drop_interval, Duration::from_millis(DROP_INTERVAL_MS));
        assert_eq!(settings.overflow, OverflowPolicy::Halt);
    }

    #[test]
    fn dimensions_are_clamped_both_ways() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_WIDTH, "1"), (ENV_HEIGHT, "41")]));
        assert_eq!(settings.width, MIN_DIM);
        assert_eq!(settings.height, MAX_DIM);
    }

    #[test]
    fn play_size_includes_walls() {
        assert_eq!(play_size(12, 20), (26, 22));
    }
}
