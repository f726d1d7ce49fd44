use crate::debounce::{CLOSE_DELAY, SWITCH_DELAY};
use crate::events::AppEvent;
use crate::registry::{Sector, SectorId};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ringpath::Point;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub span: f64,
    pub view_box: f64,
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "switch_delay_ms")]
    pub switch_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "close_delay_ms")]
    pub close_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            switch_delay: SWITCH_DELAY,
            close_delay: CLOSE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub left_panel: Vec<SectorId>,
    pub ring: RingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

impl Config {
    /// The sector set and layout shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(builtin_source())
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

fn builtin_source() -> config::File<config::FileSourceString, config::FileFormat> {
    config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "nexus", "nexus").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Built-in defaults, then the user file, then `NEXUS_*` variables
/// (`NEXUS_TIMING__CLOSE_DELAY_MS=500`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    load_layers(path, env_source())
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("NEXUS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("left_panel")
}

fn load_layers(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(builtin_source())
        .add_source(config::File::from(path).required(false))
        .add_source(env)
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Falls back to the built-in config when the user's file is unusable.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let loaded = match path {
        Some(p) => load_config_from(p),
        None => load_config(),
    };
    match loaded {
        Ok(c) => Ok(c),
        Err(e) => {
            log::warn!("Using built-in config: {}", e);
            Config::builtin()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

fn is_config_event(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Posts [`AppEvent::ConfigReload`] whenever `config_path` changes on disk.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", config_dir.display(), e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_config_event(&event, &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
