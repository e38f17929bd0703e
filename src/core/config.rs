//! Configuration management with layered hierarchy
//!
//! Built-in defaults, then the user config file, then `DISPENSA_*`
//! environment variables. Grid dimensions are read once at startup and are
//! not editable at runtime.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::expiry::ExpiryThresholds;
use crate::core::grid::GridDims;
use crate::core::undo::DEFAULT_UNDO_CAPACITY;

pub const DEFAULT_ROWS: u32 = 6;
pub const DEFAULT_COLS: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; pass --data-dir or set data_dir in the config file")]
    NoDataDir,
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Grid rows
    pub rows: u32,

    /// Grid columns
    pub cols: u32,

    /// Maximum undo snapshots kept
    pub undo_capacity: usize,

    /// Days remaining at or below which a product is red
    pub red_days: i64,

    /// Days remaining at or below which a product is yellow
    pub yellow_days: i64,

    /// Where the inventory data files live
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = ExpiryThresholds::default();
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            red_days: thresholds.red_days,
            yellow_days: thresholds.yellow_days,
            data_dir: None,
        }
    }
}

/// Partial config as read from a file; absent fields fall through to the
/// previous layer
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverlay {
    rows: Option<u32>,
    cols: Option<u32>,
    undo_capacity: Option<usize>,
    red_days: Option<i64>,
    yellow_days: Option<i64>,
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. User config file (~/.config/dispensa/config.yaml)
        if let Some(path) = Self::config_file_path() {
            if path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&path) {
                    if let Ok(overlay) = serde_yml::from_str::<ConfigOverlay>(&contents) {
                        config.merge(overlay);
                    }
                }
            }
        }

        // 3. Environment variables
        config.merge(ConfigOverlay {
            rows: env_parsed("DISPENSA_ROWS"),
            cols: env_parsed("DISPENSA_COLS"),
            undo_capacity: env_parsed("DISPENSA_UNDO_CAPACITY"),
            red_days: env_parsed("DISPENSA_RED_DAYS"),
            yellow_days: env_parsed("DISPENSA_YELLOW_DAYS"),
            data_dir: std::env::var_os("DISPENSA_DATA_DIR").map(PathBuf::from),
        });

        // a degenerate grid would make every placement out of bounds
        config.rows = config.rows.max(1);
        config.cols = config.cols.max(1);
        config
    }

    /// Get the path to the user config file
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dispensa")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Default per-user data directory
    pub fn default_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dispensa")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Merge an overlay into this config (overlay takes precedence)
    fn merge(&mut self, overlay: ConfigOverlay) {
        if let Some(rows) = overlay.rows {
            self.rows = rows;
        }
        if let Some(cols) = overlay.cols {
            self.cols = cols;
        }
        if let Some(undo_capacity) = overlay.undo_capacity {
            self.undo_capacity = undo_capacity;
        }
        if let Some(red_days) = overlay.red_days {
            self.red_days = red_days;
        }
        if let Some(yellow_days) = overlay.yellow_days {
            self.yellow_days = yellow_days;
        }
        if overlay.data_dir.is_some() {
            self.data_dir = overlay.data_dir;
        }
    }

    pub fn dims(&self) -> GridDims {
        GridDims::new(self.rows, self.cols)
    }

    pub fn thresholds(&self) -> ExpiryThresholds {
        ExpiryThresholds {
            red_days: self.red_days,
            yellow_days: self.yellow_days,
        }
    }

    /// Resolve the data directory: explicit flag, then config file, then
    /// the per-user default
    pub fn resolve_data_dir(&self, flag: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = flag {
            return Ok(dir.to_path_buf());
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        Self::default_data_dir().ok_or(ConfigError::NoDataDir)
    }

    /// Template written by `dispensa init`
    pub fn default_config_template() -> &'static str {
        r#"# Dispensa configuration
# All values are optional; omitted ones use built-in defaults.

# Grid dimensions (read once at startup)
# rows: 6
# cols: 8

# How many undo snapshots to keep
# undo_capacity: 20

# Expiry tier thresholds, in days remaining
# red_days: 7
# yellow_days: 30

# Where inventory data files live (default: per-user data dir)
# data_dir: ""
"#
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
