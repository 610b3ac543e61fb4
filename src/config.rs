//! Configuration loading for MargaNav
//!
//! Loads configuration from a TOML file. Every field has a default, so a
//! partial file (or no file at all) yields a working setup.
//!
//! ```toml
//! [scanner]
//! num_slices = 5
//! threshold = 200
//!
//! [history]
//! capacity = 30
//!
//! [source]
//! kind = "images"
//! path = "recordings/hallway"
//! ```

use crate::error::{Error, Result};
use crate::vision::filter::binomial_kernel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which mask pixels count as free space inside a slice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeCriterion {
    /// Only pixels still at full value after smoothing
    #[default]
    Saturated,
    /// Any pixel the smoothing left above zero
    Nonzero,
}

/// Free-space scanner parameters
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScannerConfig {
    /// Number of vertical slices (default: 5)
    #[serde(default = "default_num_slices")]
    pub num_slices: usize,

    /// Luminance cutoff; pixels at or below are free (default: 200)
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// Smoothing kernel size: 1 (off), 3, 5 or 7 (default: 5)
    #[serde(default = "default_blur_kernel")]
    pub blur_kernel: usize,

    /// Free pixel test used when counting (default: saturated)
    #[serde(default)]
    pub free_criterion: FreeCriterion,
}

/// Decision trail parameters
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Number of past decisions kept for the trail (default: 30)
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

/// Kind of frame source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Generated scene with a drifting free corridor
    #[default]
    Synthetic,
    /// Image files read from a directory in name order
    Images,
}

/// Frame source settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Directory of frames for the `images` source
    #[serde(default = "default_source_path")]
    pub path: PathBuf,

    /// Restart the image sequence after the last file
    #[serde(default)]
    pub looping: bool,

    /// Synthetic frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Synthetic frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Synthetic stream length (0 = endless)
    #[serde(default = "default_frame_limit")]
    pub frame_limit: u64,

    /// Synthetic noise seed
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Overlay preset names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyleName {
    /// Blue label bar, no trail
    ObstacleAvoidance,
    /// Yellow label bar with decision trail
    #[default]
    PathPlanning,
}

/// Overlay rendering settings
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub style: OverlayStyleName,

    /// Overrides the preset's trail setting when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_trail: Option<bool>,
}

/// Snapshot persistence settings
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Output file; format follows the extension. Defaults to the style's file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Frame loop control settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Bounded wait for quit/snapshot signals per frame (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Consecutive grab failures tolerated before the loop stops
    #[serde(default)]
    pub max_grab_retries: u32,

    /// Stop after this many processed frames (0 = unlimited)
    #[serde(default)]
    pub max_frames: u64,

    /// Read 'q'/'s' commands from stdin
    #[serde(default = "default_keyboard")]
    pub keyboard: bool,
}

/// Logging settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Upper bound for `scanner.num_slices`
pub const MAX_NUM_SLICES: usize = 4096;

// Default value functions
fn default_num_slices() -> usize {
    5
}
fn default_threshold() -> u8 {
    200
}
fn default_blur_kernel() -> usize {
    5
}
fn default_history_capacity() -> usize {
    30
}
fn default_source_path() -> PathBuf {
    PathBuf::from("frames")
}
fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}
fn default_frame_limit() -> u64 {
    300
}
fn default_seed() -> u64 {
    42
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_keyboard() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            num_slices: default_num_slices(),
            threshold: default_threshold(),
            blur_kernel: default_blur_kernel(),
            free_criterion: FreeCriterion::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            path: default_source_path(),
            looping: false,
            width: default_width(),
            height: default_height(),
            frame_limit: default_frame_limit(),
            seed: default_seed(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_grab_retries: 0,
            max_frames: 0,
            keyboard: default_keyboard(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ScannerConfig {
    /// Check scanner parameters
    pub fn validate(&self) -> Result<()> {
        if self.num_slices == 0 || self.num_slices > MAX_NUM_SLICES {
            return Err(Error::Config(format!(
                "scanner.num_slices must be in 1..={} (got {})",
                MAX_NUM_SLICES, self.num_slices
            )));
        }
        if binomial_kernel(self.blur_kernel).is_none() {
            return Err(Error::Config(format!(
                "scanner.blur_kernel must be 1, 3, 5 or 7 (got {})",
                self.blur_kernel
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        self.scanner.validate()?;
        if self.history.capacity == 0 {
            return Err(Error::Config("history.capacity must be > 0".to_string()));
        }
        if self.source.kind == SourceKind::Synthetic
            && (self.source.width == 0 || self.source.height == 0)
        {
            return Err(Error::Config(
                "source.width and source.height must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Snapshot file to write, falling back to the overlay style's default name
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.snapshot.path {
            Some(path) => path.clone(),
            None => PathBuf::from(match self.overlay.style {
                OverlayStyleName::ObstacleAvoidance => "drone_obstacle_avoidance_snapshot.jpg",
                OverlayStyleName::PathPlanning => "path_planning_snapshot.jpg",
            }),
        }
    }
}
