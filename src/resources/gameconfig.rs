//! Game configuration resource.
//!
//! Settings loaded from an INI file. Every value has a default so the game
//! starts without a config file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//!
//! [assets]
//! root = ./assets
//! tile_size = 64
//! frame_time = 0.1
//! trim_blank_frames = false
//! blank_rule = ratio
//! alpha_threshold = 0.99
//! blank_ratio = 0.9
//! average_alpha = 0.05
//!
//! [map]
//! width = 256
//! height = 256
//! dir = ./maps
//! file = ./maps/map.bin
//!
//! [log]
//! file = game_log.txt
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::resources::assetstore::{AssetStore, BlankFrameRule};
use crate::resources::tileworld::MAX_MAP_DIMENSION;

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_ASSET_ROOT: &str = "./assets";
const DEFAULT_TILE_SIZE: u32 = 64;
const DEFAULT_FRAME_TIME: f32 = 0.1;
const DEFAULT_ALPHA_THRESHOLD: f32 = 0.99;
const DEFAULT_BLANK_RATIO: f32 = 0.9;
const DEFAULT_AVERAGE_ALPHA: f32 = 0.05;
const DEFAULT_MAP_WIDTH: u32 = 256;
const DEFAULT_MAP_HEIGHT: u32 = 256;
const DEFAULT_MAP_DIR: &str = "./maps";
const DEFAULT_MAP_FILE: &str = "./maps/map.bin";
const DEFAULT_LOG_FILE: &str = "game_log.txt";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Which blank-frame rule the asset loader uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankRuleKind {
    #[default]
    Ratio,
    Average,
}

impl BlankRuleKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ratio" => Some(BlankRuleKind::Ratio),
            "average" => Some(BlankRuleKind::Average),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            BlankRuleKind::Ratio => "ratio",
            BlankRuleKind::Average => "average",
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Root of the asset tree.
    pub asset_root: PathBuf,
    /// Edge length in pixels of tilemap tiles and world cells.
    pub tile_size: u32,
    /// Seconds per animation frame.
    pub frame_time: f32,
    pub trim_blank_frames: bool,
    pub blank_rule: BlankRuleKind,
    pub alpha_threshold: f32,
    pub blank_ratio: f32,
    pub average_alpha: f32,
    /// Tile world size in cells.
    pub map_width: u32,
    pub map_height: u32,
    /// Directory scanned for the first map on test map entry.
    pub map_dir: PathBuf,
    /// File written and read by the placement editor.
    pub map_file: PathBuf,
    /// Persistent log target. `None` logs to stderr.
    pub log_file: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            tile_size: DEFAULT_TILE_SIZE,
            frame_time: DEFAULT_FRAME_TIME,
            trim_blank_frames: false,
            blank_rule: BlankRuleKind::Ratio,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            blank_ratio: DEFAULT_BLANK_RATIO,
            average_alpha: DEFAULT_AVERAGE_ALPHA,
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            map_dir: PathBuf::from(DEFAULT_MAP_DIR),
            map_file: PathBuf::from(DEFAULT_MAP_FILE),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.asset_root = PathBuf::from(root);
        }
        if let Some(size) = config.getuint("assets", "tile_size").ok().flatten() {
            if size > 0 {
                self.tile_size = size as u32;
            } else {
                warn!("Ignoring tile_size = 0");
            }
        }
        if let Some(frame_time) = config.getfloat("assets", "frame_time").ok().flatten() {
            self.frame_time = frame_time as f32;
        }
        if let Some(trim) = config.getbool("assets", "trim_blank_frames").ok().flatten() {
            self.trim_blank_frames = trim;
        }
        if let Some(rule) = config.get("assets", "blank_rule") {
            match BlankRuleKind::parse(&rule) {
                Some(kind) => self.blank_rule = kind,
                None => warn!("Unknown blank_rule '{}', keeping {:?}", rule, self.blank_rule),
            }
        }
        if let Some(v) = config.getfloat("assets", "alpha_threshold").ok().flatten() {
            self.alpha_threshold = v as f32;
        }
        if let Some(v) = config.getfloat("assets", "blank_ratio").ok().flatten() {
            self.blank_ratio = v as f32;
        }
        if let Some(v) = config.getfloat("assets", "average_alpha").ok().flatten() {
            self.average_alpha = v as f32;
        }

        // [map] section
        if let Some(width) = config.getuint("map", "width").ok().flatten() {
            self.map_width = map_dimension("width", width);
        }
        if let Some(height) = config.getuint("map", "height").ok().flatten() {
            self.map_height = map_dimension("height", height);
        }
        if let Some(dir) = config.get("map", "dir") {
            self.map_dir = PathBuf::from(dir);
        }
        if let Some(file) = config.get("map", "file") {
            self.map_file = PathBuf::from(file);
        }

        // [log] section
        if let Some(file) = config.get("log", "file") {
            let file = file.trim();
            self.log_file = (!file.is_empty()).then(|| PathBuf::from(file));
        }

        info!(
            "Loaded config: {}x{} window, fps={}, assets={:?}, tile={}px, map {}x{}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.asset_root,
            self.tile_size,
            self.map_width,
            self.map_height
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config.set("assets", "root", Some(self.asset_root.display().to_string()));
        config.set("assets", "tile_size", Some(self.tile_size.to_string()));
        config.set("assets", "frame_time", Some(self.frame_time.to_string()));
        config.set(
            "assets",
            "trim_blank_frames",
            Some(self.trim_blank_frames.to_string()),
        );
        config.set("assets", "blank_rule", Some(self.blank_rule.as_str().to_string()));
        config.set("assets", "alpha_threshold", Some(self.alpha_threshold.to_string()));
        config.set("assets", "blank_ratio", Some(self.blank_ratio.to_string()));
        config.set("assets", "average_alpha", Some(self.average_alpha.to_string()));

        config.set("map", "width", Some(self.map_width.to_string()));
        config.set("map", "height", Some(self.map_height.to_string()));
        config.set("map", "dir", Some(self.map_dir.display().to_string()));
        config.set("map", "file", Some(self.map_file.display().to_string()));

        let log_file = self
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        config.set("log", "file", Some(log_file));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Blank-frame rule built from the `[assets]` thresholds.
    pub fn blank_frame_rule(&self) -> BlankFrameRule {
        match self.blank_rule {
            BlankRuleKind::Ratio => BlankFrameRule::TransparentRatio {
                alpha_threshold: self.alpha_threshold,
                max_ratio: self.blank_ratio,
            },
            BlankRuleKind::Average => BlankFrameRule::AverageAlpha {
                threshold: self.average_alpha,
            },
        }
    }

    /// Empty asset store configured from the `[assets]` section.
    pub fn asset_store(&self) -> AssetStore {
        AssetStore::new()
            .with_tile_size(self.tile_size)
            .with_frame_time(self.frame_time)
            .with_blank_frame_trimming(self.blank_frame_rule(), self.trim_blank_frames)
    }
}

/// Clamp a `[map]` size into the range map files can hold.
fn map_dimension(key: &str, value: u64) -> u32 {
    let max = MAX_MAP_DIMENSION as u64;
    let clamped = value.clamp(1, max);
    if clamped != value {
        warn!("[map] {} = {} is out of range, using {}", key, value, clamped);
    }
    clamped as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_keeps_defaults() {
        let temp = TempDir::new().expect("temp");
        let mut config = GameConfig::with_path(temp.path().join("absent.ini"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.tile_size, 64);
        assert_eq!(config.map_file, PathBuf::from("./maps/map.bin"));
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("config.ini");
        fs::write(
            &path,
            "[assets]\ntile_size = 32\nblank_rule = average\naverage_alpha = 0.2\n\n[map]\nwidth = 10\n\n[log]\nfile = other.log\n",
        )
        .expect("write");
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().expect("load");
        assert_eq!(config.tile_size, 32);
        assert_eq!(config.map_width, 10);
        assert_eq!(config.map_height, 256);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.log_file, Some(PathBuf::from("other.log")));
        assert_eq!(
            config.blank_frame_rule(),
            BlankFrameRule::AverageAlpha { threshold: 0.2 }
        );
        assert_eq!(config.asset_store().tile_size(), 32);
    }

    #[test]
    fn map_size_is_clamped_to_file_limits() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("config.ini");
        fs::write(&path, "[map]\nwidth = 5000\nheight = 0\n").expect("write");
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().expect("load");
        assert_eq!(config.map_width, MAX_MAP_DIMENSION as u32);
        assert_eq!(config.map_height, 1);
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("config.ini");
        let mut config = GameConfig::with_path(&path);
        config.map_width = 48;
        config.trim_blank_frames = true;
        config.save_to_file().expect("save");

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().expect("load");
        assert_eq!(loaded, config);
    }
}
