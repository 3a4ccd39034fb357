//! Configuration for the frostboard demo.
//!
//! Loaded from TOML, by default `~/.config/frostboard/config.toml`.
//! A default file is written on first run if none exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::easing::Easing;
use crate::geometry::Position;
use crate::sideboard::Transition;
use crate::snapshot::BlurAlgorithm;
use crate::types::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub blur: BlurConfig,
    pub panels: Vec<PanelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            blur: BlurConfig::default(),
            panels: vec![
                PanelConfig::new(Position::Left, 140, 0, 0xFAEBD7, "LEFT", true),
                PanelConfig::new(Position::Bottom, 0, 200, 0x0000FF, "BOTTOM", false),
                PanelConfig::new(Position::Right, 200, 0, 0x008000, "RIGHT", false),
                PanelConfig::new(Position::Top, 0, 200, 0x808080, "TOP", false),
            ],
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("frostboard");
        Ok(dir.join("config.toml"))
    }

    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let text = toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")?;
        fs::write(path, text).context("Failed to write default config file")?;
        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    /// Frames per second of the demo loop
    pub fps: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { width: 800, height: 480, fps: 60 }
    }
}

impl ScreenConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    pub algorithm: BlurAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub position: Position,
    /// 0 = full screen width
    pub width: i32,
    /// 0 = full screen height
    pub height: i32,
    pub open_ms: u64,
    pub open_easing: Easing,
    pub close_ms: u64,
    pub close_easing: Easing,
    /// 0xRRGGBB
    pub color: u32,
    pub label: String,
    /// Frost the screen behind this panel while it is open
    pub backdrop: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(Position::Left, 0, 0, 0xFAEBD7, "", false)
    }
}

impl PanelConfig {
    fn new(position: Position, width: i32, height: i32, color: u32, label: &str, backdrop: bool) -> Self {
        let open = Transition::default_open();
        let close = Transition::default_close();
        Self {
            position,
            width,
            height,
            open_ms: open.duration.as_millis() as u64,
            open_easing: open.easing,
            close_ms: close.duration.as_millis() as u64,
            close_easing: close.easing,
            color,
            label: label.to_string(),
            backdrop,
        }
    }

    pub fn requested_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn open_transition(&self) -> Transition {
        Transition::new(Duration::from_millis(self.open_ms), self.open_easing)
    }

    pub fn close_transition(&self) -> Transition {
        Transition::new(Duration::from_millis(self.close_ms), self.close_easing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_mirror_the_four_demo_boards() {
        let cfg = Config::default();
        let positions: Vec<Position> = cfg.panels.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![Position::Left, Position::Bottom, Position::Right, Position::Top]);
        assert_eq!(cfg.panels[0].requested_size(), Size::new(140, 0));
        assert_eq!(cfg.panels[0].open_transition(), Transition::default_open());
        assert_eq!(cfg.panels[0].close_easing, Easing::CircularInOut);
        assert_eq!(cfg.blur.algorithm, BlurAlgorithm::Gaussian);
        assert_eq!(cfg.screen.size(), Size::new(800, 480));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[blur]
algorithm = "box"

[[panels]]
position = "right"
width = 300
open_easing = "linear"
"#,
        )
        .unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.blur.algorithm, BlurAlgorithm::BoxBlur);
        assert_eq!(cfg.panels.len(), 1);
        let p = &cfg.panels[0];
        assert_eq!(p.position, Position::Right);
        assert_eq!(p.requested_size(), Size::new(300, 0));
        assert_eq!(p.open_easing, Easing::Linear);
        assert_eq!(p.close_ms, 1000);
        assert_eq!(cfg.screen, ScreenConfig::default());
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn bad_position_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[[panels]]\nposition = \"middle\"\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
