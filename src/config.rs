use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::button::ButtonStyle;
use crate::display::{parse_hex_color, Rgb565};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub memory: MemoryConfig,
    pub display: DisplayConfig,
    pub deck: DeckConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/touch-deck/config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory standing in for the SD card root
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Free heap estimate handed to the heap guard
    pub budget_bytes: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { budget_bytes: 6144 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// TTF used by the simulator for button text
    pub font_path: Option<PathBuf>,
    /// Selection outline (hex)
    pub selected_color: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            font_path: None,
            selected_color: "#00ff00".to_string(),
            background_color: "#000000".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Button colors; unparseable entries keep their default
    pub fn style(&self) -> ButtonStyle {
        let defaults = ButtonStyle::default();
        ButtonStyle {
            selected: color_or(&self.selected_color, defaults.selected),
            background: color_or(&self.background_color, defaults.background),
            text: color_or(&self.text_color, defaults.text),
        }
    }
}

fn color_or(hex: &str, fallback: Rgb565) -> Rgb565 {
    parse_hex_color(hex).unwrap_or_else(|| {
        warn!("Invalid color {:?} in config, using default", hex);
        fallback
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Action buttons shown per page
    pub page_size: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self { page_size: 6 }
    }
}
