//! Configuration system
//!
//! TOML configuration for the desktop: chrome metrics, placement constants,
//! manager-wide window policy defaults, the application registry and the
//! startup layouts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::geometry::{Point, Size};
use crate::policy::{
    BehaviorOverrides, OpenStrategy, PlacementOverrides, PolicyOverrides, SizeOverrides,
    WindowPolicy,
};
use crate::registry::{AppCategory, AppDescriptor, AppRegistry};
use crate::startup::StartupLayouts;
use crate::state::DEFAULT_Z_INDEX_FLOOR;
use crate::viewport::Chrome;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Desktop chrome metrics
    pub chrome: Chrome,

    /// Placement constants for cascading
    pub placement: PlacementConfig,

    /// Stacking order settings
    pub stacking: StackingConfig,

    /// Manager-wide window policy; apps override individual fields
    pub defaults: WindowPolicy,

    /// Application registry
    pub apps: Vec<AppDescriptor>,

    /// Windows opened on first visit
    pub startup: StartupLayouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome: Chrome::default(),
            placement: PlacementConfig::default(),
            stacking: StackingConfig::default(),
            defaults: WindowPolicy::default(),
            apps: default_apps(),
            startup: StartupLayouts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(Self::find_config_file);

        match config_path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {:?}", path);
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {path:?}"))?;

                let config: Self = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {path:?}"))?;

                Ok(config)
            },
            Some(path) => {
                warn!("Config file not found at {:?}, using defaults", path);
                Ok(Self::default())
            },
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            },
        }
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            dirs::config_dir().map(|p| p.join("vitrine/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/vitrine/config.toml")),
            dirs::home_dir().map(|p| p.join(".vitrine/config.toml")),
            Some(PathBuf::from("/etc/vitrine/config.toml")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Generate default configuration as a string
    pub fn default_config_string() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }

    /// Build the application registry from `apps`.
    pub fn registry(&self) -> AppRegistry {
        self.apps.iter().cloned().collect()
    }
}

/// Cascade placement constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Diagonal offset between consecutive cascaded windows
    pub cascade_step: i32,
    /// Where the cascade starts when an app has no default position
    pub base_point: Point,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cascade_step: 30,
            base_point: Point::new(120, 60),
        }
    }
}

/// Stacking order settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingConfig {
    /// The z-index counter never drops below this value
    pub z_index_floor: u64,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            z_index_floor: DEFAULT_Z_INDEX_FLOOR,
        }
    }
}

fn sized(default: (i32, i32), min: (i32, i32), max: (i32, i32)) -> PolicyOverrides {
    PolicyOverrides {
        size: SizeOverrides {
            default: Some(Size::new(default.0, default.1)),
            min: Some(Size::new(min.0, min.1)),
            max: Some(Size::new(max.0, max.1)),
        },
        ..Default::default()
    }
}

/// The portfolio desktop's applications.
fn default_apps() -> Vec<AppDescriptor> {
    let mut music = sized((388, 203), (388, 203), (388, 203));
    music.behavior = BehaviorOverrides {
        resizable: Some(false),
        maximizable: Some(false),
        ..Default::default()
    };
    music.placement = PlacementOverrides {
        open_strategy: Some(OpenStrategy::Fixed),
        default_position: Some(Point::new(672, 580)),
        ..Default::default()
    };

    vec![
        AppDescriptor::new("about", "About Me", AppCategory::File)
            .with_policy(sized((497, 794), (455, 520), (720, 980))),
        AppDescriptor::new("projects", "Projects", AppCategory::Folder)
            .with_policy(sized((469, 691), (430, 420), (755, 1100))),
        AppDescriptor::new("resume", "Resume", AppCategory::File)
            .with_policy(sized((546, 760), (480, 540), (830, 1100))),
        AppDescriptor::new("twitter", "X", AppCategory::Link),
        AppDescriptor::new("linkedin", "LinkedIn", AppCategory::Link),
        AppDescriptor::new("github", "GitHub", AppCategory::Link),
        AppDescriptor::new("extras", "GeoWars.app", AppCategory::App)
            .with_policy(sized((720, 550), (550, 440), (1200, 900))),
        AppDescriptor::new("music", "Music", AppCategory::App).with_policy(music),
        AppDescriptor::new("video", "Video", AppCategory::App)
            .with_policy(sized((466, 393), (460, 340), (1280, 900))),
        AppDescriptor::new("terminal", "Terminal", AppCategory::App)
            .with_policy(sized((615, 380), (615, 380), (1600, 1000))),
    ]
}
