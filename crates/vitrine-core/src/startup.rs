//! Startup window layouts chosen by viewport size.
//!
//! The raw viewport (not the work area) is classified into a width band and a
//! height band; the pair selects one of three layout profiles. Final geometry
//! still goes through the manager's clamping.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::viewport::Viewport;

const WIDTH_MEDIUM_MIN: i32 = 1450;
const WIDTH_WIDE_MIN: i32 = 2100;
const HEIGHT_MEDIUM_MIN: i32 = 860;
const HEIGHT_TALL_MIN: i32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthBand {
    Narrow,
    Medium,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightBand {
    Short,
    Medium,
    Tall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupProfile {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupBands {
    pub width: WidthBand,
    pub height: HeightBand,
}

impl StartupBands {
    pub const fn classify(viewport: Viewport) -> Self {
        let width = if viewport.width >= WIDTH_WIDE_MIN {
            WidthBand::Wide
        } else if viewport.width >= WIDTH_MEDIUM_MIN {
            WidthBand::Medium
        } else {
            WidthBand::Narrow
        };
        let height = if viewport.height >= HEIGHT_TALL_MIN {
            HeightBand::Tall
        } else if viewport.height >= HEIGHT_MEDIUM_MIN {
            HeightBand::Medium
        } else {
            HeightBand::Short
        };
        Self { width, height }
    }

    pub const fn profile(self) -> StartupProfile {
        match (self.height, self.width) {
            (HeightBand::Short, _) | (HeightBand::Medium, WidthBand::Narrow) => {
                StartupProfile::Small
            },
            (HeightBand::Medium, _) | (HeightBand::Tall, WidthBand::Narrow) => {
                StartupProfile::Medium
            },
            (HeightBand::Tall, _) => StartupProfile::Large,
        }
    }
}

/// One window placed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupWindow {
    pub app: String,
    pub x: i32,
    pub y: i32,
    pub z_index: u64,
    /// Size override; the registry default is used otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl StartupWindow {
    fn at(app: &str, x: i32, y: i32, z_index: u64) -> Self {
        Self {
            app: app.to_string(),
            x,
            y,
            z_index,
            size: None,
        }
    }

    fn sized(mut self, w: i32, h: i32) -> Self {
        self.size = Some(Size::new(w, h));
        self
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Requested rect, taking missing size components from `default`.
    pub fn rect(&self, default: Size) -> Rect {
        Rect::from_parts(self.origin(), self.size.unwrap_or(default))
    }
}

/// The three startup profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupLayouts {
    pub small: Vec<StartupWindow>,
    pub medium: Vec<StartupWindow>,
    pub large: Vec<StartupWindow>,
}

impl StartupLayouts {
    pub fn profile(&self, profile: StartupProfile) -> &[StartupWindow] {
        match profile {
            StartupProfile::Small => &self.small,
            StartupProfile::Medium => &self.medium,
            StartupProfile::Large => &self.large,
        }
    }

    pub fn for_viewport(&self, viewport: Viewport) -> &[StartupWindow] {
        self.profile(StartupBands::classify(viewport).profile())
    }
}

impl Default for StartupLayouts {
    fn default() -> Self {
        Self {
            // 1366x768 .. 1600x900 class desktops
            small: vec![
                StartupWindow::at("projects", 40, 58, 100).sized(440, 560),
                StartupWindow::at("about", 498, 42, 101).sized(455, 610),
                StartupWindow::at("video", 724, 392, 102).sized(386, 274),
                StartupWindow::at("music", 470, 500, 103),
                StartupWindow::at("resume", 840, 56, 104).sized(480, 612),
            ],
            // 1080p class desktops
            medium: vec![
                StartupWindow::at("projects", 110, 82, 100),
                StartupWindow::at("about", 540, 40, 101),
                StartupWindow::at("video", 890, 410, 102),
                StartupWindow::at("music", 710, 650, 103),
                StartupWindow::at("resume", 1260, 64, 104),
            ],
            // 1440p and larger
            large: vec![
                StartupWindow::at("projects", 150, 90, 100),
                StartupWindow::at("about", 558, 37, 101),
                StartupWindow::at("video", 886, 403, 102),
                StartupWindow::at("music", 721, 650, 103),
                StartupWindow::at("resume", 1433, 69, 104),
            ],
        }
    }
}
