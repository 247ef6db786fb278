//! Per-application window policy.
//!
//! A [`WindowPolicy`] is always fully resolved: manager-wide defaults with an
//! app's [`PolicyOverrides`] merged on top, then normalized so that
//! `0 < min <= default <= max` holds component-wise.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, Point, Size};

bitflags! {
    /// Behavior switches of a window policy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Behavior: u8 {
        const RESIZABLE        = 0b0000_0001;
        const MOVABLE          = 0b0000_0010;
        const MINIMIZABLE      = 0b0000_0100;
        const MAXIMIZABLE      = 0b0000_1000;
        const SINGLE_INSTANCE  = 0b0001_0000;
        const PERSIST_GEOMETRY = 0b0010_0000;
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::all()
    }
}

/// Where a freshly opened window is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenStrategy {
    /// Diagonal offset from a base point, one step per open window.
    #[default]
    Cascade,
    /// Exactly at `default_position`.
    Fixed,
    /// Centered in the work area.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub default: Size,
    pub min: Size,
    pub max: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub open_strategy: OpenStrategy,
    /// Clamp the origin so the titlebar can always be grabbed again.
    pub keep_titlebar_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_position: Option<Point>,
}

/// Resolved window policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    pub behavior: Behavior,
    pub size: SizeBounds,
    pub placement: Placement,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            behavior: Behavior::all(),
            size: SizeBounds {
                default: Size::new(560, 420),
                min: Size::new(320, 200),
                max: Size::new(4096, 4096),
            },
            placement: Placement {
                open_strategy: OpenStrategy::Cascade,
                default_position: None,
                keep_titlebar_visible: true,
            },
        }
    }
}

impl WindowPolicy {
    /// Merge `overrides` onto `defaults` and normalize the result.
    pub fn resolve(defaults: &Self, overrides: &PolicyOverrides) -> Self {
        let mut behavior = defaults.behavior;
        for (flag, value) in overrides.behavior.entries() {
            if let Some(enabled) = value {
                behavior.set(flag, enabled);
            }
        }

        let size = SizeBounds {
            default: overrides.size.default.unwrap_or(defaults.size.default),
            min: overrides.size.min.unwrap_or(defaults.size.min),
            max: overrides.size.max.unwrap_or(defaults.size.max),
        };

        let placement = Placement {
            open_strategy: overrides
                .placement
                .open_strategy
                .unwrap_or(defaults.placement.open_strategy),
            default_position: overrides
                .placement
                .default_position
                .or(defaults.placement.default_position),
            keep_titlebar_visible: overrides
                .placement
                .keep_titlebar_visible
                .unwrap_or(defaults.placement.keep_titlebar_visible),
        };

        Self {
            behavior,
            size,
            placement,
        }
        .normalized()
    }

    /// Enforce `0 < min <= default <= max`. Max wins over min, min over default.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let max = Size::new(self.size.max.w.max(1), self.size.max.h.max(1));
        let min = Size::new(
            clamp(self.size.min.w, 1, max.w),
            clamp(self.size.min.h, 1, max.h),
        );
        let default = self.size.default.clamp(min, max);
        self.size = SizeBounds { default, min, max };
        self
    }

    pub const fn allows(&self, flag: Behavior) -> bool {
        self.behavior.contains(flag)
    }

    pub const fn resizable(&self) -> bool {
        self.allows(Behavior::RESIZABLE)
    }

    pub const fn movable(&self) -> bool {
        self.allows(Behavior::MOVABLE)
    }

    pub const fn minimizable(&self) -> bool {
        self.allows(Behavior::MINIMIZABLE)
    }

    pub const fn maximizable(&self) -> bool {
        self.allows(Behavior::MAXIMIZABLE)
    }

    pub const fn single_instance(&self) -> bool {
        self.allows(Behavior::SINGLE_INSTANCE)
    }

    pub const fn persist_geometry(&self) -> bool {
        self.allows(Behavior::PERSIST_GEOMETRY)
    }
}

/// Optional per-app policy fields, as written in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyOverrides {
    pub behavior: BehaviorOverrides,
    pub size: SizeOverrides,
    pub placement: PlacementOverrides,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Size>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_instance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_geometry: Option<bool>,
}

impl BehaviorOverrides {
    const fn entries(&self) -> [(Behavior, Option<bool>); 6] {
        [
            (Behavior::RESIZABLE, self.resizable),
            (Behavior::MOVABLE, self.movable),
            (Behavior::MINIMIZABLE, self.minimizable),
            (Behavior::MAXIMIZABLE, self.maximizable),
            (Behavior::SINGLE_INSTANCE, self.single_instance),
            (Behavior::PERSIST_GEOMETRY, self.persist_geometry),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_strategy: Option<OpenStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_titlebar_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_position: Option<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_overrides_is_defaults() {
        let defaults = WindowPolicy::default();
        let resolved = WindowPolicy::resolve(&defaults, &PolicyOverrides::default());
        assert_eq!(resolved, defaults);
    }

    #[test]
    fn test_resolve_merges_behavior_and_placement() {
        let overrides = PolicyOverrides {
            behavior: BehaviorOverrides {
                resizable: Some(false),
                maximizable: Some(false),
                ..Default::default()
            },
            placement: PlacementOverrides {
                open_strategy: Some(OpenStrategy::Fixed),
                default_position: Some(Point::new(672, 580)),
                ..Default::default()
            },
            ..Default::default()
        };
        let policy = WindowPolicy::resolve(&WindowPolicy::default(), &overrides);
        assert!(!policy.resizable());
        assert!(!policy.maximizable());
        assert!(policy.movable());
        assert!(policy.single_instance());
        assert_eq!(policy.placement.open_strategy, OpenStrategy::Fixed);
        assert_eq!(policy.placement.default_position, Some(Point::new(672, 580)));
        assert!(policy.placement.keep_titlebar_visible);
    }

    #[test]
    fn test_inconsistent_sizes_are_normalized() {
        let overrides = PolicyOverrides {
            size: SizeOverrides {
                default: Some(Size::new(10, 9000)),
                min: Some(Size::new(800, -5)),
                max: Some(Size::new(600, 0)),
            },
            ..Default::default()
        };
        let policy = WindowPolicy::resolve(&WindowPolicy::default(), &overrides);
        assert_eq!(policy.size.max, Size::new(600, 1));
        assert_eq!(policy.size.min, Size::new(600, 1));
        assert_eq!(policy.size.default, Size::new(600, 1));
    }

    #[test]
    fn test_default_clamped_between_min_and_max() {
        let overrides = PolicyOverrides {
            size: SizeOverrides {
                default: Some(Size::new(100, 2000)),
                min: Some(Size::new(320, 200)),
                max: Some(Size::new(640, 480)),
            },
            ..Default::default()
        };
        let policy = WindowPolicy::resolve(&WindowPolicy::default(), &overrides);
        assert_eq!(policy.size.default, Size::new(320, 480));
    }
}
