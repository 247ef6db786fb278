//! Invariant validation for the window manager state.
//!
//! Called after every mutating `WindowManager` operation in debug builds.

use std::collections::HashSet;

use crate::geometry::Size;
use crate::policy::WindowPolicy;
use crate::registry::AppRegistry;
use crate::state::State;
use crate::window::WindowMode;

/// Error indicating which invariant was violated.
#[derive(Debug, thiserror::Error)]
pub enum InvariantError {
    #[error("Window {window} references unknown or non-window app '{app_id}'")]
    UnknownApp { window: String, app_id: String },

    #[error("Single-instance app '{0}' has more than one window")]
    DuplicateSingleInstance(String),

    #[error("Focused window {0} does not exist or is minimized")]
    FocusedWindowHidden(String),

    #[error("Window {window} size {w}x{h} outside policy bounds")]
    SizeOutOfBounds { window: String, w: i32, h: i32 },

    #[error("Window {0} holds restore bounds outside a maximized state")]
    StaleRestoreBounds(String),

    #[error("Window {0} has a restore mode but is not minimized")]
    StaleRestoreMode(String),

    #[error("z-index {0} is shared by more than one window")]
    DuplicateZIndex(u64),

    #[error("z-index {z} is not below next_z_index {next}")]
    ZIndexAheadOfCounter { z: u64, next: u64 },
}

/// Validate all invariants. Returns the first violation found.
pub fn validate(
    state: &State,
    registry: &AppRegistry,
    defaults: &WindowPolicy,
) -> Result<(), InvariantError> {
    let mut single_instance_apps = HashSet::new();
    let mut z_indices = HashSet::new();

    for window in state.windows.values() {
        // 1. Every window's app resolves to a window-producing descriptor
        let Some(descriptor) = registry.windowed(&window.app_id) else {
            return Err(InvariantError::UnknownApp {
                window: window.id.to_string(),
                app_id: window.app_id.clone(),
            });
        };
        let policy = descriptor.resolve_policy(defaults);

        // 2. Single-instance apps have at most one window
        if policy.single_instance() && !single_instance_apps.insert(window.app_id.as_str()) {
            return Err(InvariantError::DuplicateSingleInstance(window.app_id.clone()));
        }

        // 4. Normal windows never exceed the policy maximum. The lower bound
        // can legitimately drop below policy.min on a small work area.
        if window.mode == WindowMode::Normal {
            let size = window.rect.size();
            if !size.fits_within(Size::new(1, 1), policy.size.max) {
                return Err(InvariantError::SizeOutOfBounds {
                    window: window.id.to_string(),
                    w: size.w,
                    h: size.h,
                });
            }
        }

        // 5. Restore bounds only while maximized, or minimized on the way back to maximized
        if window.restore_bounds.is_some() {
            let allowed = match window.mode {
                WindowMode::Maximized => true,
                WindowMode::Minimized => {
                    window.restore_mode == Some(crate::window::RestoreMode::Maximized)
                },
                WindowMode::Normal => false,
            };
            if !allowed {
                return Err(InvariantError::StaleRestoreBounds(window.id.to_string()));
            }
        }
        if window.restore_mode.is_some() && window.mode != WindowMode::Minimized {
            return Err(InvariantError::StaleRestoreMode(window.id.to_string()));
        }

        // 6. z-indices are unique and below the counter
        if !z_indices.insert(window.z_index) {
            return Err(InvariantError::DuplicateZIndex(window.z_index));
        }
        if window.z_index >= state.next_z_index {
            return Err(InvariantError::ZIndexAheadOfCounter {
                z: window.z_index,
                next: state.next_z_index,
            });
        }
    }

    // 3. Focus names an existing, visible window
    if let Some(id) = state.focused_window {
        if !state.window(id).is_some_and(|w| w.is_visible()) {
            return Err(InvariantError::FocusedWindowHidden(id.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::registry::{AppCategory, AppDescriptor};
    use crate::window::{Window, WindowId};

    fn registry() -> AppRegistry {
        [
            AppDescriptor::new("about", "About Me", AppCategory::File),
            AppDescriptor::new("github", "GitHub", AppCategory::Link),
        ]
        .into_iter()
        .collect()
    }

    fn add(state: &mut State, app: &str) -> WindowId {
        let id = WindowId::new();
        let z = state.allocate_z_index();
        state.windows.insert(
            id,
            Window::new(id, app.into(), app.into(), Rect::new(120, 60, 560, 420), z),
        );
        id
    }

    #[test]
    fn test_valid_state_passes() {
        let mut state = State::default();
        let id = add(&mut state, "about");
        state.focused_window = Some(id);
        assert!(validate(&state, &registry(), &WindowPolicy::default()).is_ok());
    }

    #[test]
    fn test_link_window_is_rejected() {
        let mut state = State::default();
        add(&mut state, "github");
        assert!(matches!(
            validate(&state, &registry(), &WindowPolicy::default()),
            Err(InvariantError::UnknownApp { .. })
        ));
    }

    #[test]
    fn test_duplicate_single_instance_is_rejected() {
        let mut state = State::default();
        add(&mut state, "about");
        add(&mut state, "about");
        assert!(matches!(
            validate(&state, &registry(), &WindowPolicy::default()),
            Err(InvariantError::DuplicateSingleInstance(_))
        ));
    }

    #[test]
    fn test_focus_on_minimized_is_rejected() {
        let mut state = State::default();
        let id = add(&mut state, "about");
        state.windows[&id].mode = WindowMode::Minimized;
        state.windows[&id].restore_mode = Some(crate::window::RestoreMode::Normal);
        state.focused_window = Some(id);
        assert!(matches!(
            validate(&state, &registry(), &WindowPolicy::default()),
            Err(InvariantError::FocusedWindowHidden(_))
        ));
    }

    #[test]
    fn test_stale_restore_bounds_is_rejected() {
        let mut state = State::default();
        let id = add(&mut state, "about");
        state.windows[&id].restore_bounds = Some(Rect::new(0, 0, 400, 300));
        assert!(matches!(
            validate(&state, &registry(), &WindowPolicy::default()),
            Err(InvariantError::StaleRestoreBounds(_))
        ));
    }
}
