//! Vitrine Core - Renderer-agnostic desktop window manager
//!
//! This crate owns the lifecycle, geometry and stacking order of the windows
//! on a desktop-styled web page, with zero dependencies on any rendering
//! technology.
//!
//! The host page samples its viewport through a [`ViewportProvider`], forwards
//! user input (icon double-clicks, titlebar drags, dock clicks, menu actions)
//! to [`WindowManager`] operations, and repaints from the resulting state.
//! Session persistence goes through [`SessionSnapshot`].
//!
//! # Quick Start
//! ```
//! use vitrine_core::config::Config;
//! use vitrine_core::viewport::Viewport;
//! use vitrine_core::{OpenOptions, WindowManager, WindowMode};
//!
//! let mut wm = WindowManager::new(Config::default(), Viewport::new(1920, 1080));
//!
//! // User double-clicks the "About Me" icon
//! let about = wm.open("about", OpenOptions::default()).map(|w| w.id).unwrap();
//! assert_eq!(wm.focused_window(), Some(about));
//!
//! // ...then hits the green titlebar button
//! assert!(wm.toggle_maximize(about));
//! assert_eq!(wm.window(about).unwrap().mode, WindowMode::Maximized);
//!
//! // Links never become windows
//! assert!(wm.open("github", OpenOptions::default()).is_none());
//! ```

pub mod command;
pub mod config;
pub mod deep_link;
pub mod geometry;
pub mod interaction;
pub mod invariants;
pub mod layout;
pub mod policy;
pub mod registry;
pub mod session;
pub mod startup;
pub mod state;
pub mod viewport;
pub mod window;

// Re-export primary API types at crate root
pub use command::Command;
pub use deep_link::DeepLink;
pub use geometry::{Point, Rect, ResizeHandle, Size};
pub use interaction::PointerTracker;
pub use policy::WindowPolicy;
pub use registry::{AppCategory, AppDescriptor, AppRegistry};
pub use session::{SessionError, SessionSnapshot, WindowRecord};
pub use state::Z_INDEX_CEILING;
pub use viewport::{Viewport, ViewportProvider};
pub use window::{RestoreMode, Window, WindowCapabilities, WindowId, WindowMode};

use std::collections::HashSet;

use tracing::{debug, info, warn};

use config::{Config, PlacementConfig};
use geometry::ResizeEdges;
use startup::StartupLayouts;
use state::State;
use viewport::Chrome;

/// Extra knobs for [`WindowManager::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Place the window here instead of using the placement strategy.
    pub origin: Option<Point>,
    /// Open at this size instead of the policy default.
    pub size: Option<Size>,
    /// Use this stacking value if no other window holds it.
    pub z_index: Option<u64>,
    /// Give the window focus.
    pub focus: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            origin: None,
            size: None,
            z_index: None,
            focus: true,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn at(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub const fn sized(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub const fn z_index(mut self, z: u64) -> Self {
        self.z_index = Some(z);
        self
    }

    #[must_use]
    pub const fn without_focus(mut self) -> Self {
        self.focus = false;
        self
    }
}

/// The desktop window manager.
///
/// Owns all window state. Every operation runs to completion synchronously;
/// "not found" and "not allowed by policy" are silent no-ops reported through
/// the return value, and out-of-range geometry is clamped, never rejected.
pub struct WindowManager {
    state: State,
    registry: AppRegistry,
    defaults: WindowPolicy,
    chrome: Chrome,
    placement: PlacementConfig,
    startup: StartupLayouts,
    viewport: Box<dyn ViewportProvider>,
}

impl WindowManager {
    /// Create a manager from configuration and a viewport source.
    pub fn new(config: Config, viewport: impl ViewportProvider + 'static) -> Self {
        let registry = config.registry();
        Self {
            state: State::new(config.stacking.z_index_floor.min(Z_INDEX_CEILING - 1)),
            registry,
            defaults: config.defaults,
            chrome: config.chrome,
            placement: config.placement,
            startup: config.startup,
            viewport: Box::new(viewport),
        }
    }

    // ── Read access ──────────────────────────────────────────────────

    pub const fn state(&self) -> &State {
        &self.state
    }

    pub const fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// Open windows in insertion order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.state.windows.values()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.state.window(id)
    }

    pub const fn focused_window(&self) -> Option<WindowId> {
        self.state.focused_window
    }

    pub const fn next_z_index(&self) -> u64 {
        self.state.next_z_index
    }

    /// All windows sorted bottom to top.
    pub fn windows_in_paint_order(&self) -> Vec<&Window> {
        let mut windows: Vec<_> = self.windows().collect();
        windows.sort_by_key(|w| w.z_index);
        windows
    }

    /// Non-minimized windows sorted bottom to top.
    pub fn visible_windows(&self) -> Vec<&Window> {
        let mut windows = self.windows_in_paint_order();
        windows.retain(|w| w.is_visible());
        windows
    }

    /// Topmost visible window under a point.
    pub fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        self.windows()
            .filter(|w| w.is_visible() && w.rect.contains(x, y))
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Title shown in the menu bar.
    pub fn focused_window_title(&self) -> Option<&str> {
        self.state
            .focused_window
            .and_then(|id| self.state.window(id))
            .filter(|w| w.is_visible())
            .map(|w| w.title.as_str())
    }

    /// Resolved policy for an app. Unknown apps get the manager defaults.
    pub fn policy_for(&self, app_id: &str) -> WindowPolicy {
        self.registry
            .get(app_id)
            .map_or(self.defaults, |d| d.resolve_policy(&self.defaults))
    }

    /// What the window chrome should offer. All false for unknown windows.
    pub fn capabilities(&self, id: WindowId) -> WindowCapabilities {
        let Some(window) = self.state.window(id) else {
            return WindowCapabilities::default();
        };
        let policy = self.policy_for(&window.app_id);
        WindowCapabilities {
            can_minimize: policy.minimizable(),
            can_maximize: policy.maximizable(),
            can_resize: policy.resizable() && window.is_normal(),
            can_move: policy.movable() && window.is_normal(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Current usable rectangle, re-sampled on every call.
    pub fn work_area(&self) -> Rect {
        self.chrome.work_area(self.viewport())
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Add or replace an application. Windows that no longer fit the new
    /// descriptor (now a link, or extra instances of a single-instance app)
    /// are closed. The rest are refitted to the new policy: forbidden modes
    /// fall back to normal and geometry is re-clamped.
    pub fn register_app(&mut self, descriptor: AppDescriptor) {
        let app_id = descriptor.id.clone();
        let opens_window = descriptor.category.opens_window();
        let single_instance = descriptor.resolve_policy(&self.defaults).single_instance();
        self.registry.insert(descriptor);

        let ids = self.window_ids_of(&app_id);
        let keep = usize::from(opens_window && single_instance);
        let stale: &[WindowId] = if !opens_window {
            &ids
        } else if single_instance && ids.len() > keep {
            &ids[keep..]
        } else {
            &[]
        };
        for &id in stale {
            self.close(id);
        }
        for &id in ids.iter().filter(|id| !stale.contains(id)) {
            self.refit_window(id);
        }
        debug!("register_app: '{}' ({} stale windows closed)", app_id, stale.len());
        self.check("register_app");
    }

    /// Bring one window back in line with its app's current policy.
    fn refit_window(&mut self, id: WindowId) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        let policy = self.policy_for(&window.app_id);
        let (mut mode, mut restore_mode) = (window.mode, window.restore_mode);
        let (mut rect, bounds) = (window.rect, window.restore_bounds);

        if mode == WindowMode::Minimized && !policy.minimizable() {
            mode = restore_mode.unwrap_or_default().into();
            restore_mode = None;
        }
        if !policy.maximizable() {
            if mode == WindowMode::Maximized {
                mode = WindowMode::Normal;
                rect = bounds.unwrap_or(rect);
            } else if restore_mode == Some(RestoreMode::Maximized) {
                restore_mode = Some(RestoreMode::Normal);
                rect = bounds.unwrap_or(rect);
            }
        }

        let (rect, bounds) = match mode {
            WindowMode::Maximized => (
                self.maximized_rect(&policy),
                Some(self.normalize_rect(&policy, bounds.unwrap_or(rect))),
            ),
            WindowMode::Minimized if restore_mode == Some(RestoreMode::Maximized) => {
                (rect, bounds.map(|b| self.normalize_rect(&policy, b)))
            },
            _ => (self.normalize_rect(&policy, rect), None),
        };

        if let Some(window) = self.state.window_mut(id) {
            window.mode = mode;
            window.restore_mode = restore_mode.filter(|_| mode == WindowMode::Minimized);
            window.rect = rect;
            window.restore_bounds = bounds;
        }
    }

    /// Remove an application and close its windows.
    pub fn unregister_app(&mut self, app_id: &str) -> Option<AppDescriptor> {
        let removed = self.registry.remove(app_id)?;
        for id in self.window_ids_of(app_id) {
            self.close(id);
        }
        debug!("unregister_app: '{}'", app_id);
        Some(removed)
    }

    fn window_ids_of(&self, app_id: &str) -> Vec<WindowId> {
        self.windows()
            .filter(|w| w.app_id == app_id)
            .map(|w| w.id)
            .collect()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Open a window for `app_id`.
    ///
    /// Returns `None` for unknown apps and links. Single-instance apps that
    /// already have a window get that window back, restored if minimized.
    pub fn open(&mut self, app_id: &str, options: OpenOptions) -> Option<&Window> {
        let Some(descriptor) = self.registry.windowed(app_id) else {
            debug!("open: '{}' is unknown or not a window app", app_id);
            return None;
        };
        let title = descriptor.title.clone();
        let policy = descriptor.resolve_policy(&self.defaults);

        if policy.single_instance() {
            let existing = self.state.find_by_app(app_id).map(|w| (w.id, w.is_minimized()));
            if let Some((id, minimized)) = existing {
                debug!("open: reusing {} for single-instance app '{}'", id, app_id);
                if minimized {
                    self.restore(id);
                }
                if options.focus {
                    self.focus(id);
                }
                return self.state.window(id);
            }
        }

        let mut rect = self.open_rect(&policy, self.state.windows.len());
        if options.origin.is_some() || options.size.is_some() {
            let requested = Rect::from_parts(
                options.origin.unwrap_or_else(|| rect.origin()),
                options.size.unwrap_or_else(|| rect.size()),
            );
            rect = self.normalize_rect(&policy, requested);
        }

        let z_index = match options.z_index {
            Some(z) if z < Z_INDEX_CEILING && !self.state.z_index_in_use(z) => {
                self.state.reserve_z_index(z);
                z
            },
            _ => self.state.allocate_z_index(),
        };

        let id = WindowId::new();
        self.state.windows.insert(
            id,
            Window::new(id, app_id.to_string(), title, rect, z_index),
        );
        if options.focus {
            self.state.focused_window = Some(id);
        }
        debug!("open: '{}' as {} at {:?} z={}", app_id, id, rect, z_index);

        self.check("open");
        self.state.window(id)
    }

    /// Close a window regardless of its mode.
    pub fn close(&mut self, id: WindowId) -> Option<Window> {
        let Some(window) = self.state.windows.shift_remove(&id) else {
            debug!("close: unknown window {}", id);
            return None;
        };
        self.state.refocus_if_focused(id);
        debug!("close: {} ('{}')", id, window.app_id);
        self.check("close");
        Some(window)
    }

    /// Bring a window to the front and focus it. Minimized windows are ignored.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let raised = self.state.raise(id);
        if !raised {
            debug!("focus: {} is unknown or minimized", id);
        }
        self.check("focus");
        raised
    }

    pub fn minimize(&mut self, id: WindowId) -> bool {
        let Some((policy, mode)) = self.lookup(id, "minimize") else {
            return false;
        };
        if !policy.minimizable() || mode == WindowMode::Minimized {
            debug!("minimize: not allowed for {} in {:?}", id, mode);
            return false;
        }

        if let Some(window) = self.state.window_mut(id) {
            window.restore_mode = Some(if mode == WindowMode::Maximized {
                RestoreMode::Maximized
            } else {
                RestoreMode::Normal
            });
            window.mode = WindowMode::Minimized;
        }
        self.state.refocus_if_focused(id);

        self.check("minimize");
        true
    }

    /// Leave `Minimized` (back to the remembered mode) or `Maximized` (back to normal).
    pub fn restore(&mut self, id: WindowId) -> bool {
        let Some(window) = self.state.window(id) else {
            debug!("restore: unknown window {}", id);
            return false;
        };
        let policy = self.policy_for(&window.app_id);
        let (mode, restore_mode, restore_bounds) =
            (window.mode, window.restore_mode, window.restore_bounds);

        let (next_mode, rect) = match mode {
            WindowMode::Normal => {
                debug!("restore: {} is already normal", id);
                return false;
            },
            WindowMode::Minimized => match restore_mode.unwrap_or_default() {
                // The work area may have changed while minimized.
                RestoreMode::Maximized if policy.maximizable() => {
                    (WindowMode::Maximized, Some(self.maximized_rect(&policy)))
                },
                // Only windows minimized while maximized still hold bounds.
                _ => (
                    WindowMode::Normal,
                    restore_bounds.map(|b| self.normalize_rect(&policy, b)),
                ),
            },
            WindowMode::Maximized => {
                let rect = match restore_bounds {
                    Some(bounds) => self.normalize_rect(&policy, bounds),
                    None => {
                        let index = self.state.windows.get_index_of(&id).unwrap_or_default();
                        self.open_rect(&policy, index)
                    },
                };
                (WindowMode::Normal, Some(rect))
            },
        };

        if let Some(window) = self.state.window_mut(id) {
            window.mode = next_mode;
            window.restore_mode = None;
            if let Some(rect) = rect {
                window.rect = rect;
            }
            if next_mode == WindowMode::Normal {
                window.restore_bounds = None;
            }
        }

        self.check("restore");
        true
    }

    /// Maximize a normal window, or restore a maximized one. Both focus it.
    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        let Some((policy, mode)) = self.lookup(id, "toggle_maximize") else {
            return false;
        };
        if !policy.maximizable() || mode == WindowMode::Minimized {
            debug!("toggle_maximize: not allowed for {} in {:?}", id, mode);
            return false;
        }

        if mode == WindowMode::Maximized {
            self.restore(id);
        } else {
            let rect = self.maximized_rect(&policy);
            if let Some(window) = self.state.window_mut(id) {
                window.restore_bounds = Some(window.rect);
                window.restore_mode = None;
                window.rect = rect;
                window.mode = WindowMode::Maximized;
            }
        }
        self.state.raise(id);

        self.check("toggle_maximize");
        true
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Move a normal window, keeping its titlebar reachable if the policy asks for it.
    pub fn move_to(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        let Some((policy, mode)) = self.lookup(id, "move_to") else {
            return false;
        };
        if !policy.movable() || mode != WindowMode::Normal {
            return false;
        }

        let origin = self.clamp_origin(&policy, Point::new(x, y));
        if let Some(window) = self.state.window_mut(id) {
            window.rect.x = origin.x;
            window.rect.y = origin.y;
        }

        self.check("move_to");
        true
    }

    /// Resize a normal window. The size is clamped to the policy bounds and the work area.
    pub fn resize_to(&mut self, id: WindowId, w: i32, h: i32) -> bool {
        let Some((policy, mode)) = self.lookup(id, "resize_to") else {
            return false;
        };
        if !policy.resizable() || mode != WindowMode::Normal {
            return false;
        }

        let size = self.clamp_size(&policy, Size::new(w, h));
        if let Some(window) = self.state.window_mut(id) {
            window.rect.w = size.w;
            window.rect.h = size.h;
        }

        self.check("resize_to");
        true
    }

    /// Resize from a frame handle dragged `(dx, dy)` away from where the drag began.
    ///
    /// Left/top handles keep the opposite edge anchored after clamping.
    pub fn resize_from_handle(
        &mut self,
        id: WindowId,
        handle: ResizeHandle,
        start: Rect,
        dx: i32,
        dy: i32,
    ) -> bool {
        let Some((policy, mode)) = self.lookup(id, "resize_from_handle") else {
            return false;
        };
        if !policy.resizable() || mode != WindowMode::Normal {
            return false;
        }

        let requested = handle.apply(start, dx, dy);
        let size = self.clamp_size(&policy, requested.size());
        let edges = handle.edges();
        let x = if edges.contains(ResizeEdges::LEFT) {
            start.right() - size.w
        } else {
            start.x
        };
        let y = if edges.contains(ResizeEdges::TOP) {
            start.bottom() - size.h
        } else {
            start.y
        };
        let origin = self.clamp_origin(&policy, Point::new(x, y));

        if let Some(window) = self.state.window_mut(id) {
            window.rect = Rect::from_parts(origin, size);
        }

        self.check("resize_from_handle");
        true
    }

    /// Re-fit every window to the current work area (viewport resize/rotation).
    pub fn relayout(&mut self) -> usize {
        let mut changed = 0;
        for id in self.state.windows.keys().copied().collect::<Vec<_>>() {
            let Some(window) = self.state.window(id) else {
                continue;
            };
            let policy = self.policy_for(&window.app_id);
            let rect = match window.mode {
                WindowMode::Maximized => self.maximized_rect(&policy),
                WindowMode::Normal => self.normalize_rect(&policy, window.rect),
                WindowMode::Minimized => continue,
            };
            if let Some(window) = self.state.window_mut(id) {
                if window.rect != rect {
                    window.rect = rect;
                    changed += 1;
                }
            }
        }
        debug!("relayout: {} windows adjusted", changed);
        self.check("relayout");
        changed
    }

    // ── Bulk operations ──────────────────────────────────────────────

    pub fn close_all(&mut self) {
        self.state.clear();
        self.check("close_all");
    }

    /// Minimize every window that allows it. Returns how many were minimized.
    pub fn minimize_all(&mut self) -> usize {
        let ids: Vec<_> = self.state.windows.keys().copied().collect();
        let count = ids.into_iter().filter(|&id| self.minimize(id)).count();
        self.state.refocus_top();
        self.check("minimize_all");
        count
    }

    /// Restore every minimized window. Returns how many were restored.
    pub fn restore_all(&mut self) -> usize {
        let ids: Vec<_> = self
            .windows()
            .filter(|w| w.is_minimized())
            .map(|w| w.id)
            .collect();
        let count = ids.into_iter().filter(|&id| self.restore(id)).count();
        if self.state.focused_window.is_none() {
            self.state.refocus_top();
        }
        self.check("restore_all");
        count
    }

    /// Arrange visible windows in a grid over the work area. Returns how many were arranged.
    pub fn tile_windows(&mut self) -> usize {
        let ids: Vec<_> = self
            .windows()
            .filter(|w| w.is_visible())
            .map(|w| w.id)
            .collect();
        if ids.is_empty() {
            return 0;
        }

        let cells = layout::tile_cells(self.work_area(), ids.len());
        for (&id, cell) in ids.iter().zip(cells) {
            let Some(window) = self.state.window(id) else {
                continue;
            };
            let policy = self.policy_for(&window.app_id);
            let requested = if policy.resizable() {
                cell
            } else {
                Rect::from_parts(cell.origin(), window.rect.size())
            };
            let rect = self.normalize_rect(&policy, requested);
            if let Some(window) = self.state.window_mut(id) {
                window.demote_to_normal();
                window.rect = rect;
            }
        }

        info!("Tiled {} windows", ids.len());
        self.check("tile_windows");
        ids.len()
    }

    /// Lay every window out along a diagonal, resetting resizable ones to their default size.
    pub fn cascade_windows(&mut self) -> usize {
        let ids: Vec<_> = self.state.windows.keys().copied().collect();
        for (index, &id) in ids.iter().enumerate() {
            let Some(window) = self.state.window(id) else {
                continue;
            };
            let policy = self.policy_for(&window.app_id);
            let base = policy
                .placement
                .default_position
                .unwrap_or(self.placement.base_point);
            let origin = layout::cascade_origin(base, index, self.placement.cascade_step);
            let size = if policy.resizable() {
                policy.size.default
            } else {
                window.rect.size()
            };
            let rect = self.normalize_rect(&policy, Rect::from_parts(origin, size));
            if let Some(window) = self.state.window_mut(id) {
                window.demote_to_normal();
                window.rect = rect;
            }
        }

        info!("Cascaded {} windows", ids.len());
        self.check("cascade_windows");
        ids.len()
    }

    // ── Persistence helpers ──────────────────────────────────────────

    /// Relabel every window, e.g. after a locale change.
    pub fn update_titles(&mut self, mut resolve: impl FnMut(&AppDescriptor) -> String) {
        for window in self.state.windows.values_mut() {
            if let Some(descriptor) = self.registry.get(&window.app_id) {
                window.title = resolve(descriptor);
            }
        }
    }

    /// Set focus without raising. Anything but a visible window clears focus.
    pub fn set_focused(&mut self, id: Option<WindowId>) -> bool {
        let target = id.filter(|&id| self.state.window(id).is_some_and(Window::is_visible));
        self.state.focused_window = target;
        self.check("set_focused");
        target == id
    }

    /// Never below the floor or any z-index in use, never at or past the ceiling.
    pub fn set_next_z_index(&mut self, z: u64) {
        let in_use = self
            .windows()
            .map(|w| w.z_index.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.state.next_z_index = z
            .min(Z_INDEX_CEILING - 1)
            .max(self.state.z_index_floor)
            .max(in_use);
    }

    /// Serialize the state for the persistence collaborator.
    pub fn snapshot(&self) -> SessionSnapshot {
        let windows = self
            .windows()
            .map(|w| WindowRecord::from_window(w, self.policy_for(&w.app_id).persist_geometry()))
            .collect();
        SessionSnapshot::new(windows, self.state.focused_window, self.state.next_z_index)
    }

    /// Replace the state with a normalized copy of a saved session.
    ///
    /// Records for apps that no longer open windows are dropped, geometry is
    /// re-clamped against the current policy and work area, and modes the
    /// policy no longer allows fall back to normal. Repeated z-indices and
    /// any at or past [`Z_INDEX_CEILING`] are reassigned. Returns the number
    /// of windows restored.
    pub fn restore_session(&mut self, snapshot: SessionSnapshot) -> usize {
        self.state = State::new(self.state.z_index_floor);

        let mut seen_ids = HashSet::new();
        let mut single_instance_apps = HashSet::new();
        let mut seen_z = HashSet::new();
        let mut restored: Vec<(Window, Option<u64>)> = Vec::new();

        for record in snapshot.windows {
            let Some(descriptor) = self.registry.windowed(&record.app_id) else {
                debug!("restore_session: dropping window of unknown app '{}'", record.app_id);
                continue;
            };
            let policy = descriptor.resolve_policy(&self.defaults);
            let fallback_title = descriptor.title.clone();

            if !seen_ids.insert(record.id) {
                debug!("restore_session: dropping duplicate {}", record.id);
                continue;
            }
            if policy.single_instance() && !single_instance_apps.insert(record.app_id.clone()) {
                debug!("restore_session: dropping extra instance of '{}'", record.app_id);
                continue;
            }

            let z_index = record
                .z_index
                .filter(|&z| z < Z_INDEX_CEILING && seen_z.insert(z));
            let window = self.normalize_record(record, &policy, fallback_title, restored.len());
            restored.push((window, z_index));
        }

        let highest = restored.iter().filter_map(|(_, z)| *z).max();
        self.state.next_z_index = self
            .state
            .z_index_floor
            .max(Some(snapshot.next_z_index).filter(|&z| z < Z_INDEX_CEILING).unwrap_or(0))
            .max(highest.map_or(0, |z| z + 1));

        let count = restored.len();
        for (mut window, z_index) in restored {
            window.z_index = match z_index {
                Some(z) => z,
                None => self.state.allocate_z_index(),
            };
            self.state.windows.insert(window.id, window);
        }

        self.set_focused(snapshot.focused_window_id);
        info!("Restored {} windows from session", count);
        self.check("restore_session");
        count
    }

    /// Parse and restore persisted JSON. Anything unreadable resets to an empty desktop.
    pub fn restore_session_json(&mut self, raw: &str) -> bool {
        match SessionSnapshot::from_json(raw) {
            Ok(snapshot) => {
                self.restore_session(snapshot);
                true
            },
            Err(e) => {
                warn!("Discarding saved session: {}", e);
                self.reset();
                false
            },
        }
    }

    /// Drop every window and start over from an empty desktop.
    pub fn reset(&mut self) {
        self.state = State::new(self.state.z_index_floor);
    }

    fn normalize_record(
        &self,
        record: WindowRecord,
        policy: &WindowPolicy,
        fallback_title: String,
        index: usize,
    ) -> Window {
        let saved_rect = match record.rect {
            Some(rect) => self.normalize_rect(policy, rect),
            None => self.open_rect(policy, index),
        };
        let restore_bounds = record.restore_bounds.map(|b| self.normalize_rect(policy, b));

        let mode = match record.mode {
            WindowMode::Maximized if !policy.maximizable() => WindowMode::Normal,
            WindowMode::Minimized if !policy.minimizable() => WindowMode::Normal,
            mode => mode,
        };
        let title = if record.title.is_empty() {
            fallback_title
        } else {
            record.title
        };

        let mut window = Window::new(record.id, record.app_id, title, saved_rect, 0);
        window.mode = mode;
        match mode {
            WindowMode::Maximized => {
                window.restore_bounds = Some(restore_bounds.unwrap_or(saved_rect));
                window.rect = self.maximized_rect(policy);
            },
            WindowMode::Minimized => {
                let restore_mode = match record.restore_mode.unwrap_or_default() {
                    RestoreMode::Maximized if policy.maximizable() => RestoreMode::Maximized,
                    _ => RestoreMode::Normal,
                };
                window.restore_mode = Some(restore_mode);
                if restore_mode == RestoreMode::Maximized {
                    window.restore_bounds = restore_bounds;
                }
            },
            WindowMode::Normal => {},
        }
        window
    }

    // ── Host integration ─────────────────────────────────────────────

    /// Open the startup profile matching the current viewport. Returns windows opened.
    pub fn apply_startup_layout(&mut self) -> usize {
        let viewport = self.viewport();
        let entries = self.startup.for_viewport(viewport).to_vec();

        let mut opened = 0;
        for entry in entries {
            let default = self.policy_for(&entry.app).size.default;
            let rect = entry.rect(default);
            let options = OpenOptions::new()
                .at(rect.origin())
                .sized(rect.size())
                .z_index(entry.z_index)
                .without_focus();
            if self.open(&entry.app, options).is_some() {
                opened += 1;
            }
        }
        self.state.refocus_top();

        info!("Startup layout for {}: {} windows", viewport, opened);
        self.check("apply_startup_layout");
        opened
    }

    /// Open and focus what a deep link asks for. Returns whether the link carried anything.
    pub fn apply_deep_link(&mut self, link: &DeepLink) -> bool {
        for app_id in &link.open {
            self.open(app_id, OpenOptions::default());
        }
        if let Some(app_id) = &link.focus {
            if let Some(id) = self.state.find_by_app(app_id).map(|w| w.id) {
                self.focus(id);
            }
        }
        !link.is_empty()
    }

    /// Execute a menu/keyboard command. Returns whether anything happened.
    pub fn exec(&mut self, command: Command) -> bool {
        debug!("exec: {:?}", command);
        let focused = self.state.focused_window;

        match command {
            Command::Open(app_id) => self.open(&app_id, OpenOptions::default()).is_some(),
            Command::Focus(app_id) => self
                .state
                .find_by_app(&app_id)
                .map(|w| w.id)
                .is_some_and(|id| self.focus(id)),
            Command::Close => focused.and_then(|id| self.close(id)).is_some(),
            Command::Minimize => focused.is_some_and(|id| self.minimize(id)),
            Command::Restore => focused.is_some_and(|id| self.restore(id)),
            Command::Maximize => focused.is_some_and(|id| self.toggle_maximize(id)),
            Command::Move(x, y) => focused.is_some_and(|id| self.move_to(id, x, y)),
            Command::Resize(w, h) => focused.is_some_and(|id| self.resize_to(id, w, h)),
            Command::CloseAll => {
                let had_windows = !self.state.windows.is_empty();
                self.close_all();
                had_windows
            },
            Command::MinimizeAll => self.minimize_all() > 0,
            Command::RestoreAll => self.restore_all() > 0,
            Command::Tile => self.tile_windows() > 0,
            Command::Cascade => self.cascade_windows() > 0,
            Command::Unknown(cmd) => {
                warn!("Unknown command: {}", cmd);
                false
            },
        }
    }

    // ── Geometry helpers ─────────────────────────────────────────────

    fn lookup(&self, id: WindowId, op: &str) -> Option<(WindowPolicy, WindowMode)> {
        match self.state.window(id) {
            Some(window) => Some((self.policy_for(&window.app_id), window.mode)),
            None => {
                debug!("{}: unknown window {}", op, id);
                None
            },
        }
    }

    /// Policy maximum capped by the work area.
    fn max_size(&self, policy: &WindowPolicy) -> Size {
        policy
            .size
            .max
            .min(self.work_area().size())
            .max(Size::new(1, 1))
    }

    /// Size clamped to the policy bounds, with the maximum capped by the work area.
    fn clamp_size(&self, policy: &WindowPolicy, size: Size) -> Size {
        let max = self.max_size(policy);
        let min = policy.size.min.min(max).max(Size::new(1, 1));
        size.clamp(min, max)
    }

    fn clamp_origin(&self, policy: &WindowPolicy, origin: Point) -> Point {
        if policy.placement.keep_titlebar_visible {
            self.chrome.clamp_titlebar(self.viewport(), origin)
        } else {
            origin
        }
    }

    fn normalize_rect(&self, policy: &WindowPolicy, rect: Rect) -> Rect {
        Rect::from_parts(
            self.clamp_origin(policy, rect.origin()),
            self.clamp_size(policy, rect.size()),
        )
    }

    /// Largest allowed size, centered in the work area.
    fn maximized_rect(&self, policy: &WindowPolicy) -> Rect {
        let size = self.max_size(policy);
        let origin = self.work_area().centered(size);
        self.normalize_rect(policy, Rect::from_parts(origin, size))
    }

    /// Initial rect for the `index`-th window according to the placement strategy.
    fn open_rect(&self, policy: &WindowPolicy, index: usize) -> Rect {
        let size = self.clamp_size(policy, policy.size.default);
        let base = policy
            .placement
            .default_position
            .unwrap_or(self.placement.base_point);

        let origin = match policy.placement.open_strategy {
            policy::OpenStrategy::Fixed => base,
            policy::OpenStrategy::Center => self.work_area().centered(size),
            policy::OpenStrategy::Cascade => {
                layout::cascade_origin(base, index, self.placement.cascade_step)
            },
        };
        self.normalize_rect(policy, Rect::from_parts(origin, size))
    }

    fn check(&self, op: &str) {
        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants(&self.registry, &self.defaults) {
            warn!("Invariant violation after {}: {}", op, e);
        }
        #[cfg(not(debug_assertions))]
        let _ = op;
    }
}
