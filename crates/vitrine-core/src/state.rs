//! Window manager state: the aggregate root every operation mutates.

use indexmap::IndexMap;

use crate::policy::WindowPolicy;
use crate::registry::AppRegistry;
use crate::window::{Window, WindowId};

/// Lowest value `next_z_index` may ever take.
pub const DEFAULT_Z_INDEX_FLOOR: u64 = 103;

/// Exclusive upper bound for stored z-indices. Hosts paint them as CSS
/// `z-index` numbers, which lose integer precision past 2^53.
pub const Z_INDEX_CEILING: u64 = 1 << 53;

/// All open windows, the focus, and the stacking counter.
#[derive(Debug, Clone)]
pub struct State {
    /// Open windows in insertion order.
    pub windows: IndexMap<WindowId, Window>,
    pub focused_window: Option<WindowId>,
    pub next_z_index: u64,
    pub z_index_floor: u64,
}

impl Default for State {
    fn default() -> Self {
        Self::new(DEFAULT_Z_INDEX_FLOOR)
    }
}

impl State {
    pub fn new(z_index_floor: u64) -> Self {
        Self {
            windows: IndexMap::new(),
            focused_window: None,
            next_z_index: z_index_floor,
            z_index_floor,
        }
    }

    /// Hand out the next stacking value.
    pub fn allocate_z_index(&mut self) -> u64 {
        let z = self.next_z_index;
        self.next_z_index = z.saturating_add(1);
        z
    }

    /// Make sure future allocations land above `z`.
    pub fn reserve_z_index(&mut self, z: u64) {
        self.next_z_index = self.next_z_index.max(z.saturating_add(1));
    }

    pub fn z_index_in_use(&self, z: u64) -> bool {
        self.windows.values().any(|w| w.z_index == z)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn find_by_app(&self, app_id: &str) -> Option<&Window> {
        self.windows.values().find(|w| w.app_id == app_id)
    }

    /// Highest-stacked window that is not minimized.
    pub fn top_visible(&self) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Raise `id` to the front and focus it. Minimized or unknown windows are ignored.
    pub fn raise(&mut self, id: WindowId) -> bool {
        let z = self.next_z_index;
        match self.windows.get_mut(&id) {
            Some(window) if window.is_visible() => {
                window.z_index = z;
                self.next_z_index = z.saturating_add(1);
                self.focused_window = Some(id);
                true
            },
            _ => false,
        }
    }

    /// Hand focus to the topmost visible window, or clear it.
    pub fn refocus_top(&mut self) {
        self.focused_window = self.top_visible();
    }

    /// Refocus only if `id` currently holds focus.
    pub fn refocus_if_focused(&mut self, id: WindowId) {
        if self.focused_window == Some(id) {
            self.refocus_top();
        }
    }

    pub fn clear(&mut self) {
        self.windows.clear();
        self.focused_window = None;
    }

    /// Validate core invariants. See `invariants` module.
    pub fn validate_invariants(
        &self,
        registry: &AppRegistry,
        defaults: &WindowPolicy,
    ) -> Result<(), crate::invariants::InvariantError> {
        crate::invariants::validate(self, registry, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::window::WindowMode;

    fn push(state: &mut State, app: &str) -> WindowId {
        let id = WindowId::new();
        let z = state.allocate_z_index();
        state.windows.insert(
            id,
            Window::new(id, app.into(), app.into(), Rect::new(0, 32, 400, 300), z),
        );
        id
    }

    #[test]
    fn test_allocation_is_monotonic() {
        let mut state = State::default();
        assert_eq!(state.allocate_z_index(), 103);
        assert_eq!(state.allocate_z_index(), 104);
        state.reserve_z_index(50);
        assert_eq!(state.allocate_z_index(), 105);
        state.reserve_z_index(200);
        assert_eq!(state.allocate_z_index(), 201);
    }

    #[test]
    fn test_counter_saturates_instead_of_wrapping() {
        let mut state = State::default();
        state.reserve_z_index(u64::MAX);
        assert_eq!(state.next_z_index, u64::MAX);
        assert_eq!(state.allocate_z_index(), u64::MAX);
        assert_eq!(state.next_z_index, u64::MAX);

        let a = push(&mut state, "a");
        assert!(state.raise(a));
        assert_eq!(state.next_z_index, u64::MAX);
    }

    #[test]
    fn test_top_visible_skips_minimized() {
        let mut state = State::default();
        let a = push(&mut state, "a");
        let b = push(&mut state, "b");
        assert_eq!(state.top_visible(), Some(b));

        state.windows[&b].mode = WindowMode::Minimized;
        assert_eq!(state.top_visible(), Some(a));

        state.windows[&a].mode = WindowMode::Minimized;
        assert_eq!(state.top_visible(), None);
    }

    #[test]
    fn test_raise_ignores_minimized() {
        let mut state = State::default();
        let a = push(&mut state, "a");
        let b = push(&mut state, "b");

        assert!(state.raise(a));
        assert_eq!(state.focused_window, Some(a));
        assert!(state.windows[&a].z_index > state.windows[&b].z_index);

        state.windows[&b].mode = WindowMode::Minimized;
        assert!(!state.raise(b));
        assert_eq!(state.focused_window, Some(a));
    }
}
