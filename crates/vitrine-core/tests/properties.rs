//! Property tests: random gesture sequences never break the manager's invariants.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use vitrine_core::config::Config;
use vitrine_core::policy::WindowPolicy;
use vitrine_core::{OpenOptions, Viewport, WindowId, WindowManager, WindowMode};

const APPS: [&str; 8] = [
    "about", "projects", "resume", "extras", "music", "video", "terminal", "github",
];

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    Close(usize),
    Focus(usize),
    Minimize(usize),
    Restore(usize),
    ToggleMaximize(usize),
    MoveTo(usize, i32, i32),
    ResizeTo(usize, i32, i32),
    Tile,
    Cascade,
    MinimizeAll,
    RestoreAll,
    SessionRoundTrip,
}

#[derive(Debug, Clone)]
enum Step {
    Op(Op),
    /// Resize the browser window, then re-fit.
    Viewport(i32, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..APPS.len()).prop_map(Op::Open),
        1 => (0..8usize).prop_map(Op::Close),
        2 => (0..8usize).prop_map(Op::Focus),
        2 => (0..8usize).prop_map(Op::Minimize),
        2 => (0..8usize).prop_map(Op::Restore),
        2 => (0..8usize).prop_map(Op::ToggleMaximize),
        3 => (0..8usize, -3000..5000i32, -3000..5000i32).prop_map(|(i, x, y)| Op::MoveTo(i, x, y)),
        3 => (0..8usize, -100..5000i32, -100..5000i32).prop_map(|(i, w, h)| Op::ResizeTo(i, w, h)),
        1 => Just(Op::Tile),
        1 => Just(Op::Cascade),
        1 => Just(Op::MinimizeAll),
        1 => Just(Op::RestoreAll),
        1 => Just(Op::SessionRoundTrip),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        9 => op_strategy().prop_map(Step::Op),
        1 => (200..3000i32, 150..2000i32).prop_map(|(w, h)| Step::Viewport(w, h)),
    ]
}

fn nth_window(wm: &WindowManager, index: usize) -> Option<WindowId> {
    let count = wm.windows().count();
    (count > 0).then(|| wm.windows().nth(index % count).map(|w| w.id)).flatten()
}

fn apply(wm: &mut WindowManager, op: &Op) {
    match *op {
        Op::Open(app) => {
            wm.open(APPS[app], OpenOptions::default());
        },
        Op::Close(i) => {
            if let Some(id) = nth_window(wm, i) {
                wm.close(id);
            }
        },
        Op::Focus(i) => {
            if let Some(id) = nth_window(wm, i) {
                wm.focus(id);
            }
        },
        Op::Minimize(i) => {
            if let Some(id) = nth_window(wm, i) {
                wm.minimize(id);
            }
        },
        Op::Restore(i) => {
            if let Some(id) = nth_window(wm, i) {
                wm.restore(id);
            }
        },
        Op::ToggleMaximize(i) => {
            if let Some(id) = nth_window(wm, i) {
                wm.toggle_maximize(id);
            }
        },
        Op::MoveTo(i, x, y) => {
            if let Some(id) = nth_window(wm, i) {
                wm.move_to(id, x, y);
            }
        },
        Op::ResizeTo(i, w, h) => {
            if let Some(id) = nth_window(wm, i) {
                wm.resize_to(id, w, h);
            }
        },
        Op::Tile => {
            wm.tile_windows();
        },
        Op::Cascade => {
            wm.cascade_windows();
        },
        Op::MinimizeAll => {
            wm.minimize_all();
        },
        Op::RestoreAll => {
            wm.restore_all();
        },
        Op::SessionRoundTrip => {
            let json = wm.snapshot().to_json().unwrap();
            assert!(wm.restore_session_json(&json));
        },
    }
}

fn assert_invariants(wm: &WindowManager) {
    let defaults = WindowPolicy::default();
    if let Err(e) = wm.state().validate_invariants(wm.registry(), &defaults) {
        panic!("invariant violated: {e}");
    }
    assert!(wm.next_z_index() >= 103);
}

proptest! {
    #[test]
    fn gestures_keep_invariants_and_geometry(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let viewport = Viewport::new(1440, 900);
        let mut wm = WindowManager::new(Config::default(), viewport);
        let work = wm.work_area();

        for op in &ops {
            let z_before = wm.next_z_index();
            apply(&mut wm, op);
            assert_invariants(&wm);

            if !matches!(op, Op::SessionRoundTrip) {
                prop_assert!(wm.next_z_index() >= z_before);
            }

            for window in wm.windows().filter(|w| w.mode == WindowMode::Normal) {
                let rect = window.rect;
                prop_assert!(rect.x >= 0 && rect.x <= viewport.width - 40, "{:?}", rect);
                prop_assert!(rect.y >= 32 && rect.y <= viewport.height - 60, "{:?}", rect);
                prop_assert!(rect.w >= 1 && rect.w <= work.w, "{:?}", rect);
                prop_assert!(rect.h >= 1 && rect.h <= work.h, "{:?}", rect);
            }
        }
    }

    #[test]
    fn viewport_changes_keep_invariants(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let viewport = Rc::new(Cell::new(Viewport::new(1920, 1080)));
        let mut wm = WindowManager::new(Config::default(), Rc::clone(&viewport));

        for step in &steps {
            match step {
                Step::Op(op) => apply(&mut wm, op),
                Step::Viewport(w, h) => {
                    viewport.set(Viewport::new(*w, *h));
                    wm.relayout();
                },
            }
            assert_invariants(&wm);

            let work = wm.work_area();
            for window in wm.windows().filter(|w| w.mode == WindowMode::Maximized) {
                prop_assert!(window.rect.w <= work.w && window.rect.h <= work.h);
            }
        }
    }
}
