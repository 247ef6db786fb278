//! Benchmarks for window operations
//!
//! These benchmarks measure the per-gesture cost of the window manager:
//! opening, focusing, dragging, and session round trips.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vitrine_core::config::Config;
use vitrine_core::{OpenOptions, Viewport, WindowId, WindowManager};

fn desktop() -> (WindowManager, Vec<WindowId>) {
    let mut wm = WindowManager::new(Config::default(), Viewport::new(1920, 1080));
    let ids = ["about", "projects", "resume", "extras", "music", "video", "terminal"]
        .iter()
        .filter_map(|app| wm.open(app, OpenOptions::default()).map(|w| w.id))
        .collect();
    (wm, ids)
}

fn window_lifecycle_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_lifecycle");

    group.bench_function("open_close", |b| {
        let mut wm = WindowManager::new(Config::default(), Viewport::new(1920, 1080));
        b.iter(|| {
            let id = wm.open(black_box("about"), OpenOptions::default()).map(|w| w.id);
            if let Some(id) = id {
                wm.close(id);
            }
        });
    });

    group.bench_function("focus_cycle", |b| {
        let (mut wm, ids) = desktop();
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % ids.len();
            black_box(wm.focus(ids[i]))
        });
    });

    group.bench_function("toggle_maximize", |b| {
        let (mut wm, ids) = desktop();
        b.iter(|| black_box(wm.toggle_maximize(ids[0])));
    });

    group.finish();
}

fn window_geometry_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_geometry");

    for step in [1, 50, 500].iter() {
        group.bench_with_input(BenchmarkId::new("drag_move", step), step, |b, &step| {
            let (mut wm, ids) = desktop();
            let mut x = 0;
            b.iter(|| {
                x = (x + step) % 4000;
                black_box(wm.move_to(ids[1], x, x / 2))
            });
        });
    }

    group.bench_function("resize_clamped", |b| {
        let (mut wm, ids) = desktop();
        b.iter(|| black_box(wm.resize_to(ids[6], black_box(10), black_box(10_000))));
    });

    group.finish();
}

fn session_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("snapshot_to_json", |b| {
        let (wm, _) = desktop();
        b.iter(|| black_box(wm.snapshot().to_json()));
    });

    group.bench_function("restore_session_json", |b| {
        let (mut wm, _) = desktop();
        let json = wm.snapshot().to_json().unwrap_or_default();
        b.iter(|| black_box(wm.restore_session_json(&json)));
    });

    group.finish();
}

criterion_group!(
    benches,
    window_lifecycle_benchmark,
    window_geometry_benchmark,
    session_benchmark,
);
criterion_main!(benches);
