//! Benchmarks for the layout engine.
//!
//! Run with: cargo bench -p cellscope-layout

use cellscope_core::{Rect, ViewerId};
use cellscope_layout::{Layout, ViewerGrid, grid_regions, solve_regions};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Fill a fresh grid with `n` viewers through the growth policy.
fn fill_grid(n: u32) -> ViewerGrid {
    let mut grid = ViewerGrid::new(1, 1);
    for raw in 0..n {
        grid = grid.place_viewer(ViewerId::new(raw));
    }
    grid
}

/// Split the leftmost pane repeatedly to the given depth, alternating axes.
fn split_chain(depth: usize) -> Layout {
    let mut layout = Layout::new();
    let mut index = 0;
    for level in 0..depth {
        layout = if level % 2 == 0 {
            layout.vertical_split(index)
        } else {
            layout.horizontal_split(index)
        };
        index = 2 * index + 1;
    }
    layout
}

fn bench_place_viewer(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/place_viewer");

    for n in [4u32, 16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("fill", n), &n, |b, &n| {
            b.iter(|| black_box(fill_grid(n)))
        });
    }

    group.finish();
}

fn bench_grid_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/regions");
    let area = Rect::from_size(1920, 1080);

    for n in [4u32, 16, 64] {
        let grid = fill_grid(n);
        group.bench_with_input(BenchmarkId::new("solve", n), &grid, |b, grid| {
            b.iter(|| black_box(grid_regions(grid, area)))
        });
    }

    group.finish();
}

fn bench_split_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/split_chain");

    for depth in [2usize, 4, 8, 12] {
        group.bench_with_input(BenchmarkId::new("build", depth), &depth, |b, &depth| {
            b.iter(|| black_box(split_chain(depth)))
        });
    }

    group.finish();
}

fn bench_solve_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/solve_regions");
    let area = Rect::from_size(1920, 1080);

    for depth in [2usize, 4, 8, 12] {
        let layout = split_chain(depth);
        group.bench_with_input(BenchmarkId::new("solve", depth), &layout, |b, layout| {
            b.iter(|| black_box(solve_regions(layout, area)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_place_viewer,
    bench_grid_regions,
    bench_split_chain,
    bench_solve_regions
);
criterion_main!(benches);
