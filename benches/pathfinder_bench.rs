//! Path enumeration performance benchmarks.
//!
//! Benchmarks BFS path enumeration over layered and densely connected call
//! graphs, the shape that dominates reachability query time on large
//! codebases.
//!
//! Run with: cargo bench --bench pathfinder_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use portolan::{find_all_paths, CallGraph};

/// Layered graph: `layers` layers of `width` functions, every function
/// calling every function in the next layer.
fn layered_graph(layers: usize, width: usize) -> CallGraph {
    let mut graph = CallGraph::new();
    for i in 0..width {
        graph.add_edge("entry", &name(0, i));
    }
    for layer in 0..layers {
        for i in 0..width {
            if layer + 1 < layers {
                for j in 0..width {
                    graph.add_edge(&name(layer, i), &name(layer + 1, j));
                }
            } else {
                graph.add_edge(&name(layer, i), "sink");
            }
        }
    }
    graph
}

fn name(layer: usize, i: usize) -> String {
    format!("fn_{}_{}", layer, i)
}

fn benchmark_layered_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered");

    let graph = layered_graph(4, 4);
    group.bench_function("4x4_full_depth", |b| {
        b.iter(|| black_box(find_all_paths(&graph, "entry", "sink", 10)))
    });

    let graph = layered_graph(6, 3);
    group.bench_function("6x3_full_depth", |b| {
        b.iter(|| black_box(find_all_paths(&graph, "entry", "sink", 10)))
    });

    group.finish();
}

fn benchmark_depth_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_bound");

    let graph = layered_graph(8, 3);
    // A tight bound prunes almost everything
    group.bench_function("8x3_depth_3", |b| {
        b.iter(|| black_box(find_all_paths(&graph, "entry", "sink", 3)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_layered_enumeration, benchmark_depth_bound);
criterion_main!(benches);
