//! Benchmarks for the depth-first analyses
//!
//! Runs each analysis over generated graphs of growing size to check that
//! runtimes stay linear in |V| + |E|.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sccscope::analysis::{classify_edges, find_sccs, traverse, RootOrder};
use sccscope::generate::generate_seeded;
use sccscope::graph::DirectedGraph;
use sccscope::ui::ExplorerTree;

const SIZES: [usize; 4] = [1000, 4000, 16000, 64000];

fn graphs(density: f64) -> Vec<(usize, DirectedGraph)> {
    SIZES
        .iter()
        .map(|&n| {
            let graph = generate_seeded(n, density, 225).expect("valid density");
            (n, graph)
        })
        .collect()
}

/// Benchmark pre/post numbering
fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");

    for (n, graph) in graphs(1.0) {
        group.throughput(Throughput::Elements((graph.node_count() + graph.edge_count()) as u64));
        group.bench_with_input(BenchmarkId::new("nodes", n), &graph, |b, g| {
            b.iter(|| black_box(traverse(g, &RootOrder::Insertion)));
        });
    }

    group.finish();
}

/// Benchmark the two-pass component decomposition
fn bench_find_sccs(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_sccs");

    for density in [0.5, 2.0] {
        for (n, graph) in graphs(density) {
            group.throughput(Throughput::Elements((graph.node_count() + graph.edge_count()) as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("density_{}", density), n),
                &graph,
                |b, g| {
                    b.iter(|| black_box(find_sccs(g)));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark edge classification against a precomputed forest
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_edges");

    for (n, graph) in graphs(1.0) {
        let forest = traverse(&graph, &RootOrder::Insertion);
        group.bench_with_input(BenchmarkId::new("nodes", n), &(graph, forest), |b, (g, f)| {
            b.iter(|| black_box(classify_edges(g, f).expect("forest matches graph")));
        });
    }

    group.finish();
}

/// Benchmark flattening the explorer tree of a fully expanded forest
fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_flatten");

    for n in [100, 1000, 5000] {
        let graph = generate_seeded(n, 0.5, 225).expect("valid density");
        let forest = traverse(&graph, &RootOrder::Insertion);
        let components = find_sccs(&graph);

        let mut tree = ExplorerTree::from_forest("bench", &forest, &components);
        tree.expand_all();

        group.bench_with_input(BenchmarkId::new("nodes", n), &tree, |b, tree| {
            b.iter(|| black_box(tree.flatten()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_traverse, bench_find_sccs, bench_classify, bench_flatten);
criterion_main!(benches);
