use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use smallworlds::graph::{GridGraph, RingGraph};
use smallworlds::{Agent, Graph, World};

const SIZES: [usize; 5] = [20, 40, 60, 80, 100];
const STEPS: usize = 5;

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("walks/ring");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let ring = RingGraph::new(4, 0.0).seed(42).with_nodes(n).with_short_edges();
                let world = World::from_graph(&ring).unwrap().seed(42);
                let mut agent = Agent::builder(&world)
                    .address(&0)
                    .address(&1)
                    .visit_distribution(vec![vec![0.3, 0.7], vec![0.6, 0.4]])
                    .state(&0)
                    .seed(42)
                    .build()
                    .unwrap();
                agent.run(STEPS).unwrap().len()
            });
        });
    }
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("walks/grid");
    group.sample_size(10);
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let grid = GridGraph::new(n, n).seed(42).with_all_nodes().with_short_edges(1);
                let nodes = grid.nodes();
                let world = World::from_graph(&grid).unwrap().seed(42);
                let mut agent = Agent::builder(&world)
                    .address(&nodes[0])
                    .address(&nodes[99])
                    .visit_distribution(vec![vec![0.3, 0.7], vec![0.6, 0.4]])
                    .state(&nodes[0])
                    .seed(42)
                    .build()
                    .unwrap();
                agent.run(STEPS).unwrap().len()
            });
        });
    }
    group.finish();
}

fn bench_k_shortest_paths(c: &mut Criterion) {
    let grid = GridGraph::new(30, 30).seed(42).with_all_nodes().with_short_edges(1);
    let world = World::from_graph(&grid).unwrap();

    c.bench_function("walks/k_shortest_paths_grid30", |b| {
        b.iter(|| world.k_shortest_paths(5, "(0,0)", "(29,29)").unwrap().len());
    });
}

criterion_group!(benches, bench_ring, bench_grid, bench_k_shortest_paths);
criterion_main!(benches);
