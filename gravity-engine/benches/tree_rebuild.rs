// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for quadtree construction
//!
//! Measures the benefit of reusing arena slots across rebuilds over
//! building a fresh tree every tick.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gravity_engine::tree::{BoundingRegion, QuadTree};
use gravity_engine::{scenario, BodyRegistry, Vec2};

fn setup_registry(n_bodies: usize) -> BodyRegistry {
    let mut registry = BodyRegistry::new();
    for mut body in scenario::ring(n_bodies, 1.0, 1.0, 5) {
        body.position = body.position * 200.0 - Vec2::new(100.0, 100.0);
        registry.add(body);
    }
    registry
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_rebuild");
    let bounds = BoundingRegion::centered(140.0);

    for n_bodies in [100, 1000, 10000].iter() {
        let registry = setup_registry(*n_bodies);

        group.bench_with_input(BenchmarkId::new("reused_arena", n_bodies), n_bodies, |b, _| {
            let mut tree = QuadTree::new(bounds);
            b.iter(|| {
                tree.clear();
                black_box(tree.add_all(registry.bodies()))
            });
        });

        group.bench_with_input(BenchmarkId::new("fresh_tree", n_bodies), n_bodies, |b, _| {
            b.iter(|| {
                let mut tree = QuadTree::new(bounds);
                black_box(tree.add_all(registry.bodies()))
            });
        });
    }

    group.finish();
}

fn bench_leaf_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_capacity");
    let registry = setup_registry(5000);
    let bounds = BoundingRegion::centered(140.0);

    for capacity in [1, 4, 16].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), capacity, |b, &capacity| {
            let mut tree = QuadTree::with_capacity(bounds, capacity);
            b.iter(|| {
                tree.clear();
                tree.add_all(registry.bodies());
                black_box(tree.node_count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_leaf_capacity);
criterion_main!(benches);
