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
//! Barnes-Hut accuracy against the exact solver
//!
//! Validates that the tree approximation converges to the pairwise sum as
//! theta shrinks and stays within a small error at moderate theta.

use approx::assert_relative_eq;
use gravity_engine::force::{exact_accelerations, tree_accelerations, GravityModel};
use gravity_engine::tree::{BoundingRegion, QuadTree};
use gravity_engine::{scenario, Body, BodyRegistry, SimulationConfig, Simulator, SolverMode, Vec2};

fn spread_registry(count: usize, seed: u64) -> BodyRegistry {
    let mut registry = BodyRegistry::new();
    for mut body in scenario::ring(count, 10.0, 1.0, seed) {
        // Stretch the unit square over most of the universe
        body.position = body.position * 180.0 - Vec2::new(90.0, 90.0);
        registry.add(body);
    }
    registry
}

/// Summed error magnitude relative to the summed exact magnitude
fn aggregate_error(approx: &[Vec2], exact: &[Vec2]) -> f64 {
    let error: f64 = approx.iter().zip(exact).map(|(a, e)| (a - e).norm()).sum();
    let scale: f64 = exact.iter().map(|e| e.norm()).sum();
    error / scale
}

#[test]
fn test_zero_theta_matches_exact() {
    let registry = spread_registry(150, 11);
    let model = GravityModel::new(1.0);
    let mut tree = QuadTree::new(BoundingRegion::centered(100.0)).with_theta(0.0);
    assert_eq!(tree.add_all(registry.bodies()), 150);

    let approx = tree_accelerations(&model, &tree, registry.bodies());
    let exact = exact_accelerations(&model, registry.bodies());
    for (a, e) in approx.iter().zip(&exact) {
        assert_relative_eq!(*a, *e, epsilon = 1e-12, max_relative = 1e-9);
    }
}

#[test]
fn test_small_theta_is_accurate() {
    let registry = spread_registry(300, 5);
    let model = GravityModel::new(1.0);
    let exact = exact_accelerations(&model, registry.bodies());

    let error_at = |theta: f64| {
        let mut tree = QuadTree::new(BoundingRegion::centered(100.0)).with_theta(theta);
        tree.add_all(registry.bodies());
        aggregate_error(&tree_accelerations(&model, &tree, registry.bodies()), &exact)
    };

    let fine = error_at(0.5);
    let coarse = error_at(4.0);
    assert!(fine < 0.05, "error at theta 0.5 is {}", fine);
    assert!(fine <= coarse, "theta 0.5 error {} above theta 4 error {}", fine, coarse);
}

#[test]
fn test_tree_uses_fewer_interactions() {
    let registry = spread_registry(400, 9);

    let exact_model = GravityModel::new(1.0);
    exact_accelerations(&exact_model, registry.bodies());
    assert_eq!(exact_model.interactions(), 400 * 399);

    let tree_model = GravityModel::new(1.0);
    let mut tree = QuadTree::new(BoundingRegion::centered(100.0)).with_theta(4.0);
    tree.add_all(registry.bodies());
    tree_accelerations(&tree_model, &tree, registry.bodies());
    assert!(tree_model.interactions() < exact_model.interactions());
}

#[test]
fn test_simulator_modes_agree_at_zero_theta() {
    let config = SimulationConfig::new(100.0, 2.0).with_theta(0.0).with_logging(false);
    let mut tree_sim = Simulator::new(config.clone()).unwrap();
    let mut exact_sim = Simulator::new(config.with_solver(SolverMode::Exact)).unwrap();

    for body in spread_registry(60, 3).bodies() {
        let copy = Body::new(body.position, body.mass());
        tree_sim.add_body(copy.clone());
        exact_sim.add_body(copy);
    }

    tree_sim.step(0.01);
    exact_sim.step(0.01);
    for (a, e) in tree_sim.bodies().iter().zip(exact_sim.bodies()) {
        assert_relative_eq!(a.acceleration, e.acceleration, epsilon = 1e-12, max_relative = 1e-9);
    }
}

#[test]
fn test_out_of_universe_body_only_in_exact() {
    let config = SimulationConfig::new(10.0, 0.0).with_logging(false);
    let mut sim = Simulator::new(config).unwrap();
    sim.add_body(Body::new(Vec2::new(0.0, 0.0), 1.0));
    sim.add_body(Body::new(Vec2::new(1.0, 0.0), 1.0));
    sim.add_body(Body::new(Vec2::new(50.0, 0.0), 1000.0));

    sim.step(0.1);
    assert_eq!(sim.tree().body_count(), 2);
    assert_relative_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
    // Still attracted by the whole tree as one pseudo-body
    assert!(sim.bodies()[2].acceleration.x < 0.0);

    sim.set_solver(SolverMode::Exact);
    sim.step(0.1);
    assert!(sim.bodies()[0].acceleration.x > 1.0);
    assert!(sim.bodies()[2].acceleration.x < 0.0);
}
