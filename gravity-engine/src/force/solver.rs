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
//! Exact and tree-approximated acceleration solvers
//!
//! Both solvers return one acceleration per input body, index-aligned with
//! the input slice. Non-live bodies get a zero entry and are never used as
//! sources.
//!
//! ## Parallel Computation
//!
//! With the `parallel` feature the per-body queries run on the rayon pool.
//! Each query only reads the bodies (and the already built tree), so the
//! result is identical to the sequential path.

use crate::body::Body;
use crate::force::GravityModel;
use crate::tree::QuadTree;
use crate::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which solver computes accelerations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMode {
    /// Quadtree with far-field approximation
    #[default]
    BarnesHut,
    /// Every pairwise interaction, O(n²)
    Exact,
}

impl std::fmt::Display for SolverMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverMode::BarnesHut => write!(f, "barnes-hut"),
            SolverMode::Exact => write!(f, "exact"),
        }
    }
}

/// Exact acceleration of `body` from every other live body
pub fn exact_acceleration(model: &GravityModel, body: &Body, bodies: &[Body]) -> Vec2 {
    let mut total = Vec2::zeros();
    for other in bodies {
        if !other.is_live() || is_same_body(other, body) {
            continue;
        }
        total += model.acceleration(body, other);
    }
    total
}

/// Same slot, or the same registered body
fn is_same_body(a: &Body, b: &Body) -> bool {
    std::ptr::eq(a, b) || (a.id().is_assigned() && a.id() == b.id())
}

/// Exact accelerations for every body, O(n²)
pub fn exact_accelerations(model: &GravityModel, bodies: &[Body]) -> Vec<Vec2> {
    let solve = |body: &Body| {
        if body.is_live() {
            exact_acceleration(model, body, bodies)
        } else {
            Vec2::zeros()
        }
    };

    #[cfg(feature = "parallel")]
    {
        bodies.par_iter().map(solve).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        bodies.iter().map(solve).collect()
    }
}

/// Barnes-Hut accelerations for every body against an already built tree
pub fn tree_accelerations(model: &GravityModel, tree: &QuadTree, bodies: &[Body]) -> Vec<Vec2> {
    let solve = |body: &Body| {
        if body.is_live() {
            tree.calculate_force(body, |source, target| model.acceleration(source, target))
        } else {
            Vec2::zeros()
        }
    };

    #[cfg(feature = "parallel")]
    {
        bodies.par_iter().map(solve).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        bodies.iter().map(solve).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyRegistry;
    use crate::tree::BoundingRegion;
    use approx::assert_relative_eq;

    fn three_bodies() -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        registry.add(Body::new(Vec2::new(0.0, 0.0), 1.0));
        registry.add(Body::new(Vec2::new(1.0, 0.0), 1.0));
        registry.add(Body::new(Vec2::new(0.0, 2.0), 4.0));
        registry
    }

    #[test]
    fn test_exact_sums_all_others() {
        let registry = three_bodies();
        let model = GravityModel::new(0.0);

        let acc = exact_accelerations(&model, registry.bodies());
        assert_eq!(acc.len(), 3);
        // (1, 0) from the unit mass plus 4 * (0, 2) / 8 from the heavy one
        assert_relative_eq!(acc[0], Vec2::new(1.0, 1.0), epsilon = 1e-12);
        assert_eq!(model.interactions(), 6);
    }

    #[test]
    fn test_exact_skips_dead_bodies() {
        let mut registry = three_bodies();
        registry.bodies_mut()[2].explode();
        let model = GravityModel::new(0.0);

        let acc = exact_accelerations(&model, registry.bodies());
        assert_relative_eq!(acc[0], Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(acc[1], Vec2::new(-1.0, 0.0), epsilon = 1e-12);
        assert_eq!(acc[2], Vec2::zeros());
        assert_eq!(model.interactions(), 2);
    }

    #[test]
    fn test_exact_unregistered_bodies() {
        let bodies = vec![
            Body::new(Vec2::new(0.0, 0.0), 1.0),
            Body::new(Vec2::new(1.0, 0.0), 1.0),
        ];
        let model = GravityModel::new(0.0);
        let acc = exact_accelerations(&model, &bodies);
        assert_relative_eq!(acc[0], Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(acc[1], Vec2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_tree_matches_exact_at_zero_theta() {
        let registry = three_bodies();
        let model = GravityModel::new(0.1);
        let mut tree = QuadTree::new(BoundingRegion::centered(10.0)).with_theta(0.0);
        tree.add_all(registry.bodies());

        let approx = tree_accelerations(&model, &tree, registry.bodies());
        let exact = exact_accelerations(&model, registry.bodies());
        for (a, e) in approx.iter().zip(&exact) {
            assert_relative_eq!(*a, *e, epsilon = 1e-12, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_solver_mode_display() {
        assert_eq!(SolverMode::BarnesHut.to_string(), "barnes-hut");
        assert_eq!(SolverMode::Exact.to_string(), "exact");
        assert_eq!(SolverMode::default(), SolverMode::BarnesHut);
    }
}
