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
//! Deterministic starting configurations
//!
//! Generators take an explicit seed and use a ChaCha stream, so the same
//! arguments always produce the same bodies on every platform.

use crate::body::Body;
use crate::math::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use std::f64::consts::TAU;

/// Bodies in the unit square at the origin, flung outwards along a ring of
/// directions
///
/// Body `i` moves along angle `i / count * 2π`, jittered by up to ±0.25 rad,
/// with a speed uniform in `[0, speed_scale)`. Masses are uniform in
/// `[0.5, 1.5) * base_mass`.
///
/// # Panics
///
/// Panics if `base_mass` is not positive and finite.
///
/// # Example
///
/// ```rust
/// use gravity_engine::scenario;
///
/// let bodies = scenario::ring(180, 1.0, 100.0, 7);
/// assert_eq!(bodies.len(), 180);
/// assert_eq!(bodies, scenario::ring(180, 1.0, 100.0, 7));
/// ```
pub fn ring(count: usize, base_mass: f64, speed_scale: f64, seed: u64) -> Vec<Body> {
    assert!(
        base_mass > 0.0 && base_mass.is_finite(),
        "Base mass must be positive and finite"
    );

    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let angle = (i as f64 / count as f64) * TAU + (rng.gen::<f64>() - 0.5) * 0.5;
            let position = Vec2::new(rng.gen(), rng.gen());
            let speed = speed_scale * rng.gen::<f64>();
            let mass = base_mass * rng.gen_range(0.5..1.5);

            Body::new(position, mass).with_velocity(Vec2::new(angle.cos(), angle.sin()) * speed)
        })
        .collect()
}
