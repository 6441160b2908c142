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
//! Softened Newtonian gravity
//!
//! The acceleration of a source body towards a target is
//!
//! **a = G * m_t * r / (|r|² + ε²)^(3/2)**
//!
//! Where:
//! - r is the vector from the source to the target
//! - m_t is the target's mass
//! - ε is the softening length
//! - G is the gravitational constant (1 in simulation units)
//!
//! The target can be a real body or a quadtree node acting as a
//! pseudo-body; both are read through [`PointMass`].
//!
//! ## Softening
//!
//! ε is added in quadrature to the squared distance so that close
//! encounters produce large but finite accelerations. See:
//! - Dehnen, W. (2001). "Towards optimal softening in three-dimensional N-body codes"
//! - Aarseth, S. J. (2003). "Gravitational N-Body Simulations"
//!
//! A softening length of zero is accepted and removes the guard entirely;
//! two coincident bodies then produce a non-finite acceleration. Keeping
//! such configurations apart is the caller's responsibility.

use crate::body::PointMass;
use crate::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default softening length in simulation units
pub const DEFAULT_SOFTENING: f64 = 100.0;

/// Default gravitational constant in simulation units
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 1.0;

/// Pairwise softened gravity shared by the exact and tree solvers
///
/// Every evaluation bumps an interaction counter. The counter is atomic so
/// per-body queries can run on the rayon pool while sharing one model.
///
/// # Example
///
/// ```rust
/// use gravity_engine::force::GravityModel;
/// use gravity_engine::{Body, Vec2};
///
/// let model = GravityModel::new(0.0);
/// let a = Body::new(Vec2::new(0.0, 0.0), 1.0);
/// let b = Body::new(Vec2::new(1.0, 0.0), 1.0);
///
/// assert_eq!(model.acceleration(&a, &b), Vec2::new(1.0, 0.0));
/// assert_eq!(model.interactions(), 1);
/// ```
#[derive(Debug)]
pub struct GravityModel {
    g_constant: f64,
    softening: f64,
    softening_squared: f64,
    interactions: AtomicU64,
}

impl GravityModel {
    /// Create a model with the given softening length and G = 1
    pub fn new(softening: f64) -> Self {
        GravityModel {
            g_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            softening,
            softening_squared: softening * softening,
            interactions: AtomicU64::new(0),
        }
    }

    /// Builder-style gravitational constant setter
    ///
    /// # Panics
    ///
    /// Panics if `g_constant` is negative or not finite.
    pub fn with_gravitational_constant(mut self, g_constant: f64) -> Self {
        assert!(
            g_constant >= 0.0 && g_constant.is_finite(),
            "Gravitational constant must be non-negative and finite"
        );
        self.g_constant = g_constant;
        self
    }

    /// Set the softening length
    ///
    /// Only the square enters the force law, so the sign is irrelevant.
    /// Zero disables softening.
    pub fn set_softening(&mut self, softening: f64) {
        self.softening = softening;
        self.softening_squared = softening * softening;
    }

    /// Get the softening length
    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// Get the gravitational constant
    pub fn gravitational_constant(&self) -> f64 {
        self.g_constant
    }

    /// Acceleration of `source` caused by `target`
    #[inline]
    pub fn acceleration<S, T>(&self, source: &S, target: &T) -> Vec2
    where
        S: PointMass + ?Sized,
        T: PointMass + ?Sized,
    {
        self.interactions.fetch_add(1, Ordering::Relaxed);

        let r = target.position() - source.position();
        let distance_squared = r.norm_squared() + self.softening_squared;
        let inverse_cube = 1.0 / (distance_squared * distance_squared * distance_squared).sqrt();

        r * (self.g_constant * target.mass() * inverse_cube)
    }

    /// Number of evaluations since the last reset
    pub fn interactions(&self) -> u64 {
        self.interactions.load(Ordering::Relaxed)
    }

    /// Reset the interaction counter, returning the previous value
    pub fn reset_interactions(&self) -> u64 {
        self.interactions.swap(0, Ordering::Relaxed)
    }
}

impl Clone for GravityModel {
    fn clone(&self) -> Self {
        GravityModel {
            g_constant: self.g_constant,
            softening: self.softening,
            softening_squared: self.softening_squared,
            interactions: AtomicU64::new(self.interactions()),
        }
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::new(DEFAULT_SOFTENING)
    }
}
