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
//! Point-mass bodies and the body registry
//!
//! A [`Body`] is a point mass in the simulation plane. The solver reads its
//! position and mass and writes back an acceleration each tick; velocity is
//! carried for the host's integrator and for replay traces.
//!
//! Anything with a position and a mass can be a gravitational source through
//! the [`PointMass`] trait. Bodies implement it, and so do quadtree nodes,
//! which lets the force law treat a cluster of bodies as a single pseudo-body.

mod id;
mod registry;
mod state;

pub use id::BodyId;
pub use registry::{BodyRegistry, BodyView, Snapshot};
pub use state::BodyState;

use crate::Vec2;

/// Read contract shared by bodies and pseudo-bodies
pub trait PointMass {
    /// Position in the simulation plane
    fn position(&self) -> Vec2;

    /// Mass (positive for real bodies, aggregate for pseudo-bodies)
    fn mass(&self) -> f64;
}

/// A point mass taking part in the simulation
///
/// # Examples
///
/// ```
/// use gravity_engine::{Body, Vec2};
///
/// let body = Body::new(Vec2::new(1.0, 2.0), 10.0);
/// assert!(body.is_live());
/// assert_eq!(body.acceleration, Vec2::zeros());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    /// Position in the simulation plane
    pub position: Vec2,
    /// Velocity, owned by the host integrator
    pub velocity: Vec2,
    /// Acceleration written by the solver each tick
    pub acceleration: Vec2,
    mass: f64,
    state: BodyState,
}

impl Body {
    /// Mass given to bodies spawned without an explicit mass
    pub const DEFAULT_MASS: f64 = 100_000.0;

    /// Create a new alive body at rest
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite. Use `try_new` for
    /// fallible construction.
    pub fn new(position: Vec2, mass: f64) -> Self {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        Body {
            id: BodyId::UNASSIGNED,
            position,
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            mass,
            state: BodyState::Alive,
        }
    }

    /// Try to create a new body
    ///
    /// Returns `None` if the mass is not positive and finite.
    pub fn try_new(position: Vec2, mass: f64) -> Option<Self> {
        if mass > 0.0 && mass.is_finite() {
            Some(Body::new(position, mass))
        } else {
            None
        }
    }

    /// Create a body with [`Body::DEFAULT_MASS`]
    pub fn spawn_at(position: Vec2) -> Self {
        Body::new(position, Self::DEFAULT_MASS)
    }

    /// Builder-style velocity setter
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder-style acceleration setter
    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Registry-assigned id ([`BodyId::UNASSIGNED`] until registered)
    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    /// Get the mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Set the mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite.
    pub fn set_mass(&mut self, mass: f64) {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        self.mass = mass;
    }

    /// Current lifecycle state
    pub fn state(&self) -> BodyState {
        self.state
    }

    /// Whether the body takes part in the simulation
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Start leaving the play field
    pub fn leave(&mut self) {
        self.state = self.state.leave();
    }

    /// Start exploding
    pub fn explode(&mut self) {
        self.state = self.state.explode();
    }

    /// Complete a pending leave/explode transition
    pub fn finish_transition(&mut self) {
        self.state = self.state.finish_transition();
    }

    /// Zero acceleration and velocity
    pub fn freeze(&mut self) {
        self.acceleration = Vec2::zeros();
        self.velocity = Vec2::zeros();
    }
}

impl PointMass for Body {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

impl<T: PointMass + ?Sized> PointMass for &T {
    fn position(&self) -> Vec2 {
        (**self).position()
    }

    fn mass(&self) -> f64 {
        (**self).mass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_creation() {
        let body = Body::new(Vec2::new(1.0, -2.0), 5.0);
        assert_eq!(body.position, Vec2::new(1.0, -2.0));
        assert_eq!(body.mass(), 5.0);
        assert_eq!(body.velocity, Vec2::zeros());
        assert!(!body.id().is_assigned());
        assert!(body.is_live());
    }

    #[test]
    fn test_try_new_rejects_bad_mass() {
        assert!(Body::try_new(Vec2::zeros(), 0.0).is_none());
        assert!(Body::try_new(Vec2::zeros(), -1.0).is_none());
        assert!(Body::try_new(Vec2::zeros(), f64::NAN).is_none());
        assert!(Body::try_new(Vec2::zeros(), f64::INFINITY).is_none());
        assert!(Body::try_new(Vec2::zeros(), 1.0).is_some());
    }

    #[test]
    #[should_panic(expected = "Mass must be positive and finite")]
    fn test_zero_mass_panics() {
        Body::new(Vec2::zeros(), 0.0);
    }

    #[test]
    fn test_spawn_uses_default_mass() {
        let body = Body::spawn_at(Vec2::new(3.0, 4.0));
        assert_eq!(body.mass(), Body::DEFAULT_MASS);
    }

    #[test]
    fn test_lifecycle() {
        let mut body = Body::new(Vec2::zeros(), 1.0);
        body.explode();
        assert!(!body.is_live());
        assert_eq!(body.state(), BodyState::Exploding);
        body.leave();
        assert_eq!(body.state(), BodyState::Exploding);
        body.finish_transition();
        assert_eq!(body.state(), BodyState::Exploded);
    }

    #[test]
    fn test_freeze() {
        let mut body = Body::new(Vec2::zeros(), 1.0)
            .with_velocity(Vec2::new(1.0, 1.0))
            .with_acceleration(Vec2::new(2.0, 2.0));
        body.freeze();
        assert_eq!(body.velocity, Vec2::zeros());
        assert_eq!(body.acceleration, Vec2::zeros());
    }

    #[test]
    fn test_point_mass_through_reference() {
        fn mass_of(p: impl PointMass) -> f64 {
            p.mass()
        }
        let body = Body::new(Vec2::zeros(), 7.0);
        assert_eq!(mass_of(&body), 7.0);
    }
}
