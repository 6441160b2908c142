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
//! Body registry
//!
//! The registry is the single owner of the simulated bodies. Other
//! components (renderers, debug views) read immutable snapshots published
//! at tick boundaries instead of sharing the mutable list.

use crate::body::{Body, BodyId, PointMass};
use crate::Vec2;
use std::sync::Arc;

/// Read-only view of a body for rendering collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    /// Body id
    pub id: BodyId,
    /// Position at the end of the tick
    pub position: Vec2,
    /// Mass
    pub mass: f64,
}

impl PointMass for BodyView {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

/// Immutable, cheaply clonable list of body views
pub type Snapshot = Arc<[BodyView]>;

/// Owner of all bodies in a simulation
///
/// Registry order is insertion order; replay assigns recorded
/// accelerations in this order.
pub struct BodyRegistry {
    next_id: u64,
    bodies: Vec<Body>,
}

impl BodyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        BodyRegistry {
            next_id: 0,
            bodies: Vec::new(),
        }
    }

    /// Add a body and return its newly assigned id
    pub fn add(&mut self, mut body: Body) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        body.set_id(id);
        self.bodies.push(body);
        id
    }

    /// Remove every body that is no longer live
    ///
    /// Returns the number of bodies removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.bodies.len();
        self.bodies.retain(Body::is_live);
        before - self.bodies.len()
    }

    /// Replace the whole body set, assigning fresh ids
    pub fn replace_all(&mut self, bodies: impl IntoIterator<Item = Body>) {
        self.bodies.clear();
        for body in bodies {
            self.add(body);
        }
    }

    /// Look up a body by id
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    /// Look up a body by id for mutation
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    /// All bodies, live or not, in registry order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to all bodies
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Iterator over live bodies
    pub fn live(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.is_live())
    }

    /// Mutable iterator over live bodies
    pub fn live_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut().filter(|b| b.is_live())
    }

    /// Number of live bodies
    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Number of bodies, live or not
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove all bodies
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Publish an immutable view of the live bodies
    pub fn snapshot(&self) -> Snapshot {
        self.live()
            .map(|b| BodyView {
                id: b.id(),
                position: b.position,
                mass: b.mass(),
            })
            .collect()
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
