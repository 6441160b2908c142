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
//! Playback of recorded accelerations

use crate::body::BodyRegistry;
use crate::math::Vec2;
use crate::replay::ReplayTrace;

/// Feeds recorded accelerations back to live bodies
///
/// Each call to [`apply`](ReplayEngine::apply) hands the next vector in the
/// buffer to every live body in registry order. Once the buffer runs dry,
/// further calls leave the bodies untouched.
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    buffer: Vec<Vec2>,
    cursor: usize,
}

impl ReplayEngine {
    /// Create an engine over a flat acceleration buffer
    pub fn new(buffer: Vec<Vec2>) -> Self {
        ReplayEngine { buffer, cursor: 0 }
    }

    /// Create an engine over a trace's recorded accelerations
    pub fn from_trace(trace: ReplayTrace) -> Self {
        Self::new(trace.into_accelerations())
    }

    /// Assign the next recorded vector to each live body
    ///
    /// Returns the number of bodies that received a vector.
    pub fn apply(&mut self, registry: &mut BodyRegistry) -> usize {
        let mut assigned = 0;
        for body in registry.live_mut() {
            let Some(acceleration) = self.buffer.get(self.cursor) else {
                break;
            };
            body.acceleration = *acceleration;
            self.cursor += 1;
            assigned += 1;
        }
        assigned
    }

    /// Position of the next vector to hand out
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of vectors not yet handed out
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Whether every recorded vector has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Start over from the first recorded vector
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;

    fn registry_with(count: usize) -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        for i in 0..count {
            registry.add(Body::new(Vec2::new(i as f64, 0.0), 1.0));
        }
        registry
    }

    fn ramp(len: usize) -> Vec<Vec2> {
        (0..len).map(|i| Vec2::new(i as f64, -(i as f64))).collect()
    }

    #[test]
    fn test_assigns_in_registry_order() {
        let mut registry = registry_with(3);
        let mut engine = ReplayEngine::new(ramp(6));

        assert_eq!(engine.apply(&mut registry), 3);
        let acc: Vec<Vec2> = registry.bodies().iter().map(|b| b.acceleration).collect();
        assert_eq!(acc, ramp(3));

        assert_eq!(engine.apply(&mut registry), 3);
        assert_eq!(registry.bodies()[0].acceleration, Vec2::new(3.0, -3.0));
        assert!(engine.is_exhausted());
    }

    #[test]
    fn test_exhausted_is_noop() {
        let mut registry = registry_with(2);
        let mut engine = ReplayEngine::new(ramp(2));
        engine.apply(&mut registry);
        let before: Vec<Vec2> = registry.bodies().iter().map(|b| b.acceleration).collect();

        assert_eq!(engine.apply(&mut registry), 0);
        let after: Vec<Vec2> = registry.bodies().iter().map(|b| b.acceleration).collect();
        assert_eq!(before, after);
        assert_eq!(engine.remaining(), 0);
    }

    #[test]
    fn test_dead_bodies_are_skipped() {
        let mut registry = registry_with(3);
        registry.bodies_mut()[1].leave();
        let mut engine = ReplayEngine::new(ramp(4));

        assert_eq!(engine.apply(&mut registry), 2);
        assert_eq!(registry.bodies()[0].acceleration, Vec2::new(0.0, 0.0));
        assert_eq!(registry.bodies()[1].acceleration, Vec2::zeros());
        assert_eq!(registry.bodies()[2].acceleration, Vec2::new(1.0, -1.0));
        assert_eq!(engine.cursor(), 2);
    }

    #[test]
    fn test_partial_final_tick() {
        let mut registry = registry_with(3);
        let mut engine = ReplayEngine::new(ramp(4));
        engine.apply(&mut registry);
        assert_eq!(engine.apply(&mut registry), 1);
        assert_eq!(registry.bodies()[0].acceleration, Vec2::new(3.0, -3.0));
        assert_eq!(registry.bodies()[1].acceleration, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_rewind() {
        let mut registry = registry_with(1);
        let mut engine = ReplayEngine::new(ramp(1));
        engine.apply(&mut registry);
        engine.rewind();
        assert_eq!(engine.remaining(), 1);
    }
}
