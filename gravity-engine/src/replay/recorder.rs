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
//! Capturing a running simulation as a replay trace

use crate::body::BodyRegistry;
use crate::math::Vec2;
use crate::replay::{ReplayTrace, TraceBody};

/// Records the initial body set and every computed acceleration
///
/// The recorder assumes a stable population: ticks where bodies spawn or
/// die still record one vector per live body, which replays correctly only
/// against the same sequence of population changes.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    initial: Vec<TraceBody>,
    accelerations: Vec<Vec2>,
    delta_time: Option<f64>,
    elapsed: f64,
    ticks: usize,
}

impl TraceRecorder {
    /// Start recording from the registry's current live bodies
    pub fn new(registry: &BodyRegistry) -> Self {
        TraceRecorder {
            initial: registry.live().map(TraceBody::from_body).collect(),
            accelerations: Vec::new(),
            delta_time: None,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Append the accelerations of every live body for one tick
    ///
    /// Ticks whose length is not positive and finite are skipped.
    pub fn record_tick(&mut self, registry: &BodyRegistry, delta_time: f64) {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            log::debug!("Not recording tick of length {}", delta_time);
            return;
        }
        self.delta_time.get_or_insert(delta_time);
        self.elapsed += delta_time;
        self.ticks += 1;
        self.accelerations
            .extend(registry.live().map(|body| body.acceleration));
    }

    /// Number of recorded ticks
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Finish recording
    ///
    /// Returns `None` if no tick was recorded, since the trace's delta time
    /// is taken from the first recorded tick.
    pub fn finish(self) -> Option<ReplayTrace> {
        let delta_time = self.delta_time?;
        Some(ReplayTrace::new(
            self.elapsed,
            delta_time,
            self.initial,
            self.accelerations,
        ))
    }
}
