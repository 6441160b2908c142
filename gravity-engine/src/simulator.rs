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
//! Per-tick simulation stepper
//!
//! The [`Simulator`] owns the body registry, the quadtree and the force
//! model. Each call to [`step`](Simulator::step) writes a fresh acceleration
//! to every live body, using one of three modes:
//!
//! - **Barnes-Hut**: the tree is cleared, rebuilt from the live bodies and
//!   queried once per body
//! - **Exact**: every pair of live bodies interacts
//! - **Replay**: recorded accelerations are handed out instead of computed
//!
//! Integrating accelerations into velocities and positions is left to the
//! host, which reads and writes bodies between ticks.
//!
//! # Example
//!
//! ```rust
//! use gravity_engine::{Body, SimulationConfig, Simulator, TickMode, Vec2};
//!
//! let config = SimulationConfig::new(10.0, 0.0).with_logging(false);
//! let mut sim = Simulator::new(config).unwrap();
//! sim.add_body(Body::new(Vec2::new(0.0, 0.0), 1.0));
//! sim.add_body(Body::new(Vec2::new(1.0, 0.0), 1.0));
//!
//! let report = sim.step(0.02);
//! assert_eq!(report.mode, TickMode::BarnesHut);
//! assert_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
//! ```

use crate::body::{Body, BodyId, BodyRegistry, Snapshot};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, TraceError};
use crate::force::{exact_accelerations, tree_accelerations, GravityModel, SolverMode};
use crate::math::{self, Vec2};
use crate::replay::{ReplayEngine, ReplayTrace, TraceRecorder};
use crate::tree::{BoundingRegion, QuadTree};
use std::fmt;
use std::path::Path;

/// How a tick's accelerations were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// The time budget ran out; bodies were brought to rest
    Frozen,
    /// Recorded accelerations were handed out
    Replay,
    /// Tree-approximated forces
    BarnesHut,
    /// Pairwise forces
    Exact,
}

impl fmt::Display for TickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickMode::Frozen => write!(f, "frozen"),
            TickMode::Replay => write!(f, "replay"),
            TickMode::BarnesHut => write!(f, "barnes-hut"),
            TickMode::Exact => write!(f, "exact"),
        }
    }
}

/// Diagnostics of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// How accelerations were produced
    pub mode: TickMode,
    /// Tick length used for the time budget
    pub delta_time: f64,
    /// Live bodies at the time of the tick
    pub live_bodies: usize,
    /// Force law evaluations during the tick
    pub interactions: u64,
    /// Quadtree nodes in use (Barnes-Hut ticks only)
    pub tree_nodes: usize,
    /// Bodies that received a non-finite acceleration
    pub non_finite: usize,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: mode {}; bodies {}; interactions {}",
            self.tick, self.mode, self.live_bodies, self.interactions
        )?;
        if self.tree_nodes > 0 {
            write!(f, "; nodes {}", self.tree_nodes)?;
        }
        Ok(())
    }
}

/// Single owner of a gravity simulation
pub struct Simulator {
    config: SimulationConfig,
    registry: BodyRegistry,
    tree: QuadTree,
    model: GravityModel,
    replay: Option<ReplayEngine>,
    recorder: Option<TraceRecorder>,
    remaining_time: f64,
    ticks: u64,
}

impl Simulator {
    /// Create a simulator with no bodies
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = BoundingRegion::centered(config.universe_half_extent);
        let tree = QuadTree::with_capacity(bounds, config.node_capacity)
            .with_max_depth(config.max_depth)
            .with_theta(config.theta);
        let model = GravityModel::new(config.softening_length)
            .with_gravitational_constant(config.gravitational_constant);

        Ok(Simulator {
            remaining_time: config.simulation_time.unwrap_or(f64::INFINITY),
            config,
            registry: BodyRegistry::new(),
            tree,
            model,
            replay: None,
            recorder: None,
            ticks: 0,
        })
    }

    /// Advance one tick
    ///
    /// `host_dt` is used for the time budget unless the configuration fixes
    /// a delta time. A tick length that is not positive and finite is
    /// treated as a pause: forces are still computed, but no simulated time
    /// is used, replay does not advance and nothing is recorded.
    pub fn step(&mut self, host_dt: f64) -> TickReport {
        let mut delta_time = self.config.delta_time.unwrap_or(host_dt);
        self.ticks += 1;
        let paused = !(delta_time > 0.0 && delta_time.is_finite());
        if paused {
            log::warn!(
                "Tick {}: ignoring tick length {}, no simulated time used",
                self.ticks,
                delta_time
            );
            delta_time = 0.0;
        }
        self.model.reset_interactions();

        let mut report = TickReport {
            tick: self.ticks,
            mode: TickMode::Frozen,
            delta_time,
            live_bodies: self.registry.live_count(),
            interactions: 0,
            tree_nodes: 0,
            non_finite: 0,
        };

        if self.remaining_time <= 0.0 {
            for body in self.registry.live_mut() {
                body.freeze();
            }
            log::trace!("Tick {} frozen, simulation time exhausted", self.ticks);
            return report;
        }
        self.remaining_time -= delta_time;

        if let Some(engine) = self.replay.as_mut() {
            if !paused {
                engine.apply(&mut self.registry);
            }
            report.mode = TickMode::Replay;
        } else {
            report.mode = match self.config.solver {
                SolverMode::BarnesHut => {
                    self.rebuild_tree();
                    report.tree_nodes = self.tree.node_count();
                    if self.config.integrate_movement {
                        let accelerations =
                            tree_accelerations(&self.model, &self.tree, self.registry.bodies());
                        report.non_finite = self.write_accelerations(accelerations);
                    }
                    TickMode::BarnesHut
                }
                SolverMode::Exact => {
                    if self.config.integrate_movement {
                        let accelerations =
                            exact_accelerations(&self.model, self.registry.bodies());
                        report.non_finite = self.write_accelerations(accelerations);
                    }
                    TickMode::Exact
                }
            };

            // Only ticks that computed fresh accelerations replay correctly
            if self.config.integrate_movement && !paused {
                if let Some(recorder) = self.recorder.as_mut() {
                    recorder.record_tick(&self.registry, delta_time);
                }
            }
        }

        report.interactions = self.model.interactions();

        if report.non_finite > 0 {
            log::warn!(
                "Tick {}: {} bodies received a non-finite acceleration (softening {})",
                self.ticks,
                report.non_finite,
                self.model.softening()
            );
        }
        if self.config.enable_log {
            log::info!("{}", report);
        }

        report
    }

    fn rebuild_tree(&mut self) {
        self.tree.clear();
        let inserted = self.tree.add_all(self.registry.bodies());
        log::debug!(
            "Tree rebuilt: {} bodies, {} nodes, depth {}, slot reuse {:.1}%",
            inserted,
            self.tree.node_count(),
            self.tree.depth(),
            self.tree.arena_stats().reuse_rate()
        );
    }

    /// Write index-aligned accelerations to live bodies, returning how many
    /// were non-finite
    fn write_accelerations(&mut self, accelerations: Vec<Vec2>) -> usize {
        let mut non_finite = 0;
        for (body, acceleration) in self.registry.bodies_mut().iter_mut().zip(accelerations) {
            if !body.is_live() {
                continue;
            }
            if !math::is_finite(&acceleration) {
                non_finite += 1;
            }
            body.acceleration = acceleration;
        }
        non_finite
    }

    /// Remove every body that is no longer live
    ///
    /// Returns the number of bodies removed.
    pub fn cleanup(&mut self) -> usize {
        self.registry.remove_dead()
    }

    /// Add a body, returning its id
    ///
    /// Bodies outside the universe are accepted; they take no part in the
    /// tree but still interact in exact mode.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.registry.add(body)
    }

    /// All bodies in registry order
    pub fn bodies(&self) -> &[Body] {
        self.registry.bodies()
    }

    /// Mutable access for the host integrator
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        self.registry.bodies_mut()
    }

    /// Look up a body by id
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.registry.get(id)
    }

    /// Look up a body by id for mutation
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.registry.get_mut(id)
    }

    /// The body registry
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Immutable view of the live bodies for renderers
    pub fn snapshot(&self) -> Snapshot {
        self.registry.snapshot()
    }

    /// The quadtree as built on the last Barnes-Hut tick
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    /// The force model
    pub fn model(&self) -> &GravityModel {
        &self.model
    }

    /// The active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Force law evaluations during the last tick
    pub fn interactions(&self) -> u64 {
        self.model.interactions()
    }

    /// Simulated time left in the budget (infinite when unbounded)
    pub fn remaining_time(&self) -> f64 {
        self.remaining_time
    }

    /// Number of ticks stepped so far
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Switch the solver used outside replay
    pub fn set_solver(&mut self, solver: SolverMode) {
        self.config.solver = solver;
    }

    /// Change the far-field threshold
    ///
    /// # Panics
    ///
    /// Panics if `theta` is negative or NaN.
    pub fn set_theta(&mut self, theta: f64) {
        self.tree.set_theta(theta);
        self.config.theta = theta;
    }

    /// Switch to replaying a trace
    ///
    /// The registry is replaced by the trace's initial bodies and every
    /// following tick hands out recorded accelerations.
    pub fn load_replay(&mut self, trace: ReplayTrace) {
        log::debug!(
            "Loading replay: {} bodies, {} ticks of {}",
            trace.body_count(),
            trace.tick_count(),
            trace.delta_time()
        );
        self.registry.replace_all(trace.initial_bodies());
        self.replay = Some(ReplayEngine::from_trace(trace));
    }

    /// Parse a trace and switch to replaying it
    ///
    /// On malformed input nothing is loaded: the registry is left empty and
    /// replay mode stays on with nothing to hand out.
    pub fn load_replay_str(&mut self, input: &str) -> Result<(), TraceError> {
        let trace = ReplayTrace::parse(input);
        self.finish_replay_load(trace)
    }

    /// Load a trace file and switch to replaying it
    ///
    /// Failure is handled as in [`load_replay_str`](Simulator::load_replay_str).
    pub fn load_replay_file(&mut self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let trace = ReplayTrace::load(path);
        self.finish_replay_load(trace)
    }

    fn finish_replay_load(&mut self, trace: Result<ReplayTrace, TraceError>) -> Result<(), TraceError> {
        match trace {
            Ok(trace) => {
                self.load_replay(trace);
                Ok(())
            }
            Err(err) => {
                log::warn!("Rejected replay trace: {}", err);
                self.registry.clear();
                self.replay = Some(ReplayEngine::default());
                Err(err)
            }
        }
    }

    /// Leave replay mode and go back to computing forces
    pub fn stop_replay(&mut self) {
        self.replay = None;
    }

    /// Whether ticks hand out recorded accelerations
    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    /// Start recording from the current live bodies
    ///
    /// Any recording in progress is discarded.
    pub fn start_recording(&mut self) {
        self.recorder = Some(TraceRecorder::new(&self.registry));
    }

    /// Whether a recording is in progress
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Stop recording and return the trace
    ///
    /// Returns `None` if no recording was started or no tick was recorded.
    pub fn take_recording(&mut self) -> Option<ReplayTrace> {
        self.recorder.take().and_then(TraceRecorder::finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quiet(config: SimulationConfig) -> Simulator {
        Simulator::new(config.with_logging(false)).unwrap()
    }

    fn pair(sim: &mut Simulator) {
        sim.add_body(Body::new(Vec2::new(0.0, 0.0), 1.0).with_velocity(Vec2::new(0.0, 1.0)));
        sim.add_body(Body::new(Vec2::new(1.0, 0.0), 1.0).with_velocity(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig::default().with_node_capacity(0);
        assert!(Simulator::new(config).is_err());
    }

    #[test]
    fn test_barnes_hut_tick() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0));
        pair(&mut sim);

        let report = sim.step(0.1);
        assert_eq!(report.mode, TickMode::BarnesHut);
        assert_eq!(report.tick, 1);
        assert_eq!(report.live_bodies, 2);
        assert_eq!(report.interactions, 2);
        assert_eq!(report.tree_nodes, 5);
        assert_relative_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
        assert_relative_eq!(sim.bodies()[1].acceleration, Vec2::new(-1.0, 0.0));
        assert_eq!(sim.interactions(), 2);
        assert_eq!(sim.tree().body_count(), 2);
    }

    #[test]
    fn test_exact_tick() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0).with_solver(SolverMode::Exact));
        pair(&mut sim);

        let report = sim.step(0.1);
        assert_eq!(report.mode, TickMode::Exact);
        assert_eq!(report.tree_nodes, 0);
        assert_relative_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_fixed_delta_time_overrides_host() {
        let mut sim = quiet(SimulationConfig::default().with_delta_time(0.5));
        let report = sim.step(0.01);
        assert_eq!(report.delta_time, 0.5);
    }

    #[test]
    fn test_budget_freezes_from_second_tick() {
        for solver in [SolverMode::BarnesHut, SolverMode::Exact] {
            let config = SimulationConfig::new(10.0, 0.0)
                .with_solver(solver)
                .with_simulation_time(0.1)
                .with_delta_time(0.1);
            let mut sim = quiet(config);
            pair(&mut sim);

            assert_ne!(sim.step(0.1).mode, TickMode::Frozen);
            assert_ne!(sim.bodies()[0].acceleration, Vec2::zeros());

            for _ in 0..3 {
                let report = sim.step(0.1);
                assert_eq!(report.mode, TickMode::Frozen);
                assert_eq!(report.interactions, 0);
                for body in sim.bodies() {
                    assert_eq!(body.acceleration, Vec2::zeros());
                    assert_eq!(body.velocity, Vec2::zeros());
                }
            }
        }
    }

    #[test]
    fn test_budget_freezes_replay() {
        let config = SimulationConfig::default()
            .with_simulation_time(1.0)
            .with_delta_time(1.0);
        let mut sim = quiet(config);
        sim.load_replay_str("1 5 1  0 0 0 0 2 2 1  1 1 1 1 1 1 1 1 1 1").unwrap();

        assert_eq!(sim.step(1.0).mode, TickMode::Replay);
        assert_eq!(sim.step(1.0).mode, TickMode::Frozen);
        assert_eq!(sim.bodies()[0].acceleration, Vec2::zeros());
        assert_eq!(sim.bodies()[0].velocity, Vec2::zeros());
    }

    #[test]
    fn test_unbounded_budget() {
        let mut sim = quiet(SimulationConfig::default());
        sim.step(1.0);
        assert!(sim.remaining_time().is_infinite());
    }

    #[test]
    fn test_integrate_movement_disabled() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0).with_integrate_movement(false));
        pair(&mut sim);

        let report = sim.step(0.1);
        assert_eq!(report.interactions, 0);
        assert_eq!(sim.tree().body_count(), 2);
        assert_eq!(sim.bodies()[0].acceleration, Vec2::zeros());
    }

    #[test]
    fn test_recording_skips_ticks_without_forces() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0).with_integrate_movement(false));
        pair(&mut sim);

        sim.start_recording();
        sim.step(0.1);
        sim.step(0.1);
        assert!(sim.take_recording().is_none());
    }

    #[test]
    fn test_non_positive_host_dt_is_a_pause() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0).with_simulation_time(1.0));
        pair(&mut sim);
        sim.start_recording();

        for dt in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let report = sim.step(dt);
            assert_eq!(report.mode, TickMode::BarnesHut);
            assert_eq!(report.delta_time, 0.0);
            assert_eq!(sim.remaining_time(), 1.0);
        }
        assert_relative_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
        assert!(sim.take_recording().is_none());

        sim.start_recording();
        sim.step(0.0);
        sim.step(0.5);
        let trace = sim.take_recording().unwrap();
        assert_eq!(trace.delta_time(), 0.5);
        assert_eq!(trace.tick_count(), 1);
        assert_eq!(trace.accelerations().len(), 2);
        assert_eq!(sim.remaining_time(), 0.5);
    }

    #[test]
    fn test_paused_tick_does_not_advance_replay() {
        let mut sim = quiet(SimulationConfig::default());
        sim.load_replay_str("1 2 1  0 0 0 0 0 0 1  1 0  2 0").unwrap();

        sim.step(1.0);
        sim.step(0.0);
        assert_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
        sim.step(1.0);
        assert_eq!(sim.bodies()[0].acceleration, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_dead_bodies_ignored_and_cleaned() {
        let mut sim = quiet(SimulationConfig::new(10.0, 0.0));
        pair(&mut sim);
        let doomed = sim.add_body(Body::new(Vec2::new(0.0, 1.0), 50.0));
        sim.body_mut(doomed).unwrap().explode();

        sim.step(0.1);
        assert_relative_eq!(sim.bodies()[0].acceleration, Vec2::new(1.0, 0.0));
        assert_eq!(sim.snapshot().len(), 2);

        assert_eq!(sim.cleanup(), 1);
        assert_eq!(sim.bodies().len(), 2);
        assert!(sim.body(doomed).is_none());
    }

    #[test]
    fn test_replay_hands_out_vectors_then_stops() {
        let mut sim = quiet(SimulationConfig::default());
        let trace = "2 2 1
            0 0 0 0 0 0 1
            5 5 0 0 0 0 1
            1 0 2 0
            3 0 4 0";
        sim.load_replay_str(trace).unwrap();
        assert!(sim.is_replaying());
        assert_eq!(sim.bodies().len(), 2);

        sim.step(1.0);
        assert_eq!(sim.bodies()[1].acceleration, Vec2::new(2.0, 0.0));
        sim.step(1.0);
        assert_eq!(sim.bodies()[0].acceleration, Vec2::new(3.0, 0.0));
        assert_eq!(sim.bodies()[1].acceleration, Vec2::new(4.0, 0.0));

        let report = sim.step(1.0);
        assert_eq!(report.mode, TickMode::Replay);
        assert_eq!(report.interactions, 0);
        assert_eq!(sim.bodies()[1].acceleration, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_rejected_replay_leaves_registry_empty() {
        let mut sim = quiet(SimulationConfig::default());
        pair(&mut sim);

        let err = sim.load_replay_str("2 1 1 garbage").unwrap_err();
        assert!(matches!(err, TraceError::InvalidNumber { .. }));
        assert!(sim.bodies().is_empty());
        assert!(sim.is_replaying());
        assert_eq!(sim.step(1.0).live_bodies, 0);

        pair(&mut sim);
        let err = sim.load_replay_str("1000000000000000000 1 1 0 0").unwrap_err();
        assert!(matches!(err, TraceError::UnexpectedEof { .. }));
        assert!(sim.bodies().is_empty());
    }

    #[test]
    fn test_recording_replays_identically() {
        let config = SimulationConfig::new(10.0, 0.5).with_delta_time(0.25);
        let mut sim = quiet(config.clone());
        pair(&mut sim);
        sim.add_body(Body::new(Vec2::new(-2.0, 3.0), 4.0));

        sim.start_recording();
        let mut computed = Vec::new();
        for _ in 0..4 {
            sim.step(0.25);
            computed.push(sim.bodies().iter().map(|b| b.acceleration).collect::<Vec<_>>());
        }
        let trace = sim.take_recording().unwrap();
        assert!(!sim.is_recording());
        assert_eq!(trace.body_count(), 3);
        assert_eq!(trace.accelerations().len(), 12);

        let mut replay = quiet(config);
        replay.load_replay_str(&trace.to_string()).unwrap();
        for expected in computed {
            replay.step(0.25);
            let got: Vec<Vec2> = replay.bodies().iter().map(|b| b.acceleration).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_switch_solver_and_theta() {
        let mut sim = quiet(SimulationConfig::default());
        sim.set_solver(SolverMode::Exact);
        sim.set_theta(0.5);
        assert_eq!(sim.config().solver, SolverMode::Exact);
        assert_eq!(sim.tree().theta(), 0.5);
    }

    #[test]
    fn test_report_display() {
        let report = TickReport {
            tick: 3,
            mode: TickMode::BarnesHut,
            delta_time: 0.02,
            live_bodies: 180,
            interactions: 4000,
            tree_nodes: 241,
            non_finite: 0,
        };
        assert_eq!(
            report.to_string(),
            "tick 3: mode barnes-hut; bodies 180; interactions 4000; nodes 241"
        );
    }
}
