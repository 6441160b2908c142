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
//! # Gravity Engine
//!
//! A 2D gravitational N-body core computing the acceleration of every live
//! point mass once per tick.
//!
//! ## Features
//!
//! - **Barnes-Hut**: an arena-backed quadtree approximates far-away clusters
//!   as single pseudo-bodies
//! - **Exact**: the O(n²) pairwise sum for reference and small scenes
//! - **Replay**: recorded accelerations are fed back without computing forces
//! - **Parallelization**: optional Rayon integration for per-body force queries
//! - **Configuration**: YAML-loadable parameters with validation
//!
//! ## Example
//!
//! ```rust
//! use gravity_engine::{scenario, SimulationConfig, Simulator};
//!
//! let config = SimulationConfig::default().with_logging(false);
//! let mut sim = Simulator::new(config).unwrap();
//! for body in scenario::ring(64, 1000.0, 10.0, 1) {
//!     sim.add_body(body);
//! }
//!
//! let report = sim.step(0.02);
//! assert_eq!(report.live_bodies, 64);
//!
//! // Integration is up to the host
//! for body in sim.bodies_mut() {
//!     body.velocity += body.acceleration * 0.02;
//!     body.position += body.velocity * 0.02;
//! }
//! ```

#![warn(missing_docs)]

/// Point-mass bodies and the body registry
pub mod body;

/// Simulation configuration
pub mod config;

/// Error types
pub mod error;

/// Force law and solvers
pub mod force;

/// Vector type and helpers
pub mod math;

/// Recording and replaying simulations
pub mod replay;

/// Deterministic starting configurations
pub mod scenario;

/// Per-tick simulation stepper
pub mod simulator;

/// Spatial partitioning
pub mod tree;

pub use body::{Body, BodyId, BodyRegistry, BodyState, PointMass};
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use force::SolverMode;
pub use math::Vec2;
pub use simulator::{Simulator, TickMode, TickReport};
