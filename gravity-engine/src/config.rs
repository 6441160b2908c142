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
//! Simulation configuration
//!
//! Configuration is a plain struct with builder methods, and can also be
//! loaded from YAML. Every field is optional in YAML and falls back to the
//! defaults below.
//!
//! ```yaml
//! universe_half_extent: 140.0   # root quadtree spans [-140, 140]²
//! softening_length: 100.0
//! theta: 2.0                    # larger approximates more aggressively
//! gravitational_constant: 1.0
//! simulation_time: 30.0         # omit for an unbounded run
//! delta_time: 0.02              # omit to use the host's tick length
//! solver: barnes_hut            # or "exact"
//! integrate_movement: true
//! enable_log: true
//! node_capacity: 1
//! max_depth: 32
//! ```

use crate::error::ConfigError;
use crate::force::{SolverMode, DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_SOFTENING};
use crate::tree::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, DEFAULT_THETA};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default universe half extent in simulation units
pub const DEFAULT_UNIVERSE_HALF_EXTENT: f64 = 140.0;

/// Parameters of a gravity simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Half side length of the square universe centered on the origin
    pub universe_half_extent: f64,
    /// Softening length added in quadrature to squared distances
    ///
    /// Not validated: zero (or any value) is accepted, and zero removes the
    /// singularity guard.
    pub softening_length: f64,
    /// Far-field threshold of the Barnes-Hut criterion
    pub theta: f64,
    /// Gravitational constant
    pub gravitational_constant: f64,
    /// Total simulated time budget; `None` runs forever
    pub simulation_time: Option<f64>,
    /// Fixed tick length; `None` uses the host's delta time
    pub delta_time: Option<f64>,
    /// Solver used when not replaying
    pub solver: SolverMode,
    /// Whether computed accelerations are written back to bodies
    pub integrate_movement: bool,
    /// Whether a diagnostic record is logged every tick
    pub enable_log: bool,
    /// Bodies per quadtree leaf before subdividing
    pub node_capacity: usize,
    /// Depth at which quadtree leaves stop subdividing
    pub max_depth: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            universe_half_extent: DEFAULT_UNIVERSE_HALF_EXTENT,
            softening_length: DEFAULT_SOFTENING,
            theta: DEFAULT_THETA,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            simulation_time: None,
            delta_time: None,
            solver: SolverMode::default(),
            integrate_movement: true,
            enable_log: true,
            node_capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with custom universe size and softening
    pub fn new(universe_half_extent: f64, softening_length: f64) -> Self {
        SimulationConfig {
            universe_half_extent,
            softening_length,
            ..Self::default()
        }
    }

    /// Set the far-field threshold
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set the solver
    pub fn with_solver(mut self, solver: SolverMode) -> Self {
        self.solver = solver;
        self
    }

    /// Limit the total simulated time
    pub fn with_simulation_time(mut self, time: f64) -> Self {
        self.simulation_time = Some(time);
        self
    }

    /// Use a fixed tick length instead of the host's
    pub fn with_delta_time(mut self, dt: f64) -> Self {
        self.delta_time = Some(dt);
        self
    }

    /// Set the gravitational constant
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Set the quadtree leaf capacity
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Set the quadtree depth limit
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable writing accelerations back to bodies
    pub fn with_integrate_movement(mut self, enabled: bool) -> Self {
        self.integrate_movement = enabled;
        self
    }

    /// Enable or disable the per-tick diagnostic record
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_log = enabled;
        self
    }

    /// Check every parameter for usable values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.universe_half_extent > 0.0 && self.universe_half_extent.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "universe_half_extent must be positive and finite, got {}",
                self.universe_half_extent
            )));
        }

        if !(self.theta >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "theta must be non-negative, got {}",
                self.theta
            )));
        }

        if !(self.gravitational_constant >= 0.0 && self.gravitational_constant.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "gravitational_constant must be non-negative and finite, got {}",
                self.gravitational_constant
            )));
        }

        if let Some(time) = self.simulation_time {
            if time.is_nan() {
                return Err(ConfigError::Invalid("simulation_time must not be NaN".to_string()));
            }
        }

        if let Some(dt) = self.delta_time {
            if !(dt > 0.0 && dt.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "delta_time must be positive and finite, got {}",
                    dt
                )));
            }
        }

        if self.node_capacity == 0 {
            return Err(ConfigError::Invalid("node_capacity must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML from a reader
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_yaml_reader(BufReader::new(file))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
