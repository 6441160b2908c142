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
//! Plain-text replay traces
//!
//! A trace is written one value or vector per line:
//!
//! ```text
//! bodyCount
//! totalSimulatedTime
//! tickDeltaTime
//! px py                         (four lines per body)
//! ax ay
//! vx vy
//! mass
//! ax ay                         (one line per body per tick)
//! ```
//!
//! The reader only splits on whitespace, so line breaks carry no meaning
//! beyond separating tokens. The header promises
//! `bodyCount * floor(total / dt)` recorded accelerations; fewer is an error,
//! more are kept and replayed.

use crate::body::Body;
use crate::error::TraceError;
use crate::math::Vec2;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// Initial state of one body in a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBody {
    /// Initial position
    pub position: Vec2,
    /// Acceleration at the time of capture
    pub acceleration: Vec2,
    /// Initial velocity
    pub velocity: Vec2,
    /// Mass
    pub mass: f64,
}

impl TraceBody {
    /// Capture a body's current state
    pub fn from_body(body: &Body) -> Self {
        TraceBody {
            position: body.position,
            acceleration: body.acceleration,
            velocity: body.velocity,
            mass: body.mass(),
        }
    }

    /// Build an alive, unregistered body from the captured state
    pub fn to_body(&self) -> Body {
        Body::new(self.position, self.mass)
            .with_velocity(self.velocity)
            .with_acceleration(self.acceleration)
    }
}

/// A recorded simulation: initial bodies plus per-tick accelerations
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayTrace {
    total_time: f64,
    delta_time: f64,
    bodies: Vec<TraceBody>,
    accelerations: Vec<Vec2>,
}

impl ReplayTrace {
    /// Assemble a trace from its parts
    ///
    /// # Panics
    ///
    /// Panics if `delta_time` is not positive and finite, or `total_time`
    /// is negative or not finite.
    pub fn new(
        total_time: f64,
        delta_time: f64,
        bodies: Vec<TraceBody>,
        accelerations: Vec<Vec2>,
    ) -> Self {
        assert!(
            delta_time > 0.0 && delta_time.is_finite(),
            "Delta time must be positive and finite"
        );
        assert!(
            total_time >= 0.0 && total_time.is_finite(),
            "Total time must be non-negative and finite"
        );
        ReplayTrace {
            total_time,
            delta_time,
            bodies,
            accelerations,
        }
    }

    /// Number of bodies at the start of the trace
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Total simulated time covered by the trace
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Tick length the trace was recorded with
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Number of whole ticks the header promises
    pub fn tick_count(&self) -> usize {
        (self.total_time / self.delta_time).floor() as usize
    }

    /// Initial body states
    pub fn bodies(&self) -> &[TraceBody] {
        &self.bodies
    }

    /// Recorded accelerations, flattened tick by tick
    pub fn accelerations(&self) -> &[Vec2] {
        &self.accelerations
    }

    /// Consume the trace, keeping only the recorded accelerations
    pub fn into_accelerations(self) -> Vec<Vec2> {
        self.accelerations
    }

    /// Initial bodies as alive, unregistered [`Body`] values
    pub fn initial_bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.bodies.iter().map(TraceBody::to_body)
    }

    /// Parse a trace from text
    pub fn parse(input: &str) -> Result<Self, TraceError> {
        let mut tokens = Tokens::new(input);

        let body_count = tokens.next_usize("body count")?;
        let total_time = tokens.next_f64("total simulated time")?;
        let delta_time = tokens.next_f64("tick delta time")?;

        if total_time < 0.0 {
            return Err(TraceError::InvalidHeader(format!(
                "total simulated time must be non-negative, got {}",
                total_time
            )));
        }
        if delta_time <= 0.0 {
            return Err(TraceError::InvalidHeader(format!(
                "tick delta time must be positive, got {}",
                delta_time
            )));
        }

        // The header count is untrusted; grow as bodies are actually read
        let mut bodies = Vec::new();
        for index in 0..body_count {
            let position = tokens.next_vec2("body position")?;
            let acceleration = tokens.next_vec2("body acceleration")?;
            let velocity = tokens.next_vec2("body velocity")?;
            let mass = tokens.next_f64("body mass")?;
            if mass <= 0.0 {
                return Err(TraceError::InvalidBody {
                    index,
                    reason: format!("mass must be positive, got {}", mass),
                });
            }
            bodies.push(TraceBody {
                position,
                acceleration,
                velocity,
                mass,
            });
        }

        let mut accelerations = Vec::new();
        while let Some(acceleration) = tokens.try_next_vec2("recorded acceleration")? {
            accelerations.push(acceleration);
        }

        let trace = ReplayTrace {
            total_time,
            delta_time,
            bodies,
            accelerations,
        };

        let expected = trace.body_count().saturating_mul(trace.tick_count());
        if trace.accelerations.len() < expected {
            return Err(TraceError::Truncated {
                expected,
                found: trace.accelerations.len(),
            });
        }

        Ok(trace)
    }

    /// Read and parse a trace
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TraceError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Load a trace file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let input = fs::read_to_string(path)?;
        Self::parse(&input)
    }

    /// Write the trace to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl FromStr for ReplayTrace {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReplayTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.body_count())?;
        writeln!(f, "{}", self.total_time)?;
        writeln!(f, "{}", self.delta_time)?;

        for body in &self.bodies {
            writeln!(f, "{} {}", body.position.x, body.position.y)?;
            writeln!(f, "{} {}", body.acceleration.x, body.acceleration.y)?;
            writeln!(f, "{} {}", body.velocity.x, body.velocity.y)?;
            writeln!(f, "{}", body.mass)?;
        }

        for a in &self.accelerations {
            writeln!(f, "{} {}", a.x, a.y)?;
        }

        Ok(())
    }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Tokens {
            inner: input.split_whitespace(),
        }
    }

    fn next_token(&mut self, expected: &'static str) -> Result<&'a str, TraceError> {
        self.inner
            .next()
            .ok_or(TraceError::UnexpectedEof { expected })
    }

    fn next_usize(&mut self, expected: &'static str) -> Result<usize, TraceError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| TraceError::InvalidNumber {
            token: token.to_string(),
            expected,
        })
    }

    fn next_f64(&mut self, expected: &'static str) -> Result<f64, TraceError> {
        let token = self.next_token(expected)?;
        parse_finite(token, expected)
    }

    fn next_vec2(&mut self, expected: &'static str) -> Result<Vec2, TraceError> {
        let x = self.next_f64(expected)?;
        let y = self.next_f64(expected)?;
        Ok(Vec2::new(x, y))
    }

    /// Next vector, or `None` at a clean end of input
    fn try_next_vec2(&mut self, expected: &'static str) -> Result<Option<Vec2>, TraceError> {
        match self.inner.next() {
            None => Ok(None),
            Some(token) => {
                let x = parse_finite(token, expected)?;
                let y = self.next_f64(expected)?;
                Ok(Some(Vec2::new(x, y)))
            }
        }
    }
}

fn parse_finite(token: &str, expected: &'static str) -> Result<f64, TraceError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TraceError::InvalidNumber {
            token: token.to_string(),
            expected,
        }),
    }
}
