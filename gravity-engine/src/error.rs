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
//! Error types for gravity-engine.

use thiserror::Error;

/// Errors raised while parsing or loading a replay trace
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading the trace failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The trace ended before a required field
    #[error("unexpected end of trace while reading {expected}")]
    UnexpectedEof {
        /// Field being read
        expected: &'static str,
    },

    /// A token could not be parsed as the expected number
    #[error("invalid {expected}: {token:?}")]
    InvalidNumber {
        /// Offending token
        token: String,
        /// Field being read
        expected: &'static str,
    },

    /// Header values are out of range
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A body record is physically invalid
    #[error("invalid body {index}: {reason}")]
    InvalidBody {
        /// Position of the body in the trace
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Fewer recorded accelerations than the header promises
    #[error("trace truncated: expected {expected} recorded accelerations, found {found}")]
    Truncated {
        /// Vectors promised by the header
        expected: usize,
        /// Vectors present
        found: usize,
    },
}

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be parsed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Reading the configuration failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter is out of range
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Replay trace error
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias defaulting to [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
