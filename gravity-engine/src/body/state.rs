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
//! Body lifecycle states
//!
//! Only [`BodyState::Alive`] bodies take part in the simulation. The other
//! states exist so a host can run removal effects (leaving the play field,
//! exploding on collision) before the registry prunes the body.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyState {
    /// Taking part in the simulation
    #[default]
    Alive,
    /// Leaving the play field, removal pending
    Leaving,
    /// Left the play field
    Left,
    /// Exploding, removal pending
    Exploding,
    /// Exploded
    Exploded,
}

impl BodyState {
    /// Whether the body takes part in force evaluation
    pub fn is_live(&self) -> bool {
        matches!(self, BodyState::Alive)
    }

    /// State after a leave request; ignored unless alive
    pub fn leave(self) -> Self {
        match self {
            BodyState::Alive => BodyState::Leaving,
            other => other,
        }
    }

    /// State after an explode request; ignored unless alive
    pub fn explode(self) -> Self {
        match self {
            BodyState::Alive => BodyState::Exploding,
            other => other,
        }
    }

    /// Complete a pending transition
    pub fn finish_transition(self) -> Self {
        match self {
            BodyState::Leaving => BodyState::Left,
            BodyState::Exploding => BodyState::Exploded,
            other => other,
        }
    }
}
