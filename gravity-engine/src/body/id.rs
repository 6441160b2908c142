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
//! Body identifiers
//!
//! Ids are lightweight handles handed out by the registry. They are never
//! reused within one registry, so a stale id can never alias a newer body.

use std::fmt;

/// Unique identifier for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl BodyId {
    /// Id carried by bodies that have not been registered yet
    pub const UNASSIGNED: BodyId = BodyId(u64::MAX);

    /// Create a new BodyId from a raw u64 value
    pub fn new(id: u64) -> Self {
        BodyId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Check whether this id was handed out by a registry
    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_assigned() {
            write!(f, "Body({})", self.0)
        } else {
            write!(f, "Body(unassigned)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = BodyId::new(42);
        assert_eq!(id.raw(), 42);
        assert!(id.is_assigned());
    }

    #[test]
    fn test_default_is_unassigned() {
        let id = BodyId::default();
        assert!(!id.is_assigned());
        assert_eq!(id.to_string(), "Body(unassigned)");
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(BodyId::new(1), BodyId::new(1));
        assert_ne!(BodyId::new(1), BodyId::new(2));
    }
}
