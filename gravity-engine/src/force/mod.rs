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
//! Force computation
//!
//! - [`GravityModel`]: the softened pairwise force law and interaction counter
//! - [`exact_accelerations`]: the O(n²) reference solver
//! - [`tree_accelerations`]: Barnes-Hut queries against a built [`QuadTree`](crate::tree::QuadTree)

mod gravity;
mod solver;

pub use gravity::{GravityModel, DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_SOFTENING};
pub use solver::{exact_acceleration, exact_accelerations, tree_accelerations, SolverMode};
