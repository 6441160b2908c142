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
//! Recording and replaying simulations
//!
//! A [`ReplayTrace`] holds the initial bodies of a run and the acceleration
//! every live body received on every tick. [`TraceRecorder`] builds one
//! from a running simulation; [`ReplayEngine`] feeds it back tick by tick
//! without computing any forces.

mod engine;
mod recorder;
mod trace;

pub use engine::ReplayEngine;
pub use recorder::TraceRecorder;
pub use trace::{ReplayTrace, TraceBody};
