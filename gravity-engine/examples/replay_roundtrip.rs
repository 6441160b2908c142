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
//! Record and Replay Example
//!
//! Runs a short Barnes-Hut simulation while recording it, writes the trace
//! to disk, then replays it in a second simulator and checks that both runs
//! follow the same trajectories.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=debug cargo run --example replay_roundtrip
//! ```

use gravity_engine::{scenario, Body, SimulationConfig, Simulator, TickMode};

const DT: f64 = 0.02;
const TICKS: usize = 200;

fn integrate(bodies: &mut [Body]) {
    for body in bodies.iter_mut().filter(|b| b.is_live()) {
        body.velocity += body.acceleration * DT;
        body.position += body.velocity * DT;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimulationConfig::default()
        .with_delta_time(DT)
        .with_logging(false);

    let mut live = Simulator::new(config.clone())?;
    for body in scenario::ring(120, 100_000.0, 100.0, 2024) {
        live.add_body(body);
    }

    live.start_recording();
    for _ in 0..TICKS {
        live.step(DT);
        integrate(live.bodies_mut());
    }
    let trace = live
        .take_recording()
        .ok_or("no ticks were recorded")?;

    let path = std::env::temp_dir().join("gravity-engine-replay-demo.trace");
    trace.save(&path)?;
    println!(
        "Recorded {} bodies over {} ticks ({} vectors) to {}",
        trace.body_count(),
        trace.tick_count(),
        trace.accelerations().len(),
        path.display()
    );

    let mut replay = Simulator::new(config)?;
    replay.load_replay_file(&path)?;
    for _ in 0..TICKS {
        let report = replay.step(DT);
        assert_eq!(report.mode, TickMode::Replay);
        integrate(replay.bodies_mut());
    }

    let max_drift = live
        .bodies()
        .iter()
        .zip(replay.bodies())
        .map(|(a, b)| (a.position - b.position).norm())
        .fold(0.0, f64::max);
    println!("Largest position difference after replay: {:e}", max_drift);

    std::fs::remove_file(&path)?;
    Ok(())
}
