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
//! Expanding Ring Example
//!
//! Spawns a cluster of bodies flung outwards along a ring of directions and
//! steps it with the Barnes-Hut or exact solver. Integration is a simple
//! semi-implicit Euler step done here, outside the engine.
//!
//! # Running
//!
//! ```bash
//! # 180 bodies, Barnes-Hut, per-tick diagnostics
//! RUST_LOG=info cargo run --example galaxy_ring --release
//!
//! # Exact solver with more bodies
//! cargo run --example galaxy_ring --release -- --solver exact --bodies 1000
//!
//! # Parameters from a YAML file, recording a trace
//! cargo run --example galaxy_ring --release -- --config sim.yaml --record ring.trace
//! ```

use gravity_engine::{scenario, SimulationConfig, Simulator, SolverMode, TickMode};
use std::process::ExitCode;

/// Fixed host tick, as a 50 Hz physics loop would use
const HOST_DT: f64 = 0.02;

struct DemoOptions {
    config: SimulationConfig,
    bodies: usize,
    ticks: usize,
    seed: u64,
    record: Option<String>,
}

fn parse_args() -> Result<DemoOptions, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut options = DemoOptions {
        config: SimulationConfig::default(),
        bodies: 180,
        ticks: 500,
        seed: 1,
        record: None,
    };

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).ok_or_else(|| format!("{} requires an argument", args[i]))?;
        match args[i].as_str() {
            "--config" => {
                options.config = SimulationConfig::load(value).map_err(|e| e.to_string())?;
            }
            "--solver" => {
                options.config.solver = match value.as_str() {
                    "exact" => SolverMode::Exact,
                    "barnes-hut" | "barnes_hut" => SolverMode::BarnesHut,
                    other => return Err(format!("unknown solver '{}'", other)),
                };
            }
            "--theta" => {
                options.config.theta = value.parse().map_err(|_| format!("invalid theta '{}'", value))?;
            }
            "--bodies" => {
                options.bodies = value.parse().map_err(|_| format!("invalid body count '{}'", value))?;
            }
            "--ticks" => {
                options.ticks = value.parse().map_err(|_| format!("invalid tick count '{}'", value))?;
            }
            "--seed" => {
                options.seed = value.parse().map_err(|_| format!("invalid seed '{}'", value))?;
            }
            "--record" => options.record = Some(value.clone()),
            other => return Err(format!("unknown option '{}'", other)),
        }
        i += 2;
    }

    Ok(options)
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Simulator::new(options.config.clone()) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    for body in scenario::ring(options.bodies, 100_000.0, 100.0, options.seed) {
        sim.add_body(body);
    }

    println!("==========================================================");
    println!("       Expanding Ring");
    println!("==========================================================");
    println!("  Solver:    {}", options.config.solver);
    println!("  Theta:     {}", options.config.theta);
    println!("  Softening: {}", options.config.softening_length);
    println!("  Bodies:    {}", options.bodies);
    println!("  Ticks:     {}", options.ticks);
    println!();

    if options.record.is_some() {
        sim.start_recording();
    }

    let mut total_interactions = 0u64;
    let started = std::time::Instant::now();

    for _ in 0..options.ticks {
        let report = sim.step(HOST_DT);
        total_interactions += report.interactions;
        if report.mode == TickMode::Frozen {
            println!("Simulation time exhausted after {} ticks", report.tick - 1);
            break;
        }

        for body in sim.bodies_mut() {
            if body.is_live() {
                body.velocity += body.acceleration * HOST_DT;
                body.position += body.velocity * HOST_DT;
            }
        }
        sim.cleanup();
    }

    let elapsed = started.elapsed();
    let ticks = sim.tick_count().max(1);
    println!("Ran {} ticks in {:.2?}", sim.tick_count(), elapsed);
    println!("  Interactions per tick: {}", total_interactions / ticks);
    println!(
        "  Pairwise equivalent:   {}",
        options.bodies.saturating_mul(options.bodies.saturating_sub(1))
    );
    println!("  Tree nodes (last):     {}", sim.tree().node_count());
    println!("  Tree depth (last):     {}", sim.tree().depth());

    let snapshot = sim.snapshot();
    let inside = snapshot
        .iter()
        .filter(|b| sim.tree().bounds().contains_point(b.position))
        .count();
    println!("  Bodies inside universe: {} of {}", inside, snapshot.len());

    if let Some(path) = options.record {
        match sim.take_recording() {
            Some(trace) => match trace.save(&path) {
                Ok(()) => println!("Recorded {} ticks to {}", trace.tick_count(), path),
                Err(err) => {
                    eprintln!("Error: failed to write {}: {}", path, err);
                    return ExitCode::FAILURE;
                }
            },
            None => println!("Nothing recorded"),
        }
    }

    ExitCode::SUCCESS
}
