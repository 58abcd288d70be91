//! Tracers and inertial particles in a sheared channel
//!
//! Builds a steady shear flow on a grid, then releases a tracer swarm and an
//! inertial swarm on the same inlet line and compares how fast they leave
//! through the outlet.
//!
//! Run with: cargo run --package planktos --example channel_flow

use std::sync::Arc;

use planktos::props::{COVARIANCE, RESPONSE_TIME};
use planktos::{
    ConfigError, Domain, Environment, FlowField, GridFlow, InertialParticles, Initializer, Swarm,
    SwarmConfig, SwarmError, SwarmId,
};

const LENGTH: f64 = 20.0;
const WIDTH: f64 = 4.0;

/// Horizontal velocity growing linearly across the channel
fn shear_flow() -> Result<GridFlow, ConfigError> {
    let xs = GridFlow::linspace(LENGTH, 21);
    let ys = GridFlow::linspace(WIDTH, 9);

    let mut u = Vec::with_capacity(xs.len() * ys.len());
    let mut v = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for _ in &xs {
            u.push(0.5 + y / WIDTH);
            v.push(0.0);
        }
    }
    GridFlow::steady(vec![xs, ys], vec![u, v])
}

fn inlet(count: usize) -> Initializer {
    let rows = (0..count)
        .map(|i| vec![0.5, WIDTH * (i as f64 + 0.5) / count as f64])
        .collect();
    Initializer::Explicit(rows)
}

fn run() -> Result<(), SwarmError> {
    let flow: Arc<dyn FlowField> = Arc::new(shear_flow()?);
    let mut envir =
        Environment::new(Domain::new(vec![LENGTH, WIDTH])?).with_flow(Arc::clone(&flow))?;

    let tracers = envir.add_swarm(SwarmConfig::new(40).with_seed(1).with_init(inlet(40)))?;
    if let Some(swarm) = envir.swarm_mut(tracers) {
        swarm.props_mut().scale(COVARIANCE, 1e-4);
    }

    let mut heavy = Swarm::new(
        Arc::clone(envir.domain()),
        SwarmConfig::new(40).with_seed(2).with_init(inlet(40)),
    )?
    .with_motion(InertialParticles::new(flow));
    heavy.props_mut().insert_shared(RESPONSE_TIME, 2.0);
    let heavy = envir.attach(heavy)?;

    println!("Planktos Channel Flow\n");
    println!("{}", "=".repeat(60));
    println!("\n{:>8} {:>16} {:>16}", "time", "tracers left", "inertial left");

    let dt = 0.1;
    for step in 1..=400 {
        envir.step_all(dt)?;
        if step % 40 == 0 {
            println!(
                "{:>8.1} {:>16} {:>16}",
                step as f64 * dt,
                active(&envir, tracers),
                active(&envir, heavy)
            );
        }
    }

    for swarm in envir.swarms() {
        println!("\n{swarm:?}");
    }
    Ok(())
}

fn active(envir: &Environment, id: SwarmId) -> usize {
    envir
        .swarm(id)
        .map_or(0, |swarm| swarm.positions().active_count())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("simulation failed: {err}");
    }
}
