//! Brownian swarm example
//!
//! Releases a swarm at the centre of a square tank and lets it diffuse
//! until most particles have been absorbed by the walls.
//!
//! Run with: RUST_LOG=info cargo run --package planktos --example random_walk

use std::sync::Arc;

use planktos::props::COVARIANCE;
use planktos::{Domain, Initializer, Swarm, SwarmConfig};

fn main() {
    env_logger::init();

    println!("Planktos Random Walk\n");
    println!("{}", "=".repeat(60));

    let domain = match Domain::new(vec![10.0, 10.0]) {
        Ok(domain) => Arc::new(domain),
        Err(err) => {
            eprintln!("invalid domain: {err}");
            return;
        }
    };

    let config = SwarmConfig::new(500)
        .with_seed(42)
        .with_init(Initializer::Point(vec![5.0, 5.0]));
    let mut swarm = match Swarm::new(domain, config) {
        Ok(swarm) => swarm,
        Err(err) => {
            eprintln!("could not create swarm: {err}");
            return;
        }
    };

    // unit diffusivity
    swarm.props_mut().scale(COVARIANCE, 2.0);

    let dt = 0.05;
    let report_every = 100;
    let n_steps = 1_000;

    println!("\n{:>8} {:>10} {:>12} {:>12}", "step", "time", "active", "mean x");
    for step in 1..=n_steps {
        let report = match swarm.step(dt) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("step {step} failed: {err}");
                return;
            }
        };

        if step % report_every == 0 {
            let mean_x = swarm
                .positions()
                .mean_position()
                .map(|mean| format!("{:.3}", mean[0]))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>8} {:>10.2} {:>12} {:>12}",
                step, report.time, report.active, mean_x
            );
        }
        if report.active == 0 {
            println!("\nAll particles absorbed after {step} steps");
            break;
        }
    }

    println!("\nFinal state:");
    println!("  Time:      {:.2}", swarm.time());
    println!("  Exited:    {}", swarm.positions().exited_count());
    println!("  Recorded:  {} frames", swarm.history().len());
}
