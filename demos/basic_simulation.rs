// demos/basic_simulation.rs

use log::info;
use rs_barnes_hut::simulation::{snapshot, ParallelStepDriver, SimulationState};
use rs_barnes_hut::utils::{SimulationConfig, SimulationError};

fn main() -> Result<(), SimulationError> {
    env_logger::init();

    let config = SimulationConfig { step_count: 500, seed: 2024, ..SimulationConfig::default() }.validated()?;
    let mut state = SimulationState::from_config(&config)?;
    let driver = ParallelStepDriver::from_config(&config)?;

    println!("Initial state:");
    println!("Bodies: {}, total energy: {:.6e}", state.bodies.len(), state.total_energy());
    for (i, (x, y, vx, vy)) in snapshot(&state).iter().take(5).enumerate() {
        println!("Body {}: position=({:.3}, {:.3}), velocity=({:.5}, {:.5})", i, x, y, vx, vy);
    }

    let summary = driver.run(&mut state, config.step_count)?;
    info!("Run took {:?}", summary.elapsed);

    println!("\nAfter {} steps:", summary.steps_completed);
    println!("Total energy: {:.6e}", state.total_energy());
    let (px, py) = state.total_momentum();
    println!("Total momentum: ({:.6e}, {:.6e})", px, py);
    for (i, (x, y, vx, vy)) in snapshot(&state).iter().take(5).enumerate() {
        println!("Body {}: position=({:.3}, {:.3}), velocity=({:.5}, {:.5})", i, x, y, vx, vy);
    }

    Ok(())
}
