use approx::assert_relative_eq;
use crate::particles::Body;
use crate::simulation::{new_simulation, orbital_period, snapshot, two_body_orbit, SimulationState};
use crate::utils::{SimulationConfig, SimulationError, CENTRAL_MASS_FACTOR, MIN_ORBIT_DISTANCE, ORBIT_RADIUS, START_VEL};

#[test]
fn test_new_simulation_layout() {
    let mass = 10.0;
    let state = new_simulation(50, mass, 0.1, 3).expect("scenario");
    assert_eq!(state.bodies.len(), 50);

    let central = state.bodies[0];
    assert_eq!((central.x, central.y, central.vx, central.vy), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(central.mass, mass * CENTRAL_MASS_FACTOR);

    for body in &state.bodies[1..] {
        let distance = (body.x * body.x + body.y * body.y).sqrt();
        assert!(distance >= MIN_ORBIT_DISTANCE - 1e-9 && distance <= MIN_ORBIT_DISTANCE + ORBIT_RADIUS + 1e-9);
        assert!(body.mass >= mass * 0.9 - 1e-9 && body.mass <= mass * 1.1 + 1e-9);

        // Velocity is perpendicular to the radius vector with magnitude START_VEL·distance.
        assert_relative_eq!(body.x * body.vx + body.y * body.vy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(body.speed(), START_VEL * distance, max_relative = 1e-12);
        // Counter-clockwise: the cross product r × v is positive.
        assert!(body.x * body.vy - body.y * body.vx > 0.0);
    }
}

#[test]
fn test_new_simulation_is_seeded() {
    let a = new_simulation(20, 1.0, 0.05, 99).expect("scenario");
    let b = new_simulation(20, 1.0, 0.05, 99).expect("scenario");
    let c = new_simulation(20, 1.0, 0.05, 100).expect("scenario");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_new_simulation_rejects_invalid_input() {
    assert_eq!(new_simulation(0, 1.0, 0.05, 0), Err(SimulationError::InvalidBodyCount));
    assert!(matches!(new_simulation(5, -1.0, 0.05, 0), Err(SimulationError::InvalidMass(_))));
    assert!(matches!(new_simulation(5, 1.0, 1.5, 0), Err(SimulationError::InvalidMassVariance(_))));
}

#[test]
fn test_from_config_uses_physical_constants() {
    let config = SimulationConfig { body_count: 8, gravity: 2.0, softening: 0.5, ..SimulationConfig::default() };
    let state = SimulationState::from_config(&config).expect("scenario");
    assert_eq!(state.gravity, 2.0);
    assert_eq!(state.softening, 0.5);
    assert_eq!(state.steps_completed, 0);
}

#[test]
fn test_from_bodies_rejects_empty() {
    assert_eq!(SimulationState::from_bodies(vec![], 1.0, 0.0), Err(SimulationError::InvalidBodyCount));
}

#[test]
fn test_snapshot_order_and_fields() {
    let bodies = vec![
        Body::new((1.0, 2.0), (3.0, 4.0), 1.0).expect("body"),
        Body::new((5.0, 6.0), (7.0, 8.0), 1.0).expect("body"),
    ];
    let state = SimulationState::from_bodies(bodies, 1.0, 0.0).expect("state");
    assert_eq!(snapshot(&state), vec![(1.0, 2.0, 3.0, 4.0), (5.0, 6.0, 7.0, 8.0)]);
}

#[test]
fn test_two_body_orbit_setup() {
    let state = two_body_orbit(1000.0, 1e-6, 10.0, 1.0).expect("orbit");
    let light = state.bodies[1];
    assert_eq!((light.x, light.y, light.vx), (10.0, 0.0, 0.0));
    assert_relative_eq!(light.vy, 10.0);
    assert_relative_eq!(orbital_period(1000.0, 10.0, 1.0), 2.0 * std::f64::consts::PI);
}

#[test]
fn test_energy_and_momentum_diagnostics() {
    let bodies = vec![
        Body::new((0.0, 0.0), (1.0, 0.0), 2.0).expect("body"),
        Body::new((3.0, 4.0), (0.0, -1.0), 1.0).expect("body"),
    ];
    let state = SimulationState::from_bodies(bodies, 1.0, 0.0).expect("state");
    assert_relative_eq!(state.kinetic_energy(), 1.5);
    assert_relative_eq!(state.potential_energy(), -2.0 / 5.0);
    assert_relative_eq!(state.total_energy(), 1.1);
    assert_eq!(state.total_momentum(), (2.0, -1.0));
    let (cx, cy) = state.center_of_mass();
    assert_relative_eq!(cx, 1.0);
    assert_relative_eq!(cy, 4.0 / 3.0);
}
