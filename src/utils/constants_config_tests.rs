use crate::utils::{ForceMethod, SimulationConfig, SimulationError, MAX_BODIES, MAX_STEPS, MAX_WORKERS};

#[test]
fn test_default_config_is_valid() {
    let config = SimulationConfig::default();
    assert_eq!(config.validated(), Ok(config));
    assert_eq!(config.method, ForceMethod::BarnesHut);
}

#[test]
fn test_zero_counts_fail_fast() {
    let no_bodies = SimulationConfig { body_count: 0, ..SimulationConfig::default() };
    assert_eq!(no_bodies.validated(), Err(SimulationError::InvalidBodyCount));

    let no_workers = SimulationConfig { worker_count: 0, ..SimulationConfig::default() };
    assert_eq!(no_workers.validated(), Err(SimulationError::InvalidWorkerCount));
}

#[test]
fn test_non_positive_theta_is_rejected() {
    for theta in [0.0, -0.5, f64::NAN] {
        let config = SimulationConfig { theta, ..SimulationConfig::default() };
        assert!(matches!(config.validated(), Err(SimulationError::InvalidTheta(_))));
    }
}

#[test]
fn test_invalid_physical_parameters() {
    let config = SimulationConfig { dt: 0.0, ..SimulationConfig::default() };
    assert!(matches!(config.validated(), Err(SimulationError::InvalidTimeStep(_))));

    let config = SimulationConfig { softening: -1.0, ..SimulationConfig::default() };
    assert!(matches!(config.validated(), Err(SimulationError::InvalidSoftening(_))));

    let config = SimulationConfig { mass: 0.0, ..SimulationConfig::default() };
    assert!(matches!(config.validated(), Err(SimulationError::InvalidMass(_))));

    let config = SimulationConfig { mass_variance: 1.0, ..SimulationConfig::default() };
    assert!(matches!(config.validated(), Err(SimulationError::InvalidMassVariance(_))));
}

#[test]
fn test_zero_softening_is_allowed() {
    let config = SimulationConfig { softening: 0.0, ..SimulationConfig::default() };
    assert!(config.validated().is_ok());
}

#[test]
fn test_oversized_counts_are_clamped() {
    let config = SimulationConfig {
        body_count: MAX_BODIES + 10,
        step_count: MAX_STEPS * 2,
        worker_count: 64,
        ..SimulationConfig::default()
    }
    .validated()
    .expect("clamping should not fail");

    assert_eq!(config.body_count, MAX_BODIES);
    assert_eq!(config.step_count, MAX_STEPS);
    assert_eq!(config.worker_count, MAX_WORKERS);
}

#[test]
fn test_force_params_follow_config() {
    let config = SimulationConfig { gravity: 1.5, theta: 0.7, softening: 2.0, ..SimulationConfig::default() };
    let params = config.force_params();
    assert_eq!((params.gravity, params.theta, params.softening), (1.5, 0.7, 2.0));
}
