use approx::assert_relative_eq;
use crate::particles::Body;
use crate::utils::SimulationError;

#[test]
fn test_new_rejects_non_positive_mass() {
    assert_eq!(Body::new((0.0, 0.0), (0.0, 0.0), 0.0), Err(SimulationError::InvalidMass(0.0)));
    assert!(Body::new((0.0, 0.0), (0.0, 0.0), -3.0).is_err());
    assert!(Body::new((0.0, 0.0), (0.0, 0.0), f64::NAN).is_err());
}

#[test]
fn test_accumulate_sums_contributions() {
    let mut body = Body::new((0.0, 0.0), (0.0, 0.0), 1.0).expect("valid body");
    body.accumulate(1.0, -2.0);
    body.accumulate(0.5, 0.5);
    assert_eq!((body.fx, body.fy), (1.5, -1.5));
}

#[test]
fn test_integrate_applies_half_step_position_update() {
    let mut body = Body::new((1.0, 2.0), (3.0, -1.0), 2.0).expect("valid body");
    body.accumulate(4.0, 8.0);
    body.integrate(0.1);

    // a = (2, 4); Δv = (0.2, 0.4); Δp = (v + Δv/2)·Δt
    assert_relative_eq!(body.vx, 3.2, epsilon = 1e-12);
    assert_relative_eq!(body.vy, -0.6, epsilon = 1e-12);
    assert_relative_eq!(body.x, 1.0 + 3.1 * 0.1, epsilon = 1e-12);
    assert_relative_eq!(body.y, 2.0 - 0.8 * 0.1, epsilon = 1e-12);
}

#[test]
fn test_integrate_drains_accumulator() {
    let mut body = Body::new((0.0, 0.0), (1.0, 0.0), 1.0).expect("valid body");
    body.accumulate(10.0, 10.0);
    body.integrate(1.0);
    assert_eq!((body.fx, body.fy), (0.0, 0.0));

    // A second step with no force is plain drift.
    let (x, vx) = (body.x, body.vx);
    body.integrate(1.0);
    assert_eq!(body.vx, vx);
    assert_eq!(body.x, x + vx);
}

#[test]
fn test_snapshot_carries_id_position_and_mass() {
    let body = Body::new((4.0, -2.0), (1.0, 1.0), 7.0).expect("valid body");
    let p = body.snapshot(12);
    assert_eq!((p.id, p.x, p.y, p.mass), (12, 4.0, -2.0, 7.0));
}

#[test]
fn test_kinetic_energy_and_distance() {
    let a = Body::new((0.0, 0.0), (3.0, 4.0), 2.0).expect("valid body");
    let b = Body::new((3.0, 4.0), (0.0, 0.0), 1.0).expect("valid body");
    assert_relative_eq!(a.speed(), 5.0);
    assert_relative_eq!(a.kinetic_energy(), 25.0);
    assert_relative_eq!(a.distance_to(&b), 5.0);
}
