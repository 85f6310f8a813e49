use std::f64::consts::PI;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::particles::Body;
use crate::utils::{
    validate_gravity, validate_softening, SimulationConfig, SimulationError, CENTRAL_MASS_FACTOR,
    MIN_ORBIT_DISTANCE, ORBIT_RADIUS, START_VEL,
};

/// Bodies plus the physical constants they evolve under.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub bodies: Vec<Body>,
    pub gravity: f64,
    pub softening: f64,
    /// Steps applied to `bodies` since the state was created.
    pub steps_completed: u64,
}

impl SimulationState {
    /// Wraps an existing set of bodies.
    ///
    /// # Errors
    ///
    /// Rejects an empty body list, a negative or non-finite G, or a negative softening.
    pub fn from_bodies(bodies: Vec<Body>, gravity: f64, softening: f64) -> Result<Self, SimulationError> {
        if bodies.is_empty() {
            return Err(SimulationError::InvalidBodyCount);
        }
        validate_gravity(gravity)?;
        validate_softening(softening)?;
        Ok(Self { bodies, gravity, softening, steps_completed: 0 })
    }

    /// Seeds the central-mass scenario described by `config`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let config = config.validated()?;
        let bodies = seed_orbiting_bodies(config.body_count, config.mass, config.mass_variance, config.seed)?;
        Self::from_bodies(bodies, config.gravity, config.softening)
    }

    /// `(x, y, vx, vy)` for every body, in body order.
    pub fn snapshot(&self) -> Vec<(f64, f64, f64, f64)> {
        self.bodies.iter().map(|b| (b.x, b.y, b.vx, b.vy)).collect()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Softened pairwise potential energy, `-G·m1·m2 / sqrt(d² + ε²)` over all pairs.
    pub fn potential_energy(&self) -> f64 {
        let eps_sq = self.softening * self.softening;
        let mut energy = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                energy -= self.gravity * a.mass * b.mass / (dx * dx + dy * dy + eps_sq).sqrt();
            }
        }
        energy
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn total_momentum(&self) -> (f64, f64) {
        self.bodies
            .iter()
            .fold((0.0, 0.0), |(px, py), b| (px + b.mass * b.vx, py + b.mass * b.vy))
    }

    pub fn center_of_mass(&self) -> (f64, f64) {
        let (m, mx, my) = self
            .bodies
            .iter()
            .fold((0.0, 0.0, 0.0), |(m, mx, my), b| (m + b.mass, mx + b.mass * b.x, my + b.mass * b.y));
        (mx / m, my / m)
    }
}

/// Creates the default scenario: one heavy body at the origin and `body_count - 1`
/// bodies orbiting it.
///
/// Orbiting bodies sit at distance `ORBIT_RADIUS·sqrt(u) + MIN_ORBIT_DISTANCE` in a
/// uniformly random direction and move perpendicular to the radius vector (rotated
/// 90° counter-clockwise) with speed `START_VEL·distance`. The same seed always
/// yields the same bodies.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::simulation::new_simulation;
///
/// let state = new_simulation(10, 59.742, 0.05, 7).expect("valid scenario");
/// assert_eq!(state.bodies.len(), 10);
/// assert_eq!(state, new_simulation(10, 59.742, 0.05, 7).unwrap());
/// ```
pub fn new_simulation(body_count: usize, mass: f64, mass_variance: f64, seed: u64) -> Result<SimulationState, SimulationError> {
    let config = SimulationConfig { body_count, mass, mass_variance, seed, ..SimulationConfig::default() };
    SimulationState::from_config(&config)
}

fn seed_orbiting_bodies(body_count: usize, mass: f64, mass_variance: f64, seed: u64) -> Result<Vec<Body>, SimulationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let central = Body::new((0.0, 0.0), (0.0, 0.0), mass * CENTRAL_MASS_FACTOR)?;

    let mut bodies = Vec::with_capacity(body_count);
    bodies.push(central);
    for _ in 1..body_count {
        let distance = ORBIT_RADIUS * rng.random::<f64>().sqrt() + MIN_ORBIT_DISTANCE;
        let angle = rng.random::<f64>() * 2.0 * PI;
        let (dx, dy) = (distance * angle.cos(), distance * angle.sin());
        let velocity = (-dy * START_VEL, dx * START_VEL);
        let body_mass = mass * (1.0 + mass_variance * (2.0 * rng.random::<f64>() - 1.0));
        bodies.push(Body::new((central.x + dx, central.y + dy), velocity, body_mass)?);
    }
    debug!("Seeded {} bodies from seed {}", bodies.len(), seed);
    Ok(bodies)
}

/// A light body on a circular orbit around a heavy body at the origin.
///
/// The light body starts at `(radius, 0)` with tangential speed `sqrt(G·M/radius)`;
/// its period is `2π·sqrt(radius³ / (G·M))`. Softening is zero.
pub fn two_body_orbit(central_mass: f64, orbiting_mass: f64, radius: f64, gravity: f64) -> Result<SimulationState, SimulationError> {
    let speed = (gravity * central_mass / radius).sqrt();
    let bodies = vec![
        Body::new((0.0, 0.0), (0.0, 0.0), central_mass)?,
        Body::new((radius, 0.0), (0.0, speed), orbiting_mass)?,
    ];
    SimulationState::from_bodies(bodies, gravity, 0.0)
}

/// Orbital period of [`two_body_orbit`] with the same parameters.
pub fn orbital_period(central_mass: f64, radius: f64, gravity: f64) -> f64 {
    2.0 * PI * (radius.powi(3) / (gravity * central_mass)).sqrt()
}

/// `(x, y, vx, vy)` for every body, in body order.
pub fn snapshot(state: &SimulationState) -> Vec<(f64, f64, f64, f64)> {
    state.snapshot()
}
