// Defaults for the central-mass scenario; units are arbitrary.

/// Gravitational constant.
pub const DEFAULT_GRAVITY: f64 = 6.67e-3;
/// Integration time step.
pub const DEFAULT_DT: f64 = 0.1;
/// Softening length ε. The force denominator is `d² + ε²`, so ε² = 1e5.
pub const DEFAULT_SOFTENING: f64 = 316.227_766_016_837_94;
/// Barnes-Hut opening threshold θ.
pub const DEFAULT_THETA: f64 = 0.5;
/// Mass of an orbiting body before variance is applied.
pub const EARTH_MASS: f64 = 59.742;
pub const DEFAULT_MASS_VARIANCE: f64 = 0.05;
/// The central body weighs this many orbiting-body masses.
pub const CENTRAL_MASS_FACTOR: f64 = 333.0;
/// Spread of orbit radii around the central body.
pub const ORBIT_RADIUS: f64 = 150.0;
/// Minimum distance from an orbiting body to the central body.
pub const MIN_ORBIT_DISTANCE: f64 = 80.0;
/// Initial speed per unit distance from the central body.
pub const START_VEL: f64 = 0.0008;

pub const MAX_BODIES: usize = 240;
pub const MAX_STEPS: u64 = 400_000;
pub const MAX_WORKERS: usize = 6;
pub const DEFAULT_STEPS: u64 = 1_000;
pub const DEFAULT_WORKERS: usize = 4;

/// Quadtree insertion gives up past this depth.
pub const MAX_TREE_DEPTH: usize = 64;
