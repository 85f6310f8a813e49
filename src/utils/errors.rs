use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or running a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The body count is zero.
    InvalidBodyCount,
    /// The worker count is zero.
    InvalidWorkerCount,
    /// The approximation threshold is not a positive finite number.
    InvalidTheta(f64),
    /// The time step is not a positive finite number.
    InvalidTimeStep(f64),
    /// The softening constant is negative or not finite.
    InvalidSoftening(f64),
    /// The gravitational constant is negative or not finite.
    InvalidGravity(f64),
    /// A body mass is not a positive finite number.
    InvalidMass(f64),
    /// The mass variance lies outside `[0, 1)`.
    InvalidMassVariance(f64),
    /// A body lies outside the region a tree was asked to cover.
    BodyOutOfBounds { index: usize, x: f64, y: f64 },
    /// Tree insertion exceeded the maximum depth, usually because two bodies coincide.
    DegenerateConfiguration { depth: usize, x: f64, y: f64 },
    /// A worker thread panicked and the run was halted.
    WorkerPanicked { worker: usize },
    /// A worker thread could not be spawned.
    WorkerSpawn(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidBodyCount => write!(f, "Body count must be at least 1"),
            SimulationError::InvalidWorkerCount => write!(f, "Worker count must be at least 1"),
            SimulationError::InvalidTheta(theta) => write!(f, "Invalid theta value: {}", theta),
            SimulationError::InvalidTimeStep(dt) => write!(f, "Invalid time step: {}", dt),
            SimulationError::InvalidSoftening(eps) => write!(f, "Invalid softening value: {}", eps),
            SimulationError::InvalidGravity(g) => write!(f, "Invalid gravitational constant: {}", g),
            SimulationError::InvalidMass(mass) => write!(f, "Invalid mass value: {}", mass),
            SimulationError::InvalidMassVariance(variance) => {
                write!(f, "Mass variance must lie in [0, 1), got {}", variance)
            }
            SimulationError::BodyOutOfBounds { index, x, y } => {
                write!(f, "Body {} at ({}, {}) lies outside the tree region", index, x, y)
            }
            SimulationError::DegenerateConfiguration { depth, x, y } => write!(
                f,
                "Degenerate configuration: tree depth {} exceeded while inserting body at ({}, {})",
                depth, x, y
            ),
            SimulationError::WorkerPanicked { worker } => write!(f, "Worker {} panicked", worker),
            SimulationError::WorkerSpawn(msg) => write!(f, "Failed to spawn worker: {}", msg),
        }
    }
}

impl Error for SimulationError {}
