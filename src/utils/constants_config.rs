use log::warn;
use crate::utils::{
    SimulationError, DEFAULT_DT, DEFAULT_GRAVITY, DEFAULT_MASS_VARIANCE, DEFAULT_SOFTENING,
    DEFAULT_STEPS, DEFAULT_THETA, DEFAULT_WORKERS, EARTH_MASS, MAX_BODIES, MAX_STEPS, MAX_WORKERS,
};

/// How the force phase of each step is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceMethod {
    /// Quadtree with the θ opening criterion, O(N log N).
    #[default]
    BarnesHut,
    /// Exact pairwise summation, O(N²).
    Direct,
}

/// Gravity parameters shared by every force evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Gravitational constant G.
    pub gravity: f64,
    /// Opening threshold θ; a node is approximated when `side / distance < theta`.
    pub theta: f64,
    /// Softening length ε, added as `ε²` to the squared distance.
    pub softening: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            theta: DEFAULT_THETA,
            softening: DEFAULT_SOFTENING,
        }
    }
}

/// Every recognised option of a simulation run.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::utils::{SimulationConfig, MAX_BODIES};
///
/// let config = SimulationConfig { body_count: 1_000, ..SimulationConfig::default() }
///     .validated()
///     .expect("valid configuration");
///
/// // Oversized counts are clamped rather than rejected.
/// assert_eq!(config.body_count, MAX_BODIES);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub body_count: usize,
    pub step_count: u64,
    pub worker_count: usize,
    pub theta: f64,
    pub dt: f64,
    pub softening: f64,
    pub gravity: f64,
    pub mass: f64,
    pub mass_variance: f64,
    pub seed: u64,
    pub method: ForceMethod,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            body_count: MAX_BODIES,
            step_count: DEFAULT_STEPS,
            worker_count: DEFAULT_WORKERS,
            theta: DEFAULT_THETA,
            dt: DEFAULT_DT,
            softening: DEFAULT_SOFTENING,
            gravity: DEFAULT_GRAVITY,
            mass: EARTH_MASS,
            mass_variance: DEFAULT_MASS_VARIANCE,
            seed: 0,
            method: ForceMethod::BarnesHut,
        }
    }
}

impl SimulationConfig {
    /// Returns the force parameters described by this configuration.
    pub fn force_params(&self) -> ForceParams {
        ForceParams {
            gravity: self.gravity,
            theta: self.theta,
            softening: self.softening,
        }
    }

    /// Checks every option and clamps counts to their upper bounds.
    ///
    /// # Errors
    ///
    /// Returns the first invalid option found: zero counts, a non-positive θ or Δt,
    /// a negative softening or G, a non-positive mass, or a variance outside `[0, 1)`.
    pub fn validated(mut self) -> Result<Self, SimulationError> {
        if self.body_count == 0 {
            return Err(SimulationError::InvalidBodyCount);
        }
        if self.worker_count == 0 {
            return Err(SimulationError::InvalidWorkerCount);
        }
        validate_theta(self.theta)?;
        validate_time_step(self.dt)?;
        validate_softening(self.softening)?;
        validate_gravity(self.gravity)?;
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimulationError::InvalidMass(self.mass));
        }
        if !(0.0..1.0).contains(&self.mass_variance) {
            return Err(SimulationError::InvalidMassVariance(self.mass_variance));
        }

        if self.body_count > MAX_BODIES {
            warn!("Body count {} exceeds {}, clamping", self.body_count, MAX_BODIES);
            self.body_count = MAX_BODIES;
        }
        if self.step_count > MAX_STEPS {
            warn!("Step count {} exceeds {}, clamping", self.step_count, MAX_STEPS);
            self.step_count = MAX_STEPS;
        }
        if self.worker_count > MAX_WORKERS {
            warn!("Worker count {} exceeds {}, clamping", self.worker_count, MAX_WORKERS);
            self.worker_count = MAX_WORKERS;
        }
        Ok(self)
    }
}

pub(crate) fn validate_theta(theta: f64) -> Result<(), SimulationError> {
    if theta.is_finite() && theta > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidTheta(theta))
    }
}

pub(crate) fn validate_time_step(dt: f64) -> Result<(), SimulationError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidTimeStep(dt))
    }
}

pub(crate) fn validate_softening(softening: f64) -> Result<(), SimulationError> {
    if softening.is_finite() && softening >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidSoftening(softening))
    }
}

pub(crate) fn validate_gravity(gravity: f64) -> Result<(), SimulationError> {
    if gravity.is_finite() && gravity >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidGravity(gravity))
    }
}
