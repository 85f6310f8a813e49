use crate::utils::SimulationError;

/// A point mass taking part in the simulation.
///
/// `fx`/`fy` accumulate the force applied to the body during a step's force phase.
/// [`Body::integrate`] drains them into the velocity and resets them to zero, so they
/// are zero again when the next force phase starts.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::particles::Body;
///
/// let mut body = Body::new((0.0, 0.0), (1.0, 0.0), 2.0).expect("valid body");
/// body.accumulate(4.0, 0.0);
/// body.integrate(0.5);
///
/// // Δv = (F/m)·Δt = 1.0, Δp = (v + Δv/2)·Δt = 0.75
/// assert_eq!(body.vx, 2.0);
/// assert_eq!(body.x, 0.75);
/// assert_eq!((body.fx, body.fy), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: f64,
    pub fy: f64,
    pub mass: f64,
}

impl Body {
    /// Creates a body at rest with respect to force (empty accumulator).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidMass`] if `mass` is not a positive finite number.
    pub fn new(position: (f64, f64), velocity: (f64, f64), mass: f64) -> Result<Self, SimulationError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimulationError::InvalidMass(mass));
        }
        Ok(Body {
            x: position.0,
            y: position.1,
            vx: velocity.0,
            vy: velocity.1,
            fx: 0.0,
            fy: 0.0,
            mass,
        })
    }

    /// Adds a force contribution to the accumulator.
    ///
    /// Only the worker that owns this body may call it during a force phase.
    #[inline]
    pub fn accumulate(&mut self, fx: f64, fy: f64) {
        self.fx += fx;
        self.fy += fy;
    }

    /// Advances the body by one time step and clears the force accumulator.
    ///
    /// `Δv = (F/m)·Δt`, `Δp = (v + Δv/2)·Δt`, then `v += Δv` and `p += Δp`.
    pub fn integrate(&mut self, dt: f64) {
        let dvx = self.fx / self.mass * dt;
        let dvy = self.fy / self.mass * dt;
        let dpx = (self.vx + dvx / 2.0) * dt;
        let dpy = (self.vy + dvy / 2.0) * dt;

        self.vx += dvx;
        self.vy += dvy;
        self.x += dpx;
        self.y += dpy;

        self.fx = 0.0;
        self.fy = 0.0;
    }

    /// Returns the read-only data the force phase needs, tagged with the body's index.
    #[inline]
    pub fn snapshot(&self, id: usize) -> ParticleData {
        ParticleData { id, x: self.x, y: self.y, mass: self.mass }
    }

    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Position and mass of one body, frozen for the duration of a force phase.
///
/// `id` is the body's index in the simulation; the tree uses it to skip self-interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleData {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub mass: f64,
}
