use rayon::prelude::*;
use crate::particles::{pairwise_force, BarnesHutTree, Body, ParticleData};
use crate::utils::{
    validate_gravity, validate_softening, validate_theta, ForceMethod, ForceParams, SimulationError,
};

/// What the force phase of one step reads: a tree, or the raw snapshot for direct summation.
#[derive(Debug, Clone)]
pub enum ForceField {
    Tree(BarnesHutTree),
    Direct(Vec<ParticleData>),
}

impl ForceField {
    /// Prepares the field for one step from that step's particle snapshot.
    pub fn build(method: ForceMethod, particles: Vec<ParticleData>) -> Result<Self, SimulationError> {
        match method {
            ForceMethod::BarnesHut => BarnesHutTree::build(&particles).map(ForceField::Tree),
            ForceMethod::Direct => Ok(ForceField::Direct(particles)),
        }
    }
}

/// Applies the force on one body for the current step.
///
/// The solver holds no per-step state; each worker calls [`ForceSolver::apply`] for
/// every body it owns.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::particles::{BarnesHutTree, Body, ForceSolver};
/// use rs_barnes_hut::utils::ForceParams;
///
/// let mut bodies = vec![
///     Body::new((0.0, 0.0), (0.0, 0.0), 1.0).unwrap(),
///     Body::new((2.0, 0.0), (0.0, 0.0), 1.0).unwrap(),
/// ];
/// let snapshot: Vec<_> = bodies.iter().enumerate().map(|(i, b)| b.snapshot(i)).collect();
/// let tree = BarnesHutTree::build(&snapshot).unwrap();
///
/// let solver = ForceSolver::new(ForceParams { gravity: 1.0, theta: 0.5, softening: 0.0 }).unwrap();
/// solver.apply(&tree, 0, &mut bodies[0]);
///
/// // G·m·m / d² = 1 / 4, pointing towards the other body.
/// assert!((bodies[0].fx - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ForceSolver {
    params: ForceParams,
}

impl ForceSolver {
    /// # Errors
    ///
    /// Rejects a non-positive θ, a negative softening, or a negative G.
    pub fn new(params: ForceParams) -> Result<Self, SimulationError> {
        validate_theta(params.theta)?;
        validate_softening(params.softening)?;
        validate_gravity(params.gravity)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Accumulates onto `body` (the body with index `id`) the tree's force on it.
    pub fn apply(&self, tree: &BarnesHutTree, id: usize, body: &mut Body) {
        let (fx, fy) = tree.compute_force(&body.snapshot(id), &self.params);
        body.accumulate(fx, fy);
    }

    /// Same as [`ForceSolver::apply`] for whichever field the step built.
    pub fn apply_field(&self, field: &ForceField, id: usize, body: &mut Body) {
        match field {
            ForceField::Tree(tree) => self.apply(tree, id, body),
            ForceField::Direct(particles) => {
                let (fx, fy) = direct_force(&body.snapshot(id), particles, &self.params);
                body.accumulate(fx, fy);
            }
        }
    }

    /// Evaluates the tree force on every particle in parallel, in slice order.
    pub fn compute_forces(&self, tree: &BarnesHutTree, particles: &[ParticleData]) -> Vec<(f64, f64)> {
        particles
            .par_iter()
            .map(|p| tree.compute_force(p, &self.params))
            .collect()
    }
}

/// Exact force on `p` from every other particle in `particles`.
pub fn direct_force(p: &ParticleData, particles: &[ParticleData], params: &ForceParams) -> (f64, f64) {
    particles
        .iter()
        .filter(|q| q.id != p.id)
        .fold((0.0, 0.0), |(fx, fy), q| {
            let (qfx, qfy) = pairwise_force(p, q.x, q.y, q.mass, params);
            (fx + qfx, fy + qfy)
        })
}

/// Exact O(N²) forces for every particle, computed in parallel.
///
/// Used as the reference the tree approximation is measured against.
pub fn direct_forces(particles: &[ParticleData], params: &ForceParams) -> Vec<(f64, f64)> {
    particles
        .par_iter()
        .map(|p| direct_force(p, particles, params))
        .collect()
}
