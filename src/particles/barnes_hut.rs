use log::debug;
use crate::particles::{ParticleData, Quad};
use crate::utils::{ForceParams, SimulationError, MAX_TREE_DEPTH};

/// Barnes–Hut tree node for 2D space.
///
/// - `Empty`: a region with no particles
/// - `Leaf`: a region holding exactly one particle
/// - `Internal`: a region that has received at least two particles; it keeps the
///   total mass and center of mass of everything below it and always owns four
///   children (NW, NE, SW, SE), any of which may be `Empty`
///
/// A node is external exactly when it is not `Internal`.
#[derive(Debug, Clone)]
pub enum BarnesHutNode {
    /// The node is empty; it stores the quad representing its region.
    Empty(Quad),
    /// The node is a leaf and contains one particle.
    Leaf(Quad, ParticleData),
    /// The node is internal and contains aggregated data along with four children.
    Internal {
        quad: Quad,
        mass: f64,
        com_x: f64,
        com_y: f64,
        children: Box<[BarnesHutNode; 4]>,
    },
}

impl BarnesHutNode {
    pub fn new(quad: Quad) -> Self {
        BarnesHutNode::Empty(quad)
    }

    pub fn quad(&self) -> Quad {
        match self {
            BarnesHutNode::Empty(q) => *q,
            BarnesHutNode::Leaf(q, _) => *q,
            BarnesHutNode::Internal { quad, .. } => *quad,
        }
    }

    pub fn is_external(&self) -> bool {
        !matches!(self, BarnesHutNode::Internal { .. })
    }

    /// The four children of an internal node.
    pub fn children(&self) -> Option<&[BarnesHutNode; 4]> {
        match self {
            BarnesHutNode::Internal { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Mass and center of mass as `(mass, com_x, com_y)`; `None` for empty nodes.
    pub fn mass_com(&self) -> Option<(f64, f64, f64)> {
        match self {
            BarnesHutNode::Empty(_) => None,
            BarnesHutNode::Leaf(_, p) => Some((p.mass, p.x, p.y)),
            BarnesHutNode::Internal { mass, com_x, com_y, .. } => Some((*mass, *com_x, *com_y)),
        }
    }

    /// Inserts `p`, which must lie inside this node's quad.
    ///
    /// A leaf receiving a second particle becomes internal, and both particles are
    /// re-inserted through it so the aggregates are updated the same way for each.
    fn insert(&mut self, p: ParticleData, depth: usize) -> Result<(), SimulationError> {
        match self {
            BarnesHutNode::Empty(quad) => {
                *self = BarnesHutNode::Leaf(*quad, p);
                Ok(())
            }
            BarnesHutNode::Leaf(quad, existing) => {
                if depth >= MAX_TREE_DEPTH {
                    return Err(SimulationError::DegenerateConfiguration { depth, x: p.x, y: p.y });
                }
                let (quad, existing) = (*quad, *existing);
                let (nw, ne, sw, se) = quad.subdivide();
                *self = BarnesHutNode::Internal {
                    quad,
                    mass: 0.0,
                    com_x: 0.0,
                    com_y: 0.0,
                    children: Box::new([
                        BarnesHutNode::Empty(nw),
                        BarnesHutNode::Empty(ne),
                        BarnesHutNode::Empty(sw),
                        BarnesHutNode::Empty(se),
                    ]),
                };
                self.insert(existing, depth)?;
                self.insert(p, depth)
            }
            BarnesHutNode::Internal { quad, mass, com_x, com_y, children } => {
                let new_mass = *mass + p.mass;
                *com_x = (*com_x * *mass + p.x * p.mass) / new_mass;
                *com_y = (*com_y * *mass + p.y * p.mass) / new_mass;
                *mass = new_mass;
                children[quad.quadrant_of(p.x, p.y)].insert(p, depth + 1)
            }
        }
    }

    /// Computes the force exerted on particle `p` by the mass in this node.
    ///
    /// - Empty nodes and the leaf holding `p` itself contribute nothing
    /// - Other leaves contribute the exact pairwise force
    /// - An internal node whose `side / distance` to its center of mass is below
    ///   `theta` contributes one force from its aggregate mass
    /// - Otherwise the four children are visited and their forces summed
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::particles::{BarnesHutTree, ParticleData};
    /// use rs_barnes_hut::utils::ForceParams;
    ///
    /// let particles = vec![
    ///     ParticleData { id: 0, x: 1.0, y: 0.0, mass: 1.0 },
    ///     ParticleData { id: 1, x: -1.0, y: 0.0, mass: 1.0 },
    /// ];
    /// let tree = BarnesHutTree::build(&particles).expect("tree");
    ///
    /// // A probe halfway between the two feels no net force.
    /// let probe = ParticleData { id: 2, x: 0.0, y: 0.0, mass: 1.0 };
    /// let params = ForceParams { gravity: 1.0, theta: 0.5, softening: 0.0 };
    /// let (fx, fy) = tree.root().compute_force(&probe, &params);
    /// assert!(fx.abs() < 1e-12 && fy.abs() < 1e-12);
    /// ```
    pub fn compute_force(&self, p: &ParticleData, params: &ForceParams) -> (f64, f64) {
        match self {
            BarnesHutNode::Empty(_) => (0.0, 0.0),
            BarnesHutNode::Leaf(_, q) => {
                if q.id == p.id {
                    (0.0, 0.0)
                } else {
                    pairwise_force(p, q.x, q.y, q.mass, params)
                }
            }
            BarnesHutNode::Internal { quad, mass, com_x, com_y, children } => {
                let dx = *com_x - p.x;
                let dy = *com_y - p.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if quad.side / dist < params.theta {
                    pairwise_force(p, *com_x, *com_y, *mass, params)
                } else {
                    children.iter().fold((0.0, 0.0), |(fx, fy), child| {
                        let (cfx, cfy) = child.compute_force(p, params);
                        (fx + cfx, fy + cfy)
                    })
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self.children() {
            Some(children) => 1 + children.iter().map(BarnesHutNode::depth).max().unwrap_or(0),
            None => 0,
        }
    }

    fn node_count(&self) -> usize {
        match self.children() {
            Some(children) => 1 + children.iter().map(BarnesHutNode::node_count).sum::<usize>(),
            None => 1,
        }
    }
}

/// Softened Newtonian attraction of `p` towards a point mass at (x, y).
///
/// The magnitude is `G·m1·m2 / (d² + ε²)`, directed along the unit vector from `p`
/// to the point. Coincident points have no direction and yield zero.
#[inline]
pub fn pairwise_force(p: &ParticleData, x: f64, y: f64, mass: f64, params: &ForceParams) -> (f64, f64) {
    let dx = x - p.x;
    let dy = y - p.y;
    let dist_sq = dx * dx + dy * dy;
    let dist = dist_sq.sqrt();
    if dist == 0.0 {
        return (0.0, 0.0);
    }
    let force = params.gravity * p.mass * mass / (dist_sq + params.softening * params.softening);
    (force * dx / dist, force * dy / dist)
}

/// A quadtree over one step's particles.
///
/// Trees are rebuilt from scratch every step and are read-only once built.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::particles::{BarnesHutTree, ParticleData};
///
/// let particles = vec![
///     ParticleData { id: 0, x: 0.1, y: 0.1, mass: 1.0 },
///     ParticleData { id: 1, x: -0.5, y: 0.5, mass: 2.0 },
///     ParticleData { id: 2, x: 0.4, y: -0.2, mass: 1.5 },
/// ];
///
/// let tree = BarnesHutTree::build(&particles).expect("tree");
/// assert_eq!(tree.body_count(), 3);
/// assert!((tree.total_mass() - 4.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BarnesHutTree {
    root: BarnesHutNode,
    body_count: usize,
}

impl BarnesHutTree {
    /// Creates an empty tree covering `quad`.
    pub fn new(quad: Quad) -> Self {
        Self {
            root: BarnesHutNode::new(quad),
            body_count: 0,
        }
    }

    /// Builds a tree over a padded square covering every particle, inserting in slice order.
    ///
    /// # Errors
    ///
    /// [`SimulationError::DegenerateConfiguration`] when two particles coincide, and
    /// [`SimulationError::BodyOutOfBounds`] for particles with non-finite coordinates.
    pub fn build(particles: &[ParticleData]) -> Result<Self, SimulationError> {
        Self::build_in(particles, Quad::bounding(particles))
    }

    /// Builds a tree over an explicit region, inserting in slice order.
    pub fn build_in(particles: &[ParticleData], quad: Quad) -> Result<Self, SimulationError> {
        let mut tree = Self::new(quad);
        for &p in particles {
            tree.insert(p)?;
        }
        debug!(
            "Built Barnes-Hut tree: {} bodies, {} nodes, depth {}",
            tree.body_count,
            tree.node_count(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Inserts one particle.
    ///
    /// # Errors
    ///
    /// [`SimulationError::BodyOutOfBounds`] if the particle is outside the root quad,
    /// [`SimulationError::DegenerateConfiguration`] if insertion exceeds the maximum depth.
    pub fn insert(&mut self, p: ParticleData) -> Result<(), SimulationError> {
        if !self.root.quad().contains(p.x, p.y) {
            return Err(SimulationError::BodyOutOfBounds { index: p.id, x: p.x, y: p.y });
        }
        self.root.insert(p, 0)?;
        self.body_count += 1;
        Ok(())
    }

    /// Approximate force on `p` from every other particle in the tree.
    pub fn compute_force(&self, p: &ParticleData, params: &ForceParams) -> (f64, f64) {
        self.root.compute_force(p, params)
    }

    pub fn root(&self) -> &BarnesHutNode {
        &self.root
    }

    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// Number of internal levels below the root; zero for an empty or single-body tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn total_mass(&self) -> f64 {
        self.root.mass_com().map_or(0.0, |(mass, _, _)| mass)
    }

    pub fn center_of_mass(&self) -> Option<(f64, f64)> {
        self.root.mass_com().map(|(_, x, y)| (x, y))
    }
}
