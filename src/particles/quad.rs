use crate::particles::ParticleData;

const BOUNDS_PADDING: f64 = 1e-6;

/// Represents a square region in 2D space.
///
/// Each `Quad` has a center position (cx, cy) and the full length of one side.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::particles::Quad;
///
/// // A square centered at the origin with side length 2.0
/// let quad = Quad::new(0.0, 0.0, 2.0);
///
/// assert!(quad.contains(0.5, 0.5));
/// assert!(quad.contains(-1.0, -1.0)); // lower edges are inclusive
/// assert!(!quad.contains(1.0, 0.5));  // upper edges are exclusive
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub cx: f64,
    pub cy: f64,
    pub side: f64,
}

impl Quad {
    pub fn new(cx: f64, cy: f64, side: f64) -> Self {
        Quad { cx, cy, side }
    }

    /// Smallest padded square covering every particle.
    ///
    /// The padding keeps bodies sitting on the maximum x or y edge inside the
    /// half-open region. An empty slice yields a unit square at the origin.
    pub fn bounding(particles: &[ParticleData]) -> Self {
        if particles.is_empty() {
            return Quad::new(0.0, 0.0, 1.0);
        }

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in particles {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let extent = (max_x - min_x).max(max_y - min_y);
        let magnitude = min_x.abs().max(max_x.abs()).max(min_y.abs()).max(max_y.abs());
        let pad = (extent * BOUNDS_PADDING).max(magnitude * 4.0 * f64::EPSILON);
        let side = if extent > 0.0 { extent + 2.0 * pad } else { 1.0 + 2.0 * pad };

        Quad::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, side)
    }

    #[inline]
    pub fn half_size(&self) -> f64 {
        self.side / 2.0
    }

    pub fn area(&self) -> f64 {
        self.side * self.side
    }

    /// Returns true if the point (x, y) is inside this quad.
    ///
    /// The boundary is inclusive on the lower bounds and exclusive on the upper bounds,
    /// so a point on a shared edge belongs to exactly one of the four sub-quads.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let hs = self.half_size();
        x >= self.cx - hs &&
            x <  self.cx + hs &&
            y >= self.cy - hs &&
            y <  self.cy + hs
    }

    /// Subdivides the quad into four smaller quads (NW, NE, SW, SE).
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::particles::Quad;
    ///
    /// let quad = Quad::new(0.0, 0.0, 2.0);
    /// let (nw, ne, sw, se) = quad.subdivide();
    ///
    /// assert_eq!((nw.cx, nw.cy, nw.side), (-0.5, 0.5, 1.0));
    /// assert_eq!((ne.cx, ne.cy), (0.5, 0.5));
    /// assert_eq!((sw.cx, sw.cy), (-0.5, -0.5));
    /// assert_eq!((se.cx, se.cy), (0.5, -0.5));
    /// ```
    pub fn subdivide(&self) -> (Quad, Quad, Quad, Quad) {
        let offset = self.side / 4.0;
        let side = self.side / 2.0;
        (
            Quad { cx: self.cx - offset, cy: self.cy + offset, side }, // NW
            Quad { cx: self.cx + offset, cy: self.cy + offset, side }, // NE
            Quad { cx: self.cx - offset, cy: self.cy - offset, side }, // SW
            Quad { cx: self.cx + offset, cy: self.cy - offset, side }, // SE
        )
    }

    /// Index (NW = 0, NE = 1, SW = 2, SE = 3) of the sub-quad holding (x, y).
    ///
    /// Uses the same half-open convention as [`Quad::contains`]: west is `x < cx`,
    /// north is `y >= cy`.
    #[inline]
    pub fn quadrant_of(&self, x: f64, y: f64) -> usize {
        match (x < self.cx, y >= self.cy) {
            (true, true) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (false, false) => 3,
        }
    }
}
