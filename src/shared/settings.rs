use nalgebra::SimdComplexField;

use super::{Float, Vector};

/// Depth at which a node stops subdividing and starts collecting bodies instead.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Newton's constant in SI units.
pub const NEWTONIAN_G: f64 = 6.674_30e-11;

/// Gravitational constant and Plummer softening length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity<F: Float> {
    pub g: F,
    pub g_soft: F,
}

impl<F: Float> Gravity<F> {
    pub fn new(g: F, g_soft: F) -> Self {
        Self { g, g_soft }
    }

    /// SI gravitational constant with no softening.
    pub fn newtonian() -> Self {
        Self::new(nalgebra::convert(NEWTONIAN_G), F::zero())
    }

    /// Force on a mass `m1` at `p1` due to a mass `m2` at `p2`.
    ///
    /// Returns zero when the two positions coincide and no softening is configured.
    pub fn force_between(&self, p1: &Vector<F>, m1: F, p2: &Vector<F>, m2: F) -> Vector<F> {
        let r = p2 - p1;
        let r2 = r.norm_squared() + self.g_soft * self.g_soft;
        if r2 <= F::zero() {
            return Vector::zeros();
        }
        let r_dist = SimdComplexField::simd_sqrt(r2);
        let r_cubed = r_dist * r_dist * r_dist;
        r * (self.g * m1 * m2 / r_cubed)
    }
}

impl<F: Float> Default for Gravity<F> {
    fn default() -> Self {
        Self::new(F::one(), F::zero())
    }
}

/// Tunables for building and querying an [`Octree`](crate::octree::Octree).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeSettings<F: Float> {
    /// Barnes-Hut opening angle. A node is approximated when `width / distance < theta`.
    pub theta: F,
    pub gravity: Gravity<F>,
    /// `None` subdivides without limit, which never terminates for coincident bodies.
    pub max_depth: Option<usize>,
}

impl<F: Float> TreeSettings<F> {
    pub fn with_theta(mut self, theta: F) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<F: Float> Default for TreeSettings<F> {
    fn default() -> Self {
        Self {
            theta: nalgebra::convert(0.5),
            gravity: Gravity::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}
