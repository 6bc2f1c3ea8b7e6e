use super::{Float, Gravity, Vector, octant_index};

/// A point mass the octree can index and aggregate.
///
/// Nodes store values of the implementing type directly: leaves hold a real body and internal
/// nodes hold the result of repeatedly calling [`Body::merge`] on everything beneath them.
pub trait Body<F: Float>: Clone {
    fn position(&self) -> &Vector<F>;

    fn mass(&self) -> F;

    /// Combines two bodies into one with the summed mass located at their mass-weighted centroid.
    ///
    /// Repeated pairwise merging must converge to the centroid of the whole set regardless of the
    /// order in which bodies arrive.
    fn merge(&self, other: &Self) -> Self;

    fn octant_index(&self, center: &Vector<F>) -> usize {
        octant_index(self.position(), center)
    }

    fn distance_to(&self, other: &Self) -> F {
        (other.position() - self.position()).norm()
    }

    /// Force exerted on `self` by `other`, pointing from `self` toward `other`.
    fn gravitational_force(&self, other: &Self, gravity: &Gravity<F>) -> Vector<F> {
        gravity.force_between(self.position(), self.mass(), other.position(), other.mass())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMass<F: Float> {
    pub position: Vector<F>,
    pub velocity: Vector<F>,
    pub mass: F,
}

impl<F: Float> PointMass<F> {
    pub fn new(position: Vector<F>, velocity: Vector<F>, mass: F) -> Self {
        Self {
            position,
            velocity,
            mass,
        }
    }

    pub fn at_rest(position: Vector<F>, mass: F) -> Self {
        Self::new(position, Vector::zeros(), mass)
    }
}

impl<F: Float> Body<F> for PointMass<F> {
    fn position(&self) -> &Vector<F> {
        &self.position
    }

    fn mass(&self) -> F {
        self.mass
    }

    /// Velocity is merged by momentum so an aggregate moves like the cluster it stands for.
    fn merge(&self, other: &Self) -> Self {
        let total_mass = self.mass + other.mass;
        if total_mass > F::zero() {
            Self {
                position: (self.position.scale(self.mass) + other.position.scale(other.mass))
                    / total_mass,
                velocity: (self.velocity.scale(self.mass) + other.velocity.scale(other.mass))
                    / total_mass,
                mass: total_mass,
            }
        } else {
            // massless pair
            let half: F = nalgebra::convert(0.5);
            Self {
                position: (self.position + other.position) * half,
                velocity: (self.velocity + other.velocity) * half,
                mass: total_mass,
            }
        }
    }
}

impl<F: Float> From<(Vector<F>, F)> for PointMass<F> {
    fn from((position, mass): (Vector<F>, F)) -> Self {
        Self::at_rest(position, mass)
    }
}
