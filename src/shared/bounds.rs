use super::{Float, Vector};

/// Returns the octant of `position` relative to `center`.
///
/// Bit 2 is set on the positive x side, bit 1 on the positive y side and bit 0 on the positive z
/// side. Points lying exactly on a dividing plane count as positive.
pub fn octant_index<F: Float>(position: &Vector<F>, center: &Vector<F>) -> usize {
    let mut index = 0;
    if position.x >= center.x {
        index |= 4;
    }
    if position.y >= center.y {
        index |= 2;
    }
    if position.z >= center.z {
        index |= 1;
    }
    index
}

/// Axis aligned cube described by its center and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<F: Float> {
    pub center: Vector<F>,
    pub width: F,
}

impl<F: Float> Bounds<F> {
    pub fn new(center: Vector<F>, width: F) -> Self {
        Self { center, width }
    }

    /// Cube of side `width` centered at the origin.
    pub fn root(width: F) -> Self {
        Self::new(Vector::zeros(), width)
    }

    /// Smallest origin-centered cube that contains every position, padded slightly so that points on
    /// the extremes stay strictly inside. Falls back to a unit cube when there are no positions or
    /// all of them sit at the origin.
    pub fn enclosing<'a, I>(positions: I) -> Self
    where
        I: IntoIterator<Item = &'a Vector<F>>,
    {
        let half = positions
            .into_iter()
            .flat_map(|p| p.iter().copied())
            .fold(F::zero(), |acc, c| acc.max(c).max(-c));

        if half > F::zero() {
            let padding: F = nalgebra::convert(2.0 * (1.0 + 1e-6));
            Self::root(half * padding)
        } else {
            Self::root(F::one())
        }
    }

    pub fn half_width(&self) -> F {
        let half: F = nalgebra::convert(0.5);
        self.width * half
    }

    pub fn min(&self) -> Vector<F> {
        self.center.add_scalar(-self.half_width())
    }

    pub fn max(&self) -> Vector<F> {
        self.center.add_scalar(self.half_width())
    }

    /// Inclusive on every face.
    pub fn contains(&self, point: &Vector<F>) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x
            && point.x <= max.x
            && point.y >= min.y
            && point.y <= max.y
            && point.z >= min.z
            && point.z <= max.z
    }

    pub fn get_octant(&self, point: &Vector<F>) -> usize {
        octant_index(point, &self.center)
    }

    /// Bounds of the child cube for `octant`, as numbered by [`octant_index`].
    pub fn create_octant(&self, octant: usize) -> Self {
        let quarter: F = nalgebra::convert(0.25);
        let offset = self.width * quarter;
        let shift = |bit: usize| if octant & bit != 0 { offset } else { -offset };
        Self {
            center: self.center + Vector::new(shift(4), shift(2), shift(1)),
            width: self.half_width(),
        }
    }
}
