// Exact O(N^2) gravity, used as the reference the octree is measured against.

use crate::shared::{Body, Float, Gravity, Vector};

/// Exact force on `query` from every body in `bodies`.
pub fn net_force<F: Float, B: Body<F>>(bodies: &[B], query: &B, gravity: &Gravity<F>) -> Vector<F> {
    bodies
        .iter()
        .map(|other| query.gravitational_force(other, gravity))
        .fold(Vector::zeros(), |acc, f| acc + f)
}

/// Exact force on every body from all the others, visiting each pair once.
pub fn net_forces<F: Float, B: Body<F>>(bodies: &[B], gravity: &Gravity<F>) -> Vec<Vector<F>> {
    let mut forces = vec![Vector::zeros(); bodies.len()];
    for i in 0..bodies.len() {
        for j in 0..i {
            let force = bodies[i].gravitational_force(&bodies[j], gravity);
            forces[i] += force;
            forces[j] -= force;
        }
    }
    forces
}
