use log::{debug, trace};
use smallvec::{SmallVec, smallvec};

use crate::shared::{Body, Bounds, Float, Gravity, Vector, to_f64};

pub(crate) type Children<F, B> = [Option<Box<OctreeNode<F, B>>>; 8];

#[derive(Clone, Debug)]
pub(crate) enum NodeKind<F: Float, B> {
    /// A single real body, which is also the node's approximation.
    Leaf(B),
    Internal {
        approximation: B,
        children: Children<F, B>,
    },
    /// Terminal node at the depth limit; holds every body that reached it.
    Bucket {
        approximation: B,
        bodies: SmallVec<[B; 2]>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct OctreeNode<F: Float, B> {
    pub(crate) bounds: Bounds<F>,
    pub(crate) kind: NodeKind<F, B>,
}

impl<F: Float, B: Body<F>> OctreeNode<F, B> {
    pub(crate) fn new(body: B, bounds: Bounds<F>) -> Self {
        Self {
            bounds,
            kind: NodeKind::Leaf(body),
        }
    }

    pub(crate) fn approximation(&self) -> &B {
        match &self.kind {
            NodeKind::Leaf(body) => body,
            NodeKind::Internal { approximation, .. } | NodeKind::Bucket { approximation, .. } => {
                approximation
            }
        }
    }

    /// Inserts `body` below this node, which sits `depth` levels under the root.
    pub(crate) fn add_body(&mut self, body: B, depth: usize, max_depth: Option<usize>) {
        match &mut self.kind {
            NodeKind::Leaf(existing) => {
                let existing = existing.clone();
                self.kind = self.split(existing, body, depth, max_depth);
            }
            NodeKind::Internal {
                approximation,
                children,
            } => {
                let merged = approximation.merge(&body);
                Self::add_to_child(children, &self.bounds, body, depth, max_depth);
                *approximation = merged;
            }
            NodeKind::Bucket {
                approximation,
                bodies,
            } => {
                *approximation = approximation.merge(&body);
                bodies.push(body);
            }
        }
    }

    /// Turns a leaf holding `existing` into a node holding both bodies.
    fn split(&self, existing: B, body: B, depth: usize, max_depth: Option<usize>) -> NodeKind<F, B> {
        let approximation = existing.merge(&body);

        if max_depth.is_some_and(|max| depth >= max) {
            debug!(
                "depth limit {depth} reached in cell of width {:e}, collecting bodies in a bucket",
                to_f64(self.bounds.width)
            );
            return NodeKind::Bucket {
                approximation,
                bodies: smallvec![existing, body],
            };
        }

        trace!("splitting leaf at depth {depth}");
        let mut children: Children<F, B> = Default::default();
        Self::add_to_child(&mut children, &self.bounds, existing, depth, max_depth);
        Self::add_to_child(&mut children, &self.bounds, body, depth, max_depth);
        NodeKind::Internal {
            approximation,
            children,
        }
    }

    fn add_to_child(
        children: &mut Children<F, B>,
        bounds: &Bounds<F>,
        body: B,
        depth: usize,
        max_depth: Option<usize>,
    ) {
        let octant = body.octant_index(&bounds.center);
        match &mut children[octant] {
            Some(child) => child.add_body(body, depth + 1, max_depth),
            empty => *empty = Some(Box::new(Self::new(body, bounds.create_octant(octant)))),
        }
    }

    /// Barnes-Hut force on `body` from everything below this node.
    pub(crate) fn force_on(&self, body: &B, theta: F, gravity: &Gravity<F>) -> Vector<F> {
        let approximation = self.approximation();

        // width / distance < theta, without dividing by a zero distance
        if self.bounds.width < theta * body.distance_to(approximation) {
            return body.gravitational_force(approximation, gravity);
        }

        match &self.kind {
            NodeKind::Leaf(other) => body.gravitational_force(other, gravity),
            NodeKind::Internal { children, .. } => children
                .iter()
                .flatten()
                .map(|child| child.force_on(body, theta, gravity))
                .fold(Vector::zeros(), |acc, f| acc + f),
            NodeKind::Bucket { bodies, .. } => bodies
                .iter()
                .map(|other| body.gravitational_force(other, gravity))
                .fold(Vector::zeros(), |acc, f| acc + f),
        }
    }

    /// Level of the deepest node below this one, counting this node as 0.
    pub(crate) fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Internal { children, .. } => {
                1 + children
                    .iter()
                    .flatten()
                    .map(|child| child.depth())
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        match &self.kind {
            NodeKind::Internal { children, .. } => {
                1 + children
                    .iter()
                    .flatten()
                    .map(|child| child.node_count())
                    .sum::<usize>()
            }
            _ => 1,
        }
    }
}
