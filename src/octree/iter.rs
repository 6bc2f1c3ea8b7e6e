use std::iter::FusedIterator;

use super::node::{NodeKind, OctreeNode};
use crate::shared::Float;

/// Depth-first iterator over the real bodies stored in an [`Octree`](super::Octree).
///
/// Children are visited in octant order. Aggregates of internal nodes are never yielded.
pub struct Bodies<'a, F: Float, B> {
    stack: Vec<&'a OctreeNode<F, B>>,
    bucket: std::slice::Iter<'a, B>,
}

impl<'a, F: Float, B> Bodies<'a, F, B> {
    pub(crate) fn new(root: &'a OctreeNode<F, B>) -> Self {
        Self {
            stack: vec![root],
            bucket: Default::default(),
        }
    }
}

impl<'a, F: Float, B> Iterator for Bodies<'a, F, B> {
    type Item = &'a B;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(body) = self.bucket.next() {
                return Some(body);
            }
            let node = self.stack.pop()?;
            match &node.kind {
                NodeKind::Leaf(body) => return Some(body),
                NodeKind::Internal { children, .. } => {
                    // reversed so the lowest octant is popped first
                    self.stack
                        .extend(children.iter().rev().flatten().map(|child| &**child));
                }
                NodeKind::Bucket { bodies, .. } => self.bucket = bodies.iter(),
            }
        }
    }
}

impl<F: Float, B> FusedIterator for Bodies<'_, F, B> {}
