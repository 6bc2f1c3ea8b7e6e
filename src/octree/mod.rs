//! Barnes-Hut octree.
//!
//! Bodies are inserted one at a time into an origin-centered cube. Leaves split lazily into
//! internal nodes when a second body arrives, and every internal node keeps the merged aggregate
//! of its subtree up to date along the insertion path. Force queries walk the same tree and treat
//! a subtree as a single body once it looks small enough from the query point:
//!
//! ```text
//! width / distance(query, aggregate) < theta
//! ```

mod iter;
mod node;


pub use iter::Bodies;

use log::debug;

use crate::error::OctreeError;
use crate::shared::{Body, Bounds, Float, TreeSettings, Vector, to_f64};
use node::OctreeNode;

#[derive(Clone, Debug)]
pub struct Octree<F: Float, B: Body<F>> {
    root_extent: F,
    root: Option<OctreeNode<F, B>>,
    settings: TreeSettings<F>,
    len: usize,
}

impl<F: Float, B: Body<F>> Octree<F, B> {
    /// Creates an empty tree whose root cube has side `root_extent` and is centered at the origin.
    ///
    /// The extent is not checked against inserted bodies; see [`Octree::try_insert`].
    pub fn new(root_extent: F) -> Self {
        Self::with_settings(root_extent, TreeSettings::default())
    }

    pub fn with_settings(root_extent: F, settings: TreeSettings<F>) -> Self {
        Self {
            root_extent,
            root: None,
            settings,
            len: 0,
        }
    }

    pub fn from_bodies<I>(root_extent: F, settings: TreeSettings<F>, bodies: I) -> Self
    where
        I: IntoIterator<Item = B>,
    {
        let mut tree = Self::with_settings(root_extent, settings);
        tree.extend(bodies);
        tree
    }

    /// Adds `body` to the tree.
    ///
    /// Bodies outside the root cube are accepted and end up in the outermost cell on their side,
    /// which keeps the aggregates correct but degrades the approximation.
    pub fn insert(&mut self, body: B) {
        let bounds = self.root_bounds();
        if !bounds.contains(body.position()) {
            debug!(
                "inserting body outside the root cube of width {}",
                to_f64(self.root_extent)
            );
        }

        match &mut self.root {
            Some(root) => root.add_body(body, 0, self.settings.max_depth),
            None => {
                debug!("creating root of width {}", to_f64(self.root_extent));
                self.root = Some(OctreeNode::new(body, bounds));
            }
        }
        self.len += 1;
    }

    /// Like [`Octree::insert`] but rejects bodies outside the root cube.
    pub fn try_insert(&mut self, body: B) -> Result<(), OctreeError> {
        let position = body.position();
        if !self.root_bounds().contains(position) {
            return Err(OctreeError::OutOfBounds {
                position: [to_f64(position.x), to_f64(position.y), to_f64(position.z)],
                width: to_f64(self.root_extent),
            });
        }
        self.insert(body);
        Ok(())
    }

    /// Approximate force on `body` from every body in the tree, using the configured opening
    /// angle.
    ///
    /// There is no self exclusion: if `body` was inserted it also acts on itself.
    pub fn force_on(&self, body: &B) -> Result<Vector<F>, OctreeError> {
        self.force_on_with_theta(body, self.settings.theta)
    }

    pub fn force_on_with_theta(&self, body: &B, theta: F) -> Result<Vector<F>, OctreeError> {
        let root = self.root.as_ref().ok_or(OctreeError::EmptyTree)?;
        Ok(root.force_on(body, theta, &self.settings.gravity))
    }

    /// Depth-first iterator over every inserted body.
    pub fn iter(&self) -> Result<Bodies<'_, F, B>, OctreeError> {
        let root = self.root.as_ref().ok_or(OctreeError::EmptyTree)?;
        Ok(Bodies::new(root))
    }

    /// Merged aggregate of every inserted body.
    pub fn aggregate(&self) -> Option<&B> {
        self.root.as_ref().map(|root| root.approximation())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_extent(&self) -> F {
        self.root_extent
    }

    pub fn root_bounds(&self) -> Bounds<F> {
        Bounds::root(self.root_extent)
    }

    pub fn settings(&self) -> &TreeSettings<F> {
        &self.settings
    }

    /// Query parameters can change at any time. A new `max_depth` only affects later insertions.
    pub fn settings_mut(&mut self) -> &mut TreeSettings<F> {
        &mut self.settings
    }

    /// Level of the deepest node, with the root at 0.
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.depth())
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.node_count())
    }
}

impl<F: Float, B: Body<F>> Extend<B> for Octree<F, B> {
    fn extend<I: IntoIterator<Item = B>>(&mut self, bodies: I) {
        for body in bodies {
            self.insert(body);
        }
    }
}
