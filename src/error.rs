use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OctreeError {
    /// A force query or enumeration was made before any body was inserted.
    #[error("tree has no bodies")]
    EmptyTree,
    /// Returned by [`Octree::try_insert`](crate::octree::Octree::try_insert) for a body outside
    /// the root cube.
    #[error("body at {position:?} lies outside the root cube of width {width}")]
    OutOfBounds { position: [f64; 3], width: f64 },
}
