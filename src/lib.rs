pub mod brute_force;
pub mod error;
pub mod octree;
pub mod shared;

pub use error::OctreeError;
pub use octree::Octree;
