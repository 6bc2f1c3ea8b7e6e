// This module defines the value types shared by the octree, the brute force reference and the CLI.

mod body;
mod bounds;
mod settings;


pub use body::*;
pub use bounds::*;
pub use settings::*;

use nalgebra::{RealField, SVector};
use num_traits::ToPrimitive;

/// Scalar type the tree is generic over. Implemented for `f32` and `f64`.
pub trait Float: RealField + Copy + ToPrimitive {}

impl<T: RealField + Copy + ToPrimitive> Float for T {}

pub type Vector<F> = SVector<F, 3>;

/// Lossy conversion used for log output and error payloads.
pub(crate) fn to_f64<F: Float>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
