//! This module defines the two in-memory volume representations handled
//! by the converters: 3D images of fixed-length vectors, and 4D images of
//! scalars.
//!
//! Both keep their voxels in an owned `ndarray` array of rank 4 in column
//! major (Fortran) order, which is also the order in which NIfTI persists
//! them. In a [`VectorVolume`] the last axis is the vector component, in a
//! [`ScalarVolume4`] it is the fourth image axis.
//!
//! [`VectorVolume`]: ./struct.VectorVolume.html
//! [`ScalarVolume4`]: ./struct.ScalarVolume4.html

pub mod element;
pub mod geometry;
mod scalar;
mod vector;

pub use self::element::{ComponentType, DataElement};
pub use self::geometry::{Geometry, Geometry3, Geometry4};
pub use self::scalar::ScalarVolume4;
pub use self::vector::VectorVolume;

/// Linear intensity scaling attached to the stored values
/// (`scl_slope`, `scl_inter`).
///
/// Stored values are never transformed by this crate. The scaling is kept
/// alongside the volume so that it reaches the output header unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    /// Data scaling: slope. Zero means no scaling.
    pub slope: f32,
    /// Data scaling: offset
    pub inter: f32,
}

impl Default for Rescale {
    fn default() -> Self {
        Rescale {
            slope: 0.,
            inter: 0.,
        }
    }
}
