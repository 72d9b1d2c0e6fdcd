//! Reshaping of NIfTI-1 images between two layouts of the same data:
//! 3D images whose voxels are fixed-length vectors, and 4D images of
//! scalars whose fourth axis enumerates the vector components.
//!
//! The crate contains a small NIfTI-1 codec (header parsing, whole-volume
//! reading, writing), the in-memory volume types, the two conversions and
//! the command line front end of the `img3d-to-4d` and `img4d-to-3d`
//! tools.
//!
//! # Example
//!
//! ```no_run
//! use nifti_reshape::{vector_to_scalar, VectorVolume, WriterOptions};
//! # use nifti_reshape::Result;
//!
//! # fn run() -> Result<()> {
//! let field = VectorVolume::<f32>::from_file("displacement.nii.gz")?;
//! let series = vector_to_scalar(&field);
//! WriterOptions::new("components.nii.gz").write_scalar_volume(&series)?;
//! # Ok(())
//! # }
//! ```
//!
//! When the element type is only known at run time, probe the file first
//! and [dispatch](dispatch/index.html) on its component type, as
//! [`Conversion`](convert/struct.Conversion.html) does.
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod affine;
pub mod cli;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod header;
pub mod probe;
mod reader;
pub mod typedef;
mod util;
pub mod volume;
pub mod writer;

pub use crate::convert::{scalar_to_vector, vector_to_scalar, Conversion, Direction};
pub use crate::dispatch::ComponentVisitor;
pub use crate::error::{ReshapeError, Result};
pub use crate::affine::HeaderTransform;
pub use crate::header::NiftiHeader;
pub use crate::probe::{probe_image, ImageInfo, PixelKind};
pub use crate::typedef::NiftiType;
pub use crate::util::Endianness;
pub use crate::volume::{
    ComponentType, DataElement, Geometry3, Geometry4, Rescale, ScalarVolume4, VectorVolume,
};
pub use crate::writer::WriterOptions;
