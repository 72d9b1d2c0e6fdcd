//! Header-only inspection of image files.
//!
//! Probing reads the 348 byte header and nothing else, so it succeeds on
//! files whose voxel data is truncated or missing.
use crate::error::{ReshapeError, Result};
use crate::header::NiftiHeader;
use crate::util::validate_dim;
use crate::volume::ComponentType;
use std::path::Path;
use tracing::debug;

/// What one voxel holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// A single component.
    Scalar,
    /// A fixed-length vector of components (the product of `dim[5..]`
    /// up to the last axis longer than 1).
    Vector(usize),
}

/// The result of probing an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Numeric type of each voxel component.
    pub component_type: ComponentType,
    /// Scalar or vector voxels.
    pub pixel: PixelKind,
    /// The raw `dim` field, validated.
    pub dim: [u16; 8],
}

/// Read the header of the image at `path` and describe its voxels.
///
/// # Errors
///
/// Fails only if the header cannot be read or is not a valid NIfTI-1
/// header. Unsupported data types are not an error at this stage: they are
/// reported as [`ComponentType::Unknown`].
///
/// [`ComponentType::Unknown`]: ../volume/element/enum.ComponentType.html
pub fn probe_image<P: AsRef<Path>>(path: P) -> Result<ImageInfo> {
    let header = NiftiHeader::from_file(path.as_ref())?;
    let info = ImageInfo::from_header(&header)?;
    debug!(
        path = %path.as_ref().display(),
        component = %info.component_type,
        pixel = ?info.pixel,
        "probed image header"
    );
    Ok(info)
}

impl ImageInfo {
    /// Describe the voxels declared by a header.
    pub fn from_header(header: &NiftiHeader) -> Result<Self> {
        let _ = validate_dim(&header.dim)?;
        let mut info = ImageInfo {
            component_type: ComponentType::from_datatype(header.datatype),
            pixel: PixelKind::Scalar,
            dim: header.dim,
        };
        let rank = info.effective_rank();
        if rank >= 5 {
            info.pixel =
                PixelKind::Vector(info.dim[5..=rank].iter().map(|&d| usize::from(d)).product());
        }
        Ok(info)
    }

    /// The rank of the image (`dim[0]`).
    pub fn rank(&self) -> usize {
        usize::from(self.dim[0])
    }

    /// The image extent, `dim[1..=dim[0]]`.
    pub fn extent(&self) -> &[u16] {
        &self.dim[1..=self.rank()]
    }

    /// The rank once trailing axes of size 1 are ignored, at least 1.
    pub fn effective_rank(&self) -> usize {
        let mut rank = self.rank();
        while rank > 1 && self.dim[rank] == 1 {
            rank -= 1;
        }
        rank
    }

    /// Interpret the image as a 3D vector image, returning the spatial
    /// size and the vector length.
    ///
    /// Trailing axes of size 1 are ignored. Scalar images of up to 3
    /// dimensions are vector images of length 1. Vector images must have a
    /// single position along the fourth axis and no axes beyond the fifth.
    pub fn vector_layout(&self) -> Result<([usize; 3], usize)> {
        let d = |i: usize| usize::from(self.dim[i]);
        match self.effective_rank() {
            1 => Ok(([d(1), 1, 1], 1)),
            2 => Ok(([d(1), d(2), 1], 1)),
            3 => Ok(([d(1), d(2), d(3)], 1)),
            5 if d(4) == 1 => Ok(([d(1), d(2), d(3)], d(5))),
            _ => Err(ReshapeError::IncompatibleLayout(
                "a 3D image of scalars or vectors",
                self.dim,
            )),
        }
    }

    /// Interpret the image as a 4D scalar image, returning its size.
    ///
    /// Trailing axes of size 1 are ignored, and images of fewer than 4
    /// dimensions are padded with axes of size 1.
    pub fn scalar4_layout(&self) -> Result<[usize; 4]> {
        let d = |i: usize| usize::from(self.dim[i]);
        match self.effective_rank() {
            1 => Ok([d(1), 1, 1, 1]),
            2 => Ok([d(1), d(2), 1, 1]),
            3 => Ok([d(1), d(2), d(3), 1]),
            4 => Ok([d(1), d(2), d(3), d(4)]),
            _ => Err(ReshapeError::IncompatibleLayout(
                "a scalar image of up to 4 dimensions",
                self.dim,
            )),
        }
    }
}
