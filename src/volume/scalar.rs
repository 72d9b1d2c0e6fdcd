use super::element::DataElement;
use super::geometry::Geometry4;
use super::Rescale;
use crate::affine::HeaderTransform;
use crate::error::{ReshapeError, Result};
use ndarray::{Array4, ShapeBuilder};

/// A 4D image of scalar voxels of type `T`.
#[derive(Debug, Clone)]
pub struct ScalarVolume4<T> {
    geometry: Geometry4,
    rescale: Rescale,
    transform: Option<HeaderTransform>,
    data: Array4<T>,
}

impl<T> ScalarVolume4<T>
where
    T: DataElement,
{
    /// Allocate a volume with every voxel set to zero.
    pub fn new(geometry: Geometry4) -> Self {
        let [nx, ny, nz, nt] = geometry.size;
        ScalarVolume4 {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data: Array4::zeros((nx, ny, nz, nt).f()),
        }
    }

    /// Build a volume from voxel values in NIfTI order (first axis fastest).
    pub fn from_raw(geometry: Geometry4, raw: Vec<T>) -> Result<Self> {
        let [nx, ny, nz, nt] = geometry.size;
        let expected = geometry.voxel_count();
        if raw.len() != expected {
            return Err(ReshapeError::IncorrectVolumeSize(expected, raw.len()));
        }
        let data = Array4::from_shape_vec((nx, ny, nz, nt).f(), raw)
            .map_err(|_| ReshapeError::IncorrectVolumeSize(expected, expected))?;
        Ok(ScalarVolume4 {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data,
        })
    }

    /// Build a volume from an array with the geometry's shape.
    pub fn from_array(geometry: Geometry4, data: Array4<T>) -> Result<Self> {
        if data.shape() != &geometry.size[..] {
            return Err(ReshapeError::IncorrectVolumeSize(
                geometry.voxel_count(),
                data.len(),
            ));
        }
        Ok(ScalarVolume4 {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data,
        })
    }

    /// The grid of this image.
    pub fn geometry(&self) -> &Geometry4 {
        &self.geometry
    }

    /// The intensity scaling to be written along with the values.
    pub fn rescale(&self) -> Rescale {
        self.rescale
    }

    /// Replace the intensity scaling.
    pub fn set_rescale(&mut self, rescale: Rescale) {
        self.rescale = rescale;
    }

    /// The header coordinate fields this image was read with, if any.
    pub fn header_transform(&self) -> Option<&HeaderTransform> {
        self.transform.as_ref()
    }

    /// Replace the header coordinate fields kept for writing. They are only
    /// written out while they still describe the image geometry.
    pub fn set_header_transform(&mut self, transform: Option<HeaderTransform>) {
        self.transform = transform;
    }

    /// The voxel value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, index: [usize; 4]) -> T {
        self.data[index]
    }

    /// Overwrite the voxel value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, index: [usize; 4], value: T) {
        self.data[index] = value;
    }

    /// The voxels, indexed by `[x, y, z, t]`.
    pub fn data(&self) -> &Array4<T> {
        &self.data
    }
}

/// The kept header coordinate fields do not take part in comparisons.
impl<T: PartialEq> PartialEq for ScalarVolume4<T> {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry && self.rescale == other.rescale && self.data == other.data
    }
}
