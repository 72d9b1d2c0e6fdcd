use super::element::DataElement;
use super::geometry::Geometry3;
use super::Rescale;
use crate::affine::HeaderTransform;
use crate::error::{ReshapeError, Result};
use ndarray::{s, Array4, ArrayView1, ArrayViewMut1, ShapeBuilder};

/// A 3D image whose voxels are vectors of `vector_length()` components of
/// type `T`.
#[derive(Debug, Clone)]
pub struct VectorVolume<T> {
    geometry: Geometry3,
    rescale: Rescale,
    transform: Option<HeaderTransform>,
    data: Array4<T>,
}

impl<T> VectorVolume<T>
where
    T: DataElement,
{
    /// Allocate a volume with every component set to zero.
    pub fn new(geometry: Geometry3, vector_length: usize) -> Self {
        let [nx, ny, nz] = geometry.size;
        VectorVolume {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data: Array4::zeros((nx, ny, nz, vector_length).f()),
        }
    }

    /// Build a volume from component values in NIfTI order: the first
    /// spatial axis varies fastest and the vector component slowest.
    pub fn from_raw(geometry: Geometry3, vector_length: usize, raw: Vec<T>) -> Result<Self> {
        let [nx, ny, nz] = geometry.size;
        let expected = geometry.voxel_count() * vector_length;
        if raw.len() != expected {
            return Err(ReshapeError::IncorrectVolumeSize(expected, raw.len()));
        }
        let data = Array4::from_shape_vec((nx, ny, nz, vector_length).f(), raw)
            .map_err(|_| ReshapeError::IncorrectVolumeSize(expected, expected))?;
        Ok(VectorVolume {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data,
        })
    }

    /// Build a volume from an array of shape `[nx, ny, nz, vector_length]`.
    pub fn from_array(geometry: Geometry3, data: Array4<T>) -> Result<Self> {
        let [nx, ny, nz] = geometry.size;
        let shape = data.shape();
        if shape[..3] != [nx, ny, nz][..] {
            return Err(ReshapeError::IncorrectVolumeSize(
                geometry.voxel_count(),
                shape[..3].iter().product(),
            ));
        }
        Ok(VectorVolume {
            geometry,
            rescale: Rescale::default(),
            transform: None,
            data,
        })
    }

    /// The spatial grid of this image.
    pub fn geometry(&self) -> &Geometry3 {
        &self.geometry
    }

    /// Number of components in each voxel.
    pub fn vector_length(&self) -> usize {
        self.data.len_of(ndarray::Axis(3))
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

    /// The vector at the given spatial index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn pixel(&self, [x, y, z]: [usize; 3]) -> ArrayView1<'_, T> {
        self.data.slice(s![x, y, z, ..])
    }

    /// Mutable access to the vector at the given spatial index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn pixel_mut(&mut self, [x, y, z]: [usize; 3]) -> ArrayViewMut1<'_, T> {
        self.data.slice_mut(s![x, y, z, ..])
    }

    /// Iterate over all spatial indices along with their vectors.
    pub fn indexed_pixels(&self) -> impl Iterator<Item = ([usize; 3], ArrayView1<'_, T>)> + '_ {
        let [nx, ny, nz] = self.geometry.size;
        ndarray::indices((nx, ny, nz))
            .into_iter()
            .map(move |(x, y, z)| ([x, y, z], self.pixel([x, y, z])))
    }

    /// The components, indexed by `[x, y, z, component]`.
    pub fn data(&self) -> &Array4<T> {
        &self.data
    }
}

/// The kept header coordinate fields do not take part in comparisons.
impl<T: PartialEq> PartialEq for VectorVolume<T> {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry && self.rescale == other.rescale && self.data == other.data
    }
}
