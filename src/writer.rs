//! Utility functions to write nifti images.
//!
//! The output format follows the file name: ".nii" and ".nii.gz" produce a
//! single file, ".hdr" and ".hdr.gz" a header/image pair. Names ending in
//! ".gz" are GZip compressed. Headers and voxels are always written in
//! little endian.
//!
//! A volume read from a file is written with the qform and sform it was
//! read with, as long as they still describe its geometry. Otherwise both
//! forms are computed from the geometry and marked as scanner anatomical.

use crate::affine::{HeaderTransform, SpatialFrame};
use crate::error::{ReshapeError, Result};
use crate::header::{NiftiHeader, MAGIC_CODE_NI1, MAGIC_CODE_NIP1, SINGLE_FILE_VOX_OFFSET};
use crate::typedef::INTENT_VECTOR;
use crate::util::{into_img_file, into_img_file_gz, is_gz_file, is_hdr_file, Endianness};
use crate::volume::{DataElement, Geometry3, Rescale, ScalarVolume4, VectorVolume};
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{Array4, Axis};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem::size_of;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `xyzt_units`: millimetres in space, seconds in time.
const UNITS_MM_SEC: u8 = 2 | 8;

/// Options and destination for writing an image.
///
/// # Example
///
/// ```no_run
/// use nifti_reshape::{Geometry3, VectorVolume, WriterOptions};
/// # fn run() -> nifti_reshape::Result<()> {
/// let volume = VectorVolume::<f32>::new(Geometry3::new([8, 8, 8]), 3);
/// WriterOptions::new("field.nii.gz")
///     .description("displacement field")
///     .write_vector_volume(&volume)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WriterOptions {
    path: PathBuf,
    compression: Compression,
    description: Vec<u8>,
}

impl WriterOptions {
    /// Write to the given path, with default compression and no description.
    pub fn new<P>(path: P) -> WriterOptions
    where
        P: AsRef<Path>,
    {
        WriterOptions {
            path: path.as_ref().to_path_buf(),
            compression: Compression::default(),
            description: Vec::new(),
        }
    }

    /// Compression level for ".gz" outputs. Ignored otherwise.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Text for the `descrip` header field (at most 80 bytes).
    pub fn description<D>(mut self, description: D) -> Self
    where
        D: AsRef<[u8]>,
    {
        self.description = description.as_ref().to_vec();
        self
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a 3D image of vectors.
    ///
    /// The image is stored as a 5D NIfTI image with a single position along
    /// the fourth axis and the vector components along the fifth, with the
    /// vector intent code.
    pub fn write_vector_volume<T>(&self, volume: &VectorVolume<T>) -> Result<()>
    where
        T: DataElement,
    {
        let [nx, ny, nz] = volume.geometry().size;
        let len = volume.vector_length();
        let mut header = self.base_header::<T>(
            [5, nx, ny, nz, 1, len, 1, 1],
            volume.geometry(),
            volume.header_transform(),
            volume.rescale(),
        )?;
        header.intent_code = INTENT_VECTOR;
        info!(
            path = %self.path.display(),
            size = ?volume.geometry().size,
            vector_length = len,
            component = %T::COMPONENT_TYPE,
            "writing vector image"
        );
        self.write_image(&header, volume.data())
    }

    /// Write a 4D image of scalars.
    ///
    /// The fourth axis spacing goes to `pixdim[4]` and its origin to
    /// `toffset`. Any coupling between the fourth axis and the spatial axes
    /// in the direction matrix cannot be represented and is dropped.
    pub fn write_scalar_volume<T>(&self, volume: &ScalarVolume4<T>) -> Result<()>
    where
        T: DataElement,
    {
        let geometry = volume.geometry();
        let [nx, ny, nz, nt] = geometry.size;
        let (spatial, _) = geometry.split_trailing_axis();
        let coupled = (0..3).any(|i| {
            geometry.direction[(i, 3)] != 0. || geometry.direction[(3, i)] != 0.
        });
        if coupled {
            warn!("orientation of the fourth axis is not representable, keeping the spatial part");
        }

        let mut header = self.base_header::<T>(
            [4, nx, ny, nz, nt, 1, 1, 1],
            &spatial,
            volume.header_transform(),
            volume.rescale(),
        )?;
        header.pixdim[4] = geometry.spacing[3] as f32;
        header.toffset = geometry.origin[3] as f32;
        info!(
            path = %self.path.display(),
            size = ?geometry.size,
            component = %T::COMPONENT_TYPE,
            "writing 4D scalar image"
        );
        self.write_image(&header, volume.data())
    }

    fn base_header<T>(
        &self,
        shape: [usize; 8],
        geometry: &Geometry3,
        transform: Option<&HeaderTransform>,
        rescale: Rescale,
    ) -> Result<NiftiHeader>
    where
        T: DataElement,
    {
        let mut dim = [1u16; 8];
        for (i, (d, &s)) in dim.iter_mut().zip(&shape).enumerate() {
            *d = match s {
                0 => return Err(ReshapeError::InconsistentDim(i as u8, 0)),
                s if s > i16::MAX as usize => {
                    return Err(ReshapeError::InconsistentDim(i as u8, u16::MAX))
                }
                s => s as u16,
            };
        }

        let mut header = NiftiHeader {
            dim,
            datatype: T::DATA_TYPE as i16,
            bitpix: (size_of::<T>() * 8) as i16,
            scl_slope: rescale.slope,
            scl_inter: rescale.inter,
            xyzt_units: UNITS_MM_SEC,
            ..NiftiHeader::default()
        };
        header.set_description(&self.description)?;
        let frame = SpatialFrame {
            origin: geometry.origin,
            spacing: geometry.spacing,
            direction: geometry.direction,
        };
        match transform {
            Some(fields) if fields.frame() == frame => {
                debug!("keeping the coordinate fields of the input header");
                fields.write_to_header(&mut header);
            }
            _ => frame.write_to_header(&mut header),
        }
        Ok(header)
    }

    fn write_image<T>(&self, header: &NiftiHeader, data: &Array4<T>) -> Result<()>
    where
        T: DataElement,
    {
        let mut header = header.clone();
        if is_hdr_file(&self.path) {
            header.magic = *MAGIC_CODE_NI1;
            header.vox_offset = 0.;
            let img_path = if is_gz_file(&self.path) {
                into_img_file_gz(self.path.clone())
            } else {
                into_img_file(self.path.clone())
            };
            debug!(header = %self.path.display(), image = %img_path.display(), "writing file pair");
            self.with_sink(&self.path, |w| header.write_to(w))?;
            self.with_sink(&img_path, |w| write_data(w, data))
        } else {
            header.magic = *MAGIC_CODE_NIP1;
            header.vox_offset = SINGLE_FILE_VOX_OFFSET;
            self.with_sink(&self.path, |w| {
                header.write_to(&mut *w)?;
                write_data(w, data)
            })
        }
    }

    /// Create `path` and hand a (possibly compressing) writer to `f`.
    fn with_sink<F>(&self, path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let writer = BufWriter::new(File::create(path)?);
        if is_gz_file(path) {
            let mut e = GzEncoder::new(writer, self.compression);
            f(&mut e)?;
            let mut writer = e.finish()?;
            writer.flush()?;
        } else {
            let mut writer = writer;
            f(&mut writer)?;
            writer.flush()?;
        }
        Ok(())
    }
}

/// Write the values in NIfTI order, first axis fastest. The data is
/// written one slice of the last axis at a time.
fn write_data<T>(writer: &mut dyn Write, data: &Array4<T>) -> Result<()>
where
    T: DataElement,
{
    // the transpose of a column major array is row major
    let data = data.t();
    for slice in data.axis_iter(Axis(0)) {
        match slice.as_slice() {
            Some(values) => T::write_all_to(values, &mut *writer, Endianness::Little)?,
            None => {
                let values: Vec<T> = slice.iter().cloned().collect();
                T::write_all_to(&values, &mut *writer, Endianness::Little)?
            }
        }
    }
    Ok(())
}
