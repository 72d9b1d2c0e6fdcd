//! Loading whole images into the in-memory volume types.
//!
//! Both single files (".nii", ".nii.gz") and header/image pairs (".hdr"
//! plus ".img", either of them optionally gzipped) are accepted. The voxel
//! values are decoded into the requested element type `T`, which must be
//! exactly the type declared by the header.
use crate::affine::{HeaderTransform, SpatialFrame};
use crate::error::{ReshapeError, Result};
use crate::header::{NiftiHeader, HEADER_SIZE};
use crate::probe::ImageInfo;
use crate::util::{into_img_file, into_img_file_gz, is_gz_file, nb_values_for_dim};
use crate::volume::{DataElement, Geometry3, Rescale, ScalarVolume4, VectorVolume};
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::mem::size_of;
use std::path::Path;
use tracing::{debug, trace};

impl<T> VectorVolume<T>
where
    T: DataElement,
{
    /// Read a 3D image of scalars or vectors with components of type `T`.
    ///
    /// # Errors
    ///
    /// - `ElementTypeMismatch` if the file does not hold `T` values;
    /// - `IncompatibleLayout` if the image is not a 3D image (see
    ///   [`ImageInfo::vector_layout`]);
    /// - `MissingVolumeFile` if the image file of a pair is missing;
    /// - `Io` on any other reading failure, including truncated data.
    ///
    /// [`ImageInfo::vector_layout`]: ../probe/struct.ImageInfo.html#method.vector_layout
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, (size, len), raw) = read_image(path.as_ref(), ImageInfo::vector_layout)?;
        let mut volume = VectorVolume::from_raw(spatial_geometry(&header, size), len, raw)?;
        volume.set_rescale(rescale_of(&header));
        volume.set_header_transform(Some(HeaderTransform::from_header(&header)));
        Ok(volume)
    }
}

impl<T> ScalarVolume4<T>
where
    T: DataElement,
{
    /// Read a scalar image of up to 4 dimensions with voxels of type `T`.
    ///
    /// The spacing of the fourth axis is taken from `pixdim[4]` and its
    /// origin from `toffset`. Errors are as in [`VectorVolume::from_file`].
    ///
    /// [`VectorVolume::from_file`]: ../volume/struct.VectorVolume.html#method.from_file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, size, raw) = read_image(path.as_ref(), ImageInfo::scalar4_layout)?;
        let [nx, ny, nz, nt] = size;
        let mut geometry = spatial_geometry(&header, [nx, ny, nz]).with_trailing_axis(nt);
        geometry.origin[3] = f64::from(header.toffset);
        let dt = header.pixdim[4];
        if dt.is_finite() && dt > 0. {
            geometry.spacing[3] = f64::from(dt);
        }
        let mut volume = ScalarVolume4::from_raw(geometry, raw)?;
        volume.set_rescale(rescale_of(&header));
        volume.set_header_transform(Some(HeaderTransform::from_header(&header)));
        Ok(volume)
    }
}

/// Read the header and all voxel values of an image, checking the header
/// with `layout` before any voxel data is touched.
fn read_image<T, L, F>(path: &Path, layout: F) -> Result<(NiftiHeader, L, Vec<T>)>
where
    T: DataElement,
    F: FnOnce(&ImageInfo) -> Result<L>,
{
    let gz = is_gz_file(path);
    let file = BufReader::new(File::open(path)?);
    if gz {
        read_image_2(path, GzDecoder::new(file), layout)
    } else {
        read_image_2(path, file, layout)
    }
}

fn read_image_2<T, L, F, S>(path: &Path, mut stream: S, layout: F) -> Result<(NiftiHeader, L, Vec<T>)>
where
    T: DataElement,
    F: FnOnce(&ImageInfo) -> Result<L>,
    S: Read,
{
    let header = NiftiHeader::from_reader(&mut stream)?;
    let info = ImageInfo::from_header(&header)?;
    if info.component_type != T::COMPONENT_TYPE {
        return Err(ReshapeError::ElementTypeMismatch(
            T::COMPONENT_TYPE,
            info.component_type,
        ));
    }
    let layout = layout(&info)?;
    let len = nb_values_for_dim(&header.dim)?;

    let data = if header.is_single_file() {
        // extender and extensions sit between the header and the voxels
        let offset = (header.vox_offset as u64).saturating_sub(HEADER_SIZE as u64);
        debug!(path = %path.display(), vox_offset = header.vox_offset, "reading single file image");
        read_values(stream, offset, len, &header)?
    } else {
        read_pair_volume(path, len, &header)?
    };
    Ok((header, layout, data))
}

/// Locate and read the image file of a header/image pair. The file with
/// the same compression as the header is tried first.
fn read_pair_volume<T>(hdr_path: &Path, len: usize, header: &NiftiHeader) -> Result<Vec<T>>
where
    T: DataElement,
{
    let gz_path = into_img_file_gz(hdr_path.to_path_buf());
    let plain_path = into_img_file(hdr_path.to_path_buf());
    let candidates = if is_gz_file(hdr_path) {
        [gz_path, plain_path]
    } else {
        [plain_path, gz_path]
    };

    let mut not_found = None;
    for img_path in &candidates {
        match File::open(img_path) {
            Ok(file) => {
                debug!(path = %img_path.display(), "reading image file of pair");
                let file = BufReader::new(file);
                let offset = header.vox_offset as u64;
                return if is_gz_file(img_path) {
                    read_values(GzDecoder::new(file), offset, len, header)
                } else {
                    read_values(file, offset, len, header)
                };
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %img_path.display(), "no image file here");
                not_found = Some(e);
            }
            Err(e) => return Err(ReshapeError::MissingVolumeFile(e)),
        }
    }
    Err(ReshapeError::MissingVolumeFile(
        not_found.unwrap_or_else(|| io::ErrorKind::NotFound.into()),
    ))
}

/// Skip `offset` bytes, then decode exactly `len` values. Missing bytes
/// are an `UnexpectedEof` error.
fn read_values<T, S>(mut stream: S, offset: u64, len: usize, header: &NiftiHeader) -> Result<Vec<T>>
where
    T: DataElement,
    S: Read,
{
    let skipped = io::copy(&mut (&mut stream).take(offset), &mut io::sink())?;
    if skipped < offset {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    let nbytes = len
        .checked_mul(size_of::<T>())
        .ok_or(ReshapeError::IncorrectVolumeSize(len, 0))?;
    let mut raw = Vec::new();
    let _ = stream.take(nbytes as u64).read_to_end(&mut raw)?;
    if raw.len() < nbytes {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    T::from_raw_vec(raw, header.endianness)
}

fn spatial_geometry(header: &NiftiHeader, size: [usize; 3]) -> Geometry3 {
    let frame = SpatialFrame::from_header(header);
    Geometry3 {
        size,
        origin: frame.origin,
        spacing: frame.spacing,
        direction: frame.direction,
    }
}

fn rescale_of(header: &NiftiHeader) -> Rescale {
    Rescale {
        slope: header.scl_slope,
        inter: header.scl_inter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MAGIC_CODE_NI1;
    use crate::typedef::{NiftiType, INTENT_VECTOR};
    use crate::volume::ComponentType;
    use std::io::Write;
    use tempfile::tempdir;

    fn vector_header(datatype: NiftiType) -> NiftiHeader {
        NiftiHeader {
            dim: [5, 2, 2, 1, 1, 2, 1, 1],
            datatype: datatype as i16,
            bitpix: (datatype.size_of() * 8) as i16,
            intent_code: INTENT_VECTOR,
            vox_offset: 352.,
            ..NiftiHeader::default()
        }
    }

    #[test]
    fn single_file_with_extension_padding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("padded.nii");
        let mut header = vector_header(NiftiType::Int16);
        header.vox_offset = 368.;
        header.scl_slope = 2.;
        header.scl_inter = -1.;

        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0xAA; 16]);
        let values: Vec<i16> = (0..8).collect();
        i16::write_all_to(&values, &mut bytes, byteordered::Endianness::Little).unwrap();
        File::create(&path).unwrap().write_all(&bytes).unwrap();

        let volume = VectorVolume::<i16>::from_file(&path).unwrap();
        assert_eq!(volume.geometry().size, [2, 2, 1]);
        assert_eq!(volume.vector_length(), 2);
        assert_eq!(volume.pixel([1, 1, 0]).to_vec(), vec![3, 7]);
        assert_eq!(volume.rescale(), Rescale { slope: 2., inter: -1. });
    }

    #[test]
    fn missing_image_file() {
        let dir = tempdir().unwrap();
        let hdr_path = dir.path().join("lonely.hdr");
        let header = NiftiHeader {
            dim: [3, 2, 2, 2, 1, 1, 1, 1],
            datatype: NiftiType::Uint8 as i16,
            bitpix: 8,
            magic: *MAGIC_CODE_NI1,
            ..NiftiHeader::default()
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        File::create(&hdr_path).unwrap().write_all(&bytes).unwrap();

        match VectorVolume::<u8>::from_file(&hdr_path) {
            Err(ReshapeError::MissingVolumeFile(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn wrong_element_type_and_truncation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.nii");
        let header = vector_header(NiftiType::Float64);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0; 8 * 5]);
        File::create(&path).unwrap().write_all(&bytes).unwrap();

        match VectorVolume::<f32>::from_file(&path) {
            Err(ReshapeError::ElementTypeMismatch(ComponentType::F32, ComponentType::F64)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        match VectorVolume::<f64>::from_file(&path) {
            Err(ReshapeError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(ScalarVolume4::<f64>::from_file(&path).is_err());
    }
}
