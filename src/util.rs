//! Private utility module
use std::path::{Path, PathBuf};

use crate::error::{ReshapeError, Result};

pub use byteordered::Endianness;

/// Obtain this system's endianness
#[cfg(target_endian = "little")]
pub fn native_endianness() -> Endianness {
    Endianness::Little
}

/// Obtain this system's endianness
#[cfg(target_endian = "big")]
pub fn native_endianness() -> Endianness {
    Endianness::Big
}

/// Validate a raw N-dimensional shape: `dim[0]` must be a rank between
/// 1 and 7, and every used dimension must be non-zero. On success, the
/// used part of the shape (`dim[1..=dim[0]]`) is returned.
pub fn validate_dim(raw_dim: &[u16; 8]) -> Result<&[u16]> {
    let ndim = raw_dim[0];
    if ndim == 0 || ndim > 7 {
        return Err(ReshapeError::InconsistentDim(0, ndim));
    }
    let dim = &raw_dim[1..=usize::from(ndim)];
    if let Some(i) = dim.iter().position(|&d| d == 0) {
        return Err(ReshapeError::InconsistentDim(i as u8 + 1, 0));
    }
    Ok(dim)
}

/// Number of values stored in a volume of the given raw shape.
pub fn nb_values_for_dim(raw_dim: &[u16; 8]) -> Result<usize> {
    validate_dim(raw_dim)?
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(usize::from(*d)))
        .ok_or(ReshapeError::InconsistentDim(0, raw_dim[0]))
}

/// Whether the file name ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .extension()
        .map(|a| a.to_string_lossy() == "gz")
        .unwrap_or(false)
}

/// Whether the path names the header of a header/image pair
/// (".hdr" or ".hdr.gz").
pub fn is_hdr_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| {
            let name = a.to_string_lossy();
            name.ends_with(".hdr") || name.ends_with(".hdr.gz")
        })
        .unwrap_or(false)
}

/// Convert a file path to a header file (.hdr or .hdr.gz) to
/// the respective volume file with GZip compression (.img.gz).
pub fn into_img_file_gz(mut path: PathBuf) -> PathBuf {
    if is_gz_file(&path) {
        // Leave only the first extension (.hdr)
        let _ = path.set_extension("");
    }
    path.with_extension("img.gz")
}

/// Convert a file path to a header file (.hdr or .hdr.gz) to
/// the respective uncompressed volume file (.img).
pub fn into_img_file(mut path: PathBuf) -> PathBuf {
    if is_gz_file(&path) {
        let _ = path.set_extension("");
    }
    path.with_extension("img")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn filenames() {
        assert!(!is_gz_file("/path/to/something.nii"));
        assert!(is_gz_file("/path/to/something.nii.gz"));
        assert!(!is_gz_file("volume.not-gz"));
        assert!(!is_gz_file("/path/to/.gz"));
        assert!(is_gz_file("1.2.3.nii.gz"));
        assert!(is_gz_file("\\some\\thing\\t.gz"));

        assert!(is_hdr_file("/path/to/something.hdr"));
        assert!(is_hdr_file("/path/to/something.hdr.gz"));
        assert!(!is_hdr_file("/path/to/something.nii.gz"));

        assert_eq!(
            into_img_file_gz(PathBuf::from("/path/to/image.hdr")),
            PathBuf::from("/path/to/image.img.gz")
        );
        assert_eq!(
            into_img_file_gz(PathBuf::from("/path/to/image.hdr.gz")),
            PathBuf::from("/path/to/image.img.gz")
        );
        assert_eq!(
            into_img_file(PathBuf::from("/path/to/image.hdr.gz")),
            PathBuf::from("/path/to/image.img")
        );
    }

    #[test]
    fn dims() {
        assert_eq!(validate_dim(&[3, 4, 5, 6, 0, 0, 0, 0]).unwrap(), &[4, 5, 6]);
        assert!(validate_dim(&[0, 4, 5, 6, 0, 0, 0, 0]).is_err());
        assert!(validate_dim(&[8, 1, 1, 1, 1, 1, 1, 1]).is_err());
        assert!(validate_dim(&[3, 4, 0, 6, 0, 0, 0, 0]).is_err());
        assert_eq!(nb_values_for_dim(&[5, 4, 4, 4, 1, 3, 0, 0]).unwrap(), 192);
    }
}
