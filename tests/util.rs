use nifti_reshape::{
    header::{MAGIC_CODE_NI1, MAGIC_CODE_NIP1},
    DataElement, Endianness, Geometry3, NiftiHeader, NiftiType, VectorVolume,
};
use num_traits::FromPrimitive;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory, removed when dropped, and a path inside it.
#[allow(dead_code)]
pub fn get_temporary_path(ext: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ext);
    (dir, path)
}

/// A 4×4×4 field of 3-vectors whose component `i` at `(x, y, z)` holds
/// `x + y + z + i`.
#[allow(dead_code)]
pub fn coordinate_sum_field<T>() -> VectorVolume<T>
where
    T: DataElement + FromPrimitive,
{
    let mut volume = VectorVolume::new(Geometry3::new([4, 4, 4]), 3);
    for x in 0..4 {
        for y in 0..4 {
            for z in 0..4 {
                let mut pixel = volume.pixel_mut([x, y, z]);
                for i in 0..3 {
                    pixel[i] = T::from_usize(x + y + z + i).unwrap();
                }
            }
        }
    }
    volume
}

/// Header of a 5D vector image as produced by ITK style writers.
#[allow(dead_code)]
pub fn vector_header(size: [u16; 3], len: u16, datatype: NiftiType) -> NiftiHeader {
    NiftiHeader {
        dim: [5, size[0], size[1], size[2], 1, len, 1, 1],
        datatype: datatype as i16,
        bitpix: (datatype.size_of() * 8) as i16,
        intent_code: 1007,
        vox_offset: 352.,
        magic: *MAGIC_CODE_NIP1,
        ..NiftiHeader::default()
    }
}

/// Header of a scalar image with the given `dim`.
#[allow(dead_code)]
pub fn scalar_header(dim: [u16; 8], datatype: NiftiType) -> NiftiHeader {
    NiftiHeader {
        dim,
        datatype: datatype as i16,
        bitpix: (datatype.size_of() * 8) as i16,
        vox_offset: 352.,
        magic: *MAGIC_CODE_NIP1,
        ..NiftiHeader::default()
    }
}

/// Write a single file image made of `header` (always little endian) and
/// the given voxel bytes.
#[allow(dead_code)]
pub fn write_single_file(path: &Path, header: &NiftiHeader, voxels: &[u8]) {
    let mut bytes = Vec::new();
    header.write_to(&mut bytes).unwrap();
    bytes.extend_from_slice(voxels);
    File::create(path).unwrap().write_all(&bytes).unwrap();
}

/// Write a header/image pair in big endian, header included.
#[allow(dead_code)]
pub fn write_big_endian_pair<T>(hdr_path: &Path, header: &NiftiHeader, values: &[T])
where
    T: DataElement,
{
    let header = NiftiHeader {
        magic: *MAGIC_CODE_NI1,
        vox_offset: 0.,
        ..header.clone()
    };
    let mut le = Vec::new();
    header.write_to(&mut le).unwrap();
    File::create(hdr_path)
        .unwrap()
        .write_all(&swap_header_to_big_endian(&le))
        .unwrap();

    let mut img = Vec::new();
    T::write_all_to(values, &mut img, Endianness::Big).unwrap();
    File::create(hdr_path.with_extension("img"))
        .unwrap()
        .write_all(&img)
        .unwrap();
}

/// Re-encode a little endian NIfTI-1 header in big endian.
fn swap_header_to_big_endian(le: &[u8]) -> Vec<u8> {
    // (offset, width) of every multi-byte numeric field
    let mut fields: Vec<(usize, usize)> = vec![(0, 4), (32, 4), (36, 2)];
    fields.extend((0..8).map(|i| (40 + 2 * i, 2)));
    fields.extend((0..3).map(|i| (56 + 4 * i, 4)));
    fields.extend((0..4).map(|i| (68 + 2 * i, 2)));
    fields.extend((0..11).map(|i| (76 + 4 * i, 4)));
    fields.push((120, 2));
    fields.extend((0..6).map(|i| (124 + 4 * i, 4)));
    fields.extend((0..2).map(|i| (252 + 2 * i, 2)));
    fields.extend((0..18).map(|i| (256 + 4 * i, 4)));

    let mut be = le.to_vec();
    for (offset, width) in fields {
        be[offset..offset + width].reverse();
    }
    be
}
