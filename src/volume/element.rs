//! This module defines the data element API, which enables the volume
//! readers and writers to decode and encode voxel components of each
//! supported numeric type without any value conversion.
use crate::error::{ReshapeError, Result};
use crate::typedef::NiftiType;
use crate::util::native_endianness;
use byteordered::{ByteOrdered, Endianness};
use bytemuck::Pod;
use num_traits::{FromPrimitive, Zero};
use std::fmt;
use std::io::{self, Read, Write};
use std::mem::size_of;

/// The numeric type of a single voxel component.
///
/// The ten primitive types are the closed set which the converters handle.
/// Every other NIfTI data type (RGB, complex, 128-bit floats) or an
/// unrecognized code is reported as `Unknown`, retaining the raw
/// `datatype` code.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ComponentType {
    /// unsigned 8-bit integer
    U8,
    /// signed 8-bit integer
    I8,
    /// unsigned 16-bit integer
    U16,
    /// signed 16-bit integer
    I16,
    /// unsigned 32-bit integer
    U32,
    /// signed 32-bit integer
    I32,
    /// unsigned 64-bit integer
    U64,
    /// signed 64-bit integer
    I64,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
    /// Anything else, with the raw `datatype` code.
    Unknown(i16),
}

impl ComponentType {
    /// Classify a raw NIfTI `datatype` code.
    pub fn from_datatype(code: i16) -> Self {
        match NiftiType::from_i16(code) {
            Some(NiftiType::Uint8) => ComponentType::U8,
            Some(NiftiType::Int8) => ComponentType::I8,
            Some(NiftiType::Uint16) => ComponentType::U16,
            Some(NiftiType::Int16) => ComponentType::I16,
            Some(NiftiType::Uint32) => ComponentType::U32,
            Some(NiftiType::Int32) => ComponentType::I32,
            Some(NiftiType::Uint64) => ComponentType::U64,
            Some(NiftiType::Int64) => ComponentType::I64,
            Some(NiftiType::Float32) => ComponentType::F32,
            Some(NiftiType::Float64) => ComponentType::F64,
            _ => ComponentType::Unknown(code),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::U8 => f.write_str("u8"),
            ComponentType::I8 => f.write_str("i8"),
            ComponentType::U16 => f.write_str("u16"),
            ComponentType::I16 => f.write_str("i16"),
            ComponentType::U32 => f.write_str("u32"),
            ComponentType::I32 => f.write_str("i32"),
            ComponentType::U64 => f.write_str("u64"),
            ComponentType::I64 => f.write_str("i64"),
            ComponentType::F32 => f.write_str("f32"),
            ComponentType::F64 => f.write_str("f64"),
            ComponentType::Unknown(code) => write!(f, "unknown component type ({})", code),
        }
    }
}

/// Trait type for characterizing a NIfTI data element, implemented for
/// the primitive numeric types which the converters instantiate over.
pub trait DataElement: 'static + Pod + Zero + PartialEq + fmt::Debug + Send + Sync {
    /// The `datatype` mapped to the type T
    const DATA_TYPE: NiftiType;

    /// The component type tag of T.
    const COMPONENT_TYPE: ComponentType;

    /// Read a single element from the given byte source.
    fn read_one<R: Read>(src: &mut ByteOrdered<R, Endianness>) -> io::Result<Self>;

    /// Write a single element in the sink's byte order.
    fn write_one<W: Write>(self, dst: &mut ByteOrdered<W, Endianness>) -> io::Result<()>;

    /// Transform the given data vector into a vector of data elements,
    /// interpreting the bytes in the given byte order.
    fn from_raw_vec(raw: Vec<u8>, endianness: Endianness) -> Result<Vec<Self>> {
        let width = size_of::<Self>();
        if raw.len() % width != 0 {
            return Err(ReshapeError::IncorrectVolumeSize(
                raw.len() / width + 1,
                raw.len() / width,
            ));
        }
        if endianness == native_endianness() {
            return Ok(bytemuck::pod_collect_to_vec(&raw));
        }
        let mut src = ByteOrdered::runtime(&raw[..], endianness);
        (0..raw.len() / width)
            .map(|_| Self::read_one(&mut src).map_err(From::from))
            .collect()
    }

    /// Write a sequence of elements in the given byte order.
    fn write_all_to<W: Write>(data: &[Self], mut dst: W, endianness: Endianness) -> Result<()> {
        if endianness == native_endianness() {
            dst.write_all(bytemuck::cast_slice(data))?;
            return Ok(());
        }
        let mut dst = ByteOrdered::runtime(dst, endianness);
        for v in data {
            v.write_one(&mut dst)?;
        }
        Ok(())
    }
}

macro_rules! impl_data_element {
    ($t:ty, $nifti:ident, $component:ident, $read:ident, $write:ident) => {
        impl DataElement for $t {
            const DATA_TYPE: NiftiType = NiftiType::$nifti;
            const COMPONENT_TYPE: ComponentType = ComponentType::$component;

            fn read_one<R: Read>(src: &mut ByteOrdered<R, Endianness>) -> io::Result<Self> {
                src.$read()
            }

            fn write_one<W: Write>(self, dst: &mut ByteOrdered<W, Endianness>) -> io::Result<()> {
                dst.$write(self)
            }
        }
    };
}

impl_data_element!(u8, Uint8, U8, read_u8, write_u8);
impl_data_element!(i8, Int8, I8, read_i8, write_i8);
impl_data_element!(u16, Uint16, U16, read_u16, write_u16);
impl_data_element!(i16, Int16, I16, read_i16, write_i16);
impl_data_element!(u32, Uint32, U32, read_u32, write_u32);
impl_data_element!(i32, Int32, I32, read_i32, write_i32);
impl_data_element!(u64, Uint64, U64, read_u64, write_u64);
impl_data_element!(i64, Int64, I64, read_i64, write_i64);
impl_data_element!(f32, Float32, F32, read_f32, write_f32);
impl_data_element!(f64, Float64, F64, read_f64, write_f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_types_from_codes() {
        assert_eq!(ComponentType::from_datatype(2), ComponentType::U8);
        assert_eq!(ComponentType::from_datatype(256), ComponentType::I8);
        assert_eq!(ComponentType::from_datatype(1024), ComponentType::I64);
        assert_eq!(ComponentType::from_datatype(64), ComponentType::F64);
        assert_eq!(ComponentType::from_datatype(128), ComponentType::Unknown(128));
        assert_eq!(ComponentType::from_datatype(32), ComponentType::Unknown(32));
        assert_eq!(ComponentType::from_datatype(-7), ComponentType::Unknown(-7));
        assert_eq!(ComponentType::I16.to_string(), "i16");
        assert_eq!(
            ComponentType::from_datatype(<u32 as DataElement>::DATA_TYPE as i16),
            <u32 as DataElement>::COMPONENT_TYPE
        );
    }

    #[test]
    fn decode_both_byte_orders() {
        let le: Vec<u8> = vec![0x01, 0x02, 0xff, 0x7f];
        let values = i16::from_raw_vec(le.clone(), Endianness::Little).unwrap();
        assert_eq!(values, vec![0x0201, 0x7fff]);
        let values = i16::from_raw_vec(le, Endianness::Big).unwrap();
        assert_eq!(values, vec![0x0102, -129]);

        assert!(u32::from_raw_vec(vec![0; 7], Endianness::Little).is_err());
    }

    #[test]
    fn encode_both_byte_orders() {
        let data = [1.5f64, -2.25];
        let mut le = Vec::new();
        f64::write_all_to(&data, &mut le, Endianness::Little).unwrap();
        let mut be = Vec::new();
        f64::write_all_to(&data, &mut be, Endianness::Big).unwrap();
        assert_eq!(&le[..8], &1.5f64.to_le_bytes());
        assert_eq!(&be[8..], &(-2.25f64).to_be_bytes());

        assert_eq!(f64::from_raw_vec(be, Endianness::Big).unwrap(), data.to_vec());
    }
}
