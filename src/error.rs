//! Types for error handling go here.
use crate::volume::element::ComponentType;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum ReshapeError {
        /// An invalid NIfTI-1 header was read.
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// Field has an invalid code.
        InvalidCode(typename: &'static str, code: i16) {
            display("invalid code `{}` for header field {}", code, typename)
        }
        /// The probed component type is outside of the supported set.
        UnknownComponentType(code: i16) {
            display("unknown component type (datatype code {})", code)
        }
        /// The image layout does not fit the requested representation.
        IncompatibleLayout(expected: &'static str, dim: [u16; 8]) {
            display("incompatible image layout: expected {}, found dim {:?}", expected, dim)
        }
        /// The element type requested does not match the one stored in the file.
        ElementTypeMismatch(requested: ComponentType, found: ComponentType) {
            display("requested {} elements, but the volume holds {}", requested, found)
        }
        /// Inconsistent or invalid `dim` field.
        InconsistentDim(index: u8, value: u16) {
            display("inconsistent value `{}` in header field dim[{}]", value, index)
        }
        /// The voxel buffer size does not match the volume's extent.
        IncorrectVolumeSize(expected: usize, got: usize) {
            display("expected {} voxel values, got {}", expected, got)
        }
        /// The `descrip` field can hold at most 80 bytes.
        IncorrectDescriptionLength(len: usize) {
            display("description length ({} bytes) is greater than 80 bytes", len)
        }
        /// Could not reach the separate image file of a header/image pair.
        MissingVolumeFile(err: IOError) {
            source(err)
            display("volume file not found: {}", err)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, ReshapeError>;
