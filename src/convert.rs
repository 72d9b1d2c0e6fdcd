//! The two reshaping conversions between 3D vector images and 4D scalar
//! images, and the file-to-file driver used by the command line tools.
//!
//! Component `i` of the vector at spatial index `(x, y, z)` corresponds to
//! the scalar at `(x, y, z, i)`. Values are copied without conversion, and
//! the geometry of the three spatial axes is carried over unchanged.
use crate::dispatch::ComponentVisitor;
use crate::error::Result;
use crate::probe::probe_image;
use crate::volume::{DataElement, ScalarVolume4, VectorVolume};
use crate::writer::WriterOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Spread the components of each vector along a new fourth axis.
///
/// The new axis has origin 0, spacing 1 and the vector length as its size.
pub fn vector_to_scalar<T>(input: &VectorVolume<T>) -> ScalarVolume4<T>
where
    T: DataElement,
{
    let len = input.vector_length();
    let mut output = ScalarVolume4::new(input.geometry().with_trailing_axis(len));
    for ([x, y, z], pixel) in input.indexed_pixels() {
        for (i, &value) in pixel.iter().enumerate() {
            output.set([x, y, z, i], value);
        }
    }
    output.set_rescale(input.rescale());
    output.set_header_transform(input.header_transform().copied());
    output
}

/// Gather the values along the fourth axis into one vector per spatial
/// index. The origin and spacing of the fourth axis are discarded.
pub fn scalar_to_vector<T>(input: &ScalarVolume4<T>) -> VectorVolume<T>
where
    T: DataElement,
{
    let (geometry, len) = input.geometry().split_trailing_axis();
    let mut output = VectorVolume::new(geometry, len);
    for ((x, y, z, i), &value) in input.data().indexed_iter() {
        let mut pixel = output.pixel_mut([x, y, z]);
        pixel[i] = value;
    }
    output.set_rescale(input.rescale());
    output.set_header_transform(input.header_transform().copied());
    output
}

/// Which way to reshape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 3D vector image to 4D scalar image (`img3d-to-4d`).
    VectorTo4d,
    /// 4D scalar image to 3D vector image (`img4d-to-3d`).
    FourDToVector,
}

/// A file-to-file conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    direction: Direction,
    input: PathBuf,
    output: WriterOptions,
}

impl Conversion {
    /// Prepare to convert the image at `input`, writing the result as
    /// described by `output`.
    pub fn new<P>(direction: Direction, input: P, output: WriterOptions) -> Self
    where
        P: AsRef<Path>,
    {
        Conversion {
            direction,
            input: input.as_ref().to_path_buf(),
            output,
        }
    }

    /// Probe the input, then read, convert and write it with the element
    /// type found in its header.
    ///
    /// Nothing is written unless the input holds one of the supported
    /// component types in a layout suitable for the direction.
    pub fn run(&self) -> Result<()> {
        let info = probe_image(&self.input)?;
        info!(
            input = %self.input.display(),
            output = %self.output.path().display(),
            component = %info.component_type,
            direction = ?self.direction,
            "converting"
        );
        info.component_type.dispatch(RunConversion(self))?
    }
}

struct RunConversion<'a>(&'a Conversion);

impl ComponentVisitor for RunConversion<'_> {
    type Output = Result<()>;

    fn visit<T: DataElement>(self) -> Result<()> {
        let conversion = self.0;
        match conversion.direction {
            Direction::VectorTo4d => {
                let input = VectorVolume::<T>::from_file(&conversion.input)?;
                debug!(size = ?input.geometry().size, vector_length = input.vector_length(), "input read");
                conversion
                    .output
                    .write_scalar_volume(&vector_to_scalar(&input))
            }
            Direction::FourDToVector => {
                let input = ScalarVolume4::<T>::from_file(&conversion.input)?;
                debug!(size = ?input.geometry().size, "input read");
                conversion
                    .output
                    .write_vector_volume(&scalar_to_vector(&input))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReshapeError;
    use crate::header::NiftiHeader;
    use crate::typedef::NiftiType;
    use crate::volume::{Geometry3, Rescale};
    use nalgebra::Matrix3;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn coordinate_sum_field() -> VectorVolume<f64> {
        let mut volume = VectorVolume::new(Geometry3::new([4, 4, 4]), 3);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    let mut pixel = volume.pixel_mut([x, y, z]);
                    for i in 0..3 {
                        pixel[i] = (x + y + z + i) as f64;
                    }
                }
            }
        }
        volume
    }

    #[rustfmt::skip]
    fn oblique_geometry() -> Geometry3 {
        Geometry3 {
            size: [5, 3, 2],
            origin: [0.1, -17.3, 42.000_001],
            spacing: [0.7, 1.3, 3.3],
            direction: Matrix3::new(
                0.6, -0.8, 0.0,
                0.8, 0.6, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    #[test]
    fn coordinate_sum_scenario() {
        let input = coordinate_sum_field();
        let output = vector_to_scalar(&input);
        assert_eq!(output.geometry().size, [4, 4, 4, 3]);
        for ((x, y, z, i), &value) in output.data().indexed_iter() {
            assert_eq!(value, (x + y + z + i) as f64);
        }
        assert_eq!(scalar_to_vector(&output), input);
    }

    #[test]
    fn metadata_is_copied_exactly() {
        let mut input = VectorVolume::<i32>::new(oblique_geometry(), 6);
        input.pixel_mut([4, 2, 1])[5] = -9;
        input.set_rescale(Rescale { slope: 0.5, inter: 3. });

        let output = vector_to_scalar(&input);
        let g = output.geometry();
        assert_eq!(g.size, [5, 3, 2, 6]);
        assert_eq!(&g.origin[..3], &oblique_geometry().origin[..]);
        assert_eq!(&g.spacing[..3], &oblique_geometry().spacing[..]);
        assert_eq!(g.origin[3], 0.);
        assert_eq!(g.spacing[3], 1.);
        assert_eq!(
            g.direction.fixed_view::<3, 3>(0, 0).into_owned(),
            oblique_geometry().direction
        );
        assert_eq!(output.get([4, 2, 1, 5]), -9);
        assert_eq!(output.rescale(), input.rescale());

        let back = scalar_to_vector(&output);
        assert_eq!(back, input);
    }

    #[test]
    fn fourth_axis_placement_is_dropped() {
        let mut g4 = oblique_geometry().with_trailing_axis(2);
        g4.origin[3] = 12.;
        g4.spacing[3] = 0.1;
        let input = ScalarVolume4::<u8>::new(g4);
        let output = scalar_to_vector(&input);
        assert_eq!(output.geometry(), &oblique_geometry());
        assert_eq!(output.vector_length(), 2);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempdir().unwrap();
        let vector_path = dir.path().join("field.nii.gz");
        let scalar_path = dir.path().join("series.nii.gz");
        let back_path = dir.path().join("back.nii");

        let input = coordinate_sum_field();
        WriterOptions::new(&vector_path)
            .write_vector_volume(&input)
            .unwrap();

        Conversion::new(
            Direction::VectorTo4d,
            &vector_path,
            WriterOptions::new(&scalar_path),
        )
        .run()
        .unwrap();
        let series = ScalarVolume4::<f64>::from_file(&scalar_path).unwrap();
        assert_eq!(series.geometry().size, [4, 4, 4, 3]);
        assert_eq!(series.get([3, 2, 1, 2]), 8.);

        Conversion::new(
            Direction::FourDToVector,
            &scalar_path,
            WriterOptions::new(&back_path),
        )
        .run()
        .unwrap();
        let back = VectorVolume::<f64>::from_file(&back_path).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn unknown_component_type_writes_nothing() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("rgb.nii");
        let output_path = dir.path().join("out.nii");
        let header = NiftiHeader {
            dim: [3, 2, 2, 2, 1, 1, 1, 1],
            datatype: NiftiType::Rgb24 as i16,
            bitpix: 24,
            ..NiftiHeader::default()
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0; 24]);
        File::create(&input_path).unwrap().write_all(&bytes).unwrap();

        let result = Conversion::new(
            Direction::VectorTo4d,
            &input_path,
            WriterOptions::new(&output_path),
        )
        .run();
        match result {
            Err(ReshapeError::UnknownComponentType(128)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!output_path.exists());
    }

    #[test]
    fn wrong_direction_writes_nothing() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("field.nii");
        let output_path = dir.path().join("out.nii");
        WriterOptions::new(&input_path)
            .write_vector_volume(&VectorVolume::<u16>::new(Geometry3::new([2, 2, 2]), 3))
            .unwrap();

        let result = Conversion::new(
            Direction::FourDToVector,
            &input_path,
            WriterOptions::new(&output_path),
        )
        .run();
        match result {
            Err(ReshapeError::IncompatibleLayout(..)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!output_path.exists());
    }
}
