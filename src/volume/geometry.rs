//! Physical placement of a voxel grid.
use nalgebra::SMatrix;

/// The size and physical placement of an N-dimensional voxel grid:
/// the extent along each axis, the world position of the first voxel,
/// the distance between voxel centres along each axis and the direction
/// cosines of each axis (one per column).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry<const N: usize> {
    /// Number of voxels along each axis.
    pub size: [usize; N],
    /// Physical position of voxel index zero.
    pub origin: [f64; N],
    /// Voxel spacing along each axis.
    pub spacing: [f64; N],
    /// Orientation of the grid axes in physical space.
    pub direction: SMatrix<f64, N, N>,
}

/// Geometry of a 3D image.
pub type Geometry3 = Geometry<3>;
/// Geometry of a 4D image.
pub type Geometry4 = Geometry<4>;

impl<const N: usize> Geometry<N> {
    /// An axis-aligned grid of the given size, with zero origin and unit spacing.
    pub fn new(size: [usize; N]) -> Self {
        Geometry {
            size,
            origin: [0.; N],
            spacing: [1.; N],
            direction: SMatrix::identity(),
        }
    }

    /// Total number of grid positions.
    pub fn voxel_count(&self) -> usize {
        self.size.iter().product()
    }
}

impl Geometry3 {
    /// Extend this geometry with a trailing axis of the given length.
    ///
    /// The new axis carries no physical meaning: its origin is 0, its
    /// spacing is 1 and it is not coupled to the spatial axes in the
    /// direction matrix.
    pub fn with_trailing_axis(&self, len: usize) -> Geometry4 {
        let mut out = Geometry4::new([self.size[0], self.size[1], self.size[2], len]);
        for i in 0..3 {
            out.origin[i] = self.origin[i];
            out.spacing[i] = self.spacing[i];
            for j in 0..3 {
                out.direction[(i, j)] = self.direction[(i, j)];
            }
        }
        out
    }
}

impl Geometry4 {
    /// Split off the trailing axis, returning the spatial geometry of the
    /// first three axes and the length of the fourth.
    pub fn split_trailing_axis(&self) -> (Geometry3, usize) {
        let mut out = Geometry3::new([self.size[0], self.size[1], self.size[2]]);
        for i in 0..3 {
            out.origin[i] = self.origin[i];
            out.spacing[i] = self.spacing[i];
            for j in 0..3 {
                out.direction[(i, j)] = self.direction[(i, j)];
            }
        }
        (out, self.size[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Matrix4};
    use pretty_assertions::assert_eq;

    #[rustfmt::skip]
    fn oblique() -> Geometry3 {
        Geometry3 {
            size: [7, 5, 3],
            origin: [-12.5, 3.25, 100.],
            spacing: [0.9, 1.1, 2.5],
            direction: Matrix3::new(
                0.0, -1.0, 0.0,
                1.0, 0.0, 0.0,
                0.0, 0.0, -1.0,
            ),
        }
    }

    #[test]
    #[rustfmt::skip]
    fn trailing_axis_is_synthetic() {
        let g = oblique();
        let g4 = g.with_trailing_axis(6);
        assert_eq!(g4.size, [7, 5, 3, 6]);
        assert_eq!(g4.origin, [-12.5, 3.25, 100., 0.]);
        assert_eq!(g4.spacing, [0.9, 1.1, 2.5, 1.]);
        assert_eq!(
            g4.direction,
            Matrix4::new(
                0.0, -1.0, 0.0, 0.0,
                1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, -1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            )
        );
        assert_eq!(g4.voxel_count(), 7 * 5 * 3 * 6);
    }

    #[test]
    fn split_drops_coupling() {
        let mut g4 = oblique().with_trailing_axis(2);
        g4.origin[3] = 9.;
        g4.spacing[3] = 0.5;
        g4.direction[(3, 0)] = 0.25;
        g4.direction[(0, 3)] = 0.75;

        let (g, len) = g4.split_trailing_axis();
        assert_eq!(len, 2);
        assert_eq!(g, oblique());
    }
}
