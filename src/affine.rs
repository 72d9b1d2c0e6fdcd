//! Mapping between the NIfTI-1 coordinate fields (`pixdim`, qform, sform)
//! and the origin/spacing/direction description of a voxel grid.
use crate::header::NiftiHeader;
use crate::typedef::XForm;
use approx::abs_diff_eq;
use nalgebra::{Matrix3, Matrix4, Quaternion, SymmetricEigen};

/// The spatial placement of the first three image axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialFrame {
    /// Position of voxel (0, 0, 0).
    pub origin: [f64; 3],
    /// Voxel spacing along each axis.
    pub spacing: [f64; 3],
    /// Direction cosines, one column per axis.
    pub direction: Matrix3<f64>,
}

impl Default for SpatialFrame {
    fn default() -> Self {
        SpatialFrame {
            origin: [0.; 3],
            spacing: [1.; 3],
            direction: Matrix3::identity(),
        }
    }
}

fn flip_third_axis(m: &mut Matrix3<f64>) {
    for i in 0..3 {
        m[(i, 2)] = -m[(i, 2)];
    }
}

fn sanitize_spacing(pixdim: f32) -> f64 {
    if pixdim.is_finite() && pixdim > 0. {
        f64::from(pixdim)
    } else {
        1.
    }
}

impl SpatialFrame {
    /// Obtain the spatial frame described by a header.
    ///
    /// The sform is preferred over the qform. When neither is set, the
    /// grid is axis-aligned with its first voxel at the world origin.
    pub fn from_header(header: &NiftiHeader) -> Self {
        let spacing = [
            sanitize_spacing(header.pixdim[1]),
            sanitize_spacing(header.pixdim[2]),
            sanitize_spacing(header.pixdim[3]),
        ];

        if header.sform_code > 0 {
            let rows = [header.srow_x, header.srow_y, header.srow_z];
            let mut direction = Matrix3::zeros();
            let mut origin = [0.; 3];
            for (i, row) in rows.iter().enumerate() {
                for j in 0..3 {
                    direction[(i, j)] = f64::from(row[j]) / spacing[j];
                }
                origin[i] = f64::from(row[3]);
            }
            SpatialFrame {
                origin,
                spacing,
                direction,
            }
        } else if header.qform_code > 0 {
            let mut direction = quaternion_to_rotation(
                f64::from(header.quatern_b),
                f64::from(header.quatern_c),
                f64::from(header.quatern_d),
            );
            if header.pixdim[0] < 0. {
                flip_third_axis(&mut direction);
            }
            SpatialFrame {
                origin: [
                    f64::from(header.quatern_x),
                    f64::from(header.quatern_y),
                    f64::from(header.quatern_z),
                ],
                spacing,
                direction,
            }
        } else {
            SpatialFrame {
                spacing,
                ..SpatialFrame::default()
            }
        }
    }

    /// Record this frame in the header's `pixdim[0..=3]`, sform and qform
    /// fields. Both forms are marked as scanner anatomical coordinates.
    pub fn write_to_header(&self, header: &mut NiftiHeader) {
        let qfac = if self.direction.determinant() < 0. {
            -1.
        } else {
            1.
        };
        header.pixdim[0] = qfac as f32;
        for j in 0..3 {
            header.pixdim[j + 1] = self.spacing[j] as f32;
        }

        let mut rows = [&mut header.srow_x, &mut header.srow_y, &mut header.srow_z];
        for (i, row) in rows.iter_mut().enumerate() {
            for j in 0..3 {
                row[j] = (self.direction[(i, j)] * self.spacing[j]) as f32;
            }
            row[3] = self.origin[i] as f32;
        }
        header.sform_code = XForm::ScannerAnat as i16;

        let mut rotation = self.direction;
        if qfac < 0. {
            flip_third_axis(&mut rotation);
        }
        let q = rotation_to_quaternion(&rotation);
        header.quatern_b = q.i as f32;
        header.quatern_c = q.j as f32;
        header.quatern_d = q.k as f32;
        header.quatern_x = self.origin[0] as f32;
        header.quatern_y = self.origin[1] as f32;
        header.quatern_z = self.origin[2] as f32;
        header.qform_code = XForm::ScannerAnat as i16;
    }
}

/// The coordinate fields of a header, exactly as stored.
///
/// An image read from a file keeps these so that its output can be written
/// with the same qform and sform, codes included, rather than with forms
/// recomputed from a [`SpatialFrame`] in double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderTransform {
    /// `pixdim[0]`, the qform handedness.
    pub qfac: f32,
    /// `pixdim[1..=3]`.
    pub spacing: [f32; 3],
    /// `qform_code`.
    pub qform_code: i16,
    /// `sform_code`.
    pub sform_code: i16,
    /// `quatern_b`, `quatern_c`, `quatern_d`.
    pub quatern: [f32; 3],
    /// `quatern_x`, `quatern_y`, `quatern_z`.
    pub qoffset: [f32; 3],
    /// `srow_x`, `srow_y`, `srow_z`.
    pub srow: [[f32; 4]; 3],
}

impl HeaderTransform {
    /// Copy the coordinate fields of a header.
    pub fn from_header(header: &NiftiHeader) -> Self {
        HeaderTransform {
            qfac: header.pixdim[0],
            spacing: [header.pixdim[1], header.pixdim[2], header.pixdim[3]],
            qform_code: header.qform_code,
            sform_code: header.sform_code,
            quatern: [header.quatern_b, header.quatern_c, header.quatern_d],
            qoffset: [header.quatern_x, header.quatern_y, header.quatern_z],
            srow: [header.srow_x, header.srow_y, header.srow_z],
        }
    }

    /// Overwrite the coordinate fields of a header with these.
    pub fn write_to_header(&self, header: &mut NiftiHeader) {
        header.pixdim[0] = self.qfac;
        header.pixdim[1..=3].copy_from_slice(&self.spacing);
        header.qform_code = self.qform_code;
        header.sform_code = self.sform_code;
        header.quatern_b = self.quatern[0];
        header.quatern_c = self.quatern[1];
        header.quatern_d = self.quatern[2];
        header.quatern_x = self.qoffset[0];
        header.quatern_y = self.qoffset[1];
        header.quatern_z = self.qoffset[2];
        header.srow_x = self.srow[0];
        header.srow_y = self.srow[1];
        header.srow_z = self.srow[2];
    }

    /// The spatial frame these fields describe.
    pub fn frame(&self) -> SpatialFrame {
        let mut header = NiftiHeader::default();
        self.write_to_header(&mut header);
        SpatialFrame::from_header(&header)
    }
}

/// Calculate the rotation matrix of the unit quaternion whose last three
/// values are `b`, `c` and `d`, as stored in the qform fields.
///
/// The first value is recovered as `a = sqrt(1 - (b² + c² + d²))`. When
/// that is not positive (a 180 degree rotation, or rounding error), `a` is
/// taken as zero and `(b, c, d)` is renormalized.
pub fn quaternion_to_rotation(b: f64, c: f64, d: f64) -> Matrix3<f64> {
    let w2 = 1.0 - (b * b + c * c + d * d);
    let q = if w2 > 0. {
        Quaternion::new(w2.sqrt(), b, c, d)
    } else {
        let n = (b * b + c * c + d * d).sqrt();
        if abs_diff_eq!(n, 0.) {
            return Matrix3::identity();
        }
        Quaternion::new(0., b / n, c / n, d / n)
    };

    let nq = q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k;
    let s = 2.0 / nq;
    let x = q.i * s;
    let y = q.j * s;
    let z = q.k * s;
    let wx = q.w * x;
    let wy = q.w * y;
    let wz = q.w * z;
    let xx = q.i * x;
    let xy = q.i * y;
    let xz = q.i * z;
    let yy = q.j * y;
    let yz = q.j * z;
    let zz = q.k * z;
    #[rustfmt::skip]
    let rotation = Matrix3::new(
        1.0 - (yy + zz), xy - wz, xz + wy,
        xy + wz, 1.0 - (xx + zz), yz - wx,
        xz - wy, yz + wx, 1.0 - (xx + yy),
    );
    rotation
}

/// Calculate the unit quaternion closest to the given rotation matrix,
/// with a non-negative `w` component.
///
/// Constructs the quaternion from the eigenvector of the largest
/// eigenvalue of the symmetric matrix `k` built from the input, which is
/// robust to numerical error and to slightly non-orthogonal inputs.
///
/// Bar-Itzhack, Itzhack Y. "New method for extracting the quaternion from a rotation
/// matrix", AIAA Journal of Guidance, Control and Dynamics 23(6):1085-1087, 2000
pub fn rotation_to_quaternion(m: &Matrix3<f64>) -> Quaternion<f64> {
    // qyx is the contribution of the y input component to the x output, M[0, 1]
    let qxx = m[(0, 0)];
    let qyx = m[(0, 1)];
    let qzx = m[(0, 2)];
    let qxy = m[(1, 0)];
    let qyy = m[(1, 1)];
    let qzy = m[(1, 2)];
    let qxz = m[(2, 0)];
    let qyz = m[(2, 1)];
    let qzz = m[(2, 2)];

    // only the lower half of the symmetric matrix is read
    #[rustfmt::skip]
    let k = Matrix4::new(
        qxx - qyy - qzz, 0.0,             0.0,             0.0,
        qyx + qxy,       qyy - qxx - qzz, 0.0,             0.0,
        qzx + qxz,       qzy + qyz,       qzz - qxx - qyy, 0.0,
        qyz - qzy,       qzx - qxz,       qxy - qyx,       qxx + qyy + qzz,
    );

    let SymmetricEigen {
        eigenvalues,
        eigenvectors,
    } = k.symmetric_eigen();
    let v = eigenvectors.column(eigenvalues.imax());
    let q = Quaternion::new(v[3], v[0], v[1], v[2]);

    if q.w < 0. {
        -q
    } else {
        q
    }
}
