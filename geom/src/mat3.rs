use std::ops::Mul;

use crate::Vec3;

/// A 3×3 rotation matrix with coefficients stored in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub data: [[f64; 3]; 3],
}

impl Mat3 {
    /// Create the identity matrix.
    pub const fn identity() -> Self {
        Mat3 {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation of `a` radians around the X axis.
    pub fn rotation_x(a: f64) -> Self {
        let (s, c) = a.sin_cos();

        Mat3 {
            data: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    /// Rotation of `a` radians around the Y axis.
    pub fn rotation_y(a: f64) -> Self {
        let (s, c) = a.sin_cos();

        Mat3 {
            data: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    /// Rotation of `a` radians around the Z axis.
    pub fn rotation_z(a: f64) -> Self {
        let (s, c) = a.sin_cos();

        Mat3 {
            data: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Compose the rotation described by the given Euler angles, applied in
    /// X·Y·Z order.
    pub fn from_euler(angles: Vec3) -> Self {
        Mat3::rotation_x(angles.x) * Mat3::rotation_y(angles.y) * Mat3::rotation_z(angles.z)
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, m: Mat3) -> Self::Output {
        let mut data = [[0.0; 3]; 3];

        for (r, row) in data.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.data[r][k] * m.data[k][c]).sum();
            }
        }

        Mat3 { data }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let row = |r: usize| self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z;

        Vec3::new(row(0), row(1), row(2))
    }
}
