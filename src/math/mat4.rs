//! 4x4 homogeneous transformation matrix.
//!
//! # Convention
//! - Row-major storage: `data[row][col]`
//! - Vectors are **column vectors** on the right, so translation lives in
//!   the **last column**
//! - Transforms chain **right-to-left**: `A * B` applies B first, then A

use super::vec3::Vec3;
use std::ops::Mul;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f64; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f64; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translation(v: Vec3) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, v.x],
            [0.0, 1.0, 0.0, v.y],
            [0.0, 0.0, 1.0, v.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(v: Vec3) -> Self {
        Mat4::new([
            [v.x, 0.0, 0.0, 0.0],
            [0.0, v.y, 0.0, 0.0],
            [0.0, 0.0, v.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed rotation around the X axis.
    pub fn rotation_x(theta: f64) -> Self {
        let s = theta.sin();
        let c = theta.cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed rotation around the Y axis.
    pub fn rotation_y(theta: f64) -> Self {
        let s = theta.sin();
        let c = theta.cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed rotation around the Z axis.
    pub fn rotation_z(theta: f64) -> Self {
        let s = theta.sin();
        let c = theta.cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Builds the camera-space view matrix for a camera at `eye` looking at
    /// `target` with the given `up` direction.
    ///
    /// The basis is `z = normalize(eye − target)`, `x = normalize(up × z)`,
    /// `y = z × x`; the rows are the basis vectors and the translation
    /// column is `−basis·eye`. When `up` is parallel to `eye − target` the
    /// cross product is zero-length and the result degenerates to NaN.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let z = (eye - target).normalize();
        let x = up.cross(z).normalize();
        let y = z.cross(x);

        Mat4::new([
            [x.x, x.y, x.z, -x.dot(eye)],
            [y.x, y.y, y.z, -y.dot(eye)],
            [z.x, z.y, z.z, -z.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Builds the projection matrix for the frustum
    /// `[left, right] × [bottom, top] × [near, far]`.
    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        Mat4::new([
            [
                (2.0 * near) / (right - left),
                0.0,
                (right + left) / (right - left),
                0.0,
            ],
            [
                0.0,
                (2.0 * near) / (top - bottom),
                (top + bottom) / (top - bottom),
                0.0,
            ],
            [
                0.0,
                0.0,
                -(far + near) / (far - near),
                (-2.0 * near * far) / (far - near),
            ],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Builds a symmetric perspective projection.
    ///
    /// `fovy` is the vertical field of view in degrees;
    /// `top = near · tan(fovy·π/360)` and the horizontal extent is scaled
    /// by `aspect`.
    pub fn perspective(fovy: f64, aspect: f64, near: f64, far: f64) -> Self {
        let top = (fovy * std::f64::consts::PI / 360.0).tan() * near;
        let bottom = -top;
        let left = bottom * aspect;
        let right = top * aspect;
        Mat4::frustum(left, right, bottom, top, near, far)
    }

    /// Applies the matrix to the homogeneous point `(v, 1)` without the
    /// perspective divide.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3],
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3],
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3],
        )
    }

    /// Applies the matrix to the homogeneous point `(v, 1)` and divides by
    /// the resulting `w` component.
    ///
    /// A `w` at or near zero yields `Inf`/`NaN` components; the caller is
    /// responsible for not feeding those into the framebuffer.
    pub fn transform_coordinate(&self, v: Vec3) -> Vec3 {
        let m = &self.data;
        let w = m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3];
        self.transform_vector(v) * (1.0 / w)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }
}

/// Matrix multiplication: `A * B` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f64; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn multiply_by_identity_is_noop() {
        let m = Mat4::translation(Vec3::new(1.0, -2.0, 3.5))
            * Mat4::rotation_y(0.7)
            * Mat4::scaling(Vec3::new(2.0, 0.5, 1.0));
        assert_mat_eq(m * Mat4::identity(), m);
        assert_mat_eq(Mat4::identity() * m, m);
    }

    #[test]
    fn translation_moves_point() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let p = m.transform_coordinate(Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(p, Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn rotation_x_quarter_turn() {
        let m = Mat4::rotation_x(FRAC_PI_2);
        let p = m.transform_coordinate(Vec3::UNIT_Y);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn look_at_centers_the_target_axis() {
        // Camera at (0,0,5) looking at the origin: the origin lands on the
        // view-space Z axis, 5 units along -z.
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UNIT_Y);
        let p = view.transform_coordinate(Vec3::ZERO);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -5.0, epsilon = 1e-12);
    }

    #[test]
    fn perspective_maps_view_axis_to_ndc_origin() {
        let proj = Mat4::perspective(60.0, 1.0, 1.0, 10.0);
        let p = proj.transform_coordinate(Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert!(p.z > -1.0 && p.z < 1.0);
    }

    #[test]
    fn perspective_depth_range_spans_near_to_far() {
        let proj = Mat4::perspective(45.0, 1.0, 1.0, 10.0);
        let near = proj.transform_coordinate(Vec3::new(0.0, 0.0, -1.0));
        let far = proj.transform_coordinate(Vec3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-9);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_coordinate_with_zero_w_is_not_finite() {
        let proj = Mat4::perspective(45.0, 1.0, 1.0, 10.0);
        // Points in the camera plane project to w = 0.
        let p = proj.transform_coordinate(Vec3::new(1.0, 0.0, 0.0));
        assert!(!p.x.is_finite());
    }
}
