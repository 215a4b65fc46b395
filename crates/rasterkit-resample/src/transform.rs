//! Coordinate transforms mapping destination pixels to source pixels.
//!
//! The resample driver only needs a [`CoordinateTransform`] in the destination to
//! source direction and never inspects it. Any `Fn(f64, f64) -> (f64, f64)` closure is
//! a transform; [`AffineTransform`] and [`ProjectiveTransform`] cover the common cases
//! and can be inverted.

/// Errors raised when building transforms.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The transform matrix is singular.
    #[error("Transform is not invertible, determinant is {0}")]
    NonInvertible(f64),
}

/// Maps a point of one pixel space to another.
pub trait CoordinateTransform: Sync {
    /// Transform the point `(x, y)`.
    fn transform(&self, x: f64, y: f64) -> (f64, f64);
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64) -> (f64, f64) + Sync,
{
    #[inline]
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// 2x3 affine transform `[a, b, c, d, e, f]` mapping `(x, y)` to
/// `(a x + b y + c, d x + e y + f)`.
///
/// # Example
///
/// ```
/// use rasterkit_resample::transform::{AffineTransform, CoordinateTransform};
///
/// let dst_to_src = AffineTransform::scale(2.0, 2.0).inverse().unwrap();
///
/// assert_eq!(dst_to_src.transform(4.0, 6.0), (2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: [f64; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// Create a transform from its 2x3 matrix, row-major.
    pub fn new(m: [f64; 6]) -> Self {
        Self { m }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Scale along each axis.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Rotation around a center point, followed by a scale.
    ///
    /// The matrix is defined as:
    ///
    /// | alpha  beta  tx |
    /// | -beta  alpha ty |
    ///
    /// where:
    ///
    /// alpha = scale * cos(angle)
    /// beta = scale * sin(angle)
    /// tx = (1 - alpha) * center.x - beta * center.y
    /// ty = beta * center.x + (1 - alpha) * center.y
    ///
    /// # Arguments
    ///
    /// * `center` - The center point of the rotation.
    /// * `angle` - The angle of rotation in degrees.
    /// * `scale` - The scale factor.
    pub fn rotation(center: (f64, f64), angle: f64, scale: f64) -> Self {
        let angle = angle.to_radians();
        let alpha = scale * angle.cos();
        let beta = scale * angle.sin();

        let tx = (1.0 - alpha) * center.0 - beta * center.1;
        let ty = beta * center.0 + (1.0 - alpha) * center.1;

        Self::new([alpha, beta, tx, -beta, alpha, ty])
    }

    /// The 2x3 matrix, row-major.
    pub fn matrix(&self) -> [f64; 6] {
        self.m
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.m[0] * self.m[4] - self.m[1] * self.m[3]
    }

    /// The transform applying `self` first, then `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        let [a, b, c, d, e, f] = self.m;
        let [na, nb, nc, nd, ne, nf] = next.m;
        Self::new([
            na * a + nb * d,
            na * b + nb * e,
            na * c + nb * f + nc,
            nd * a + ne * d,
            nd * b + ne * e,
            nd * c + ne * f + nf,
        ])
    }

    /// The inverse transform.
    ///
    /// # Errors
    ///
    /// Fails if the determinant is zero.
    pub fn inverse(&self) -> Result<Self, TransformError> {
        let [a, b, c, d, e, f] = self.m;

        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(TransformError::NonInvertible(determinant));
        }
        let inv_determinant = 1.0 / determinant;

        let new_a = e * inv_determinant;
        let new_b = -b * inv_determinant;
        let new_d = -d * inv_determinant;
        let new_e = a * inv_determinant;
        let new_c = -(new_a * c + new_b * f);
        let new_f = -(new_d * c + new_e * f);

        Ok(Self::new([new_a, new_b, new_c, new_d, new_e, new_f]))
    }
}

impl CoordinateTransform for AffineTransform {
    #[inline]
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let u = self.m[0] * x + self.m[1] * y + self.m[2];
        let v = self.m[3] * x + self.m[4] * y + self.m[5];
        (u, v)
    }
}

/// 3x3 projective transform (homography), row-major.
///
/// Points mapped to the line at infinity transform to `(NaN, NaN)`, which the resample
/// driver treats as outside of the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectiveTransform {
    m: [f64; 9],
}

impl From<AffineTransform> for ProjectiveTransform {
    fn from(affine: AffineTransform) -> Self {
        let [a, b, c, d, e, f] = affine.m;
        Self::new([a, b, c, d, e, f, 0.0, 0.0, 1.0])
    }
}

impl ProjectiveTransform {
    /// Create a transform from its 3x3 matrix, row-major.
    pub fn new(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// The 3x3 matrix, row-major.
    pub fn matrix(&self) -> [f64; 9] {
        self.m
    }

    /// Determinant of the matrix.
    #[rustfmt::skip]
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) -
        m[1] * (m[3] * m[8] - m[5] * m[6]) +
        m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// The inverse transform.
    ///
    /// # Errors
    ///
    /// Fails if the determinant is zero.
    #[rustfmt::skip]
    pub fn inverse(&self) -> Result<Self, TransformError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError::NonInvertible(det));
        }

        let m = &self.m;
        let adj = [
            m[4] * m[8] - m[5] * m[7],  // [0, 0]
            m[2] * m[7] - m[1] * m[8],  // [0, 1]
            m[1] * m[5] - m[2] * m[4],  // [0, 2]
            m[5] * m[6] - m[3] * m[8],  // [1, 0]
            m[0] * m[8] - m[2] * m[6],  // [1, 1]
            m[2] * m[3] - m[0] * m[5],  // [1, 2]
            m[3] * m[7] - m[4] * m[6],  // [2, 0]
            m[1] * m[6] - m[0] * m[7],  // [2, 1]
            m[0] * m[4] - m[1] * m[3],  // [2, 2]
        ];

        let inv_det = 1.0 / det;
        Ok(Self::new(adj.map(|v| v * inv_det)))
    }
}

impl CoordinateTransform for ProjectiveTransform {
    #[inline]
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        if w == 0.0 {
            return (f64::NAN, f64::NAN);
        }
        let u = (m[0] * x + m[1] * y + m[2]) / w;
        let v = (m[3] * x + m[4] * y + m[5]) / w;
        (u, v)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_point_eq(a: (f64, f64), b: (f64, f64)) {
        assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-9);
    }

    #[test]
    fn closure_transform() {
        let t = |x: f64, y: f64| (x + 1.0, y * 2.0);
        assert_eq!(t.transform(1.0, 2.0), (2.0, 4.0));
    }

    #[test]
    fn affine_inverse() -> Result<(), TransformError> {
        let m = AffineTransform::new([2.0, 0.5, 3.0, -1.0, 1.5, -4.0]);
        let inv = m.inverse()?;
        for (x, y) in [(0.0, 0.0), (1.5, -2.0), (10.0, 7.0)] {
            let (u, v) = m.transform(x, y);
            assert_point_eq(inv.transform(u, v), (x, y));
        }
        Ok(())
    }

    #[test]
    fn affine_singular() {
        let m = AffineTransform::new([1.0, 2.0, 0.0, 2.0, 4.0, 0.0]);
        assert_eq!(m.inverse(), Err(TransformError::NonInvertible(0.0)));
    }

    #[test]
    fn affine_compose() {
        let t = AffineTransform::scale(2.0, 3.0).then(&AffineTransform::translation(1.0, -1.0));
        assert_eq!(t.transform(1.0, 1.0), (3.0, 2.0));
        assert_eq!(
            AffineTransform::identity().then(&t).matrix(),
            t.matrix()
        );
    }

    #[test]
    fn affine_rotation() {
        let r = AffineTransform::rotation((0.0, 0.0), 90.0, 1.0);
        assert_point_eq(r.transform(1.0, 0.0), (0.0, -1.0));

        // the center is a fixed point
        let r = AffineTransform::rotation((5.0, 3.0), 37.0, 1.0);
        assert_point_eq(r.transform(5.0, 3.0), (5.0, 3.0));
    }

    #[test]
    fn projective_inverse() -> Result<(), TransformError> {
        let h = ProjectiveTransform::new([1.0, 0.2, 3.0, -0.1, 0.9, 2.0, 0.001, 0.002, 1.0]);
        let inv = h.inverse()?;
        for (x, y) in [(0.0, 0.0), (12.0, -3.0), (40.0, 25.0)] {
            let (u, v) = h.transform(x, y);
            assert_point_eq(inv.transform(u, v), (x, y));
        }
        Ok(())
    }

    #[test]
    fn projective_from_affine() {
        let a = AffineTransform::new([2.0, 0.5, 3.0, -1.0, 1.5, -4.0]);
        let h = ProjectiveTransform::from(a);
        assert_point_eq(h.transform(3.0, 4.0), a.transform(3.0, 4.0));

        let h = ProjectiveTransform::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        let (u, v) = h.transform(0.0, 1.0);
        assert!(u.is_nan() && v.is_nan());
        assert!(h.inverse().is_err());
    }
}
