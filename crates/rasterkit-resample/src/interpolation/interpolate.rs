use rasterkit_grid::{GridError, Rect, SampleAccessor};

use super::bicubic::{bicubic_interpolation, CubicWeights};
use super::bilinear::bilinear_interpolation;
use super::extrema::ExtremaTracker;
use super::kernel::Kernel;
use super::lanczos::{lanczos_interpolation, LanczosWeights};
use super::nearest::nearest_neighbor_interpolation;
use crate::error::InterpolationError;

/// Evaluates a source grid at continuous coordinates with a given kernel.
///
/// The interpolator borrows its source and holds no mutable state, so it can be shared
/// by every worker of a resampling job. Coordinates are expressed in the pixel space of
/// the source: the integer point `(i, j)` is the center of the pixel `(i, j)`.
///
/// # Example
///
/// ```
/// use rasterkit_grid::{Rect, SampleGrid};
/// use rasterkit_resample::interpolation::{Interpolator, Kernel};
///
/// let grid = SampleGrid::<1>::new(
///     Rect::new(-1, -1, 3, 3),
///     vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
/// )
/// .unwrap();
///
/// let interpolator = Interpolator::new(&grid, Kernel::Bilinear).unwrap();
///
/// assert_eq!(interpolator.interpolate(-0.5, -0.5).unwrap(), [2.0]);
/// assert!(interpolator.interpolate(1.5, 0.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Interpolator<'a, A, const B: usize> {
    source: &'a A,
    kernel: Kernel,
    domain: Rect,
}

impl<'a, A: SampleAccessor<B>, const B: usize> Interpolator<'a, A, B> {
    /// Create a new interpolator over `source`.
    ///
    /// # Errors
    ///
    /// Fails if the kernel parameters are invalid.
    pub fn new(source: &'a A, kernel: Kernel) -> Result<Self, InterpolationError> {
        kernel.validate()?;
        Ok(Self {
            source,
            kernel,
            domain: source.domain(),
        })
    }

    /// The kernel used by the interpolator.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// The source grid.
    pub fn source(&self) -> &'a A {
        self.source
    }

    /// Pixels of neighborhood needed beyond the queried cell.
    pub fn margin(&self) -> usize {
        self.kernel.margin()
    }

    /// Integer pixels that can be interpolated, `None` if the source is smaller than
    /// the kernel window.
    pub fn effective_domain(&self) -> Option<Rect> {
        let (lo, hi) = self.kernel.window();
        Rect::from_corners(
            self.domain.min_x() - lo,
            self.domain.min_y() - lo,
            self.domain.max_x() - hi,
            self.domain.max_y() - hi,
        )
    }

    /// Whether the kernel window around `(x, y)` lies inside the source domain.
    #[inline]
    pub fn in_effective_domain(&self, x: f64, y: f64) -> bool {
        self.window_origin(x, y).is_some()
    }

    /// Top-left pixel of the kernel window around `(x, y)`, if the window lies inside
    /// the source domain.
    #[inline]
    pub(crate) fn window_origin(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (lo, hi) = self.kernel.window();
        let (ax, ay) = (self.kernel.anchor(x), self.kernel.anchor(y));

        let inside = ax + lo as f64 >= self.domain.min_x() as f64
            && ax + hi as f64 <= self.domain.max_x() as f64
            && ay + lo as f64 >= self.domain.min_y() as f64
            && ay + hi as f64 <= self.domain.max_y() as f64;

        inside.then(|| (ax as i64 + lo, ay as i64 + lo))
    }

    /// Interpolate every band at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails with [`InterpolationError::InsufficientMargin`] if the kernel window around
    /// `(x, y)` leaves the source domain.
    pub fn interpolate(&self, x: f64, y: f64) -> Result<[f64; B], InterpolationError> {
        let (x0, y0) = self.checked_window_origin(x, y)?;
        Ok(self.evaluate(x0, y0, x, y)?)
    }

    /// Interpolate a single band at `(x, y)`.
    pub fn interpolate_band(&self, x: f64, y: f64, band: usize) -> Result<f64, InterpolationError> {
        let (x0, y0) = self.checked_window_origin(x, y)?;
        Ok(self.evaluate_band(x0, y0, x, y, band)?)
    }

    /// Interpolate every band at `(x, y)`, extrapolating outside of the effective domain.
    ///
    /// The kernel window is shifted so it lies entirely inside the source domain: the
    /// bilinear and bicubic kernels extend their edge polynomials, the nearest neighbor
    /// and Lanczos kernels clamp the coordinates to the domain.
    ///
    /// # Errors
    ///
    /// Fails with [`InterpolationError::InsufficientMargin`] if the coordinates are not
    /// finite or the source is smaller than the kernel window.
    pub fn extrapolate(&self, x: f64, y: f64) -> Result<[f64; B], InterpolationError> {
        let len = self.kernel.window_len();
        if !x.is_finite() || !y.is_finite() || self.domain.width < len || self.domain.height < len
        {
            return Err(self.insufficient_margin(x, y));
        }

        let (x, y) = match self.kernel {
            Kernel::Bilinear | Kernel::BiCubic => (x, y),
            Kernel::Nearest | Kernel::Lanczos(_) => (
                x.clamp(self.domain.min_x() as f64, self.domain.max_x() as f64),
                y.clamp(self.domain.min_y() as f64, self.domain.max_y() as f64),
            ),
        };

        let (lo, _) = self.kernel.window();
        let span = len as i64 - 1;
        let clamp_origin = |anchor: f64, min: i64, max: i64| -> i64 {
            let origin = anchor.clamp(min as f64, max as f64) as i64 + lo;
            origin.clamp(min, max - span)
        };
        let x0 = clamp_origin(
            self.kernel.anchor(x),
            self.domain.min_x(),
            self.domain.max_x(),
        );
        let y0 = clamp_origin(
            self.kernel.anchor(y),
            self.domain.min_y(),
            self.domain.max_y(),
        );

        Ok(self.evaluate(x0, y0, x, y)?)
    }

    /// Create an extrema tracker over the source of this interpolator.
    pub fn extrema_tracker(&self) -> ExtremaTracker<'_, 'a, A, B> {
        ExtremaTracker::new(self)
    }

    /// Evaluate every band with the window weights computed once for the pixel.
    pub(crate) fn evaluate(&self, x0: i64, y0: i64, x: f64, y: f64) -> Result<[f64; B], GridError> {
        match self.kernel {
            Kernel::Nearest | Kernel::Bilinear => {
                bands(|band| self.evaluate_band(x0, y0, x, y, band))
            }
            Kernel::BiCubic => {
                let weights = CubicWeights::new(x0, y0, x, y);
                bands(|band| bicubic_interpolation(self.source, &weights, band))
            }
            Kernel::Lanczos(lobes) => {
                let weights = LanczosWeights::new(x0, y0, x, y, lobes);
                bands(|band| lanczos_interpolation(self.source, &weights, band))
            }
        }
    }

    #[inline]
    fn evaluate_band(
        &self,
        x0: i64,
        y0: i64,
        x: f64,
        y: f64,
        band: usize,
    ) -> Result<f64, GridError> {
        match self.kernel {
            Kernel::Nearest => nearest_neighbor_interpolation(self.source, x0, y0, band),
            Kernel::Bilinear => bilinear_interpolation(self.source, x0, y0, x, y, band),
            Kernel::BiCubic => {
                bicubic_interpolation(self.source, &CubicWeights::new(x0, y0, x, y), band)
            }
            Kernel::Lanczos(lobes) => lanczos_interpolation(
                self.source,
                &LanczosWeights::new(x0, y0, x, y, lobes),
                band,
            ),
        }
    }

    fn checked_window_origin(&self, x: f64, y: f64) -> Result<(i64, i64), InterpolationError> {
        self.window_origin(x, y)
            .ok_or_else(|| self.insufficient_margin(x, y))
    }

    fn insufficient_margin(&self, x: f64, y: f64) -> InterpolationError {
        InterpolationError::InsufficientMargin {
            x,
            y,
            margin: self.kernel.margin(),
        }
    }
}

fn bands<const B: usize>(
    mut band_value: impl FnMut(usize) -> Result<f64, GridError>,
) -> Result<[f64; B], GridError> {
    let mut pixel = [0.0; B];
    for (band, value) in pixel.iter_mut().enumerate() {
        *value = band_value(band)?;
    }
    Ok(pixel)
}
