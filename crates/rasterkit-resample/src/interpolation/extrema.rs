use rasterkit_grid::{Rect, SampleAccessor};

use super::interpolate::Interpolator;
use crate::error::InterpolationError;

/// Minimum and maximum band 0 samples of a region and where they were found.
///
/// Ties keep the first location in row-major order. NaN samples are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    /// Smallest sample.
    pub min: f64,
    /// Column of the smallest sample.
    pub min_x: i64,
    /// Row of the smallest sample.
    pub min_y: i64,
    /// Largest sample.
    pub max: f64,
    /// Column of the largest sample.
    pub max_x: i64,
    /// Row of the largest sample.
    pub max_y: i64,
}

/// Computes and caches the extrema of the source of an [`Interpolator`].
///
/// The whole effective domain result is cached and returned as is by later whole domain
/// queries. Once it is cached, an explicit region that differs from the effective domain
/// is rejected with [`InterpolationError::InvalidQuery`]. Explicit regions are always
/// recomputed and never replace the cached whole domain result.
///
/// The cache is updated through `&mut self`, so a tracker is owned by a single thread.
///
/// # Example
///
/// ```
/// use rasterkit_grid::{Rect, SampleGrid};
/// use rasterkit_resample::interpolation::{Interpolator, Kernel};
///
/// let grid = SampleGrid::<1>::from_fn(Rect::from_size(4, 4), |x, y| [(x * y) as f64]).unwrap();
/// let interpolator = Interpolator::new(&grid, Kernel::Bilinear).unwrap();
/// let mut tracker = interpolator.extrema_tracker();
///
/// let extrema = *tracker.min_max(None).unwrap();
/// assert_eq!(extrema.max, 4.0);
/// assert_eq!((extrema.max_x, extrema.max_y), (2, 2));
/// ```
#[derive(Debug)]
pub struct ExtremaTracker<'i, 'a, A, const B: usize> {
    interpolator: &'i Interpolator<'a, A, B>,
    whole: Option<Extrema>,
    last_region: Option<Extrema>,
    evaluations: usize,
}

impl<'i, 'a, A: SampleAccessor<B>, const B: usize> ExtremaTracker<'i, 'a, A, B> {
    /// Create an empty tracker.
    pub fn new(interpolator: &'i Interpolator<'a, A, B>) -> Self {
        Self {
            interpolator,
            whole: None,
            last_region: None,
            evaluations: 0,
        }
    }

    /// Number of times the extrema were computed from the samples.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Extrema of the band 0 samples over a region.
    ///
    /// # Arguments
    ///
    /// * `region` - The pixels to scan, `None` for the whole effective domain.
    ///
    /// # Errors
    ///
    /// Fails with [`InterpolationError::InvalidQuery`] if:
    ///
    /// * the region differs from the effective domain while a whole domain result is cached,
    /// * the region is not inside the source domain,
    /// * the region holds no sample other than NaN.
    pub fn min_max(&mut self, region: Option<Rect>) -> Result<&Extrema, InterpolationError> {
        let effective = self.interpolator.effective_domain();

        let Some(rect) = region else {
            if self.whole.is_none() {
                let area = effective.ok_or_else(|| {
                    InterpolationError::InvalidQuery(
                        "the effective domain of the kernel is empty".to_string(),
                    )
                })?;
                let extrema = self.scan(area)?;
                self.evaluations += 1;
                self.whole = Some(extrema);
            }
            return self.whole.as_ref().ok_or_else(|| {
                InterpolationError::InvalidQuery("no cached extrema".to_string())
            });
        };

        if self.whole.is_some() && Some(rect) != effective {
            return Err(InterpolationError::InvalidQuery(format!(
                "{rect} differs from the cached whole domain query"
            )));
        }

        if !self.interpolator.source().domain().contains_rect(&rect) {
            return Err(InterpolationError::InvalidQuery(format!(
                "{rect} is outside of the source domain"
            )));
        }

        let extrema = self.scan(rect)?;
        self.evaluations += 1;

        Ok(&*self.last_region.insert(extrema))
    }

    fn scan(&self, area: Rect) -> Result<Extrema, InterpolationError> {
        let source = self.interpolator.source();
        let mut extrema: Option<Extrema> = None;

        for (x, y) in area.pixels() {
            let v = source.sample(x, y, 0)?;
            if v.is_nan() {
                continue;
            }
            match extrema.as_mut() {
                None => {
                    extrema = Some(Extrema {
                        min: v,
                        min_x: x,
                        min_y: y,
                        max: v,
                        max_x: x,
                        max_y: y,
                    })
                }
                Some(e) => {
                    if v < e.min {
                        (e.min, e.min_x, e.min_y) = (v, x, y);
                    }
                    if v > e.max {
                        (e.max, e.max_x, e.max_y) = (v, x, y);
                    }
                }
            }
        }

        extrema.ok_or_else(|| {
            InterpolationError::InvalidQuery(format!("{area} holds no valid sample"))
        })
    }
}
