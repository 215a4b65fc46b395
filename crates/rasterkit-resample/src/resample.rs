use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use rasterkit_grid::{DestinationGrid, Rect, SampleAccessor, Tile};

use crate::config::ResampleConfig;
use crate::error::ResampleError;
use crate::interpolation::Interpolator;
use crate::parallel::{self, ExecutionStrategy};
use crate::transform::CoordinateTransform;

/// What to write where the kernel window leaves the source domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderPolicy {
    /// Write the fill value into every band.
    #[default]
    Fill,
    /// Evaluate the kernel with its window shifted inside the source domain.
    ///
    /// Non finite source coordinates are still filled.
    Extrapolate,
}

/// Parameters of the resample driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleOptions {
    /// Value written where no source sample is available.
    pub fill_value: f64,
    /// Behavior outside of the effective domain of the kernel.
    pub border: BorderPolicy,
    /// How the tiles are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            fill_value: f64::NAN,
            border: BorderPolicy::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// Counts reported by a resample job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleStats {
    /// Number of tiles written.
    pub tiles: usize,
    /// Number of pixels written by the kernel, extrapolated ones included.
    pub interpolated: usize,
    /// Number of pixels set to the fill value.
    pub filled: usize,
}

impl ResampleStats {
    /// Total number of pixels written.
    pub fn pixels(&self) -> usize {
        self.interpolated + self.filled
    }
}

impl std::ops::Add for ResampleStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            tiles: self.tiles + rhs.tiles,
            interpolated: self.interpolated + rhs.interpolated,
            filled: self.filled + rhs.filled,
        }
    }
}

impl std::ops::AddAssign for ResampleStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Resample a source grid into a destination grid.
///
/// Every destination pixel `(x, y)` is mapped to the source with `transform`. Pixels
/// whose kernel window lies inside the source domain are interpolated, the others are
/// set to `fill` in every band.
///
/// # Arguments
///
/// * `interpolator` - The kernel evaluating the source grid.
/// * `dst` - The destination grid, written in place.
/// * `transform` - The destination to source coordinate transform.
/// * `fill` - The value written outside of the effective domain.
///
/// # Returns
///
/// The number of tiles and pixels written.
///
/// # Example
///
/// ```
/// use rasterkit_grid::{DestinationGrid, Rect, SampleAccessor, SampleGrid};
/// use rasterkit_resample::interpolation::{Interpolator, Kernel};
/// use rasterkit_resample::resample::resample;
///
/// let src = SampleGrid::<1>::from_fn(Rect::from_size(4, 4), |x, y| [(x + y) as f64]).unwrap();
/// let interpolator = Interpolator::new(&src, Kernel::Bilinear).unwrap();
///
/// let mut dst = DestinationGrid::<1>::new(Rect::from_size(8, 8), Some([4, 4].into()), 0.0).unwrap();
///
/// let stats = resample(&interpolator, &mut dst, &|x: f64, y: f64| (x / 2.0, y / 2.0), f64::NAN).unwrap();
///
/// assert_eq!(stats.tiles, 4);
/// assert_eq!(dst.sample(3, 5, 0).unwrap(), 4.0);
/// assert!(dst.sample(7, 0, 0).unwrap().is_nan());
/// ```
pub fn resample<A, T, const B: usize>(
    interpolator: &Interpolator<'_, A, B>,
    dst: &mut DestinationGrid<B>,
    transform: &T,
    fill: f64,
) -> Result<ResampleStats, ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    let options = ResampleOptions {
        fill_value: fill,
        ..Default::default()
    };
    resample_with(interpolator, dst, transform, &options)
}

/// Resample a source grid into a destination grid with explicit options.
///
/// See [`resample`].
pub fn resample_with<A, T, const B: usize>(
    interpolator: &Interpolator<'_, A, B>,
    dst: &mut DestinationGrid<B>,
    transform: &T,
    options: &ResampleOptions,
) -> Result<ResampleStats, ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    run(interpolator, dst, transform, options, None)
}

/// Resample a source grid into a destination grid, stopping when `cancel` is set.
///
/// The flag is checked before each tile is started. A started tile is always written
/// completely, the tiles skipped after cancellation keep their previous content.
///
/// # Errors
///
/// Fails with [`ResampleError::Cancelled`] if at least one tile was skipped.
pub fn resample_with_cancel<A, T, const B: usize>(
    interpolator: &Interpolator<'_, A, B>,
    dst: &mut DestinationGrid<B>,
    transform: &T,
    options: &ResampleOptions,
    cancel: &AtomicBool,
) -> Result<ResampleStats, ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    run(interpolator, dst, transform, options, Some(cancel))
}

/// Build the kernel and the destination grid from a config, then resample.
///
/// The destination grid is initialized with the fill value.
///
/// # Arguments
///
/// * `source` - The source grid.
/// * `extent` - The pixels of the destination grid.
/// * `transform` - The destination to source coordinate transform.
/// * `config` - The resampling parameters.
///
/// # Returns
///
/// The destination grid and the counts of the job.
pub fn resample_with_config<A, T, const B: usize>(
    source: &A,
    extent: Rect,
    transform: &T,
    config: &ResampleConfig,
) -> Result<(DestinationGrid<B>, ResampleStats), ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    config.validate()?;

    let interpolator = Interpolator::new(source, config.kernel)?;
    let mut dst = DestinationGrid::new(extent, config.tile_size, config.fill_value)?;

    let stats = resample_with(&interpolator, &mut dst, transform, &config.options())?;

    Ok((dst, stats))
}

fn run<A, T, const B: usize>(
    interpolator: &Interpolator<'_, A, B>,
    dst: &mut DestinationGrid<B>,
    transform: &T,
    options: &ResampleOptions,
    cancel: Option<&AtomicBool>,
) -> Result<ResampleStats, ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    let start = Instant::now();
    let tiles_total = dst.num_tiles();

    log::debug!(
        "resampling {} into {} ({} tiles of {}) with {} kernel, {:?}",
        interpolator.source().domain(),
        dst.extent(),
        tiles_total,
        dst.tile_size(),
        interpolator.kernel(),
        options.strategy,
    );

    let results = parallel::par_iter_tiles(dst.tiles_mut(), options.strategy, |tile| {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return None;
        }
        Some(resample_tile(interpolator, tile, transform, options))
    })?;

    let mut stats = ResampleStats::default();
    let mut skipped = 0;
    for result in results {
        match result {
            Some(tile_stats) => stats += tile_stats?,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!(
            "resampling cancelled, {} of {} tiles skipped",
            skipped,
            tiles_total
        );
        return Err(ResampleError::Cancelled {
            tiles_done: stats.tiles,
            tiles_total,
        });
    }

    log::debug!(
        "resampled {} pixels ({} interpolated, {} filled) in {:?}",
        stats.pixels(),
        stats.interpolated,
        stats.filled,
        start.elapsed()
    );

    Ok(stats)
}

/// Resample a single tile of a destination grid.
///
/// Tiles are independent: resampling the tiles of a grid one by one, in any order,
/// gives the same samples as [`resample_with`].
pub fn resample_tile<A, T, const B: usize>(
    interpolator: &Interpolator<'_, A, B>,
    tile: &mut Tile<B>,
    transform: &T,
    options: &ResampleOptions,
) -> Result<ResampleStats, ResampleError>
where
    A: SampleAccessor<B> + Sync,
    T: CoordinateTransform + ?Sized,
{
    let (index, bounds) = (tile.index(), tile.bounds());
    let fill = options.fill_value;

    let rows = parallel::par_iter_tile_rows(
        tile,
        options.strategy.parallel_rows(),
        |y, samples| -> Result<ResampleStats, ResampleError> {
            let mut stats = ResampleStats::default();
            for (i, pixel) in samples.chunks_exact_mut(B).enumerate() {
                let x = bounds.x + i as i64;
                let (sx, sy) = transform.transform(x as f64, y as f64);

                if let Some((x0, y0)) = interpolator.window_origin(sx, sy) {
                    pixel.copy_from_slice(&interpolator.evaluate(x0, y0, sx, sy)?);
                    stats.interpolated += 1;
                    continue;
                }

                match options.border {
                    BorderPolicy::Extrapolate if sx.is_finite() && sy.is_finite() => {
                        pixel.copy_from_slice(&interpolator.extrapolate(sx, sy)?);
                        stats.interpolated += 1;
                    }
                    _ => {
                        pixel.fill(fill);
                        stats.filled += 1;
                    }
                }
            }
            Ok(stats)
        },
    );

    let mut stats = ResampleStats {
        tiles: 1,
        ..Default::default()
    };
    for row in rows {
        stats += row?;
    }

    log::trace!(
        "tile {} {}: {} interpolated, {} filled",
        index,
        bounds,
        stats.interpolated,
        stats.filled
    );

    Ok(stats)
}
