use std::f64::consts::PI;

use rasterkit_grid::{GridError, SampleAccessor};

/// One dimensional Lanczos weight `sinc(d) * sinc(d / a)` for `|d| < a`, zero otherwise.
///
/// Integer distances other than zero have an exact zero weight, so the kernel passes
/// through the samples.
pub fn lanczos_weight(d: f64, lobes: usize) -> f64 {
    let a = lobes as f64;
    if d == 0.0 {
        return 1.0;
    }
    if d.abs() >= a || d.fract() == 0.0 {
        return 0.0;
    }

    let pi_d = PI * d;
    let pi_d_a = pi_d / a;

    (pi_d.sin() / pi_d) * (pi_d_a.sin() / pi_d_a)
}

/// Weights of the `2 * lobes` samples starting at `x0` for the position `x`.
pub(crate) fn lanczos_weights(x0: i64, x: f64, lobes: usize) -> Vec<f64> {
    (0..2 * lobes)
        .map(|i| lanczos_weight(x - (x0 + i as i64) as f64, lobes))
        .collect()
}

/// Normalized 2D Lanczos weights of a window, shared by every band of a pixel.
///
/// The 2D weight of a sample is the product of the 1D weights along each axis. Samples
/// with a zero weight are dropped.
#[derive(Debug, Clone)]
pub(crate) struct LanczosWeights {
    taps: Vec<(i64, i64, f64)>,
    norm: f64,
    nearest: (i64, i64),
}

impl LanczosWeights {
    /// Weights of the window starting at `(x0, y0)` for the position `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `x0` - The column of the top-left pixel of the window.
    /// * `y0` - The row of the top-left pixel of the window.
    /// * `x` - The x coordinate of the point to interpolate.
    /// * `y` - The y coordinate of the point to interpolate.
    /// * `lobes` - The number of lobes of the kernel.
    pub(crate) fn new(x0: i64, y0: i64, x: f64, y: f64, lobes: usize) -> Self {
        let weights_x = lanczos_weights(x0, x, lobes);
        let weights_y = lanczos_weights(y0, y, lobes);

        let mut taps = Vec::with_capacity(weights_x.len() * weights_y.len());
        let mut norm = 0.0;
        for (j, wy) in weights_y.iter().enumerate() {
            if *wy == 0.0 {
                continue;
            }
            for (i, wx) in weights_x.iter().enumerate() {
                let w = wx * wy;
                if w == 0.0 {
                    continue;
                }
                taps.push((x0 + i as i64, y0 + j as i64, w));
                norm += w;
            }
        }

        let last = 2 * lobes as i64 - 1;
        let nearest = (
            (x.round() as i64).clamp(x0, x0 + last),
            (y.round() as i64).clamp(y0, y0 + last),
        );

        Self {
            taps,
            norm,
            nearest,
        }
    }
}

/// Kernel for Lanczos interpolation
///
/// The weighted sum is divided by the sum of the weights, so the weights sum to one
/// over the window.
///
/// # Arguments
///
/// * `source` - The source grid.
/// * `weights` - The weights of the window around the point to interpolate.
/// * `band` - The band to interpolate.
pub(crate) fn lanczos_interpolation<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    weights: &LanczosWeights,
    band: usize,
) -> Result<f64, GridError> {
    if weights.norm == 0.0 {
        // only reachable when extrapolating far from the window
        let (ix, iy) = weights.nearest;
        return source.sample(ix, iy, band);
    }

    let mut sum = 0.0;
    for &(ix, iy, w) in &weights.taps {
        sum += w * source.sample(ix, iy, band)?;
    }

    Ok(sum / weights.norm)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rasterkit_grid::{GridError, Rect, SampleGrid};

    use super::{lanczos_interpolation, lanczos_weight, lanczos_weights, LanczosWeights};

    #[test]
    fn lanczos_weight_values() {
        assert_eq!(lanczos_weight(0.0, 3), 1.0);
        assert_eq!(lanczos_weight(1.0, 3), 0.0);
        assert_eq!(lanczos_weight(-2.0, 3), 0.0);
        assert_eq!(lanczos_weight(3.0, 3), 0.0);
        assert_eq!(lanczos_weight(3.5, 3), 0.0);
        assert_abs_diff_eq!(lanczos_weight(0.5, 1), 4.0 / (std::f64::consts::PI.powi(2)), epsilon = 1e-12);
        assert!(lanczos_weight(1.5, 2) < 0.0);
        assert_eq!(lanczos_weight(0.3, 2), lanczos_weight(-0.3, 2));
    }

    #[test]
    fn lanczos_weights_window() {
        let w = lanczos_weights(-1, 1.0, 2);
        assert_eq!(w, vec![0.0, 0.0, 1.0, 0.0]);

        let w = lanczos_weights(-1, 0.5, 2);
        assert_eq!(w.len(), 4);
        assert_abs_diff_eq!(w[1], w[2], epsilon = 1e-15);
        assert_abs_diff_eq!(w[0], w[3], epsilon = 1e-15);
    }

    #[test]
    fn lanczos_constant_grid() -> Result<(), GridError> {
        let grid = SampleGrid::<1>::from_size_val(Rect::from_size(6, 6), 2.5)?;
        for (x, y) in [(2.5, 2.5), (2.1, 2.7), (2.0, 2.9)] {
            let v = lanczos_interpolation(&grid, &LanczosWeights::new(0, 0, x, y, 3), 0)?;
            assert_abs_diff_eq!(v, 2.5, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn lanczos_symmetric_midpoint() -> Result<(), GridError> {
        // a linear ramp is reproduced at the window center by symmetry
        let grid = SampleGrid::<1>::from_fn(Rect::from_size(4, 4), |x, _| [x as f64])?;
        let v = lanczos_interpolation(&grid, &LanczosWeights::new(0, 0, 1.5, 1.5, 2), 0)?;
        assert_abs_diff_eq!(v, 1.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn lanczos_weights_shared_by_bands() -> Result<(), GridError> {
        let grid = SampleGrid::<3>::from_fn(Rect::from_size(6, 6), |x, y| {
            let v = (x * x + 3 * y) as f64;
            [v, 2.0 * v, -v]
        })?;

        let weights = LanczosWeights::new(1, 1, 2.3, 2.6, 2);
        // the integer column drops out of the window
        let weights_x = LanczosWeights::new(1, 1, 3.0, 2.6, 2);
        assert_eq!(weights.taps.len(), 16);
        assert_eq!(weights_x.taps.len(), 4);

        for weights in [weights, weights_x] {
            let v = lanczos_interpolation(&grid, &weights, 0)?;
            assert_abs_diff_eq!(lanczos_interpolation(&grid, &weights, 1)?, 2.0 * v, epsilon = 1e-12);
            assert_abs_diff_eq!(lanczos_interpolation(&grid, &weights, 2)?, -v, epsilon = 1e-12);
            assert!(lanczos_interpolation(&grid, &weights, 3).is_err());
        }

        Ok(())
    }

    #[test]
    fn lanczos_zero_norm_takes_nearest_sample() -> Result<(), GridError> {
        let grid = SampleGrid::<1>::from_fn(Rect::from_size(4, 4), |x, y| [(x + 10 * y) as f64])?;
        // every weight vanishes two lobes away from the window
        let weights = LanczosWeights::new(0, 0, 7.5, 0.0, 1);
        assert_eq!(weights.norm, 0.0);
        assert_eq!(lanczos_interpolation(&grid, &weights, 0)?, 1.0);
        Ok(())
    }
}
