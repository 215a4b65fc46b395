use rasterkit_grid::{GridError, SampleAccessor};

/// Evaluate the cubic passing through four consecutive samples.
///
/// The cubic interpolates `values[k]` exactly at `x0 + k` for `k` in `0..4`. It is
/// evaluated in Lagrange form, so evaluating at one of the anchor positions returns the
/// sample unchanged.
///
/// # Arguments
///
/// * `x0` - The position of the first sample.
/// * `t` - The position to evaluate the cubic at.
/// * `values` - The four samples at `x0`, `x0 + 1`, `x0 + 2` and `x0 + 3`.
///
/// # Example
///
/// ```
/// use rasterkit_resample::interpolation::bicubic::cubic_value;
///
/// // samples of t^2 at t = -1, 0, 1, 2
/// let values = [1.0, 0.0, 1.0, 4.0];
///
/// assert_eq!(cubic_value(-1.0, 1.0, &values), 1.0);
/// assert!((cubic_value(-1.0, 0.5, &values) - 0.25).abs() < 1e-12);
/// ```
pub fn cubic_value(x0: f64, t: f64, values: &[f64; 4]) -> f64 {
    weighted_sum(&cubic_weights(x0, t), values)
}

/// Lagrange weights of the samples at `x0..x0 + 4` for the position `t`.
fn cubic_weights(x0: f64, t: f64) -> [f64; 4] {
    let u = t - x0;
    let (u1, u2, u3) = (u - 1.0, u - 2.0, u - 3.0);

    [
        -(u1 * u2 * u3) / 6.0,
        (u * u2 * u3) / 2.0,
        -(u * u1 * u3) / 2.0,
        (u * u1 * u2) / 6.0,
    ]
}

#[inline]
fn weighted_sum(weights: &[f64; 4], values: &[f64; 4]) -> f64 {
    values[0] * weights[0] + values[1] * weights[1] + values[2] * weights[2] + values[3] * weights[3]
}

/// Power basis coefficients `[c0, c1, c2, c3]` of the cubic in `u = t - x0`.
fn cubic_coefficients(values: &[f64; 4]) -> [f64; 4] {
    let [f0, f1, f2, f3] = *values;

    // forward differences of the Newton form
    let d1 = f1 - f0;
    let d2 = f2 - 2.0 * f1 + f0;
    let d3 = f3 - 3.0 * f2 + 3.0 * f1 - f0;

    [
        f0,
        d1 - d2 / 2.0 + d3 / 3.0,
        d2 / 2.0 - d3 / 2.0,
        d3 / 6.0,
    ]
}

/// Find the local extrema of the cubic passing through four consecutive samples.
///
/// Returns the real roots of the derivative of the cubic fitted by [`cubic_value`],
/// restricted to `[low, high]` and sorted in ascending order.
///
/// # Arguments
///
/// * `x0` - The position of the first sample.
/// * `low` - The lower bound of the search interval.
/// * `high` - The upper bound of the search interval.
/// * `values` - The four samples at `x0`, `x0 + 1`, `x0 + 2` and `x0 + 3`.
///
/// # Example
///
/// ```
/// use rasterkit_resample::interpolation::bicubic::cubic_roots;
///
/// // samples of t^2 at t = -1, 0, 1, 2: the only extremum is at t = 0
/// let roots = cubic_roots(-1.0, -1.0, 2.0, &[1.0, 0.0, 1.0, 4.0]);
///
/// assert_eq!(roots.len(), 1);
/// assert!(roots[0].abs() < 1e-12);
/// ```
pub fn cubic_roots(x0: f64, low: f64, high: f64, values: &[f64; 4]) -> Vec<f64> {
    let [_, c1, c2, c3] = cubic_coefficients(values);

    // derivative: 3 c3 u^2 + 2 c2 u + c1
    let (a, b, c) = (3.0 * c3, 2.0 * c2, c1);

    let mut roots = Vec::with_capacity(2);
    if a == 0.0 {
        if b != 0.0 {
            roots.push(-c / b);
        }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant == 0.0 {
            roots.push(-b / (2.0 * a));
        } else if discriminant > 0.0 {
            let q = -0.5 * (b + b.signum() * discriminant.sqrt());
            roots.push(q / a);
            roots.push(c / q);
        }
    }

    let mut roots = roots
        .into_iter()
        .map(|u| x0 + u)
        .filter(|t| *t >= low && *t <= high)
        .collect::<Vec<_>>();
    roots.sort_by(f64::total_cmp);
    roots.dedup();
    roots
}

/// Lagrange weights of a 4x4 window, shared by every band of a pixel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CubicWeights {
    x0: i64,
    y0: i64,
    weights_x: [f64; 4],
    weights_y: [f64; 4],
}

impl CubicWeights {
    /// Weights of the window starting at `(x0, y0)` for the position `(x, y)`.
    pub(crate) fn new(x0: i64, y0: i64, x: f64, y: f64) -> Self {
        Self {
            x0,
            y0,
            weights_x: cubic_weights(x0 as f64, x),
            weights_y: cubic_weights(y0 as f64, y),
        }
    }
}

/// Kernel for bicubic interpolation
///
/// Fits a cubic along each of the four rows of the window and evaluates it at `x`,
/// then fits a cubic through the four row values and evaluates it at `y`.
///
/// # Arguments
///
/// * `source` - The source grid.
/// * `weights` - The weights of the 4x4 window around the point to interpolate.
/// * `band` - The band to interpolate.
pub(crate) fn bicubic_interpolation<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    weights: &CubicWeights,
    band: usize,
) -> Result<f64, GridError> {
    let rows = row_values(source, weights.x0, weights.y0, &weights.weights_x, band)?;
    Ok(weighted_sum(&weights.weights_y, &rows))
}

fn row_values<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    x0: i64,
    y0: i64,
    weights_x: &[f64; 4],
    band: usize,
) -> Result<[f64; 4], GridError> {
    let mut rows = [0.0; 4];
    for (j, row) in rows.iter_mut().enumerate() {
        let y = y0 + j as i64;
        let values = [
            source.sample(x0, y, band)?,
            source.sample(x0 + 1, y, band)?,
            source.sample(x0 + 2, y, band)?,
            source.sample(x0 + 3, y, band)?,
        ];
        *row = weighted_sum(weights_x, &values);
    }
    Ok(rows)
}

/// Bounds of the bicubic surface along the cell column through `x`.
///
/// The bicubic value at `(x, y)` is the cubic through the four row values evaluated
/// at `y`. Over the cell `[floor(y), floor(y) + 1]` that cubic reaches its extrema at
/// the cell edges or at the roots of its derivative, so the returned `(min, max)`
/// bounds every interpolated value of the column.
///
/// # Errors
///
/// Fails with [`GridError::OutOfDomain`] if the 4x4 window around the cell is not
/// inside the source domain.
pub fn cell_bounds<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    x: f64,
    y: f64,
    band: usize,
) -> Result<(f64, f64), GridError> {
    let (ix, iy) = (x.floor(), y.floor());
    let (x0, y0) = (ix as i64 - 1, iy as i64 - 1);

    let rows = row_values(source, x0, y0, &cubic_weights(x0 as f64, x), band)?;

    let mut candidates = vec![
        cubic_value(y0 as f64, iy, &rows),
        cubic_value(y0 as f64, iy + 1.0, &rows),
    ];
    for t in cubic_roots(y0 as f64, iy, iy + 1.0, &rows) {
        candidates.push(cubic_value(y0 as f64, t, &rows));
    }

    Ok(candidates
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        }))
}
