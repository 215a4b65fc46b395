use rasterkit_grid::{GridError, SampleAccessor};

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `source` - The source grid.
/// * `x0` - The column of the top-left pixel of the 2x2 window.
/// * `y0` - The row of the top-left pixel of the 2x2 window.
/// * `x` - The x coordinate of the point to interpolate.
/// * `y` - The y coordinate of the point to interpolate.
/// * `band` - The band to interpolate.
///
/// # Returns
///
/// The interpolated sample. Points outside of the window are linearly extrapolated.
pub(crate) fn bilinear_interpolation<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    x0: i64,
    y0: i64,
    x: f64,
    y: f64,
    band: usize,
) -> Result<f64, GridError> {
    let frac_x = x - x0 as f64;
    let frac_y = y - y0 as f64;

    let frac_xx = 1.0 - frac_x;
    let frac_yy = 1.0 - frac_y;

    let w00 = frac_xx * frac_yy;
    let w01 = frac_x * frac_yy;
    let w10 = frac_xx * frac_y;
    let w11 = frac_x * frac_y;

    let p00 = source.sample(x0, y0, band)?;
    let p01 = source.sample(x0 + 1, y0, band)?;
    let p10 = source.sample(x0, y0 + 1, band)?;
    let p11 = source.sample(x0 + 1, y0 + 1, band)?;

    Ok(p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11)
}
