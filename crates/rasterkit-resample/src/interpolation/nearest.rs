use rasterkit_grid::{GridError, SampleAccessor};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `source` - The source grid.
/// * `ix` - The column of the pixel closest to the query point.
/// * `iy` - The row of the pixel closest to the query point.
/// * `band` - The band to read.
///
/// # Returns
///
/// The sample of the closest pixel.
#[inline]
pub(crate) fn nearest_neighbor_interpolation<A: SampleAccessor<B>, const B: usize>(
    source: &A,
    ix: i64,
    iy: i64,
    band: usize,
) -> Result<f64, GridError> {
    source.sample(ix, iy, band)
}
