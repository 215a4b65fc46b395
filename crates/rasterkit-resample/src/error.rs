use rasterkit_grid::GridError;

use crate::parallel::ParallelError;

/// Errors raised by the interpolation kernels and the extrema tracker.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// The kernel window around the query point leaves the source domain.
    #[error("Interpolation at ({x}, {y}) needs {margin} pixels of margin outside of the source domain")]
    InsufficientMargin {
        /// Column of the query point.
        x: f64,
        /// Row of the query point.
        y: f64,
        /// Margin required by the kernel.
        margin: usize,
    },

    /// The extrema query is not valid for the tracker state.
    #[error("Invalid extrema query: {0}")]
    InvalidQuery(String),

    /// The Lanczos kernel needs at least one lobe.
    #[error("Lanczos lobe count must be >= 1, got {0}")]
    InvalidLobeCount(usize),

    /// Error coming from the sample accessor.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised by the resample driver.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// Error coming from an interpolation kernel.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// Error coming from the source or destination grid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Error coming from the tile executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// The job was cancelled between tiles.
    #[error("Resampling cancelled after {tiles_done} of {tiles_total} tiles")]
    Cancelled {
        /// Number of tiles completely written.
        tiles_done: usize,
        /// Number of tiles of the destination grid.
        tiles_total: usize,
    },
}
