use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rasterkit_grid::Tile;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the tiles of a destination grid are processed.
///
/// The output does not depend on the strategy: tiles share no mutable state and
/// every pixel is computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process tiles in parallel.
    ///
    /// The rows of a tile are processed serially by the worker owning the tile.
    #[default]
    ParallelTiles,

    /// Process tiles one after the other, rows of each tile in parallel.
    ///
    /// Useful when the destination has a few large tiles, or a single one.
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small grids, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether the rows of a tile are processed in parallel.
    pub fn parallel_rows(&self) -> bool {
        matches!(self, ExecutionStrategy::ParallelRows)
    }
}

/// Apply a function to every tile with the given strategy.
///
/// # Returns
///
/// The results of `op`, in tile order whatever the execution order was.
pub fn par_iter_tiles<const B: usize, R, F>(
    tiles: &mut [Tile<B>],
    strategy: ExecutionStrategy,
    op: F,
) -> Result<Vec<R>, ParallelError>
where
    R: Send,
    F: Fn(&mut Tile<B>) -> R + Send + Sync,
{
    match strategy {
        ExecutionStrategy::Serial | ExecutionStrategy::ParallelRows => {
            Ok(tiles.iter_mut().map(op).collect())
        }
        ExecutionStrategy::ParallelTiles => Ok(tiles.par_iter_mut().map(op).collect()),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            Ok(pool.install(|| tiles.par_iter_mut().map(&op).collect()))
        }
    }
}

/// Apply a function to each row of a tile.
///
/// The function receives the destination row coordinate and the samples of the row.
///
/// # Returns
///
/// The results of `f`, in row order.
pub fn par_iter_tile_rows<const B: usize, R, F>(tile: &mut Tile<B>, parallel: bool, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(i64, &mut [f64]) -> R + Send + Sync,
{
    let y0 = tile.bounds().y;
    let stride = tile.row_stride();

    if parallel {
        tile.as_slice_mut()
            .par_chunks_exact_mut(stride)
            .enumerate()
            .map(|(row, samples)| f(y0 + row as i64, samples))
            .collect()
    } else {
        tile.as_slice_mut()
            .chunks_exact_mut(stride)
            .enumerate()
            .map(|(row, samples)| f(y0 + row as i64, samples))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rasterkit_grid::{DestinationGrid, GridError, Rect, SampleAccessor};

    use super::*;

    fn grid() -> Result<DestinationGrid<1>, GridError> {
        DestinationGrid::new(Rect::from_size(7, 5), Some([3, 2].into()), 0.0)
    }

    fn run(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut grid = grid().expect("valid grid");
        par_iter_tiles(grid.tiles_mut(), strategy, |tile| tile.index() * 2)
    }

    #[test]
    fn test_tiles_serial() -> Result<(), ParallelError> {
        assert_eq!(run(ExecutionStrategy::Serial)?, (0..9).map(|i| i * 2).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_tiles_parallel_keeps_order() -> Result<(), ParallelError> {
        let expected = (0..9).map(|i| i * 2).collect::<Vec<_>>();
        assert_eq!(run(ExecutionStrategy::ParallelTiles)?, expected);
        assert_eq!(run(ExecutionStrategy::ParallelRows)?, expected);
        assert_eq!(run(ExecutionStrategy::Fixed(2))?, expected);
        Ok(())
    }

    #[test]
    fn test_tiles_fixed_error() {
        let res = run(ExecutionStrategy::Fixed(0));
        assert!(matches!(res, Err(ParallelError::InvalidThreadCount(0))));
    }

    #[test]
    fn test_tile_rows() -> Result<(), GridError> {
        for parallel in [false, true] {
            let mut grid = grid()?;
            for tile in grid.tiles_mut() {
                let x0 = tile.bounds().x;
                let rows = par_iter_tile_rows(tile, parallel, |y, samples| {
                    samples
                        .iter_mut()
                        .enumerate()
                        .for_each(|(i, v)| *v = (x0 + i as i64 + 10 * y) as f64);
                    y
                });
                let b = tile.bounds();
                assert_eq!(rows, (b.min_y()..=b.max_y()).collect::<Vec<_>>());
            }
            for (x, y) in grid.extent().pixels() {
                assert_eq!(grid.sample(x, y, 0)?, (x + 10 * y) as f64);
            }
        }
        Ok(())
    }

    #[test]
    fn test_strategy_parallel_rows() {
        assert!(ExecutionStrategy::ParallelRows.parallel_rows());
        assert!(!ExecutionStrategy::default().parallel_rows());
        assert_eq!(ExecutionStrategy::default(), ExecutionStrategy::ParallelTiles);
    }
}
