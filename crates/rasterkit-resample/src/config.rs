use serde::{Deserialize, Deserializer, Serialize};

use rasterkit_grid::{GridError, TileSize};

use crate::error::ResampleError;
use crate::interpolation::Kernel;
use crate::parallel::{ExecutionStrategy, ParallelError};
use crate::resample::{BorderPolicy, ResampleOptions};

fn default_fill_value() -> f64 {
    f64::NAN
}

// JSON has no NaN: a NaN fill value is written as `null` and read back as NaN.
fn deserialize_fill_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Parameters of a resampling job.
///
/// Every field has a default, so a config can be deserialized from a partial document.
///
/// # Example
///
/// ```
/// use rasterkit_resample::config::ResampleConfig;
/// use rasterkit_resample::interpolation::Kernel;
///
/// let config = ResampleConfig::default()
///     .with_kernel(Kernel::Lanczos(3))
///     .with_fill_value(0.0);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.fill_value, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Interpolation kernel.
    pub kernel: Kernel,
    /// Value written where no source sample is available.
    #[serde(
        default = "default_fill_value",
        deserialize_with = "deserialize_fill_value"
    )]
    pub fill_value: f64,
    /// Tile size of the destination grid, `None` for a single tile.
    pub tile_size: Option<TileSize>,
    /// Behavior outside of the effective domain of the kernel.
    pub border: BorderPolicy,
    /// How the tiles are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            fill_value: default_fill_value(),
            tile_size: None,
            border: BorderPolicy::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ResampleConfig {
    /// Set the interpolation kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the fill value.
    pub fn with_fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Set the tile size of the destination grid.
    pub fn with_tile_size(mut self, tile_size: Option<TileSize>) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the border policy.
    pub fn with_border(mut self, border: BorderPolicy) -> Self {
        self.border = border;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Fails if the Lanczos kernel has no lobe, the tile size has a zero dimension or the
    /// fixed thread count is zero.
    pub fn validate(&self) -> Result<(), ResampleError> {
        self.kernel.validate()?;

        if let Some(size) = self.tile_size {
            if size.width == 0 || size.height == 0 {
                return Err(GridError::InvalidTileSize(size.width, size.height).into());
            }
        }

        if let ExecutionStrategy::Fixed(0) = self.strategy {
            return Err(ParallelError::InvalidThreadCount(0).into());
        }

        Ok(())
    }

    /// The options passed to the resample driver.
    pub fn options(&self) -> ResampleOptions {
        ResampleOptions {
            fill_value: self.fill_value,
            border: self.border,
            strategy: self.strategy,
        }
    }
}
