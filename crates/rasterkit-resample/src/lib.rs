#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Resampling job configuration.
pub mod config;

/// Error types for the resample module.
pub mod error;

/// Interpolation kernels and the extrema tracker.
pub mod interpolation;

/// Utility functions to process tiles in parallel.
pub mod parallel;

/// Tiled resample driver.
pub mod resample;

/// Coordinate transforms.
pub mod transform;

pub use crate::config::ResampleConfig;
pub use crate::error::{InterpolationError, ResampleError};
pub use crate::interpolation::{Extrema, ExtremaTracker, Interpolator, Kernel};
pub use crate::parallel::ExecutionStrategy;
pub use crate::resample::{
    resample, resample_with, resample_with_cancel, resample_with_config, BorderPolicy,
    ResampleOptions, ResampleStats,
};
pub use crate::transform::{AffineTransform, CoordinateTransform, ProjectiveTransform};
