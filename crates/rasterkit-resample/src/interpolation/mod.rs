//! Sample interpolation kernels for grid resampling.
//!
//! This module provides the interpolation algorithms used to evaluate a source grid
//! at continuous coordinates while resampling it through a coordinate transform.
//!
//! # Interpolation Kernels
//!
//! - **Nearest**: uses the closest pixel, rounding half up (no interpolation)
//! - **Bilinear**: linear interpolation between the 2x2 surrounding pixels
//! - **BiCubic**: separable cubic through the 4x4 surrounding pixels
//! - **Lanczos(a)**: windowed sinc over the 2a x 2a surrounding pixels
//!
//! Every kernel passes through the samples: interpolating at an integer point of the
//! effective domain returns the stored sample.

/// Cubic fitting primitives and the bicubic kernel.
pub mod bicubic;

mod bilinear;
mod extrema;
mod interpolate;
mod kernel;

/// Lanczos weights and the Lanczos kernel.
pub mod lanczos;

mod nearest;

pub use extrema::{Extrema, ExtremaTracker};
pub use interpolate::Interpolator;
pub use kernel::Kernel;
