use serde::{Deserialize, Serialize};

use crate::error::InterpolationError;

/// Interpolation kernel used to evaluate a grid at continuous coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Kernel {
    /// Nearest neighbor, rounding half up.
    Nearest,
    /// Bilinear interpolation between the four surrounding pixels.
    #[default]
    Bilinear,
    /// Separable cubic fitted through a 4x4 neighborhood.
    BiCubic,
    /// Windowed sinc with the given number of lobes.
    Lanczos(usize),
}

impl Kernel {
    /// Pixels of neighborhood the kernel needs beyond the queried cell.
    pub fn margin(&self) -> usize {
        match self {
            Kernel::Nearest => 0,
            Kernel::Bilinear => 1,
            Kernel::BiCubic => 2,
            Kernel::Lanczos(lobes) => *lobes,
        }
    }

    /// Offsets of the first and last sample read, relative to the anchor pixel.
    pub fn window(&self) -> (i64, i64) {
        match self {
            Kernel::Nearest => (0, 0),
            Kernel::Bilinear => (0, 1),
            Kernel::BiCubic => (-1, 2),
            Kernel::Lanczos(lobes) => (1 - *lobes as i64, *lobes as i64),
        }
    }

    /// Number of samples read along each axis.
    pub fn window_len(&self) -> usize {
        let (lo, hi) = self.window();
        (hi - lo + 1) as usize
    }

    /// Anchor pixel of a continuous coordinate, as a float.
    #[inline]
    pub(crate) fn anchor(&self, v: f64) -> f64 {
        match self {
            Kernel::Nearest => {
                // `v + 0.5` rounds up below one half, e.g. for 0.49999999999999994
                let f = v.floor();
                if v - f >= 0.5 {
                    f + 1.0
                } else {
                    f
                }
            }
            _ => v.floor(),
        }
    }

    /// Check the kernel parameters.
    pub fn validate(&self) -> Result<(), InterpolationError> {
        match self {
            Kernel::Lanczos(0) => Err(InterpolationError::InvalidLobeCount(0)),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kernel::Nearest => write!(f, "nearest"),
            Kernel::Bilinear => write!(f, "bilinear"),
            Kernel::BiCubic => write!(f, "bicubic"),
            Kernel::Lanczos(lobes) => write!(f, "lanczos{lobes}"),
        }
    }
}

impl std::str::FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        match s.as_str() {
            "nearest" => Ok(Kernel::Nearest),
            "bilinear" => Ok(Kernel::Bilinear),
            "bicubic" => Ok(Kernel::BiCubic),
            "lanczos" => Ok(Kernel::Lanczos(3)),
            _ => s
                .strip_prefix("lanczos")
                .and_then(|lobes| lobes.parse::<usize>().ok())
                .map(Kernel::Lanczos)
                .ok_or_else(|| format!("unknown interpolation kernel: {s}")),
        }
    }
}
