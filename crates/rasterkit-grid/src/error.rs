/// An error type for the grid module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A sample was requested outside of the grid domain.
    #[error("Sample ({x}, {y}) band {band} is outside of the grid domain")]
    OutOfDomain {
        /// Column of the requested sample.
        x: i64,
        /// Row of the requested sample.
        y: i64,
        /// Band of the requested sample.
        band: usize,
    },

    /// Error when the data length does not match the grid size.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a tile size has a zero dimension.
    #[error("Invalid tile size {0}x{1}, both dimensions must be > 0")]
    InvalidTileSize(usize, usize),

    /// Error when a grid extent has no pixels.
    #[error("Grid extent is empty")]
    EmptyExtent,
}
