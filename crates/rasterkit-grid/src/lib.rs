#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Bounded sample accessor and owned sample grids.
pub mod accessor;

/// Error types for the grid module.
pub mod error;

/// Integer pixel rectangles.
pub mod rect;

/// Tiled destination grids.
pub mod tile;

pub use crate::accessor::{SampleAccessor, SampleGrid};
pub use crate::error::GridError;
pub use crate::rect::Rect;
pub use crate::tile::{DestinationGrid, Tile, TileSize};
