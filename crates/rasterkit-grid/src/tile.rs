use serde::{Deserialize, Serialize};

use crate::{accessor::SampleAccessor, accessor::SampleGrid, error::GridError, rect::Rect};

/// Size of the tiles a destination grid is partitioned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    /// Width of a tile in pixels.
    pub width: usize,
    /// Height of a tile in pixels.
    pub height: usize,
}

impl std::fmt::Display for TileSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for TileSize {
    fn from(size: [usize; 2]) -> Self {
        TileSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Independently writable rectangular part of a [`DestinationGrid`].
///
/// A tile owns its samples, row-major with interleaved bands, so distinct tiles
/// can be handed to distinct threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile<const B: usize> {
    index: usize,
    bounds: Rect,
    data: Vec<f64>,
}

impl<const B: usize> Tile<B> {
    fn new(index: usize, bounds: Rect, val: f64) -> Self {
        Self {
            index,
            bounds,
            data: vec![val; bounds.area() * B],
        }
    }

    /// Position of the tile in the grid, row-major.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pixels covered by the tile, in destination coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of samples in a row of the tile.
    pub fn row_stride(&self) -> usize {
        self.bounds.width * B
    }

    /// The raw samples of the tile.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The raw samples of the tile, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Read every band of the pixel at `(x, y)`, in destination coordinates.
    pub fn get(&self, x: i64, y: i64) -> Result<[f64; B], GridError> {
        let base = self.offset(x, y)?;
        let mut pixel = [0.0; B];
        pixel.copy_from_slice(&self.data[base..base + B]);
        Ok(pixel)
    }

    /// Write every band of the pixel at `(x, y)`, in destination coordinates.
    pub fn set(&mut self, x: i64, y: i64, pixel: &[f64; B]) -> Result<(), GridError> {
        let base = self.offset(x, y)?;
        self.data[base..base + B].copy_from_slice(pixel);
        Ok(())
    }

    fn offset(&self, x: i64, y: i64) -> Result<usize, GridError> {
        if !self.bounds.contains(x, y) {
            return Err(GridError::OutOfDomain { x, y, band: 0 });
        }
        let col = (x - self.bounds.x) as usize;
        let row = (y - self.bounds.y) as usize;
        Ok((row * self.bounds.width + col) * B)
    }
}

/// Mutable multi-band grid partitioned into tiles.
///
/// Tiles are laid out row-major; tiles on the right and bottom edges are truncated
/// to the extent. An untiled grid is a grid with a single tile.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationGrid<const B: usize> {
    extent: Rect,
    tile_size: TileSize,
    tiles_across: usize,
    tiles: Vec<Tile<B>>,
}

impl<const B: usize> DestinationGrid<B> {
    /// Create a new destination grid.
    ///
    /// # Arguments
    ///
    /// * `extent` - The pixels covered by the grid.
    /// * `tile_size` - The tile size, `None` for a single tile covering the extent.
    /// * `val` - The initial value of every sample.
    ///
    /// # Errors
    ///
    /// Fails if the extent is empty or the tile size has a zero dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterkit_grid::{DestinationGrid, Rect, TileSize};
    ///
    /// let grid = DestinationGrid::<1>::new(
    ///     Rect::from_size(10, 5),
    ///     Some(TileSize { width: 4, height: 4 }),
    ///     0.0,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(grid.num_tiles(), 6);
    /// assert_eq!(grid.tiles()[2].bounds(), Rect::new(8, 0, 2, 4));
    /// ```
    pub fn new(extent: Rect, tile_size: Option<TileSize>, val: f64) -> Result<Self, GridError> {
        if extent.is_empty() {
            return Err(GridError::EmptyExtent);
        }

        let tile_size = tile_size.unwrap_or(TileSize {
            width: extent.width,
            height: extent.height,
        });
        if tile_size.width == 0 || tile_size.height == 0 {
            return Err(GridError::InvalidTileSize(tile_size.width, tile_size.height));
        }

        let tiles_across = extent.width.div_ceil(tile_size.width);
        let tiles_down = extent.height.div_ceil(tile_size.height);

        let mut tiles = Vec::with_capacity(tiles_across * tiles_down);
        for ty in 0..tiles_down {
            for tx in 0..tiles_across {
                let x = extent.x + (tx * tile_size.width) as i64;
                let y = extent.y + (ty * tile_size.height) as i64;
                let width = tile_size.width.min(extent.width - tx * tile_size.width);
                let height = tile_size.height.min(extent.height - ty * tile_size.height);
                tiles.push(Tile::new(tiles.len(), Rect::new(x, y, width, height), val));
            }
        }

        Ok(Self {
            extent,
            tile_size,
            tiles_across,
            tiles,
        })
    }

    /// The pixels covered by the grid.
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// The nominal tile size.
    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Number of tiles.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// The tiles, row-major.
    pub fn tiles(&self) -> &[Tile<B>] {
        &self.tiles
    }

    /// The tiles, row-major, mutable.
    pub fn tiles_mut(&mut self) -> &mut [Tile<B>] {
        &mut self.tiles
    }

    /// Index of the tile containing the pixel `(x, y)`.
    pub fn tile_index_at(&self, x: i64, y: i64) -> Option<usize> {
        if !self.extent.contains(x, y) {
            return None;
        }
        let tx = (x - self.extent.x) as usize / self.tile_size.width;
        let ty = (y - self.extent.y) as usize / self.tile_size.height;
        Some(ty * self.tiles_across + tx)
    }

    /// Write every band of the pixel at `(x, y)`.
    pub fn set(&mut self, x: i64, y: i64, pixel: &[f64; B]) -> Result<(), GridError> {
        let index = self
            .tile_index_at(x, y)
            .ok_or(GridError::OutOfDomain { x, y, band: 0 })?;
        self.tiles[index].set(x, y, pixel)
    }

    /// Stitch the tiles into a single row-major [`SampleGrid`].
    pub fn to_sample_grid(&self) -> Result<SampleGrid<B>, GridError> {
        let stride = self.extent.width * B;
        let mut data = vec![0.0; self.extent.area() * B];
        for tile in self.tiles.iter() {
            let bounds = tile.bounds();
            let col = (bounds.x - self.extent.x) as usize * B;
            for (row, src) in tile.as_slice().chunks_exact(tile.row_stride()).enumerate() {
                let start = ((bounds.y - self.extent.y) as usize + row) * stride + col;
                data[start..start + src.len()].copy_from_slice(src);
            }
        }
        SampleGrid::new(self.extent, data)
    }
}

impl<const B: usize> SampleAccessor<B> for DestinationGrid<B> {
    fn domain(&self) -> Rect {
        self.extent
    }

    fn sample(&self, x: i64, y: i64, band: usize) -> Result<f64, GridError> {
        if band >= B {
            return Err(GridError::OutOfDomain { x, y, band });
        }
        let index = self
            .tile_index_at(x, y)
            .ok_or(GridError::OutOfDomain { x, y, band })?;
        Ok(self.tiles[index].get(x, y)?[band])
    }

    fn pixel(&self, x: i64, y: i64) -> Result<[f64; B], GridError> {
        let index = self
            .tile_index_at(x, y)
            .ok_or(GridError::OutOfDomain { x, y, band: 0 })?;
        self.tiles[index].get(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::{DestinationGrid, TileSize};
    use crate::{GridError, Rect, SampleAccessor};

    #[test]
    fn destination_grid_tiling() -> Result<(), GridError> {
        let grid = DestinationGrid::<2>::new(
            Rect::new(-3, 5, 7, 5),
            Some(TileSize {
                width: 3,
                height: 2,
            }),
            0.0,
        )?;

        assert_eq!(grid.num_tiles(), 9);
        assert_eq!(grid.tiles()[0].bounds(), Rect::new(-3, 5, 3, 2));
        assert_eq!(grid.tiles()[2].bounds(), Rect::new(3, 5, 1, 2));
        assert_eq!(grid.tiles()[8].bounds(), Rect::new(3, 9, 1, 1));
        assert_eq!(grid.tiles()[4].as_slice().len(), 3 * 2 * 2);

        let covered: usize = grid.tiles().iter().map(|t| t.bounds().area()).sum();
        assert_eq!(covered, grid.extent().area());

        for (i, tile) in grid.tiles().iter().enumerate() {
            assert_eq!(tile.index(), i);
            let b = tile.bounds();
            assert_eq!(grid.tile_index_at(b.min_x(), b.min_y()), Some(i));
            assert_eq!(grid.tile_index_at(b.max_x(), b.max_y()), Some(i));
        }
        assert_eq!(grid.tile_index_at(4, 5), None);

        Ok(())
    }

    #[test]
    fn destination_grid_untiled() -> Result<(), GridError> {
        let grid = DestinationGrid::<1>::new(Rect::from_size(4, 3), None, f64::NAN)?;
        assert_eq!(grid.num_tiles(), 1);
        assert_eq!(grid.tile_size(), TileSize { width: 4, height: 3 });
        assert!(grid.sample(3, 2, 0)?.is_nan());
        Ok(())
    }

    #[test]
    fn destination_grid_invalid() {
        let res = DestinationGrid::<1>::new(
            Rect::from_size(4, 3),
            Some(TileSize {
                width: 0,
                height: 3,
            }),
            0.0,
        );
        assert_eq!(res, Err(GridError::InvalidTileSize(0, 3)));

        let res = DestinationGrid::<1>::new(Rect::from_size(0, 3), None, 0.0);
        assert_eq!(res, Err(GridError::EmptyExtent));
    }

    #[test]
    fn destination_grid_stitch() -> Result<(), GridError> {
        let extent = Rect::new(1, 1, 5, 3);
        let mut grid = DestinationGrid::<2>::new(extent, Some([2, 2].into()), 0.0)?;

        for (x, y) in extent.pixels() {
            grid.set(x, y, &[x as f64, y as f64])?;
        }

        let stitched = grid.to_sample_grid()?;
        assert_eq!(stitched.domain(), extent);
        for (x, y) in extent.pixels() {
            assert_eq!(stitched.pixel(x, y)?, [x as f64, y as f64]);
            assert_eq!(grid.pixel(x, y)?, [x as f64, y as f64]);
        }
        assert!(grid.set(0, 1, &[0.0, 0.0]).is_err());

        Ok(())
    }
}
