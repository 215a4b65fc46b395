use crate::{error::GridError, rect::Rect};

/// Bounded random-access view over an integer-indexed multi-band grid.
///
/// Implementors expose a fixed rectangular domain and `B` bands. Samples are only
/// defined for integer coordinates inside the domain; any other request fails with
/// [`GridError::OutOfDomain`].
pub trait SampleAccessor<const B: usize> {
    /// The valid pixel coordinates of the grid.
    fn domain(&self) -> Rect;

    /// Read the sample stored at `(x, y)` for the given band.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfDomain`] if `(x, y)` is outside the domain or
    /// `band >= B`.
    fn sample(&self, x: i64, y: i64, band: usize) -> Result<f64, GridError>;

    /// Number of bands of every pixel.
    fn num_bands(&self) -> usize {
        B
    }

    /// Read every band of the pixel at `(x, y)`.
    fn pixel(&self, x: i64, y: i64) -> Result<[f64; B], GridError> {
        let mut pixel = [0.0; B];
        for (band, value) in pixel.iter_mut().enumerate() {
            *value = self.sample(x, y, band)?;
        }
        Ok(pixel)
    }
}

impl<const B: usize, A: SampleAccessor<B> + ?Sized> SampleAccessor<B> for &A {
    fn domain(&self) -> Rect {
        (**self).domain()
    }

    fn sample(&self, x: i64, y: i64, band: usize) -> Result<f64, GridError> {
        (**self).sample(x, y, band)
    }

    fn pixel(&self, x: i64, y: i64) -> Result<[f64; B], GridError> {
        (**self).pixel(x, y)
    }
}

/// Owned multi-band sample grid.
///
/// Samples are stored row-major with interleaved bands, i.e. with shape
/// (height, width, B), the same layout a decoded raster comes in.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid<const B: usize> {
    domain: Rect,
    data: Vec<f64>,
}

impl<const B: usize> SampleGrid<B> {
    /// Create a new grid from sample data.
    ///
    /// # Arguments
    ///
    /// * `domain` - The pixel rectangle covered by the grid.
    /// * `data` - The samples, row-major with interleaved bands.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match `domain.area() * B`, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterkit_grid::{Rect, SampleAccessor, SampleGrid};
    ///
    /// let grid = SampleGrid::<1>::new(
    ///     Rect::new(-1, -1, 3, 3),
    ///     (0..9).map(|v| v as f64).collect(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(grid.sample(0, 0, 0).unwrap(), 4.0);
    /// assert!(grid.sample(2, 0, 0).is_err());
    /// ```
    pub fn new(domain: Rect, data: Vec<f64>) -> Result<Self, GridError> {
        if domain.is_empty() {
            return Err(GridError::EmptyExtent);
        }
        let expected = domain.area() * B;
        if data.len() != expected {
            return Err(GridError::InvalidDataLength(data.len(), expected));
        }
        Ok(Self { domain, data })
    }

    /// Create a new grid with every sample set to `val`.
    pub fn from_size_val(domain: Rect, val: f64) -> Result<Self, GridError> {
        Self::new(domain, vec![val; domain.area() * B])
    }

    /// Create a new grid by evaluating `f` at every pixel of the domain.
    pub fn from_fn(domain: Rect, f: impl Fn(i64, i64) -> [f64; B]) -> Result<Self, GridError> {
        let mut data = Vec::with_capacity(domain.area() * B);
        for (x, y) in domain.pixels() {
            data.extend_from_slice(&f(x, y));
        }
        Self::new(domain, data)
    }

    /// The raw samples, row-major with interleaved bands.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: i64, y: i64) -> usize {
        let col = (x - self.domain.x) as usize;
        let row = (y - self.domain.y) as usize;
        (row * self.domain.width + col) * B
    }
}

impl<const B: usize> SampleAccessor<B> for SampleGrid<B> {
    fn domain(&self) -> Rect {
        self.domain
    }

    #[inline]
    fn sample(&self, x: i64, y: i64, band: usize) -> Result<f64, GridError> {
        if band >= B || !self.domain.contains(x, y) {
            return Err(GridError::OutOfDomain { x, y, band });
        }
        Ok(self.data[self.offset(x, y) + band])
    }

    fn pixel(&self, x: i64, y: i64) -> Result<[f64; B], GridError> {
        if !self.domain.contains(x, y) {
            return Err(GridError::OutOfDomain { x, y, band: 0 });
        }
        let base = self.offset(x, y);
        let mut pixel = [0.0; B];
        pixel.copy_from_slice(&self.data[base..base + B]);
        Ok(pixel)
    }
}
