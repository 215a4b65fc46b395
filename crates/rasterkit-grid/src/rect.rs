/// Integer pixel rectangle.
///
/// A rectangle covers the pixels `[x, x + width) x [y, y + height)`. The origin may be
/// negative, so grids can be centered on any point of the pixel space.
///
/// # Examples
///
/// ```
/// use rasterkit_grid::Rect;
///
/// let rect = Rect::new(-1, -1, 3, 3);
///
/// assert_eq!(rect.max_x(), 1);
/// assert_eq!(rect.max_y(), 1);
/// assert!(rect.contains(0, 0));
/// assert!(!rect.contains(2, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Column of the first pixel.
    pub x: i64,
    /// Row of the first pixel.
    pub y: i64,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rect {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Rect {
    /// Create a new rectangle from its origin and size.
    pub fn new(x: i64, y: i64, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at the origin.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Create a rectangle from inclusive corner coordinates.
    ///
    /// Returns `None` when `max_x < min_x` or `max_y < min_y`.
    pub fn from_corners(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Option<Self> {
        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(Self::new(
            min_x,
            min_y,
            (max_x - min_x + 1) as usize,
            (max_y - min_y + 1) as usize,
        ))
    }

    /// Column of the first pixel.
    #[inline]
    pub fn min_x(&self) -> i64 {
        self.x
    }

    /// Row of the first pixel.
    #[inline]
    pub fn min_y(&self) -> i64 {
        self.y
    }

    /// Column of the last pixel (inclusive).
    #[inline]
    pub fn max_x(&self) -> i64 {
        self.x + self.width as i64 - 1
    }

    /// Row of the last pixel (inclusive).
    #[inline]
    pub fn max_y(&self) -> i64 {
        self.y + self.height as i64 - 1
    }

    /// Number of pixels covered by the rectangle.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the pixel `(x, y)` lies inside the rectangle.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        !self.is_empty() && x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && self.contains(other.min_x(), other.min_y())
            && self.contains(other.max_x(), other.max_y())
    }

    /// Iterate over the pixels of the rectangle in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (i64, i64)> {
        let (x0, width) = (self.x, self.width as i64);
        (self.y..self.y + self.height as i64).flat_map(move |y| (x0..x0 + width).map(move |x| (x, y)))
    }
}
