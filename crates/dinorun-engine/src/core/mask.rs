/// Widest shape a [`CollisionMask`] can hold (one `u64` per row).
pub const MAX_MASK_WIDTH: usize = u64::BITS as usize;

/// Single row of a [`CollisionMask`].
///
/// Bit `x` (LSB first) is set when column `x` of the row is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskRow {
    bits: u64,
}

impl MaskRow {
    pub const EMPTY: Self = Self { bits: 0 };

    #[inline]
    #[must_use]
    pub fn is_cell_set(self, x: usize) -> bool {
        x < MAX_MASK_WIDTH && (self.bits >> x) & 1 != 0
    }

    #[inline]
    fn set_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    /// Returns the row bits moved `dx` columns to the right (left when negative).
    ///
    /// Columns shifted past either end of the row are dropped.
    #[inline]
    fn shifted(self, dx: i32) -> u64 {
        let shift = dx.unsigned_abs();
        if shift >= u64::BITS {
            0
        } else if dx >= 0 {
            self.bits << shift
        } else {
            self.bits >> shift
        }
    }
}

/// Per-pixel collision shape.
///
/// Masks are compared with [`CollisionMask::overlap`], which places the other
/// mask at an offset relative to this mask's top-left corner and reports the
/// first solid pixel both share.
///
/// # Example
///
/// ```
/// use dinorun_engine::CollisionMask;
///
/// let block = CollisionMask::filled(4, 4);
/// assert!(block.overlaps(&block, (3, 3)));
/// assert!(!block.overlaps(&block, (4, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: usize,
    rows: Vec<MaskRow>,
}

impl CollisionMask {
    /// Builds a mask by asking `is_solid(x, y)` for every pixel.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_MASK_WIDTH`].
    pub fn from_fn<F>(width: usize, height: usize, mut is_solid: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        assert!(
            width <= MAX_MASK_WIDTH,
            "mask width {width} exceeds {MAX_MASK_WIDTH}"
        );
        let rows = (0..height)
            .map(|y| {
                let mut row = MaskRow::EMPTY;
                for x in (0..width).filter(|&x| is_solid(x, y)) {
                    row.set_cell(x);
                }
                row
            })
            .collect();
        Self { width, rows }
    }

    /// A fully solid rectangle.
    #[must_use]
    pub fn filled(width: usize, height: usize) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && self.rows.get(y).is_some_and(|row| row.is_cell_set(x))
    }

    /// Number of solid pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.iter().map(|row| row.bits.count_ones() as usize).sum()
    }

    /// Finds the first pixel where `other`, placed at `offset` relative to this
    /// mask, overlaps this mask.
    ///
    /// Returns the overlapping point in this mask's coordinates, scanning rows
    /// top to bottom and columns left to right.
    #[must_use]
    pub fn overlap(&self, other: &Self, offset: (i32, i32)) -> Option<(usize, usize)> {
        let (dx, dy) = offset;
        for (y, row) in self.rows.iter().enumerate() {
            let Ok(y_i32) = i32::try_from(y) else {
                break;
            };
            let Some(other_y) = y_i32
                .checked_sub(dy)
                .and_then(|other_y| usize::try_from(other_y).ok())
            else {
                continue;
            };
            let Some(other_row) = other.rows.get(other_y) else {
                continue;
            };
            let common = row.bits & other_row.shifted(dx);
            if common != 0 {
                return Some((common.trailing_zeros() as usize, y));
            }
        }
        None
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
