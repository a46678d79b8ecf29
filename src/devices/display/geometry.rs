//! Screen geometry for the two text modes.
//!
//! Display memory is always addressed as 32 rows of 64 cells, so the bus
//! address of a cell never depends on the mode. The mode only decides how
//! much of that grid is visible:
//!
//! | Mode         | Columns | Rows | Status row |
//! |--------------|---------|------|------------|
//! | `DoubleSize` | 32      | 16   | 15         |
//! | `Normal`     | 64      | 32   | 31         |

/// Size of display memory in bytes (one byte per cell).
pub const DISPLAY_SIZE: usize = 2048;

/// Distance in bytes between the starts of consecutive rows.
pub const ROW_STRIDE: usize = 64;

/// Number of addressable rows.
pub const TOTAL_ROWS: usize = DISPLAY_SIZE / ROW_STRIDE;

/// Display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Glyphs drawn at twice size; 40-column-class display.
    DoubleSize,
    /// Glyphs drawn at native size; 80-column-class display.
    Normal,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Mode {
        match self {
            Mode::DoubleSize => Mode::Normal,
            Mode::Normal => Mode::DoubleSize,
        }
    }

    /// Visible window for this mode.
    pub fn geometry(self) -> Geometry {
        match self {
            Mode::DoubleSize => Geometry::DOUBLE_SIZE,
            Mode::Normal => Geometry::NORMAL,
        }
    }

    pub(crate) fn to_flag(self) -> u8 {
        match self {
            Mode::DoubleSize => 1,
            Mode::Normal => 0,
        }
    }

    pub(crate) fn from_flag(flag: u8) -> Option<Mode> {
        match flag {
            1 => Some(Mode::DoubleSize),
            0 => Some(Mode::Normal),
            _ => None,
        }
    }
}

/// Visible window into display memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Visible columns per row.
    pub columns: u8,
    /// Visible rows.
    pub rows: u8,
}

impl Geometry {
    /// Double-size window: 32 × 16.
    pub const DOUBLE_SIZE: Geometry = Geometry {
        columns: 32,
        rows: 16,
    };

    /// Normal window: the whole 64 × 32 grid.
    pub const NORMAL: Geometry = Geometry {
        columns: ROW_STRIDE as u8,
        rows: TOTAL_ROWS as u8,
    };

    /// Row reserved for status and error messages.
    pub fn status_row(&self) -> u8 {
        self.rows - 1
    }

    /// Visible `(row, column)` of a display offset, or `None` when the cell
    /// is off screen or outside display memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uk101::Geometry;
    ///
    /// assert_eq!(Geometry::DOUBLE_SIZE.cell(0x0C6), Some((3, 6)));
    /// assert_eq!(Geometry::DOUBLE_SIZE.cell(0x030), None);
    /// assert_eq!(Geometry::NORMAL.cell(0x030), Some((0, 48)));
    /// ```
    pub fn cell(&self, offset: u16) -> Option<(u8, u8)> {
        let offset = offset as usize;
        if offset >= DISPLAY_SIZE {
            return None;
        }
        let row = offset / ROW_STRIDE;
        let column = offset % ROW_STRIDE;
        if row < self.rows as usize && column < self.columns as usize {
            Some((row as u8, column as u8))
        } else {
            None
        }
    }

    /// Display offset of a visible cell.
    pub fn offset(&self, row: u8, column: u8) -> Option<u16> {
        if row < self.rows && column < self.columns {
            Some((row as usize * ROW_STRIDE + column as usize) as u16)
        } else {
            None
        }
    }

    /// True if `offset` is inside the visible window.
    pub fn contains(&self, offset: u16) -> bool {
        self.cell(offset).is_some()
    }

    /// Offsets of every visible cell, row by row.
    pub fn visible_offsets(self) -> impl Iterator<Item = u16> {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| (row as usize * ROW_STRIDE + column as usize) as u16)
        })
    }

    /// Number of visible cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_toggle_and_flags() {
        assert_eq!(Mode::DoubleSize.toggled(), Mode::Normal);
        assert_eq!(Mode::Normal.toggled().toggled(), Mode::Normal);

        for mode in [Mode::DoubleSize, Mode::Normal] {
            assert_eq!(Mode::from_flag(mode.to_flag()), Some(mode));
        }
        assert_eq!(Mode::from_flag(2), None);
    }

    #[test]
    fn test_normal_window_covers_all_memory() {
        let geometry = Geometry::NORMAL;
        assert_eq!(geometry.cell_count(), DISPLAY_SIZE);
        assert!((0..DISPLAY_SIZE as u16).all(|offset| geometry.contains(offset)));
        assert_eq!(TOTAL_ROWS, 32);
        assert_eq!(geometry.status_row() as usize, TOTAL_ROWS - 1);
        assert_eq!(geometry.cell((TOTAL_ROWS * ROW_STRIDE) as u16), None);
    }

    #[test]
    fn test_double_size_window() {
        let geometry = Geometry::DOUBLE_SIZE;
        assert_eq!(geometry.cell_count(), 512);
        assert_eq!(geometry.status_row(), 15);

        assert_eq!(geometry.cell(31), Some((0, 31)));
        assert_eq!(geometry.cell(32), None);
        assert_eq!(geometry.cell(64), Some((1, 0)));
        assert_eq!(geometry.cell(16 * 64), None);
        assert_eq!(geometry.cell(DISPLAY_SIZE as u16), None);
    }

    #[test]
    fn test_offset_matches_cell() {
        for geometry in [Geometry::DOUBLE_SIZE, Geometry::NORMAL] {
            for offset in geometry.visible_offsets() {
                let (row, column) = geometry.cell(offset).unwrap();
                assert_eq!(geometry.offset(row, column), Some(offset));
            }
            assert_eq!(geometry.visible_offsets().count(), geometry.cell_count());
        }
        assert_eq!(Geometry::DOUBLE_SIZE.offset(16, 0), None);
        assert_eq!(Geometry::DOUBLE_SIZE.offset(0, 32), None);
    }
}
