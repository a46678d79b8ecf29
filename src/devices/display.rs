//! UK101 character display device.
//!
//! Display memory is 2 KiB of glyph cells mapped on the bus (at `$D000` on a
//! UK101). The CPU draws by storing glyph codes; the host renderer is handed
//! a [`CellUpdate`] for every visible cell that is stored to.
//!
//! ## Bus Addressing
//!
//! Every bus access latches the cursor to the accessed offset and then goes
//! through the single write-at-cursor / read-at-cursor slot, so offset
//! `row * 64 + column` always names the same cell whatever the mode.
//!
//! ## Modes
//!
//! | Mode         | Visible window | Status row |
//! |--------------|----------------|------------|
//! | `DoubleSize` | 32 × 16        | 15         |
//! | `Normal`     | 64 × 32        | 31         |
//!
//! Switching to the smaller window blanks every cell that falls off screen,
//! so growing the window again never resurrects stale text.

use std::cell::Cell;
use std::io::{self, Read, Write};

use super::Device;

mod checkpoint;
mod config;
mod geometry;

pub use checkpoint::{CheckpointFault, CHECKPOINT_MAGIC, CHECKPOINT_SIZE, CHECKPOINT_VERSION};
pub use config::{DisplayConfig, BLANK_GLYPH, ERROR_HIGHLIGHT};
pub use geometry::{Geometry, Mode, DISPLAY_SIZE, ROW_STRIDE, TOTAL_ROWS};

use checkpoint::Snapshot;

/// Errors reported by the display.
#[derive(Debug)]
pub enum DisplayError {
    /// Address outside display memory.
    OutOfRange {
        /// Offending offset
        offset: u16,
        /// Size of display memory
        size: u16,
    },
    /// Restore input is malformed; the device was left untouched.
    CorruptCheckpoint(CheckpointFault),
    /// Message longer than the status row; the row holds the first `width`
    /// characters.
    DisplayOverflow {
        /// Characters in the message
        len: usize,
        /// Characters that fit
        width: usize,
    },
    /// The checkpoint stream failed.
    Io(io::Error),
}

impl std::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DisplayError::OutOfRange { offset, size } => write!(
                f,
                "display offset 0x{:04X} out of range (size 0x{:04X})",
                offset, size
            ),
            DisplayError::CorruptCheckpoint(fault) => write!(f, "corrupt checkpoint: {}", fault),
            DisplayError::DisplayOverflow { len, width } => write!(
                f,
                "message of {} characters truncated to {} columns",
                len, width
            ),
            DisplayError::Io(e) => write!(f, "checkpoint I/O error: {}", e),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DisplayError {
    fn from(e: io::Error) -> Self {
        DisplayError::Io(e)
    }
}

/// A visible cell changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    /// Row within the visible window
    pub row: u8,
    /// Column within the visible window
    pub column: u8,
    /// Glyph code now stored in the cell
    pub glyph: u8,
}

/// Memory-mapped character display.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use uk101::{CellUpdate, Device, DisplayDevice};
///
/// let drawn = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&drawn);
///
/// let mut display = DisplayDevice::new();
/// display.set_draw_callback(move |cell| sink.borrow_mut().push(cell));
///
/// // Row 3, column 6
/// display.write(0x0C6, b'*');
/// assert_eq!(
///     drawn.borrow().last(),
///     Some(&CellUpdate { row: 3, column: 6, glyph: b'*' })
/// );
/// ```
pub struct DisplayDevice {
    buffer: Box<[u8; DISPLAY_SIZE]>,

    // Latched by bus reads too, which only get `&self`
    cursor: Cell<u16>,

    mode: Mode,
    config: DisplayConfig,

    // Host renderer
    on_draw: Option<Box<dyn Fn(CellUpdate)>>,
}

impl DisplayDevice {
    /// Create a blank display in double-size mode.
    pub fn new() -> Self {
        Self::with_config(DisplayConfig::default())
    }

    /// Create a blank display from `config`.
    pub fn with_config(config: DisplayConfig) -> Self {
        Self {
            buffer: Box::new([config.blank; DISPLAY_SIZE]),
            cursor: Cell::new(0),
            mode: config.initial_mode(),
            config,
            on_draw: None,
        }
    }

    /// Blank every cell, home the cursor and redraw.
    ///
    /// Idempotent; the mode is left as it is.
    pub fn begin(&mut self) {
        self.buffer.fill(self.config.blank);
        self.cursor.set(0);
        log::debug!("display reset in {:?} mode", self.mode);
        self.redraw();
    }

    /// Register the host renderer.
    ///
    /// The callback sees every store into a visible cell, and every visible
    /// cell after `begin()`, `toggle_size()` and a successful `restore()`.
    ///
    /// The callback runs while the display is being mutated. When the display
    /// sits on a bus inside a [`SharedDevice`](crate::SharedDevice), the bus
    /// holds the mutable borrow for the whole write, so the callback must not
    /// borrow the display through another clone of that handle; doing so
    /// panics. Copy what it needs out of the `CellUpdate` instead.
    pub fn set_draw_callback<F>(&mut self, callback: F)
    where
        F: Fn(CellUpdate) + 'static,
    {
        self.on_draw = Some(Box::new(callback));
    }

    /// Settings the display was built with.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Current display mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True in double-size mode.
    pub fn is_double_size(&self) -> bool {
        self.mode == Mode::DoubleSize
    }

    /// Visible window for the current mode.
    pub fn geometry(&self) -> Geometry {
        self.mode.geometry()
    }

    /// Offset of the cell the next slot access will use.
    pub fn cursor(&self) -> u16 {
        self.cursor.get()
    }

    /// Point the cursor at `offset`.
    ///
    /// # Errors
    ///
    /// `DisplayError::OutOfRange` if `offset` is outside display memory; the
    /// cursor is left where it was.
    pub fn set_cursor(&mut self, offset: u16) -> Result<(), DisplayError> {
        if offset as usize >= DISPLAY_SIZE {
            return Err(DisplayError::OutOfRange {
                offset,
                size: DISPLAY_SIZE as u16,
            });
        }
        self.cursor.set(offset);
        Ok(())
    }

    /// Store `glyph` in the cell under the cursor.
    pub fn write_at_cursor(&mut self, glyph: u8) {
        self.store(self.cursor.get(), glyph);
    }

    /// Glyph in the cell under the cursor.
    pub fn read_at_cursor(&self) -> u8 {
        self.buffer[self.cursor.get() as usize]
    }

    /// Whole of display memory.
    pub fn buffer(&self) -> &[u8; DISPLAY_SIZE] {
        &self.buffer
    }

    /// Visible cells of `row`, or `None` past the last visible row.
    pub fn visible_row(&self, row: u8) -> Option<&[u8]> {
        let geometry = self.geometry();
        let start = geometry.offset(row, 0)? as usize;
        Some(&self.buffer[start..start + geometry.columns as usize])
    }

    /// Visible window as text, one line per row.
    ///
    /// The error highlight is stripped; glyphs with no printable ASCII
    /// equivalent show as `.`.
    pub fn screen_text(&self) -> String {
        let geometry = self.geometry();
        let mask = !self.config.error_highlight;
        (0..geometry.rows)
            .filter_map(|row| self.visible_row(row))
            .map(|cells| {
                cells
                    .iter()
                    .map(|&glyph| {
                        let c = (glyph & mask) as char;
                        if c == ' ' || c.is_ascii_graphic() {
                            c
                        } else {
                            '.'
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Show `text` on the status row.
    ///
    /// The row is overwritten and padded with the blank glyph. Characters
    /// outside ASCII are shown as `?`.
    ///
    /// # Errors
    ///
    /// `DisplayError::DisplayOverflow` if `text` is wider than the row. The
    /// first `width` characters have still been drawn.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uk101::DisplayDevice;
    ///
    /// let mut display = DisplayDevice::new();
    /// display.status("HELLO").unwrap();
    /// assert_eq!(&display.visible_row(15).unwrap()[..6], b"HELLO ");
    /// ```
    pub fn status(&mut self, text: &str) -> Result<(), DisplayError> {
        let width = self.geometry().columns as usize;
        let len = self.render_message(text, 0);
        if len > width {
            log::debug!("status truncated: {:?}", text);
            return Err(DisplayError::DisplayOverflow { len, width });
        }
        Ok(())
    }

    /// Show `text` on the status row as an error.
    ///
    /// Like [`status`](Self::status), but each glyph carries the error
    /// highlight bit. Never fails: overlong text is truncated.
    pub fn error(&mut self, text: &str) {
        let width = self.geometry().columns as usize;
        let len = self.render_message(text, self.config.error_highlight);
        if len > width {
            log::debug!("error message truncated: {:?}", text);
        }
    }

    /// Switch between double-size and normal mode.
    ///
    /// Cells falling outside the new window are blanked, then the visible
    /// window is redrawn. The cursor is unchanged.
    pub fn toggle_size(&mut self) {
        let next = self.mode.toggled();
        let geometry = next.geometry();
        let blank = self.config.blank;

        for (offset, cell) in self.buffer.iter_mut().enumerate() {
            if !geometry.contains(offset as u16) {
                *cell = blank;
            }
        }
        self.mode = next;

        log::debug!(
            "display mode now {:?} ({}x{})",
            next,
            geometry.columns,
            geometry.rows
        );
        self.redraw();
    }

    /// Write mode, cursor and display memory to `stream`.
    ///
    /// See the `checkpoint` module for the layout.
    pub fn checkpoint<W: Write + ?Sized>(&self, stream: &mut W) -> Result<(), DisplayError> {
        self.snapshot().write_to(stream)?;
        log::trace!("display checkpoint written");
        Ok(())
    }

    /// Replace mode, cursor and display memory with a record from `stream`.
    ///
    /// The record is read and validated in full before anything changes.
    ///
    /// # Errors
    ///
    /// * `DisplayError::CorruptCheckpoint` - bad magic, version, mode or cursor, or a short stream
    /// * `DisplayError::Io` - the stream failed
    ///
    /// On error the device is exactly as it was before the call.
    pub fn restore<R: Read + ?Sized>(&mut self, stream: &mut R) -> Result<(), DisplayError> {
        let snapshot = Snapshot::read_from(stream).map_err(|e| {
            log::warn!("display restore rejected: {}", e);
            e
        })?;

        self.buffer = snapshot.buffer;
        self.cursor.set(snapshot.cursor);
        self.mode = snapshot.mode;

        log::debug!("display restored in {:?} mode", self.mode);
        self.redraw();
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            cursor: self.cursor.get(),
            buffer: self.buffer.clone(),
        }
    }

    /// Draw a message across the status row, returning its length in
    /// characters.
    fn render_message(&mut self, text: &str, highlight: u8) -> usize {
        let geometry = self.geometry();
        let row = geometry.status_row() as usize * ROW_STRIDE;
        let blank = self.config.blank;

        let mut glyphs = text
            .chars()
            .map(|c| (if c.is_ascii() { c as u8 } else { b'?' }) | highlight);
        for column in 0..geometry.columns as usize {
            let glyph = glyphs.next().unwrap_or(blank);
            self.store((row + column) as u16, glyph);
        }

        text.chars().count()
    }

    fn store(&mut self, offset: u16, glyph: u8) {
        self.buffer[offset as usize] = glyph;
        self.notify(offset);
    }

    fn notify(&self, offset: u16) {
        if let Some(ref callback) = self.on_draw {
            if let Some((row, column)) = self.geometry().cell(offset) {
                callback(CellUpdate {
                    row,
                    column,
                    glyph: self.buffer[offset as usize],
                });
            }
        }
    }

    fn redraw(&self) {
        if self.on_draw.is_some() {
            for offset in self.geometry().visible_offsets() {
                self.notify(offset);
            }
        }
    }
}

impl Default for DisplayDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for DisplayDevice {
    fn read(&self, offset: u16) -> u8 {
        if offset as usize >= DISPLAY_SIZE {
            log::warn!("display read out of range: 0x{:04X}", offset);
            return 0xFF;
        }
        self.cursor.set(offset);
        self.read_at_cursor()
    }

    fn write(&mut self, offset: u16, value: u8) {
        if self.set_cursor(offset).is_err() {
            log::warn!(
                "display write 0x{:02X} out of range: 0x{:04X}",
                value,
                offset
            );
            return;
        }
        self.write_at_cursor(value);
    }

    fn size(&self) -> u16 {
        DISPLAY_SIZE as u16
    }
}
