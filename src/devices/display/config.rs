//! Display configuration.

use super::geometry::Mode;

/// Glyph used for empty cells (ASCII space).
pub const BLANK_GLYPH: u8 = 0x20;

/// Bit set on error-message glyphs so the renderer can highlight them.
pub const ERROR_HIGHLIGHT: u8 = 0x80;

/// Construction-time settings for a [`DisplayDevice`](super::DisplayDevice).
///
/// # Examples
///
/// ```rust
/// use uk101::{DisplayConfig, DisplayDevice, Mode};
///
/// let config = DisplayConfig::default().with_double_size(false);
/// let display = DisplayDevice::with_config(config);
/// assert_eq!(display.mode(), Mode::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Start in double-size mode.
    pub double_size: bool,
    /// Glyph written by `begin()` and used to pad message rows.
    pub blank: u8,
    /// Mask OR-ed into each glyph of an error message.
    pub error_highlight: u8,
}

impl DisplayConfig {
    /// Start in double-size (`true`) or normal (`false`) mode.
    pub fn with_double_size(mut self, double_size: bool) -> Self {
        self.double_size = double_size;
        self
    }

    /// Glyph used for empty cells.
    pub fn with_blank(mut self, blank: u8) -> Self {
        self.blank = blank;
        self
    }

    /// Bits OR-ed into error-message glyphs.
    pub fn with_error_highlight(mut self, mask: u8) -> Self {
        self.error_highlight = mask;
        self
    }

    /// Mode a freshly constructed device starts in.
    pub fn initial_mode(&self) -> Mode {
        if self.double_size {
            Mode::DoubleSize
        } else {
            Mode::Normal
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            double_size: true,
            blank: BLANK_GLYPH,
            error_highlight: ERROR_HIGHLIGHT,
        }
    }
}
