//! # UK101 Character Display
//!
//! A memory-mapped character display device for a UK101-class 6502 machine,
//! built to plug into a host memory bus next to RAM and the monitor ROM.
//!
//! The display is a 2 KiB block of glyph cells. The CPU writes characters
//! straight into it, the host renderer is told which visible cells changed,
//! and the whole device can be checkpointed to any `std::io::Write` and
//! restored from any `std::io::Read`.
//!
//! ## Quick Start
//!
//! ```rust
//! use uk101::{Device, DisplayDevice};
//!
//! let mut display = DisplayDevice::new();
//! display.begin();
//!
//! // The bus writes 'A' into row 1, column 2
//! display.write(64 + 2, b'A');
//! assert_eq!(display.read(64 + 2), b'A');
//!
//! // Status line lives on the last visible row
//! display.status("READY").unwrap();
//! assert!(display.screen_text().ends_with(&format!("{:<32}", "READY")));
//! ```
//!
//! ## Modules
//!
//! - `devices` - `Device` trait, bus routing, RAM/ROM and the display itself
//! - `memory` - `MemoryBus` trait the CPU side talks to
//! - `system` - UK101 memory map assembly
//! - `wasm` - JavaScript bindings (feature `wasm`)

pub mod devices;
pub mod memory;
pub mod system;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use devices::display::{
    CellUpdate, CheckpointFault, DisplayConfig, DisplayDevice, DisplayError, Geometry, Mode,
    BLANK_GLYPH, CHECKPOINT_MAGIC, CHECKPOINT_SIZE, CHECKPOINT_VERSION, DISPLAY_SIZE,
    ERROR_HIGHLIGHT, ROW_STRIDE,
};
pub use devices::{Device, DeviceError, MappedMemory, RamDevice, RomDevice, SharedDevice};
pub use memory::MemoryBus;
