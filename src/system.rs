//! UK101 memory map.
//!
//! ```text
//! $0000 - ....   work RAM (size chosen by the host)
//! $D000 - $D7FF  character display
//! .... - $FFFF   monitor ROM (ends at the top of memory)
//! ```
//!
//! The monitor image is supplied by the host and mapped as-is; a 2 KiB
//! monitor lands at `$F800` and owns the 6502 vectors.

use crate::devices::{DeviceError, DisplayDevice, MappedMemory, RamDevice, RomDevice, SharedDevice};
use crate::DISPLAY_SIZE;

/// Base address of work RAM.
pub const RAM_BASE: u16 = 0x0000;

/// Base address of display memory.
pub const DISPLAY_BASE: u16 = 0xD000;

/// First address above display memory.
const DISPLAY_END: u32 = DISPLAY_BASE as u32 + DISPLAY_SIZE as u32;

/// Largest monitor image that fits between the display and the top of memory.
pub const MAX_MONITOR_SIZE: usize = (0x1_0000 - DISPLAY_END) as usize;

/// Base address at which a monitor of `len` bytes is mapped.
///
/// # Examples
///
/// ```rust
/// use uk101::system::monitor_base;
///
/// assert_eq!(monitor_base(2048), Some(0xF800));
/// assert_eq!(monitor_base(0), None);
/// ```
pub fn monitor_base(len: usize) -> Option<u16> {
    if len == 0 || len > MAX_MONITOR_SIZE {
        None
    } else {
        Some((0x1_0000 - len) as u16)
    }
}

/// Build the UK101 bus around `display`.
///
/// The caller keeps its own clone of `display` for status lines, mode
/// toggles and checkpoints.
///
/// # Errors
///
/// * `DeviceError::InvalidRange` - the monitor image is empty or too large
/// * `DeviceError::OverlapError` - `ram_size` runs into display memory
///
/// # Examples
///
/// ```rust
/// use uk101::system::{uk101_memory_map, DISPLAY_BASE};
/// use uk101::{DisplayDevice, MemoryBus, SharedDevice};
///
/// let display = SharedDevice::new(DisplayDevice::new());
/// let mut bus = uk101_memory_map(0x2000, vec![0xEA; 2048], display.clone()).unwrap();
///
/// bus.write(DISPLAY_BASE + 0x0C6, b'0');
/// assert_eq!(display.borrow().buffer()[0x0C6], b'0');
/// assert_eq!(bus.read(0xFFFF), 0xEA);
/// ```
pub fn uk101_memory_map(
    ram_size: u16,
    monitor: Vec<u8>,
    display: SharedDevice<DisplayDevice>,
) -> Result<MappedMemory, DeviceError> {
    let monitor_base = monitor_base(monitor.len()).ok_or(DeviceError::InvalidRange {
        base: 0xFFFF,
        size: monitor.len(),
    })?;

    let mut memory = MappedMemory::new();
    memory.add_device(RAM_BASE, Box::new(RamDevice::new(ram_size)))?;
    memory.add_device(DISPLAY_BASE, Box::new(display))?;
    memory.add_device(monitor_base, Box::new(RomDevice::new(monitor)?))?;

    log::debug!(
        "UK101 map: {} bytes RAM, display at 0x{:04X}, monitor at 0x{:04X}",
        ram_size,
        DISPLAY_BASE,
        monitor_base
    );
    Ok(memory)
}
