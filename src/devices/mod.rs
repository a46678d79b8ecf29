//! Memory-mapped device support.
//!
//! This module provides the mapping architecture that lets the UK101 hardware
//! blocks (RAM, monitor ROM, character display) share one 6502 memory bus.
//!
//! # Architecture
//!
//! - **Device trait**: Abstract interface for memory-mapped hardware components
//! - **MappedMemory**: Routes read/write operations to registered devices based on address ranges
//! - **SharedDevice**: Lets the host keep a handle on a device after handing it to the bus
//!
//! # Example
//!
//! ```rust
//! use uk101::{DisplayDevice, MappedMemory, MemoryBus, RamDevice, RomDevice, SharedDevice};
//!
//! let mut memory = MappedMemory::new();
//!
//! // 8KB RAM at 0x0000-0x1FFF
//! memory.add_device(0x0000, Box::new(RamDevice::new(8192))).unwrap();
//!
//! // Display at 0xD000-0xD7FF, kept reachable from the host
//! let display = SharedDevice::new(DisplayDevice::new());
//! memory.add_device(0xD000, Box::new(display.clone())).unwrap();
//!
//! // 2KB monitor at 0xF800-0xFFFF
//! memory.add_device(0xF800, Box::new(RomDevice::new(vec![0xEA; 2048]).unwrap())).unwrap();
//!
//! memory.write(0xD000, b'*');
//! assert_eq!(display.borrow().buffer()[0], b'*');
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::MemoryBus;

// Device implementations
pub mod display;
pub mod ram;
pub mod rom;

// Re-export device types
pub use display::DisplayDevice;
pub use ram::RamDevice;
pub use rom::RomDevice;

/// Abstract interface for memory-mapped hardware devices.
///
/// The memory mapper calls these methods with offset-based addressing
/// (0 to size-1) so a device never needs to know where it is mapped.
///
/// # Design
///
/// - **Offset-based**: Device receives offset (0 to size-1), not absolute address
/// - **No panics**: Out-of-range offsets are a bus bug, answered without corrupting state
/// - **Immutable read**: Devices with read side effects use interior mutability
/// - **Mutable write**: Explicit side effects (buffer updates, renderer notifications)
/// - **Fixed size**: `size()` never changes after construction
///
/// # Examples
///
/// ```rust
/// use uk101::Device;
///
/// struct Latch {
///     value: u8,
/// }
///
/// impl Device for Latch {
///     fn read(&self, _offset: u16) -> u8 {
///         self.value
///     }
///
///     fn write(&mut self, _offset: u16, value: u8) {
///         self.value = value;
///     }
///
///     fn size(&self) -> u16 {
///         1
///     }
/// }
/// ```
pub trait Device {
    /// Read byte from device at offset relative to device base address.
    fn read(&self, offset: u16) -> u8;

    /// Write byte to device at offset relative to device base address.
    fn write(&mut self, offset: u16, value: u8);

    /// Return size of device's address space in bytes.
    fn size(&self) -> u16;
}

/// Host-side handle on a device that is also registered with a bus.
///
/// Cloning the handle shares the device. The bus holds one clone, the host
/// keeps another to drive operations the bus cannot express (status lines,
/// checkpoints, mode toggles).
pub struct SharedDevice<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> SharedDevice<T> {
    /// Wrap a device for shared ownership.
    pub fn new(device: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(device)),
        }
    }

    /// Borrow the device immutably.
    ///
    /// # Panics
    ///
    /// Panics if the device is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Borrow the device mutably.
    ///
    /// # Panics
    ///
    /// Panics if the device is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }
}

impl<T> Clone for SharedDevice<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Device> Device for SharedDevice<T> {
    fn read(&self, offset: u16) -> u8 {
        self.inner.borrow().read(offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.inner.borrow_mut().write(offset, value);
    }

    fn size(&self) -> u16 {
        self.inner.borrow().size()
    }
}

/// Internal mapping of a device to a base address.
struct DeviceMapping {
    base_addr: u16,
    device: Box<dyn Device>,
}

impl DeviceMapping {
    /// One past the last address, widened so a device ending at 0xFFFF fits.
    fn end(&self) -> u32 {
        self.base_addr as u32 + self.device.size() as u32
    }

    fn contains(&self, addr: u16) -> bool {
        addr >= self.base_addr && (addr as u32) < self.end()
    }
}

/// Error returned when device registration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Address range overlaps with an existing device.
    OverlapError {
        /// Base address of the new device
        new_base: u16,
        /// Size of the new device
        new_size: u16,
        /// Base address of the conflicting existing device
        existing_base: u16,
        /// Size of the conflicting existing device
        existing_size: u16,
    },
    /// Device is empty or would extend past 0xFFFF.
    InvalidRange {
        /// Requested base address
        base: u16,
        /// Size of the device (in bytes)
        size: usize,
    },
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DeviceError::OverlapError {
                new_base,
                new_size,
                existing_base,
                existing_size,
            } => {
                write!(
                    f,
                    "Device address range overlap: new device at 0x{:04X}-0x{:04X} overlaps with existing device at 0x{:04X}-0x{:04X}",
                    new_base,
                    new_base.saturating_add(*new_size).saturating_sub(1),
                    existing_base,
                    existing_base.saturating_add(*existing_size).saturating_sub(1)
                )
            }
            DeviceError::InvalidRange { base, size } => {
                write!(
                    f,
                    "Device of {} bytes cannot be mapped at 0x{:04X}",
                    size, base
                )
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// Memory mapper that routes read/write operations to registered devices.
///
/// Unmapped addresses read as 0xFF (6502 floating bus) and ignore writes.
///
/// # Examples
///
/// ```rust
/// use uk101::{MappedMemory, MemoryBus, RamDevice};
///
/// let mut memory = MappedMemory::new();
/// memory.add_device(0x0000, Box::new(RamDevice::new(16384))).unwrap();
///
/// memory.write(0x1234, 0x42);
/// assert_eq!(memory.read(0x1234), 0x42);
///
/// // Unmapped address returns 0xFF
/// assert_eq!(memory.read(0x8000), 0xFF);
/// ```
pub struct MappedMemory {
    devices: Vec<DeviceMapping>,
    unmapped_value: u8,
}

impl MappedMemory {
    /// Create a new empty memory mapper.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            unmapped_value: 0xFF, // Classic 6502 floating bus behavior
        }
    }

    /// Register a device at the specified base address.
    ///
    /// The device occupies `base_addr` to `base_addr + device.size() - 1`.
    ///
    /// # Errors
    ///
    /// * `DeviceError::InvalidRange` - Device is empty or runs past 0xFFFF
    /// * `DeviceError::OverlapError` - Address range overlaps with existing device
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uk101::{MappedMemory, RamDevice};
    ///
    /// let mut memory = MappedMemory::new();
    /// memory.add_device(0x0000, Box::new(RamDevice::new(16384))).unwrap();
    ///
    /// // Overlaps the first device
    /// let result = memory.add_device(0x1000, Box::new(RamDevice::new(1024)));
    /// assert!(result.is_err());
    /// ```
    pub fn add_device(
        &mut self,
        base_addr: u16,
        device: Box<dyn Device>,
    ) -> Result<(), DeviceError> {
        let new_size = device.size();
        let new_end = base_addr as u32 + new_size as u32;

        if new_size == 0 || new_end > 0x1_0000 {
            return Err(DeviceError::InvalidRange {
                base: base_addr,
                size: new_size as usize,
            });
        }

        // Ranges [base_addr, new_end) and [existing, existing_end) overlap
        // when each starts before the other ends.
        for mapping in &self.devices {
            if (base_addr as u32) < mapping.end() && new_end > mapping.base_addr as u32 {
                return Err(DeviceError::OverlapError {
                    new_base: base_addr,
                    new_size,
                    existing_base: mapping.base_addr,
                    existing_size: mapping.device.size(),
                });
            }
        }

        log::debug!(
            "mapped {}-byte device at 0x{:04X}-0x{:04X}",
            new_size,
            base_addr,
            new_end - 1
        );
        self.devices.push(DeviceMapping { base_addr, device });
        Ok(())
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn find_device(&mut self, addr: u16) -> Option<(&mut (dyn Device + 'static), u16)> {
        self.devices
            .iter_mut()
            .find(|mapping| mapping.contains(addr))
            .map(|mapping| (mapping.device.as_mut(), addr - mapping.base_addr))
    }

    fn find_device_immut(&self, addr: u16) -> Option<(&dyn Device, u16)> {
        self.devices
            .iter()
            .find(|mapping| mapping.contains(addr))
            .map(|mapping| (mapping.device.as_ref(), addr - mapping.base_addr))
    }
}

impl Default for MappedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MappedMemory {
    fn read(&self, addr: u16) -> u8 {
        if let Some((device, offset)) = self.find_device_immut(addr) {
            device.read(offset)
        } else {
            self.unmapped_value
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some((device, offset)) = self.find_device(addr) {
            device.write(offset, value);
        }
        // Unmapped writes are silently ignored (matching 6502 hardware behavior)
    }
}
