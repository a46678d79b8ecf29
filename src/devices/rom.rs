//! ROM device implementation.
//!
//! Holds the monitor image. The image is opaque to this crate: whatever the
//! host loads is mapped read-only and never interpreted.

use super::{Device, DeviceError};

/// Read-only memory device.
///
/// Writes are silently ignored, matching ROM hardware.
///
/// # Examples
///
/// ```rust
/// use uk101::{Device, RomDevice};
///
/// let mut rom = RomDevice::new(vec![0xA2, 0x28, 0x9A]).unwrap();
/// assert_eq!(rom.read(0), 0xA2);
///
/// rom.write(0, 0xFF);
/// assert_eq!(rom.read(0), 0xA2);
/// ```
pub struct RomDevice {
    data: Vec<u8>,
}

impl RomDevice {
    /// Create a ROM device holding `data`.
    ///
    /// # Errors
    ///
    /// `DeviceError::InvalidRange` if the image is longer than 0xFFFF bytes
    /// and so cannot be mapped anywhere on the bus.
    pub fn new(data: Vec<u8>) -> Result<Self, DeviceError> {
        if data.len() > u16::MAX as usize {
            return Err(DeviceError::InvalidRange {
                base: 0x0000,
                size: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Raw image bytes.
    pub fn image(&self) -> &[u8] {
        &self.data
    }
}

impl Device for RomDevice {
    fn read(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, offset: u16, value: u8) {
        log::trace!("ignored ROM write 0x{:02X} at offset 0x{:04X}", value, offset);
    }

    fn size(&self) -> u16 {
        self.data.len() as u16
    }
}
