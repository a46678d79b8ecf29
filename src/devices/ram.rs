//! RAM device implementation.
//!
//! Work RAM for the low end of the UK101 map.

use super::Device;

/// Readable and writable memory block.
///
/// # Examples
///
/// ```rust
/// use uk101::{Device, RamDevice};
///
/// let mut ram = RamDevice::new(1024);
///
/// ram.write(0x42, 0xAA);
/// assert_eq!(ram.read(0x42), 0xAA);
/// ```
pub struct RamDevice {
    data: Vec<u8>,
}

impl RamDevice {
    /// Create a RAM block of `size` bytes, all zero.
    pub fn new(size: u16) -> Self {
        Self {
            data: vec![0; size as usize],
        }
    }

    /// Copy `bytes` into RAM starting at `offset`.
    ///
    /// Bytes that would land past the end of the device are dropped; the
    /// number of bytes actually stored is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uk101::{Device, RamDevice};
    ///
    /// let mut ram = RamDevice::new(4);
    /// assert_eq!(ram.load_bytes(2, &[0x01, 0x02, 0x03]), 2);
    /// assert_eq!(ram.read(3), 0x02);
    /// ```
    pub fn load_bytes(&mut self, offset: u16, bytes: &[u8]) -> usize {
        let start = (offset as usize).min(self.data.len());
        let end = (start + bytes.len()).min(self.data.len());
        let stored = end - start;
        self.data[start..end].copy_from_slice(&bytes[..stored]);
        if stored < bytes.len() {
            log::warn!(
                "RAM load at 0x{:04X} truncated: {} of {} bytes stored",
                offset,
                stored,
                bytes.len()
            );
        }
        stored
    }
}

impl Device for RamDevice {
    fn read(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, offset: u16, value: u8) {
        if let Some(cell) = self.data.get_mut(offset as usize) {
            *cell = value;
        }
    }

    fn size(&self) -> u16 {
        self.data.len() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_new() {
        let ram = RamDevice::new(256);
        assert_eq!(ram.size(), 256);
        assert!((0..256).all(|i| ram.read(i) == 0x00));
    }

    #[test]
    fn test_ram_read_write() {
        let mut ram = RamDevice::new(256);

        ram.write(0, 0xAA);
        ram.write(255, 0xCC);

        assert_eq!(ram.read(0), 0xAA);
        assert_eq!(ram.read(255), 0xCC);
        assert_eq!(ram.read(1), 0x00);
    }

    #[test]
    fn test_ram_load_bytes() {
        let mut ram = RamDevice::new(256);

        // LDA #$2A, STA $D000
        let program = [0xA9, 0x2A, 0x8D, 0x00, 0xD0];
        assert_eq!(ram.load_bytes(0x10, &program), 5);

        assert_eq!(ram.read(0x10), 0xA9);
        assert_eq!(ram.read(0x14), 0xD0);
    }

    #[test]
    fn test_ram_out_of_range_access() {
        let mut ram = RamDevice::new(16);

        ram.write(16, 0x55);
        assert_eq!(ram.read(16), 0xFF);
        assert_eq!(ram.load_bytes(20, &[1, 2, 3]), 0);
    }
}
