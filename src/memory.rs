//! # Memory Bus Abstraction
//!
//! The `MemoryBus` trait is what a CPU core sees: a flat 16-bit address space
//! where every access succeeds. `MappedMemory` implements it by routing each
//! address to whichever device owns it.
//!
//! ## Design Principles
//!
//! The trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Unmapped reads return the floating-bus value
//! - Writes to ROM/unmapped regions are ignored

/// Memory bus trait for a CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use uk101::{MappedMemory, MemoryBus, RamDevice};
///
/// let mut bus = MappedMemory::new();
/// bus.add_device(0x0000, Box::new(RamDevice::new(1024))).unwrap();
///
/// bus.write(0x0123, 0x42);
/// assert_eq!(bus.read(0x0123), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use uk101::MemoryBus;
///
/// struct Scratch {
///     ram: [u8; 0x100],
/// }
///
/// impl MemoryBus for Scratch {
///     fn read(&self, addr: u16) -> u8 {
///         // Zero page mirrored across the whole space
///         self.ram[(addr & 0xFF) as usize]
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         self.ram[(addr & 0xFF) as usize] = value;
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// Must never panic. Unmapped addresses may return any value.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// Must never panic. Read-only or unmapped addresses ignore the write.
    fn write(&mut self, addr: u16, value: u8);
}
