//! Integration tests for the UK101 memory map.
//!
//! These tests drive the display the way a CPU core would: through
//! `MemoryBus` on a `MappedMemory` holding RAM, the display and a monitor.

use uk101::system::{uk101_memory_map, DISPLAY_BASE};
use uk101::{
    CellUpdate, DeviceError, DisplayDevice, MappedMemory, MemoryBus, Mode, RamDevice, RomDevice,
    SharedDevice,
};
use std::cell::RefCell;
use std::rc::Rc;

fn uk101() -> (MappedMemory, SharedDevice<DisplayDevice>) {
    let display = SharedDevice::new(DisplayDevice::new());
    display.borrow_mut().begin();
    let bus = uk101_memory_map(0x2000, vec![0xEA; 2048], display.clone()).unwrap();
    (bus, display)
}

#[test]
fn test_monitor_style_screen_clear() {
    let (mut bus, display) = uk101();

    // What the monitor does on reset: fill $D000-$D7FF with spaces
    for addr in DISPLAY_BASE..DISPLAY_BASE + 0x800 {
        bus.write(addr, 0x20);
    }

    assert!(display.borrow().buffer().iter().all(|&g| g == 0x20));
    assert_eq!(display.borrow().cursor(), 0x7FF);
}

#[test]
fn test_cpu_writes_reach_renderer() {
    let (mut bus, display) = uk101();

    let drawn = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&drawn);
    display
        .borrow_mut()
        .set_draw_callback(move |cell| sink.borrow_mut().push(cell));

    // Address display at $D0C6: row 3, column 6
    for (i, &c) in b"0000".iter().enumerate() {
        bus.write(0xD0C6 + i as u16, c);
    }

    assert_eq!(
        drawn.borrow()[0],
        CellUpdate {
            row: 3,
            column: 6,
            glyph: b'0'
        }
    );
    assert_eq!(drawn.borrow().len(), 4);
    assert_eq!(bus.read(0xD0C9), b'0');
}

#[test]
fn test_host_status_visible_to_cpu() {
    let (bus, display) = uk101();

    display.borrow_mut().status("LOADED").unwrap();

    // Status row is row 15 in double-size mode
    let row = DISPLAY_BASE + 15 * 64;
    let read: Vec<u8> = (0..6).map(|i| bus.read(row + i)).collect();
    assert_eq!(read, b"LOADED");
    assert_eq!(bus.read(row + 6), 0x20);
}

#[test]
fn test_mode_toggle_through_shared_handle() {
    let (mut bus, display) = uk101();

    display.borrow_mut().toggle_size();
    assert_eq!(display.borrow().mode(), Mode::Normal);

    bus.write(DISPLAY_BASE + 0x7C0, b'N');
    assert!(display.borrow().screen_text().lines().nth(31).unwrap().starts_with('N'));

    display.borrow_mut().toggle_size();
    assert_eq!(bus.read(DISPLAY_BASE + 0x7C0), 0x20);
}

#[test]
fn test_snapshot_of_running_machine() {
    let (mut bus, display) = uk101();
    bus.write(DISPLAY_BASE + 0x100, b'S');

    let mut snapshot = Vec::new();
    display.borrow().checkpoint(&mut snapshot).unwrap();

    bus.write(DISPLAY_BASE + 0x100, b'X');
    display.borrow_mut().restore(&mut snapshot.as_slice()).unwrap();

    assert_eq!(bus.read(DISPLAY_BASE + 0x100), b'S');
}

#[test]
fn test_display_overlapping_ram_is_rejected() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0xC000, Box::new(RamDevice::new(0x1800)))
        .unwrap();

    let result = memory.add_device(DISPLAY_BASE, Box::new(DisplayDevice::new()));
    assert_eq!(
        result,
        Err(DeviceError::OverlapError {
            new_base: 0xD000,
            new_size: 0x800,
            existing_base: 0xC000,
            existing_size: 0x1800,
        })
    );
}

#[test]
fn test_rom_and_display_side_by_side() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0xD000, Box::new(DisplayDevice::new()))
        .unwrap();
    memory
        .add_device(0xD800, Box::new(RomDevice::new(vec![0x60; 0x2800]).unwrap()))
        .unwrap();

    memory.write(0xD7FF, b'!');
    memory.write(0xD800, b'!');

    assert_eq!(memory.read(0xD7FF), b'!');
    assert_eq!(memory.read(0xD800), 0x60);
}

#[test]
fn test_oversized_rom_never_reaches_the_bus() {
    let mut memory = MappedMemory::new();

    let result = RomDevice::new(vec![0xAA; 0x10000 + 0x10])
        .and_then(|rom| memory.add_device(0x0000, Box::new(rom)));

    assert!(matches!(result, Err(DeviceError::InvalidRange { .. })));
    assert_eq!(memory.device_count(), 0);
    assert_eq!(memory.read(0x000F), 0xFF);
}
