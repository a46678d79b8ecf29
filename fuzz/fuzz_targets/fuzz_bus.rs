//! Fuzz target for bus traffic and host messages.
//!
//! Drives a display with an arbitrary mix of bus reads and writes, status
//! and error lines and mode toggles, checking the drawing invariants after
//! every step.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::cell::RefCell;
use std::rc::Rc;
use uk101::{Device, DisplayDevice, BLANK_GLYPH};

#[derive(Debug, Arbitrary)]
enum Op {
    Write { offset: u16, glyph: u8 },
    Read { offset: u16 },
    Status(String),
    Error(String),
    Toggle,
    Begin,
}

fuzz_target!(|ops: Vec<Op>| {
    // Limit input size to keep iterations fast
    if ops.len() > 4096 {
        return;
    }

    let mut display = DisplayDevice::new();
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&drawn);
    display.set_draw_callback(move |cell| sink.borrow_mut().push(cell));
    display.begin();

    for op in ops {
        drawn.borrow_mut().clear();
        match op {
            Op::Write { offset, glyph } => {
                let cursor = display.cursor();
                display.write(offset, glyph);
                if offset < display.size() {
                    assert_eq!(display.read(offset), glyph);
                } else {
                    assert_eq!(display.cursor(), cursor);
                }
            }
            Op::Read { offset } => {
                let value = display.read(offset);
                if offset >= display.size() {
                    assert_eq!(value, 0xFF);
                }
            }
            Op::Status(text) => {
                let fits = text.chars().count() <= display.geometry().columns as usize;
                assert_eq!(display.status(&text).is_ok(), fits);
            }
            Op::Error(text) => display.error(&text),
            Op::Toggle => {
                display.toggle_size();
                let geometry = display.geometry();
                for (offset, &glyph) in display.buffer().iter().enumerate() {
                    if !geometry.contains(offset as u16) {
                        assert_eq!(glyph, BLANK_GLYPH);
                    }
                }
            }
            Op::Begin => display.begin(),
        }

        // Every reported cell is on screen and matches memory
        let geometry = display.geometry();
        for cell in drawn.borrow().iter() {
            let offset = geometry.offset(cell.row, cell.column).unwrap();
            assert_eq!(display.buffer()[offset as usize], cell.glyph);
        }
    }
});
