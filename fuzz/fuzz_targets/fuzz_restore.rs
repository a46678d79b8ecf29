//! Fuzz target for checkpoint restore.
//!
//! Feeds arbitrary byte streams to `DisplayDevice::restore` and checks that a
//! rejected stream leaves the display untouched and an accepted one
//! checkpoints back to the exact record it was read from.

#![no_main]

use libfuzzer_sys::fuzz_target;
use uk101::{Device, DisplayDevice, CHECKPOINT_MAGIC, CHECKPOINT_SIZE};

fuzz_target!(|data: &[u8]| {
    let mut display = DisplayDevice::new();
    display.begin();
    display.write(0x0C6, b'#');
    display.toggle_size();

    let before = display.buffer().to_vec();
    let cursor = display.cursor();
    let mode = display.mode();

    // Half the time, splice a valid magic in so the body gets exercised
    let mut bytes = data.to_vec();
    if bytes.first().map_or(false, |b| b & 1 == 1) && bytes.len() >= 4 {
        bytes[..4].copy_from_slice(&CHECKPOINT_MAGIC);
    }

    let mut stream = bytes.as_slice();
    match display.restore(&mut stream) {
        Ok(()) => {
            assert!(bytes.len() >= CHECKPOINT_SIZE);
            assert_eq!(stream.len(), bytes.len() - CHECKPOINT_SIZE);

            let mut out = Vec::new();
            display.checkpoint(&mut out).unwrap();
            assert_eq!(out.as_slice(), &bytes[..CHECKPOINT_SIZE]);
            assert!((display.cursor() as usize) < display.size() as usize);
        }
        Err(_) => {
            assert_eq!(display.buffer().as_slice(), before.as_slice());
            assert_eq!(display.cursor(), cursor);
            assert_eq!(display.mode(), mode);
        }
    }
});
