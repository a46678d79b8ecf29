//! WebAssembly bindings for the UK101 display.
//!
//! Lets a browser page host the display: the page receives cell updates and
//! paints them, and can snapshot the device to a byte array.

pub mod api;

pub use api::WasmDisplay;
