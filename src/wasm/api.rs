//! WASM API for the UK101 display.
//!
//! Provides a JavaScript-callable wrapper around `DisplayDevice`: bus-style
//! reads and writes, status and error lines, mode toggling and
//! checkpoint/restore through byte arrays.

use crate::{Device, DisplayDevice};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<crate::DisplayError> for JsError {
    fn from(e: crate::DisplayError) -> Self {
        JsError::new(&e.to_string())
    }
}

/// Display device owned by a browser page.
#[wasm_bindgen]
pub struct WasmDisplay {
    display: DisplayDevice,
}

#[wasm_bindgen]
impl WasmDisplay {
    /// Create a display that reports cell changes to `on_draw(row, column, glyph)`.
    #[wasm_bindgen(constructor)]
    pub fn new(on_draw: js_sys::Function) -> Self {
        let mut display = DisplayDevice::new();
        display.set_draw_callback(move |cell| {
            let _ = on_draw.call3(
                &JsValue::NULL,
                &JsValue::from(cell.row),
                &JsValue::from(cell.column),
                &JsValue::from(cell.glyph),
            );
        });
        display.begin();

        WasmDisplay { display }
    }

    /// Blank the screen and redraw
    pub fn begin(&mut self) {
        self.display.begin();
    }

    /// Bus write at a display offset
    pub fn write(&mut self, offset: u16, glyph: u8) {
        self.display.write(offset, glyph);
    }

    /// Bus read at a display offset
    pub fn read(&self, offset: u16) -> u8 {
        self.display.read(offset)
    }

    /// Show a status message; errors if it had to be truncated
    pub fn status(&mut self, text: &str) -> Result<(), JsError> {
        self.display.status(text).map_err(JsError::from)
    }

    /// Show an error message
    pub fn error(&mut self, text: &str) {
        self.display.error(text);
    }

    pub fn toggle_size(&mut self) {
        self.display.toggle_size();
    }

    #[wasm_bindgen(getter)]
    pub fn double_size(&self) -> bool {
        self.display.is_double_size()
    }

    #[wasm_bindgen(getter)]
    pub fn columns(&self) -> u8 {
        self.display.geometry().columns
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> u8 {
        self.display.geometry().rows
    }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> u16 {
        self.display.cursor()
    }

    /// Visible screen as text, one line per row
    pub fn screen_text(&self) -> String {
        self.display.screen_text()
    }

    /// Serialize the display into a byte array
    pub fn checkpoint(&self) -> Result<Vec<u8>, JsError> {
        let mut bytes = Vec::new();
        self.display.checkpoint(&mut bytes)?;
        Ok(bytes)
    }

    /// Restore from a byte array produced by `checkpoint`
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        let mut stream = bytes;
        self.display.restore(&mut stream)?;
        Ok(())
    }
}
