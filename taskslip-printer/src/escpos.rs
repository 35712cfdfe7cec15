//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::CodePage;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is encoded
/// through the builder's code page as it is written, so command bytes and
/// text bytes never need to be told apart afterwards.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    code_page: CodePage,
}

impl EscPosBuilder {
    /// Create a new builder writing text in the given code page
    pub fn new(code_page: CodePage) -> Self {
        Self {
            buf: Vec::with_capacity(256),
            code_page,
        }
    }

    // === Printer Control ===

    /// Reset the printer (ESC @) and select the code page
    pub fn init(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        self.buf.extend_from_slice(self.code_page.select_command());
        self
    }

    // === Text Output ===

    /// Write text, encoded for the printer
    pub fn text(&mut self, s: &str) -> &mut Self {
        let encoded = self.code_page.encode(s);
        self.buf.extend_from_slice(&encoded);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    /// Double width only
    pub fn double_width(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x10]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    // === Build ===

    /// Current buffer length in bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(CodePage::Wpc1252)
    }
}
