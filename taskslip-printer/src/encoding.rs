//! Code page handling for thermal printers
//!
//! Receipt printers do not speak UTF-8. Text has to be converted to the
//! single code page the printer is switched into, and anything that code
//! page cannot represent must degrade gracefully instead of failing the job.
//!
//! Fallback order for an unmappable character:
//! 1. the transliteration table below (ASCII replacements)
//! 2. a single `?`
//!
//! ASCII control characters are never passed through, so task text can not
//! smuggle ESC/POS commands onto the wire.

use encoding_rs::{Encoding, EncoderResult, GBK, WINDOWS_1252};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Euro sign on a GBK printer: leave Chinese mode, select PC858, print 0xD5,
/// re-enter Chinese mode.
const GBK_EURO: [u8; 8] = [0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26];

/// Character table the printer is switched into before text is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePage {
    /// Windows-1252 (ESC t 16), Western European printers
    Wpc1252,
    /// GBK double-byte mode, Chinese printers
    Gbk,
}

impl CodePage {
    fn encoding(self) -> &'static Encoding {
        match self {
            CodePage::Wpc1252 => WINDOWS_1252,
            CodePage::Gbk => GBK,
        }
    }

    /// Bytes that switch the printer into this code page
    ///
    /// Must be re-sent after every ESC @, which resets the character table.
    pub fn select_command(self) -> &'static [u8] {
        match self {
            // ESC t 16
            CodePage::Wpc1252 => &[0x1B, 0x74, 16],
            // FS & (Chinese mode) + FS C 1 (GBK)
            CodePage::Gbk => &[0x1C, 0x26, 0x1C, 0x43, 0x01],
        }
    }

    /// Encode text for the printer, substituting what the code page lacks
    ///
    /// Text is composed to NFC first, so a base letter followed by a
    /// combining accent prints as the precomposed glyph.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.nfc() {
            self.encode_char(c, &mut out);
        }
        out
    }

    /// Printed width of `text` in columns
    ///
    /// Double-byte glyphs take two columns, everything else one.
    pub fn width(self, text: &str) -> usize {
        let mut scratch = Vec::with_capacity(8);
        text.nfc()
            .map(|c| {
                scratch.clear();
                self.encode_char(c, &mut scratch)
            })
            .sum()
    }

    /// Greedy word wrap measured in printed columns
    ///
    /// Explicit line breaks are kept. A word wider than `width` is put on a
    /// line of its own and left whole.
    pub fn wrap(self, text: &str, width: usize) -> Vec<String> {
        let width = width.max(1);
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut line = String::new();
            let mut line_width = 0;

            for word in paragraph.split_whitespace() {
                let word_width = self.width(word);
                if line.is_empty() {
                    line.push_str(word);
                    line_width = word_width;
                } else if line_width + 1 + word_width <= width {
                    line.push(' ');
                    line.push_str(word);
                    line_width += 1 + word_width;
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                    line_width = word_width;
                }
            }

            // whitespace-only paragraphs still take a line
            lines.push(line);
        }

        lines
    }

    /// Encode one character, returning the number of columns it occupies
    fn encode_char(self, c: char, out: &mut Vec<u8>) -> usize {
        if c == '\t' {
            out.push(b' ');
            return 1;
        }
        if c.is_control() {
            return 0;
        }
        if c.is_ascii() {
            out.push(c as u8);
            return 1;
        }
        if self == CodePage::Gbk && c == '€' {
            out.extend_from_slice(&GBK_EURO);
            return 1;
        }

        let mut utf8 = [0u8; 4];
        let mut dst = [0u8; 8];
        let mut encoder = self.encoding().new_encoder();
        let (result, _, written) =
            encoder.encode_from_utf8_without_replacement(c.encode_utf8(&mut utf8), &mut dst, true);

        if matches!(result, EncoderResult::InputEmpty) && written > 0 {
            out.extend_from_slice(&dst[..written]);
            return written;
        }

        match transliterate(c) {
            Some(replacement) => replacement
                .chars()
                .map(|r| self.encode_char(r, out))
                .sum(),
            None => {
                out.push(b'?');
                1
            }
        }
    }
}

/// ASCII stand-in for characters a code page may not carry
///
/// Every replacement is plain ASCII.
pub fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => " ",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '«' | '»' => "\"",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '…' => "...",
        '•' | '·' | '∙' | '◦' | '▪' => "*",
        '→' => "->",
        '←' => "<-",
        '⇒' => "=>",
        '≤' => "<=",
        '≥' => ">=",
        '≠' => "!=",
        '×' => "x",
        '÷' => "/",
        '✓' | '✔' => "v",
        '✗' | '✘' => "x",
        '™' => "TM",
        '©' => "(c)",
        '®' => "(R)",
        '€' => "EUR",
        '£' => "GBP",
        '°' => "deg",
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Č' => "C",
        'ç' | 'ć' | 'č' => "c",
        'Ď' | 'Đ' => "D",
        'ď' | 'đ' => "d",
        'È'..='Ë' | 'Ē' | 'Ę' | 'Ě' => "E",
        'è'..='ë' | 'ē' | 'ę' | 'ě' => "e",
        'Ğ' => "G",
        'ğ' => "g",
        'Ì'..='Ï' | 'Ī' | 'İ' => "I",
        'ì'..='ï' | 'ī' | 'ı' => "i",
        'Ł' => "L",
        'ł' => "l",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ñ' | 'ń' | 'ň' => "n",
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ő' => "O",
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ř' => "R",
        'ř' => "r",
        'Ś' | 'Ş' | 'Š' | 'Ș' => "S",
        'ś' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'Ť' | 'Ţ' | 'Ț' => "T",
        'ť' | 'ţ' | 'ț' => "t",
        'Ù'..='Ü' | 'Ū' | 'Ů' | 'Ű' => "U",
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => "u",
        'Ý' | 'Ÿ' => "Y",
        'ý' | 'ÿ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(s)
}
