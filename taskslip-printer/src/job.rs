//! Print jobs as ordered directive lists
//!
//! A [`PrintJob`] is what a renderer produces and what a transport consumes.
//! Encoding is a pure function of the directives and the code page.

use crate::encoding::CodePage;
use crate::escpos::EscPosBuilder;

/// Character size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextSize {
    #[default]
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// Text style applied to subsequent lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub size: TextSize,
}

impl TextStyle {
    pub const NORMAL: TextStyle = TextStyle {
        bold: false,
        size: TextSize::Normal,
    };

    /// Bold, double width and height
    pub const HEADLINE: TextStyle = TextStyle {
        bold: true,
        size: TextSize::Double,
    };
}

/// One atomic printer instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Reset the printer and select the code page
    Init,
    Style(TextStyle),
    /// One line of text, without the line terminator
    Line(String),
    BlankLine,
    /// Print and feed n lines
    Feed(u8),
    /// Full cut
    Cut,
}

impl Directive {
    fn write(&self, b: &mut EscPosBuilder) {
        match self {
            Directive::Init => {
                b.init();
            }
            Directive::Style(style) => {
                if style.bold {
                    b.bold();
                } else {
                    b.bold_off();
                }
                match style.size {
                    TextSize::Normal => b.reset_size(),
                    TextSize::DoubleHeight => b.double_height(),
                    TextSize::DoubleWidth => b.double_width(),
                    TextSize::Double => b.double_size(),
                };
            }
            Directive::Line(text) => {
                b.line(text);
            }
            Directive::BlankLine => {
                b.newline();
            }
            Directive::Feed(lines) => {
                b.feed(*lines);
            }
            Directive::Cut => {
                b.cut();
            }
        }
    }

    /// Encode this directive on its own
    pub fn to_bytes(&self, code_page: CodePage) -> Vec<u8> {
        let mut b = EscPosBuilder::new(code_page);
        self.write(&mut b);
        b.build()
    }
}

/// Ordered directive sequence for one physical card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PrintJob {
    directives: Vec<Directive>,
}

impl PrintJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn ends_with_cut(&self) -> bool {
        matches!(self.directives.last(), Some(Directive::Cut))
    }

    /// Text of every `Line` directive, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Line(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Encode into one byte segment per directive
    ///
    /// A job always finishes with a cut: one is appended when the directive
    /// list does not already end with it.
    pub fn encode(&self, code_page: CodePage) -> Vec<Vec<u8>> {
        let mut segments: Vec<Vec<u8>> = self
            .directives
            .iter()
            .map(|d| d.to_bytes(code_page))
            .collect();
        if !self.ends_with_cut() {
            segments.push(Directive::Cut.to_bytes(code_page));
        }
        segments
    }

    /// Encode into a single buffer
    pub fn to_bytes(&self, code_page: CodePage) -> Vec<u8> {
        self.encode(code_page).concat()
    }
}

impl FromIterator<Directive> for PrintJob {
    fn from_iter<I: IntoIterator<Item = Directive>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_encoding() {
        assert_eq!(
            Directive::Style(TextStyle::HEADLINE).to_bytes(CodePage::Wpc1252),
            vec![0x1B, 0x45, 0x01, 0x1D, 0x21, 0x11]
        );
        assert_eq!(
            Directive::Style(TextStyle::NORMAL).to_bytes(CodePage::Wpc1252),
            vec![0x1B, 0x45, 0x00, 0x1D, 0x21, 0x00]
        );
    }

    #[test]
    fn test_encode_one_segment_per_directive() {
        let job: PrintJob = [
            Directive::Init,
            Directive::Line("hello".to_string()),
            Directive::Feed(3),
            Directive::Cut,
        ]
        .into_iter()
        .collect();

        let segments = job.encode(CodePage::Wpc1252);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1], b"hello\n".to_vec());
        assert_eq!(segments[3], vec![0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_encode_appends_missing_cut() {
        let mut job = PrintJob::new();
        job.push(Directive::Line("x".to_string()));
        assert!(!job.ends_with_cut());

        let bytes = job.to_bytes(CodePage::Wpc1252);
        assert!(bytes.ends_with(&[0x1D, 0x56, 0x00]));
    }

    #[test]
    fn test_lines_only_text() {
        let job: PrintJob = [
            Directive::Init,
            Directive::Line("a".to_string()),
            Directive::BlankLine,
            Directive::Line("b".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(job.lines().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
