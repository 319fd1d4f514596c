//! Font metrics for the standard Helvetica faces.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for the printable ASCII
//! range. Anything else falls back to an average glyph width, which keeps
//! layout deterministic without embedding or parsing a font program.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::{Split, SplitWhitespace};

use serde::Serialize;

const UNITS_PER_EM: f32 = 1000.0;
const ASCENDER: f32 = 718.0;
const DESCENDER: f32 = 207.0;
/// Chosen so that line height is exactly 1.25 em.
const LINE_GAP: f32 = 325.0;
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    /// PostScript name of the standard Type1 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
        }
    }

    fn advance(&self, ch: char) -> u16 {
        let table = match self {
            FontFace::Helvetica => &HELVETICA_WIDTHS,
            FontFace::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match ch {
            ' '..='~' => table[ch as usize - 0x20],
            '\u{a0}' => table[0],
            '\u{2026}' | '\u{2014}' => 1000,
            '\u{2013}' | '\u{20ac}' => 556,
            '\u{2022}' => 350,
            _ => FALLBACK_WIDTH,
        }
    }
}

/// A face at a point size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub face: FontFace,
    pub size: f32,
}

/// Vertical metrics of one line box, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl LineMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    pub fn baseline_offset(&self) -> f32 {
        self.ascent
    }
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self {
            face: FontFace::Helvetica,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            face: FontFace::HelveticaBold,
            size,
        }
    }

    pub fn measure(&self) -> LineMetrics {
        let scale = self.size / UNITS_PER_EM;
        LineMetrics {
            ascent: ASCENDER * scale,
            descent: DESCENDER * scale,
            leading: LINE_GAP * scale,
        }
    }

    /// Line height computed directly from the em fraction so that it stays an
    /// exact binary fraction for the sizes used in layout.
    pub fn line_height(&self) -> f32 {
        self.size * (ASCENDER + DESCENDER + LINE_GAP) / UNITS_PER_EM
    }

    pub fn baseline_offset(&self) -> f32 {
        self.measure().baseline_offset()
    }

    pub fn text_width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| self.face.advance(c) as u32).sum();
        units as f32 * self.size / UNITS_PER_EM
    }
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Explicit newlines start a new paragraph; blank paragraphs yield an empty
/// line. A word wider than `max_width` is emitted alone and unbroken. The
/// returned iterator is lazy and can be cloned to restart.
pub fn wrap(font: Font, text: &str, max_width: f32) -> WrappedLines<'_> {
    let blank = text.trim().is_empty();
    WrappedLines {
        font,
        max_width,
        space_width: font.text_width(" "),
        paragraphs: text.trim_end().split('\n'),
        words: None,
        done: blank,
    }
}

#[derive(Debug, Clone)]
pub struct WrappedLines<'a> {
    font: Font,
    max_width: f32,
    space_width: f32,
    paragraphs: Split<'a, char>,
    words: Option<Peekable<SplitWhitespace<'a>>>,
    done: bool,
}

impl Iterator for WrappedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        loop {
            if let Some(words) = self.words.as_mut() {
                let Some(first) = words.next() else {
                    self.words = None;
                    continue;
                };
                let mut line = first.to_string();
                let mut width = self.font.text_width(first);
                while let Some(next) = words.peek() {
                    let candidate = width + self.space_width + self.font.text_width(next);
                    if candidate > self.max_width {
                        break;
                    }
                    line.push(' ');
                    line.push_str(next);
                    width = candidate;
                    words.next();
                }
                return Some(line);
            }

            let Some(paragraph) = self.paragraphs.next() else {
                self.done = true;
                return None;
            };
            let mut words = paragraph.split_whitespace().peekable();
            if words.peek().is_none() {
                return Some(String::new());
            }
            self.words = Some(words);
        }
    }
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
pub fn fit_to_width(font: Font, text: &str, max_width: f32) -> Cow<'_, str> {
    if font.text_width(text) <= max_width {
        return Cow::Borrowed(text);
    }
    let ellipsis = '\u{2026}';
    let budget = max_width - font.text_width("\u{2026}");
    let mut out = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let advance = font.face.advance(ch) as f32 * font.size / UNITS_PER_EM;
        if width + advance > budget {
            break;
        }
        width += advance;
        out.push(ch);
    }
    let mut out = out.trim_end().to_string();
    out.push(ellipsis);
    Cow::Owned(out)
}
