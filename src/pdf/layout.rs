//! Vertical layout state threaded through the document sections.

use super::canvas::{Canvas, Point};
use super::color::Color;
use super::metrics::Font;

/// The current vertical offset on the page, in top-left coordinates.
///
/// Sections take a cursor by value and hand back the advanced one; nothing
/// else stores a position.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LayoutCursor {
    y: f32,
}

impl LayoutCursor {
    pub const fn at(y: f32) -> Self {
        Self { y }
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn advance(self, by: f32) -> Self {
        Self { y: self.y + by }
    }

    /// The lower of two cursors, for blocks laid out side by side.
    pub fn max(self, other: Self) -> Self {
        if other.y > self.y {
            other
        } else {
            self
        }
    }
}

/// Returns the trimmed value when the field carries any text.
pub fn present(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Non-blank lines of a multi-line field.
pub fn present_lines(field: Option<&str>) -> impl Iterator<Item = &str> {
    present(field)
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// One optional line in a vertical stack.
#[derive(Debug, Clone, Copy)]
pub struct StackLine<'t> {
    pub text: Option<&'t str>,
    pub font: Font,
    pub color: Color,
}

impl<'t> StackLine<'t> {
    pub fn new(text: Option<&'t str>, font: Font, color: Color) -> Self {
        Self { text, font, color }
    }

    /// Line height when present, zero otherwise.
    pub fn height(&self) -> f32 {
        match present(self.text) {
            Some(_) => self.font.line_height(),
            None => 0.0,
        }
    }
}

/// Height a [`LineStack`] will consume for `lines`.
pub fn stack_height(lines: &[StackLine<'_>]) -> f32 {
    lines.iter().map(StackLine::height).sum()
}

/// Stacks text lines downward from a left edge.
///
/// Absent or blank lines contribute no height and no primitives, so the lines
/// below move up by exactly the skipped line's height.
pub struct LineStack<'c> {
    canvas: &'c mut dyn Canvas,
    x: f32,
    y: f32,
}

impl<'c> LineStack<'c> {
    pub fn new(canvas: &'c mut dyn Canvas, origin: Point) -> Self {
        Self {
            canvas,
            x: origin.x,
            y: origin.y,
        }
    }

    pub fn line(&mut self, text: Option<&str>, font: Font, color: Color) -> &mut Self {
        if let Some(text) = present(text) {
            self.y += self
                .canvas
                .draw_text_run(text, Point::new(self.x, self.y), font, color);
        }
        self
    }

    pub fn draw_all(&mut self, lines: &[StackLine<'_>]) -> &mut Self {
        for line in lines {
            self.line(line.text, line.font, line.color);
        }
        self
    }

    pub fn gap(&mut self, by: f32) -> &mut Self {
        self.y += by;
        self
    }

    /// Bottom of the last line drawn.
    pub fn bottom(&self) -> f32 {
        self.y
    }
}
