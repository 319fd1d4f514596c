//! The drawing surface seen by layout code.
//!
//! All coordinates are in points with the origin at the top-left corner of the
//! page and y growing downward. Backends convert to their native convention
//! once, when they are constructed.

use serde::Serialize;

use super::color::Color;
use super::metrics::{wrap, Font};
use super::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 at 72 DPI.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// US Letter at 72 DPI.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Upper bound on either side, in points (PDF implementation limit).
    pub const MAX_SIDE: f32 = 14_400.0;

    /// Fails when the page cannot back a drawing surface.
    pub fn validate(self) -> Result<Self, RenderError> {
        let usable = |side: f32| side.is_finite() && side > 0.0 && side <= Self::MAX_SIDE;
        if usable(self.width) && usable(self.height) {
            Ok(self)
        } else {
            Err(RenderError::CanvasAllocation {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// A fixed-size page accepting top-left-origin drawing primitives.
pub trait Canvas {
    fn page_size(&self) -> PageSize;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draws one line of text whose line box has its top-left corner at
    /// `origin`. Returns the height consumed, i.e. the font's line height.
    fn draw_text_run(&mut self, text: &str, origin: Point, font: Font, color: Color) -> f32;

    /// Wraps `text` to the width of `bounds` and draws whole lines while they
    /// fit inside its height. Lines past the bottom are dropped. Returns the
    /// height actually used.
    fn draw_wrapped_text(&mut self, text: &str, bounds: Rect, font: Font, color: Color) -> f32 {
        let line_height = font.line_height();
        let mut y = bounds.y;
        for line in wrap(font, text, bounds.width) {
            if y + line_height > bounds.bottom() {
                log::warn!("Text block clipped at y={:.2}", bounds.bottom());
                break;
            }
            if !line.is_empty() {
                self.draw_text_run(&line, Point::new(bounds.x, y), font, color);
            }
            y += line_height;
        }
        y - bounds.y
    }
}

/// One recorded drawing primitive, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    TextRun {
        text: String,
        origin: Point,
        font: Font,
        color: Color,
    },
}

impl DrawCommand {
    /// Top edge of the primitive.
    pub fn y(&self) -> f32 {
        match self {
            DrawCommand::FillRect { rect, .. } => rect.y,
            DrawCommand::StrokeLine { from, to, .. } => from.y.min(to.y),
            DrawCommand::TextRun { origin, .. } => origin.y,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::TextRun { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// The ordered draw-call log of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    pub page: PageSize,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Re-issues every command against another canvas, in order.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect { rect, color } => canvas.fill_rect(*rect, *color),
                DrawCommand::StrokeLine {
                    from,
                    to,
                    color,
                    width,
                } => canvas.stroke_line(*from, *to, *color, *width),
                DrawCommand::TextRun {
                    text,
                    origin,
                    font,
                    color,
                } => {
                    canvas.draw_text_run(text, *origin, *font, *color);
                }
            }
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    /// The first text run exactly matching `text`.
    pub fn find_text(&self, text: &str) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.text() == Some(text))
    }
}

/// A headless canvas that only records what was drawn.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    list: DisplayList,
}

impl RecordingCanvas {
    pub fn new(page: PageSize) -> Result<Self, RenderError> {
        Ok(Self {
            list: DisplayList {
                page: page.validate()?,
                commands: Vec::new(),
            },
        })
    }

    pub fn into_display_list(self) -> DisplayList {
        self.list
    }
}

impl Canvas for RecordingCanvas {
    fn page_size(&self) -> PageSize {
        self.list.page
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.list.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.list.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_text_run(&mut self, text: &str, origin: Point, font: Font, color: Color) -> f32 {
        self.list.commands.push(DrawCommand::TextRun {
            text: text.to_string(),
            origin,
            font,
            color,
        });
        font.line_height()
    }
}
