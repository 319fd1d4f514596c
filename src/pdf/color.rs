use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Brand blue used whenever a client has no usable accent color.
pub const DEFAULT_ACCENT: Color = Color::rgb(0x25, 0x63, 0xEB);

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

/// Alpha of the accent wash behind the detail, client and totals panels.
pub const ACCENT_TINT_ALPHA: f32 = 0.12;

/// Alpha of the accent wash behind even table rows.
pub const ROW_TINT_ALPHA: f32 = 0.06;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color '{0}'. Expected #RRGGBB or #RRGGBBAA")]
    InvalidHexFormat(String),
}

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xFF
    }

    /// The same channels with alpha forced to fully opaque.
    pub const fn opaque(&self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }

    /// `background * (1 - alpha) + self * alpha` per channel. The result is opaque.
    pub fn blend_over(&self, background: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |bg: u8, fg: u8| -> u8 {
            (bg as f32 * (1.0 - alpha) + fg as f32 * alpha)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color::rgb(
            mix(background.r, self.r),
            mix(background.g, self.g),
            mix(background.b, self.b),
        )
    }

    /// Composites a translucent color onto `background` using its own alpha.
    pub fn flatten_over(&self, background: Color) -> Color {
        if self.is_opaque() {
            return *self;
        }
        self.blend_over(background, self.a as f32 / 255.0)
    }

    /// Channels as PDF color operands in `0.0..=1.0`.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA`, case-insensitive, `#` optional.
pub fn parse_hex(input: &str) -> Result<Color, ColorError> {
    let invalid = || ColorError::InvalidHexFormat(input.to_string());
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
    Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// Uppercase `#RRGGBB`, or `#RRGGBBAA` when the color is not opaque.
pub fn to_hex(color: Color) -> String {
    if color.is_opaque() {
        format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
    } else {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            color.r, color.g, color.b, color.a
        )
    }
}

/// Resolve a client's accent color, substituting [`DEFAULT_ACCENT`] when it is
/// missing or malformed. Never fails.
pub fn resolve_accent(input: Option<&str>) -> Color {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_ACCENT,
        Some(hex) => parse_hex(hex).unwrap_or_else(|e| {
            log::warn!("{e}; using default accent {}", to_hex(DEFAULT_ACCENT));
            DEFAULT_ACCENT
        }),
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(*self))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*self))
    }
}

/// Every color a document uses, derived once per render from the accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    /// The accent exactly as resolved from input, alpha included.
    pub source: Color,
    /// Opaque drawing accent; never washes out to the page color.
    pub accent: Color,
    pub accent_tint: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_on_accent: Color,
    pub panel_background: Color,
    pub section_background: Color,
    pub row_background: Color,
    pub divider: Color,
}

impl Palette {
    /// Named members in a stable order, for listings.
    pub fn entries(&self) -> [(&'static str, Color); 10] {
        [
            ("source", self.source),
            ("accent", self.accent),
            ("accent_tint", self.accent_tint),
            ("text_primary", self.text_primary),
            ("text_secondary", self.text_secondary),
            ("text_on_accent", self.text_on_accent),
            ("panel_background", self.panel_background),
            ("section_background", self.section_background),
            ("row_background", self.row_background),
            ("divider", self.divider),
        ]
    }
}

/// Only the accent and its tints depend on the input; the neutrals are fixed.
/// Input alpha is kept on `source` and dropped everywhere ink is laid down.
pub fn derive_palette(source: Color) -> Palette {
    let solid = source.opaque();
    Palette {
        source,
        accent: solid,
        accent_tint: solid.blend_over(WHITE, ACCENT_TINT_ALPHA),
        text_primary: Color::rgb(0x1F, 0x29, 0x37),
        text_secondary: Color::rgb(0x6B, 0x72, 0x80),
        text_on_accent: WHITE,
        panel_background: Color::rgb(0xF8, 0xFA, 0xFC),
        section_background: WHITE,
        row_background: solid.blend_over(WHITE, ROW_TINT_ALPHA),
        divider: Color::rgb(0xE5, 0xE7, 0xEB),
    }
}
