mod backend;
pub mod canvas;
pub mod color;
pub mod layout;
pub mod metrics;
mod renderer;
pub mod sections;

pub use backend::{encode_text, DocumentInfo, PdfCanvas};
pub use canvas::{Canvas, DisplayList, DrawCommand, PageSize, Point, Rect, RecordingCanvas};
pub use color::{derive_palette, parse_hex, resolve_accent, to_hex, Color, ColorError, Palette};
pub use layout::LayoutCursor;
pub use metrics::{wrap, Font, FontFace, LineMetrics, WrappedLines};
pub use renderer::{compose, render, DocumentRenderer, RenderedDocument};

use thiserror::Error;

/// Why a render produced no document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height}pt page")]
    CanvasAllocation { width: f32, height: f32 },

    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),
}

pub const FILE_EXTENSION: &str = "pdf";

/// File name for a rendered invoice: the invoice number with anything outside
/// `[A-Za-z0-9._-]` replaced by `_`.
pub fn document_file_name(invoice_number: &str) -> String {
    let stem: String = invoice_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "invoice" } else { stem };
    format!("{stem}.{FILE_EXTENSION}")
}
