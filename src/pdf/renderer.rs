use super::backend::{DocumentInfo, PdfCanvas};
use super::canvas::{Canvas, DisplayList, PageSize, RecordingCanvas};
use super::color::{derive_palette, resolve_accent, Palette};
use super::layout::LayoutCursor;
use super::sections::{SectionContext, MARGIN, SECTIONS};
use super::RenderError;
use crate::invoice::{FormattingContext, InvoiceDocumentData};

/// A rendered page: the PDF bytes and the draw calls that produced them.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub display_list: DisplayList,
}

/// Turns invoice snapshots into single-page PDFs.
///
/// Holds only configuration; every call to [`DocumentRenderer::render`] starts
/// from scratch, so one renderer can be shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    page: PageSize,
    format: FormattingContext,
}

impl DocumentRenderer {
    pub fn new(format: FormattingContext) -> Self {
        Self {
            page: PageSize::A4,
            format,
        }
    }

    pub fn with_page_size(mut self, page: PageSize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(&self) -> PageSize {
        self.page
    }

    pub fn format(&self) -> &FormattingContext {
        &self.format
    }

    /// Lays the page out on a headless canvas and returns the draw calls.
    pub fn layout(&self, data: &InvoiceDocumentData) -> Result<DisplayList, RenderError> {
        let palette = derive_palette(resolve_accent(data.client.accent_color.as_deref()));
        let mut canvas = RecordingCanvas::new(self.page)?;
        let end = compose(data, &palette, &self.format, &mut canvas);

        let limit = self.page.height - MARGIN;
        if end.y() > limit {
            log::warn!(
                "Invoice {} overflows the page by {:.1}pt; content past the bottom is clipped",
                data.number,
                end.y() - limit
            );
        }
        Ok(canvas.into_display_list())
    }

    /// Renders the page to PDF bytes. Either a complete document is returned
    /// or an error; never a partial file.
    pub fn render(&self, data: &InvoiceDocumentData) -> Result<RenderedDocument, RenderError> {
        log::debug!(
            "Rendering invoice {} ({} items, {})",
            data.number,
            data.items.len(),
            self.format.locale
        );
        let display_list = self.layout(data)?;

        let mut pdf = PdfCanvas::new(self.page)?;
        display_list.replay(&mut pdf);
        let bytes = pdf.finish(&DocumentInfo {
            title: format!("Invoice {}", data.number),
            created: self.format.today,
        })?;

        log::debug!(
            "Rendered invoice {}: {} draw calls, {} bytes",
            data.number,
            display_list.commands.len(),
            bytes.len()
        );
        Ok(RenderedDocument {
            bytes,
            display_list,
        })
    }
}

/// Runs every section in page order, threading the cursor from the top of the
/// page. Returns the cursor after the last section.
pub fn compose(
    data: &InvoiceDocumentData,
    palette: &Palette,
    format: &FormattingContext,
    canvas: &mut dyn Canvas,
) -> LayoutCursor {
    let ctx = SectionContext {
        data,
        palette,
        format,
    };
    SECTIONS
        .iter()
        .fold(LayoutCursor::at(0.0), |cursor, (name, section)| {
            let next = section(&ctx, &mut *canvas, cursor);
            log::trace!("section {name}: {:.2} -> {:.2}", cursor.y(), next.y());
            next
        })
}

/// Renders `data` on an A4 page with the given formatting.
pub fn render(
    data: &InvoiceDocumentData,
    format: &FormattingContext,
) -> Result<Vec<u8>, RenderError> {
    DocumentRenderer::new(format.clone())
        .render(data)
        .map(|doc| doc.bytes)
}
