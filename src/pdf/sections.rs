//! The visual blocks of an invoice page, drawn top to bottom.
//!
//! Every section has the same shape: it reads the snapshot, emits primitives
//! at and below the incoming cursor, and returns the cursor for the next
//! section. Sections never look at each other's output.

use std::borrow::Cow;

use super::canvas::{Canvas, Point, Rect};
use super::color::{Color, Palette};
use super::layout::{present, present_lines, stack_height, LayoutCursor, LineStack, StackLine};
use super::metrics::{fit_to_width, Font};
use crate::invoice::{FormattingContext, InvoiceDocumentData};

pub const MARGIN: f32 = 40.0;
pub const SECTION_GAP: f32 = 16.0;
pub const PANEL_PADDING: f32 = 10.0;

const ACCENT_BAR_HEIGHT: f32 = 8.0;
const TITLE_TOP: f32 = 28.0;
pub const DETAIL_PANEL_WIDTH: f32 = 200.0;
const DETAIL_ROW_HEIGHT: f32 = 16.0;
/// Four rows plus padding; independent of how tall the branding is.
pub const DETAIL_PANEL_HEIGHT: f32 = 4.0 * DETAIL_ROW_HEIGHT + 2.0 * PANEL_PADDING;

const CLIENT_ADDRESS_MAX_LINES: usize = 4;
const LABEL_GAP: f32 = 4.0;

pub const TABLE_HEADER_HEIGHT: f32 = 22.0;
pub const TABLE_ROW_HEIGHT: f32 = 20.0;
const CELL_INSET: f32 = 8.0;
const NUMERIC_COLUMN_WIDTH: f32 = 90.0;
const QUANTITY_COLUMN_WIDTH: f32 = 60.0;

const TOTALS_WIDTH: f32 = 220.0;
const TOTALS_ROW_GAP: f32 = 6.0;

pub const NOTES_HEIGHT: f32 = 120.0;

pub const TITLE_FONT: Font = Font::bold(24.0);
pub const COMPANY_FONT: Font = Font::bold(12.0);
pub const BODY_FONT: Font = Font::regular(9.0);
pub const STRONG_FONT: Font = Font::bold(9.0);
pub const LABEL_FONT: Font = Font::bold(8.0);
pub const CLIENT_NAME_FONT: Font = Font::bold(11.0);
pub const TOTAL_FONT: Font = Font::bold(11.0);

/// Read-only inputs shared by every section of one render.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub data: &'a InvoiceDocumentData,
    pub palette: &'a Palette,
    pub format: &'a FormattingContext,
}

pub type SectionFn = fn(&SectionContext<'_>, &mut dyn Canvas, LayoutCursor) -> LayoutCursor;

/// Page order. Sections with nothing to show return the cursor untouched.
pub const SECTIONS: [(&str, SectionFn); 5] = [
    ("header", header),
    ("client", client_panel),
    ("items", line_items),
    ("totals", totals),
    ("notes", notes),
];

fn content_width(canvas: &dyn Canvas) -> f32 {
    canvas.page_size().width - 2.0 * MARGIN
}

/// Present text shortened to `max_width`; absent or blank stays `None`.
fn fit_field(field: Option<&str>, font: Font, max_width: f32) -> Option<Cow<'_, str>> {
    present(field).map(|text| fit_to_width(font, text, max_width))
}

fn draw_text_right(
    canvas: &mut dyn Canvas,
    text: &str,
    right: f32,
    y: f32,
    font: Font,
    color: Color,
) {
    let x = right - font.text_width(text);
    canvas.draw_text_run(text, Point::new(x, y), font, color);
}

/// Accent bar, title and company branding on the left; the invoice detail
/// panel on the right.
pub fn header(
    ctx: &SectionContext<'_>,
    canvas: &mut dyn Canvas,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let palette = ctx.palette;
    let page_width = canvas.page_size().width;
    let top = cursor.y();

    canvas.fill_rect(
        Rect::new(0.0, top, page_width, ACCENT_BAR_HEIGHT),
        palette.accent,
    );

    let title_y = top + TITLE_TOP;
    let branding_width = page_width - 2.0 * MARGIN - DETAIL_PANEL_WIDTH - SECTION_GAP;
    let company = ctx.data.company.as_ref();
    let name = fit_field(company.and_then(|c| c.name.as_deref()), COMPANY_FONT, branding_width);
    let address: Vec<Cow<'_, str>> = present_lines(company.and_then(|c| c.address.as_deref()))
        .map(|line| fit_to_width(BODY_FONT, line, branding_width))
        .collect();
    let email = fit_field(company.and_then(|c| c.email.as_deref()), BODY_FONT, branding_width);
    let phone = fit_field(company.and_then(|c| c.phone.as_deref()), BODY_FONT, branding_width);

    let mut branding = vec![StackLine::new(name.as_deref(), COMPANY_FONT, palette.text_primary)];
    branding.extend(
        address
            .iter()
            .map(|line| StackLine::new(Some(line.as_ref()), BODY_FONT, palette.text_secondary)),
    );
    branding.push(StackLine::new(email.as_deref(), BODY_FONT, palette.text_secondary));
    branding.push(StackLine::new(phone.as_deref(), BODY_FONT, palette.text_secondary));

    let branding_bottom = {
        let mut stack = LineStack::new(canvas, Point::new(MARGIN, title_y));
        stack
            .line(Some("INVOICE"), TITLE_FONT, palette.accent)
            .gap(LABEL_GAP)
            .draw_all(&branding);
        stack.bottom()
    };

    let panel = Rect::new(
        page_width - MARGIN - DETAIL_PANEL_WIDTH,
        title_y,
        DETAIL_PANEL_WIDTH,
        DETAIL_PANEL_HEIGHT,
    );
    canvas.fill_rect(panel, palette.accent_tint);

    let data = ctx.data;
    let rows = [
        ("Invoice #", data.number.clone(), palette.text_primary),
        (
            "Issue date",
            ctx.format.format_date(data.issue_date),
            palette.text_primary,
        ),
        (
            "Due date",
            ctx.format.format_date(data.due_date),
            palette.text_primary,
        ),
        ("Status", data.status.to_string(), palette.accent),
    ];
    let label_x = panel.x + PANEL_PADDING;
    let value_right = panel.right() - PANEL_PADDING;
    let available = value_right - label_x - 60.0;
    for (i, (label, value, color)) in rows.iter().enumerate() {
        let y = panel.y + PANEL_PADDING + i as f32 * DETAIL_ROW_HEIGHT;
        canvas.draw_text_run(label, Point::new(label_x, y), BODY_FONT, palette.text_secondary);
        let value = fit_to_width(STRONG_FONT, value, available);
        draw_text_right(canvas, &value, value_right, y, STRONG_FONT, *color);
    }

    LayoutCursor::at(branding_bottom)
        .max(LayoutCursor::at(panel.bottom()))
        .advance(SECTION_GAP)
}

/// "Bill to" block. Its height follows the lines that are actually present.
pub fn client_panel(
    ctx: &SectionContext<'_>,
    canvas: &mut dyn Canvas,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let palette = ctx.palette;
    let client = &ctx.data.client;
    let text_width = content_width(canvas) - 2.0 * PANEL_PADDING;

    let name = fit_to_width(CLIENT_NAME_FONT, &client.name, text_width);
    let email = fit_field(client.email.as_deref(), BODY_FONT, text_width);
    let address: Vec<Cow<'_, str>> = present_lines(client.address.as_deref())
        .take(CLIENT_ADDRESS_MAX_LINES)
        .map(|line| fit_to_width(BODY_FONT, line, text_width))
        .collect();

    let mut lines = vec![
        StackLine::new(Some(name.as_ref()), CLIENT_NAME_FONT, palette.text_primary),
        StackLine::new(email.as_deref(), BODY_FONT, palette.text_secondary),
    ];
    lines.extend(
        address
            .iter()
            .map(|line| StackLine::new(Some(line.as_ref()), BODY_FONT, palette.text_secondary)),
    );

    let height = PANEL_PADDING
        + LABEL_FONT.line_height()
        + LABEL_GAP
        + stack_height(&lines)
        + PANEL_PADDING;
    let panel = Rect::new(MARGIN, cursor.y(), content_width(canvas), height);
    canvas.fill_rect(panel, palette.accent_tint);
    canvas.fill_rect(Rect::new(panel.x, panel.y, 3.0, panel.height), palette.accent);

    let mut stack = LineStack::new(
        canvas,
        Point::new(panel.x + PANEL_PADDING, panel.y + PANEL_PADDING),
    );
    stack
        .line(Some("BILL TO"), LABEL_FONT, palette.text_secondary)
        .gap(LABEL_GAP)
        .draw_all(&lines);

    cursor.advance(height + SECTION_GAP)
}

/// Fixed x anchors of the item table for a given page width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableColumns {
    pub description_x: f32,
    pub description_width: f32,
    pub quantity_right: f32,
    pub unit_price_right: f32,
    pub total_right: f32,
}

impl TableColumns {
    pub fn for_width(page_width: f32) -> Self {
        let total_right = page_width - MARGIN - CELL_INSET;
        let unit_price_right = total_right - NUMERIC_COLUMN_WIDTH;
        let quantity_right = unit_price_right - NUMERIC_COLUMN_WIDTH;
        let description_x = MARGIN + CELL_INSET;
        Self {
            description_x,
            description_width: quantity_right - QUANTITY_COLUMN_WIDTH - description_x,
            quantity_right,
            unit_price_right,
            total_right,
        }
    }
}

/// Accent header row followed by one row per item, in the given order.
/// Even rows (0-based) get the tinted band.
pub fn line_items(
    ctx: &SectionContext<'_>,
    canvas: &mut dyn Canvas,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let palette = ctx.palette;
    let width = content_width(canvas);
    let columns = TableColumns::for_width(canvas.page_size().width);
    let top = cursor.y();

    canvas.fill_rect(
        Rect::new(MARGIN, top, width, TABLE_HEADER_HEIGHT),
        palette.accent,
    );
    let header_y = top + (TABLE_HEADER_HEIGHT - STRONG_FONT.line_height()) / 2.0;
    let ink = palette.text_on_accent;
    canvas.draw_text_run(
        "Description",
        Point::new(columns.description_x, header_y),
        STRONG_FONT,
        ink,
    );
    draw_text_right(canvas, "Qty", columns.quantity_right, header_y, STRONG_FONT, ink);
    draw_text_right(
        canvas,
        "Unit price",
        columns.unit_price_right,
        header_y,
        STRONG_FONT,
        ink,
    );
    draw_text_right(canvas, "Total", columns.total_right, header_y, STRONG_FONT, ink);

    let text_offset = (TABLE_ROW_HEIGHT - BODY_FONT.line_height()) / 2.0;
    for (i, item) in ctx.data.items.iter().enumerate() {
        let row_y = top + TABLE_HEADER_HEIGHT + i as f32 * TABLE_ROW_HEIGHT;
        if i % 2 == 0 {
            canvas.fill_rect(
                Rect::new(MARGIN, row_y, width, TABLE_ROW_HEIGHT),
                palette.row_background,
            );
        }

        let y = row_y + text_offset;
        let description = fit_to_width(BODY_FONT, &item.description, columns.description_width);
        canvas.draw_text_run(
            &description,
            Point::new(columns.description_x, y),
            BODY_FONT,
            palette.text_primary,
        );
        draw_text_right(
            canvas,
            &ctx.format.format_quantity(item.quantity),
            columns.quantity_right,
            y,
            BODY_FONT,
            palette.text_primary,
        );
        draw_text_right(
            canvas,
            &ctx.format.format_currency(item.unit_price),
            columns.unit_price_right,
            y,
            BODY_FONT,
            palette.text_primary,
        );
        draw_text_right(
            canvas,
            &ctx.format.format_currency(item.line_total()),
            columns.total_right,
            y,
            BODY_FONT,
            palette.text_primary,
        );

        let bottom = row_y + TABLE_ROW_HEIGHT;
        canvas.stroke_line(
            Point::new(MARGIN, bottom),
            Point::new(MARGIN + width, bottom),
            palette.divider,
            0.5,
        );
    }

    let table_height = TABLE_HEADER_HEIGHT + ctx.data.items.len() as f32 * TABLE_ROW_HEIGHT;
    cursor.advance(table_height + SECTION_GAP)
}

/// Height of the totals box: padding, subtotal row, divider, total row.
pub fn totals_height() -> f32 {
    PANEL_PADDING
        + BODY_FONT.line_height()
        + 2.0 * TOTALS_ROW_GAP
        + TOTAL_FONT.line_height()
        + PANEL_PADDING
}

/// Subtotal recomputed from the items, then the caller's total verbatim.
pub fn totals(
    ctx: &SectionContext<'_>,
    canvas: &mut dyn Canvas,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let palette = ctx.palette;
    let page_width = canvas.page_size().width;
    let panel = Rect::new(
        page_width - MARGIN - TOTALS_WIDTH,
        cursor.y(),
        TOTALS_WIDTH,
        totals_height(),
    );
    canvas.fill_rect(panel, palette.accent_tint);

    let left = panel.x + PANEL_PADDING;
    let right = panel.right() - PANEL_PADDING;

    let subtotal_y = panel.y + PANEL_PADDING;
    canvas.draw_text_run(
        "Subtotal",
        Point::new(left, subtotal_y),
        BODY_FONT,
        palette.text_secondary,
    );
    let subtotal = ctx.format.format_currency(ctx.data.subtotal());
    draw_text_right(canvas, &subtotal, right, subtotal_y, BODY_FONT, palette.text_primary);

    let divider_y = subtotal_y + BODY_FONT.line_height() + TOTALS_ROW_GAP;
    canvas.stroke_line(
        Point::new(left, divider_y),
        Point::new(right, divider_y),
        palette.divider,
        1.0,
    );

    let total_y = divider_y + TOTALS_ROW_GAP;
    canvas.draw_text_run("Total", Point::new(left, total_y), TOTAL_FONT, palette.text_primary);
    let total = ctx.format.format_currency(ctx.data.total_amount);
    draw_text_right(canvas, &total, right, total_y, TOTAL_FONT, palette.accent);

    cursor.advance(panel.height + SECTION_GAP)
}

/// Free-text notes in a fixed-height box. Lines that do not fit are dropped.
pub fn notes(
    ctx: &SectionContext<'_>,
    canvas: &mut dyn Canvas,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let Some(text) = present(ctx.data.notes.as_deref()) else {
        return cursor;
    };
    let palette = ctx.palette;
    let panel = Rect::new(MARGIN, cursor.y(), content_width(canvas), NOTES_HEIGHT);
    canvas.fill_rect(panel, palette.panel_background);

    let label_y = panel.y + PANEL_PADDING;
    canvas.draw_text_run(
        "NOTES",
        Point::new(panel.x + PANEL_PADDING, label_y),
        LABEL_FONT,
        palette.text_secondary,
    );

    let text_top = label_y + LABEL_FONT.line_height() + LABEL_GAP;
    let page_limit = canvas.page_size().height - MARGIN;
    let bottom = (panel.bottom() - PANEL_PADDING).min(page_limit);
    let bounds = Rect::new(
        panel.x + PANEL_PADDING,
        text_top,
        panel.width - 2.0 * PANEL_PADDING,
        (bottom - text_top).max(0.0),
    );
    canvas.draw_wrapped_text(text, bounds, BODY_FONT, palette.text_primary);

    cursor.advance(panel.height + SECTION_GAP)
}
