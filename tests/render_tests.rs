use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use invoice_render::pdf::sections::{
    BODY_FONT, DETAIL_PANEL_WIDTH, MARGIN, PANEL_PADDING, SECTION_GAP, TABLE_HEADER_HEIGHT,
    TABLE_ROW_HEIGHT, TOTAL_FONT,
};
use invoice_render::pdf::color::{DEFAULT_ACCENT, WHITE};
use invoice_render::pdf::{
    derive_palette, resolve_accent, to_hex, Color, DisplayList, DrawCommand, PageSize,
};
use invoice_render::{
    ClientBlock, CompanyBlock, DocumentRenderer, FormattingContext, InvoiceDocumentData,
    InvoiceStatus, LineItem, RenderError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(description: &str, quantity: u32, unit_price: &str) -> LineItem {
    LineItem {
        description: description.to_string(),
        quantity,
        unit_price: money(unit_price),
    }
}

fn sample() -> InvoiceDocumentData {
    InvoiceDocumentData {
        number: "INV-2026-0042".to_string(),
        status: InvoiceStatus::Sent,
        issue_date: date(2026, 1, 15),
        due_date: date(2026, 2, 14),
        client: ClientBlock {
            name: "Example Client Inc.".to_string(),
            email: Some("jane@example.com".to_string()),
            address: Some("456 Client Avenue\nLos Angeles, CA 90001".to_string()),
            accent_color: Some("#0EA5E9".to_string()),
        },
        company: Some(CompanyBlock {
            name: Some("Acme Studio".to_string()),
            address: Some("123 Business Street".to_string()),
            email: Some("billing@acme.test".to_string()),
            phone: None,
        }),
        items: vec![
            item("Design", 2, "50.00"),
            item("Hosting", 1, "12.50"),
            item("Support", 5, "20.00"),
        ],
        total_amount: money("212.50"),
        notes: Some("Thank you for your business.".to_string()),
    }
}

fn renderer() -> DocumentRenderer {
    DocumentRenderer::new(FormattingContext::en_us(date(2026, 3, 1)))
}

fn layout(data: &InvoiceDocumentData) -> DisplayList {
    renderer().layout(data).unwrap()
}

fn y_of(list: &DisplayList, text: &str) -> f32 {
    list.find_text(text)
        .unwrap_or_else(|| panic!("no text run {text:?}"))
        .y()
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

#[test]
fn same_input_gives_identical_bytes() {
    let data = sample();
    let first = renderer().render(&data).unwrap();
    let second = renderer().render(&data).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.display_list, second.display_list);
    assert!(first.bytes.starts_with(b"%PDF-"));
}

#[test]
fn three_item_scenario_draws_expected_amounts() {
    let list = layout(&sample());
    let texts: Vec<&str> = list.texts().collect();

    for expected in [
        "INVOICE",
        "INV-2026-0042",
        "Jan 15, 2026",
        "Feb 14, 2026",
        "SENT",
        "Example Client Inc.",
        "Design",
        "Hosting",
        "Support",
        "$50.00",
        "$12.50",
        "$20.00",
        "$212.50",
    ] {
        assert!(texts.contains(&expected), "missing {expected:?}");
    }
    // 2 x $50.00 and 5 x $20.00
    assert_eq!(texts.iter().filter(|t| **t == "$100.00").count(), 2);
}

#[test]
fn items_keep_their_order() {
    let list = layout(&sample());
    let design = y_of(&list, "Design");
    let hosting = y_of(&list, "Hosting");
    let support = y_of(&list, "Support");

    assert_close(hosting - design, TABLE_ROW_HEIGHT);
    assert_close(support - hosting, TABLE_ROW_HEIGHT);
}

#[test]
fn subtotal_is_recomputed_and_total_is_verbatim() {
    let mut data = sample();
    data.total_amount = money("200.00");
    let list = layout(&data);

    let subtotal_y = y_of(&list, "Subtotal");
    let total_label = list
        .commands
        .iter()
        .find(|c| matches!(c, DrawCommand::TextRun { text, font, .. } if text == "Total" && *font == TOTAL_FONT))
        .expect("totals label");
    let total_y = total_label.y();

    let amount_at = |text: &str| {
        list.commands
            .iter()
            .filter(|c| c.text() == Some(text))
            .map(DrawCommand::y)
            .collect::<Vec<_>>()
    };
    assert_eq!(amount_at("$212.50"), vec![subtotal_y]);
    assert_eq!(amount_at("$200.00"), vec![total_y]);
    assert!(total_y > subtotal_y);
}

#[test]
fn removing_client_email_moves_later_sections_up_one_line() {
    let with_email = layout(&sample());
    let mut data = sample();
    data.client.email = None;
    let without_email = layout(&data);

    let tail = |list: &DisplayList| {
        let start = list
            .commands
            .iter()
            .position(|c| c.text() == Some("Description"))
            .expect("table header");
        // The header fill_rect precedes the first header label.
        list.commands[start - 1..].to_vec()
    };
    let a = tail(&with_email);
    let b = tail(&without_email);

    assert_eq!(a.len(), b.len());
    for (before, after) in a.iter().zip(&b) {
        assert_close(before.y() - after.y(), BODY_FONT.line_height());
    }
    assert_eq!(BODY_FONT.line_height(), 11.25);
    assert!(without_email.find_text("jane@example.com").is_none());
}

#[test]
fn blank_optional_fields_draw_nothing() {
    let mut data = sample();
    data.client.email = Some("   ".to_string());
    data.company = None;
    let list = layout(&data);

    assert!(list.texts().all(|t| !t.trim().is_empty()));
    assert!(list.find_text("Acme Studio").is_none());
}

#[test]
fn even_rows_are_tinted() {
    let data = sample();
    let list = layout(&data);
    let palette = derive_palette(resolve_accent(data.client.accent_color.as_deref()));

    let tinted: Vec<f32> = list
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillRect { rect, color } if *color == palette.row_background => {
                Some(rect.y)
            }
            _ => None,
        })
        .collect();
    assert_eq!(tinted.len(), 2);

    let header_top = list
        .commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::FillRect { rect, .. } if rect.height == TABLE_HEADER_HEIGHT => {
                Some(rect.y)
            }
            _ => None,
        })
        .expect("table header band");
    assert_close(tinted[0], header_top + TABLE_HEADER_HEIGHT);
    assert_close(tinted[1], header_top + TABLE_HEADER_HEIGHT + 2.0 * TABLE_ROW_HEIGHT);
}

#[test]
fn client_accent_drives_the_palette() {
    let list = layout(&sample());
    let accent_fill = list.commands.iter().find_map(|c| match c {
        DrawCommand::FillRect { color, .. } => Some(*color),
        _ => None,
    });
    assert_eq!(accent_fill.map(to_hex).as_deref(), Some("#0EA5E9"));
}

#[test]
fn invalid_accent_falls_back_to_default() {
    let mut data = sample();
    data.client.accent_color = Some("not-a-color".to_string());
    let list = layout(&data);

    let first_fill = list.commands.iter().find_map(|c| match c {
        DrawCommand::FillRect { color, .. } => Some(*color),
        _ => None,
    });
    assert_eq!(first_fill, Some(DEFAULT_ACCENT));
    assert!(renderer().render(&data).is_ok());
}

#[test]
fn long_notes_wrap_inside_the_panel() {
    let mut data = sample();
    data.notes = Some("Payment by bank transfer only. ".repeat(12));
    let list = layout(&data);

    let content_width = PageSize::A4.width - 2.0 * 40.0 - 2.0 * 10.0;
    let notes_top = y_of(&list, "NOTES");
    let lines: Vec<(&str, f32)> = list
        .commands
        .iter()
        .filter(|c| c.y() > notes_top)
        .filter_map(|c| c.text().map(|t| (t, c.y())))
        .collect();

    assert!(lines.len() > 1);
    for (text, _) in &lines {
        assert!(BODY_FONT.text_width(text) <= content_width + 1e-3, "{text:?} too wide");
    }
    for pair in lines.windows(2) {
        assert_close(pair[1].1 - pair[0].1, BODY_FONT.line_height());
    }
}

#[test]
fn empty_notes_skip_the_notes_panel() {
    let mut data = sample();
    data.notes = Some("\n  \n".to_string());
    let list = layout(&data);

    assert!(list.find_text("NOTES").is_none());
}

#[test]
fn empty_items_still_draw_the_table_header() {
    let mut data = sample();
    data.items.clear();
    data.total_amount = Decimal::ZERO;
    let list = layout(&data);

    assert!(list.find_text("Description").is_some());
    assert!(list.find_text("$0.00").is_some());
}

#[test]
fn letter_page_is_honored() {
    let rendered = renderer()
        .with_page_size(PageSize::LETTER)
        .render(&sample())
        .unwrap();
    assert_eq!(rendered.display_list.page, PageSize::LETTER);

    let doc = lopdf::Document::load_mem(&rendered.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn unusable_page_yields_no_document() {
    let page = PageSize {
        width: 0.0,
        height: 842.0,
    };
    let result = renderer().with_page_size(page).render(&sample());
    assert_eq!(
        result.unwrap_err(),
        RenderError::CanvasAllocation {
            width: 0.0,
            height: 842.0
        }
    );
}

#[test]
fn free_render_function_matches_renderer() {
    let data = sample();
    let format = FormattingContext::en_us(date(2026, 3, 1));
    let bytes = invoice_render::render(&data, &format).unwrap();
    assert_eq!(bytes, renderer().render(&data).unwrap().bytes);
}

fn text_color(list: &DisplayList, wanted: &str) -> Color {
    list.commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::TextRun { text, color, .. } if text == wanted => Some(*color),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no text run {wanted:?}"))
}

#[test]
fn transparent_accent_still_inks_the_page() {
    let mut data = sample();
    data.client.accent_color = Some("#0000FF00".to_string());
    data.total_amount = money("200.00");
    let list = layout(&data);

    for text in ["INVOICE", "SENT", "$200.00"] {
        let color = text_color(&list, text);
        assert!(color.is_opaque(), "{text} drawn translucent");
        assert_ne!(color.flatten_over(WHITE), WHITE, "{text} invisible");
    }

    let header_band = list
        .commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::FillRect { rect, color } if rect.height == TABLE_HEADER_HEIGHT => {
                Some(*color)
            }
            _ => None,
        })
        .expect("table header band");
    assert_eq!(header_band, Color::rgb(0, 0, 0xFF));

    let palette = derive_palette(resolve_accent(data.client.accent_color.as_deref()));
    assert_eq!(to_hex(palette.source), "#0000FF00");
}

#[test]
fn long_branding_and_client_lines_are_shortened() {
    let mut data = sample();
    let long = "Extremely Long Company Name Holdings International Worldwide Limited";
    data.company = Some(CompanyBlock {
        name: Some(long.to_string()),
        address: Some(format!("{long} Street 1234")),
        email: Some(format!("accounts.receivable.department@{}.test", "x".repeat(40))),
        phone: Some("+1-555-123-4567".to_string()),
    });
    data.client.email = Some(format!("{}@example.com", "billing".repeat(20)));
    let list = layout(&data);

    let page_width = PageSize::A4.width;
    let branding_right = page_width - MARGIN - DETAIL_PANEL_WIDTH - SECTION_GAP;
    let client_right = page_width - MARGIN - PANEL_PADDING;
    let bill_to_y = y_of(&list, "BILL TO");
    let table_y = y_of(&list, "Description");

    for c in &list.commands {
        if let DrawCommand::TextRun {
            text, origin, font, ..
        } = c
        {
            let right = origin.x + font.text_width(text) - 1e-3;
            if origin.x == MARGIN && origin.y < bill_to_y {
                assert!(right <= branding_right, "{text:?} runs under the detail panel");
            } else if origin.y > bill_to_y && origin.y < table_y {
                assert!(right <= client_right, "{text:?} runs past the client panel");
            }
        }
    }
    assert!(list.texts().any(|t| t.ends_with('\u{2026}') && t.starts_with("Extremely")));
    assert!(list.texts().any(|t| t.ends_with('\u{2026}') && t.starts_with("billing")));
}

#[test]
fn removing_company_email_moves_phone_up_one_line() {
    let mut data = sample();
    if let Some(company) = data.company.as_mut() {
        company.phone = Some("+1-555-123-4567".to_string());
    }
    let with_email = layout(&data);
    if let Some(company) = data.company.as_mut() {
        company.email = None;
    }
    let without_email = layout(&data);

    assert_close(
        y_of(&with_email, "+1-555-123-4567") - y_of(&without_email, "+1-555-123-4567"),
        BODY_FONT.line_height(),
    );
    assert!(without_email.find_text("billing@acme.test").is_none());
    // The detail panel is taller than the branding, so later sections stay put.
    assert_eq!(y_of(&with_email, "BILL TO"), y_of(&without_email, "BILL TO"));
}

#[test]
fn striping_follows_even_row_indices() {
    for n in [0usize, 1, 4, 5] {
        let mut data = sample();
        data.items = (0..n)
            .map(|i| item(&format!("Item {i}"), 1, "10.00"))
            .collect();
        data.total_amount = Decimal::from(10 * n as u32);
        let list = layout(&data);
        let palette = derive_palette(resolve_accent(data.client.accent_color.as_deref()));

        let header_top = list
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { rect, .. } if rect.height == TABLE_HEADER_HEIGHT => {
                    Some(rect.y)
                }
                _ => None,
            })
            .expect("table header band");
        let tinted_rows: Vec<usize> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } if *color == palette.row_background => {
                    let offset = rect.y - header_top - TABLE_HEADER_HEIGHT;
                    Some((offset / TABLE_ROW_HEIGHT).round() as usize)
                }
                _ => None,
            })
            .collect();

        let expected: Vec<usize> = (0..n).filter(|i| i % 2 == 0).collect();
        assert_eq!(tinted_rows, expected, "n = {n}");
        assert_eq!(tinted_rows.len(), n.div_ceil(2));
    }
}
