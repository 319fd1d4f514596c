//! PDF backend: turns canvas primitives into a single-page `lopdf` document.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::canvas::{Canvas, PageSize, Point, Rect};
use super::color::{Color, WHITE};
use super::metrics::{Font, FontFace};
use super::RenderError;

const PRODUCER: &str = concat!("invoice-render ", env!("CARGO_PKG_VERSION"));

/// Document-level metadata written to the Info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub created: NaiveDate,
}

/// A canvas that writes PDF content-stream operators.
///
/// PDF user space has its origin at the bottom-left. The constructor emits a
/// single `cm` that translates by the page height and mirrors y, so every
/// primitive afterwards is written in top-left coordinates unchanged.
pub struct PdfCanvas {
    page: PageSize,
    operations: Vec<Operation>,
}

impl PdfCanvas {
    pub fn new(page: PageSize) -> Result<Self, RenderError> {
        let page = page.validate()?;
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    (-1).into(),
                    0.into(),
                    page.height.into(),
                ],
            ),
        ];
        Ok(Self { page, operations })
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        let [r, g, b] = color.flatten_over(WHITE).components();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn set_stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.flatten_over(WHITE).components();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    /// Serializes the page into a complete PDF file.
    pub fn finish(mut self, info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
        self.push("Q", vec![]);
        let content = Content {
            operations: self.operations,
        }
        .encode()?;

        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for face in [FontFace::Helvetica, FontFace::HelveticaBold] {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }
        let resources_id = document.add_object(dictionary! { "Font" => fonts });

        let content_id = document.add_object(Stream::new(lopdf::Dictionary::new(), content));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), self.page.width.into(), self.page.height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = document.add_object(dictionary! {
            "Title" => Object::String(encode_text(&info.title), StringFormat::Literal),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(
                info.created.format("D:%Y%m%d000000Z").to_string(),
            ),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Serialize(e.to_string()))?;
        Ok(bytes)
    }
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> PageSize {
        self.page
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_fill_color(color);
        self.push(
            "re",
            vec![
                rect.x.into(),
                rect.y.into(),
                rect.width.into(),
                rect.height.into(),
            ],
        );
        self.push("f", vec![]);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.set_stroke_color(color);
        self.push("w", vec![width.into()]);
        self.push("m", vec![from.x.into(), from.y.into()]);
        self.push("l", vec![to.x.into(), to.y.into()]);
        self.push("S", vec![]);
    }

    fn draw_text_run(&mut self, text: &str, origin: Point, font: Font, color: Color) -> f32 {
        let baseline = origin.y + font.baseline_offset();
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![font.face.resource_name().into(), font.size.into()],
        );
        self.set_fill_color(color);
        // The text matrix mirrors y back so glyphs stand upright in the
        // flipped user space.
        self.push(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                (-1).into(),
                origin.x.into(),
                baseline.into(),
            ],
        );
        self.push(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
        font.line_height()
    }
}

/// Encodes text for the WinAnsi-encoded standard fonts. Characters with no
/// WinAnsi code become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Serialize(e.to_string())
    }
}
