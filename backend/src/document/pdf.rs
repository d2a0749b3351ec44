//! PDF rendering with `lopdf`

use super::layout::{Element, Font, PageLayout};
use super::DocumentError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// Turns a [`PageLayout`] into file bytes
pub trait DocumentRenderer {
    /// File extension of the produced format, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, layout: &PageLayout) -> Result<Vec<u8>, DocumentError>;
}

/// Single-page PDF using the standard Helvetica fonts
///
/// Output is byte-for-byte deterministic: no creation date or document id
/// is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
    }
}

/// Encode text for the WinAnsi font encoding
///
/// Latin-1 maps to itself; the typographic marks WinAnsi places in
/// 0x80..=0x9F get their code points there. Anything else prints as `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '™' => 0x99,
            c if c.is_ascii() => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn operations(layout: &PageLayout) -> Vec<Operation> {
    let mut ops = Vec::new();
    for element in &layout.elements {
        match element {
            Element::Text {
                x,
                y,
                size,
                font,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font_resource(*font).into(), (*size).into()],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_text(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => {
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, layout: &PageLayout) -> Result<Vec<u8>, DocumentError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let content = Content {
            operations: operations(layout),
        };
        let encoded = content
            .encode()
            .map_err(|e| DocumentError::Render(format!("content stream: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), layout.width.into(), layout.height.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| DocumentError::Render(format!("write: {}", e)))?;

        debug!(elements = layout.elements.len(), bytes = bytes.len(), "document rendered");
        Ok(bytes)
    }
}
