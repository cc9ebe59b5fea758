//! Shared helpers for integration tests: small transcript PDFs built with
//! lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Text placed at (x, y) in 10pt WinAnsi Helvetica.
pub type Item = (String, f32, f32);

/// Left margin of the metadata lines in [`transcript`].
pub const TEXT_MARGIN: f32 = 50.0;

/// Left edges of the five grade table columns.
pub const TABLE_COLUMNS: [f32; 5] = [40.0, 200.0, 280.0, 360.0, 440.0];

/// Build a document with one page per item list.
pub fn document(pages: &[Vec<Item>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for items in pages {
        let mut operations = Vec::new();
        for (text, x, y) in items {
            let latin1: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(latin1, StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Serialize a document.
pub fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Build a PDF with one page per item list.
pub fn build_pdf(pages: &[Vec<Item>]) -> Vec<u8> {
    save(document(pages))
}

/// Object id of the 1-based page `number`.
pub fn page_id(doc: &Document, number: u32) -> ObjectId {
    doc.get_pages()[&number]
}

/// Lines from the top of the page at the text margin.
pub fn lines(lines: &[&str]) -> Vec<Item> {
    lines_at(lines, TEXT_MARGIN, 780.0)
}

/// Lines at `x`, 14pt apart, the first one at `top`.
pub fn lines_at(lines: &[&str], x: f32, top: f32) -> Vec<Item> {
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.to_string(), x, top - i as f32 * 14.0))
        .collect()
}

/// Grade table rows in five aligned columns starting at `top`.
///
/// Empty cells are left out of the page.
pub fn grade_rows(rows: &[[&str; 5]], top: f32) -> Vec<Item> {
    let mut items = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        for (text, x) in row.iter().zip(TABLE_COLUMNS) {
            if !text.is_empty() {
                items.push((text.to_string(), x, top - i as f32 * 14.0));
            }
        }
    }
    items
}

/// First page of a transcript with its metadata lines at `margin`.
pub fn first_page(name: &str, number: &str, ine: &str, margin: f32) -> Vec<Item> {
    let mut page = lines_at(
        &[
            "Université Claude Bernard",
            "Session unique 2023-2024",
            name,
            "Licence Informatique",
            number,
            ine,
            "Né le 3 mars 2001",
            "à : Villeurbanne",
        ],
        margin,
        780.0,
    );
    page.extend(grade_rows(
        &[
            ["Matière", "Note/Barème", "Résultat", "Session", "Crédits"],
            ["UE1 Programmation", "14/20", "Validé", "S1", "6"],
            ["UE2 Réseaux", "12/20", "Validé", "S1", "6"],
        ],
        600.0,
    ));
    page
}

/// Second page of a transcript: continuation rows and a filtered total.
pub fn second_page() -> Vec<Item> {
    grade_rows(
        &[
            ["UE3 Systèmes", "10/20", "Validé", "S2", "6"],
            ["OPTIONS Anglais", "16/20", "Validé", "S2", "3"],
            ["Total semestre", "12/20", "", "", "21"],
        ],
        760.0,
    )
}

/// A complete two-page transcript for `name`.
pub fn transcript(name: &str, number: &str, ine: &str) -> Vec<u8> {
    build_pdf(&[first_page(name, number, ine, TEXT_MARGIN), second_page()])
}
