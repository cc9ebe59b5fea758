//! Positioned text spans read from a page content stream.
//!
//! Line reconstruction and table detection both need to know where each
//! piece of text sits on the page, which plain text extraction loses.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// TJ adjustment (thousandths of text space) treated as a word gap.
const SPACE_THRESHOLD: f32 = 200.0;

/// A run of text with its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF coordinates: larger is higher)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating its width from the font size.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Reads [`TextSpan`]s from the pages of a lopdf document.
pub struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    /// Create an extractor over `doc`.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract the text spans of one page.
    pub fn page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.doc.get_page_content(page_id)?;
        let content =
            lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix {
                        leading: matrix.leading,
                        ..TextMatrix::default()
                    };
                }
                "ET" => in_text_block = false,
                "Tf" if operands.len() >= 2 => {
                    if let Object::Name(name) = &operands[0] {
                        font_name = name.clone();
                    }
                    font_size = number(&operands[1]).unwrap_or(12.0);
                }
                "TL" => matrix.leading = operands.first().and_then(number).unwrap_or(0.0),
                "Td" | "TD" if operands.len() >= 2 => {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        matrix.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
                "Tm" if operands.len() >= 6 => {
                    let v: Vec<f32> = operands.iter().take(6).map(|o| number(o).unwrap_or(0.0)).collect();
                    matrix.set(v[0], v[1], v[2], v[3], v[4], v[5]);
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    let text_operand = match op.operator.as_str() {
                        "\"" => operands.get(2),
                        _ => operands.first(),
                    };
                    let text = text_operand
                        .map(|o| self.decode_operand(o, fonts.get(&font_name).copied()))
                        .unwrap_or_default();

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn decode_operand(&self, operand: &Object, font: Option<&Dictionary>) -> String {
        let encoding = font.and_then(|f| f.get_font_encoding(self.doc).ok());
        let decode = |bytes: &[u8]| match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        };

        match operand {
            Object::String(bytes, _) => decode(bytes),
            Object::Array(items) => {
                let mut combined = String::new();
                for item in items {
                    match item {
                        Object::String(bytes, _) => combined.push_str(&decode(bytes)),
                        Object::Integer(_) | Object::Real(_) => {
                            let adjustment = -number(item).unwrap_or(0.0);
                            if adjustment > SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                            {
                                combined.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
                combined
            }
            _ => String::new(),
        }
    }
}

/// Text matrix state between text-positioning operators.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        let leading = if self.leading > 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode string bytes when the font gives no usable encoding.
///
/// UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Spans sharing one baseline, sorted left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRow {
    /// Mean baseline of the row
    pub y: f32,
    /// Spans sorted by X
    pub spans: Vec<TextSpan>,
}

impl SpanRow {
    /// Join the row's spans into one line of text.
    ///
    /// A space is inserted where two spans do not touch.
    pub fn text(&self) -> String {
        let mut line = String::new();
        let mut last_right: Option<f32> = None;
        for span in &self.spans {
            if let Some(right) = last_right {
                let gap = span.x - right;
                if gap > span.font_size * 0.15 && !line.ends_with(' ') && !span.text.starts_with(' ')
                {
                    line.push(' ');
                }
            }
            line.push_str(&span.text);
            last_right = Some(span.right());
        }
        line.trim().to_string()
    }
}

/// Group spans into rows by baseline, top of the page first.
///
/// Two spans share a row when their baselines differ by at most
/// `tolerance_factor` times the font size of the later span.
pub fn group_rows(spans: &[TextSpan], tolerance_factor: f32) -> Vec<SpanRow> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<SpanRow> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in sorted {
        let tolerance = span.font_size * tolerance_factor;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    rows.push(close_row(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        rows.push(close_row(current));
    }

    rows
}

fn close_row(mut spans: Vec<TextSpan>) -> SpanRow {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    SpanRow { y, spans }
}

/// Look up the page ids of a document in page order.
pub fn page_ids(doc: &LopdfDocument) -> Vec<ObjectId> {
    let pages: BTreeMap<u32, ObjectId> = doc.get_pages();
    pages.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x4E, 0xE9, 0x65]), "Née");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x55, 0x00, 0x45]), "UE");
    }

    #[test]
    fn test_text_matrix_next_line_uses_leading() {
        let mut matrix = TextMatrix::default();
        matrix.set(1.0, 0.0, 0.0, 1.0, 50.0, 700.0);
        matrix.leading = 14.0;
        matrix.next_line();
        assert_eq!(matrix.position(), (50.0, 686.0));

        matrix.leading = 0.0;
        matrix.next_line();
        assert_eq!(matrix.position(), (50.0, 674.0));
    }

    #[test]
    fn test_group_rows_by_baseline() {
        let spans = vec![
            TextSpan::new("INE: AB123", 50.0, 680.0, 10.0),
            TextSpan::new("Session", 50.0, 700.0, 10.0),
            TextSpan::new("unique", 90.0, 701.5, 10.0),
        ];
        let rows = group_rows(&spans, 0.4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text(), "Session unique");
        assert_eq!(rows[1].text(), "INE: AB123");
    }

    #[test]
    fn test_row_text_joins_touching_spans() {
        let row = SpanRow {
            y: 0.0,
            spans: vec![
                TextSpan::new("Mat", 0.0, 0.0, 10.0),
                TextSpan::new("ière", 15.0, 0.0, 10.0),
            ],
        };
        assert_eq!(row.text(), "Matière");
    }

    #[test]
    fn test_span_width_estimate() {
        let span = TextSpan::new("UE1", 10.0, 100.0, 10.0);
        assert_eq!(span.width, 15.0);
        assert_eq!(span.right(), 25.0);
    }
}
