//! Page-wise PDF text extraction.
//!
//! Decodes each page's content stream with lopdf and collects the text
//! shown by `Tj`, `'`, `"` and `TJ` operators. A page that fails to decode
//! is skipped with a warning; a document yielding no text at all is an
//! error.

use lopdf::content::Content;
use lopdf::{Document, Object};
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{AppError, Result};

/// Extracted text for a single page, 1-based page number.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Extract text from every page of the PDF at `path`.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
    let doc = Document::load(path).map_err(|e| AppError::PdfParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut pages = Vec::new();
    for (index, page_id) in doc.page_iter().enumerate() {
        let page_number = index as u32 + 1;
        let text = match doc.get_page_content(page_id) {
            Ok(stream) => page_text_from_stream(&stream),
            Err(e) => {
                warn!(page = page_number, error = %e, "Failed to read page content, skipping");
                continue;
            }
        };
        let text = normalize_whitespace(&text);
        if !text.is_empty() {
            pages.push(PageText { page_number, text });
        }
    }

    if pages.is_empty() {
        return Err(AppError::PdfParse {
            path: path.display().to_string(),
            message: "no text content extracted".to_string(),
        });
    }

    debug!(path = %path.display(), pages = pages.len(), "PDF text extracted");
    Ok(pages)
}

/// Collect text-showing operands from a decoded content stream.
fn page_text_from_stream(stream: &[u8]) -> String {
    let content = match Content::decode(stream) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to decode content stream");
            return String::new();
        }
    };

    let mut text = String::new();
    for op in &content.operations {
        match op.operator.as_str() {
            "Tj" | "'" | "\"" => {
                for operand in &op.operands {
                    push_text_object(&mut text, operand);
                }
            }
            "TJ" => {
                // Array of strings interleaved with kerning adjustments
                for operand in &op.operands {
                    if let Object::Array(elements) = operand {
                        for element in elements {
                            push_text_object(&mut text, element);
                        }
                    }
                }
            }
            // Text positioning operators imply a break between runs
            "Td" | "TD" | "T*" | "ET" => {
                if !text.ends_with(' ') && !text.is_empty() {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
    text
}

fn push_text_object(out: &mut String, object: &Object) {
    if let Object::String(bytes, _) = object {
        out.push_str(&String::from_utf8_lossy(bytes));
    }
}

/// Collapse runs of whitespace into single spaces.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(normalize_whitespace("Hello   World\n\nTest"), "Hello World Test");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn extracts_tj_and_array_text() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tj", vec![Object::string_literal("Hello")]),
                Operation::new("TD", vec![0.into(), (-14).into()]),
                Operation::new(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::string_literal("wor"),
                        Object::Integer(-20),
                        Object::string_literal("ld"),
                    ])],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let encoded = content.encode().unwrap();
        let text = normalize_whitespace(&page_text_from_stream(&encoded));
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn garbage_stream_yields_empty_text() {
        assert_eq!(page_text_from_stream(b"\x00\x01not a stream"), "");
    }
}
