//! Byte-level preview loaders: DOCX to HTML, PDF page counting, and text decoding.

use std::io::{Cursor, Read};

use tracing::debug;

use crate::error::FileSessionError;

const OLE_COMPOUND_HEADER: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const DOCX_BODY_PART: &str = "word/document.xml";
const PDF_HEADER_SEARCH_WINDOW: usize = 1024;

/// Converts a word-processing document into renderable HTML.
pub trait DocumentConverter {
    /// Produces HTML for the document bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileSessionError::DocumentConversion`] with a readable reason.
    fn to_html(&self, bytes: &[u8]) -> Result<String, FileSessionError>;
}

/// Reads PDF structure needed by the pager.
pub trait PdfInspector {
    /// Returns the number of pages.
    ///
    /// # Errors
    ///
    /// Returns [`FileSessionError::PdfParse`] when the bytes are not a PDF or hold no pages.
    fn page_count(&self, bytes: &[u8]) -> Result<u32, FileSessionError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Paragraph-level DOCX renderer: text runs, line breaks, and tabs inside `<p>` elements.
pub struct DocxHtmlConverter;

impl DocumentConverter for DocxHtmlConverter {
    fn to_html(&self, bytes: &[u8]) -> Result<String, FileSessionError> {
        if bytes.starts_with(&OLE_COMPOUND_HEADER) {
            return Err(FileSessionError::DocumentConversion(
                "legacy .doc files cannot be previewed; download the file instead".to_string(),
            ));
        }

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            FileSessionError::DocumentConversion(format!("not a DOCX container: {e}"))
        })?;
        let mut body = String::new();
        archive
            .by_name(DOCX_BODY_PART)
            .map_err(|e| FileSessionError::DocumentConversion(format!("{DOCX_BODY_PART}: {e}")))?
            .read_to_string(&mut body)
            .map_err(|e| FileSessionError::DocumentConversion(format!("{DOCX_BODY_PART}: {e}")))?;

        Ok(render_document_xml(&body))
    }
}

#[derive(Default)]
struct DocxRenderState {
    html: String,
    paragraph: Option<String>,
    in_run: bool,
    in_text: bool,
}

impl DocxRenderState {
    fn open_paragraph(&mut self) {
        self.close_paragraph();
        self.paragraph = Some(String::new());
    }

    fn close_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            if !paragraph.trim().is_empty() {
                self.html.push_str("<p>");
                self.html.push_str(&paragraph);
                self.html.push_str("</p>");
            }
        }
    }

    fn push_inline(&mut self, fragment: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(fragment);
        }
    }
}

fn render_document_xml(xml: &str) -> String {
    let mut state = DocxRenderState::default();
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if state.in_text {
            let text = unescape_xml(&rest[..open]);
            state.push_inline(&escape_html(&text));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let inner = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        if inner.starts_with('?') || inner.starts_with('!') {
            continue;
        }
        let closing = inner.starts_with('/');
        let self_closing = inner.ends_with('/');
        let name = inner
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match (name, closing) {
            ("w:p", false) => {
                state.open_paragraph();
                if self_closing {
                    state.close_paragraph();
                }
            }
            ("w:p", true) => state.close_paragraph(),
            ("w:r", false) => state.in_run = !self_closing,
            ("w:r", true) => state.in_run = false,
            ("w:t", false) => state.in_text = !self_closing,
            ("w:t", true) => state.in_text = false,
            ("w:br" | "w:cr", false) if state.in_run => state.push_inline("<br>"),
            ("w:tab", false) if state.in_run => state.push_inline("\t"),
            _ => {}
        }
    }
    state.close_paragraph();
    state.html
}

/// Resolves the predefined XML entities and numeric character references in one pass.
///
/// Unknown or malformed references are kept verbatim.
fn unescape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest
            .find(';')
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, Copy, Default)]
/// Header check plus page-object scan; falls back to the largest `/Count` in a page tree.
pub struct PdfPageCounter;

impl PdfInspector for PdfPageCounter {
    fn page_count(&self, bytes: &[u8]) -> Result<u32, FileSessionError> {
        let window = &bytes[..bytes.len().min(PDF_HEADER_SEARCH_WINDOW)];
        if !window.windows(5).any(|w| w == b"%PDF-") {
            return Err(FileSessionError::PdfParse("missing %PDF header".to_string()));
        }

        let text = String::from_utf8_lossy(bytes);
        let pages = count_page_objects(&text);
        if pages > 0 {
            return Ok(pages);
        }
        match largest_page_tree_count(&text).filter(|count| *count > 0) {
            Some(count) => Ok(count),
            None => {
                // Page objects compressed into an object stream are invisible to the scan.
                debug!("no page objects or /Count found; assuming a single page");
                Ok(1)
            }
        }
    }
}

fn count_page_objects(text: &str) -> u32 {
    let mut pages = 0u32;
    for marker in ["/Type /Page", "/Type/Page"] {
        for (index, _) in text.match_indices(marker) {
            let next = text[index + marker.len()..].chars().next();
            if next != Some('s') {
                pages = pages.saturating_add(1);
            }
        }
    }
    pages
}

fn largest_page_tree_count(text: &str) -> Option<u32> {
    text.split("/Count")
        .skip(1)
        .filter_map(|segment| {
            let digits: String = segment
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().ok()
        })
        .max()
}

/// Decodes at most `limit` bytes as UTF-8 (lossy). Returns the text and whether it was cut short.
///
/// A multi-byte character split by the limit is dropped rather than rendered as a replacement
/// character.
pub fn decode_text_preview(bytes: &[u8], limit: usize) -> (String, bool) {
    let truncated = bytes.len() > limit;
    let mut slice = &bytes[..bytes.len().min(limit)];
    if truncated {
        if let Err(err) = std::str::from_utf8(slice) {
            if err.error_len().is_none() {
                slice = &slice[..err.valid_up_to()];
            }
        }
    }
    (String::from_utf8_lossy(slice).into_owned(), truncated)
}
