//! Text extraction strategies, tried in order until one yields text.

use crate::PdfError;
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Upper bound on characters kept from a raw byte decode.
pub const MAX_RAW_CHARS: usize = 10_000;

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex"));
static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// One way of pulling text out of PDF bytes.
pub trait TextStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the text of each page in order.
    fn pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError>;
}

/// Walks page content streams with the `pdf` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentStreamText;

impl TextStrategy for ContentStreamText {
    fn name(&self) -> &'static str {
        "content-stream"
    }

    fn pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError> {
        let file = FileOptions::cached()
            .load(data)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        let resolver = file.resolver();
        let mut pages = Vec::new();

        for page_num in 0..file.num_pages() {
            let page = file
                .get_page(page_num)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            let mut page_text = String::new();
            if let Some(content) = &page.contents {
                let operations = content
                    .operations(&resolver)
                    .map_err(|e| PdfError::Parse(e.to_string()))?;
                for op in operations.iter() {
                    match op {
                        Op::TextDraw { text } => page_text.push_str(&text.to_string_lossy()),
                        Op::TextDrawAdjusted { array } => {
                            for item in array {
                                if let TextDrawAdjusted::Text(text) = item {
                                    page_text.push_str(&text.to_string_lossy());
                                }
                            }
                        }
                        Op::TextNewline | Op::EndText => page_text.push('\n'),
                        Op::MoveTextPosition { translation } if translation.y != 0.0 => {
                            page_text.push('\n')
                        }
                        _ => {}
                    }
                }
            }
            pages.push(page_text);
        }
        Ok(pages)
    }
}

/// Layout-aware extraction with `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutText;

impl TextStrategy for LayoutText {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        Ok(text.split('\u{c}').map(str::to_string).collect())
    }
}

pub const DEFAULT_STRATEGIES: [&dyn TextStrategy; 2] = [&ContentStreamText, &LayoutText];

/// Collapses horizontal whitespace runs and caps blank-line runs at one.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(text, " ");
    BLANK_LINE_RUN
        .replace_all(&collapsed, "\n\n")
        .trim()
        .to_string()
}

/// Runs one strategy, joining its non-empty pages. Panics inside the PDF
/// libraries count as failure.
fn run_strategy(strategy: &dyn TextStrategy, data: &[u8]) -> Result<Option<String>, PdfError> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| strategy.pages(data)))
        .map_err(|_| PdfError::Panicked(strategy.name()))??;
    let parts: Vec<&str> = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect();
    if parts.is_empty() {
        return Ok(None);
    }
    Ok(Some(normalize_whitespace(&parts.join("\n"))))
}

/// The normalized text from the first strategy that yields any.
pub fn library_text(data: &[u8], strategies: &[&dyn TextStrategy]) -> Option<String> {
    for strategy in strategies {
        match run_strategy(*strategy, data) {
            Ok(Some(text)) => {
                debug!(strategy = strategy.name(), chars = text.len(), "Extracted PDF text.");
                return Some(text);
            }
            Ok(None) => debug!(strategy = strategy.name(), "PDF strategy found no text."),
            Err(e) => debug!(strategy = strategy.name(), "PDF strategy failed: {e}"),
        }
    }
    None
}

/// Decodes bytes as UTF-8, or as Latin-1 when they are not valid UTF-8,
/// keeping at most [`MAX_RAW_CHARS`] characters.
pub fn raw_decode(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.chars().take(MAX_RAW_CHARS).collect(),
        Err(_) => data
            .iter()
            .take(MAX_RAW_CHARS)
            .map(|&byte| char::from(byte))
            .collect(),
    }
}

/// UTF-8 decode that drops invalid sequences instead of replacing them.
pub fn decode_lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Library text if any strategy produces it, otherwise a raw decode.
pub fn document_text(data: &[u8]) -> String {
    library_text(data, &DEFAULT_STRATEGIES).unwrap_or_else(|| {
        warn!("No PDF library produced text, falling back to raw decode.");
        raw_decode(data)
    })
}
