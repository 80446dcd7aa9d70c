//! docqa-extract
//!
//! PDF text extraction on top of `lopdf`. The file is opened here and handed
//! to the parser as a reader, so the handle is dropped on every return path.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use docqa_core::traits::TextExtractor;
use docqa_core::{Error, Result};

/// Extracts the text layer of every page, in page order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_text(&self, path: &Path) -> Result<String> {
        let doc = {
            let file = File::open(path).map_err(|e| Error::Extraction(format!("{}: {}", path.display(), e)))?;
            Document::load_from(BufReader::new(file)).map_err(|e| Error::Extraction(format!("{}: {}", path.display(), e)))?
        };

        let pages = doc.get_pages();
        debug!(path = %path.display(), pages = pages.len(), "parsed pdf");

        let mut text = String::new();
        for &page_number in pages.keys() {
            match doc.extract_text(&[page_number]) {
                Ok(page_text) => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(e) => warn!(page = page_number, error = %e, "skipping page without decodable text"),
            }
        }
        Ok(text)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        self.extract_text(path)
    }
}
