//! Converts loaded documents into plain text.
//!
//! PDF pages are read from their text layer; a page whose layer is empty or
//! unreadable is handed to the configured [`PageRecognizer`]. The same path is
//! used for candidate resumes and for the job description.

use crate::error::ExtractError;
use crate::models::{DocFormat, ExtractedText, RawDocument};
use crate::ocr::PageRecognizer;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Extractor {
    recognizer: Arc<dyn PageRecognizer>,
}

impl Extractor {
    pub fn new(recognizer: Arc<dyn PageRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Never fails: any error is logged and yields an empty text, so the
    /// document still takes part in ranking.
    pub async fn extract(&self, doc: &RawDocument) -> ExtractedText {
        let result = match doc.format {
            DocFormat::Pdf => self.pdf_text(doc).await,
            DocFormat::Docx => docx_text(&doc.bytes),
        };
        match result {
            Ok(text) => {
                debug!(
                    id = %doc.id,
                    chars = text.text.len(),
                    pages = text.pages,
                    ocr_pages = text.ocr_pages,
                    "extracted text"
                );
                text
            }
            Err(e) => {
                warn!(id = %doc.id, error = %e, "text extraction failed");
                ExtractedText::empty()
            }
        }
    }

    async fn pdf_text(&self, doc: &RawDocument) -> Result<ExtractedText, ExtractError> {
        let bytes = doc.bytes.clone();
        let layers = tokio::task::spawn_blocking(move || text_layers(&bytes)).await??;
        let mut out = ExtractedText {
            pages: layers.len(),
            ..ExtractedText::default()
        };
        for (page, layer) in layers {
            if !layer.trim().is_empty() {
                out.text.push_str(&layer);
                continue;
            }
            match self.recognizer.recognize(&doc.path, page).await {
                Ok(text) => {
                    out.ocr_pages += 1;
                    out.text.push_str(&text);
                }
                Err(e) => {
                    warn!(id = %doc.id, page, error = %e, "ocr failed, page left empty");
                }
            }
        }
        Ok(out)
    }
}

/// Text layer of every page, in page order. Pages whose layer cannot be
/// decoded come back empty.
fn text_layers(bytes: &[u8]) -> Result<Vec<(u32, String)>, ExtractError> {
    let pdf = lopdf::Document::load_mem(bytes)?;
    let layers = pdf
        .get_pages()
        .into_keys()
        .map(|page| {
            let text = pdf.extract_text(&[page]).unwrap_or_else(|e| {
                debug!(page, error = %e, "no usable text layer");
                String::new()
            });
            (page, text)
        })
        .collect();
    Ok(layers)
}

/// Paragraph text of `word/document.xml` in document order. Each paragraph
/// ends with a line break.
pub fn docx_text(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ExtractedText {
        text,
        ..ExtractedText::default()
    })
}
