#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use screener_core::error::ExtractError;
use screener_core::ocr::PageRecognizer;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;

/// One PDF page: optional text layer and optional annotations. `links` are
/// `/Link` annotations with a `/URI` action; `annotations` carry an explicit
/// `(subtype, action, uri)`.
#[derive(Default, Clone)]
pub struct Page<'a> {
    pub text: Option<&'a str>,
    pub links: Vec<&'a str>,
    pub annotations: Vec<(&'a str, &'a str, &'a str)>,
}

impl<'a> Page<'a> {
    pub fn text(text: &'a str) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    pub fn scanned() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, uri: &'a str) -> Self {
        self.links.push(uri);
        self
    }

    pub fn with_annotation(mut self, subtype: &'a str, action: &'a str, uri: &'a str) -> Self {
        self.annotations.push((subtype, action, uri));
        self
    }
}

pub fn pdf(pages: &[Page<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page.text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        };
        let specs = page
            .links
            .iter()
            .map(|uri| ("Link", "URI", *uri))
            .chain(page.annotations.iter().copied());
        let annots: Vec<Object> = specs
            .map(|(subtype, action, uri)| {
                doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => subtype,
                    "Rect" => vec![72.into(), 700.into(), 300.into(), 712.into()],
                    "A" => dictionary! {
                        "S" => action,
                        "URI" => Object::string_literal(uri),
                    },
                })
                .into()
            })
            .collect();
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Minimal DOCX archive with one paragraph per entry.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        write!(
            zip,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body>{body}</w:body></w:document>"
            ),
            body = body
        )
        .unwrap();
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// Recognizer that answers from a fixed string and records the pages asked.
pub struct StubRecognizer {
    pub reply: String,
    pub calls: Mutex<Vec<u32>>,
}

impl StubRecognizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageRecognizer for StubRecognizer {
    async fn recognize(&self, _pdf: &Path, page: u32) -> Result<String, ExtractError> {
        self.calls.lock().unwrap().push(page);
        Ok(self.reply.clone())
    }
}

/// Recognizer that always fails.
pub struct BrokenRecognizer;

#[async_trait::async_trait]
impl PageRecognizer for BrokenRecognizer {
    async fn recognize(&self, _pdf: &Path, _page: u32) -> Result<String, ExtractError> {
        Err(ExtractError::Ocr("engine crashed".into()))
    }
}
