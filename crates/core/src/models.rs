use crate::links::LinkSet;
use providers::ProfileStats;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Pdf,
    Docx,
}

impl DocFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "pdf" => Some(DocFormat::Pdf),
                "docx" => Some(DocFormat::Docx),
                _ => None,
            })
    }
}

/// A loaded input document. `id` is the file name.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub path: PathBuf,
    pub format: DocFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
    pub ocr_pages: usize,
}

impl ExtractedText {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub id: String,
    pub score: f32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub rank: usize,
    pub id: String,
    pub score: f32,
    pub text_length: usize,
    pub links: LinkSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub reference: String,
    pub candidates: usize,
    pub results: Vec<CandidateReport>,
}
