use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal conditions that abort a screening run.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("no job description PDF found in {dir}")]
    MissingReferenceDocument { dir: PathBuf },

    #[error("{} job description candidates in {dir}: {}", candidates.len(), candidates.join(", "))]
    AmbiguousReferenceDocument { dir: PathBuf, candidates: Vec<String> },

    #[error("job description {path} yielded no text")]
    EmptyReferenceText { path: PathBuf },

    #[error("cannot read directory {dir}")]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ScreenError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScreenError::MissingReferenceDocument { .. }
            | ScreenError::AmbiguousReferenceDocument { .. }
            | ScreenError::EmptyReferenceText { .. } => 2,
            ScreenError::DirectoryUnreadable { .. }
            | ScreenError::InvalidConfig(_)
            | ScreenError::Worker(_) => 1,
        }
    }
}

/// Per-document extraction failures. These are logged and swallowed by the
/// extractor; callers only ever see an empty text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("pdf: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("docx xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("ocr: {0}")]
    Ocr(String),

    #[error("{tool} timed out after {limit:?}")]
    Timeout { tool: &'static str, limit: Duration },

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
