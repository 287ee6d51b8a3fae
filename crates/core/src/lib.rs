//! Core library: document loading, text extraction, profile links and
//! similarity ranking.

pub mod config;
pub mod error;
pub mod extractor;
pub mod links;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod ranker;
pub mod scanner;
pub mod tokenizer;

pub use error::{ExtractError, ScreenError};
