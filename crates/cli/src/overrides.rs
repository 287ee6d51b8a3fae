//! Command-line flags layered over the loaded configuration.

use clap::Args;
use screener_core::config::{AppConfig, OcrEngine, ReferencePolicy};
use std::path::PathBuf;

#[derive(Args, Debug, Default, Clone)]
pub struct RankArgs {
    /// Directory holding candidate resumes (PDF/DOCX)
    #[arg(long)]
    pub resumes: Option<PathBuf>,
    /// Directory holding the job description PDF
    #[arg(long = "job-description")]
    pub job_description: Option<PathBuf>,
    /// Number of results to report
    #[arg(long)]
    pub top_n: Option<usize>,
    /// Tesseract language model, e.g. eng or eng+deu
    #[arg(long)]
    pub ocr_lang: Option<String>,
    /// OCR engine
    #[arg(long, value_enum)]
    pub ocr_engine: Option<OcrEngine>,
    /// Concurrent extraction workers
    #[arg(long)]
    pub workers: Option<usize>,
    /// What to do when several job descriptions exist
    #[arg(long, value_enum)]
    pub reference_policy: Option<ReferencePolicy>,
    /// Skip profile statistics lookups
    #[arg(long, default_value_t = false)]
    pub no_stats: bool,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl RankArgs {
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(dir) = &self.resumes {
            cfg.input.resumes_dir = dir.clone();
        }
        if let Some(dir) = &self.job_description {
            cfg.input.job_description_dir = dir.clone();
        }
        if let Some(n) = self.top_n {
            cfg.ranking.top_n = n;
        }
        if let Some(lang) = &self.ocr_lang {
            cfg.ocr.language = lang.clone();
        }
        if let Some(engine) = self.ocr_engine {
            cfg.ocr.engine = engine;
        }
        if let Some(workers) = self.workers {
            cfg.pipeline.workers = workers;
        }
        if let Some(policy) = self.reference_policy {
            cfg.input.reference_policy = policy;
        }
        if self.no_stats {
            cfg.stats.enabled = false;
        }
    }
}
