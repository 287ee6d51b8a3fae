use crate::error::ScreenError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub ranking: RankingConfig,
    pub ocr: OcrConfig,
    pub pipeline: PipelineConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub resumes_dir: PathBuf,
    pub job_description_dir: PathBuf,
    pub reference_policy: ReferencePolicy,
    /// Glob patterns; matching candidate files are skipped.
    pub exclude: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            resumes_dir: PathBuf::from("uploads"),
            job_description_dir: PathBuf::from("jobdesc"),
            reference_policy: ReferencePolicy::default(),
            exclude: Vec::new(),
        }
    }
}

/// What to do when the job description directory holds several PDFs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    #[default]
    Strict,
    #[cfg_attr(feature = "clap", value(alias = "first_sorted"))]
    FirstSorted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
    pub stop_words: StopWordsLanguage,
    pub extra_stop_words: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            stop_words: StopWordsLanguage::default(),
            extra_stop_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWordsLanguage {
    #[default]
    English,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    #[default]
    Tesseract,
    Leptess,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub engine: OcrEngine,
    /// Tesseract language model, e.g. `eng`, `deu`, `eng+fra`.
    pub language: String,
    pub dpi: u32,
    pub timeout_secs: u64,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngine::default(),
            language: "eng".to_string(),
            dpi: 300,
            timeout_secs: 120,
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub github_api_base: String,
    pub leetcode_api_base: String,
    pub codechef_base: String,
    pub user_agent: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 15,
            github_api_base: "https://api.github.com".to_string(),
            leetcode_api_base: "https://leetcode-stats-api.herokuapp.com".to_string(),
            codechef_base: "https://www.codechef.com".to_string(),
            user_agent: concat!("resume-screener/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ScreenError> {
        if self.ranking.top_n == 0 {
            return Err(ScreenError::InvalidConfig(
                "ranking.top_n must be at least 1".into(),
            ));
        }
        if self.pipeline.workers == 0 {
            return Err(ScreenError::InvalidConfig(
                "pipeline.workers must be at least 1".into(),
            ));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ScreenError::InvalidConfig("ocr.language is empty".into()));
        }
        Ok(())
    }
}

/// Defaults, then a TOML file, then `SCREENER_*` environment variables
/// (`__` separates section and key, e.g. `SCREENER_RANKING__TOP_N`).
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("SCREENER")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
