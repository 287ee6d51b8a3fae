use crate::config::{AppConfig, StatsConfig};
use crate::error::ScreenError;
use crate::extractor::Extractor;
use crate::links::extract_links;
use crate::models::{CandidateReport, ExtractedText, RawDocument, ScreeningReport};
use crate::ocr::recognizer_from_config;
use crate::ranker::rank;
use crate::scanner;
use crate::tokenizer::StopWords;
use providers::{default_registry, Endpoints, HttpConfig, ProviderError, ProviderRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Screen every resume against the job description, with the OCR engine
/// named in the configuration.
pub async fn run(
    config: &AppConfig,
    registry: &ProviderRegistry,
) -> Result<ScreeningReport, ScreenError> {
    let extractor = Extractor::new(recognizer_from_config(&config.ocr));
    run_with_extractor(config, &extractor, registry).await
}

pub async fn run_with_extractor(
    config: &AppConfig,
    extractor: &Extractor,
    registry: &ProviderRegistry,
) -> Result<ScreeningReport, ScreenError> {
    config.validate()?;

    let jd_dir = config.input.job_description_dir.clone();
    let policy = config.input.reference_policy;
    let reference =
        tokio::task::spawn_blocking(move || scanner::find_reference(&jd_dir, policy)).await??;
    info!(reference = %reference.id, "using job description");

    let resumes_dir = config.input.resumes_dir.clone();
    let excludes = config.input.exclude.clone();
    let candidates =
        tokio::task::spawn_blocking(move || scanner::load(&resumes_dir, &excludes)).await??;
    let candidates: Vec<Arc<RawDocument>> = candidates.into_iter().map(Arc::new).collect();

    info!(count = candidates.len(), "Starting extraction phase...");
    let texts = extract_all(extractor, &candidates, config.pipeline.workers).await?;

    let reference_text = extractor.extract(&reference).await;
    if reference_text.is_blank() {
        return Err(ScreenError::EmptyReferenceText {
            path: reference.path.clone(),
        });
    }

    let corpus: Vec<(String, String)> = candidates
        .iter()
        .zip(texts)
        .map(|(doc, text)| (doc.id.clone(), text.text))
        .collect();
    let stop_words = StopWords::from_config(&config.ranking);
    let ranked = rank(
        &corpus,
        &reference_text.text,
        config.ranking.top_n,
        &stop_words,
    );
    info!(ranked = ranked.len(), "Ranking complete.");

    let by_id: HashMap<&str, &RawDocument> = candidates
        .iter()
        .map(|d| (d.id.as_str(), d.as_ref()))
        .collect();
    let fetch_stats = config.stats.enabled && !registry.is_empty();
    let mut results = Vec::with_capacity(ranked.len());
    for (i, entry) in ranked.into_iter().enumerate() {
        let links = match by_id.get(entry.id.as_str()) {
            Some(doc) => extract_links(doc, &entry.text),
            None => Default::default(),
        };
        let profiles = if fetch_stats {
            registry.fetch_all(links.iter()).await
        } else {
            Vec::new()
        };
        results.push(CandidateReport {
            rank: i + 1,
            text_length: entry.text.chars().count(),
            id: entry.id,
            score: entry.score,
            links,
            profiles,
        });
    }

    Ok(ScreeningReport {
        reference: reference.id,
        candidates: candidates.len(),
        results,
    })
}

/// Extract all documents on at most `workers` concurrent tasks. The output is
/// in the same order as `docs`.
async fn extract_all(
    extractor: &Extractor,
    docs: &[Arc<RawDocument>],
    workers: usize,
) -> Result<Vec<ExtractedText>, ScreenError> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut set = JoinSet::new();
    for (idx, doc) in docs.iter().enumerate() {
        let permits = permits.clone();
        let extractor = extractor.clone();
        let doc = doc.clone();
        set.spawn(async move {
            // The semaphore is never closed.
            let _permit = permits.acquire_owned().await.ok();
            (idx, extractor.extract(&doc).await)
        });
    }

    let mut texts = vec![ExtractedText::empty(); docs.len()];
    while let Some(joined) = set.join_next().await {
        let (idx, text) = joined?;
        debug!(id = %docs[idx].id, chars = text.text.len(), "document extracted");
        texts[idx] = text;
    }
    Ok(texts)
}

/// Live providers for the configured endpoints, or an empty registry when
/// stats are switched off.
pub fn build_registry(cfg: &StatsConfig) -> Result<ProviderRegistry, ProviderError> {
    if !cfg.enabled {
        return Ok(ProviderRegistry::new());
    }
    let endpoints = Endpoints {
        github_api_base: cfg.github_api_base.clone(),
        leetcode_api_base: cfg.leetcode_api_base.clone(),
        codechef_base: cfg.codechef_base.clone(),
    };
    let http = HttpConfig {
        user_agent: cfg.user_agent.clone(),
        timeout: Duration::from_secs(cfg.timeout_secs),
    };
    default_registry(&endpoints, &http)
}
