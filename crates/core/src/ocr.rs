//! Optical character recognition for PDF pages without a text layer.
//!
//! A page is rasterised with `pdftoppm` and then recognised either by the
//! `tesseract` executable or, with the `ocr` feature, by the leptess bindings.
//! Every external step runs under the configured timeout.

use crate::config::{OcrConfig, OcrEngine};
use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

#[async_trait::async_trait]
pub trait PageRecognizer: Send + Sync {
    /// Recognise the text of one page (1-based) of the PDF at `pdf`.
    async fn recognize(&self, pdf: &Path, page: u32) -> Result<String, ExtractError>;
}

pub fn recognizer_from_config(cfg: &OcrConfig) -> Arc<dyn PageRecognizer> {
    match cfg.engine {
        OcrEngine::Disabled => Arc::new(DisabledRecognizer),
        OcrEngine::Tesseract => Arc::new(ShellRecognizer::new(cfg)),
        #[cfg(feature = "ocr")]
        OcrEngine::Leptess => Arc::new(LeptessRecognizer::new(cfg)),
        #[cfg(not(feature = "ocr"))]
        OcrEngine::Leptess => {
            warn!("built without the `ocr` feature, using the tesseract executable");
            Arc::new(ShellRecognizer::new(cfg))
        }
    }
}

/// Skips recognition; scanned pages contribute no text.
#[derive(Debug, Default)]
pub struct DisabledRecognizer;

#[async_trait::async_trait]
impl PageRecognizer for DisabledRecognizer {
    async fn recognize(&self, _pdf: &Path, _page: u32) -> Result<String, ExtractError> {
        Ok(String::new())
    }
}

#[derive(Debug, Clone)]
struct Rasterizer {
    pdftoppm_bin: String,
    dpi: u32,
    timeout: Duration,
}

impl Rasterizer {
    fn new(cfg: &OcrConfig) -> Self {
        Self {
            pdftoppm_bin: cfg.pdftoppm_bin.clone(),
            dpi: cfg.dpi,
            timeout: cfg.timeout(),
        }
    }

    /// Render `page` to `<dir>/page.png`.
    async fn render(&self, pdf: &Path, page: u32, dir: &Path) -> Result<PathBuf, ExtractError> {
        let prefix = dir.join("page");
        let page_arg = page.to_string();
        let mut cmd = Command::new(&self.pdftoppm_bin);
        cmd.arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(pdf)
            .arg(&prefix);
        run_tool(cmd, "pdftoppm", self.timeout).await?;
        Ok(prefix.with_extension("png"))
    }
}

async fn run_tool(
    mut cmd: Command,
    tool: &'static str,
    limit: Duration,
) -> Result<Vec<u8>, ExtractError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = cmd
        .spawn()
        .map_err(|e| ExtractError::Ocr(format!("cannot start {tool}: {e}")))?;
    let output = tokio::time::timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| ExtractError::Timeout { tool, limit })??;
    if !output.status.success() {
        return Err(ExtractError::Ocr(format!(
            "{tool} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output.stdout)
}

/// Rasterises with `pdftoppm` and recognises with the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct ShellRecognizer {
    rasterizer: Rasterizer,
    tesseract_bin: String,
    language: String,
}

impl ShellRecognizer {
    pub fn new(cfg: &OcrConfig) -> Self {
        Self {
            rasterizer: Rasterizer::new(cfg),
            tesseract_bin: cfg.tesseract_bin.clone(),
            language: cfg.language.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PageRecognizer for ShellRecognizer {
    async fn recognize(&self, pdf: &Path, page: u32) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir()?;
        let image = self.rasterizer.render(pdf, page, scratch.path()).await?;
        let mut cmd = Command::new(&self.tesseract_bin);
        cmd.arg(&image).arg("stdout").arg("-l").arg(&self.language);
        let stdout = run_tool(cmd, "tesseract", self.rasterizer.timeout).await?;
        let text = String::from_utf8_lossy(&stdout).into_owned();
        debug!(pdf = %pdf.display(), page, chars = text.len(), "ocr page recognised");
        Ok(text)
    }
}

#[cfg(feature = "ocr")]
#[derive(Debug, Clone)]
pub struct LeptessRecognizer {
    rasterizer: Rasterizer,
    language: String,
}

#[cfg(feature = "ocr")]
impl LeptessRecognizer {
    pub fn new(cfg: &OcrConfig) -> Self {
        Self {
            rasterizer: Rasterizer::new(cfg),
            language: cfg.language.clone(),
        }
    }
}

#[cfg(feature = "ocr")]
#[async_trait::async_trait]
impl PageRecognizer for LeptessRecognizer {
    async fn recognize(&self, pdf: &Path, page: u32) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir()?;
        let image = self.rasterizer.render(pdf, page, scratch.path()).await?;
        let language = self.language.clone();
        let limit = self.rasterizer.timeout;
        let job = tokio::task::spawn_blocking(move || -> Result<String, ExtractError> {
            let mut lt = leptess::LepTess::new(None, &language)
                .map_err(|e| ExtractError::Ocr(e.to_string()))?;
            lt.set_image(&image)
                .map_err(|e| ExtractError::Ocr(e.to_string()))?;
            lt.get_utf8_text()
                .map_err(|e| ExtractError::Ocr(e.to_string()))
        });
        // The blocking thread cannot be interrupted; on timeout it is detached.
        let text = tokio::time::timeout(limit, job)
            .await
            .map_err(|_| ExtractError::Timeout {
                tool: "leptess",
                limit,
            })?
            .map_err(|e| ExtractError::Ocr(e.to_string()))??;
        drop(scratch);
        Ok(text)
    }
}
