//! OCR engines for pages that carry no text layer.

use super::SourceDocument;
use crate::config::OcrConfig;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use thiserror::Error;

/// Errors raised while rendering or recognizing a page.
#[derive(Debug, Error)]
pub enum OcrError {
    /// OCR was turned off through configuration.
    #[error("OCR is disabled")]
    Disabled,
    /// Scratch files could not be created or read.
    #[error("OCR scratch I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// An external tool exited unsuccessfully or could not be spawned.
    #[error("{tool} failed: {details}")]
    ToolFailed {
        /// Executable that failed.
        tool: String,
        /// Exit status and stderr captured from the tool.
        details: String,
    },
}

/// Recognizes text on a single rendered page.
pub trait OcrEngine: Send + Sync {
    /// Return the text recognized on `page_number` (1-based).
    fn recognize_page(
        &self,
        document: &SourceDocument,
        page_number: u32,
    ) -> Result<String, OcrError>;
}

/// Engine used when OCR is disabled; every page yields [`OcrError::Disabled`].
pub struct DisabledOcr;

impl OcrEngine for DisabledOcr {
    fn recognize_page(&self, _document: &SourceDocument, _page: u32) -> Result<String, OcrError> {
        Err(OcrError::Disabled)
    }
}

/// Renders a page with `pdftoppm` and recognizes it with the `tesseract` CLI.
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    /// Build an engine from OCR settings.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    fn render_page(
        &self,
        pdf: &Path,
        page_number: u32,
        workdir: &Path,
    ) -> Result<PathBuf, OcrError> {
        let prefix = workdir.join("page");
        let page = page_number.to_string();
        let dpi = self.config.dpi.to_string();
        run_tool(
            Command::new(&self.config.pdftoppm_bin)
                .args(["-png", "-singlefile", "-r", &dpi, "-f", &page, "-l", &page])
                .arg(pdf)
                .arg(&prefix),
            &self.config.pdftoppm_bin,
        )?;
        Ok(prefix.with_extension("png"))
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_page(
        &self,
        document: &SourceDocument,
        page_number: u32,
    ) -> Result<String, OcrError> {
        let pdf = document.materialize()?;
        let workdir = TempDir::new()?;
        let image = self.render_page(pdf, page_number, workdir.path())?;
        tracing::debug!(page = page_number, dpi = self.config.dpi, "Rendered page for OCR");

        let stdout = run_tool(
            Command::new(&self.config.tesseract_bin)
                .arg(&image)
                .arg("stdout")
                .args(["-l", &self.config.language]),
            &self.config.tesseract_bin,
        )?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn run_tool(command: &mut Command, tool: &str) -> Result<Vec<u8>, OcrError> {
    let output = command.output().map_err(|error| OcrError::ToolFailed {
        tool: tool.to_string(),
        details: format!("could not start: {error}"),
    })?;
    if !output.status.success() {
        return Err(OcrError::ToolFailed {
            tool: tool.to_string(),
            details: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(output.stdout)
}

/// Select the OCR engine described by configuration.
pub fn build_ocr_engine(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    if config.enabled {
        Arc::new(TesseractOcr::new(config.clone()))
    } else {
        Arc::new(DisabledOcr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_always_fails() {
        let document = SourceDocument::new(Vec::new());
        let error = DisabledOcr
            .recognize_page(&document, 1)
            .expect_err("disabled");
        assert!(matches!(error, OcrError::Disabled));
    }

    #[test]
    fn missing_binary_is_a_tool_failure() {
        let engine = TesseractOcr::new(OcrConfig {
            pdftoppm_bin: "smartsum-definitely-missing-pdftoppm".into(),
            ..OcrConfig::default()
        });
        let document = SourceDocument::new(b"%PDF-1.5".to_vec());

        let error = engine.recognize_page(&document, 1).expect_err("no binary");
        assert!(
            matches!(&error, OcrError::ToolFailed { tool, .. } if tool.contains("missing-pdftoppm"))
        );
    }

    #[test]
    #[ignore = "Requires pdftoppm and tesseract on PATH"]
    fn live_tools_handle_blank_page() {
        let engine = TesseractOcr::new(OcrConfig::default());
        let document = SourceDocument::new(super::super::test_support::build_pdf(&[None]));
        let text = engine.recognize_page(&document, 1).expect("ocr");
        assert!(text.trim().is_empty());
    }
}
