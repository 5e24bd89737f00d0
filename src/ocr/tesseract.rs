use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::Command;
use tracing::warn;

use crate::settings::Settings;

use super::OcrEngine;

/// Tesseract-backed [`OcrEngine`]. The image is decoded, re-encoded as PNG
/// into a temp file and handed to the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    psm: u32,
    dpi: u32,
}

impl TesseractOcr {
    pub fn new(settings: &Settings) -> Self {
        Self {
            psm: settings.ocr_psm,
            dpi: settings.ocr_dpi,
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &[u8], languages: &str) -> Result<String> {
        let decoded =
            image::load_from_memory(image).with_context(|| "failed to decode image for OCR")?;
        let languages = normalize_languages(languages)?;

        let mut tmp = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .with_context(|| "failed to create temp file for OCR")?;
        decoded
            .write_to(&mut tmp, image::ImageFormat::Png)
            .with_context(|| "failed to write temp image for OCR")?;
        tmp.flush().ok();

        run_tesseract_text(tmp.path(), &languages, self.psm, self.dpi)
    }
}

pub fn list_tesseract_languages() -> Result<Vec<String>> {
    let output = Command::new("tesseract")
        .arg("--list-langs")
        .output()
        .with_context(|| "failed to run tesseract --list-langs")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract --list-langs failed: {}", stderr.trim()));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    // first line is the "List of available languages" banner
    let langs = stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    Ok(langs)
}

fn normalize_languages(requested: &str) -> Result<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("ocr languages is empty"));
    }

    let Ok(available) = list_tesseract_languages() else {
        return Ok(trimmed.to_string());
    };

    let (chosen, missing) = partition_languages(trimmed, &available);
    if chosen.is_empty() {
        return Err(anyhow!(
            "ocr language(s) not available: {} (available: {})",
            missing.join(", "),
            available.join(", ")
        ));
    }
    if !missing.is_empty() {
        warn!("ocr language(s) not available: {}", missing.join(", "));
    }

    Ok(chosen.join("+"))
}

fn partition_languages(requested: &str, available: &[String]) -> (Vec<String>, Vec<String>) {
    let mut chosen = Vec::new();
    let mut missing = Vec::new();
    for lang in requested
        .split(['+', ',', ' '])
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        if available.iter().any(|value| value == lang) {
            chosen.push(lang.to_string());
        } else {
            missing.push(lang.to_string());
        }
    }
    (chosen, missing)
}

fn run_tesseract_text(
    path: &std::path::Path,
    languages: &str,
    psm: u32,
    dpi: u32,
) -> Result<String> {
    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .arg("--oem")
        .arg("1")
        .arg("--psm")
        .arg(psm.to_string())
        .arg("--dpi")
        .arg(dpi.to_string())
        .output()
        .with_context(|| "failed to run tesseract (is it installed?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("tesseract failed: {}", stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
