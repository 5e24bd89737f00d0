mod tesseract;

use anyhow::{Result, anyhow};

pub use tesseract::{TesseractOcr, list_tesseract_languages};

pub const DEFAULT_LANGUAGES: &str = "eng";

/// Capability boundary around the OCR engine. `recognize` returns whatever
/// text the engine produced, which may be empty when the image holds no
/// readable characters.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8], languages: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractTextInput<'a> {
    pub image: &'a [u8],
    pub langs: Option<&'a str>,
}

/// Validate the request and delegate to the engine. The language hint is
/// trimmed and falls back to [`DEFAULT_LANGUAGES`]; engine failures propagate
/// unchanged.
pub fn extract_text(engine: &dyn OcrEngine, input: ExtractTextInput<'_>) -> Result<String> {
    if input.image.is_empty() {
        return Err(anyhow!("Image buffer is required"));
    }
    let langs = input
        .langs
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LANGUAGES);
    engine.recognize(input.image, langs)
}
