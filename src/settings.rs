use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub max_upload_bytes: usize,
    pub ocr_languages: String,
    pub ocr_psm: u32,
    pub ocr_dpi: u32,
    pub cleanup_base_url: String,
    pub cleanup_model: String,
    pub cleanup_timeout_secs: u64,
    pub cleanup_max_tokens: u32,
    pub cleanup_temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            ocr_languages: "eng".to_string(),
            ocr_psm: 6,
            ocr_dpi: 300,
            cleanup_base_url: "https://api.mistral.ai/v1".to_string(),
            cleanup_model: "mistral-small-latest".to_string(),
            cleanup_timeout_secs: 20,
            cleanup_max_tokens: 512,
            cleanup_temperature: 0.2,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server: Option<ServerSettings>,
    ocr: Option<OcrSettings>,
    cleanup: Option<CleanupSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    max_upload_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrSettings {
    languages: Option<String>,
    psm: Option<u32>,
    dpi: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct CleanupSettings {
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(server) = incoming.server {
            if let Some(limit) = server.max_upload_bytes {
                if limit > 0 {
                    self.max_upload_bytes = limit;
                }
            }
        }
        if let Some(ocr) = incoming.ocr {
            if let Some(languages) = ocr.languages {
                if !languages.trim().is_empty() {
                    self.ocr_languages = languages;
                }
            }
            if let Some(psm) = ocr.psm {
                self.ocr_psm = psm;
            }
            if let Some(dpi) = ocr.dpi {
                if dpi > 0 {
                    self.ocr_dpi = dpi;
                }
            }
        }
        if let Some(cleanup) = incoming.cleanup {
            if let Some(base_url) = cleanup.base_url {
                if !base_url.trim().is_empty() {
                    self.cleanup_base_url = base_url;
                }
            }
            if let Some(model) = cleanup.model {
                if !model.trim().is_empty() {
                    self.cleanup_model = model;
                }
            }
            if let Some(secs) = cleanup.timeout_secs {
                if secs > 0 {
                    self.cleanup_timeout_secs = secs;
                }
            }
            if let Some(tokens) = cleanup.max_tokens {
                if tokens > 0 {
                    self.cleanup_max_tokens = tokens;
                }
            }
            if let Some(temperature) = cleanup.temperature {
                if (0.0..=2.0).contains(&temperature) {
                    self.cleanup_temperature = temperature;
                }
            }
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".aadhaar-ocr-server"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_defaults() {
        let mut settings = Settings::default();
        let parsed: SettingsFile = toml::from_str(
            r#"
            [server]
            max_upload_bytes = 1024

            [ocr]
            languages = "eng+hin"
            psm = 4

            [cleanup]
            model = "mistral-large-latest"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        settings.merge(parsed);

        assert_eq!(settings.max_upload_bytes, 1024);
        assert_eq!(settings.ocr_languages, "eng+hin");
        assert_eq!(settings.ocr_psm, 4);
        assert_eq!(settings.ocr_dpi, 300);
        assert_eq!(settings.cleanup_model, "mistral-large-latest");
        assert_eq!(settings.cleanup_timeout_secs, 5);
        assert_eq!(settings.cleanup_base_url, "https://api.mistral.ai/v1");
    }

    #[test]
    fn merge_ignores_blank_and_out_of_range_values() {
        let mut settings = Settings::default();
        let parsed: SettingsFile = toml::from_str(
            r#"
            [ocr]
            languages = "  "

            [cleanup]
            base_url = ""
            timeout_secs = 0
            temperature = 9.5
            "#,
        )
        .unwrap();
        settings.merge(parsed);

        let defaults = Settings::default();
        assert_eq!(settings.ocr_languages, defaults.ocr_languages);
        assert_eq!(settings.cleanup_base_url, defaults.cleanup_base_url);
        assert_eq!(settings.cleanup_timeout_secs, defaults.cleanup_timeout_secs);
        assert_eq!(settings.cleanup_temperature, defaults.cleanup_temperature);
    }

    #[test]
    fn default_settings_file_parses() {
        let parsed: Result<SettingsFile, _> = toml::from_str(DEFAULT_SETTINGS_TOML);
        assert!(parsed.is_ok());
    }
}
