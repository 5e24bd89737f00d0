use axum::extract::Multipart;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::ocr::{self, ExtractTextInput};
use crate::parse::{self, AadhaarRecord};

use super::state::ServerState;

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::internal(err.to_string())
    }
}

#[derive(Debug, Default)]
pub(crate) struct ExtractForm {
    pub(crate) front: Option<Vec<u8>>,
    pub(crate) back: Option<Vec<u8>>,
    pub(crate) langs: Option<String>,
}

pub(crate) async fn read_extract_form(mut multipart: Multipart) -> Result<ExtractForm, ServerError> {
    let mut form = ExtractForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::bad_request(format!("failed to read upload: {}", err)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "front" => {
                let bytes = field.bytes().await.map_err(|err| {
                    ServerError::bad_request(format!("failed to read front image: {}", err))
                })?;
                form.front = Some(bytes.to_vec());
            }
            "back" => {
                let bytes = field.bytes().await.map_err(|err| {
                    ServerError::bad_request(format!("failed to read back image: {}", err))
                })?;
                form.back = Some(bytes.to_vec());
            }
            "langs" => {
                let value = field.text().await.map_err(|err| {
                    ServerError::bad_request(format!("failed to read langs field: {}", err))
                })?;
                form.langs = Some(value);
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Per-request pipeline: OCR the front (mandatory) and back (optional),
/// clean both texts, mine the structured record. A missing back side skips
/// its OCR and cleanup stages entirely and contributes empty text.
pub(crate) async fn extract_request(
    state: Arc<ServerState>,
    form: ExtractForm,
) -> Result<AadhaarRecord, ServerError> {
    let Some(front) = form.front else {
        return Err(ServerError::bad_request("Front image is required"));
    };
    let langs = form
        .langs
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.settings.ocr_languages.clone());

    let front_text = recognize(state.clone(), front, langs.clone()).await?;
    let back_text = match form.back {
        Some(back) => Some(recognize(state.clone(), back, langs).await?),
        None => None,
    };

    let cleaned_front = state.cleanup.cleanup(&front_text).await;
    let cleaned_back = match back_text.as_deref() {
        Some(text) => state.cleanup.cleanup(text).await,
        None => String::new(),
    };

    Ok(parse::parse_aadhaar(&cleaned_front, &cleaned_back))
}

async fn recognize(
    state: Arc<ServerState>,
    image: Vec<u8>,
    langs: String,
) -> Result<String, ServerError> {
    let text = tokio::task::spawn_blocking(move || {
        ocr::extract_text(
            &state.engine,
            ExtractTextInput {
                image: &image,
                langs: Some(&langs),
            },
        )
    })
    .await
    .map_err(|err| ServerError::internal(format!("ocr task failed: {}", err)))??;
    Ok(text)
}
