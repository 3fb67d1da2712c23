//! Form events for the two panels and the view state each one ends in.

use std::str::FromStr;

use axum::extract::Multipart;
use serde::Deserialize;
use voice_client::ClientError;
use voice_core::{InlineAudio, TargetLanguage, TtsLanguage};

use crate::error::ApiError;

/// Which of the two buttons of a panel form was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Submit,
    Clear,
}

impl FromStr for PanelAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "submit" => Ok(PanelAction::Submit),
            "clear" => Ok(PanelAction::Clear),
            other => Err(ApiError::InvalidInput(format!("Unknown action: {other}"))),
        }
    }
}

/// Where a panel ended up after handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelView {
    #[default]
    Idle,
    Warning(String),
    Rendered(InlineAudio),
    ErrorShown(String),
}

impl PanelView {
    pub fn from_result(result: &Result<Vec<u8>, ClientError>) -> Self {
        match result {
            Ok(audio) => PanelView::Rendered(InlineAudio::from_bytes(audio)),
            Err(e) => PanelView::ErrorShown(e.to_string()),
        }
    }
}

/// Which tab the page opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    TextToSpeech,
    SpeechToSpeech,
}

impl Tab {
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab {
            Some("s2s") => Tab::SpeechToSpeech,
            _ => Tab::TextToSpeech,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The text-to-speech form, sent as multipart because of the file input.
#[derive(Debug, Clone)]
pub struct TtsForm {
    pub text: String,
    pub file: Option<UploadedFile>,
    pub lang: TtsLanguage,
    pub action: PanelAction,
}

impl TtsForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut text = String::new();
        let mut file = None;
        let mut lang = None;
        let mut action = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => text = field.text().await?,
                "lang" => lang = Some(field.text().await?.parse::<TtsLanguage>()?),
                "action" => action = Some(field.text().await?.parse::<PanelAction>()?),
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty, unnamed part for an untouched file input.
                    if !file_name.is_empty() || !bytes.is_empty() {
                        file = Some(UploadedFile {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            text,
            file,
            lang: lang.ok_or_else(|| ApiError::InvalidInput("Missing field: lang".into()))?,
            action: action.ok_or_else(|| ApiError::InvalidInput("Missing field: action".into()))?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct S2sFormFields {
    pub lang: String,
    pub action: String,
}

/// The speech-to-speech form. The audio itself already lives in the session.
#[derive(Debug, Clone, Copy)]
pub struct S2sForm {
    pub lang: TargetLanguage,
    pub action: PanelAction,
}

impl TryFrom<S2sFormFields> for S2sForm {
    type Error = ApiError;

    fn try_from(fields: S2sFormFields) -> Result<Self, Self::Error> {
        Ok(Self {
            lang: fields.lang.parse()?,
            action: fields.action.parse()?,
        })
    }
}
