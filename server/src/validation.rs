use thiserror::Error;
use voice_client::{SynthesisInput, SynthesisRequest, TranslationRequest};
use voice_core::{
    is_accepted_audio_upload, is_accepted_text_upload, CapturedAudio, TargetLanguage, TtsLanguage,
};

use crate::error::ApiError;
use crate::panel::UploadedFile;

/// Maximum text length for TTS requests
pub const MAX_TEXT_LENGTH: usize = 5000;
/// Recorder sample rate bounds (Hz)
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 48_000;

pub const NO_TTS_INPUT: &str = "Enter text or upload a file.";
pub const NO_AUDIO_INPUT: &str = "❗ Please upload or record audio first.";

/// A submission that is not attempted. Shown to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationWarning(pub String);

/// Build the TTS request from the form, or say why not.
///
/// An attached file wins over typed text; the text is then not sent.
pub fn validate_tts_submission(
    text: &str,
    file: Option<UploadedFile>,
    language: TtsLanguage,
) -> Result<SynthesisRequest, ValidationWarning> {
    let input = match file {
        Some(file) => {
            if !is_accepted_text_upload(&file.file_name) {
                return Err(ValidationWarning(format!(
                    "Unsupported file type: {}. Upload a .txt file.",
                    file.file_name
                )));
            }
            SynthesisInput::File {
                file_name: file.file_name,
                bytes: file.bytes,
            }
        }
        None if text.is_empty() => return Err(ValidationWarning(NO_TTS_INPUT.to_string())),
        None => {
            if text.chars().count() > MAX_TEXT_LENGTH {
                return Err(ValidationWarning(format!(
                    "Text too long (max {} characters)",
                    MAX_TEXT_LENGTH
                )));
            }
            SynthesisInput::Text(text.to_string())
        }
    };

    Ok(SynthesisRequest { input, language })
}

/// The speech-to-speech submission needs audio already captured.
pub fn validate_s2s_submission(
    input_audio: Option<&CapturedAudio>,
    language: TargetLanguage,
) -> Result<TranslationRequest, ValidationWarning> {
    let audio = input_audio.ok_or_else(|| ValidationWarning(NO_AUDIO_INPUT.to_string()))?;
    Ok(TranslationRequest {
        audio: audio.bytes.clone(),
        language,
    })
}

pub fn validate_audio_upload(file_name: &str, bytes: &[u8]) -> Result<(), ApiError> {
    if !is_accepted_audio_upload(file_name) {
        return Err(ApiError::InvalidInput(format!(
            "Unsupported audio file: {file_name}. Expected wav, mp3, m4a or opus"
        )));
    }
    if bytes.is_empty() {
        return Err(ApiError::InvalidInput("Audio file is empty".to_string()));
    }
    Ok(())
}

pub fn validate_recording(sample_rate: u32, body: &[u8]) -> Result<(), ApiError> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(ApiError::InvalidInput(format!(
            "Sample rate {sample_rate} out of range ({MIN_SAMPLE_RATE}-{MAX_SAMPLE_RATE} Hz)"
        )));
    }
    if body.is_empty() {
        return Err(ApiError::InvalidInput("Recording is empty".to_string()));
    }
    if body.len() % 4 != 0 {
        return Err(ApiError::InvalidInput(
            "Recording is not a whole number of f32 samples".to_string(),
        ));
    }
    Ok(())
}
