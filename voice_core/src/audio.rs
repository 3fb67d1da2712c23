use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

/// File extensions accepted for the speech-to-speech audio upload.
pub const AUDIO_UPLOAD_EXTENSIONS: [&str; 4] = ["wav", "mp3", "m4a", "opus"];
/// File extensions accepted for the text-to-speech file upload.
pub const TEXT_UPLOAD_EXTENSIONS: [&str; 1] = ["txt"];

/// Where the current audio input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource {
    Uploaded,
    Recorded,
}

impl AudioSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioSource::Uploaded => "uploaded",
            AudioSource::Recorded => "recorded",
        }
    }

    pub fn preview_label(self) -> &'static str {
        match self {
            AudioSource::Uploaded => "🔊 Preview (uploaded):",
            AudioSource::Recorded => "🔊 Preview (recorded):",
        }
    }
}

/// The single audio input a session currently holds, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub bytes: Vec<u8>,
    pub source: AudioSource,
}

impl CapturedAudio {
    pub fn new(bytes: Vec<u8>, source: AudioSource) -> Self {
        Self { bytes, source }
    }

    pub fn to_inline(&self) -> InlineAudio {
        InlineAudio::from_bytes(&self.bytes)
    }
}

/// Audio body encoded for embedding in a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAudio {
    base64: String,
}

impl InlineAudio {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn data_uri(&self) -> String {
        format!("data:audio/wav;base64,{}", self.base64)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(&self.base64)
    }

    /// Size of the decoded audio, computed from the padded base64 length.
    pub fn len_bytes(&self) -> usize {
        let padding = self.base64.bytes().rev().take_while(|&b| b == b'=').count();
        self.base64.len() / 4 * 3 - padding
    }
}

fn has_extension(file_name: &str, allowed: &[&str]) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

pub fn is_accepted_audio_upload(file_name: &str) -> bool {
    has_extension(file_name, &AUDIO_UPLOAD_EXTENSIONS)
}

pub fn is_accepted_text_upload(file_name: &str) -> bool {
    has_extension(file_name, &TEXT_UPLOAD_EXTENSIONS)
}
