//! Client for the remote speech service.
//!
//! The service exposes two multipart endpoints, one for text-to-speech and
//! one for speech-to-speech translation with voice cloning. Both answer
//! with raw audio on HTTP 200. [`SpeechService`] is the seam the web front
//! end talks to; [`RemoteClient`] is the HTTP implementation.

mod error;
mod remote;

use async_trait::async_trait;
use voice_core::{TargetLanguage, TtsLanguage};

pub use error::ClientError;
pub use remote::{ClientConfig, RemoteClient, DEFAULT_BASE_URL, SPEECH_TO_SPEECH_PATH, TTS_PATH};

/// What gets synthesized: typed text or an uploaded text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisInput {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub input: SynthesisInput,
    pub language: TtsLanguage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub audio: Vec<u8>,
    pub language: TargetLanguage,
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Text (or text file) to speech. Returns the audio body.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClientError>;

    /// Translate captured speech into `language`, keeping the speaker's voice.
    async fn translate_and_clone(&self, request: TranslationRequest)
        -> Result<Vec<u8>, ClientError>;
}
