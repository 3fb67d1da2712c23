use std::{io::Write, path::PathBuf, time::Duration, time::Instant};

use async_trait::async_trait;
use rand::Rng;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use tracing::{debug, info, warn};

use crate::{ClientError, SpeechService, SynthesisInput, SynthesisRequest, TranslationRequest};

pub const DEFAULT_BASE_URL: &str = "https://olamemend-african-voice.hf.space";
pub const TTS_PATH: &str = "/tts/";
pub const SPEECH_TO_SPEECH_PATH: &str = "/speech-to-speech/";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` keeps reqwest's default (no overall timeout).
    pub timeout: Option<Duration>,
    /// Extra attempts after the first one. Zero means a single attempt.
    pub max_retries: u32,
    pub retry_backoff: Duration,
    /// Directory for the scoped audio upload file; system temp dir if unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
            temp_dir: None,
        }
    }
}

pub struct RemoteClient {
    http: Client,
    config: ClientConfig,
}

impl RemoteClient {
    pub fn new(mut config: ClientConfig) -> Result<Self, ClientError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!("Remote speech client: endpoint {}", config.base_url);
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// POST a freshly built form, retrying per the configured policy.
    async fn post_form<F>(&self, path: &str, build: F) -> Result<Vec<u8>, ClientError>
    where
        F: Fn() -> Result<Form, ClientError>,
    {
        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt = 0u32;
        loop {
            let started = Instant::now();
            let outcome = self.send_once(&url, build()?).await;
            match &outcome {
                Ok(body) => info!(
                    "POST {} -> 200, {} bytes in {:.2}s",
                    path,
                    body.len(),
                    started.elapsed().as_secs_f64()
                ),
                Err(e) => warn!(
                    "POST {} failed after {:.2}s: {}",
                    path,
                    started.elapsed().as_secs_f64(),
                    e
                ),
            }

            match outcome {
                Err(e) if attempt < self.config.max_retries && e.is_retryable() => {
                    let delay = self.backoff(attempt);
                    attempt += 1;
                    warn!(
                        "Retrying POST {} (attempt {} of {}) in {}ms",
                        path,
                        attempt + 1,
                        self.config.max_retries + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn send_once(&self, url: &str, form: Form) -> Result<Vec<u8>, ClientError> {
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            let body = response.bytes().await?;
            Ok(body.to_vec())
        } else {
            // A body cut short is a transport failure, not an empty message.
            let body = response.text().await?;
            Err(ClientError::Remote {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Exponential backoff with up to 50% random jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.config.retry_backoff.as_millis() as u64;
        let exp = base.saturating_mul(1u64 << attempt.min(10));
        let jitter = rand::thread_rng().gen_range(0..=exp / 2);
        Duration::from_millis(exp + jitter)
    }

    fn temp_audio_file(&self, audio: &[u8]) -> Result<tempfile::NamedTempFile, ClientError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("source_audio_").suffix(".wav");
        let mut temp = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        temp.write_all(audio)?;
        temp.flush()?;
        Ok(temp)
    }
}

#[async_trait]
impl SpeechService for RemoteClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClientError> {
        let lang = request.language.code();
        match &request.input {
            SynthesisInput::Text(text) => debug!("TTS request: lang={lang}, {} chars", text.chars().count()),
            SynthesisInput::File { bytes, .. } => debug!("TTS request: lang={lang}, file of {} bytes", bytes.len()),
        }

        self.post_form(TTS_PATH, || {
            let form = Form::new().text("lang", lang);
            Ok(match &request.input {
                SynthesisInput::Text(text) => form.text("text", text.clone()),
                SynthesisInput::File { file_name, bytes } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str("text/plain")?;
                    form.part("file", part)
                }
            })
        })
        .await
    }

    async fn translate_and_clone(
        &self,
        request: TranslationRequest,
    ) -> Result<Vec<u8>, ClientError> {
        let lang = request.language.code();
        debug!("S2ST request: lang={lang}, {} bytes of audio", request.audio.len());

        // Removed from disk when `temp` drops, whatever the outcome. The file
        // only supplies the upload's name and scope; its content is
        // `request.audio`, so the part is built from memory.
        let temp = self.temp_audio_file(&request.audio)?;
        let file_name = temp
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("source_audio.wav")
            .to_string();

        self.post_form(SPEECH_TO_SPEECH_PATH, || {
            let part = Part::bytes(request.audio.clone())
                .file_name(file_name.clone())
                .mime_str("audio/wav")?;
            Ok(Form::new().text("lang", lang).part("source_audio", part))
        })
        .await
    }
}
