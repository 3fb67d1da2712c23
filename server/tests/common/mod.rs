//! Common utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use tower::ServiceExt;
use voice_client::{ClientError, SpeechService, SynthesisRequest, TranslationRequest};
use voice_server::{build_router, config::ServerConfig, AppState};

/// What the fake remote answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Audio(Vec<u8>),
    Remote(u16, String),
    Transport(String),
}

impl Reply {
    fn to_result(&self) -> Result<Vec<u8>, ClientError> {
        match self {
            Reply::Audio(bytes) => Ok(bytes.clone()),
            Reply::Remote(status, body) => Err(ClientError::Remote {
                status: *status,
                body: body.clone(),
            }),
            Reply::Transport(msg) => Err(ClientError::Transport(msg.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Call {
    Synthesize(SynthesisRequest),
    Translate(TranslationRequest),
}

/// Stands in for the remote service and records every call made to it.
pub struct FakeSpeech {
    calls: Mutex<Vec<Call>>,
    tts_reply: Mutex<Reply>,
    s2s_reply: Mutex<Reply>,
}

impl FakeSpeech {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            tts_reply: Mutex::new(Reply::Audio(b"RIFF-tts".to_vec())),
            s2s_reply: Mutex::new(Reply::Audio(b"RIFF-s2s".to_vec())),
        })
    }

    pub fn reply_tts(&self, reply: Reply) {
        *self.tts_reply.lock().unwrap() = reply;
    }

    pub fn reply_s2s(&self, reply: Reply) {
        *self.s2s_reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechService for FakeSpeech {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClientError> {
        self.calls.lock().unwrap().push(Call::Synthesize(request));
        self.tts_reply.lock().unwrap().to_result()
    }

    async fn translate_and_clone(
        &self,
        request: TranslationRequest,
    ) -> Result<Vec<u8>, ClientError> {
        self.calls.lock().unwrap().push(Call::Translate(request));
        self.s2s_reply.lock().unwrap().to_result()
    }
}

/// Create a test app instance around a fake speech service
pub fn create_test_app(speech: Arc<FakeSpeech>) -> Router {
    build_router(AppState::new(speech, ServerConfig::default()))
}

/// multipart/form-data body builder
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("----voicetest{}", uuid::Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// A browser session: carries the session cookie between requests.
pub struct TestSession {
    app: Router,
    pub cookie: Option<String>,
}

impl TestSession {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }
        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    pub async fn get_page(&mut self, uri: &str) -> (StatusCode, String) {
        let response = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, body_string(response).await)
    }

    pub async fn submit_tts(
        &mut self,
        text: &str,
        file: Option<(&str, &[u8])>,
        lang: &str,
        action: &str,
    ) -> Response {
        let mut form = MultipartBody::new().text("text", text);
        form = match file {
            Some((file_name, data)) => form.file("file", file_name, "text/plain", data),
            // What a browser sends for an untouched file input
            None => form.file("file", "", "application/octet-stream", b""),
        };
        let (content_type, body) = form.text("lang", lang).text("action", action).finish();
        self.send(
            Request::builder()
                .method("POST")
                .uri("/tts")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn upload_audio(&mut self, file_name: &str, data: &[u8]) -> Response {
        let (content_type, body) = MultipartBody::new()
            .file("audio", file_name, "audio/wav", data)
            .finish();
        self.send(
            Request::builder()
                .method("POST")
                .uri("/s2s/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn record_audio(&mut self, sample_rate: u32, samples: &[f32]) -> Response {
        let body: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.send(
            Request::builder()
                .method("POST")
                .uri(format!("/s2s/record?sample_rate={sample_rate}"))
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn submit_s2s(&mut self, lang: &str, action: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/s2s")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("lang={lang}&action={action}")))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_string(response: Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Decode the audio embedded in the player with the given element id.
pub fn player_audio(html: &str, player_id: &str) -> Option<Vec<u8>> {
    const PREFIX: &str = "data:audio/wav;base64,";
    let player = html.find(&format!("id=\"{player_id}\""))?;
    let start = player + html[player..].find(PREFIX)? + PREFIX.len();
    let end = start + html[start..].find('"')?;
    general_purpose::STANDARD.decode(&html[start..end]).ok()
}
