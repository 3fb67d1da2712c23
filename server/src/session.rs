//! Per-browser-session state retained across page renders.
//!
//! Sessions are identified by a random UUID carried in a cookie. Each one
//! sits behind an async mutex that a handler holds for the whole of one
//! submission, so a session only ever sees one event at a time.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;
use voice_core::{CapturedAudio, InlineAudio, TargetLanguage, TtsLanguage};

pub const SESSION_COOKIE: &str = "voice_session";

/// Named values of one session. `None` means the key is absent, which is
/// distinct from an empty value.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub tts_text: Option<String>,
    pub tts_language: TtsLanguage,
    pub s2s_language: TargetLanguage,
    pub input_audio: Option<CapturedAudio>,
    pub output_audio: Option<InlineAudio>,
}

impl SessionState {
    pub fn tts_text(&self) -> &str {
        self.tts_text.as_deref().unwrap_or_default()
    }

    /// Replaces whatever input was held before.
    pub fn set_input_audio(&mut self, audio: CapturedAudio) {
        self.input_audio = Some(audio);
    }

    pub fn set_output_audio(&mut self, audio: InlineAudio) {
        self.output_audio = Some(audio);
    }

    /// The text box keeps its key but is emptied.
    pub fn clear_tts(&mut self) {
        self.tts_text = Some(String::new());
    }

    /// Drops the input audio (with its source tag) and the output audio.
    pub fn clear_s2s(&mut self) {
        self.input_audio = None;
        self.output_audio = None;
    }
}

struct SessionEntry {
    state: Arc<Mutex<SessionState>>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

/// A resolved session for one request.
pub struct SessionHandle {
    pub id: Uuid,
    pub is_new: bool,
    pub state: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up the session named by the request cookie, or start a new one.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        self.evict_idle();

        let existing = session_id_from_headers(headers).and_then(|id| {
            let mut entry = self.sessions.get_mut(&id)?;
            entry.last_seen = Instant::now();
            Some((id, entry.state.clone()))
        });

        match existing {
            Some((id, state)) => SessionHandle {
                id,
                is_new: false,
                state,
            },
            None => {
                let id = Uuid::new_v4();
                let state = Arc::new(Mutex::new(SessionState::default()));
                self.sessions.insert(
                    id,
                    SessionEntry {
                        state: state.clone(),
                        last_seen: Instant::now(),
                    },
                );
                tracing::debug!("New session {id}");
                SessionHandle {
                    id,
                    is_new: true,
                    state,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn evict_idle(&self) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < ttl);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!("Evicted {evicted} idle session(s)");
        }
    }
}

impl SessionHandle {
    /// Attach the session cookie when the session was created by this request.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
