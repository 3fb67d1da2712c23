use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{BytesRejection, FormRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use voice_core::{wav, AudioSource, CapturedAudio, TargetLanguage, TtsLanguage};

use crate::error::ApiError;
use crate::metrics::{DetailedMetricsResponse, RemoteMetricsResponse, SystemMetrics};
use crate::panel::{PanelAction, PanelView, S2sForm, S2sFormFields, Tab, TtsForm};
use crate::render;
use crate::validation::{
    validate_audio_upload, validate_recording, validate_s2s_submission, validate_tts_submission,
};
use crate::AppState;

/// Recorder default, matching the in-page capture rate.
const DEFAULT_RECORDING_RATE: u32 = 16_000;

#[derive(Deserialize)]
pub struct IndexParams {
    tab: Option<String>,
}

#[derive(Deserialize)]
pub struct RecordParams {
    sample_rate: Option<u32>,
}

#[derive(Serialize)]
pub struct LanguagesResponse {
    tts: Vec<TtsLanguage>,
    s2s: Vec<TargetLanguage>,
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<IndexParams>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let handle = state.sessions.resolve(&headers);
    let session = handle.state.lock().await;
    let page = render::page(
        &session,
        &PanelView::Idle,
        &PanelView::Idle,
        Tab::from_query(params.tab.as_deref()),
    );
    handle.respond(Html(page))
}

pub async fn tts_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let form = TtsForm::from_multipart(multipart?).await?;

    let handle = state.sessions.resolve(&headers);
    let mut session = handle.state.lock().await;
    session.tts_language = form.lang;

    if form.action == PanelAction::Clear {
        session.clear_tts();
        return Ok(handle.respond(Redirect::to("/")));
    }

    session.tts_text = Some(form.text.clone());
    let view = match validate_tts_submission(&form.text, form.file, form.lang) {
        Err(warning) => {
            warn!("TTS submission not attempted: {warning}");
            PanelView::Warning(warning.to_string())
        }
        Ok(request) => {
            info!("TTS submission: lang={}", form.lang.code());
            let started = Instant::now();
            let result = state.speech.synthesize(request).await;
            state.metrics.tts.record(started.elapsed(), result.is_ok());
            PanelView::from_result(&result)
        }
    };

    let page = render::page(&session, &view, &PanelView::Idle, Tab::TextToSpeech);
    Ok(handle.respond(Html(page)))
}

pub async fn s2s_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("audio") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            upload = Some((file_name, bytes));
        }
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::InvalidInput("Missing field: audio".into()))?;
    validate_audio_upload(&file_name, &bytes)?;

    let handle = state.sessions.resolve(&headers);
    let mut session = handle.state.lock().await;
    info!("Audio uploaded: {} bytes", bytes.len());
    session.set_input_audio(CapturedAudio::new(bytes.to_vec(), AudioSource::Uploaded));

    Ok(handle.respond(Redirect::to("/?tab=s2s")))
}

pub async fn s2s_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<RecordParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let Query(params) = params?;
    let body = body?;
    let sample_rate = params.sample_rate.unwrap_or(DEFAULT_RECORDING_RATE);
    validate_recording(sample_rate, &body)?;

    let samples = wav::samples_from_le_bytes(&body)
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let wav_bytes = wav::encode_wav(&samples, sample_rate)?;

    let handle = state.sessions.resolve(&headers);
    let mut session = handle.state.lock().await;
    info!(
        "Audio recorded: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );
    session.set_input_audio(CapturedAudio::new(wav_bytes, AudioSource::Recorded));

    Ok(handle.respond(StatusCode::NO_CONTENT))
}

pub async fn s2s_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    fields: Result<Form<S2sFormFields>, FormRejection>,
) -> Result<Response, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let Form(fields) = fields?;
    let form = S2sForm::try_from(fields)?;

    let handle = state.sessions.resolve(&headers);
    let mut session = handle.state.lock().await;
    session.s2s_language = form.lang;

    if form.action == PanelAction::Clear {
        session.clear_s2s();
        return Ok(handle.respond(Redirect::to("/?tab=s2s")));
    }

    let view = match validate_s2s_submission(session.input_audio.as_ref(), form.lang) {
        Err(warning) => {
            warn!("Speech-to-speech submission not attempted: {warning}");
            PanelView::Warning(warning.to_string())
        }
        Ok(request) => {
            info!("Speech-to-speech submission: lang={}", form.lang.code());
            let started = Instant::now();
            let result = state.speech.translate_and_clone(request).await;
            state.metrics.s2s.record(started.elapsed(), result.is_ok());
            let view = PanelView::from_result(&result);
            if let PanelView::Rendered(audio) = &view {
                session.set_output_audio(audio.clone());
            }
            view
        }
    };

    let page = render::page(&session, &PanelView::Idle, &view, Tab::SpeechToSpeech);
    Ok(handle.respond(Html(page)))
}

pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        tts: TtsLanguage::ALL.to_vec(),
        s2s: TargetLanguage::ALL.to_vec(),
    })
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<DetailedMetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_cpu();
    system.refresh_memory();

    // Get CPU usage (average across all cores)
    let cpu_usage = system.global_cpu_info().cpu_usage();

    let memory_used = system.used_memory();
    let memory_total = system.total_memory();
    let memory_usage_percent = if memory_total > 0 {
        (memory_used as f64 / memory_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    // Get system load (Unix-like systems only)
    let system_load = {
        #[cfg(unix)]
        {
            std::fs::read_to_string("/proc/loadavg")
                .ok()
                .and_then(|loadavg| loadavg.split_whitespace().next()?.parse::<f64>().ok())
        }
        #[cfg(not(unix))]
        None
    };

    Json(DetailedMetricsResponse {
        timestamp: chrono::Utc::now(),
        system: SystemMetrics {
            cpu_usage_percent: cpu_usage,
            memory_used_mb: memory_used / 1024 / 1024, // Convert bytes to MB
            memory_total_mb: memory_total / 1024 / 1024,
            memory_usage_percent,
            request_count: state.request_count.load(Ordering::Relaxed),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            system_load,
        },
        active_sessions: state.sessions.len(),
        remote: RemoteMetricsResponse {
            tts: state.metrics.tts.stats(),
            speech_to_speech: state.metrics.s2s.stats(),
        },
    })
}
