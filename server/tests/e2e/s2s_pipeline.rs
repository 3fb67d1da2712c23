//! Captured audio in, translated and voice-cloned audio back.

use axum::http::StatusCode;
use voice_server::render::{S2S_OUTPUT_ID, S2S_PREVIEW_ID};

use crate::common::{body_string, player_audio, TestSession};
use crate::helpers::{create_e2e_app, dir_is_empty, spawn_remote};

#[tokio::test]
async fn test_complete_s2s_pipeline_with_upload() {
    let (url, remote) = spawn_remote(StatusCode::OK, b"RIFF-cloned").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let response = session.upload_audio("question.wav", b"RIFF-question").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = session.submit_s2s("es", "submit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/speech-to-speech/");
    assert_eq!(calls[0].field("lang"), Some("es"));
    let (name, file_name, content_type, data) = &calls[0].files[0];
    assert_eq!(name, "source_audio");
    assert!(file_name.starts_with("source_audio_"));
    assert!(file_name.ends_with(".wav"));
    assert_eq!(content_type, "audio/wav");
    assert_eq!(data, b"RIFF-question");

    assert_eq!(player_audio(&html, S2S_OUTPUT_ID).unwrap(), b"RIFF-cloned");
    assert!(dir_is_empty(tmp.path()), "temp upload file must be removed");

    // The result stays with the session
    let (_, html) = session.get_page("/?tab=s2s").await;
    assert_eq!(player_audio(&html, S2S_OUTPUT_ID).unwrap(), b"RIFF-cloned");
    assert_eq!(player_audio(&html, S2S_PREVIEW_ID).unwrap(), b"RIFF-question");
}

#[tokio::test]
async fn test_complete_s2s_pipeline_with_recording() {
    let (url, remote) = spawn_remote(StatusCode::OK, b"RIFF-cloned").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let samples: Vec<f32> = (0..1600).map(|i| (i as f32 / 40.0).sin() * 0.5).collect();
    let response = session.record_audio(16_000, &samples).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    session.submit_s2s("fr", "submit").await;

    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    let sent = &calls[0].files[0].3;
    assert_eq!(&sent[0..4], b"RIFF");
    assert_eq!(&sent[8..12], b"WAVE");
    assert!(dir_is_empty(tmp.path()));
}

#[tokio::test]
async fn test_s2s_failure_keeps_earlier_output_for_later_renders() {
    let (url, remote) = spawn_remote(StatusCode::OK, b"RIFF-first").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    session.upload_audio("clip.opus", b"OggS-clip").await;
    session.submit_s2s("en", "submit").await;

    remote.reply_with(StatusCode::UNPROCESSABLE_ENTITY, b"bad audio");
    let html = body_string(session.submit_s2s("en", "submit").await).await;
    assert!(html.contains("❌ Error: 422 - bad audio"));
    assert!(!html.contains(S2S_OUTPUT_ID));
    assert!(dir_is_empty(tmp.path()), "temp upload file must be removed on error");

    let (_, html) = session.get_page("/?tab=s2s").await;
    assert_eq!(player_audio(&html, S2S_OUTPUT_ID).unwrap(), b"RIFF-first");
}

#[tokio::test]
async fn test_s2s_clear_resets_panel() {
    let (url, remote) = spawn_remote(StatusCode::OK, b"RIFF-out").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    session.upload_audio("clip.m4a", b"m4a-bytes").await;
    session.submit_s2s("de", "submit").await;

    let response = session.submit_s2s("de", "clear").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, html) = session.get_page("/?tab=s2s").await;
    assert!(!html.contains(S2S_PREVIEW_ID));
    assert!(!html.contains(S2S_OUTPUT_ID));

    let html = body_string(session.submit_s2s("de", "submit").await).await;
    assert!(html.contains("Please upload or record audio first."));
    assert_eq!(remote.calls().len(), 1);
}
