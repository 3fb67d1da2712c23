//! Text in, synthesized audio back on the page.

use axum::http::StatusCode;
use voice_server::render::TTS_OUTPUT_ID;

use crate::common::{body_string, player_audio, TestSession};
use crate::helpers::{create_e2e_app, spawn_remote};

#[tokio::test]
async fn test_complete_tts_pipeline() {
    let audio: Vec<u8> = (0..2048u32).map(|i| (i % 256) as u8).collect();
    let (url, remote) = spawn_remote(StatusCode::OK, &audio).await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let response = session.submit_tts("Mbolo", None, "ewo", "submit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/tts/");
    assert_eq!(calls[0].field("lang"), Some("ewo"));
    assert_eq!(calls[0].field("text"), Some("Mbolo"));
    assert!(calls[0].files.is_empty());

    assert_eq!(player_audio(&html, TTS_OUTPUT_ID).unwrap(), audio);
}

#[tokio::test]
async fn test_tts_file_is_forwarded_as_file_part() {
    let (url, remote) = spawn_remote(StatusCode::OK, b"RIFF").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    session
        .submit_tts("", Some(("greeting.txt", "Mbolo a bod".as_bytes())), "ksf", "submit")
        .await;

    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].field("lang"), Some("ksf"));
    assert_eq!(calls[0].field("text"), None);
    let (name, file_name, content_type, data) = &calls[0].files[0];
    assert_eq!(name, "file");
    assert_eq!(file_name, "greeting.txt");
    assert_eq!(content_type, "text/plain");
    assert_eq!(data, b"Mbolo a bod");
}

#[tokio::test]
async fn test_tts_remote_failure_is_reported() {
    let (url, remote) = spawn_remote(StatusCode::INTERNAL_SERVER_ERROR, b"model error").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let html = body_string(session.submit_tts("Mbolo", None, "bum", "submit").await).await;
    assert!(html.contains("❌ Error: 500 - model error"));
    assert!(!html.contains(TTS_OUTPUT_ID));
    // No retries unless configured
    assert_eq!(remote.calls().len(), 1);
}

#[tokio::test]
async fn test_tts_recovers_after_failure() {
    let (url, remote) = spawn_remote(StatusCode::SERVICE_UNAVAILABLE, b"loading").await;
    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let html = body_string(session.submit_tts("Mbolo", None, "ewo", "submit").await).await;
    assert!(html.contains("503"));

    remote.reply_with(StatusCode::OK, b"RIFF-ok");
    let html = body_string(session.submit_tts("Mbolo", None, "ewo", "submit").await).await;
    assert_eq!(player_audio(&html, TTS_OUTPUT_ID).unwrap(), b"RIFF-ok");
}

#[tokio::test]
async fn test_tts_unreachable_remote_is_connection_error() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let tmp = tempfile::tempdir().unwrap();
    let mut session = TestSession::new(create_e2e_app(&url, tmp.path()));

    let html = body_string(session.submit_tts("Mbolo", None, "ewo", "submit").await).await;
    assert!(html.contains("Connection error:"));
    assert!(!html.contains(TTS_OUTPUT_ID));
}
