//! Common utilities for integration tests

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::Deserialize;

use server::config::ServerConfig;
use server::error::ApiError;
use server::validation::{validate_synthesis_text, validate_voice_name};
use server::AppState;
use tts_core::{SubtitleTrack, SynthesisResult, TtsEvent, Voice};

pub fn test_voice(short_name: &str, locale: &str, gender: &str) -> Voice {
    Voice {
        name: format!("Microsoft Server Speech Text to Speech Voice ({short_name})"),
        short_name: short_name.to_string(),
        gender: gender.to_string(),
        locale: locale.to_string(),
        friendly_name: None,
        suggested_codec: None,
        status: None,
    }
}

pub fn test_voices() -> Vec<Voice> {
    vec![
        test_voice("de-DE-KatjaNeural", "de-DE", "Female"),
        test_voice("en-US-GuyNeural", "en-US", "Male"),
        test_voice("tr-TR-AhmetNeural", "tr-TR", "Male"),
        test_voice("tr-TR-EmelNeural", "tr-TR", "Female"),
    ]
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        output_dir: std::env::temp_dir().join("pars-tests"),
        ..ServerConfig::default()
    }
}

/// Test state with a pre-seeded voice catalog so no network is needed.
pub async fn create_test_state() -> AppState {
    let state = AppState::new(test_config());
    *state.catalog.write().await = Some(test_voices());
    state
}

#[derive(Deserialize)]
struct MockSynthesizeRequest {
    text: String,
    voice: Option<String>,
}

/// Stand-in for the synthesize handler: same validation and session
/// bookkeeping, canned events instead of a network stream.
async fn mock_synthesize(
    State(state): State<AppState>,
    Json(req): Json<MockSynthesizeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_synthesis_text(&req.text)?;
    if let Some(ref voice) = req.voice {
        validate_voice_name(voice)?;
    }

    let mut track = SubtitleTrack::new();
    for (i, word) in req.text.split_whitespace().enumerate() {
        track.feed(&TtsEvent::WordBoundary {
            offset_ticks: i as u64 * 5_000_000,
            duration_ticks: 4_000_000,
            text: word.to_string(),
        });
    }

    let audio = vec![0xffu8, 0xf3, 0x40, 0x00, 0x12, 0x34];
    let subtitles = track.render_srt();
    *state.last_result.write().await = Some(SynthesisResult {
        audio: audio.clone(),
        subtitles: subtitles.clone(),
    });

    Ok(Json(serde_json::json!({
        "audio_base64": base64::engine::general_purpose::STANDARD.encode(&audio),
        "subtitles": subtitles,
        "audio_bytes": audio.len(),
        "cue_count": track.len(),
    })))
}

/// Create a test app instance
pub async fn create_test_app() -> Router {
    let state = create_test_state().await;
    create_test_app_with_state(state)
}

pub fn create_test_app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(server::health_check))
        .route("/voices", get(server::list_voices))
        .route("/synthesize", post(mock_synthesize))
        .route("/save", post(server::save_endpoint))
        .route("/audio", get(server::download_audio))
        .route("/subtitles", get(server::download_subtitles))
        .route("/metrics", get(server::metrics_endpoint))
        .with_state(state)
}
