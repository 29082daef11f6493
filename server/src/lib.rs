pub mod config;
pub mod error;
pub mod validation;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, Semaphore};
use tracing::{info, warn};

use tts_core::{Prosody, SubtitleTrack, SynthesisResult, TtsEvent, Voice};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::validation::{validate_file_stem, validate_synthesis_text, validate_voice_name};

/// Per-session context: voice catalog cache, last synthesis result and
/// the in-flight gate. One synthesis runs at a time; a second request
/// while one is running is rejected, not interleaved.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub catalog: Arc<RwLock<Option<Vec<Voice>>>>,
    pub last_result: Arc<RwLock<Option<SynthesisResult>>>,
    pub synth_gate: Arc<Semaphore>,
    pub request_count: Arc<AtomicU64>,
    pub started_at: Instant,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            catalog: Arc::new(RwLock::new(None)),
            last_result: Arc::new(RwLock::new(None)),
            synth_gate: Arc::new(Semaphore::new(1)),
            request_count: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
            config,
        }
    }

    /// Voice catalog, fetched once per session.
    pub async fn catalog_voices(&self) -> Result<Vec<Voice>, ApiError> {
        {
            let cached = self.catalog.read().await;
            if let Some(ref voices) = *cached {
                return Ok(voices.clone());
            }
        }

        let voices = tts_core::fetch_voices(&self.http).await?;
        info!("voice catalog loaded: {} voices", voices.len());

        let mut cached = self.catalog.write().await;
        // keep whichever fetch won if two raced here
        if cached.is_none() {
            *cached = Some(voices.clone());
        }
        Ok(voices)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/voices", get(list_voices))
        .route("/synthesize", post(synthesize_endpoint))
        .route("/save", post(save_endpoint))
        .route("/audio", get(download_audio))
        .route("/subtitles", get(download_subtitles))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
}

pub async fn health_check() -> &'static str {
    "ok"
}

async fn index_page() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

#[derive(Serialize)]
pub struct VoiceInfo {
    short_name: String,
    locale: String,
    gender: String,
    friendly_name: Option<String>,
}

impl From<Voice> for VoiceInfo {
    fn from(voice: Voice) -> Self {
        Self {
            short_name: voice.short_name,
            locale: voice.locale,
            gender: voice.gender,
            friendly_name: voice.friendly_name,
        }
    }
}

#[derive(Deserialize)]
pub struct VoicesQuery {
    /// Comma-separated locales to rank first, e.g. `tr-TR,en-US`.
    locales: Option<String>,
}

pub async fn list_voices(
    State(state): State<AppState>,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<Vec<VoiceInfo>>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let voices = state.catalog_voices().await?;
    let preferred = match query.locales {
        Some(ref raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => state.config.preferred_locales.clone(),
    };

    let ranked = tts_core::rank_voices(&voices, &preferred);
    Ok(Json(ranked.into_iter().map(VoiceInfo::from).collect()))
}

#[derive(Deserialize)]
pub struct SynthesizeRequest {
    text: String,
    voice: Option<String>,
    rate_pct: Option<i32>,
    volume_pct: Option<i32>,
    pitch_hz: Option<i32>,
}

#[derive(Serialize)]
pub struct SynthesizeResponse {
    audio_base64: String,
    subtitles: String,
    audio_bytes: usize,
    cue_count: usize,
}

pub async fn synthesize_endpoint(
    State(state): State<AppState>,
    Json(req): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    validate_synthesis_text(&req.text)?;
    if let Some(ref voice) = req.voice {
        validate_voice_name(voice)?;
    }

    let _permit = state.synth_gate.try_acquire().map_err(|_| ApiError::Busy)?;

    let request = tts_core::SynthesisRequest {
        text: req.text,
        voice: req
            .voice
            .unwrap_or_else(|| state.config.default_voice.clone()),
        prosody: Prosody {
            rate_pct: req.rate_pct.unwrap_or(0),
            volume_pct: req.volume_pct.unwrap_or(0),
            pitch_hz: req.pitch_hz.unwrap_or(0),
        },
    };

    let started = Instant::now();
    let outcome = tokio::time::timeout(state.config.synth_timeout(), drain_stream(&request)).await;
    let (audio, track) = match outcome {
        Ok(result) => result?,
        Err(_) => {
            warn!(
                "synthesis timed out after {} seconds",
                state.config.synth_timeout_secs
            );
            return Err(ApiError::Timeout(state.config.synth_timeout_secs));
        }
    };
    info!(
        "synthesized {} bytes, {} cues in {:.2}s",
        audio.len(),
        track.len(),
        started.elapsed().as_secs_f64()
    );

    let subtitles = track.render_srt();
    let response = SynthesizeResponse {
        audio_base64: base64::engine::general_purpose::STANDARD.encode(&audio),
        subtitles: subtitles.clone(),
        audio_bytes: audio.len(),
        cue_count: track.len(),
    };

    *state.last_result.write().await = Some(SynthesisResult { audio, subtitles });

    Ok(Json(response))
}

/// Drain one synthesis stream in arrival order. Any stream error
/// surfaces here and the partial audio collected so far is dropped.
async fn drain_stream(
    request: &tts_core::SynthesisRequest,
) -> Result<(Vec<u8>, SubtitleTrack), ApiError> {
    let mut events = tts_core::synthesize(request).await?;
    let mut audio = Vec::new();
    let mut track = SubtitleTrack::new();
    while let Some(event) = events.next().await {
        match event? {
            TtsEvent::Audio(chunk) => audio.extend_from_slice(&chunk),
            boundary => track.feed(&boundary),
        }
    }
    Ok((audio, track))
}

#[derive(Deserialize)]
pub struct SaveRequest {
    directory: Option<String>,
    file_stem: Option<String>,
}

#[derive(Serialize)]
pub struct SaveResponse {
    audio_path: String,
    subtitle_path: Option<String>,
}

pub async fn save_endpoint(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let stem = req.file_stem.unwrap_or_else(|| "noname".to_string());
    validate_file_stem(&stem)?;
    let dir = req
        .directory
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| state.config.output_dir.clone());

    let result = state
        .last_result
        .read()
        .await
        .clone()
        .ok_or(ApiError::NothingSynthesized)?;

    let saved = tts_core::save_result(&dir, &stem, &result.audio, &result.subtitles)
        .await
        .map_err(ApiError::Filesystem)?;
    info!("saved {}", saved.audio.display());

    Ok(Json(SaveResponse {
        audio_path: saved.audio.display().to_string(),
        subtitle_path: saved.subtitles.map(|p| p.display().to_string()),
    }))
}

pub async fn download_audio(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .last_result
        .read()
        .await
        .clone()
        .ok_or(ApiError::NothingSynthesized)?;
    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"speech.mp3\"",
            ),
        ],
        result.audio,
    ))
}

pub async fn download_subtitles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .last_result
        .read()
        .await
        .clone()
        .ok_or(ApiError::NothingSynthesized)?;
    // An empty body is the "no subtitles available" outcome, not an error.
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"speech.srt\"",
            ),
        ],
        result.subtitles,
    ))
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub cpu_usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_usage_percent: f32,
    pub request_count: u64,
    pub uptime_seconds: u64,
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<MetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_cpu();
    system.refresh_memory();

    let cpu_usage = system.global_cpu_info().cpu_usage();
    let memory_used = system.used_memory();
    let memory_total = system.total_memory();
    let memory_usage_percent = if memory_total > 0 {
        (memory_used as f64 / memory_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    Json(MetricsResponse {
        cpu_usage_percent: cpu_usage,
        memory_used_mb: memory_used / 1024 / 1024,
        memory_total_mb: memory_total / 1024 / 1024,
        memory_usage_percent,
        request_count: state.request_count.load(Ordering::Relaxed),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
