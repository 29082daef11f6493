//! End-to-end tests against the live speech service.
//!
//! These need network access and are ignored by default.
//! Run with: cargo test --test e2e -- --ignored

use futures_util::StreamExt;

use tts_core::{Prosody, SubtitleTrack, SynthesisRequest, TtsEvent};

#[tokio::test]
#[ignore = "requires network access to the speech service"]
async fn test_fetch_voices_live() {
    let client = reqwest::Client::new();
    let voices = tts_core::fetch_voices(&client).await.unwrap();
    assert!(!voices.is_empty());
    assert!(voices.iter().any(|v| v.locale == "tr-TR"));
}

#[tokio::test]
#[ignore = "requires network access to the speech service"]
async fn test_synthesize_live() {
    let request = SynthesisRequest {
        text: "Merhaba Dünya".to_string(),
        voice: "tr-TR-AhmetNeural".to_string(),
        prosody: Prosody::default(),
    };

    let mut events = tts_core::synthesize(&request).await.unwrap();
    let mut audio = Vec::new();
    let mut track = SubtitleTrack::new();
    while let Some(event) = events.next().await {
        match event.unwrap() {
            TtsEvent::Audio(chunk) => audio.extend_from_slice(&chunk),
            boundary => track.feed(&boundary),
        }
    }

    assert!(!audio.is_empty());
    assert!(!track.is_empty());
    let srt = track.render_srt();
    assert!(srt.contains("-->"));
}
