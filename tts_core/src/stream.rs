//! Streaming synthesis over the Read Aloud websocket.
//!
//! One request opens one connection. The service answers with a mix of
//! binary frames carrying MP3 audio and text frames carrying JSON
//! metadata; `synthesize` turns that into a lazy stream of [`TtsEvent`]s
//! that ends at `turn.end`. Dropping the stream closes the connection.

use std::pin::Pin;

use chrono::Utc;
use futures_core::Stream;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use crate::constants;
use crate::error::SpeechError;
use crate::params::Prosody;

/// Everything needed for one synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Voice short name, e.g. `tr-TR-AhmetNeural`.
    pub voice: String,
    pub prosody: Prosody,
}

/// One event from the synthesis stream, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsEvent {
    /// A chunk of the MP3 payload.
    Audio(Vec<u8>),
    /// Timing marker for one spoken word. Offsets and durations are in
    /// 100-nanosecond ticks.
    WordBoundary {
        offset_ticks: u64,
        duration_ticks: u64,
        text: String,
    },
}

/// Completed synthesis: concatenated audio plus rendered subtitles.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub subtitles: String,
}

pub type EventStream = Pin<Box<dyn Stream<Item = Result<TtsEvent, SpeechError>> + Send>>;

/// Open a connection and stream synthesis events for `request`.
///
/// The stream is finite and non-restartable; the caller must drain it
/// fully for the synthesis to be complete. Any transport or protocol
/// error ends the stream with that error.
pub async fn synthesize(request: &SynthesisRequest) -> Result<EventStream, SpeechError> {
    let connection_id = Uuid::new_v4().simple().to_string();
    let url = format!("{}&ConnectionId={}", constants::SYNTH_URL, connection_id);

    let mut ws_request = url.into_client_request().map_err(SpeechError::Connect)?;
    let headers = ws_request.headers_mut();
    headers.insert("Pragma", HeaderValue::from_static("no-cache"));
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Origin", HeaderValue::from_static(constants::ORIGIN));
    headers.insert("User-Agent", HeaderValue::from_static(constants::USER_AGENT));

    let (mut ws, _) = connect_async(ws_request)
        .await
        .map_err(SpeechError::Connect)?;

    let timestamp = request_timestamp();
    ws.send(Message::Text(speech_config_message(&timestamp)))
        .await?;
    let request_id = Uuid::new_v4().simple().to_string();
    ws.send(Message::Text(ssml_message(&request_id, &timestamp, request)))
        .await?;
    tracing::debug!(%request_id, voice = %request.voice, "synthesis request sent");

    let stream = async_stream::try_stream! {
        loop {
            let message = match ws.next().await {
                Some(message) => message.map_err(SpeechError::Transport)?,
                None => Err(SpeechError::ServiceClosed)?,
            };
            match message {
                Message::Text(text) => match parse_text_frame(&text)? {
                    TextFrame::Metadata(events) => {
                        for event in events {
                            yield event;
                        }
                    }
                    TextFrame::TurnEnd => break,
                    TextFrame::Other => {}
                },
                Message::Binary(payload) => {
                    if let Some(audio) = parse_binary_frame(&payload)? {
                        if !audio.is_empty() {
                            yield TtsEvent::Audio(audio);
                        }
                    }
                }
                Message::Close(_) => Err(SpeechError::ServiceClosed)?,
                _ => {}
            }
        }
        let _ = ws.close(None).await;
    };

    Ok(Box::pin(stream))
}

fn request_timestamp() -> String {
    Utc::now()
        .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
        .to_string()
}

fn speech_config_message(timestamp: &str) -> String {
    let config = serde_json::json!({
        "context": {
            "synthesis": {
                "audio": {
                    "metadataoptions": {
                        "sentenceBoundaryEnabled": "false",
                        "wordBoundaryEnabled": "true"
                    },
                    "outputFormat": constants::OUTPUT_FORMAT
                }
            }
        }
    });
    format!(
        "X-Timestamp:{timestamp}\r\nContent-Type:application/json; charset=utf-8\r\nPath:speech.config\r\n\r\n{config}"
    )
}

fn ssml_message(request_id: &str, timestamp: &str, request: &SynthesisRequest) -> String {
    let ssml = build_ssml(request);
    format!(
        "X-RequestId:{request_id}\r\nContent-Type:application/ssml+xml\r\nX-Timestamp:{timestamp}\r\nPath:ssml\r\n\r\n{ssml}"
    )
}

fn build_ssml(request: &SynthesisRequest) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='en-US'>\
         <voice name='{voice}'>\
         <prosody pitch='{pitch}' rate='{rate}' volume='{volume}'>{text}</prosody>\
         </voice></speak>",
        voice = request.voice,
        pitch = request.prosody.pitch(),
        rate = request.prosody.rate(),
        volume = request.prosody.volume(),
        text = escape_xml(&request.text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

enum TextFrame {
    Metadata(Vec<TtsEvent>),
    TurnEnd,
    Other,
}

fn parse_text_frame(raw: &str) -> Result<TextFrame, SpeechError> {
    let (headers, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| SpeechError::Protocol("text frame without header terminator".into()))?;
    match header_value(headers, "Path") {
        Some("audio.metadata") => Ok(TextFrame::Metadata(parse_metadata(body)?)),
        Some("turn.end") => Ok(TextFrame::TurnEnd),
        // turn.start, response and anything the service adds later
        _ => Ok(TextFrame::Other),
    }
}

fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

#[derive(Deserialize)]
struct MetadataPayload {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataEntry>,
}

#[derive(Deserialize)]
struct MetadataEntry {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Data", default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct BoundaryData {
    #[serde(rename = "Offset")]
    offset: u64,
    #[serde(rename = "Duration", default)]
    duration: u64,
    #[serde(rename = "text")]
    text: BoundaryText,
}

#[derive(Deserialize)]
struct BoundaryText {
    #[serde(rename = "Text")]
    text: String,
}

fn parse_metadata(body: &str) -> Result<Vec<TtsEvent>, SpeechError> {
    let payload: MetadataPayload = serde_json::from_str(body)
        .map_err(|e| SpeechError::Protocol(format!("bad audio.metadata payload: {e}")))?;

    let mut events = Vec::new();
    for entry in payload.metadata {
        // The service also emits SessionEnd and similar markers here.
        if entry.kind != "WordBoundary" {
            continue;
        }
        let data: BoundaryData = serde_json::from_value(entry.data)
            .map_err(|e| SpeechError::Protocol(format!("bad WordBoundary data: {e}")))?;
        events.push(TtsEvent::WordBoundary {
            offset_ticks: data.offset,
            duration_ticks: data.duration,
            text: data.text.text,
        });
    }
    Ok(events)
}

/// Binary frames carry a big-endian u16 header length, the ASCII
/// headers, then the payload. Only `Path:audio` frames carry audio.
fn parse_binary_frame(payload: &[u8]) -> Result<Option<Vec<u8>>, SpeechError> {
    if payload.len() < 2 {
        return Err(SpeechError::Protocol(
            "binary frame shorter than its length prefix".into(),
        ));
    }
    let header_len = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    let Some(audio) = payload.get(2 + header_len..) else {
        return Err(SpeechError::Protocol(
            "binary frame header length out of bounds".into(),
        ));
    };
    let headers = std::str::from_utf8(&payload[2..2 + header_len])
        .map_err(|_| SpeechError::Protocol("binary frame headers are not valid UTF-8".into()))?;
    if header_value(headers, "Path") != Some("audio") {
        return Ok(None);
    }
    Ok(Some(audio.to_vec()))
}
