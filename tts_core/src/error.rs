use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the speech client
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to connect to speech service: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("speech service transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("speech service protocol error: {0}")]
    Protocol(String),

    #[error("voice list request failed: {0}")]
    VoiceList(#[from] reqwest::Error),

    #[error("speech service closed the connection before the turn ended")]
    ServiceClosed,

    #[error("file operation failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpeechError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpeechError::Io {
            path: path.into(),
            source,
        }
    }
}
