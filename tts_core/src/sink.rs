//! Output sink for finished synthesis results.
//!
//! Writes go to a temporary file in the destination directory and are
//! renamed into place, so a failed or abandoned write never leaves a
//! partial file at the destination path.

use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::error::SpeechError;

/// Paths written for one synthesis result.
#[derive(Debug, Clone, Serialize)]
pub struct SavedFiles {
    pub audio: PathBuf,
    pub subtitles: Option<PathBuf>,
}

/// Write `payload` to `dir/file_name`, creating `dir` if absent.
pub async fn write_atomic(
    dir: &Path,
    file_name: &str,
    payload: &[u8],
) -> Result<PathBuf, SpeechError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| SpeechError::io(dir, e))?;

    let destination = dir.join(file_name);
    let temp = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    if let Err(e) = tokio::fs::write(&temp, payload).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(SpeechError::io(&temp, e));
    }
    if let Err(e) = tokio::fs::rename(&temp, &destination).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(SpeechError::io(&destination, e));
    }
    tracing::debug!(path = %destination.display(), bytes = payload.len(), "wrote output file");
    Ok(destination)
}

/// Write the `<stem>.mp3` audio and, when the subtitle text is
/// non-empty, its `<stem>.srt` companion.
pub async fn save_result(
    dir: &Path,
    stem: &str,
    audio: &[u8],
    subtitles: &str,
) -> Result<SavedFiles, SpeechError> {
    let audio_path = write_atomic(dir, &format!("{stem}.mp3"), audio).await?;
    let subtitle_path = if subtitles.is_empty() {
        None
    } else {
        Some(write_atomic(dir, &format!("{stem}.srt"), subtitles.as_bytes()).await?)
    };
    Ok(SavedFiles {
        audio: audio_path,
        subtitles: subtitle_path,
    })
}
