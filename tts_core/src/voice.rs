//! Voice catalog access.
//!
//! The full voice list comes from a single HTTPS endpoint and is meant
//! to be fetched once per session and cached by the caller. Ranking is
//! a pure function so it can be re-applied with different preferred
//! locales without refetching.

use std::collections::HashSet;

use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::SpeechError;

/// One entry of the remote voice catalog.
///
/// Field names follow the wire format of the voice list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Voice {
    pub name: String,
    /// Stable identifier, e.g. `tr-TR-AhmetNeural`.
    pub short_name: String,
    pub gender: String,
    pub locale: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub suggested_codec: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fetch the full voice list from the service.
pub async fn fetch_voices(client: &reqwest::Client) -> Result<Vec<Voice>, SpeechError> {
    let voices = client
        .get(constants::VOICE_LIST_URL)
        .header(header::USER_AGENT, constants::USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Voice>>()
        .await?;
    tracing::debug!("fetched {} voices", voices.len());
    Ok(voices)
}

/// Rank voices for display: preferred locales first, then a stable
/// ordering by locale and short name. Duplicate short names keep their
/// first occurrence.
pub fn rank_voices(voices: &[Voice], preferred_locales: &[String]) -> Vec<Voice> {
    let preferred: HashSet<&str> = preferred_locales.iter().map(String::as_str).collect();

    let mut ranked: Vec<&Voice> = voices.iter().collect();
    ranked.sort_by(|a, b| {
        let a_other = !preferred.contains(a.locale.as_str());
        let b_other = !preferred.contains(b.locale.as_str());
        a_other
            .cmp(&b_other)
            .then_with(|| a.locale.cmp(&b.locale))
            .then_with(|| a.short_name.cmp(&b.short_name))
    });

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|v| seen.insert(v.short_name.clone()))
        .cloned()
        .collect()
}
