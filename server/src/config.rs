// Configuration constants for the server

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub rate_limit_per_minute: u32,
    pub request_timeout_secs: u64,
    pub synth_timeout_secs: u64,
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Locales ranked first in the voice list.
    pub preferred_locales: Vec<String>,
    /// Voice used when a request does not pick one.
    pub default_voice: String,
    /// Default destination for saved audio/subtitle files.
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8085,
            rate_limit_per_minute: 60,
            request_timeout_secs: 120,
            synth_timeout_secs: 90,
            cors_allowed_origins: None,
            preferred_locales: vec!["tr-TR".to_string()],
            default_voice: "tr-TR-AhmetNeural".to_string(),
            output_dir: default_output_dir(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let rate_limit_per_minute = std::env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_per_minute);

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let synth_timeout_secs = std::env::var("SYNTH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.synth_timeout_secs);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        let preferred_locales = std::env::var("PREFERRED_LOCALES")
            .ok()
            .map(|locales| {
                locales
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.preferred_locales);

        let default_voice =
            std::env::var("DEFAULT_VOICE").unwrap_or(defaults.default_voice);

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Self {
            port,
            rate_limit_per_minute,
            request_timeout_secs,
            synth_timeout_secs,
            cors_allowed_origins,
            preferred_locales,
            default_voice,
            output_dir,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn synth_timeout(&self) -> Duration {
        Duration::from_secs(self.synth_timeout_secs)
    }
}

fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pars")
}
