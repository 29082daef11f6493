//! Client library for the Microsoft Edge "Read Aloud" speech service.
//!
//! The service does all the heavy lifting: we assemble an SSML request,
//! stream the response over a websocket, and split it into MP3 audio
//! chunks and word-boundary timing events. The timing events become an
//! SRT subtitle track; audio and subtitles are written to disk through
//! an atomic file sink.

mod constants;

pub mod error;
pub mod params;
pub mod sink;
pub mod stream;
pub mod subtitle;
pub mod voice;

pub use error::SpeechError;
pub use params::Prosody;
pub use sink::{save_result, SavedFiles};
pub use stream::{synthesize, SynthesisRequest, SynthesisResult, TtsEvent};
pub use subtitle::SubtitleTrack;
pub use voice::{fetch_voices, rank_voices, Voice};
