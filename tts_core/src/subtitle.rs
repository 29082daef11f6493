//! Subtitle assembly from word-boundary events.
//!
//! Cues are appended in arrival order and rendered to SRT once the
//! stream has ended. The service reports offsets and durations in
//! 100-nanosecond ticks; SRT wants milliseconds, converted with
//! integer division (rounding down).

use crate::stream::TtsEvent;

pub const TICKS_PER_MILLISECOND: u64 = 10_000;

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub offset_ticks: u64,
    pub duration_ticks: u64,
    pub text: String,
}

/// Append-only cue accumulator for one synthesis.
#[derive(Debug, Default)]
pub struct SubtitleTrack {
    cues: Vec<Cue>,
}

impl SubtitleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one stream event; anything but a word boundary is ignored.
    pub fn feed(&mut self, event: &TtsEvent) {
        if let TtsEvent::WordBoundary {
            offset_ticks,
            duration_ticks,
            text,
        } = event
        {
            self.cues.push(Cue {
                offset_ticks: *offset_ticks,
                duration_ticks: *duration_ticks,
                text: text.clone(),
            });
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render the track as SRT text. An empty track renders to an empty
    /// string, which callers treat as "no subtitles available" rather
    /// than a failure.
    pub fn render_srt(&self) -> String {
        let mut out = String::new();
        for (index, cue) in self.cues.iter().enumerate() {
            let start_ms = cue.offset_ticks / TICKS_PER_MILLISECOND;
            let end_ms = (cue.offset_ticks + cue.duration_ticks) / TICKS_PER_MILLISECOND;
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                index + 1,
                format_timestamp(start_ms),
                format_timestamp(end_ms),
                cue.text
            ));
        }
        out
    }
}

fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = ms % 3_600_000 / 60_000;
    let seconds = ms % 60_000 / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(offset_ticks: u64, duration_ticks: u64, text: &str) -> TtsEvent {
        TtsEvent::WordBoundary {
            offset_ticks,
            duration_ticks,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_track_renders_empty_string() {
        let track = SubtitleTrack::new();
        assert_eq!(track.render_srt(), "");
    }

    #[test]
    fn test_audio_events_are_ignored() {
        let mut track = SubtitleTrack::new();
        track.feed(&TtsEvent::Audio(vec![1, 2, 3]));
        assert!(track.is_empty());
    }

    #[test]
    fn test_cues_keep_arrival_order_with_nondecreasing_starts() {
        let mut track = SubtitleTrack::new();
        track.feed(&boundary(0, 5_000_000, "Merhaba"));
        track.feed(&boundary(5_000_000, 5_000_000, "Dünya"));
        track.feed(&boundary(10_000_000, 2_500_000, "nasılsın"));

        assert_eq!(track.len(), 3);
        let starts: Vec<u64> = track.cues().iter().map(|c| c.offset_ticks).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);

        let srt = track.render_srt();
        let merhaba = srt.find("Merhaba").unwrap();
        let dunya = srt.find("Dünya").unwrap();
        let nasilsin = srt.find("nasılsın").unwrap();
        assert!(merhaba < dunya && dunya < nasilsin);
    }

    #[test]
    fn test_srt_rendering_format() {
        let mut track = SubtitleTrack::new();
        track.feed(&boundary(1_000_000, 7_500_000, "Merhaba"));
        track.feed(&boundary(10_000_000, 36_000_000_000, "Dünya"));

        let srt = track.render_srt();
        assert_eq!(
            srt,
            "1\n00:00:00,100 --> 00:00:00,850\nMerhaba\n\n\
             2\n00:00:01,000 --> 01:00:01,000\nDünya\n\n"
        );
    }

    #[test]
    fn test_tick_conversion_rounds_down() {
        let mut track = SubtitleTrack::new();
        // 19_999 ticks is 1.9999ms; integer division keeps 1ms.
        track.feed(&boundary(19_999, 0, "x"));
        let srt = track.render_srt();
        assert!(srt.contains("00:00:00,001 --> 00:00:00,001"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
        assert_eq!(format_timestamp(61_002), "00:01:01,002");
        assert_eq!(format_timestamp(3_600_000 + 123), "01:00:00,123");
    }
}
