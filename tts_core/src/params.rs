//! Prosody parameter encoding.
//!
//! The service expects rate, volume and pitch as strings with an
//! explicit leading sign and a unit suffix, e.g. `+40%` or `-10Hz`.
//! The UI layer clamps slider values to their ranges; no clamping
//! happens here.

/// Prosody settings taken from the UI sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prosody {
    /// Speaking rate offset in percent, UI range -100..100.
    pub rate_pct: i32,
    /// Volume offset in percent, UI range -100..100.
    pub volume_pct: i32,
    /// Pitch offset in hertz, UI range -50..50.
    pub pitch_hz: i32,
}

impl Prosody {
    pub fn rate(&self) -> String {
        signed_percent(self.rate_pct)
    }

    pub fn volume(&self) -> String {
        signed_percent(self.volume_pct)
    }

    pub fn pitch(&self) -> String {
        signed_hertz(self.pitch_hz)
    }
}

/// Format a percentage with an explicit sign, e.g. `+40%`, `-5%`, `+0%`.
pub fn signed_percent(value: i32) -> String {
    format!("{value:+}%")
}

/// Format a hertz offset with an explicit sign, e.g. `+10Hz`.
pub fn signed_hertz(value: i32) -> String {
    format!("{value:+}Hz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_percent_has_sign_and_suffix() {
        for value in -100..=100 {
            let encoded = signed_percent(value);
            assert!(
                encoded.starts_with('+') || encoded.starts_with('-'),
                "missing sign: {encoded}"
            );
            assert!(encoded.ends_with('%'), "missing suffix: {encoded}");
        }
    }

    #[test]
    fn test_signed_hertz_has_sign_and_suffix() {
        for value in -50..=50 {
            let encoded = signed_hertz(value);
            assert!(
                encoded.starts_with('+') || encoded.starts_with('-'),
                "missing sign: {encoded}"
            );
            assert!(encoded.ends_with("Hz"), "missing suffix: {encoded}");
        }
    }

    #[test]
    fn test_zero_encodes_positive() {
        assert_eq!(signed_percent(0), "+0%");
        assert_eq!(signed_hertz(0), "+0Hz");
    }

    #[test]
    fn test_prosody_defaults() {
        let prosody = Prosody::default();
        assert_eq!(prosody.rate(), "+0%");
        assert_eq!(prosody.volume(), "+0%");
        assert_eq!(prosody.pitch(), "+0Hz");
    }

    #[test]
    fn test_prosody_values() {
        let prosody = Prosody {
            rate_pct: 40,
            volume_pct: -20,
            pitch_hz: 15,
        };
        assert_eq!(prosody.rate(), "+40%");
        assert_eq!(prosody.volume(), "-20%");
        assert_eq!(prosody.pitch(), "+15Hz");
    }
}
