use crate::error::ApiError;

/// Maximum text length for synthesis requests
const MAX_TEXT_LENGTH: usize = 5000;
/// Maximum length for voice short names
const MAX_VOICE_NAME_LENGTH: usize = 64;
/// Maximum length for output file stems
const MAX_FILE_STEM_LENGTH: usize = 100;

/// Validate the text of a synthesis request. Runs before any network
/// call is made.
pub fn validate_synthesis_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::InvalidInput("Text cannot be empty".to_string()));
    }
    if text.len() > MAX_TEXT_LENGTH {
        return Err(ApiError::InvalidInput(format!(
            "Text too long (max {} characters)",
            MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Validate a voice short name (e.g. tr-TR-AhmetNeural)
pub fn validate_voice_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name.len() > MAX_VOICE_NAME_LENGTH || !is_valid_voice_name(name) {
        return Err(ApiError::InvalidInput(format!(
            "Invalid voice name: {}. Expected format: ll-CC-Name (e.g. tr-TR-AhmetNeural)",
            name
        )));
    }
    Ok(())
}

fn is_valid_voice_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    parts[0].len() == 2
        && parts[0].chars().all(|c| c.is_ascii_lowercase())
        && parts[1].len() == 2
        && parts[1].chars().all(|c| c.is_ascii_uppercase())
        && parts[2..]
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Validate a user-supplied output file stem. The stem names files
/// inside the chosen directory; path traversal is rejected here.
pub fn validate_file_stem(stem: &str) -> Result<(), ApiError> {
    if stem.is_empty() {
        return Err(ApiError::InvalidInput(
            "File name cannot be empty".to_string(),
        ));
    }
    if stem.len() > MAX_FILE_STEM_LENGTH {
        return Err(ApiError::InvalidInput(format!(
            "File name too long (max {} characters)",
            MAX_FILE_STEM_LENGTH
        )));
    }
    if stem.contains('/') || stem.contains('\\') || stem.starts_with('.') {
        return Err(ApiError::InvalidInput(format!(
            "Invalid file name: {}",
            stem
        )));
    }
    Ok(())
}
