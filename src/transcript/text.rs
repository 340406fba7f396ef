/*!
 * Text classification and normalization for transcript lines.
 *
 * Wiki transcripts mix spoken dialogue with narration, menu prompts and
 * template variables. These helpers decide what is voiceable and clean up
 * what is left.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::PLAYER_CHARACTER;

/// Boilerplate and narration that never reaches the dialogue box
static STAGE_DIRECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\(.*\)$",
        r"(?i)^End of dialogue$",
        r"(?i)^Select an Option$",
        r"(?i)^Shows previous options$",
        r"(?i)^Start the .* quest\?$",
        r"(?i)^Quest complete!$",
        r"(?i)^Congratulations!",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Template variables such as [Player name] or [1-19]
static DYNAMIC_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());
static DOUBLE_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*,").unwrap());
static SPACE_BEFORE_PERIOD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.").unwrap());

/// Lines made of nothing but dots after placeholder removal
static ELLIPSIS_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.{2,}$").unwrap());

/// Check whether text is narration or menu boilerplate rather than speech
pub fn is_stage_direction(text: &str) -> bool {
    let trimmed = text.trim();

    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        return true;
    }

    STAGE_DIRECTION_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(trimmed))
}

/// Remove template variables and repair the spacing they leave behind
pub fn resolve_dynamic_text(text: &str) -> String {
    let result = DYNAMIC_TEXT_REGEX.replace_all(text, "");
    let result = WHITESPACE_REGEX.replace_all(&result, " ");
    let result = SPACE_BEFORE_COMMA_REGEX.replace_all(&result, ",");
    let result = DOUBLE_COMMA_REGEX.replace_all(&result, ",");
    let result = SPACE_BEFORE_PERIOD_REGEX.replace_all(&result, ".");

    result.trim().to_string()
}

/// Check whether resolved text still carries something to voice
pub fn has_voiceable_content(text: &str) -> bool {
    !text.is_empty() && !ELLIPSIS_ONLY_REGEX.is_match(text)
}

/// A bold run names a speaker only when it ends with a colon
pub fn is_valid_speaker_tag(bold_text: &str) -> bool {
    bold_text.trim().ends_with(':')
}

/// Turn a speaker tag like "Cook:" into a character name
///
/// Bracketed tags are template speakers: "[Player name]:" is the player,
/// any other "[Name]:" is unwrapped.
pub fn extract_character_name(speaker_text: &str) -> String {
    let trimmed = speaker_text.trim();
    let name = trimmed.strip_suffix(':').unwrap_or(trimmed).trim();

    if name.eq_ignore_ascii_case("[player name]") {
        return PLAYER_CHARACTER.to_string();
    }

    match name.strip_prefix('[').and_then(|inner| inner.strip_suffix(']')) {
        Some(inner) => inner.trim().to_string(),
        None => name.to_string(),
    }
}
