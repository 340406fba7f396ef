/*!
 * Tests for stage direction detection and placeholder resolution
 */

use questvox::transcript::text::{
    extract_character_name, has_voiceable_content, is_stage_direction, is_valid_speaker_tag,
    resolve_dynamic_text,
};

/// Test stage directions in parentheses
#[test]
fn test_isStageDirection_withParenthesizedText_shouldReturnTrue() {
    assert!(is_stage_direction("(nods silently)"));
    assert!(is_stage_direction("  (The cook sobs.)  "));
}

/// Test that partially parenthesized speech is voiced
#[test]
fn test_isStageDirection_withInlineParentheses_shouldReturnFalse() {
    assert!(!is_stage_direction("I need an egg (a fresh one)."));
    assert!(!is_stage_direction("(Whispers) come closer."));
}

/// Test the boilerplate phrases in any case
#[test]
fn test_isStageDirection_withBoilerplate_shouldIgnoreCase() {
    assert!(is_stage_direction("END OF DIALOGUE"));
    assert!(is_stage_direction("Select an Option"));
    assert!(is_stage_direction("shows previous options"));
    assert!(is_stage_direction("Start the Restless Ghost quest?"));
    assert!(is_stage_direction("Quest complete!"));
    assert!(is_stage_direction("Congratulations! Quest complete!"));
}

/// Test that ordinary speech is not a stage direction
#[test]
fn test_isStageDirection_withSpeech_shouldReturnFalse() {
    assert!(!is_stage_direction("The quest is complete, adventurer."));
    assert!(!is_stage_direction("Start the fire, quickly!"));
}

/// Test placeholder removal and spacing repairs
#[test]
fn test_resolveDynamicText_withPlaceholders_shouldRepairSpacing() {
    assert_eq!(resolve_dynamic_text("Halt! State your [business/name]."), "Halt! State your.");
    assert_eq!(resolve_dynamic_text("Well met, [Player name], [title]!"), "Well met, !");
    assert_eq!(resolve_dynamic_text("I have [1-19]   coins ."), "I have coins.");
}

/// Test that no double spaces or brackets survive
#[test]
fn test_resolveDynamicText_withNestedWhitespace_shouldLeaveSingleSpaces() {
    let resolved = resolve_dynamic_text("  Hello\n\t[x]  there  [y] friend  ");

    assert_eq!(resolved, "Hello there friend");
    assert!(!resolved.contains("  "));
}

/// Test text without placeholders
#[test]
fn test_resolveDynamicText_withPlainText_shouldBeUnchanged() {
    assert_eq!(resolve_dynamic_text("What am I to do?"), "What am I to do?");
}

/// Test voiceable content detection
#[test]
fn test_hasVoiceableContent_withEllipsisOrEmpty_shouldReturnFalse() {
    assert!(!has_voiceable_content(""));
    assert!(!has_voiceable_content("..."));
    assert!(!has_voiceable_content(".."));
    assert!(has_voiceable_content("."));
    assert!(has_voiceable_content("...what?"));
}

/// Test speaker tag validation
#[test]
fn test_isValidSpeakerTag_withAndWithoutColon() {
    assert!(is_valid_speaker_tag("Cook:"));
    assert!(is_valid_speaker_tag("  Duke Horacio:  "));
    assert!(!is_valid_speaker_tag("Cook"));
    assert!(!is_valid_speaker_tag("Note: see below"));
}

/// Test character name extraction
#[test]
fn test_extractCharacterName_shouldStripColonAndWhitespace() {
    assert_eq!(extract_character_name("Duke Horacio:"), "Duke Horacio");
    assert_eq!(extract_character_name("[player NAME]:"), "Player");
    assert_eq!(extract_character_name(":"), "");
}
