/*!
 * Assignment of provider voices to transcript characters.
 */

use std::collections::BTreeMap;

use log::{debug, info};

use crate::providers::VoiceInfo;
use crate::transcript::{CharacterRoster, PLAYER_CHARACTER};

/// Character name to voice id assignments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceMap {
    assignments: BTreeMap<String, String>,
}

impl VoiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from explicit `(character, voice_id)` pairs and an optional player voice
    pub fn from_assignments<I>(assignments: I, player_voice: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = Self::new();
        for (character, voice_id) in assignments {
            map.assign(character, voice_id);
        }
        if let Some(voice_id) = player_voice {
            map.assign(PLAYER_CHARACTER, voice_id);
        }
        map
    }

    /// Assign a voice, replacing any previous assignment for the character
    pub fn assign(&mut self, character: impl Into<String>, voice_id: impl Into<String>) {
        self.assignments.insert(character.into(), voice_id.into());
    }

    /// Voice for a character; exact name first, then a case-insensitive match
    pub fn voice_for(&self, character: &str) -> Option<&str> {
        if let Some(voice_id) = self.assignments.get(character) {
            return Some(voice_id);
        }

        let wanted = character.to_lowercase();
        self.assignments
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, voice_id)| voice_id.as_str())
    }

    /// Match every unassigned roster character against the provider's voices.
    ///
    /// Returns the number of characters that gained a voice.
    pub fn auto_match(&mut self, roster: &CharacterRoster, voices: &[VoiceInfo]) -> usize {
        let mut matched = 0;

        for character in roster.names() {
            if self.voice_for(character).is_some() {
                continue;
            }
            if let Some(voice) = match_character_to_voice(character, voices) {
                debug!("Matched {} to voice {} ({})", character, voice.name, voice.voice_id);
                self.assign(character, voice.voice_id.clone());
                matched += 1;
            }
        }

        if matched > 0 {
            info!("Auto-matched {} character(s) to voices", matched);
        }
        matched
    }

    /// Roster characters with no voice
    pub fn unassigned(&self, roster: &CharacterRoster) -> Vec<String> {
        roster
            .names()
            .filter(|name| self.voice_for(name).is_none())
            .map(str::to_string)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assignments.iter().map(|(name, voice)| (name.as_str(), voice.as_str()))
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Find the voice whose name matches the character.
///
/// An exact case-insensitive match wins; otherwise the first voice whose
/// name contains the character name, or is contained in it.
pub fn match_character_to_voice<'a>(character: &str, voices: &'a [VoiceInfo]) -> Option<&'a VoiceInfo> {
    let wanted = character.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let named = || voices.iter().filter(|voice| !voice.name.trim().is_empty());

    named()
        .find(|voice| voice.name.trim().to_lowercase() == wanted)
        .or_else(|| {
            named().find(|voice| {
                let name = voice.name.trim().to_lowercase();
                name.contains(&wanted) || wanted.contains(&name)
            })
        })
}

/// Parse a `NAME=VOICE_ID` command-line assignment
pub fn parse_voice_assignment(value: &str) -> Result<(String, String), String> {
    let (name, voice_id) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected NAME=VOICE_ID, got '{}'", value))?;

    let name = name.trim();
    let voice_id = voice_id.trim();
    if name.is_empty() || voice_id.is_empty() {
        return Err(format!("Expected NAME=VOICE_ID, got '{}'", value));
    }

    Ok((name.to_string(), voice_id.to_string()))
}
