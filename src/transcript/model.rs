/*!
 * Transcript data model.
 *
 * A `TranscriptDocument` is the ordered list of voiced lines extracted from a
 * single transcript page. Order is narrative order: the voiceover workflow
 * hands each line's neighbours to the speech provider as context.
 */

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Character name reserved for the player; voiced, but never part of a roster
pub const PLAYER_CHARACTER: &str = "Player";

/// One spoken line attributed to a character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Trimmed speaker name, never empty
    pub character: String,

    /// Spoken content with markup stripped and placeholders resolved
    #[serde(rename = "line")]
    pub text: String,
}

impl DialogueLine {
    pub fn new(character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            text: text.into(),
        }
    }

    /// Whether this line is spoken by the player character
    pub fn is_player(&self) -> bool {
        is_player_name(&self.character)
    }
}

/// Case-insensitive check against the reserved player name
pub fn is_player_name(name: &str) -> bool {
    name.to_lowercase() == PLAYER_CHARACTER.to_lowercase()
}

/// Ordered, deduplicated dialogue of a transcript page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptDocument {
    lines: Vec<DialogueLine>,
}

impl TranscriptDocument {
    pub fn from_lines(lines: Vec<DialogueLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the lines immediately before and after the line at `index`
    pub fn neighbours(&self, index: usize) -> (Option<&DialogueLine>, Option<&DialogueLine>) {
        let previous = index.checked_sub(1).and_then(|i| self.lines.get(i));
        let next = self.lines.get(index + 1);
        (previous, next)
    }

    /// Derive the sorted set of non-player characters
    pub fn roster(&self) -> CharacterRoster {
        CharacterRoster::from_lines(&self.lines)
    }

    pub fn into_lines(self) -> Vec<DialogueLine> {
        self.lines
    }
}

/// Unique non-player character names, in ascending byte order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRoster {
    names: BTreeSet<String>,
}

impl CharacterRoster {
    pub fn from_lines(lines: &[DialogueLine]) -> Self {
        let names = lines
            .iter()
            .filter(|line| !line.is_player())
            .map(|line| line.character.clone())
            .collect();
        Self { names }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

/// Entry of the `characters` array in the JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub name: String,
}

/// JSON payload written by the `extract` command and read back by `generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptOutput {
    pub branch: String,
    pub quest_name: String,
    pub lines: Vec<DialogueLine>,
    pub characters: Vec<CharacterEntry>,
}

impl TranscriptOutput {
    /// Rebuild the document this payload was produced from
    pub fn document(&self) -> TranscriptDocument {
        TranscriptDocument::from_lines(self.lines.clone())
    }
}
