/*!
 * Database entity models.
 */

use serde::{Deserialize, Serialize};

/// A voiced dialogue line as stored in the `dialogs` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRecord {
    /// Quest the line belongs to
    pub quest: String,
    /// Speaking character
    pub character: String,
    /// Spoken text
    pub text: String,
    /// Audio file name, relative to the audio directory
    pub uri: String,
}

impl DialogRecord {
    pub fn new(
        quest: impl Into<String>,
        character: impl Into<String>,
        text: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            quest: quest.into(),
            character: character.into(),
            text: text.into(),
            uri: uri.into(),
        }
    }

    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            quest: row.get(0)?,
            character: row.get(1)?,
            text: row.get(2)?,
            uri: row.get(3)?,
        })
    }
}
