/*!
 * Voiceover generation.
 *
 * - `voices`: Character to voice assignment and name matching
 * - `generator`: Per-line synthesis with neighbour context, audio files and records
 */

use md5::{Digest, Md5};

pub mod generator;
pub mod voices;

pub use generator::{audio_path_for, LineResult, LineStatus, QuestResult, VoiceoverGenerator};
pub use voices::{match_character_to_voice, parse_voice_assignment, VoiceMap};

/// Stable identifier of a spoken line: lowercase hex MD5 of `"{character}|{line}"`.
///
/// Clip file names and the playback side both key on this digest.
pub fn dialogue_hash(character: &str, line: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(format!("{}|{}", character, line).as_bytes());
    format!("{:x}", hasher.finalize())
}
