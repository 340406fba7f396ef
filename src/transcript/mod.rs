/*!
 * Transcript extraction.
 *
 * This module turns a wiki transcript page into speaker-attributed dialogue:
 * - `model`: Dialogue lines, documents and character rosters
 * - `text`: Stage-direction detection and placeholder resolution
 * - `extractor`: The single-pass extraction over page markup
 * - `naming`: Quest names, slugs and branch names
 * - `output`: JSON payload and output sinks
 */

pub mod model;
pub mod text;
pub mod extractor;
pub mod naming;
pub mod output;

// Re-export main types
pub use model::{
    is_player_name, CharacterEntry, CharacterRoster, DialogueLine, TranscriptDocument,
    TranscriptOutput, PLAYER_CHARACTER,
};
pub use extractor::{ExtractionStats, SkipReason, TranscriptExtractor};
pub use naming::{
    create_slug, generate_branch_name, quest_name_from_url, QuestNameResolver, UNKNOWN_QUEST,
};
pub use output::{
    build_output_json, format_extraction_summary, load_json_from_file, output_path_for,
    render_json, save_json_to_file, write_output, OutputSink,
};
