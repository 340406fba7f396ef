/*!
 * JSON payload assembly and output sinks for extracted transcripts.
 */

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::file_utils::FileManager;

use super::model::{CharacterEntry, CharacterRoster, TranscriptDocument, TranscriptOutput};
use super::naming::create_slug;

/// Where the JSON payload of an extraction goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// `<dir>/<slug>.json`
    Directory(PathBuf),
    /// Standard output
    Stdout,
}

/// Assemble the JSON payload for a quest
pub fn build_output_json(
    quest_name: &str,
    branch: &str,
    document: &TranscriptDocument,
    roster: &CharacterRoster,
) -> TranscriptOutput {
    TranscriptOutput {
        branch: branch.to_string(),
        quest_name: quest_name.to_string(),
        lines: document.lines().to_vec(),
        characters: roster
            .names()
            .map(|name| CharacterEntry { name: name.to_string() })
            .collect(),
    }
}

/// Path of the payload file for a quest inside `output_directory`
pub fn output_path_for(output_directory: &Path, quest_name: &str) -> PathBuf {
    output_directory.join(format!("{}.json", create_slug(quest_name)))
}

/// Pretty-printed payload with a trailing newline
pub fn render_json(output: &TranscriptOutput) -> Result<String> {
    let mut json = serde_json::to_string_pretty(output)
        .context("Failed to serialize transcript output")?;
    json.push('\n');
    Ok(json)
}

/// Write the payload to `<output_directory>/<slug>.json`, creating the directory
pub fn save_json_to_file(output: &TranscriptOutput, output_directory: &Path) -> Result<PathBuf> {
    FileManager::ensure_dir(output_directory)?;

    let output_path = output_path_for(output_directory, &output.quest_name);
    FileManager::write_to_file(&output_path, &render_json(output)?)?;

    Ok(output_path)
}

/// Write the payload to the chosen sink; returns the file path for file sinks
pub fn write_output(output: &TranscriptOutput, sink: &OutputSink) -> Result<Option<PathBuf>> {
    match sink {
        OutputSink::Directory(directory) => save_json_to_file(output, directory).map(Some),
        OutputSink::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(render_json(output)?.as_bytes())
                .context("Failed to write transcript to stdout")?;
            stdout.flush()?;
            Ok(None)
        }
    }
}

/// Read back a payload written by `save_json_to_file`
pub fn load_json_from_file(path: &Path) -> Result<TranscriptOutput> {
    let content = FileManager::read_to_string(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse transcript file: {:?}", path))
}

/// Human-readable extraction summary
pub fn format_extraction_summary(output: &TranscriptOutput) -> String {
    let mut summary = String::new();
    summary.push_str("\n=== Summary ===\n");
    summary.push_str(&format!("Quest: {}\n", output.quest_name));
    summary.push_str(&format!("Branch: {}\n", output.branch));
    summary.push_str(&format!("Total lines: {}\n", output.lines.len()));
    summary.push_str(&format!("Total characters: {}\n", output.characters.len()));
    for character in &output.characters {
        summary.push_str(&format!("  - {}\n", character.name));
    }
    summary
}
