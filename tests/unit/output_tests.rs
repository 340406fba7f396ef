/*!
 * Tests for the JSON payload and its sinks
 */

use anyhow::Result;
use questvox::transcript::{
    build_output_json, format_extraction_summary, generate_branch_name, load_json_from_file,
    output_path_for, render_json, save_json_to_file, write_output, OutputSink,
    TranscriptExtractor, TranscriptOutput,
};
use crate::common;

fn sample_output() -> TranscriptOutput {
    let document = TranscriptExtractor::new().extract(common::COOKS_ASSISTANT_PAGE).unwrap();
    let roster = document.roster();
    build_output_json(
        "Cook's Assistant",
        &generate_branch_name("Cook's Assistant"),
        &document,
        &roster,
    )
}

/// Test the payload layout
#[test]
fn test_buildOutputJson_shouldUseLineAndNameKeys() -> Result<()> {
    let json: serde_json::Value = serde_json::from_str(&render_json(&sample_output())?)?;

    assert_eq!(json["branch"], "quest/cooks-assistant");
    assert_eq!(json["quest_name"], "Cook's Assistant");
    assert_eq!(json["lines"][0]["character"], "Cook");
    assert_eq!(json["lines"][0]["line"], "What am I to do?");
    assert_eq!(json["characters"], serde_json::json!([{ "name": "Cook" }]));

    Ok(())
}

/// Test pretty printing, trailing newline and unescaped UTF-8
#[test]
fn test_renderJson_shouldBePrettyWithTrailingNewline() -> Result<()> {
    let mut output = sample_output();
    output.quest_name = "Café Quest".to_string();

    let json = render_json(&output)?;

    assert!(json.starts_with("{\n  \"branch\""));
    assert!(json.ends_with("}\n"));
    assert!(json.contains("Café Quest"));

    Ok(())
}

/// Test that the file name is the quest slug
#[test]
fn test_outputPathFor_shouldUseSlug() {
    let path = output_path_for(std::path::Path::new("out"), "Cook's Assistant");

    assert_eq!(path, std::path::Path::new("out").join("cooks-assistant.json"));
}

/// Test saving and loading the payload
#[test]
fn test_saveJsonToFile_thenLoad_shouldReturnSamePayload() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("nested").join("transcripts");
    let output = sample_output();

    let path = save_json_to_file(&output, &output_dir)?;

    assert_eq!(path, output_dir.join("cooks-assistant.json"));
    assert_eq!(load_json_from_file(&path)?, output);

    Ok(())
}

/// Test the directory sink
#[test]
fn test_writeOutput_withDirectorySink_shouldReturnPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let sink = OutputSink::Directory(temp_dir.path().to_path_buf());

    let path = write_output(&sample_output(), &sink)?;

    assert_eq!(path, Some(temp_dir.path().join("cooks-assistant.json")));
    Ok(())
}

/// Test that loading rejects malformed JSON
#[test]
fn test_loadJsonFromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(load_json_from_file(&path).is_err());
    Ok(())
}

/// Test the human-readable summary
#[test]
fn test_formatExtractionSummary_shouldListCountsAndCharacters() {
    let summary = format_extraction_summary(&sample_output());

    assert!(summary.contains("Quest: Cook's Assistant"));
    assert!(summary.contains("Branch: quest/cooks-assistant"));
    assert!(summary.contains("Total lines: 6"));
    assert!(summary.contains("Total characters: 1"));
    assert!(summary.contains("  - Cook"));
}
