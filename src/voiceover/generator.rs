/*!
 * Sequential voiceover generation for an extracted transcript.
 *
 * Lines are voiced in narrative order so each request can carry the text
 * of the lines around it. A failing line is recorded and the run continues.
 */

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::database::{DialogRecord, Repository};
use crate::file_utils::FileManager;
use crate::providers::{SpeechProvider, SpeechRequest};
use crate::transcript::{DialogueLine, TranscriptDocument};

use super::dialogue_hash;
use super::voices::VoiceMap;

/// Extension of generated audio clips
pub const AUDIO_EXTENSION: &str = "mp3";

/// Outcome of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Completed,
    Skipped,
    Failed,
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStatus::Completed => write!(f, "completed"),
            LineStatus::Skipped => write!(f, "skipped"),
            LineStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
    pub hash: String,
    pub character: String,
    pub status: LineStatus,
    /// Why the line was skipped or failed
    pub error: Option<String>,
}

/// Totals for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestResult {
    pub quest_name: String,
    pub total_lines: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<LineResult>,
}

impl QuestResult {
    fn new(quest_name: &str, total_lines: usize) -> Self {
        Self {
            quest_name: quest_name.to_string(),
            total_lines,
            completed: 0,
            skipped: 0,
            failed: 0,
            results: Vec::with_capacity(total_lines),
        }
    }

    fn record(&mut self, result: LineResult) {
        match result.status {
            LineStatus::Completed => self.completed += 1,
            LineStatus::Skipped => self.skipped += 1,
            LineStatus::Failed => self.failed += 1,
        }
        self.results.push(result);
    }
}

/// Drives a speech provider over the lines of a transcript
#[derive(Debug)]
pub struct VoiceoverGenerator<P: SpeechProvider> {
    provider: P,
    audio_dir: PathBuf,
    repository: Option<Repository>,
    force: bool,
    show_progress: bool,
}

impl<P: SpeechProvider> VoiceoverGenerator<P> {
    pub fn new(provider: P, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            audio_dir: audio_dir.into(),
            repository: None,
            force: false,
            show_progress: true,
        }
    }

    /// Record every voiced line in the database
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Regenerate lines whose audio file already exists
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Path of the audio clip for a dialogue hash
    pub fn audio_path(&self, hash: &str) -> PathBuf {
        audio_path_for(&self.audio_dir, hash)
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }

    /// Voice every line of the document
    pub async fn generate(
        &self,
        quest_name: &str,
        document: &TranscriptDocument,
        voices: &VoiceMap,
    ) -> Result<QuestResult> {
        FileManager::ensure_dir(&self.audio_dir)?;

        let mut quest_result = QuestResult::new(quest_name, document.len());
        let progress_bar = self.progress_bar(document.len());
        progress_bar.set_message(quest_name.to_string());

        info!("Generating voiceover for {} ({} lines)", quest_name, document.len());

        for (index, line) in document.lines().iter().enumerate() {
            let (previous, next) = document.neighbours(index);
            let result = self.generate_line(quest_name, line, previous, next, voices).await;

            match result.status {
                LineStatus::Failed => error!(
                    "[{}] Failed line for {}: {}",
                    index + 1,
                    line.character,
                    result.error.as_deref().unwrap_or("unknown error")
                ),
                LineStatus::Skipped => debug!(
                    "[{}] Skipped line for {}: {}",
                    index + 1,
                    line.character,
                    result.error.as_deref().unwrap_or("")
                ),
                LineStatus::Completed => debug!("[{}] {}: {}", index + 1, line.character, line.text),
            }

            quest_result.record(result);
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message(format!("{} done", quest_name));

        info!(
            "{}: {} completed, {} skipped, {} failed",
            quest_name, quest_result.completed, quest_result.skipped, quest_result.failed
        );
        if quest_result.failed > 0 {
            warn!("{} line(s) failed; rerun to retry them", quest_result.failed);
        }

        Ok(quest_result)
    }

    async fn generate_line(
        &self,
        quest_name: &str,
        line: &DialogueLine,
        previous: Option<&DialogueLine>,
        next: Option<&DialogueLine>,
        voices: &VoiceMap,
    ) -> LineResult {
        let hash = dialogue_hash(&line.character, &line.text);
        let outcome = |status, error: Option<String>| LineResult {
            hash: hash.clone(),
            character: line.character.clone(),
            status,
            error,
        };

        let Some(voice_id) = voices.voice_for(&line.character) else {
            return outcome(LineStatus::Skipped, Some("No voice available".to_string()));
        };

        let audio_path = self.audio_path(&hash);
        if !self.force && FileManager::file_exists(&audio_path) {
            return outcome(LineStatus::Skipped, Some("Audio already exists".to_string()));
        }

        let request = SpeechRequest::new(voice_id, line.text.as_str())
            .previous_text(previous.map(|l| l.text.as_str()))
            .next_text(next.map(|l| l.text.as_str()));

        match self.voice_line(quest_name, line, &request, &audio_path).await {
            Ok(()) => outcome(LineStatus::Completed, None),
            Err(e) => outcome(LineStatus::Failed, Some(e.to_string())),
        }
    }

    async fn voice_line(
        &self,
        quest_name: &str,
        line: &DialogueLine,
        request: &SpeechRequest,
        audio_path: &Path,
    ) -> Result<()> {
        let audio = self.provider.synthesize(request).await?;
        FileManager::write_bytes(audio_path, &audio)?;

        if let Some(repository) = &self.repository {
            let uri = audio_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            repository
                .insert_dialog(&DialogRecord::new(quest_name, &line.character, &line.text, uri))
                .await?;
        }

        Ok(())
    }
}

/// `<audio_dir>/<hash>.mp3`
pub fn audio_path_for(audio_dir: &Path, hash: &str) -> PathBuf {
    audio_dir.join(format!("{}.{}", hash, AUDIO_EXTENSION))
}
