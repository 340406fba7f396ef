use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::database::Repository;
use crate::file_utils::FileManager;
use crate::providers::elevenlabs::ElevenLabs;
use crate::providers::{SpeechProvider, VoiceInfo};
use crate::transcript::{
    build_output_json, format_extraction_summary, generate_branch_name, load_json_from_file,
    write_output, CharacterRoster, OutputSink, QuestNameResolver, TranscriptExtractor,
    TranscriptOutput,
};
use crate::voiceover::{QuestResult, VoiceMap, VoiceoverGenerator};
use crate::wiki::{QuestListing, WikiClient};

/// A listed quest transcript and whether it has been voiced already
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestStatus {
    pub listing: QuestListing,
    pub voiced: bool,
}

/// Options of the `generate` workflow
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Transcript JSON written by `extract`
    pub transcript_path: PathBuf,
    /// Explicit `(character, voice_id)` assignments
    pub voices: Vec<(String, String)>,
    /// Voice for the player character
    pub player_voice: Option<String>,
    /// Match unassigned characters to provider voices by name
    pub auto_match: bool,
    /// Regenerate clips that already exist
    pub force: bool,
}

/// Main application controller for the extraction and voiceover workflows
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn wiki_client(&self) -> Result<WikiClient> {
        WikiClient::new(self.config.wiki.clone())
    }

    /// Turn page markup into the JSON payload for a quest
    pub fn build_transcript(&self, html: &str, url: &str) -> Result<TranscriptOutput> {
        let (document, stats) = TranscriptExtractor::new().extract_with_stats(html)?;
        debug!(
            "Extracted {} lines, skipped {} list items",
            stats.lines_emitted,
            stats.total_skipped()
        );

        let quest_name = QuestNameResolver::new(&self.config.wiki.site_name).resolve(html, url);
        let branch = generate_branch_name(&quest_name);
        let roster = document.roster();

        Ok(build_output_json(&quest_name, &branch, &document, &roster))
    }

    /// Fetch a transcript page, extract it and write the payload to `sink`
    pub async fn extract(&self, url: &str, sink: &OutputSink) -> Result<TranscriptOutput> {
        info!("Fetching transcript from {}", url);
        let html = self.wiki_client()?.fetch_page(url).await?;

        let output = self.build_transcript(&html, url)?;

        if let Some(path) = write_output(&output, sink)? {
            info!("Saved transcript to {:?}", path);
        }
        eprint!("{}", format_extraction_summary(&output));

        Ok(output)
    }

    /// List the wiki's quest transcripts, marking the ones already voiced
    pub async fn list_quests(&self) -> Result<Vec<QuestStatus>> {
        let listings = self.wiki_client()?.list_quest_transcripts().await?;
        let voiced: HashSet<String> = self.completed_quests().await?.into_iter().collect();

        Ok(listings
            .into_iter()
            .map(|listing| {
                let voiced = voiced.contains(listing.quest_name());
                QuestStatus { listing, voiced }
            })
            .collect())
    }

    /// Quests recorded in the database, empty when no database exists yet
    pub async fn completed_quests(&self) -> Result<Vec<String>> {
        let database_path = &self.config.storage.database_path;
        if !FileManager::file_exists(database_path) {
            debug!("No database at {:?}", database_path);
            return Ok(Vec::new());
        }
        Repository::open(database_path)?.completed_quests().await
    }

    fn speech_provider(&self) -> Result<ElevenLabs> {
        self.config.require_api_key()?;
        Ok(ElevenLabs::from_config(&self.config.tts)?)
    }

    /// List the voices of the configured TTS provider
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>> {
        let provider = self.speech_provider()?;
        Ok(provider.list_voices().await?)
    }

    /// Voice a transcript with the configured TTS provider
    pub async fn generate(&self, options: &GenerateOptions) -> Result<QuestResult> {
        let provider = self.speech_provider()?;
        self.generate_with_provider(provider, options).await
    }

    /// Voice a transcript with the given provider
    pub async fn generate_with_provider<P: SpeechProvider>(
        &self,
        provider: P,
        options: &GenerateOptions,
    ) -> Result<QuestResult> {
        let transcript = load_json_from_file(&options.transcript_path)
            .with_context(|| format!("Failed to load transcript {:?}", options.transcript_path))?;
        let document = transcript.document();
        let roster = CharacterRoster::from_lines(document.lines());

        let mut voices = VoiceMap::from_assignments(
            options.voices.iter().cloned(),
            options.player_voice.as_deref(),
        );
        if options.auto_match {
            let available = provider.list_voices().await?;
            voices.auto_match(&roster, &available);
        }
        for character in voices.unassigned(&roster) {
            warn!("No voice for {}; their lines will be skipped", character);
        }

        let repository = Repository::open(&self.config.storage.database_path)?;
        let generator = VoiceoverGenerator::new(provider, self.audio_dir())
            .with_repository(repository)
            .force(options.force);

        generator.generate(&transcript.quest_name, &document, &voices).await
    }

    pub fn audio_dir(&self) -> &Path {
        &self.config.storage.audio_dir
    }
}
