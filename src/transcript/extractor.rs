/*!
 * Dialogue extraction from wiki transcript pages.
 *
 * The extractor walks every list item of the page content once, in document
 * order, and keeps the ones that are voiced dialogue:
 * - menu options and overhead chat are dropped before anything else
 * - a list item speaks only through a bold, colon-terminated speaker tag
 * - stage directions are filtered before template variables are stripped
 * - a (character, text) pair is emitted at most once
 *
 * Irregular markup never fails the run. Only a page without a content
 * container is an error.
 */

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::{debug, trace};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::ExtractError;

use super::model::{DialogueLine, TranscriptDocument};
use super::text;

/// Class of the MediaWiki element holding the rendered page body
const CONTENT_CLASS: &str = "mw-parser-output";

/// Class marking dialogue menu options
const MENU_OPTION_CLASS: &str = "transcript-opt";

/// Class marking overhead chat bubbles
const OVERHEAD_CHAT_CLASS: &str = "in-game-message";

static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(&format!(".{}", CONTENT_CLASS)).unwrap());
static LIST_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static BOLD_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("b").unwrap());
static MENU_OPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(&format!(".{}", MENU_OPTION_CLASS)).unwrap());
static OVERHEAD_CHAT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(&format!(".{}", OVERHEAD_CHAT_CLASS)).unwrap());

/// Why a list item did not become a dialogue line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// Item is (or sits inside) a dialogue menu option
    MenuOption,
    /// Item is an overhead chat bubble
    OverheadChat,
    /// Item has no bold run
    NoSpeakerTag,
    /// Bold run does not end with a colon
    InvalidSpeakerTag,
    /// Speaker tag is only a colon
    EmptyCharacter,
    /// Nothing follows the speaker tag
    EmptyText,
    /// Narration or menu boilerplate
    StageDirection,
    /// Nothing voiceable is left once placeholders are removed
    NoVoiceableContent,
    /// Same character already said the same line
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkipReason::MenuOption => "menu_option",
            SkipReason::OverheadChat => "overhead_chat",
            SkipReason::NoSpeakerTag => "no_speaker_tag",
            SkipReason::InvalidSpeakerTag => "invalid_speaker_tag",
            SkipReason::EmptyCharacter => "empty_character",
            SkipReason::EmptyText => "empty_text",
            SkipReason::StageDirection => "stage_direction",
            SkipReason::NoVoiceableContent => "no_voiceable_content",
            SkipReason::Duplicate => "duplicate",
        };
        write!(f, "{}", name)
    }
}

/// Counters collected during one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// List items inspected
    pub items_seen: usize,
    /// Dialogue lines emitted
    pub lines_emitted: usize,
    /// Skipped items per reason
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ExtractionStats {
    fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// Number of items skipped for the given reason
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Number of items skipped for any reason
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Outcome of classifying a single list item
enum ItemOutcome {
    Line(DialogueLine),
    Skip(SkipReason),
}

/// Extracts voiced dialogue from transcript page markup
#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptExtractor;

impl TranscriptExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the dialogue of a transcript page
    pub fn extract(&self, html: &str) -> Result<TranscriptDocument, ExtractError> {
        self.extract_with_stats(html).map(|(document, _)| document)
    }

    /// Extract the dialogue and report why the other list items were dropped
    pub fn extract_with_stats(&self, html: &str) -> Result<(TranscriptDocument, ExtractionStats), ExtractError> {
        let page = Html::parse_document(html);

        let content = page
            .select(&CONTENT_SELECTOR)
            .next()
            .ok_or(ExtractError::ParseError)?;

        let mut lines = Vec::new();
        let mut seen_lines: HashSet<(String, String)> = HashSet::new();
        let mut stats = ExtractionStats::default();

        for list_item in content.select(&LIST_ITEM_SELECTOR) {
            stats.items_seen += 1;

            let line = match Self::classify_item(list_item) {
                ItemOutcome::Line(line) => line,
                ItemOutcome::Skip(reason) => {
                    trace!("Skipping list item #{} ({})", stats.items_seen, reason);
                    stats.record_skip(reason);
                    continue;
                }
            };

            let deduplication_key = (line.character.clone(), line.text.clone());
            if !seen_lines.insert(deduplication_key) {
                trace!("Skipping list item #{} ({}): {}: {}", stats.items_seen, SkipReason::Duplicate, line.character, line.text);
                stats.record_skip(SkipReason::Duplicate);
                continue;
            }

            lines.push(line);
        }

        stats.lines_emitted = lines.len();
        debug!(
            "Extracted {} dialogue lines from {} list items ({} skipped)",
            stats.lines_emitted, stats.items_seen, stats.total_skipped()
        );

        Ok((TranscriptDocument::from_lines(lines), stats))
    }

    fn classify_item(list_item: ElementRef<'_>) -> ItemOutcome {
        if Self::is_menu_option(list_item) {
            return ItemOutcome::Skip(SkipReason::MenuOption);
        }

        if Self::is_overhead_chat(list_item) {
            return ItemOutcome::Skip(SkipReason::OverheadChat);
        }

        let Some(bold) = list_item.select(&BOLD_SELECTOR).next() else {
            return ItemOutcome::Skip(SkipReason::NoSpeakerTag);
        };

        let speaker_text = bold.text().collect::<String>();
        if !text::is_valid_speaker_tag(&speaker_text) {
            return ItemOutcome::Skip(SkipReason::InvalidSpeakerTag);
        }

        let character = text::extract_character_name(&speaker_text);
        if character.is_empty() {
            return ItemOutcome::Skip(SkipReason::EmptyCharacter);
        }

        let dialogue = Self::dialogue_after(bold);
        if dialogue.is_empty() {
            return ItemOutcome::Skip(SkipReason::EmptyText);
        }

        // Filter on the raw text; placeholders are only resolved afterwards.
        if text::is_stage_direction(&dialogue) {
            return ItemOutcome::Skip(SkipReason::StageDirection);
        }

        let dialogue = text::resolve_dynamic_text(&dialogue);
        if !text::has_voiceable_content(&dialogue) {
            return ItemOutcome::Skip(SkipReason::NoVoiceableContent);
        }

        ItemOutcome::Line(DialogueLine::new(character, dialogue))
    }

    /// The marker may sit on the item itself, inside it, or on an enclosing element
    fn is_menu_option(list_item: ElementRef<'_>) -> bool {
        has_class(list_item, MENU_OPTION_CLASS)
            || list_item.select(&MENU_OPTION_SELECTOR).next().is_some()
            || list_item
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| has_class(ancestor, MENU_OPTION_CLASS))
    }

    fn is_overhead_chat(list_item: ElementRef<'_>) -> bool {
        list_item.select(&OVERHEAD_CHAT_SELECTOR).next().is_some()
    }

    /// Join the text that follows the speaker tag within the same parent
    fn dialogue_after(bold: ElementRef<'_>) -> String {
        let mut parts: Vec<String> = Vec::new();

        for sibling in bold.next_siblings() {
            match sibling.value() {
                Node::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
                Node::Element(element) => {
                    // sup carries [sic]-style annotations
                    if !matches!(element.name(), "a" | "span") {
                        continue;
                    }
                    if let Some(element) = ElementRef::wrap(sibling) {
                        let text = element.text().collect::<String>();
                        let text = text.trim();
                        if !text.is_empty() {
                            parts.push(text.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        parts.join(" ").trim().to_string()
    }
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|name| name == class)
}
