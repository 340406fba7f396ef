/*!
 * # questvox - quest transcript extraction and voiceover generation
 *
 * A Rust library for turning wiki quest transcripts into speaker-attributed
 * dialogue and voicing it with a text-to-speech provider.
 *
 * ## Features
 *
 * - Extract dialogue lines from transcript page markup:
 *   - Menu options, overhead chat and stage directions are dropped
 *   - Dynamic `[...]` placeholders are removed
 *   - Duplicate lines are suppressed, narrative order is kept
 * - Resolve quest names, slugs and branch names
 * - List the wiki's quest transcripts
 * - Generate voiceover clips with neighbouring lines as context
 * - Record voiced lines in a SQLite database
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Extraction pipeline and JSON payload
 *   - `transcript::extractor`: Single-pass extraction over page markup
 *   - `transcript::text`: Stage directions, speaker tags and placeholders
 *   - `transcript::naming`: Quest names, slugs and branches
 * - `wiki`: Page fetching and the quest transcript listing
 * - `providers`: Text-to-speech providers:
 *   - `providers::elevenlabs`: ElevenLabs API client
 *   - `providers::mock`: In-process provider for tests
 * - `voiceover`: Voice assignment and clip generation
 * - `database`: SQLite persistence of voiced lines
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![cfg_attr(test, allow(non_snake_case))]

pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod transcript;
pub mod voiceover;
pub mod wiki;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ExtractError, ProviderError};
pub use transcript::{DialogueLine, TranscriptDocument, TranscriptExtractor, TranscriptOutput};
