#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use questvox::app_config::{self, Config};
use questvox::app_controller::{Controller, GenerateOptions};
use questvox::transcript::OutputSink;
use questvox::voiceover::{parse_voice_assignment, LineStatus};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the dialogue of a quest transcript page to JSON
    Extract {
        /// URL of the transcript page
        #[arg(value_name = "URL")]
        url: String,

        /// Directory for the JSON file (defaults to storage.transcripts_dir)
        #[arg(short, long, value_name = "DIR", conflicts_with = "stdout")]
        output_dir: Option<PathBuf>,

        /// Print the JSON to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// List the quest transcripts available on the wiki
    Quests,

    /// List the voices offered by the TTS provider
    Voices {
        /// TTS API key
        #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Generate voiceover clips for an extracted transcript
    Generate {
        /// Transcript JSON written by `extract`
        #[arg(value_name = "TRANSCRIPT_JSON")]
        transcript: PathBuf,

        /// Voice for a character, as NAME=VOICE_ID (repeatable)
        #[arg(long = "voice", value_name = "NAME=VOICE_ID", value_parser = parse_voice_assignment)]
        voices: Vec<(String, String)>,

        /// Voice id for the player character
        #[arg(long, value_name = "VOICE_ID")]
        player_voice: Option<String>,

        /// Do not match characters to provider voices by name
        #[arg(long)]
        no_auto_match: bool,

        /// Regenerate clips that already exist
        #[arg(short, long)]
        force: bool,

        /// TTS API key
        #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Generate shell completions for questvox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// questvox - quest transcript extraction and voiceover generation
///
/// Scrapes quest dialogue from wiki transcript pages into speaker-attributed
/// JSON and voices it through a text-to-speech provider.
#[derive(Parser, Debug)]
#[command(name = "questvox")]
#[command(version)]
#[command(about = "Quest transcript extraction and voiceover generation")]
#[command(long_about = "questvox extracts quest dialogue from wiki transcript pages and generates voiceover clips for it.

EXAMPLES:
    questvox extract https://oldschool.runescape.wiki/w/Transcript:Cook%27s_Assistant
    questvox extract --stdout <URL> > cooks-assistant.json
    questvox quests                                   # List transcripts, marking voiced quests
    questvox voices                                   # List TTS voices
    questvox generate transcripts/cooks-assistant.json --voice Cook=VOICE_ID --player-voice VOICE_ID
    questvox completions bash > questvox.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The TTS API key can also be given through
    ELEVENLABS_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    /// ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "questvox", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    run(cli.command, config).await
}

/// Load the config file and apply command-line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    match &cli.command {
        Commands::Voices { api_key: Some(api_key) }
        | Commands::Generate { api_key: Some(api_key), .. } => {
            config.tts.api_key = api_key.clone();
        }
        _ => {}
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

async fn run(command: Commands, config: Config) -> Result<()> {
    let controller = Controller::with_config(config)?;

    match command {
        Commands::Extract { url, output_dir, stdout } => {
            let sink = if stdout {
                OutputSink::Stdout
            } else {
                let directory = output_dir
                    .unwrap_or_else(|| controller.config().storage.transcripts_dir.clone());
                OutputSink::Directory(directory)
            };
            controller.extract(&url, &sink).await?;
        }

        Commands::Quests => {
            let quests = controller.list_quests().await?;
            for quest in &quests {
                let marker = if quest.voiced { "[voiced]" } else { "" };
                println!("{:>4}. {} {}", quest.listing.index, quest.listing.quest_name(), marker);
                println!("      {}", quest.listing.link);
            }
            info!("{} quest transcripts", quests.len());
        }

        Commands::Voices { .. } => {
            for voice in controller.list_voices().await? {
                println!("{}\t{}", voice.voice_id, voice.name);
            }
        }

        Commands::Generate { transcript, voices, player_voice, no_auto_match, force, .. } => {
            let options = GenerateOptions {
                transcript_path: transcript,
                voices,
                player_voice,
                auto_match: !no_auto_match,
                force,
            };
            let result = controller.generate(&options).await?;

            eprintln!("\n=== {} ===", result.quest_name);
            eprintln!("Total lines: {}", result.total_lines);
            eprintln!("Completed: {}", result.completed);
            eprintln!("Skipped: {}", result.skipped);
            eprintln!("Failed: {}", result.failed);
            for line in result.results.iter().filter(|line| line.status == LineStatus::Failed) {
                eprintln!(
                    "  - {} ({}): {}",
                    line.character,
                    line.hash,
                    line.error.as_deref().unwrap_or("unknown error")
                );
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
