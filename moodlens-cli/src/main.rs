//! MoodLens CLI: rewrite, soften, check, moderate, analyze and classify text
//! from the command line. Every command prints one JSON object on stdout.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use moodlens::config::{LogFormat, MoodlensConfig};
use moodlens::context::MoodlensContext;
use moodlens::events::LoggingEventSink;
use moodlens::guards::{has_negative, has_positive, needs_softening, soften, PolarityLexicon};
use moodlens::moderation::GenerativeModerator;
use moodlens::observability::init_tracing;
use moodlens::providers::{GeminiClient, HttpClassifier};
use moodlens::rewrite::Tone;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "moodlens")]
#[command(about = "MoodLens: guarded tone rewriting and emotion tooling")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// JSON config file; environment variables override it
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite text into a tone, falling back to softening
    Rewrite {
        /// neutral, positive or polite
        #[arg(long, default_value = "neutral")]
        tone: String,
        text: String,
    },
    /// Apply the softening rules only
    Soften { text: String },
    /// Report polarity and whether the text needs softening
    Check { text: String },
    /// Decide whether text may be published
    Moderate { text: String },
    /// Analyse emotion, keywords and emojis
    Analyze { text: String },
    /// Classify emotion through the configured classifier service
    Classify { text: String },
}

fn load_config(args: &Args) -> anyhow::Result<MoodlensConfig> {
    let config = match &args.config {
        Some(path) => MoodlensConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MoodlensConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    config.validate()?;
    Ok(config)
}

fn build_context(config: MoodlensConfig) -> anyhow::Result<MoodlensContext> {
    let mut builder = MoodlensContext::builder().with_event_sink(Arc::new(LoggingEventSink::debug()));

    if config.gemini.has_api_key() {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        info!(model = %gemini.model(), "Using Gemini generator");
        builder = builder
            .with_generator(gemini.clone())
            .with_moderator(Arc::new(GenerativeModerator::new(gemini)));
    } else {
        debug!("No Gemini API key, generation disabled");
    }

    if config.classifier.base_url.is_some() {
        builder = builder.with_classifier(Arc::new(HttpClassifier::from_config(&config.classifier)?));
    }

    Ok(builder.with_config(config).build()?)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config.logging);

    let context = build_context(config)?;

    let output = match args.cmd {
        Command::Rewrite { tone, text } => {
            let result = context.rewriter().rewrite(&text, Tone::parse(&tone)).await;
            serde_json::to_value(result)?
        }
        Command::Soften { text } => json!({ "text": soften(&text) }),
        Command::Check { text } => json!({
            "polarity": PolarityLexicon::global().sense(&text),
            "has_positive": has_positive(&text),
            "has_negative": has_negative(&text),
            "needs_softening": needs_softening(&text),
        }),
        Command::Moderate { text } => {
            serde_json::to_value(context.moderation_service().moderate(&text).await)?
        }
        Command::Analyze { text } => {
            serde_json::to_value(context.emotion_analyzer().analyze(&text).await)?
        }
        Command::Classify { text } => {
            serde_json::to_value(context.classifier_service().classify(&text).await)?
        }
    };

    print_json(&output)?;
    context.shutdown().await;
    Ok(())
}
