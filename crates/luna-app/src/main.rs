//! Luna application binary - composition root.
//!
//! Ties the Luna crates together into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the HTTP backend client
//! 3. Run the conversation loop on the terminal (the hosted chat page
//!    drives the same orchestrator through its own frontend)
//!
//! With `--embed-snippet`, prints the host-page widget markup instead.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{sleep, Duration};

use luna_backend::HttpBackend;
use luna_chat::{ChatError, ConversationOrchestrator};
use luna_core::config::LunaConfig;
use luna_embed::EmbedRegistry;
use luna_voice::{sanitize_speech_text, VoiceCapability};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = LunaConfig::load_or_default(&config_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    args.resolve_log_level(&config.general.log_level),
                )
            }),
        )
        .init();
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    if args.embed_snippet {
        let mut registry = EmbedRegistry::new();
        registry.install(config.embed.clone(), args.viewport)?;
        println!("{}", registry.render());
        return Ok(());
    }

    let base_url = args.resolve_base_url(&config.api.base_url);
    let backend = Arc::new(HttpBackend::new(
        &base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?);
    tracing::info!(base_url = %backend.base_url(), "Backend client ready");

    // No recognition engine on a terminal; replies are "spoken" as a
    // sanitized transcript line.
    let capability = VoiceCapability::detect(false, true);
    let speak_replies = capability.output_available() && config.voice.output_enabled;
    let auto_speak_delay = Duration::from_millis(config.voice.auto_speak_delay_ms);
    let mut orchestrator = ConversationOrchestrator::new(config, backend);
    orchestrator.initialize().await;

    let mut stdout = io::stdout();
    for message in orchestrator.messages() {
        stdout
            .write_all(format!("[{}] {}\n", message.timestamp, message.content).as_bytes())
            .await?;
    }
    print_suggestions(&mut stdout, orchestrator.displayed_suggestions()).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        let outcome = match orchestrator.send_turn(&line).await {
            Ok(outcome) => outcome,
            Err(ChatError::EmptyMessage) => continue,
        };

        stdout
            .write_all(
                format!(
                    "[{}] {}\n",
                    outcome.bot_message.timestamp, outcome.bot_message.content
                )
                .as_bytes(),
            )
            .await?;
        print_suggestions(&mut stdout, &outcome.follow_ups).await?;

        if speak_replies {
            if let Some(text) = outcome.auto_speak {
                sleep(auto_speak_delay).await;
                stdout
                    .write_all(format!("🔊 {}\n", sanitize_speech_text(&text)).as_bytes())
                    .await?;
            }
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

async fn print_suggestions(
    stdout: &mut io::Stdout,
    suggestions: &[String],
) -> Result<(), std::io::Error> {
    if suggestions.is_empty() {
        return Ok(());
    }
    stdout.write_all(b"Suggested:\n").await?;
    for question in suggestions {
        stdout
            .write_all(format!("  - {}\n", question).as_bytes())
            .await?;
    }
    Ok(())
}
