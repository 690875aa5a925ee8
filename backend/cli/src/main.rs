use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use polisbot_channels::TelegramAdapter;
use polisbot_config::BotConfig;
use polisbot_extractor::{OpenAiCollaborator, StructuredExtractor};
use polisbot_policy::PolicyGenerator;
use polisbot_recognition::TesseractEngine;
use polisbot_session::{InMemorySessionStore, IntakeMachine};

#[derive(Parser)]
#[command(name = "polisbot")]
#[command(about = "Polisbot — document intake and insurance policy issuance over Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot against the Telegram API.
    Serve,
    /// Print the resolved configuration (secrets redacted) and exit.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BotConfig::from_env()?;

    let _log_guard = polisbot_logging::init_logger(&config.log_dir, &config.log_level);

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}

async fn serve(config: BotConfig) -> Result<()> {
    info!(?config, "starting polisbot");

    let store = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(TesseractEngine::new());

    let mut collaborator =
        OpenAiCollaborator::new(config.openai_key.as_str(), config.model.as_str());
    if let Some(url) = &config.openai_base_url {
        collaborator = collaborator.with_base_url(url.as_str());
    }
    let extractor = StructuredExtractor::new(Arc::new(collaborator));

    let generator =
        PolicyGenerator::new(&config.artifacts_dir).with_premium(config.premium.as_str());

    let adapter = Arc::new(TelegramAdapter::new(
        config.telegram_token.as_str(),
        &config.media_dir,
    ));

    let machine = Arc::new(
        IntakeMachine::new(store, engine, extractor, generator, adapter.clone())
            .with_languages(config.ocr_lang.as_str(), config.ocr_lang.as_str())
            .with_premium_text(config.premium.as_str()),
    );

    adapter.run(machine).await
}
