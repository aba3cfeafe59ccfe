mod input;
mod render;

use advisor_core::{AdvisorConfig, AdvisorEngine, CatalogueStore, OllamaGenerator};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use field_state::{HandoffFile, HandoffRecord};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use input::ChatInput;

#[derive(Parser)]
#[command(name = "field-advisor", about = "field-advisor - adaptive crop advisory chat")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "field-advisor.toml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Start an interactive advisory chat
    Chat,
    /// Print the ranked question catalogue
    Suggestions,
    /// Write the session handoff record, as the scan workflow would
    Handoff {
        /// Crop that was scanned
        #[arg(long)]
        crop: String,
        /// Detected condition or disease
        #[arg(long)]
        disease: String,
        /// Health status reported by the scan
        #[arg(long, default_value = "DEFECTIVE")]
        status: String,
    },
    /// Restore the default question catalogue
    Reset,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,advisor_core=info,field_state=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = AdvisorConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.cmd {
        Cmd::Chat => chat(&config).await,

        Cmd::Suggestions => {
            let catalogue = CatalogueStore::new(&config.storage.catalogue_path).load();
            print!(
                "{}",
                render::suggestions(&catalogue, config.learning.popular_weight)
            );
            Ok(())
        }

        Cmd::Handoff {
            crop,
            disease,
            status,
        } => {
            let file = HandoffFile::new(&config.storage.handoff_path);
            file.write(&HandoffRecord::new(crop, disease, status))
                .with_context(|| format!("writing {}", file.path().display()))?;
            eprintln!("handoff written to {}", file.path().display());
            Ok(())
        }

        Cmd::Reset => {
            let store = CatalogueStore::new(&config.storage.catalogue_path);
            let catalogue = store
                .reset()
                .with_context(|| format!("resetting {}", store.path().display()))?;
            eprintln!(
                "catalogue reset: {} categories, {} questions",
                catalogue.len(),
                catalogue.entry_count()
            );
            Ok(())
        }
    }
}

async fn chat(config: &AdvisorConfig) -> Result<()> {
    let generator = OllamaGenerator::new(&config.generation)?;
    info!(model = generator.model(), endpoint = %config.generation.endpoint, "using ollama");
    let mut engine = AdvisorEngine::initialize(config, Box::new(generator));

    print!("{}", render::banner(engine.session()));
    println!("{}", render::greeting(engine.session()));
    println!();
    print!(
        "{}",
        render::suggestions(engine.current_catalogue(), engine.popular_weight())
    );
    println!("{}", input::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match input::parse(&line, engine.current_catalogue()) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Help => println!("{}", input::HELP),
            ChatInput::Suggest => print!(
                "{}",
                render::suggestions(engine.current_catalogue(), engine.popular_weight())
            ),
            ChatInput::Invalid(reason) => eprintln!("{}", reason),
            ChatInput::Pick { category, question } => {
                println!("Farmer: {}", question);
                let reply = cancellable(engine.on_suggestion_chosen(&category, &question)).await;
                print_reply(reply);
                print!(
                    "{}",
                    render::suggestions(engine.current_catalogue(), engine.popular_weight())
                );
            }
            ChatInput::Ask(text) => {
                let reply = cancellable(engine.on_user_utterance(&text)).await;
                print_reply(reply);
            }
        }
    }

    Ok(())
}

/// Race a turn against Ctrl-C; `None` means the user cancelled it.
async fn cancellable(turn: impl Future<Output = String>) -> Option<String> {
    tokio::select! {
        reply = turn => Some(reply),
        Ok(()) = tokio::signal::ctrl_c() => None,
    }
}

fn print_reply(reply: Option<String>) {
    match reply {
        Some(reply) => print!("{}", render::reply(&reply)),
        None => eprintln!("(cancelled)"),
    }
}
