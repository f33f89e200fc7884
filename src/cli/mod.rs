//! Command-line interface definition and dispatch for shopkeep.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler; the interactive REPL lives in [`crate::chat`].

mod setup;

pub use setup::Assistant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::catalog::{Product, SearchQuery};
use crate::output::StdoutRenderer;
use crate::tools::search::normalize_keywords;
use crate::{agent, chat, config, message::Message, provider};

/// Top-level CLI structure for shopkeep.
#[derive(Parser)]
#[command(
    name = "shopkeep",
    about = "A shopping assistant that searches a storefront catalog while it answers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the shopkeep CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot shopping question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (openai, anthropic, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Start an interactive shopping chat
    Chat {
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (openai, anthropic, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Search the catalog directly, without a model
    Search {
        /// Keywords matched against product titles
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Maximum number of products (capped at 20)
        #[arg(short, long, default_value_t = crate::constants::DEFAULT_MAX_RESULTS,
              value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective config
    Show,
    /// Print the global config file path
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ask {
            prompt,
            model,
            provider: provider_name,
        } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("No prompt provided. Usage: shopkeep ask \"your question here\"");
            }

            let config = config::Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            let assistant = Assistant::from_config(&config, &selection)?;

            println!(
                "{} [store: {}] [model: {}/{}]",
                "shopkeep".bold().cyan(),
                config.store_name().yellow(),
                selection.provider.to_string().yellow(),
                selection.model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let mut history = vec![Message::user(prompt)];
            let mut renderer = StdoutRenderer::new();
            let result = agent::run_turn(
                &assistant.orchestrator(),
                &mut history,
                &mut renderer,
                assistant.max_roundtrips,
            )
            .await?;

            if result.error_occurred {
                eprintln!("{}", "Some searches failed; the answer may be incomplete.".yellow());
            }
            Ok(())
        }
        Commands::Chat {
            model,
            provider: provider_name,
        } => {
            let config = config::Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            chat::run_chat(&config, &selection).await
        }
        Commands::Search { keywords, limit } => {
            let config = config::Config::load()?;
            let catalog = setup::catalog_client(&config)?;
            let query = SearchQuery::new(normalize_keywords(keywords)?, limit);
            let products = catalog.search(config.store_url(), &query).await?;
            print_products(&query, &products);
            Ok(())
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let config = config::Config::load()?;
                    let path = config::Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config)?;
                    println!("{}", toml_str);
                }
                ConfigAction::Path => {
                    println!("{}", config::Config::config_path()?.display());
                }
            }
            Ok(())
        }
    }
}

fn print_products(query: &SearchQuery, products: &[Product]) {
    if products.is_empty() {
        println!("{}", format!("No products match \"{}\".", query.display()).dimmed());
        return;
    }
    for product in products {
        println!("{}", product.title.bold());
        if !product.category.is_empty() {
            println!("  {}", product.category.dimmed());
        }
        if !product.tags.is_empty() {
            let tags: Vec<&str> = product.tags.iter().map(String::as_str).collect();
            println!("  {}", tags.join(", ").dimmed());
        }
        if let Some(ref image) = product.image {
            println!("  {}", image.blue().underline());
        }
    }
}
