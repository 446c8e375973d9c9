//! KICK CLI
//!
//! Command-line access to the Kick public API through the cached client.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kick_client::{
    ClientConfig, ClipQuery, FetcherConfig, KickClient, LivestreamQuery, SubcategoryQuery,
};
use kick_core::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_MS, DEFAULT_LANGUAGE, DEFAULT_LIMIT, DEFAULT_PAGE,
    DEFAULT_TIMEOUT_SECONDS,
};

/// KICK - cached Kick API client
#[derive(Parser, Debug)]
#[command(name = "kick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Kick base URL
    #[arg(long, global = true, env = "KICK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Cache time-to-live in milliseconds
    #[arg(long, global = true, env = "KICK_CACHE_TTL_MS", default_value_t = DEFAULT_CACHE_TTL_MS as f64)]
    cache_ttl_ms: f64,

    /// Disable the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "KICK_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,
}

impl ClientArgs {
    fn to_config(&self) -> ClientConfig {
        let config = ClientConfig {
            base_url: self.base_url.clone(),
            fetcher: FetcherConfig {
                timeout_seconds: self.timeout,
                ..FetcherConfig::default()
            },
            ..ClientConfig::default()
        };

        if self.no_cache {
            config.no_cache()
        } else {
            config.with_cache_ttl_ms(self.cache_ttl_ms)
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up one or more channels (fetched concurrently)
    Channel {
        /// Channel slugs
        #[arg(required = true)]
        slugs: Vec<String>,
    },

    /// List main categories
    Categories,

    /// List subcategories
    Subcategories {
        /// Page number
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Search channels and categories
    Search {
        /// Word to search for
        word: String,
    },

    /// List live channels
    Livestreams {
        /// Stream language
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        language: String,
        /// Sort order
        #[arg(long, default_value = "desc")]
        sort: String,
        /// Page number
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        /// Subcategory slug
        #[arg(long, default_value = "")]
        subcategory: String,
        /// Category slug
        #[arg(long, default_value = "")]
        category: String,
    },

    /// List clips
    Clips {
        /// Pagination cursor
        #[arg(long, default_value_t = 0)]
        cursor: u64,
        /// Sort key
        #[arg(long, default_value = "view")]
        sort: String,
        /// Time window
        #[arg(long, default_value = "all")]
        time: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let client = KickClient::new(cli.client.to_config()).context("Failed to create Kick client")?;

    match cli.command {
        Commands::Channel { slugs } => cmd_channels(&client, &slugs).await?,
        Commands::Categories => {
            let payload = client.categories().await.context("Failed to fetch categories")?;
            print_payload("Categories", payload)?;
        }
        Commands::Subcategories { page, limit } => {
            let payload = client
                .subcategories(&SubcategoryQuery { page, limit })
                .await
                .context("Failed to fetch subcategories")?;
            print_payload("Subcategories", payload)?;
        }
        Commands::Search { word } => {
            let payload = client.search(&word).await.context("Search failed")?;
            print_payload(&format!("Search: {}", word), payload)?;
        }
        Commands::Livestreams {
            language,
            sort,
            page,
            limit,
            subcategory,
            category,
        } => {
            let query = LivestreamQuery {
                language,
                sort,
                page,
                limit,
                subcategory,
                category,
            };
            let payload = client
                .livestreams(&query)
                .await
                .context("Failed to fetch livestreams")?;
            print_payload("Livestreams", payload)?;
        }
        Commands::Clips { cursor, sort, time } => {
            let payload = client
                .clips(&ClipQuery { cursor, sort, time })
                .await
                .context("Failed to fetch clips")?;
            print_payload("Clips", payload)?;
        }
    }

    if cli.verbose {
        let stats = client.gateway().stats();
        println!(
            "\n{} {} valid, {} expired, {} in flight",
            "Cache:".dimmed(),
            stats.valid_entries,
            stats.expired_entries,
            stats.in_flight
        );
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "kick=debug,info"
    } else {
        "kick=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Look up channels concurrently; repeated slugs share one request.
async fn cmd_channels(client: &KickClient, slugs: &[String]) -> Result<()> {
    let lookups = slugs.iter().map(|slug| client.channel(slug));
    let results = futures::future::join_all(lookups).await;

    let mut failed = 0usize;
    for (slug, result) in slugs.iter().zip(results) {
        match result {
            Ok(payload) => print_payload(&format!("Channel: {}", slug), payload)?,
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "❌ Failed:".red().bold(), slug, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} channel lookups failed", failed, slugs.len());
    }
    Ok(())
}

fn print_payload(label: &str, payload: Option<Value>) -> Result<()> {
    println!("{}", format!("🔍 {}", label).cyan().bold());
    match payload {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("   {}", "No data returned".yellow()),
    }
    Ok(())
}
