//! pricepulse - Cross-marketplace price comparison CLI
//!
//! Detects product pages, extracts listing data and asks a comparison
//! backend for the same product on other marketplaces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pricepulse::commands::{compare, ExtractCommand, ScanCommand};
use pricepulse::config::{Config, OutputFormat};
use pricepulse::format::Formatter;
use pricepulse::marketplace::registry;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pricepulse",
    version,
    about = "Cross-marketplace price comparison for product pages",
    long_about = "Detects the marketplace of a product page, extracts title, price and image, and compares prices on other marketplaces through a comparison backend."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Comparison backend base URL
    #[arg(long, global = true, env = "PRICEPULSE_BACKEND_URL")]
    backend: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PRICEPULSE_PROXY")]
    proxy: Option<String>,

    /// Delay before page fetches in milliseconds
    #[arg(long, global = true, env = "PRICEPULSE_DELAY")]
    delay: Option<u64>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, extract and compare the product on a page
    #[command(alias = "s")]
    Scan {
        /// Page URL
        url: String,

        /// Read the page from a saved HTML file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Extract the product from a saved page
    #[command(alias = "x")]
    Extract {
        /// Page URL the HTML was saved from
        url: String,

        /// Saved HTML file
        #[arg(long)]
        html: PathBuf,
    },

    /// Print the marketplace identifier for a URL
    Detect {
        /// Page URL
        url: String,

        /// Saved HTML file, for marketplaces that need page markers
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Ask the backend for comparable listings
    #[command(alias = "c")]
    Compare {
        /// Product title
        title: String,

        /// Marketplace the product is listed on (e.g. amazon, ebay_au)
        #[arg(short, long, default_value = "amazon")]
        marketplace: String,

        /// Current display price
        #[arg(short, long)]
        price: Option<String>,
    },

    /// List supported marketplaces
    Marketplaces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Scan { url, html } => {
            let cmd = ScanCommand::new(config);
            let output = cmd.execute(&url, html.as_deref()).await?;
            println!("{}", output);
        }

        Commands::Extract { url, html } => {
            let cmd = ExtractCommand::new(config);
            let output = cmd.execute(&url, &html)?;
            println!("{}", output);
        }

        Commands::Detect { url, html } => {
            let cmd = ExtractCommand::new(config);
            match cmd.detect(&url, html.as_deref())? {
                Some(id) => println!("{}\t{}", id, id.display_name()),
                None => println!("not detected"),
            }
        }

        Commands::Compare { title, marketplace, price } => {
            let output =
                compare::compare_prices(&config, &title, &marketplace, price.as_deref()).await?;
            println!("{}", output);
        }

        Commands::Marketplaces => {
            let formatter = Formatter::new(config.format);
            println!("{}", formatter.format_marketplaces(registry::entries()));
        }
    }

    Ok(())
}
