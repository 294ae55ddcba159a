//! EliteStore CLI - catalog and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Validate the bundled catalog, or a JSON/YAML file
//! es-cli catalog validate
//! es-cli catalog validate data/catalog.yaml
//!
//! # List products through the storefront's filter pipeline
//! es-cli catalog list --category Fashion --sort price-low --max-price 100
//!
//! # Price a cart: product 1 twice, product 5 once
//! es-cli quote 1:2 5:1
//! ```
//!
//! # Commands
//!
//! - `catalog validate` - Check catalog invariants and report every problem
//! - `catalog list` - Filter and sort products
//! - `quote` - Order summary for a list of `ID:QTY` items

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod error;

use commands::catalog::ListOptions;
use error::CliError;

#[derive(Parser)]
#[command(name = "es-cli")]
#[command(author, version, about = "EliteStore CLI tools")]
struct Cli {
    /// Catalog file (JSON or YAML) to use instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Print the order summary for a set of products
    Quote {
        /// Items as `ID:QTY` (quantity defaults to 1 when omitted)
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog and report every problem found
    Validate {
        /// Catalog file; overrides `--catalog`
        path: Option<PathBuf>,
    },
    /// List products matching the given filters
    List {
        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Category to include (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Sort order (`featured`, `newest`, `price-low`, `price-high`, `rating`)
        #[arg(long, default_value = "featured")]
        sort: String,

        /// Lowest price to include
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest price to include
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => {
                commands::catalog::validate(path.or(cli.catalog).as_deref())?;
            }
            CatalogAction::List {
                search,
                categories,
                sort,
                min_price,
                max_price,
                featured,
            } => {
                let options = ListOptions {
                    search,
                    categories,
                    sort,
                    min_price,
                    max_price,
                    featured,
                };
                commands::catalog::list(cli.catalog.as_deref(), &options)?;
            }
        },
        Commands::Quote { items } => {
            commands::quote::quote(cli.catalog.as_deref(), &items)?;
        }
    }
    Ok(())
}
