//! Herrería CLI - catalog inspection and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Generate the ADMIN_PASSWORD_HASH value (password read from stdin)
//! herreria hash-password
//!
//! # List the products of a category, newest first
//! herreria products list rejas
//!
//! # List featured products in display order
//! herreria featured list
//!
//! # Load products and featured products from a YAML file
//! herreria seed catalog.yaml
//! ```
//!
//! Catalog commands read the same `SITE_STORE` / `FIRESTORE_*` variables as
//! the site.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use herreria_core::Category;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "herreria")]
#[command(author, version, about = "Herrería site tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash an admin password read from stdin
    HashPassword,
    /// Inspect catalog products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect featured products
    Featured {
        #[command(subcommand)]
        action: FeaturedAction,
    },
    /// Add products and featured products from a YAML file
    Seed {
        /// Path to the YAML file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products in a category, newest first
    List {
        /// Category slug (e.g. `puertas`, `rejas`)
        category: Category,
    },
}

#[derive(Subcommand)]
enum FeaturedAction {
    /// List featured products in display order
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herreria_cli=info,herreria_site=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::HashPassword => commands::password::hash_from_stdin()?,
        Commands::Products { action } => match action {
            ProductsAction::List { category } => commands::catalog::list_products(category).await?,
        },
        Commands::Featured { action } => match action {
            FeaturedAction::List => commands::catalog::list_featured().await?,
        },
        Commands::Seed { file } => commands::seed::from_file(&file).await?,
    }
    Ok(())
}
