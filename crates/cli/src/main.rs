//! Storepulse CLI - Database migrations and manual syncs.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sp-cli migrate
//!
//! # Sync one tenant by shop domain
//! sp-cli sync --shop-domain acme.myshopify.com
//!
//! # Sync all active tenants
//! sp-cli sync --all
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Storepulse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run a full sync outside the server's schedule
    Sync {
        /// Sync a single tenant by its shop domain
        #[arg(long, conflicts_with = "all")]
        shop_domain: Option<String>,

        /// Sync every active tenant
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Sync { shop_domain, all } => {
            if all {
                commands::sync::all_tenants().await?;
            } else if let Some(shop_domain) = shop_domain {
                commands::sync::one_tenant(&shop_domain).await?;
            } else {
                return Err("pass either --shop-domain <domain> or --all".into());
            }
        }
    }
    Ok(())
}
