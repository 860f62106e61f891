//! Boutique CLI - database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! boutique-cli migrate
//!
//! # Seed sample catalog data
//! boutique-cli seed
//!
//! # Create (or promote) an admin user
//! boutique-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//!
//! # Delete uploaded images no product references anymore
//! boutique-cli cleanup-uploads
//! ```
//!
//! All commands read `DATABASE_URL` from the environment (a `.env` file is
//! honored). `cleanup-uploads` additionally reads `UPLOADS_DIR`
//! (default `uploads`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boutique-cli")]
#[command(author, version, about = "Boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with sample catalog data
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Delete uploaded files no longer referenced by any product
    CleanupUploads,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user, or promote an existing one
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (ignored when the user already exists)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create(&email, &name, &password).await?;
            }
        },
        Commands::CleanupUploads => commands::cleanup_uploads::run().await?,
    }
    Ok(())
}
