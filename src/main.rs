//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small static publisher for Markdown articles", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new draft document
    New {
        /// Title of the new document
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate every document without writing output
    Check,

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Fail instead of skipping documents that do not load
        #[arg(long)]
        strict: bool,
    },

    /// List articles, drafts included
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove the output directory
    Clean,

    /// Build and serve the site locally
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Do not rebuild on file changes
        #[arg(long)]
        r#static: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = folio::Folio::new(&base_dir)?;

    match cli.command {
        Commands::New { title, name } => {
            let path = folio::commands::new::create_document(&folio, &title, name.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Check => {
            let report = folio.check()?;
            for failure in &report.failures {
                eprintln!("{}: {:#}", failure.path.display(), failure.error);
            }
            if report.has_failures() {
                anyhow::bail!("{} document(s) failed validation", report.failures.len());
            }
            println!("All documents are well-formed.");
        }

        Commands::Build { strict } => {
            tracing::info!("Building site...");
            let report = folio.build(strict)?;
            println!(
                "Built {} articles into {}",
                report.articles.len(),
                folio.output_dir.display()
            );
        }

        Commands::List { json } => {
            folio::commands::list::run(&folio, json)?;
        }

        Commands::Clean => {
            tracing::info!("Cleaning output folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve { port, ip, r#static } => {
            tracing::info!("Building site...");
            folio.build(false)?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port, !r#static).await?;
        }
    }

    Ok(())
}
