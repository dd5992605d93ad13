//! CLI entry point for home-journal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_journal::commands;
use home_journal::commands::new::NewPostArgs;
use home_journal::config::JournalConfig;
use home_journal::Journal;

#[derive(Parser)]
#[command(name = "home-journal")]
#[command(version)]
#[command(about = "A personal journal published as a static site", long_about = None)]
struct Cli {
    /// Site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    site: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site and serve it with the submission form
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "0.0.0.0")]
        ip: String,

        /// Tags offered on the form, comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Initialize the site directory first
        #[arg(long)]
        init: bool,
    },

    /// Regenerate every page, thumbnail and index
    #[command(alias = "b")]
    Build,

    /// Initialize a new journal site
    Init,

    /// Create a new post
    New {
        /// Title of the new post
        #[arg(short, long)]
        title: String,

        /// Author of the new post
        #[arg(short, long, default_value = "")]
        author: String,

        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,

        /// Markdown text of the post
        #[arg(short, long, conflicts_with = "content_file")]
        content: Option<String>,

        /// Read the Markdown text from a file
        #[arg(long)]
        content_file: Option<PathBuf>,

        /// Media files to attach
        #[arg(short, long, num_args = 1..)]
        media: Vec<PathBuf>,
    },

    /// List journal content
    List {
        /// Type of content to list (posts, tags, authors)
        #[arg(default_value = "posts")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "home_journal=debug,info"
    } else {
        "home_journal=info"
    };

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    // Determine site directory
    let site_dir = match cli.site {
        Some(site) => site,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Serve {
            port,
            ip,
            tags,
            init,
        } => {
            if init {
                tracing::info!("Initializing journal in {:?}", site_dir);
                commands::init::init_site(&site_dir)?;
            }

            let mut config = JournalConfig::load_from_site(&site_dir)?;
            if let Some(tags) = tags {
                config.tags = tags
                    .into_iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }

            let journal = Journal::with_config(&site_dir, config)?;
            commands::serve::run(journal, &ip, port).await?;
        }

        Commands::Build => {
            let journal = Journal::new(&site_dir)?;
            let summary = commands::build::run(&journal)?;
            println!("{}", summary);
        }

        Commands::Init => {
            tracing::info!("Initializing journal in {:?}", site_dir);
            commands::init::init_site(&site_dir)?;
            println!("Initialized empty journal in {:?}", site_dir);
        }

        Commands::New {
            title,
            author,
            tags,
            content,
            content_file,
            media,
        } => {
            let journal = Journal::new(&site_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            commands::new::create_post(
                &journal,
                NewPostArgs {
                    title,
                    author,
                    tags,
                    content,
                    content_file,
                    media,
                },
            )?;
        }

        Commands::List { r#type } => {
            let journal = Journal::new(&site_dir)?;
            commands::list::run(&journal, &r#type)?;
        }
    }

    Ok(())
}
