//! `memeforge` CLI - browse the merged meme catalog and lay out captions

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memeforge")]
#[command(about = "Browse meme templates and GIFs from Imgflip, Tenor and Giphy, and lay out captions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the merged catalog, optionally searching
    Browse {
        /// Search term (matched against template names)
        query: Option<String>,

        /// Only show one provider (all, imgflip, tenor, giphy)
        #[arg(short, long, default_value = "all")]
        source: String,

        /// Page to show (25 items per page)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the configured providers and the endpoints they would call
    Providers {
        /// Show the search endpoint for this query instead of the default listing
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Lay out captions over an image and print the render description as JSON
    Compose {
        /// Image URL or local file path
        image: String,

        /// Top caption text
        #[arg(long)]
        top: Option<String>,

        /// Bottom caption text
        #[arg(long)]
        bottom: Option<String>,

        /// Caption text color as hex, applied to both captions
        #[arg(long)]
        color: Option<String>,

        /// Caption font size (CSS), applied to both captions
        #[arg(long)]
        font_size: Option<String>,

        /// Preview container size in pixels, e.g. 600x400
        #[arg(long, default_value = "600x400")]
        container: String,

        /// Simulated drag: SLOT=X,Y moves the caption center to pixel X,Y
        #[arg(long, value_name = "SLOT=X,Y")]
        drag: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("memeforge=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Browse {
            query,
            source,
            page,
            json,
        } => {
            cmd::browse::cmd_browse(query.as_deref(), &source, page, json).await?;
        }
        Commands::Providers { query } => {
            cmd::providers::cmd_providers(query.as_deref())?;
        }
        Commands::Compose {
            image,
            top,
            bottom,
            color,
            font_size,
            container,
            drag,
        } => {
            let image = if image.starts_with("http://") || image.starts_with("https://") {
                memeforge::BaseImage::Url(image)
            } else {
                memeforge::BaseImage::Local(PathBuf::from(image))
            };
            let options = cmd::compose::ComposeOptions {
                top,
                bottom,
                color,
                font_size,
                container,
                drags: drag,
            };
            cmd::compose::cmd_compose(image, &options)?;
        }
    }

    Ok(())
}
