//! CLI entry point for postframe

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postframe::server::ServerOptions;
use postframe::Site;

#[derive(Parser)]
#[command(name = "postframe")]
#[command(version)]
#[command(about = "Blog front-end with a post list, styled Markdown content and a story catalog", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post, without extension
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Build the story catalog
    Catalog,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,

        /// Also build and serve the story catalog
        #[arg(long)]
        catalog: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, story)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "postframe=debug,info"
    } else {
        "postframe=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            postframe::commands::init::init_site(&target_dir)?;
            println!("Initialized empty site in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            postframe::commands::new::run(&site, &title, path.as_deref())?;
        }

        Commands::Generate { watch } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                postframe::commands::generate::watch(&site).await?;
            }
        }

        Commands::Catalog => {
            let site = Site::new(&base_dir)?;
            site.build_catalog()?;
            println!(
                "Catalog written to {:?}",
                postframe::commands::catalog::output_dir(&site)
            );
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
            catalog,
        } => {
            let site = Site::new(&base_dir)?;

            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            let options = ServerOptions {
                ip,
                port,
                watch: !r#static,
                open,
                catalog,
            };
            postframe::server::start(&site, options).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir)?;
            postframe::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("postframe version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
